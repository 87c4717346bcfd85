// ==========================================
// 库存管理系统 - 目录导入器实现
// ==========================================
// 职责: 整合导入流程，从 Sortly 导出文件到商品目录
// 流程: 解析 → 记录映射/去重 → 分类/品牌解析 → 商品逐条落库
// 红线: 条目级问题只记录不阻断；不重试
// ==========================================

use crate::config::ImportConfigReader;
use crate::domain::catalog::UpsertOutcome;
use crate::domain::import::{ImportRecord, ImportReport, ImportSummary, ImportWarning, WarningKind};
use crate::importer::catalog_importer_trait::{CatalogImporter, FileParser, RecordParser};
use crate::importer::entity_resolver::EntityResolver;
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::CsvParser;
use crate::importer::product_upserter::{build_product, ProductUpserter};
use crate::repository::CatalogImportRepository;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// CatalogImporterImpl - 目录导入器实现
// ==========================================
pub struct CatalogImporterImpl<R, C>
where
    R: CatalogImportRepository,
    C: ImportConfigReader,
{
    // 数据访问层
    import_repo: R,

    // 配置读取器
    config: C,

    // 导入组件
    file_parser: Box<dyn FileParser>,
    record_parser: Box<dyn RecordParser>,
    entity_resolver: EntityResolver,
    product_upserter: ProductUpserter,
}

impl<R, C> CatalogImporterImpl<R, C>
where
    R: CatalogImportRepository,
    C: ImportConfigReader,
{
    /// 创建新的 CatalogImporter 实例
    ///
    /// # 参数
    /// - import_repo: 导入数据仓储
    /// - config: 配置读取器
    /// - file_parser: 文件解析器
    /// - record_parser: 记录解析器
    pub fn new(
        import_repo: R,
        config: C,
        file_parser: Box<dyn FileParser>,
        record_parser: Box<dyn RecordParser>,
    ) -> Self {
        Self {
            import_repo,
            config,
            file_parser,
            record_parser,
            entity_resolver: EntityResolver,
            product_upserter: ProductUpserter,
        }
    }

    /// 使用 CSV 解析器 + Sortly 列映射创建实例
    pub fn with_sortly_csv(import_repo: R, config: C) -> Self {
        Self::new(import_repo, config, Box::new(CsvParser), Box::new(FieldMapper))
    }

    /// 数据访问层（供调用方查询导入结果）
    pub fn repository(&self) -> &R {
        &self.import_repo
    }
}

#[async_trait::async_trait]
impl<R, C> CatalogImporter for CatalogImporterImpl<R, C>
where
    R: CatalogImportRepository + Send + Sync,
    C: ImportConfigReader + Send + Sync,
{
    #[instrument(skip(self, file_path), fields(batch_id))]
    async fn import_from_csv<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> ImportResult<ImportReport> {
        let start_time = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("batch_id", batch_id.as_str());

        let file_path_str = file_path.as_ref().display().to_string();
        info!(batch_id = %batch_id, file_path = %file_path_str, "开始导入商品目录");

        // 配置读取
        let progress_interval = self.config.get_progress_log_interval().await?;
        let expiry_formats = self.config.get_expiry_date_formats().await?;
        let transaction_formats = self.config.get_transaction_date_formats().await?;

        // === 步骤 1: 解析文件 ===
        debug!("步骤 1: 解析文件");
        let table = self
            .file_parser
            .parse_to_raw_table(file_path.as_ref())
            .map_err(|e| {
                error!(error = %e, "文件解析失败");
                e
            })?;
        let rows_read = table.data_row_count();
        info!(rows_read, "文件解析完成");

        // === 步骤 2: 记录映射 + 去重 ===
        debug!("步骤 2: 记录映射");
        let parsed = self.record_parser.parse_records(&table).map_err(|e| {
            error!(error = %e, "记录解析失败");
            e
        })?;
        info!(
            items = parsed.len(),
            malformed = parsed.malformed_rows.len(),
            incomplete = parsed.incomplete_rows,
            "记录解析完成"
        );

        let undecodable = table
            .undecodable_rows
            .iter()
            .map(|&row_number| (row_number, "CSV 行无法解码"));
        let mismatched = parsed
            .malformed_rows
            .iter()
            .map(|&row_number| (row_number, "列数与表头不一致"));
        let mut malformed: Vec<(usize, &str)> = undecodable.chain(mismatched).collect();
        malformed.sort_by_key(|(row_number, _)| *row_number);

        let mut warnings: Vec<ImportWarning> = malformed
            .into_iter()
            .map(|(row_number, message)| ImportWarning {
                row_number,
                sortly_id: None,
                kind: WarningKind::MalformedRow,
                message: message.to_string(),
            })
            .collect();

        // === 步骤 3: 分类/品牌解析 ===
        debug!("步骤 3: 分类/品牌解析");
        let resolved = self
            .entity_resolver
            .resolve(&self.import_repo, &parsed)
            .await;
        warnings.extend(resolved.warnings.iter().cloned());

        // === 步骤 4: 商品逐条落库 ===
        debug!("步骤 4: 商品落库");
        let mut summary = ImportSummary {
            rows_read,
            items_parsed: parsed.len(),
            categories_created: resolved.categories_created,
            brands_created: resolved.brands_created,
            ..Default::default()
        };

        for record in parsed.records.values() {
            if record.folder.is_empty() {
                warn!(sku = %record.sortly_id, name = %record.entry_name, "无文件夹，跳过");
                summary.skipped += 1;
                warnings.push(item_warning(
                    record,
                    WarningKind::MissingFolder,
                    "无文件夹标签".to_string(),
                ));
                continue;
            }

            let category_id = match resolved.category_id(&record.folder) {
                Some(id) => id,
                None => {
                    warn!(
                        sku = %record.sortly_id,
                        folder = %record.folder,
                        "分类未解析，跳过"
                    );
                    summary.skipped += 1;
                    warnings.push(item_warning(
                        record,
                        WarningKind::CategoryUnresolved,
                        format!("文件夹 {} 对应分类不存在", record.folder),
                    ));
                    continue;
                }
            };

            if !record.expiry_date.trim().is_empty()
                && record.parse_expiry_date(&expiry_formats).is_none()
            {
                warn!(sku = %record.sortly_id, expiry_date = %record.expiry_date, "过期日期无法解析");
                warnings.push(item_warning(
                    record,
                    WarningKind::UnparsableExpiryDate,
                    format!("过期日期无法解析: {}", record.expiry_date),
                ));
            }

            if !record.transaction_date.trim().is_empty()
                && record.parse_transaction_date(&transaction_formats).is_none()
            {
                warn!(
                    sku = %record.sortly_id,
                    transaction_date = %record.transaction_date,
                    "交易时间无法解析"
                );
                warnings.push(item_warning(
                    record,
                    WarningKind::UnparsableTransactionDate,
                    format!("交易时间无法解析: {}", record.transaction_date),
                ));
            }

            let product = build_product(record, category_id, resolved.brand_id(&record.folder));
            match self
                .product_upserter
                .upsert(&self.import_repo, &product)
                .await
            {
                Ok(UpsertOutcome::Inserted) => {
                    summary.products_created += 1;
                    if progress_interval > 0 && summary.products_created % progress_interval == 0 {
                        info!(created = summary.products_created, "商品创建进度");
                    }
                }
                Ok(UpsertOutcome::Updated) => summary.products_updated += 1,
                Err(e) => {
                    warn!(sku = %record.sortly_id, name = %record.entry_name, error = %e, "商品落库失败");
                    summary.failed += 1;
                    warnings.push(item_warning(
                        record,
                        WarningKind::UpsertFailed,
                        format!("商品落库失败: {}", e),
                    ));
                }
            }
        }

        let elapsed_time = start_time.elapsed();
        info!(
            batch_id = %batch_id,
            rows_read = summary.rows_read,
            items_parsed = summary.items_parsed,
            categories_created = summary.categories_created,
            brands_created = summary.brands_created,
            products_created = summary.products_created,
            products_updated = summary.products_updated,
            skipped = summary.skipped,
            failed = summary.failed,
            elapsed_ms = elapsed_time.as_millis(),
            "商品目录导入完成"
        );

        Ok(ImportReport {
            batch_id,
            file_path: file_path_str,
            summary,
            warnings,
            elapsed_time,
        })
    }
}

fn item_warning(record: &ImportRecord, kind: WarningKind, message: String) -> ImportWarning {
    ImportWarning {
        row_number: record.row_number,
        sortly_id: Some(record.sortly_id.clone()),
        kind,
        message,
    }
}
