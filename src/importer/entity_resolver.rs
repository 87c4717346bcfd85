// ==========================================
// 库存管理系统 - 分类/品牌解析
// ==========================================
// 职责: 文件夹标签 → 分类 ID + 品牌 ID（缺失则创建）
// 红线: 映射中的 ID 必须是存储中实际存在的 ID
// ==========================================

use crate::domain::catalog::{Brand, Category};
use crate::domain::import::{ImportWarning, WarningKind};
use crate::importer::catalog_importer_trait::ParsedRecords;
use crate::repository::CatalogImportRepository;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info, warn};

// ==========================================
// ResolvedEntities - 解析结果
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ResolvedEntities {
    pub category_ids: HashMap<String, String>, // 标签 → 分类 ID
    pub brand_ids: HashMap<String, String>,    // 标签 → 品牌 ID
    pub categories_created: usize,
    pub brands_created: usize,
    pub warnings: Vec<ImportWarning>, // 品牌解析失败（不阻断商品导入）
}

impl ResolvedEntities {
    pub fn category_id(&self, label: &str) -> Option<&str> {
        self.category_ids.get(label).map(String::as_str)
    }

    pub fn brand_id(&self, label: &str) -> Option<&str> {
        self.brand_ids.get(label).map(String::as_str)
    }
}

pub struct EntityResolver;

impl EntityResolver {
    /// 解析批次内所有文件夹标签
    ///
    /// # 流程
    /// 1. 读取已有品牌（失败则以空映射继续）
    /// 2. 按字典序逐个标签：插入分类（已存在则取已有 ID）
    /// 3. 品牌：已有则复用，否则插入
    ///
    /// 单个标签失败只记录日志，该标签不进入对应映射
    pub async fn resolve<R>(&self, repo: &R, records: &ParsedRecords) -> ResolvedEntities
    where
        R: CatalogImportRepository + ?Sized,
    {
        let mut resolved = ResolvedEntities::default();

        // === 步骤 1: 已有品牌 ===
        let existing_brands: HashMap<String, String> = match repo.list_brands().await {
            Ok(brands) => brands.into_iter().map(|b| (b.name, b.id)).collect(),
            Err(e) => {
                warn!(error = %e, "读取已有品牌失败，按无已有品牌继续");
                HashMap::new()
            }
        };
        info!(count = existing_brands.len(), "已有品牌读取完成");

        // === 步骤 2: 去重标签 ===
        let labels: BTreeSet<&str> = records
            .records
            .values()
            .map(|r| r.folder.as_str())
            .filter(|f| !f.is_empty())
            .collect();
        debug!(labels = labels.len(), "开始解析分类与品牌");

        for label in labels {
            self.resolve_category(repo, label, &mut resolved).await;
            self.resolve_brand(repo, label, &existing_brands, &mut resolved)
                .await;
        }

        info!(
            categories = resolved.category_ids.len(),
            categories_created = resolved.categories_created,
            brands = resolved.brand_ids.len(),
            brands_created = resolved.brands_created,
            "分类与品牌解析完成"
        );

        resolved
    }

    async fn resolve_category<R>(&self, repo: &R, label: &str, resolved: &mut ResolvedEntities)
    where
        R: CatalogImportRepository + ?Sized,
    {
        match repo.insert_category_if_absent(&Category::new(label)).await {
            Ok(outcome) => {
                if outcome.created {
                    resolved.categories_created += 1;
                    info!(category = %label, "创建分类");
                } else {
                    debug!(category = %label, "分类已存在，使用已有 ID");
                }
                resolved.category_ids.insert(label.to_string(), outcome.id);
            }
            Err(e) => {
                // 该标签下的商品将被跳过
                warn!(category = %label, error = %e, "分类创建失败");
            }
        }
    }

    async fn resolve_brand<R>(
        &self,
        repo: &R,
        label: &str,
        existing_brands: &HashMap<String, String>,
        resolved: &mut ResolvedEntities,
    ) where
        R: CatalogImportRepository + ?Sized,
    {
        if let Some(id) = existing_brands.get(label) {
            debug!(brand = %label, "使用已有品牌");
            resolved.brand_ids.insert(label.to_string(), id.clone());
            return;
        }

        match repo.insert_brand_if_absent(&Brand::new(label)).await {
            Ok(outcome) => {
                if outcome.created {
                    resolved.brands_created += 1;
                    info!(brand = %label, "创建品牌");
                }
                resolved.brand_ids.insert(label.to_string(), outcome.id);
            }
            Err(e) => {
                warn!(brand = %label, error = %e, "品牌创建失败");
                resolved.warnings.push(ImportWarning {
                    row_number: 0,
                    sortly_id: None,
                    kind: WarningKind::BrandUnresolved,
                    message: format!("品牌 {} 创建失败: {}", label, e),
                });
            }
        }
    }
}
