// ==========================================
// 库存管理系统 - 目录导入 Trait
// ==========================================
// 职责: 定义导入管道接口（不包含实现）
// 流程: 文件解析 → 记录解析 → 实体解析 → 商品落库
// ==========================================

use crate::domain::import::{ImportRecord, ImportReport, RawTable};
use crate::importer::error::ImportResult;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::Path;

// ==========================================
// CatalogImporter Trait
// ==========================================
// 用途: 导入主接口
// 实现者: CatalogImporterImpl
#[async_trait]
pub trait CatalogImporter: Send + Sync {
    /// 从 Sortly CSV 导出文件导入商品目录
    ///
    /// # 返回
    /// - Ok(ImportReport): 导入结果（统计 + 条目级问题）
    /// - Err: 致命错误（文件不可读、少于 2 行）
    ///
    /// # 导入流程
    /// 1. 文件解析
    /// 2. 记录解析（按业务键去重，后者覆盖前者）
    /// 3. 分类/品牌解析（缺失则创建）
    /// 4. 商品逐条落库（插入或按 SKU 更新）
    async fn import_from_csv<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> ImportResult<ImportReport>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 0）
// 实现者: CsvParser
pub trait FileParser: Send + Sync {
    /// 解析文件为原始表（表头 + 数据行）
    ///
    /// # 返回
    /// - Ok(RawTable): 原始表
    /// - Err: 文件不存在 / 读取失败
    fn parse_to_raw_table(&self, file_path: &Path) -> ImportResult<RawTable>;
}

// ==========================================
// RecordParser Trait
// ==========================================
// 用途: 记录解析接口（阶段 1）
// 实现者: FieldMapper
pub trait RecordParser: Send + Sync {
    /// 将原始表解析为 业务键 → ImportRecord 映射
    ///
    /// # 规则
    /// - 列数与表头不一致的行静默跳过
    /// - 业务键或新数量为空的行丢弃
    /// - 同一业务键后出现的行覆盖先出现的行
    ///
    /// # 返回
    /// - Err(EmptyInput): 总行数（含表头）少于 2
    fn parse_records(&self, table: &RawTable) -> ImportResult<ParsedRecords>;
}

// ==========================================
// ParsedRecords - 记录解析结果
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ParsedRecords {
    pub records: BTreeMap<String, ImportRecord>,
    pub malformed_rows: Vec<usize>, // 列数不一致的行号
    pub incomplete_rows: usize,     // 业务键/新数量缺失的行数
}

impl ParsedRecords {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
