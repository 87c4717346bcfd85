// ==========================================
// 库存管理系统 - 领域模型层
// ==========================================
// 职责: 定义商品目录实体与导入中间产物
// 红线: 不含数据访问逻辑
// ==========================================

pub mod catalog;
pub mod import;

// 重导出核心类型
pub use catalog::{Brand, Category, EnsureOutcome, Product, UpsertOutcome};
pub use import::{
    ImportRecord, ImportReport, ImportSummary, ImportWarning, RawRow, RawTable, WarningKind,
};
