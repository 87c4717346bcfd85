// ==========================================
// 库存管理系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化
// ==========================================

pub mod catalog_import_repo;
pub mod catalog_import_repo_impl;
pub mod error;

// 重导出核心仓储
pub use catalog_import_repo::CatalogImportRepository;
pub use catalog_import_repo_impl::CatalogImportRepositoryImpl;
pub use error::{RepositoryError, RepositoryResult};
