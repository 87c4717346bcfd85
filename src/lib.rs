// ==========================================
// 库存管理系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: Sortly 库存导出 → 商品目录 一次性导入
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 导入配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域实体
pub use domain::{Brand, Category, ImportRecord, ImportReport, ImportSummary, Product};

// 导入
pub use importer::{CatalogImporter, CatalogImporterImpl, ImportError, ImportResult};

// 仓储
pub use repository::{CatalogImportRepository, CatalogImportRepositoryImpl};

// 配置
pub use config::{ConfigManager, ImportConfigReader};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "inventory-import";
