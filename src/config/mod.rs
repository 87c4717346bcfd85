// ==========================================
// 库存管理系统 - 配置层
// ==========================================
// 职责: 导入配置读取 + 数据库路径解析
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod db_path;
pub mod import_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, defaults, ConfigManager};
pub use db_path::{get_default_db_path, resolve_db_path, DB_PATH_ENV};
pub use import_config_trait::ImportConfigReader;
