// ==========================================
// 库存管理系统 - 数据库路径解析
// ==========================================
// 优先级: 命令行参数 → INVENTORY_DB_PATH → 用户数据目录 → ./inventory.db
// ==========================================

use std::path::PathBuf;

/// 指定数据库路径的环境变量
pub const DB_PATH_ENV: &str = "INVENTORY_DB_PATH";

/// 获取默认数据库路径
pub fn get_default_db_path() -> String {
    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./inventory.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("inventory-import");
        // 目录创建失败时保留当前目录回退值
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("inventory.db");
        }
    }

    path.to_string_lossy().to_string()
}

/// 解析数据库路径：显式参数优先
pub fn resolve_db_path(explicit: Option<&str>) -> String {
    explicit
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(get_default_db_path)
}
