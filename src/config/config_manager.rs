// ==========================================
// 库存管理系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use crate::db::open_sqlite_connection;
use crate::importer::error::{ImportError, ImportResult};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// 全局作用域 ID
const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ImportResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| ImportError::DatabaseConnectionError(e.to_string()))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ImportResult<Self> {
        {
            let conn_guard = conn
                .lock()
                .map_err(|e| ImportError::InternalError(format!("锁获取失败: {}", e)))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    fn lock(&self) -> ImportResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| ImportError::InternalError(format!("锁获取失败: {}", e)))
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> ImportResult<Option<String>> {
        let conn = self.lock()?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
            params![GLOBAL_SCOPE, key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(ImportError::ConfigReadError {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> ImportResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
            params![GLOBAL_SCOPE, key, value],
        )?;
        Ok(())
    }

    /// 获取所有 global 配置的快照
    pub fn get_config_snapshot(&self) -> ImportResult<HashMap<String, String>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;

        let rows = stmt.query_map(params![GLOBAL_SCOPE], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map = HashMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }
        Ok(config_map)
    }

    /// 读取 JSON 字符串数组配置；缺失时返回默认值
    fn get_format_list(&self, key: &str, default: &[&str]) -> ImportResult<Vec<String>> {
        let raw = match self.get_config_value(key)? {
            Some(v) => v,
            None => return Ok(default.iter().map(|s| s.to_string()).collect()),
        };

        let formats: Vec<String> =
            serde_json::from_str(&raw).map_err(|e| ImportError::ConfigValueError {
                key: key.to_string(),
                value: raw.clone(),
                message: e.to_string(),
            })?;

        if formats.is_empty() {
            return Err(ImportError::ConfigValueError {
                key: key.to_string(),
                value: raw,
                message: "格式列表不能为空".to_string(),
            });
        }
        Ok(formats)
    }
}

// ==========================================
// ImportConfigReader Trait 实现
// ==========================================
#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_progress_log_interval(&self) -> ImportResult<usize> {
        let raw = match self.get_config_value(config_keys::PROGRESS_LOG_INTERVAL)? {
            Some(v) => v,
            None => return Ok(defaults::PROGRESS_LOG_INTERVAL),
        };

        match raw.trim().parse::<usize>() {
            Ok(v) if v > 0 => Ok(v),
            _ => Err(ImportError::ConfigValueError {
                key: config_keys::PROGRESS_LOG_INTERVAL.to_string(),
                value: raw,
                message: "需要正整数".to_string(),
            }),
        }
    }

    async fn get_expiry_date_formats(&self) -> ImportResult<Vec<String>> {
        self.get_format_list(config_keys::EXPIRY_DATE_FORMATS, defaults::EXPIRY_DATE_FORMATS)
    }

    async fn get_transaction_date_formats(&self) -> ImportResult<Vec<String>> {
        self.get_format_list(
            config_keys::TRANSACTION_DATE_FORMATS,
            defaults::TRANSACTION_DATE_FORMATS,
        )
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    pub const PROGRESS_LOG_INTERVAL: &str = "import/progress_log_interval";
    pub const EXPIRY_DATE_FORMATS: &str = "import/expiry_date_formats"; // JSON 数组
    pub const TRANSACTION_DATE_FORMATS: &str = "import/transaction_date_formats"; // JSON 数组
}

// ==========================================
// 默认值
// ==========================================
pub mod defaults {
    pub const PROGRESS_LOG_INTERVAL: usize = 50;
    pub const EXPIRY_DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%Y-%m-%d", "%m/%d/%Y"];
    pub const TRANSACTION_DATE_FORMATS: &[&str] =
        &["%d/%m/%Y %I:%M%p", "%d/%m/%Y %l:%M%p", "%Y-%m-%d %H:%M:%S"];
}
