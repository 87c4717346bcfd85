// ==========================================
// 库存管理系统 - 命令行入口
// ==========================================
// 用法: inventory-import <sortly.csv> [db_path]
// 退出码: 致命错误非 0；条目级问题不影响退出码
// ==========================================

use anyhow::{anyhow, Context};
use inventory_import::config::{resolve_db_path, ConfigManager};
use inventory_import::db::{ensure_catalog_schema, open_sqlite_connection, read_schema_version};
use inventory_import::importer::{CatalogImporter, CatalogImporterImpl};
use inventory_import::repository::CatalogImportRepositoryImpl;
use inventory_import::{logging, APP_NAME, VERSION};
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info};

/// 日志格式环境变量（json / 其他）
const LOG_FORMAT_ENV: &str = "INVENTORY_LOG_FORMAT";

#[tokio::main]
async fn main() {
    let json_logs = std::env::var(LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json_logs {
        logging::init_json();
    } else {
        logging::init();
    }

    if let Err(e) = run().await {
        error!(error = %e, "导入失败");
        eprintln!("错误: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let csv_path = args
        .next()
        .ok_or_else(|| anyhow!("用法: {} <sortly.csv> [db_path]", APP_NAME))?;
    let db_path = resolve_db_path(args.next().as_deref());

    info!("==================================================");
    info!("{} v{}", APP_NAME, VERSION);
    info!("==================================================");
    info!(db_path = %db_path, "使用数据库");

    // 数据库初始化
    let conn = open_sqlite_connection(&db_path)
        .with_context(|| format!("无法打开数据库: {}", db_path))?;
    ensure_catalog_schema(&conn).context("数据库结构初始化失败")?;
    let schema_version = read_schema_version(&conn).context("读取 schema_version 失败")?;
    info!(schema_version = ?schema_version, "数据库结构就绪");
    let conn = Arc::new(Mutex::new(conn));

    let import_repo = CatalogImportRepositoryImpl::from_connection(conn.clone())?;
    let config = ConfigManager::from_connection(conn)?;
    debug!(overrides = ?config.get_config_snapshot()?, "导入配置覆写");
    let importer = CatalogImporterImpl::with_sortly_csv(import_repo, config);

    let report = importer.import_from_csv(&csv_path).await?;

    // 汇总输出到 stdout
    println!("{}", serde_json::to_string_pretty(&report.summary)?);
    if !report.warnings.is_empty() {
        info!(warnings = report.warnings.len(), "存在条目级问题，详见日志");
    }

    Ok(())
}
