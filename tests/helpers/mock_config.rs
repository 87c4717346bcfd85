// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

use async_trait::async_trait;
use inventory_import::config::{defaults, ImportConfigReader};
use inventory_import::importer::ImportResult;

/// Mock 配置结构
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub progress_log_interval: usize,
    pub expiry_date_formats: Vec<String>,
    pub transaction_date_formats: Vec<String>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            progress_log_interval: defaults::PROGRESS_LOG_INTERVAL,
            expiry_date_formats: to_owned(defaults::EXPIRY_DATE_FORMATS),
            transaction_date_formats: to_owned(defaults::TRANSACTION_DATE_FORMATS),
        }
    }
}

impl MockConfig {
    /// 每条商品都输出进度
    pub fn verbose_progress() -> Self {
        Self {
            progress_log_interval: 1,
            ..Self::default()
        }
    }
}

fn to_owned(formats: &[&str]) -> Vec<String> {
    formats.iter().map(|s| s.to_string()).collect()
}

#[async_trait]
impl ImportConfigReader for MockConfig {
    async fn get_progress_log_interval(&self) -> ImportResult<usize> {
        Ok(self.progress_log_interval)
    }

    async fn get_expiry_date_formats(&self) -> ImportResult<Vec<String>> {
        Ok(self.expiry_date_formats.clone())
    }

    async fn get_transaction_date_formats(&self) -> ImportResult<Vec<String>> {
        Ok(self.transaction_date_formats.clone())
    }
}
