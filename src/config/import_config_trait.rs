// ==========================================
// 库存管理系统 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::importer::error::ImportResult;
use async_trait::async_trait;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 导入模块所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// 获取进度日志间隔（每新建 N 个商品输出一次进度）
    ///
    /// # 默认值
    /// - 50
    async fn get_progress_log_interval(&self) -> ImportResult<usize>;

    /// 获取过期日期解析格式（chrono 格式串，按顺序尝试）
    ///
    /// # 默认值
    /// - ["%d/%m/%Y", "%Y-%m-%d", "%m/%d/%Y"]
    async fn get_expiry_date_formats(&self) -> ImportResult<Vec<String>>;

    /// 获取交易时间解析格式
    ///
    /// # 默认值
    /// - ["%d/%m/%Y %I:%M%p", "%d/%m/%Y %l:%M%p", "%Y-%m-%d %H:%M:%S"]
    async fn get_transaction_date_formats(&self) -> ImportResult<Vec<String>>;
}
