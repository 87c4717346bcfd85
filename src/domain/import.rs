// ==========================================
// 库存管理系统 - 导入领域模型
// ==========================================
// 依据: Sortly 库存导出格式（交易流水 CSV）
// ==========================================
// 职责: 导入管道中间产物 + 导入结果
// 生命周期: 仅在单次导入流程内
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ==========================================
// RawTable - 文件解析产物
// ==========================================
// 用途: 文件解析 → 此结构 → 记录解析
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub header: Vec<String>,           // 表头（列名，已 TRIM）
    pub rows: Vec<RawRow>,             // 数据行（不含表头，单元格保持原值）
    pub undecodable_rows: Vec<usize>, // 无法解码而跳过的行号
}

#[derive(Debug, Clone)]
pub struct RawRow {
    pub row_number: usize, // 原始文件行号（表头为第 1 行）
    pub cells: Vec<String>,
}

impl RawTable {
    /// 数据行数（不含表头，含无法解码的行）
    pub fn data_row_count(&self) -> usize {
        self.rows.len() + self.undecodable_rows.len()
    }

    /// 总行数（含表头）；表头为空时视为 0 行
    pub fn total_row_count(&self) -> usize {
        if self.header.is_empty() {
            self.data_row_count()
        } else {
            self.data_row_count() + 1
        }
    }
}

// ==========================================
// ImportRecord - Sortly 导出行
// ==========================================
// 业务键: sortly_id（同批次内后出现的行覆盖先出现的行）
// 说明: 所有字段保持原始文本，数值解析在商品转换时进行
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportRecord {
    // ===== 业务键 =====
    pub sortly_id: String, // Sortly ID (SID)

    // ===== 商品信息 =====
    pub entry_name: String,
    pub variant_details: String,
    pub unit: String,
    pub min_level: String, // 最低库存（文本）
    pub price: String,     // 单价（文本）
    pub value: String,
    pub notes: String,
    pub tags: String,

    // ===== 条码 =====
    pub barcode_qr1_data: String,
    pub barcode_qr1_type: String,
    pub barcode_qr2_data: String,
    pub barcode_qr2_type: String,

    // ===== 交易流水 =====
    pub transaction_date: String,
    pub transaction_type: String,
    pub qty_change: String,
    pub new_qty: String,
    pub user: String,
    pub transaction_note: String,

    // ===== 归属 =====
    pub folder: String, // 文件夹标签（映射为分类 + 品牌）
    pub folder_sid: String,
    pub location: String,

    pub expiry_date: String,

    // 元信息
    pub row_number: usize,
}

impl ImportRecord {
    /// 是否满足入选条件（业务键与新数量均非空）
    pub fn is_complete(&self) -> bool {
        !self.sortly_id.is_empty() && !self.new_qty.is_empty()
    }

    /// 按给定格式顺序解析过期日期
    ///
    /// # 返回
    /// - Some(NaiveDate): 任一格式解析成功
    /// - None: 字段为空或所有格式均失败
    pub fn parse_expiry_date(&self, formats: &[String]) -> Option<NaiveDate> {
        let value = self.expiry_date.trim();
        if value.is_empty() {
            return None;
        }

        formats
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
    }

    /// 按给定格式顺序解析交易时间
    pub fn parse_transaction_date(&self, formats: &[String]) -> Option<NaiveDateTime> {
        let value = self.transaction_date.trim();
        if value.is_empty() {
            return None;
        }

        formats
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
    }
}

// ==========================================
// WarningKind - 条目级问题类型
// ==========================================
// 说明: 条目级问题只记录、不阻断批次
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    MalformedRow,              // 列数与表头不一致 / CSV 行无法解码
    MissingFolder,             // 无文件夹标签，无法确定分类
    CategoryUnresolved,        // 分类创建失败
    BrandUnresolved,           // 品牌创建失败（商品仍导入，品牌为空）
    UnparsableExpiryDate,      // 过期日期无法解析（易腐标志仍按有无判断）
    UnparsableTransactionDate, // 交易时间无法解析（不影响落库）
    UpsertFailed,              // 商品落库失败
}

// ==========================================
// ImportWarning - 条目级问题记录
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportWarning {
    pub row_number: usize,         // 原始文件行号（0 表示非行级问题）
    pub sortly_id: Option<String>, // 业务键（如可解析）
    pub kind: WarningKind,
    pub message: String,
}

// ==========================================
// ImportSummary - 导入汇总统计
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub rows_read: usize,          // 读取的数据行数（不含表头）
    pub items_parsed: usize,       // 去重后的条目数
    pub categories_created: usize, // 新建分类数
    pub brands_created: usize,     // 新建品牌数
    pub products_created: usize,   // 新建商品数
    pub products_updated: usize,   // 更新商品数（SKU 冲突分支）
    pub skipped: usize,            // 因分类缺失跳过的条目数
    pub failed: usize,             // 落库失败的条目数
}

// ==========================================
// ImportReport - 导入结果
// ==========================================
// 用途: 导入接口返回值（日志之外的结构化结果）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    pub batch_id: String,
    pub file_path: String,
    pub summary: ImportSummary,
    pub warnings: Vec<ImportWarning>,
    pub elapsed_time: Duration,
}
