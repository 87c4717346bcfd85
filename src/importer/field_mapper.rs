// ==========================================
// 库存管理系统 - 字段映射器实现
// ==========================================
// 依据: Sortly 导出格式 - 标准列名
// 职责: 原始表 → ImportRecord（按列名映射，按业务键去重）
// ==========================================

use crate::domain::import::{ImportRecord, RawTable};
use crate::importer::catalog_importer_trait::{ParsedRecords, RecordParser};
use crate::importer::error::{ImportError, ImportResult};
use tracing::debug;

/// 列值写入函数
pub type FieldSetter = fn(&mut ImportRecord, String);

// ==========================================
// Sortly 标准列映射表（列名 → 写入函数）
// ==========================================
// 未出现在表中的列名忽略
pub const SORTLY_COLUMNS: &[(&str, FieldSetter)] = &[
    ("Entry Name", |r, v| r.entry_name = v),
    ("Variant Details", |r, v| r.variant_details = v),
    ("Sortly ID (SID)", |r, v| r.sortly_id = v),
    ("Unit", |r, v| r.unit = v),
    ("Min Level", |r, v| r.min_level = v),
    ("Price", |r, v| r.price = v),
    ("Value", |r, v| r.value = v),
    ("Notes", |r, v| r.notes = v),
    ("Tags", |r, v| r.tags = v),
    ("Barcode/QR1-Data", |r, v| r.barcode_qr1_data = v),
    ("Barcode/QR1-Type", |r, v| r.barcode_qr1_type = v),
    ("Barcode/QR2-Data", |r, v| r.barcode_qr2_data = v),
    ("Barcode/QR2-Type", |r, v| r.barcode_qr2_type = v),
    ("Transaction Date (CEST)", |r, v| r.transaction_date = v),
    ("Transaction Type", |r, v| r.transaction_type = v),
    ("QTY change (Quantity Delta)", |r, v| r.qty_change = v),
    ("New QTY", |r, v| r.new_qty = v),
    ("Folder", |r, v| r.folder = v),
    ("Folder SID", |r, v| r.folder_sid = v),
    ("User", |r, v| r.user = v),
    ("Transaction Note", |r, v| r.transaction_note = v),
    ("Location", |r, v| r.location = v),
    ("Expiry Date", |r, v| r.expiry_date = v),
];

/// 查找列名对应的写入函数
fn setter_for(header: &str) -> Option<FieldSetter> {
    SORTLY_COLUMNS
        .iter()
        .find(|(name, _)| *name == header)
        .map(|(_, setter)| *setter)
}

pub struct FieldMapper;

impl FieldMapper {
    /// 按表头生成逐列写入计划（每个文件只生成一次）
    pub fn column_plan(&self, header: &[String]) -> Vec<Option<FieldSetter>> {
        header.iter().map(|h| setter_for(h)).collect()
    }

    /// 将单行映射为 ImportRecord
    pub fn map_row(
        &self,
        plan: &[Option<FieldSetter>],
        cells: &[String],
        row_number: usize,
    ) -> ImportRecord {
        let mut record = ImportRecord {
            row_number,
            ..Default::default()
        };

        for (setter, value) in plan.iter().zip(cells) {
            if let Some(set) = setter {
                set(&mut record, value.clone());
            }
        }

        record
    }
}

impl RecordParser for FieldMapper {
    fn parse_records(&self, table: &RawTable) -> ImportResult<ParsedRecords> {
        let total_rows = table.total_row_count();
        if total_rows < 2 {
            return Err(ImportError::EmptyInput(total_rows));
        }

        let plan = self.column_plan(&table.header);
        let mut parsed = ParsedRecords::default();

        for row in &table.rows {
            // 列数不一致：静默跳过
            if row.cells.len() != table.header.len() {
                debug!(
                    row_number = row.row_number,
                    expected = table.header.len(),
                    actual = row.cells.len(),
                    "列数与表头不一致，跳过"
                );
                parsed.malformed_rows.push(row.row_number);
                continue;
            }

            let record = self.map_row(&plan, &row.cells, row.row_number);
            if !record.is_complete() {
                parsed.incomplete_rows += 1;
                continue;
            }

            // 同一业务键：后出现的行覆盖
            parsed.records.insert(record.sortly_id.clone(), record);
        }

        Ok(parsed)
    }
}
