// ==========================================
// 库存管理系统 - 文件解析器实现
// ==========================================
// 阶段 0: 文件读取与解析
// 支持: CSV (.csv)
// ==========================================

use crate::domain::import::{RawRow, RawTable};
use crate::importer::catalog_importer_trait::FileParser;
use crate::importer::error::{ImportError, ImportResult};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;
use tracing::warn;

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_table(&self, file_path: &Path) -> ImportResult<RawTable> {
        let path = file_path;

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        // 检查扩展名
        if let Some(ext) = path.extension() {
            if !ext.eq_ignore_ascii_case("csv") {
                return Err(ImportError::UnsupportedFormat(
                    ext.to_string_lossy().to_string(),
                ));
            }
        }

        // 打开 CSV 文件
        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(false) // 表头由本解析器自行处理，行数判定需要包含表头
            .flexible(true) // 允许行长度不一致（由记录解析阶段跳过）
            .from_reader(file);

        let mut table = RawTable::default();
        for (idx, result) in reader.records().enumerate() {
            let row_number = idx + 1;
            let record = match result {
                Ok(record) => record,
                // 读取失败或表头无法解码：致命
                Err(e) if e.is_io_error() || row_number == 1 => return Err(e.into()),
                Err(e) => {
                    // 单行无法解码：条目级问题，记录行号后跳过
                    warn!(row_number, error = %e, "CSV 行解码失败，已跳过");
                    table.undecodable_rows.push(row_number);
                    continue;
                }
            };

            // 仅表头 TRIM；数据单元格保持原值
            if row_number == 1 {
                table.header = record.iter().map(|v| v.trim().to_string()).collect();
                continue;
            }

            let cells: Vec<String> = record.iter().map(str::to_string).collect();
            table.rows.push(RawRow { row_number, cells });
        }

        Ok(table)
    }
}
