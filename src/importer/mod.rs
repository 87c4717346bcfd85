// ==========================================
// 库存管理系统 - 导入层
// ==========================================
// 职责: Sortly 导出文件 → 商品目录
// 支持: CSV
// ==========================================

// 模块声明
pub mod catalog_importer_impl;
pub mod catalog_importer_trait;
pub mod entity_resolver;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod product_upserter;
pub mod volume_extractor;

// 重导出核心类型
pub use catalog_importer_impl::CatalogImporterImpl;
pub use entity_resolver::{EntityResolver, ResolvedEntities};
pub use error::{ImportError, ImportResult};
pub use field_mapper::{FieldMapper, SORTLY_COLUMNS};
pub use file_parser::CsvParser;
pub use product_upserter::{build_product, ProductUpserter};
pub use volume_extractor::extract_volume_ml;

// 重导出 Trait 接口
pub use catalog_importer_trait::{CatalogImporter, FileParser, ParsedRecords, RecordParser};
