// ==========================================
// CatalogImporter 集成测试
// ==========================================
// 测试目标: 验证 Sortly CSV → 商品目录 的完整导入流程
// ==========================================

mod helpers;

use helpers::{FailingCategoryRepo, MockConfig};
use inventory_import::config::{config_keys, ConfigManager};
use inventory_import::domain::{Brand, Category, WarningKind};
use inventory_import::importer::{CatalogImporter, CatalogImporterImpl, ImportError};
use inventory_import::logging;
use inventory_import::repository::{CatalogImportRepository, CatalogImportRepositoryImpl};
use test_helpers::{
    create_test_db, sortly_csv, sortly_row, write_csv, write_csv_bytes, SORTLY_FIXTURE,
};

/// 创建测试用的 CatalogImporter 实例
fn create_test_importer(
    db_path: &str,
) -> CatalogImporterImpl<CatalogImportRepositoryImpl, ConfigManager> {
    let import_repo =
        CatalogImportRepositoryImpl::new(db_path).expect("Failed to create CatalogImportRepository");
    let config = ConfigManager::new(db_path).expect("Failed to create ConfigManager");

    CatalogImporterImpl::with_sortly_csv(import_repo, config)
}

#[tokio::test]
async fn test_import_fixture_basic() {
    logging::init_test();

    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let importer = create_test_importer(&db_path);

    let report = importer
        .import_from_csv(SORTLY_FIXTURE)
        .await
        .expect("Import should succeed");
    let summary = &report.summary;

    assert_eq!(summary.rows_read, 8, "8 data rows in fixture");
    assert_eq!(summary.items_parsed, 5, "SID001 dedup, SID006 incomplete, SID007 malformed");
    assert_eq!(summary.categories_created, 3);
    assert_eq!(summary.brands_created, 3);
    assert_eq!(summary.products_created, 4);
    assert_eq!(summary.products_updated, 0);
    assert_eq!(summary.skipped, 1, "SID005 has no folder");
    assert_eq!(summary.failed, 0);

    let repo = importer.repository();
    assert_eq!(repo.count_products().await.unwrap(), 4);
    assert!(repo.find_product_by_sku("SID005").await.unwrap().is_none());
    assert!(repo.find_product_by_sku("SID006").await.unwrap().is_none());
    assert!(repo.find_product_by_sku("SID007").await.unwrap().is_none());

    assert!(report
        .warnings
        .iter()
        .any(|w| w.kind == WarningKind::MalformedRow && w.row_number == 8));
    assert!(report
        .warnings
        .iter()
        .any(|w| w.kind == WarningKind::MissingFolder && w.sortly_id.as_deref() == Some("SID005")));
}

#[tokio::test]
async fn test_import_derives_product_fields() {
    logging::init_test();

    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let importer = create_test_importer(&db_path);
    importer.import_from_csv(SORTLY_FIXTURE).await.unwrap();
    let repo = importer.repository();

    // 后出现的重复行生效
    let vodka = repo.find_product_by_sku("SID001").await.unwrap().unwrap();
    assert_eq!(vodka.name, "Absolut Vodka 700ml");
    assert_eq!(vodka.standard_cost, Some(19.0));
    assert_eq!(vodka.reorder_point, 5);
    assert_eq!(vodka.volume_ml, Some(700));
    assert_eq!(vodka.notes.as_deref(), Some("Classic vodka"));
    assert!(vodka.is_active);
    assert!(!vodka.is_perishable);

    let gin = repo.find_product_by_sku("SID002").await.unwrap().unwrap();
    assert_eq!(gin.volume_ml, Some(750));
    assert_eq!(gin.description, None);

    let merlot = repo.find_product_by_sku("SID003").await.unwrap().unwrap();
    assert_eq!(merlot.volume_ml, Some(750), "volume from variant details");
    assert_eq!(merlot.description.as_deref(), Some("Red wine, aged"));

    let limes = repo.find_product_by_sku("SID004").await.unwrap().unwrap();
    assert_eq!(limes.standard_cost, None);
    assert_eq!(limes.reorder_point, 0);
    assert_eq!(limes.volume_ml, None);
    assert!(limes.is_perishable);
}

#[tokio::test]
async fn test_shared_folder_yields_one_category_and_brand() {
    logging::init_test();

    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let importer = create_test_importer(&db_path);
    importer.import_from_csv(SORTLY_FIXTURE).await.unwrap();
    let repo = importer.repository();

    let categories = repo.list_categories().await.unwrap();
    let spirits: Vec<_> = categories.iter().filter(|c| c.name == "Spirits").collect();
    assert_eq!(spirits.len(), 1);

    let brands = repo.list_brands().await.unwrap();
    let spirits_brand: Vec<_> = brands.iter().filter(|b| b.name == "Spirits").collect();
    assert_eq!(spirits_brand.len(), 1);

    let vodka = repo.find_product_by_sku("SID001").await.unwrap().unwrap();
    let gin = repo.find_product_by_sku("SID002").await.unwrap().unwrap();
    assert_eq!(vodka.category_id, spirits[0].id);
    assert_eq!(gin.category_id, spirits[0].id);
    assert_eq!(vodka.brand_id.as_deref(), Some(spirits_brand[0].id.as_str()));
}

#[tokio::test]
async fn test_rerun_is_idempotent() {
    logging::init_test();

    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let importer = create_test_importer(&db_path);

    let first = importer.import_from_csv(SORTLY_FIXTURE).await.unwrap();
    let vodka_before = importer
        .repository()
        .find_product_by_sku("SID001")
        .await
        .unwrap()
        .unwrap();

    let second = importer.import_from_csv(SORTLY_FIXTURE).await.unwrap();
    assert_ne!(first.batch_id, second.batch_id);
    assert_eq!(second.summary.categories_created, 0);
    assert_eq!(second.summary.brands_created, 0);
    assert_eq!(second.summary.products_created, 0);
    assert_eq!(second.summary.products_updated, 4);

    let repo = importer.repository();
    assert_eq!(repo.count_products().await.unwrap(), 4);
    assert_eq!(repo.list_categories().await.unwrap().len(), 3);
    assert_eq!(repo.list_brands().await.unwrap().len(), 3);

    // 更新分支保持原记录 ID 与所属分类
    let vodka_after = repo.find_product_by_sku("SID001").await.unwrap().unwrap();
    assert_eq!(vodka_after.id, vodka_before.id);
    assert_eq!(vodka_after.category_id, vodka_before.category_id);
    assert_eq!(vodka_after.created_at, vodka_before.created_at);
}

#[tokio::test]
async fn test_existing_brand_and_category_are_reused() {
    logging::init_test();

    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let importer = create_test_importer(&db_path);
    let repo = importer.repository();

    let brand = Brand::new("Spirits");
    let category = Category::new("Wine");
    repo.insert_brand_if_absent(&brand).await.unwrap();
    repo.insert_category_if_absent(&category).await.unwrap();

    let report = importer.import_from_csv(SORTLY_FIXTURE).await.unwrap();
    assert_eq!(report.summary.brands_created, 2);
    assert_eq!(report.summary.categories_created, 2);

    let vodka = repo.find_product_by_sku("SID001").await.unwrap().unwrap();
    assert_eq!(vodka.brand_id.as_deref(), Some(brand.id.as_str()));

    let merlot = repo.find_product_by_sku("SID003").await.unwrap().unwrap();
    assert_eq!(merlot.category_id, category.id);
}

#[tokio::test]
async fn test_failed_category_skips_only_its_items() {
    logging::init_test();

    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let inner = CatalogImportRepositoryImpl::new(&db_path).unwrap();
    let importer = CatalogImporterImpl::with_sortly_csv(
        FailingCategoryRepo::new(inner, "Wine"),
        MockConfig::default(),
    );

    let report = importer.import_from_csv(SORTLY_FIXTURE).await.unwrap();
    assert_eq!(report.summary.categories_created, 2);
    assert_eq!(report.summary.products_created, 3);
    assert_eq!(report.summary.skipped, 2, "SID003 (Wine) + SID005 (no folder)");

    let repo = importer.repository().inner();
    assert!(repo.find_product_by_sku("SID003").await.unwrap().is_none());
    assert!(repo.find_product_by_sku("SID001").await.unwrap().is_some());
    assert!(repo.find_product_by_sku("SID004").await.unwrap().is_some());

    assert!(report
        .warnings
        .iter()
        .any(|w| w.kind == WarningKind::CategoryUnresolved
            && w.sortly_id.as_deref() == Some("SID003")));
}

#[tokio::test]
async fn test_brand_listing_failure_still_resolves_stored_brand() {
    logging::init_test();

    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let inner = CatalogImportRepositoryImpl::new(&db_path).unwrap();
    let existing = Brand::new("Spirits");
    inner.insert_brand_if_absent(&existing).await.unwrap();

    let importer = CatalogImporterImpl::with_sortly_csv(
        FailingCategoryRepo::new(inner, "").with_brand_listing_failure(),
        MockConfig::verbose_progress(),
    );

    let report = importer.import_from_csv(SORTLY_FIXTURE).await.unwrap();
    assert_eq!(report.summary.products_created, 4);
    assert_eq!(report.summary.brands_created, 2);

    let repo = importer.repository().inner();
    assert_eq!(repo.list_brands().await.unwrap().len(), 3);
    let vodka = repo.find_product_by_sku("SID001").await.unwrap().unwrap();
    assert_eq!(vodka.brand_id.as_deref(), Some(existing.id.as_str()));
}

#[tokio::test]
async fn test_unparsable_expiry_date_is_reported_but_perishable() {
    logging::init_test();

    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let importer = create_test_importer(&db_path);

    let csv = write_csv(&sortly_csv(&[
        sortly_row("Yogurt", "SID100", "2.50", "12", "Dairy", "someday"),
        sortly_row("Milk 1000ml", "SID101", "1.20", "8", "Dairy", "2026-01-31"),
    ]))
    .unwrap();

    let report = importer.import_from_csv(csv.path()).await.unwrap();
    assert_eq!(report.summary.products_created, 2);

    let expiry_warnings: Vec<_> = report
        .warnings
        .iter()
        .filter(|w| w.kind == WarningKind::UnparsableExpiryDate)
        .collect();
    assert_eq!(expiry_warnings.len(), 1);
    assert_eq!(expiry_warnings[0].sortly_id.as_deref(), Some("SID100"));

    let repo = importer.repository();
    let yogurt = repo.find_product_by_sku("SID100").await.unwrap().unwrap();
    assert!(yogurt.is_perishable);
    let milk = repo.find_product_by_sku("SID101").await.unwrap().unwrap();
    assert!(milk.is_perishable);
    assert_eq!(milk.volume_ml, Some(1000));
}

#[tokio::test]
async fn test_unparsable_transaction_date_is_reported_but_imported() {
    logging::init_test();

    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let importer = create_test_importer(&db_path);

    let csv = write_csv(
        "Entry Name,Sortly ID (SID),New QTY,Folder,Transaction Date (CEST)\n\
         Vodka 700ml,SID200,5,Spirits,yesterday\n\
         Gin 700ml,SID201,3,Spirits,15/03/2024 02:30PM\n\
         Rum 700ml,SID202,4,Spirits,\n",
    )
    .unwrap();

    let report = importer.import_from_csv(csv.path()).await.unwrap();
    assert_eq!(report.summary.products_created, 3);

    let transaction_warnings: Vec<_> = report
        .warnings
        .iter()
        .filter(|w| w.kind == WarningKind::UnparsableTransactionDate)
        .collect();
    assert_eq!(transaction_warnings.len(), 1);
    assert_eq!(transaction_warnings[0].sortly_id.as_deref(), Some("SID200"));
    assert_eq!(transaction_warnings[0].row_number, 2);

    let repo = importer.repository();
    assert!(repo.find_product_by_sku("SID200").await.unwrap().is_some());
}

#[tokio::test]
async fn test_undecodable_row_is_reported_and_others_imported() {
    logging::init_test();

    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let importer = create_test_importer(&db_path);

    let mut content = sortly_csv(&[sortly_row("Vodka 700ml", "SID300", "20", "5", "Spirits", "")])
        .into_bytes();
    content.extend_from_slice(b"\xff\xfe Broken,,SID301\n");
    content.extend_from_slice(sortly_row("Gin 700ml", "SID302", "18", "3", "Spirits", "").as_bytes());
    content.push(b'\n');
    let csv = write_csv_bytes(&content).unwrap();

    let report = importer.import_from_csv(csv.path()).await.unwrap();
    assert_eq!(report.summary.rows_read, 3, "undecodable row still counts as read");
    assert_eq!(report.summary.items_parsed, 2);
    assert_eq!(report.summary.products_created, 2);

    let malformed: Vec<_> = report
        .warnings
        .iter()
        .filter(|w| w.kind == WarningKind::MalformedRow)
        .collect();
    assert_eq!(malformed.len(), 1);
    assert_eq!(malformed[0].row_number, 3);
    assert!(malformed[0].sortly_id.is_none());

    let repo = importer.repository();
    assert!(repo.find_product_by_sku("SID300").await.unwrap().is_some());
    assert!(repo.find_product_by_sku("SID301").await.unwrap().is_none());
    assert!(repo.find_product_by_sku("SID302").await.unwrap().is_some());
}

#[tokio::test]
async fn test_padded_sortly_ids_are_distinct_products() {
    logging::init_test();

    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let importer = create_test_importer(&db_path);

    let csv = write_csv(&sortly_csv(&[
        sortly_row("Vodka", "SID400", "20", "5", "Spirits", ""),
        sortly_row("Vodka padded", " SID400 ", "21", "6", "Spirits", ""),
    ]))
    .unwrap();

    let report = importer.import_from_csv(csv.path()).await.unwrap();
    assert_eq!(report.summary.items_parsed, 2);
    assert_eq!(report.summary.products_created, 2);

    let repo = importer.repository();
    let plain = repo.find_product_by_sku("SID400").await.unwrap().unwrap();
    assert_eq!(plain.name, "Vodka");
    let padded = repo.find_product_by_sku(" SID400 ").await.unwrap().unwrap();
    assert_eq!(padded.name, "Vodka padded");
}

#[tokio::test]
async fn test_header_only_file_is_fatal() {
    logging::init_test();

    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let importer = create_test_importer(&db_path);

    let csv = write_csv(&sortly_csv(&[])).unwrap();
    let result = importer.import_from_csv(csv.path()).await;
    assert!(matches!(result, Err(ImportError::EmptyInput(1))));

    let empty = write_csv("").unwrap();
    let result = importer.import_from_csv(empty.path()).await;
    assert!(matches!(result, Err(ImportError::EmptyInput(0))));
}

#[tokio::test]
async fn test_missing_file_is_fatal() {
    logging::init_test();

    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let importer = create_test_importer(&db_path);

    let result = importer.import_from_csv("tests/fixtures/does_not_exist.csv").await;
    assert!(matches!(result, Err(ImportError::FileNotFound(_))));
}

#[tokio::test]
async fn test_invalid_progress_interval_config_is_fatal() {
    logging::init_test();

    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config = ConfigManager::new(&db_path).unwrap();
    config
        .set_global_config_value(config_keys::PROGRESS_LOG_INTERVAL, "0")
        .unwrap();

    let importer = CatalogImporterImpl::with_sortly_csv(
        CatalogImportRepositoryImpl::new(&db_path).unwrap(),
        config,
    );

    let result = importer.import_from_csv(SORTLY_FIXTURE).await;
    assert!(matches!(result, Err(ImportError::ConfigValueError { .. })));
    assert_eq!(
        importer.repository().count_products().await.unwrap(),
        0,
        "nothing is written before configuration is validated"
    );
}
