// ==========================================
// 库存管理系统 - 商品转换与落库
// ==========================================
// 职责: ImportRecord → Product（纯转换） + 按 SKU 插入或更新
// ==========================================

use crate::domain::catalog::{Product, UpsertOutcome};
use crate::domain::import::ImportRecord;
use crate::importer::volume_extractor::extract_volume_ml;
use crate::repository::error::RepositoryResult;
use crate::repository::CatalogImportRepository;
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

/// 将导入记录转换为商品
///
/// # 派生规则
/// - description / notes ← 备注（非空时）
/// - standard_cost ← 单价（可解析且 > 0）
/// - reorder_point ← 最低库存（整数且 > 0，否则 0）
/// - volume_ml ← 名称 + 规格中提取的容量（> 0）
/// - is_perishable ← 过期日期非空
/// - is_active ← true
pub fn build_product(record: &ImportRecord, category_id: &str, brand_id: Option<&str>) -> Product {
    let now = Utc::now();
    let notes = non_empty(&record.notes);

    let standard_cost = record
        .price
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p > 0.0);

    let reorder_point = record
        .min_level
        .trim()
        .parse::<i32>()
        .ok()
        .filter(|m| *m > 0)
        .unwrap_or(0);

    let volume_ml = Some(extract_volume_ml(&record.entry_name, &record.variant_details))
        .filter(|v| *v > 0);

    Product {
        id: Uuid::new_v4().to_string(),
        sku: record.sortly_id.clone(),
        name: record.entry_name.clone(),
        description: notes.clone(),
        category_id: category_id.to_string(),
        brand_id: brand_id.map(str::to_string),
        volume_ml,
        weight_kg: None,
        dimensions_cm: None,
        standard_cost,
        standard_price: None,
        markup_percentage: None,
        reorder_point,
        primary_supplier_id: None,
        supplier_sku: None,
        is_active: true,
        is_perishable: !record.expiry_date.is_empty(),
        notes,
        created_at: now,
        updated_at: now,
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

// ==========================================
// ProductUpserter - 商品落库
// ==========================================
pub struct ProductUpserter;

impl ProductUpserter {
    /// 插入商品；SKU 已存在时更新
    pub async fn upsert<R>(&self, repo: &R, product: &Product) -> RepositoryResult<UpsertOutcome>
    where
        R: CatalogImportRepository + ?Sized,
    {
        let outcome = repo.upsert_product(product).await?;
        debug!(sku = %product.sku, outcome = ?outcome, "商品落库完成");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ensure_catalog_schema;
    use crate::domain::catalog::Category;
    use crate::repository::CatalogImportRepositoryImpl;
    use rusqlite::Connection;
    use std::sync::{Arc, Mutex};

    fn record() -> ImportRecord {
        ImportRecord {
            sortly_id: "SID100".to_string(),
            entry_name: "Vodka 750ml".to_string(),
            new_qty: "6".to_string(),
            price: "19.99".to_string(),
            min_level: "4".to_string(),
            notes: "Top shelf".to_string(),
            folder: "Spirits".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_build_product_derives_fields() {
        let product = build_product(&record(), "cat-1", Some("brand-1"));

        assert_eq!(product.sku, "SID100");
        assert_eq!(product.name, "Vodka 750ml");
        assert_eq!(product.category_id, "cat-1");
        assert_eq!(product.brand_id.as_deref(), Some("brand-1"));
        assert_eq!(product.standard_cost, Some(19.99));
        assert_eq!(product.reorder_point, 4);
        assert_eq!(product.volume_ml, Some(750));
        assert_eq!(product.description.as_deref(), Some("Top shelf"));
        assert_eq!(product.notes.as_deref(), Some("Top shelf"));
        assert!(product.is_active);
        assert!(!product.is_perishable);
    }

    #[test]
    fn test_invalid_price_leaves_cost_absent() {
        for price in ["-5", "abc", "0", ""] {
            let mut r = record();
            r.price = price.to_string();
            assert_eq!(build_product(&r, "c", None).standard_cost, None, "price {:?}", price);
        }
    }

    #[test]
    fn test_min_level_defaults_to_zero() {
        for min_level in ["0", "-3", "2.5", "many", ""] {
            let mut r = record();
            r.min_level = min_level.to_string();
            assert_eq!(build_product(&r, "c", None).reorder_point, 0, "min level {:?}", min_level);
        }
    }

    #[test]
    fn test_no_volume_no_notes_no_brand() {
        let mut r = record();
        r.entry_name = "Lime".to_string();
        r.notes.clear();

        let product = build_product(&r, "c", None);
        assert_eq!(product.volume_ml, None);
        assert_eq!(product.description, None);
        assert_eq!(product.notes, None);
        assert_eq!(product.brand_id, None);
    }

    #[test]
    fn test_perishable_follows_expiry_presence() {
        let mut r = record();
        r.expiry_date = "not a date".to_string();
        assert!(build_product(&r, "c", None).is_perishable);
    }

    #[tokio::test]
    async fn test_upsert_reports_insert_then_update() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_catalog_schema(&conn).unwrap();
        let repo =
            CatalogImportRepositoryImpl::from_connection(Arc::new(Mutex::new(conn))).unwrap();
        let category = Category::new("Spirits");
        repo.insert_category_if_absent(&category).await.unwrap();

        let product = build_product(&record(), &category.id, None);
        let outcome = ProductUpserter.upsert(&repo, &product).await.unwrap();
        assert_eq!(outcome, UpsertOutcome::Inserted);

        let again = build_product(&record(), &category.id, None);
        let outcome = ProductUpserter.upsert(&repo, &again).await.unwrap();
        assert_eq!(outcome, UpsertOutcome::Updated);
        assert_eq!(repo.count_products().await.unwrap(), 1);
    }
}
