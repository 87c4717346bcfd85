// ==========================================
// 库存管理系统 - 目录导入 Repository 实现
// ==========================================
// 职责: 实现导入相关数据访问（使用 rusqlite）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::catalog::{Brand, Category, EnsureOutcome, Product, UpsertOutcome};
use crate::repository::catalog_import_repo::CatalogImportRepository;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const PRODUCT_COLUMNS: &str = r#"
    id, sku, name, description, category_id, brand_id, volume_ml,
    weight_kg, dimensions_cm, standard_cost, standard_price,
    markup_percentage, reorder_point, primary_supplier_id,
    supplier_sku, is_active, is_perishable, notes, created_at, updated_at
"#;

// ==========================================
// CatalogImportRepositoryImpl
// ==========================================
pub struct CatalogImportRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl CatalogImportRepositoryImpl {
    /// 创建新的 Repository 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 Repository
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            crate::db::configure_sqlite_connection(&guard)?;
        }

        Ok(Self { conn })
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入或忽略后，按名称回查实际 ID
    fn ensure_named_row(
        conn: &Connection,
        insert_sql: &str,
        lookup_sql: &str,
        id: &str,
        name: &str,
        insert_params: &[&dyn rusqlite::ToSql],
        entity: &str,
    ) -> RepositoryResult<EnsureOutcome> {
        let inserted = conn.execute(insert_sql, insert_params)?;
        if inserted > 0 {
            return Ok(EnsureOutcome {
                id: id.to_string(),
                created: true,
            });
        }

        let existing_id: Option<String> = conn
            .query_row(lookup_sql, params![name], |row| row.get(0))
            .optional()?;

        existing_id
            .map(|id| EnsureOutcome { id, created: false })
            .ok_or_else(|| RepositoryError::NotFound {
                entity: entity.to_string(),
                id: name.to_string(),
            })
    }

    fn map_product_row(row: &Row<'_>) -> rusqlite::Result<Product> {
        Ok(Product {
            id: row.get(0)?,
            sku: row.get(1)?,
            name: row.get(2)?,
            description: row.get(3)?,
            category_id: row.get(4)?,
            brand_id: row.get(5)?,
            volume_ml: row.get(6)?,
            weight_kg: row.get(7)?,
            dimensions_cm: row.get(8)?,
            standard_cost: row.get(9)?,
            standard_price: row.get(10)?,
            markup_percentage: row.get(11)?,
            reorder_point: row.get(12)?,
            primary_supplier_id: row.get(13)?,
            supplier_sku: row.get(14)?,
            is_active: row.get(15)?,
            is_perishable: row.get(16)?,
            notes: row.get(17)?,
            created_at: row.get(18)?,
            updated_at: row.get(19)?,
        })
    }
}

#[async_trait]
impl CatalogImportRepository for CatalogImportRepositoryImpl {
    async fn list_brands(&self) -> RepositoryResult<Vec<Brand>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT id, name, description, website FROM brands ORDER BY name")?;

        let brands = stmt
            .query_map([], |row| {
                Ok(Brand {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    description: row.get(2)?,
                    website: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(brands)
    }

    async fn insert_brand_if_absent(&self, brand: &Brand) -> RepositoryResult<EnsureOutcome> {
        let conn = self.lock()?;
        let now = Utc::now();

        Self::ensure_named_row(
            &conn,
            r#"
            INSERT INTO brands (id, name, description, website, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT (name) DO NOTHING
            "#,
            "SELECT id FROM brands WHERE name = ?1",
            &brand.id,
            &brand.name,
            params![brand.id, brand.name, brand.description, brand.website, now, now],
            "Brand",
        )
    }

    async fn insert_category_if_absent(
        &self,
        category: &Category,
    ) -> RepositoryResult<EnsureOutcome> {
        let conn = self.lock()?;
        let now = Utc::now();

        Self::ensure_named_row(
            &conn,
            r#"
            INSERT INTO categories (id, name, parent_id, description, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT DO NOTHING
            "#,
            "SELECT id FROM categories WHERE name = ?1",
            &category.id,
            &category.name,
            params![
                category.id,
                category.name,
                category.parent_id,
                category.description,
                now,
                now
            ],
            "Category",
        )
    }

    async fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT id, name, parent_id, description FROM categories ORDER BY name")?;

        let categories = stmt
            .query_map([], |row| {
                Ok(Category {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    parent_id: row.get(2)?,
                    description: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(categories)
    }

    async fn upsert_product(&self, product: &Product) -> RepositoryResult<UpsertOutcome> {
        let conn = self.lock()?;
        let tx = conn.unchecked_transaction()?;

        let exists = tx
            .query_row(
                "SELECT 1 FROM product_catalog WHERE sku = ?1",
                params![product.sku],
                |_row| Ok(()),
            )
            .optional()?
            .is_some();

        tx.execute(
            r#"
            INSERT INTO product_catalog (
                id, sku, name, description, category_id, brand_id, volume_ml,
                weight_kg, dimensions_cm, standard_cost, standard_price,
                markup_percentage, reorder_point, primary_supplier_id,
                supplier_sku, is_active, is_perishable, notes, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15,
                ?16, ?17, ?18, ?19, ?20
            )
            ON CONFLICT (sku) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                category_id = excluded.category_id,
                brand_id = excluded.brand_id,
                volume_ml = excluded.volume_ml,
                standard_cost = excluded.standard_cost,
                standard_price = excluded.standard_price,
                reorder_point = excluded.reorder_point,
                notes = excluded.notes,
                updated_at = excluded.updated_at
            "#,
            params![
                product.id,
                product.sku,
                product.name,
                product.description,
                product.category_id,
                product.brand_id,
                product.volume_ml,
                product.weight_kg,
                product.dimensions_cm,
                product.standard_cost,
                product.standard_price,
                product.markup_percentage,
                product.reorder_point,
                product.primary_supplier_id,
                product.supplier_sku,
                product.is_active,
                product.is_perishable,
                product.notes,
                product.created_at,
                product.updated_at,
            ],
        )?;

        tx.commit()?;

        Ok(if exists {
            UpsertOutcome::Updated
        } else {
            UpsertOutcome::Inserted
        })
    }

    async fn find_product_by_sku(&self, sku: &str) -> RepositoryResult<Option<Product>> {
        let conn = self.lock()?;
        let sql = format!("SELECT {} FROM product_catalog WHERE sku = ?1", PRODUCT_COLUMNS);

        let product = conn
            .query_row(&sql, params![sku], Self::map_product_row)
            .optional()?;

        Ok(product)
    }

    async fn count_products(&self) -> RepositoryResult<usize> {
        let conn = self.lock()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM product_catalog", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
