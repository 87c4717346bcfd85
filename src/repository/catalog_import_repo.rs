// ==========================================
// 库存管理系统 - 目录导入 Repository Trait
// ==========================================
// 职责: 定义导入相关数据访问接口（不包含业务逻辑）
// 红线: Repository 不含业务规则，只做数据 CRUD
// 约束: 插入或忽略 / 插入或更新 语义在此显式声明
// ==========================================

use crate::domain::catalog::{Brand, Category, EnsureOutcome, Product, UpsertOutcome};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// CatalogImportRepository Trait
// ==========================================
// 用途: Sortly 导入相关数据访问
// 实现者: CatalogImportRepositoryImpl（使用 rusqlite）
#[async_trait]
pub trait CatalogImportRepository: Send + Sync {
    // ===== 品牌 =====

    /// 查询全部品牌 (id, name)
    async fn list_brands(&self) -> RepositoryResult<Vec<Brand>>;

    /// 插入品牌；name 冲突时忽略
    ///
    /// # 返回
    /// - EnsureOutcome.id: 存储中该名称对应的品牌 ID
    /// - EnsureOutcome.created: 本次是否实际插入
    async fn insert_brand_if_absent(&self, brand: &Brand) -> RepositoryResult<EnsureOutcome>;

    // ===== 分类 =====

    /// 插入分类；冲突时忽略（语义同 insert_brand_if_absent）
    async fn insert_category_if_absent(
        &self,
        category: &Category,
    ) -> RepositoryResult<EnsureOutcome>;

    /// 查询全部分类
    async fn list_categories(&self) -> RepositoryResult<Vec<Category>>;

    // ===== 商品 =====

    /// 插入商品；sku 冲突时更新可变商务字段并刷新 updated_at
    ///
    /// # 更新字段
    /// name, description, category_id, brand_id, volume_ml,
    /// standard_cost, standard_price, reorder_point, notes
    ///
    /// # 返回
    /// - UpsertOutcome::Inserted: 新 SKU
    /// - UpsertOutcome::Updated: 已存在的 SKU
    async fn upsert_product(&self, product: &Product) -> RepositoryResult<UpsertOutcome>;

    /// 按 SKU 查询商品
    async fn find_product_by_sku(&self, sku: &str) -> RepositoryResult<Option<Product>>;

    /// 统计商品数
    async fn count_products(&self) -> RepositoryResult<usize>;
}
