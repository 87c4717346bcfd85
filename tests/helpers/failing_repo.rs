// ==========================================
// 故障注入 Repository - 用于集成测试
// ==========================================
// 指定标签的分类创建失败，其余操作委托给真实实现
// ==========================================

use async_trait::async_trait;
use inventory_import::domain::{Brand, Category, EnsureOutcome, Product, UpsertOutcome};
use inventory_import::repository::{
    CatalogImportRepository, CatalogImportRepositoryImpl, RepositoryError, RepositoryResult,
};

pub struct FailingCategoryRepo {
    inner: CatalogImportRepositoryImpl,
    failing_label: String,
    fail_list_brands: bool,
}

impl FailingCategoryRepo {
    pub fn new(inner: CatalogImportRepositoryImpl, failing_label: &str) -> Self {
        Self {
            inner,
            failing_label: failing_label.to_string(),
            fail_list_brands: false,
        }
    }

    /// 同时让已有品牌查询失败
    pub fn with_brand_listing_failure(mut self) -> Self {
        self.fail_list_brands = true;
        self
    }

    pub fn inner(&self) -> &CatalogImportRepositoryImpl {
        &self.inner
    }
}

#[async_trait]
impl CatalogImportRepository for FailingCategoryRepo {
    async fn list_brands(&self) -> RepositoryResult<Vec<Brand>> {
        if self.fail_list_brands {
            return Err(RepositoryError::DatabaseQueryError(
                "injected brand listing failure".to_string(),
            ));
        }
        self.inner.list_brands().await
    }

    async fn insert_brand_if_absent(&self, brand: &Brand) -> RepositoryResult<EnsureOutcome> {
        self.inner.insert_brand_if_absent(brand).await
    }

    async fn insert_category_if_absent(
        &self,
        category: &Category,
    ) -> RepositoryResult<EnsureOutcome> {
        if category.name == self.failing_label {
            return Err(RepositoryError::DatabaseQueryError(format!(
                "injected failure for category {}",
                category.name
            )));
        }
        self.inner.insert_category_if_absent(category).await
    }

    async fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        self.inner.list_categories().await
    }

    async fn upsert_product(&self, product: &Product) -> RepositoryResult<UpsertOutcome> {
        self.inner.upsert_product(product).await
    }

    async fn find_product_by_sku(&self, sku: &str) -> RepositoryResult<Option<Product>> {
        self.inner.find_product_by_sku(sku).await
    }

    async fn count_products(&self) -> RepositoryResult<usize> {
        self.inner.count_products().await
    }
}
