//! Product repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use stockroom_core::{EntityName, ProductId};

use super::RepositoryError;
use crate::models::Product;

/// Internal row type for product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    name: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let id = ProductId::parse(&row.id).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid product id in database: {e}"))
        })?;
        let name = EntityName::parse(&row.name).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid product name in database: {e}"))
        })?;

        Ok(Self {
            id,
            name,
            created_at: row.created_at,
        })
    }
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all products, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, created_at FROM product ORDER BY name",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, created_at FROM product WHERE id = ?1",
        )
        .bind(id.to_string())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Create a new product with a generated ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name is already taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, name: &EntityName) -> Result<Product, RepositoryError> {
        let id = ProductId::generate();
        let created_at = Utc::now();

        sqlx::query("INSERT INTO product (id, name, created_at) VALUES (?1, ?2, ?3)")
            .bind(id.to_string())
            .bind(name.as_str())
            .bind(created_at)
            .execute(self.pool)
            .await
            .map_err(|e| map_unique_violation(e, name))?;

        Ok(Product {
            id,
            name: name.clone(),
            created_at,
        })
    }

    /// Rename an existing product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this ID.
    /// Returns `RepositoryError::Conflict` if the new name is already taken.
    pub async fn rename(&self, id: ProductId, name: &EntityName) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE product SET name = ?1 WHERE id = ?2")
            .bind(name.as_str())
            .bind(id.to_string())
            .execute(self.pool)
            .await
            .map_err(|e| map_unique_violation(e, name))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Delete a product, refusing if movement history references it.
    ///
    /// Runs in a single transaction so the history check and the delete see
    /// the same ledger state.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this ID.
    /// Returns `RepositoryError::HistoryExists` if any movement references it.
    pub async fn delete(&self, id: ProductId) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let id_text = id.to_string();

        let row = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, created_at FROM product WHERE id = ?1",
        )
        .bind(&id_text)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;
        let product: Product = row.try_into()?;

        let history: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM movement WHERE product_id = ?1")
                .bind(&id_text)
                .fetch_one(&mut *tx)
                .await?;
        if history > 0 {
            return Err(RepositoryError::HistoryExists(
                product.name.as_str().to_owned(),
            ));
        }

        sqlx::query("DELETE FROM product WHERE id = ?1")
            .bind(&id_text)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(product)
    }
}

/// Translate a unique constraint violation into a `Conflict`.
fn map_unique_violation(e: sqlx::Error, name: &EntityName) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("name \"{name}\" already exists"));
    }
    RepositoryError::Database(e)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_support::memory_pool;

    fn name(s: &str) -> EntityName {
        EntityName::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let pool = memory_pool().await;
        let repo = ProductRepository::new(&pool);

        repo.create(&name("Widget")).await.unwrap();
        repo.create(&name("Anvil")).await.unwrap();

        let products = repo.list_all().await.unwrap();
        // Ordered by name
        let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Anvil", "Widget"]);
    }

    #[tokio::test]
    async fn test_create_duplicate_name_is_conflict() {
        let pool = memory_pool().await;
        let repo = ProductRepository::new(&pool);

        repo.create(&name("Widget")).await.unwrap();
        let err = repo.create(&name("Widget")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));

        assert_eq!(repo.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rename() {
        let pool = memory_pool().await;
        let repo = ProductRepository::new(&pool);

        let product = repo.create(&name("Widgit")).await.unwrap();
        repo.rename(product.id, &name("Widget")).await.unwrap();

        let fetched = repo.get_by_id(product.id).await.unwrap().unwrap();
        assert_eq!(fetched.name.as_str(), "Widget");
    }

    #[tokio::test]
    async fn test_rename_unknown_id_is_not_found() {
        let pool = memory_pool().await;
        let repo = ProductRepository::new(&pool);

        let err = repo
            .rename(ProductId::generate(), &name("Widget"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_delete_unreferenced_product() {
        let pool = memory_pool().await;
        let repo = ProductRepository::new(&pool);

        let product = repo.create(&name("Widget")).await.unwrap();
        repo.delete(product.id).await.unwrap();

        assert!(repo.get_by_id(product.id).await.unwrap().is_none());
        assert!(repo.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_not_found() {
        let pool = memory_pool().await;
        let repo = ProductRepository::new(&pool);

        let err = repo.delete(ProductId::generate()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }
}
