//! Location repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use stockroom_core::{EntityName, LocationId};

use super::RepositoryError;
use crate::models::Location;

/// Internal row type for location queries.
#[derive(Debug, sqlx::FromRow)]
struct LocationRow {
    id: String,
    name: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<LocationRow> for Location {
    type Error = RepositoryError;

    fn try_from(row: LocationRow) -> Result<Self, Self::Error> {
        let id = LocationId::parse(&row.id).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid location id in database: {e}"))
        })?;
        let name = EntityName::parse(&row.name).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid location name in database: {e}"))
        })?;

        Ok(Self {
            id,
            name,
            created_at: row.created_at,
        })
    }
}

/// Repository for location database operations.
pub struct LocationRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> LocationRepository<'a> {
    /// Create a new location repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all locations, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn list_all(&self) -> Result<Vec<Location>, RepositoryError> {
        let rows = sqlx::query_as::<_, LocationRow>(
            "SELECT id, name, created_at FROM location ORDER BY name",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get a location by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_by_id(&self, id: LocationId) -> Result<Option<Location>, RepositoryError> {
        let row = sqlx::query_as::<_, LocationRow>(
            "SELECT id, name, created_at FROM location WHERE id = ?1",
        )
        .bind(id.to_string())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Create a new location with a generated ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name is already taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, name: &EntityName) -> Result<Location, RepositoryError> {
        let id = LocationId::generate();
        let created_at = Utc::now();

        sqlx::query("INSERT INTO location (id, name, created_at) VALUES (?1, ?2, ?3)")
            .bind(id.to_string())
            .bind(name.as_str())
            .bind(created_at)
            .execute(self.pool)
            .await
            .map_err(|e| map_unique_violation(e, name))?;

        Ok(Location {
            id,
            name: name.clone(),
            created_at,
        })
    }

    /// Rename an existing location.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no location has this ID.
    /// Returns `RepositoryError::Conflict` if the new name is already taken.
    pub async fn rename(&self, id: LocationId, name: &EntityName) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE location SET name = ?1 WHERE id = ?2")
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

    /// Delete a location, refusing if movement history references it.
    ///
    /// A location is referenced when it appears as either endpoint of any
    /// movement. Runs in a single transaction so the history check and the
    /// delete see the same ledger state.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no location has this ID.
    /// Returns `RepositoryError::HistoryExists` if any movement references it.
    pub async fn delete(&self, id: LocationId) -> Result<Location, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let id_text = id.to_string();

        let row = sqlx::query_as::<_, LocationRow>(
            "SELECT id, name, created_at FROM location WHERE id = ?1",
        )
        .bind(&id_text)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;
        let location: Location = row.try_into()?;

        let history: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM movement WHERE from_location_id = ?1 OR to_location_id = ?1",
        )
        .bind(&id_text)
        .fetch_one(&mut *tx)
        .await?;
        if history > 0 {
            return Err(RepositoryError::HistoryExists(
                location.name.as_str().to_owned(),
            ));
        }

        sqlx::query("DELETE FROM location WHERE id = ?1")
            .bind(&id_text)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(location)
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
    async fn test_create_list_delete() {
        let pool = memory_pool().await;
        let repo = LocationRepository::new(&pool);

        let a = repo.create(&name("WarehouseB")).await.unwrap();
        repo.create(&name("WarehouseA")).await.unwrap();

        let locations = repo.list_all().await.unwrap();
        let names: Vec<&str> = locations.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["WarehouseA", "WarehouseB"]);

        repo.delete(a.id).await.unwrap();
        assert!(repo.get_by_id(a.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_name_is_conflict() {
        let pool = memory_pool().await;
        let repo = LocationRepository::new(&pool);

        repo.create(&name("WarehouseA")).await.unwrap();
        let err = repo.create(&name("WarehouseA")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_rename_to_taken_name_is_conflict() {
        let pool = memory_pool().await;
        let repo = LocationRepository::new(&pool);

        repo.create(&name("WarehouseA")).await.unwrap();
        let b = repo.create(&name("WarehouseB")).await.unwrap();

        let err = repo.rename(b.id, &name("WarehouseA")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }
}
