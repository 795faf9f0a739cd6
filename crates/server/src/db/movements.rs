//! Movement ledger repository: append-only writes and balance aggregation.
//!
//! Movements are never updated or deleted. The balance report is recomputed
//! from the ledger on every request by summing signed quantities: stock into
//! a location counts positive, stock out of it negative.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};

use stockroom_core::{LocationId, MovementId, ProductId};

use super::RepositoryError;
use crate::models::{Balance, Movement, MovementRecord, NewMovement};

/// How many movements the dashboard and ledger pages show.
pub const RECENT_MOVEMENTS_LIMIT: i64 = 20;

/// Internal row type for joined movement queries.
#[derive(Debug, sqlx::FromRow)]
struct MovementRecordRow {
    id: i64,
    recorded_at: DateTime<Utc>,
    product_name: String,
    from_location_name: Option<String>,
    to_location_name: Option<String>,
    qty: i64,
}

impl From<MovementRecordRow> for MovementRecord {
    fn from(row: MovementRecordRow) -> Self {
        Self {
            id: MovementId::new(row.id),
            recorded_at: row.recorded_at,
            product_name: row.product_name,
            from_location_name: row.from_location_name,
            to_location_name: row.to_location_name,
            qty: row.qty,
        }
    }
}

/// Internal row type for the balance aggregation query.
#[derive(Debug, sqlx::FromRow)]
struct BalanceRow {
    product_name: String,
    location_name: String,
    qty: i64,
}

impl From<BalanceRow> for Balance {
    fn from(row: BalanceRow) -> Self {
        Self {
            product_name: row.product_name,
            location_name: row.location_name,
            qty: row.qty,
        }
    }
}

/// Repository for the movement ledger.
pub struct MovementRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> MovementRepository<'a> {
    /// Create a new movement repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Record a validated movement in the ledger.
    ///
    /// Runs in a single transaction: the referenced product and location ids
    /// are verified to exist, then one row is appended with a server-assigned
    /// timestamp. A failed check leaves no partial row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::MissingReference` if the product or either
    /// location id does not exist.
    pub async fn record(&self, new: &NewMovement) -> Result<Movement, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        verify_product_exists(&mut tx, new.product_id()).await?;
        if let Some(from) = new.from_location_id() {
            verify_location_exists(&mut tx, from).await?;
        }
        if let Some(to) = new.to_location_id() {
            verify_location_exists(&mut tx, to).await?;
        }

        let recorded_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO movement (recorded_at, product_id, from_location_id, to_location_id, qty) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(recorded_at)
        .bind(new.product_id().to_string())
        .bind(new.from_location_id().map(|id| id.to_string()))
        .bind(new.to_location_id().map(|id| id.to_string()))
        .bind(new.qty().as_i64())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Movement {
            id: MovementId::new(result.last_insert_rowid()),
            recorded_at,
            product_id: new.product_id(),
            from_location_id: new.from_location_id(),
            to_location_id: new.to_location_id(),
            qty: new.qty(),
        })
    }

    /// Fetch the most recent movements with product and location names,
    /// newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_recent(&self, limit: i64) -> Result<Vec<MovementRecord>, RepositoryError> {
        let rows = sqlx::query_as::<_, MovementRecordRow>(
            "SELECT m.id, m.recorded_at, m.qty, \
                    p.name AS product_name, \
                    l_from.name AS from_location_name, \
                    l_to.name AS to_location_name \
             FROM movement m \
             JOIN product p ON m.product_id = p.id \
             LEFT JOIN location l_from ON m.from_location_id = l_from.id \
             LEFT JOIN location l_to ON m.to_location_id = l_to.id \
             ORDER BY m.recorded_at DESC, m.id DESC \
             LIMIT ?1",
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Compute the balance report from the ledger.
    ///
    /// Every (product, location) pair with at least one contributing movement
    /// is reported, including pairs whose net quantity is zero: a location
    /// that has been fully emptied still shows a zero row rather than
    /// silently disappearing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn balances(&self) -> Result<Vec<Balance>, RepositoryError> {
        let rows = sqlx::query_as::<_, BalanceRow>(
            "WITH movement_summary AS ( \
                 SELECT to_location_id AS location_id, product_id, qty AS change_qty \
                 FROM movement WHERE to_location_id IS NOT NULL \
                 UNION ALL \
                 SELECT from_location_id AS location_id, product_id, -qty AS change_qty \
                 FROM movement WHERE from_location_id IS NOT NULL \
             ) \
             SELECT p.name AS product_name, l.name AS location_name, \
                    SUM(ms.change_qty) AS qty \
             FROM movement_summary ms \
             JOIN product p ON ms.product_id = p.id \
             JOIN location l ON ms.location_id = l.id \
             GROUP BY p.name, l.name \
             ORDER BY p.name, l.name",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// IDs of products referenced by at least one movement.
    ///
    /// Such products cannot be deleted; the catalog pages use this to mark
    /// rows as in use.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored id is invalid.
    pub async fn products_in_use(&self) -> Result<HashSet<ProductId>, RepositoryError> {
        let ids: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT product_id FROM movement")
                .fetch_all(self.pool)
                .await?;

        ids.iter()
            .map(|id| {
                ProductId::parse(id).map_err(|e| {
                    RepositoryError::DataCorruption(format!("invalid product id in ledger: {e}"))
                })
            })
            .collect()
    }

    /// IDs of locations referenced by at least one movement (either endpoint).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored id is invalid.
    pub async fn locations_in_use(&self) -> Result<HashSet<LocationId>, RepositoryError> {
        let ids: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT from_location_id FROM movement WHERE from_location_id IS NOT NULL \
             UNION \
             SELECT DISTINCT to_location_id FROM movement WHERE to_location_id IS NOT NULL",
        )
        .fetch_all(self.pool)
        .await?;

        ids.iter()
            .map(|id| {
                LocationId::parse(id).map_err(|e| {
                    RepositoryError::DataCorruption(format!("invalid location id in ledger: {e}"))
                })
            })
            .collect()
    }
}

/// Verify a product id exists inside the record transaction.
async fn verify_product_exists(
    tx: &mut Transaction<'_, Sqlite>,
    id: ProductId,
) -> Result<(), RepositoryError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product WHERE id = ?1")
        .bind(id.to_string())
        .fetch_one(&mut **tx)
        .await?;
    if count == 0 {
        return Err(RepositoryError::MissingReference(format!(
            "product {id} does not exist"
        )));
    }
    Ok(())
}

/// Verify a location id exists inside the record transaction.
async fn verify_location_exists(
    tx: &mut Transaction<'_, Sqlite>,
    id: LocationId,
) -> Result<(), RepositoryError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM location WHERE id = ?1")
        .bind(id.to_string())
        .fetch_one(&mut **tx)
        .await?;
    if count == 0 {
        return Err(RepositoryError::MissingReference(format!(
            "location {id} does not exist"
        )));
    }
    Ok(())
}
