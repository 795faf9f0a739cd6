//! Seed the database with a small demo catalog and ledger.
//!
//! Inserts three products, three locations, and twenty movements covering
//! all three movement shapes (stock-in, transfer, stock-out). The command
//! is a no-op when any product already exists, so it is safe to run on a
//! database with real data.

use sqlx::SqlitePool;
use tracing::info;

use stockroom_core::{EntityName, LocationId, NameError, ProductId};
use stockroom_server::db::{self, RepositoryError};
use stockroom_server::db::locations::LocationRepository;
use stockroom_server::db::movements::MovementRepository;
use stockroom_server::db::products::ProductRepository;
use stockroom_server::models::{MovementShapeError, NewMovement};

#[derive(Debug, thiserror::Error)]
enum SeedError {
    #[error("invalid seed name: {0}")]
    Name(#[from] NameError),

    #[error("invalid seed movement: {0}")]
    Shape(#[from] MovementShapeError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Populate demo data.
///
/// # Errors
///
/// Returns an error if the database is unreachable or an insert fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;
    db::MIGRATOR.run(&pool).await?;

    if !ProductRepository::new(&pool).list_all().await?.is_empty() {
        info!("Products already exist, skipping seed");
        return Ok(());
    }

    seed(&pool).await?;
    info!("Seed data inserted");
    Ok(())
}

async fn seed(pool: &SqlitePool) -> Result<(), SeedError> {
    let products = ProductRepository::new(pool);
    let locations = LocationRepository::new(pool);
    let movements = MovementRepository::new(pool);

    let laptop = products.create(&EntityName::parse("Laptop")?).await?.id;
    let mouse = products.create(&EntityName::parse("Mouse")?).await?.id;
    let keyboard = products.create(&EntityName::parse("Keyboard")?).await?.id;

    let loc_x = locations.create(&EntityName::parse("Location X")?).await?.id;
    let loc_y = locations.create(&EntityName::parse("Location Y")?).await?.id;
    let loc_z = locations.create(&EntityName::parse("Location Z")?).await?.id;

    // Initial stock-in
    record(&movements, laptop, None, Some(loc_x), 50).await?;
    record(&movements, mouse, None, Some(loc_x), 100).await?;
    record(&movements, keyboard, None, Some(loc_y), 15).await?;

    // Transfers
    for _ in 0..5 {
        record(&movements, laptop, Some(loc_x), Some(loc_y), 5).await?;
    }
    for _ in 0..5 {
        record(&movements, mouse, Some(loc_x), Some(loc_z), 10).await?;
    }

    // Stock-out sales
    for _ in 0..5 {
        record(&movements, keyboard, Some(loc_y), None, 2).await?;
    }

    // Additional stock-in, bringing the ledger to twenty movements
    record(&movements, mouse, None, Some(loc_x), 50).await?;
    record(&movements, laptop, None, Some(loc_x), 10).await?;

    Ok(())
}

async fn record(
    movements: &MovementRepository<'_>,
    product: ProductId,
    from: Option<LocationId>,
    to: Option<LocationId>,
    qty: i64,
) -> Result<(), SeedError> {
    movements
        .record(&NewMovement::new(product, from, to, qty)?)
        .await?;
    Ok(())
}
