use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::db::RepositoryError;
use crate::db::movements::MovementRepository;
use crate::db::products::ProductRepository;
use crate::error::Result;
use crate::filters;
use crate::flash::{self, Flash};
use crate::models::Product;
use crate::routes::format_timestamp;
use crate::state::AppState;
use stockroom_core::{NameError, ProductId};

#[derive(Template, WebTemplate)]
#[template(path = "products.html")]
pub struct ProductsTemplate {
    flash: Vec<Flash>,
    active_page: &'static str,
    products: Vec<ProductView>,
}

/// Display-ready product row.
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub in_use: bool,
}

impl ProductView {
    fn new(product: &Product, in_use: bool) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.to_string(),
            created_at: format_timestamp(&product.created_at),
            in_use,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NameForm {
    #[serde(default)]
    pub name: String,
}

/// Product listing with the creation form.
#[instrument(skip_all)]
pub async fn index(State(state): State<AppState>, session: Session) -> Result<ProductsTemplate> {
    let products = ProductRepository::new(state.pool()).list_all().await?;
    let in_use = MovementRepository::new(state.pool()).products_in_use().await?;

    let products = products
        .iter()
        .map(|p| ProductView::new(p, in_use.contains(&p.id)))
        .collect();

    Ok(ProductsTemplate {
        flash: flash::take(&session).await?,
        active_page: "products",
        products,
    })
}

/// Create a product from the listing-page form.
#[instrument(skip(state, session))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<NameForm>,
) -> Result<Redirect> {
    let name = match stockroom_core::EntityName::parse(&form.name) {
        Ok(name) => name,
        Err(err) => {
            flash::error(&session, name_error_message("Product", &err)).await?;
            return Ok(Redirect::to("/products"));
        }
    };

    match ProductRepository::new(state.pool()).create(&name).await {
        Ok(product) => {
            tracing::info!(product_id = %product.id, "created product");
            flash::success(&session, format!("Product \"{name}\" added successfully!")).await?;
        }
        Err(RepositoryError::Conflict(_)) => {
            flash::error(&session, format!("Product \"{name}\" already exists.")).await?;
        }
        Err(err) => return Err(err.into()),
    }
    Ok(Redirect::to("/products"))
}

/// Rename a product.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    session: Session,
    Form(form): Form<NameForm>,
) -> Result<Redirect> {
    let Ok(id) = ProductId::parse(&id) else {
        flash::error(&session, "Product not found.").await?;
        return Ok(Redirect::to("/products"));
    };
    let name = match stockroom_core::EntityName::parse(&form.name) {
        Ok(name) => name,
        Err(err) => {
            flash::error(&session, name_error_message("Product", &err)).await?;
            return Ok(Redirect::to("/products"));
        }
    };

    match ProductRepository::new(state.pool()).rename(id, &name).await {
        Ok(()) => {
            flash::success(&session, format!("Product \"{name}\" updated successfully!")).await?;
        }
        Err(RepositoryError::NotFound) => {
            flash::error(&session, "Product not found.").await?;
        }
        Err(RepositoryError::Conflict(_)) => {
            flash::error(&session, format!("Product \"{name}\" already exists.")).await?;
        }
        Err(err) => return Err(err.into()),
    }
    Ok(Redirect::to("/products"))
}

/// Delete a product. Blocked when the product appears in the ledger.
#[instrument(skip(state, session))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    session: Session,
) -> Result<Redirect> {
    let Ok(id) = ProductId::parse(&id) else {
        flash::error(&session, "Product not found.").await?;
        return Ok(Redirect::to("/products"));
    };

    match ProductRepository::new(state.pool()).delete(id).await {
        Ok(product) => {
            tracing::info!(product_id = %product.id, "deleted product");
            flash::success(
                &session,
                format!("Product \"{}\" deleted successfully!", product.name),
            )
            .await?;
        }
        Err(RepositoryError::NotFound) => {
            flash::error(&session, "Product not found.").await?;
        }
        Err(RepositoryError::HistoryExists(name)) => {
            flash::error(
                &session,
                format!("Cannot delete product \"{name}\" because it has movement history."),
            )
            .await?;
        }
        Err(err) => return Err(err.into()),
    }
    Ok(Redirect::to("/products"))
}

pub(super) fn name_error_message(kind: &str, err: &NameError) -> String {
    match err {
        NameError::Empty => format!("{kind} name cannot be empty."),
        NameError::TooLong(_) => format!("{kind} name is too long."),
    }
}
