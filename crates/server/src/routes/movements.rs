use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::Redirect};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::db::RepositoryError;
use crate::db::locations::LocationRepository;
use crate::db::movements::{MovementRepository, RECENT_MOVEMENTS_LIMIT};
use crate::db::products::ProductRepository;
use crate::error::Result;
use crate::filters;
use crate::flash::{self, Flash};
use crate::models::{MovementRecord, MovementShapeError, NewMovement};
use crate::routes::format_timestamp;
use crate::state::AppState;
use stockroom_core::{LocationId, ProductId};

#[derive(Template, WebTemplate)]
#[template(path = "movements.html")]
pub struct MovementsTemplate {
    flash: Vec<Flash>,
    active_page: &'static str,
    movements: Vec<MovementView>,
    products: Vec<SelectOption>,
    locations: Vec<SelectOption>,
}

/// An option for the product and location `<select>` elements.
pub struct SelectOption {
    pub id: String,
    pub name: String,
}

/// Display-ready ledger row. Missing endpoints render as a dash.
pub struct MovementView {
    pub recorded_at: String,
    pub product_name: String,
    pub from_location_name: String,
    pub to_location_name: String,
    pub qty: i64,
}

impl From<&MovementRecord> for MovementView {
    fn from(record: &MovementRecord) -> Self {
        let endpoint = |name: &Option<String>| name.clone().unwrap_or_else(|| "\u{2014}".into());
        Self {
            recorded_at: format_timestamp(&record.recorded_at),
            product_name: record.product_name.clone(),
            from_location_name: endpoint(&record.from_location_name),
            to_location_name: endpoint(&record.to_location_name),
            qty: record.qty,
        }
    }
}

/// Raw movement form fields. Empty selects arrive as empty strings.
#[derive(Debug, Deserialize)]
pub struct MovementForm {
    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    pub from_location_id: String,
    #[serde(default)]
    pub to_location_id: String,
    #[serde(default)]
    pub qty: String,
}

/// Movement ledger with the recording form.
#[instrument(skip_all)]
pub async fn index(State(state): State<AppState>, session: Session) -> Result<MovementsTemplate> {
    let movements = MovementRepository::new(state.pool())
        .list_recent(RECENT_MOVEMENTS_LIMIT)
        .await?
        .iter()
        .map(MovementView::from)
        .collect();

    let products = ProductRepository::new(state.pool())
        .list_all()
        .await?
        .into_iter()
        .map(|p| SelectOption {
            id: p.id.to_string(),
            name: p.name.to_string(),
        })
        .collect();
    let locations = LocationRepository::new(state.pool())
        .list_all()
        .await?
        .into_iter()
        .map(|l| SelectOption {
            id: l.id.to_string(),
            name: l.name.to_string(),
        })
        .collect();

    Ok(MovementsTemplate {
        flash: flash::take(&session).await?,
        active_page: "movements",
        movements,
        products,
        locations,
    })
}

/// Record a movement in the ledger.
#[instrument(skip(state, session))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<MovementForm>,
) -> Result<Redirect> {
    let movements = Redirect::to("/movements");

    if form.product_id.is_empty() || form.qty.is_empty() {
        flash::error(&session, "Product and Quantity are required.").await?;
        return Ok(movements);
    }
    let Ok(qty) = form.qty.trim().parse::<i64>() else {
        flash::error(&session, "Quantity must be a valid number.").await?;
        return Ok(movements);
    };
    let Ok(product_id) = ProductId::parse(&form.product_id) else {
        flash::error(&session, "Unknown product.").await?;
        return Ok(movements);
    };
    let from_location_id = match parse_endpoint(&form.from_location_id) {
        Ok(id) => id,
        Err(()) => {
            flash::error(&session, "Unknown location.").await?;
            return Ok(movements);
        }
    };
    let to_location_id = match parse_endpoint(&form.to_location_id) {
        Ok(id) => id,
        Err(()) => {
            flash::error(&session, "Unknown location.").await?;
            return Ok(movements);
        }
    };

    let new_movement = match NewMovement::new(product_id, from_location_id, to_location_id, qty) {
        Ok(m) => m,
        Err(err) => {
            flash::error(&session, shape_error_message(&err)).await?;
            return Ok(movements);
        }
    };

    match MovementRepository::new(state.pool())
        .record(&new_movement)
        .await
    {
        Ok(movement) => {
            tracing::info!(movement_id = movement.id.as_i64(), "recorded movement");
            flash::success(&session, "Movement recorded successfully!").await?;
        }
        Err(RepositoryError::MissingReference(_)) => {
            flash::error(&session, "Referenced product or location does not exist.").await?;
        }
        Err(err) => return Err(err.into()),
    }
    Ok(movements)
}

/// An empty select value means no endpoint.
fn parse_endpoint(raw: &str) -> std::result::Result<Option<LocationId>, ()> {
    if raw.is_empty() {
        return Ok(None);
    }
    LocationId::parse(raw).map(Some).map_err(|_| ())
}

fn shape_error_message(err: &MovementShapeError) -> &'static str {
    match err {
        MovementShapeError::Quantity(_) => "Quantity must be greater than zero.",
        MovementShapeError::NoEndpoints => {
            "Movement must have a \"From\" or \"To\" location (or both)."
        }
        MovementShapeError::SameEndpoints => "Source and Destination locations cannot be the same.",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_endpoint_empty_is_none() {
        assert_eq!(parse_endpoint("").unwrap(), None);
    }

    #[test]
    fn test_parse_endpoint_valid_uuid() {
        let id = LocationId::generate();
        assert_eq!(parse_endpoint(&id.to_string()).unwrap(), Some(id));
    }

    #[test]
    fn test_parse_endpoint_rejects_garbage() {
        assert!(parse_endpoint("not-a-uuid").is_err());
    }

    #[test]
    fn test_shape_error_messages() {
        assert_eq!(
            shape_error_message(&MovementShapeError::NoEndpoints),
            "Movement must have a \"From\" or \"To\" location (or both)."
        );
        assert_eq!(
            shape_error_message(&MovementShapeError::SameEndpoints),
            "Source and Destination locations cannot be the same."
        );
    }
}
