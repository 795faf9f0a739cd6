use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use tower_sessions::Session;
use tracing::instrument;

use crate::db::RepositoryError;
use crate::db::locations::LocationRepository;
use crate::db::movements::MovementRepository;
use crate::error::Result;
use crate::filters;
use crate::flash::{self, Flash};
use crate::models::Location;
use crate::routes::format_timestamp;
use crate::routes::products::{NameForm, name_error_message};
use crate::state::AppState;
use stockroom_core::LocationId;

#[derive(Template, WebTemplate)]
#[template(path = "locations.html")]
pub struct LocationsTemplate {
    flash: Vec<Flash>,
    active_page: &'static str,
    locations: Vec<LocationView>,
}

/// Display-ready location row.
pub struct LocationView {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub in_use: bool,
}

impl LocationView {
    fn new(location: &Location, in_use: bool) -> Self {
        Self {
            id: location.id.to_string(),
            name: location.name.to_string(),
            created_at: format_timestamp(&location.created_at),
            in_use,
        }
    }
}

/// Location listing with the creation form.
#[instrument(skip_all)]
pub async fn index(State(state): State<AppState>, session: Session) -> Result<LocationsTemplate> {
    let locations = LocationRepository::new(state.pool()).list_all().await?;
    let in_use = MovementRepository::new(state.pool())
        .locations_in_use()
        .await?;

    let locations = locations
        .iter()
        .map(|l| LocationView::new(l, in_use.contains(&l.id)))
        .collect();

    Ok(LocationsTemplate {
        flash: flash::take(&session).await?,
        active_page: "locations",
        locations,
    })
}

/// Create a location from the listing-page form.
#[instrument(skip(state, session))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<NameForm>,
) -> Result<Redirect> {
    let name = match stockroom_core::EntityName::parse(&form.name) {
        Ok(name) => name,
        Err(err) => {
            flash::error(&session, name_error_message("Location", &err)).await?;
            return Ok(Redirect::to("/locations"));
        }
    };

    match LocationRepository::new(state.pool()).create(&name).await {
        Ok(location) => {
            tracing::info!(location_id = %location.id, "created location");
            flash::success(&session, format!("Location \"{name}\" added successfully!")).await?;
        }
        Err(RepositoryError::Conflict(_)) => {
            flash::error(&session, format!("Location \"{name}\" already exists.")).await?;
        }
        Err(err) => return Err(err.into()),
    }
    Ok(Redirect::to("/locations"))
}

/// Rename a location.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    session: Session,
    Form(form): Form<NameForm>,
) -> Result<Redirect> {
    let Ok(id) = LocationId::parse(&id) else {
        flash::error(&session, "Location not found.").await?;
        return Ok(Redirect::to("/locations"));
    };
    let name = match stockroom_core::EntityName::parse(&form.name) {
        Ok(name) => name,
        Err(err) => {
            flash::error(&session, name_error_message("Location", &err)).await?;
            return Ok(Redirect::to("/locations"));
        }
    };

    match LocationRepository::new(state.pool()).rename(id, &name).await {
        Ok(()) => {
            flash::success(&session, format!("Location \"{name}\" updated successfully!")).await?;
        }
        Err(RepositoryError::NotFound) => {
            flash::error(&session, "Location not found.").await?;
        }
        Err(RepositoryError::Conflict(_)) => {
            flash::error(&session, format!("Location \"{name}\" already exists.")).await?;
        }
        Err(err) => return Err(err.into()),
    }
    Ok(Redirect::to("/locations"))
}

/// Delete a location. Blocked when the location appears in the ledger.
#[instrument(skip(state, session))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    session: Session,
) -> Result<Redirect> {
    let Ok(id) = LocationId::parse(&id) else {
        flash::error(&session, "Location not found.").await?;
        return Ok(Redirect::to("/locations"));
    };

    match LocationRepository::new(state.pool()).delete(id).await {
        Ok(location) => {
            tracing::info!(location_id = %location.id, "deleted location");
            flash::success(
                &session,
                format!("Location \"{}\" deleted successfully!", location.name),
            )
            .await?;
        }
        Err(RepositoryError::NotFound) => {
            flash::error(&session, "Location not found.").await?;
        }
        Err(RepositoryError::HistoryExists(name)) => {
            flash::error(
                &session,
                format!("Cannot delete location \"{name}\" because it has movement history."),
            )
            .await?;
        }
        Err(err) => return Err(err.into()),
    }
    Ok(Redirect::to("/locations"))
}
