use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;
use tracing::instrument;

use crate::db::movements::{MovementRepository, RECENT_MOVEMENTS_LIMIT};
use crate::error::Result;
use crate::filters;
use crate::flash::{self, Flash};
use crate::models::Balance;
use crate::routes::movements::MovementView;
use crate::state::AppState;

#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    flash: Vec<Flash>,
    active_page: &'static str,
    balances: Vec<Balance>,
    movements: Vec<MovementView>,
}

/// Dashboard: current stock balances plus the most recent movements.
#[instrument(skip_all)]
pub async fn index(State(state): State<AppState>, session: Session) -> Result<DashboardTemplate> {
    let repo = MovementRepository::new(state.pool());
    let balances = repo.balances().await?;
    let movements = repo
        .list_recent(RECENT_MOVEMENTS_LIMIT)
        .await?
        .iter()
        .map(MovementView::from)
        .collect();

    Ok(DashboardTemplate {
        flash: flash::take(&session).await?,
        active_page: "dashboard",
        balances,
        movements,
    })
}
