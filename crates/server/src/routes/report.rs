use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::db::movements::MovementRepository;
use crate::error::Result;
use crate::flash;
use crate::report::render_balance_pdf;
use crate::state::AppState;

/// Download the balance report as a PDF attachment.
///
/// With an empty ledger there is nothing to report, so the handler flashes
/// a notice and sends the user back to the dashboard instead.
#[instrument(skip_all)]
pub async fn download(State(state): State<AppState>, session: Session) -> Result<Response> {
    let balances = MovementRepository::new(state.pool()).balances().await?;

    if balances.is_empty() {
        flash::error(&session, "No data available to generate PDF.").await?;
        return Ok(Redirect::to("/").into_response());
    }

    let bytes = render_balance_pdf(&balances)?;
    tracing::info!(rows = balances.len(), "generated balance report pdf");

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"inventory_report.pdf\"",
            ),
        ],
        bytes,
    )
        .into_response())
}
