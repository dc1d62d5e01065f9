use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use axum_extra::extract::Form;
use axum_template::RenderHtml;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::instrument;

use crate::intake::RawSubmission;
use crate::model::{BarStats, RatingRecord};

pub use error::*;
pub use state::*;

mod error;
mod state;

pub type Result<T, E = ApiError> = std::result::Result<T, E>;

pub fn create_router(app: App) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/submit", get(submission_form).post(submit))
        .route("/dashboard", get(dashboard))
        .route("/api/ratings", get(ratings))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(app)
}

#[derive(Debug, Serialize)]
struct LineupPage {
    bars: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ConfirmPage {
    record: RatingRecord,
    /// the submitted average preformatted to 2 decimal places
    average: String,
    stats: BarStats,
}

#[derive(Debug, Serialize)]
struct RejectPage {
    reason: String,
}

#[derive(Debug, Serialize)]
struct DashboardPage {
    bars: Vec<String>,
    poll_interval_ms: u64,
}

async fn home(State(app): State<App>) -> impl IntoResponse {
    let page = LineupPage {
        bars: app.site.bars,
    };
    RenderHtml("home.html", app.engine, page)
}

async fn submission_form(State(app): State<App>) -> impl IntoResponse {
    let page = LineupPage {
        bars: app.site.bars,
    };
    RenderHtml("submit.html", app.engine, page)
}

#[instrument(skip(app))]
async fn submit(State(app): State<App>, Form(raw): Form<RawSubmission>) -> Result<Response> {
    let record = match app.intake.validate(raw) {
        Ok(record) => record,
        Err(reason) => {
            tracing::info!("rejected submission: {reason}");
            let page = RejectPage {
                reason: reason.to_string(),
            };
            let body = RenderHtml("reject.html", app.engine, page);
            return Ok((StatusCode::BAD_REQUEST, body).into_response());
        }
    };

    let stats = app.store.apply(&record).await?;
    tracing::info!(stats = ?stats, "accepted rating for `{}`", record.bar);

    let page = ConfirmPage {
        average: format!("{:.2}", record.average_rating),
        record,
        stats,
    };
    Ok(RenderHtml("confirm.html", app.engine, page).into_response())
}

async fn dashboard(State(app): State<App>) -> impl IntoResponse {
    let page = DashboardPage {
        bars: app.site.bars.clone(),
        poll_interval_ms: app.site.poll_interval.as_millis() as u64,
    };
    RenderHtml("dashboard.html", app.engine, page)
}

/// The dashboard polls this; rows are sorted by bar name so charts group and
/// color consistently between refreshes.
async fn ratings(State(app): State<App>) -> Result<Json<Vec<BarStats>>> {
    let mut rows = app.store.snapshot().await?;
    rows.sort_by(|a, b| a.bar.cmp(&b.bar));
    Ok(Json(rows))
}
