//! One endpoint per extractor.
//!
//! Every `/api/*` route takes the page as `?url=<page>` or
//! `?year=<yyyy>&week=<n>`, fetches it through the engine's fetcher and
//! answers with the extracted record as JSON.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use midweek_core::{
    Assignment, Gems, LivingSection, ReadingAssignment, Songs, StudySection, Talk, WeeklyProgram, Workbook,
};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::debug;
use url::Url;

use crate::error::ApiError;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    workbook: Arc<Workbook>,
}

impl AppState {
    pub fn new(workbook: Workbook) -> Self {
        Self { workbook: Arc::new(workbook) }
    }
}

/// Which page a request is about.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub url: Option<String>,
    pub year: Option<i32>,
    pub week: Option<u32>,
}

impl PageQuery {
    /// Absolute URL of the requested page.
    fn page_url(&self, workbook: &Workbook) -> Result<String, ApiError> {
        match (&self.url, self.year, self.week) {
            (Some(url), None, None) => {
                let parsed = Url::parse(url).map_err(|e| ApiError::BadRequest(format!("invalid url {}: {}", url, e)))?;
                if !matches!(parsed.scheme(), "http" | "https") {
                    return Err(ApiError::BadRequest(format!("url {} is not http(s)", url)));
                }
                Ok(parsed.into())
            }
            (None, Some(year), Some(week)) => {
                workbook.program_url(year, week).map_err(|e| ApiError::BadRequest(e.to_string()))
            }
            (Some(_), _, _) => Err(ApiError::BadRequest("give either url or year and week, not both".to_string())),
            (None, _, _) => Err(ApiError::BadRequest("year and week are both required without url".to_string())),
        }
    }
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<Health> {
    Json(Health { status: "ok", version: env!("CARGO_PKG_VERSION") })
}

async fn load_page(state: &AppState, query: &PageQuery) -> Result<String, ApiError> {
    let url = query.page_url(&state.workbook)?;
    debug!(%url, "loading program page");
    Ok(state.workbook.fetch_page(&url).await?)
}

async fn program(State(state): State<AppState>, Query(query): Query<PageQuery>) -> Result<Json<WeeklyProgram>, ApiError> {
    let html = load_page(&state, &query).await?;
    Ok(Json(state.workbook.extract_full_program(html.as_str()).await?))
}

async fn week(State(state): State<AppState>, Query(query): Query<PageQuery>) -> Result<Json<String>, ApiError> {
    let html = load_page(&state, &query).await?;
    Ok(Json(state.workbook.extract_week_date_span(html.as_str())?))
}

async fn chapters(State(state): State<AppState>, Query(query): Query<PageQuery>) -> Result<Json<String>, ApiError> {
    let html = load_page(&state, &query).await?;
    Ok(Json(state.workbook.extract_weekly_bible_chapters(html.as_str())?))
}

async fn songs(State(state): State<AppState>, Query(query): Query<PageQuery>) -> Result<Json<Songs>, ApiError> {
    let html = load_page(&state, &query).await?;
    Ok(Json(state.workbook.extract_songs(html.as_str()).await?))
}

async fn treasures(State(state): State<AppState>, Query(query): Query<PageQuery>) -> Result<Json<Talk>, ApiError> {
    let html = load_page(&state, &query).await?;
    Ok(Json(state.workbook.extract_treasures_talk(html.as_str()).await?))
}

async fn gems(State(state): State<AppState>, Query(query): Query<PageQuery>) -> Result<Json<Gems>, ApiError> {
    let html = load_page(&state, &query).await?;
    Ok(Json(state.workbook.extract_spiritual_gems(html.as_str()).await?))
}

async fn reading(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ReadingAssignment>, ApiError> {
    let html = load_page(&state, &query).await?;
    Ok(Json(state.workbook.extract_bible_reading(html.as_str()).await?))
}

async fn field_ministry(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<Assignment>>, ApiError> {
    let html = load_page(&state, &query).await?;
    Ok(Json(state.workbook.extract_field_ministry(html.as_str()).await?))
}

async fn living(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<LivingSection>>, ApiError> {
    let html = load_page(&state, &query).await?;
    Ok(Json(state.workbook.extract_christian_living(html.as_str())?))
}

async fn study(State(state): State<AppState>, Query(query): Query<PageQuery>) -> Result<Json<StudySection>, ApiError> {
    let html = load_page(&state, &query).await?;
    Ok(Json(state.workbook.extract_bible_study(html.as_str())?))
}

/// Build the application router.
pub fn router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/program", get(program))
        .route("/api/week", get(week))
        .route("/api/chapters", get(chapters))
        .route("/api/songs", get(songs))
        .route("/api/treasures", get(treasures))
        .route("/api/gems", get(gems))
        .route("/api/reading", get(reading))
        .route("/api/field-ministry", get(field_ministry))
        .route("/api/living", get(living))
        .route("/api/study", get(study))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::with_status_code(StatusCode::GATEWAY_TIMEOUT, request_timeout))
                .layer(CompressionLayer::new())
                .layer(CorsLayer::permissive()),
        )
}
