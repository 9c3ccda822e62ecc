use crate::config::Config;
use crate::errors::AppError;
use crate::lms_client::GradeSource;
use crate::models::*;
use crate::pipeline::{compute, run_cycle};
use crate::presenter::{FormState, HtmlPresenter, Presenter};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
    Form, Json,
};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Where enrollments, grades and course names come from.
    pub source: Arc<dyn GradeSource>,
}

/// Health check endpoint.
///
/// Returns the service status, version, and health information.
#[utoipa::path(
    get,
    path = "/health",
    tag = "service",
    responses((status = 200, description = "Service is healthy"))
)]
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "gpa-calc-api",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// GET /
///
/// Serves the grade page with an empty form.
pub async fn index() -> Html<String> {
    Html(HtmlPresenter::new().into_page(&FormState::default()))
}

/// POST /calculate
///
/// Form trigger of the grade page. Runs one fetch-and-compute cycle and
/// answers with the page filled in. Failures are rendered into the page; the
/// status code still reflects them.
pub async fn calculate(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CalculateForm>,
) -> (StatusCode, Html<String>) {
    tracing::info!("POST /calculate - user: {}", form.user_id.trim());

    let mut presenter = HtmlPresenter::new();
    let method = ScoringMethod::from_param(form.method.as_deref());
    let form_state = FormState {
        user_id: form.user_id.clone(),
        method: method.as_ref().copied().unwrap_or_default(),
    };

    let status = match method {
        Ok(method) => {
            match run_cycle(
                state.source.as_ref(),
                &mut presenter,
                &form.user_id,
                method,
                state.config.fetch_concurrency,
            )
            .await
            {
                Ok(_) => StatusCode::OK,
                Err(e) => e.status_code(),
            }
        }
        Err(e) => {
            tracing::warn!("Rejected calculation request: {}", e);
            presenter.render_error(&e);
            e.status_code()
        }
    };

    (status, Html(presenter.into_page(&form_state)))
}

/// GET /api/v1/users/:user_id/gpa
///
/// JSON variant of the grade page: the courses that have a fetched grade and
/// the SGPA/CGPA computed from them.
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/gpa",
    tag = "grades",
    params(
        ("user_id" = String, Path, description = "LMS user identifier"),
        GpaQuery
    ),
    responses(
        (status = 200, description = "Grades and averages", body = GradeReport),
        (status = 400, description = "Blank user id or unknown method"),
        (status = 502, description = "Enrollment listing failed")
    )
)]
pub async fn get_user_gpa(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(params): Query<GpaQuery>,
) -> Result<Json<GradeReport>, AppError> {
    tracing::info!("GET /users/{}/gpa - params: {:?}", user_id, params);

    let method = ScoringMethod::from_param(params.method.as_deref())?;
    let outcome = compute(
        state.source.as_ref(),
        &user_id,
        method,
        state.config.fetch_concurrency,
    )
    .await?;

    Ok(Json(GradeReport {
        user_id: user_id.trim().to_string(),
        method,
        course_count: outcome.records.len(),
        courses: outcome.records,
        result: outcome.result,
        generated_at: Utc::now(),
    }))
}
