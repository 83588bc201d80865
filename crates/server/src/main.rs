// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use clap::Parser;
use rollover_api::{
    AdvanceStatusRequest, ApiError, ClassInfo, ClassMappingInfo, CreateClassRequest,
    CreateEnrollmentRequest, CreateMappingRequest, CreateRosterClassRequest, CreateYearRequest,
    EnrollmentInfo, GetOrCreatePreparationRequest, GetOrCreatePreparationResponse,
    MappingProgressResponse, PreparationInfo, PromoteRequest, PromoteResponse, SchoolYearInfo,
    StudentTransitionInfo,
};
use rollover_domain::DraftTransition;
use rollover_persistence::{Persistence, PersistenceError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// Rollover Server - HTTP server for the academic-year rollover workflow
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "ROLLOVER_DATABASE")]
    database: Option<String>,

    /// Address to bind the server to
    #[arg(short, long, env = "ROLLOVER_BIND", default_value = "127.0.0.1")]
    bind: IpAddr,

    /// Port to bind the server to
    #[arg(short, long, env = "ROLLOVER_PORT", default_value_t = 3000)]
    port: u16,
}

/// Application state shared across handlers.
///
/// Every request takes the lock for the duration of its API call, so
/// writes reach the database one at a time.
#[derive(Clone)]
struct AppState {
    persistence: Arc<Mutex<Persistence>>,
}

#[derive(Debug, Deserialize)]
struct ListYearsQuery {
    school_id: i64,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Stable error kind, e.g. `state_conflict`.
    kind: String,
    /// Error message.
    message: String,
    /// Structured context for the kind; `null` when there is none.
    details: Value,
}

/// HTTP error wrapper that implements `IntoResponse`.
#[derive(Debug)]
struct HttpError {
    status: StatusCode,
    kind: &'static str,
    message: String,
    details: Value,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            kind: self.kind.to_string(),
            message: self.message,
            details: self.details,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let kind: &'static str = err.kind();
        let message: String = err.to_string();
        let (status, details): (StatusCode, Value) = match err {
            ApiError::ValidationError { violations } => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "violations": violations }),
            ),
            ApiError::NotFound { resource_type, .. } => (
                StatusCode::NOT_FOUND,
                serde_json::json!({ "resource_type": resource_type }),
            ),
            ApiError::UniqueMappingViolation {
                preparation_id,
                source_class_id,
            } => (
                StatusCode::CONFLICT,
                serde_json::json!({
                    "preparation_id": preparation_id,
                    "source_class_id": source_class_id,
                }),
            ),
            ApiError::StateConflict {
                expected, actual, ..
            } => (
                StatusCode::CONFLICT,
                serde_json::json!({ "expected": expected, "actual": actual }),
            ),
            ApiError::IncompleteMapping {
                preparation_id,
                unmapped_class_ids,
            } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                serde_json::json!({
                    "preparation_id": preparation_id,
                    "unmapped_class_ids": unmapped_class_ids,
                }),
            ),
            ApiError::PartialApplyFailure { preparation_id, .. } => {
                warn!(preparation_id, "Promotion batch rolled back");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    serde_json::json!({ "preparation_id": preparation_id, "retryable": true }),
                )
            }
            ApiError::Internal { .. } => {
                error!(error = %message, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, Value::Null)
            }
        };

        Self {
            status,
            kind,
            message,
            details,
        }
    }
}

impl From<PersistenceError> for HttpError {
    fn from(err: PersistenceError) -> Self {
        Self::from(ApiError::from(err))
    }
}

/// Handler for POST `/preparations`.
///
/// Answers 201 when a preparation was created and 200 when the open one
/// was returned.
async fn handle_get_or_create_preparation(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<GetOrCreatePreparationRequest>,
) -> Result<(StatusCode, Json<PreparationInfo>), HttpError> {
    info!(
        school_id = req.school_id,
        source_year_id = req.source_year_id,
        target_year_id = ?req.target_year_id,
        "Handling get_or_create_preparation request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: GetOrCreatePreparationResponse =
        rollover_api::get_or_create_preparation(&mut persistence, &req)?;
    drop(persistence);

    let status: StatusCode = if response.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(response.preparation)))
}

/// Handler for GET `/preparations/{id}`.
async fn handle_get_preparation(
    AxumState(app_state): AxumState<AppState>,
    Path(preparation_id): Path<i64>,
) -> Result<Json<PreparationInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let preparation: PreparationInfo =
        rollover_api::get_preparation(&mut persistence, preparation_id)?;
    Ok(Json(preparation))
}

/// Handler for POST `/preparations/{id}/advance`.
async fn handle_advance_status(
    AxumState(app_state): AxumState<AppState>,
    Path(preparation_id): Path<i64>,
    Json(req): Json<AdvanceStatusRequest>,
) -> Result<Json<PreparationInfo>, HttpError> {
    info!(
        preparation_id,
        expected = %req.expected_status,
        next = %req.next_status,
        "Handling advance_status request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let preparation: PreparationInfo =
        rollover_api::advance_status(&mut persistence, preparation_id, &req)?;
    Ok(Json(preparation))
}

/// Handler for POST `/preparations/{id}/classes`.
async fn handle_create_class(
    AxumState(app_state): AxumState<AppState>,
    Path(preparation_id): Path<i64>,
    Json(req): Json<CreateClassRequest>,
) -> Result<(StatusCode, Json<ClassInfo>), HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let class: ClassInfo = rollover_api::create_single(&mut persistence, preparation_id, &req)?;
    Ok((StatusCode::CREATED, Json(class)))
}

/// Handler for GET `/preparations/{id}/classes`.
async fn handle_list_target_classes(
    AxumState(app_state): AxumState<AppState>,
    Path(preparation_id): Path<i64>,
) -> Result<Json<Vec<ClassInfo>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let classes: Vec<ClassInfo> =
        rollover_api::list_target_classes(&mut persistence, preparation_id)?;
    Ok(Json(classes))
}

/// Handler for POST `/preparations/{id}/classes/duplicate-all`.
async fn handle_duplicate_all(
    AxumState(app_state): AxumState<AppState>,
    Path(preparation_id): Path<i64>,
) -> Result<Json<Vec<ClassInfo>>, HttpError> {
    info!(preparation_id, "Handling duplicate_all request");

    let mut persistence = app_state.persistence.lock().await;
    let classes: Vec<ClassInfo> = rollover_api::duplicate_all(&mut persistence, preparation_id)?;
    Ok(Json(classes))
}

/// Handler for POST `/preparations/{id}/mappings`.
async fn handle_create_mapping(
    AxumState(app_state): AxumState<AppState>,
    Path(preparation_id): Path<i64>,
    Json(req): Json<CreateMappingRequest>,
) -> Result<(StatusCode, Json<ClassMappingInfo>), HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let mapping: ClassMappingInfo =
        rollover_api::create_mapping(&mut persistence, preparation_id, &req)?;
    Ok((StatusCode::CREATED, Json(mapping)))
}

/// Handler for GET `/preparations/{id}/mappings`.
async fn handle_list_mappings(
    AxumState(app_state): AxumState<AppState>,
    Path(preparation_id): Path<i64>,
) -> Result<Json<Vec<ClassMappingInfo>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let mappings: Vec<ClassMappingInfo> =
        rollover_api::list_mappings(&mut persistence, preparation_id)?;
    Ok(Json(mappings))
}

/// Handler for DELETE `/preparations/{id}/mappings/{mapping_id}`.
async fn handle_delete_mapping(
    AxumState(app_state): AxumState<AppState>,
    Path((preparation_id, mapping_id)): Path<(i64, i64)>,
) -> Result<StatusCode, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    rollover_api::delete_mapping(&mut persistence, preparation_id, mapping_id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET `/preparations/{id}/mappings/progress`.
async fn handle_mapping_progress(
    AxumState(app_state): AxumState<AppState>,
    Path(preparation_id): Path<i64>,
) -> Result<Json<MappingProgressResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let progress: MappingProgressResponse =
        rollover_api::mapping_progress(&mut persistence, preparation_id)?;
    Ok(Json(progress))
}

/// Handler for GET `/preparations/{id}/drafts`.
async fn handle_default_drafts(
    AxumState(app_state): AxumState<AppState>,
    Path(preparation_id): Path<i64>,
) -> Result<Json<Vec<DraftTransition>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let drafts: Vec<DraftTransition> =
        rollover_api::default_drafts(&mut persistence, preparation_id)?;
    Ok(Json(drafts))
}

/// Handler for POST `/preparations/{id}/promote`.
async fn handle_promote(
    AxumState(app_state): AxumState<AppState>,
    Path(preparation_id): Path<i64>,
    Json(req): Json<PromoteRequest>,
) -> Result<Json<PromoteResponse>, HttpError> {
    info!(
        preparation_id,
        transitions = req.transitions.len(),
        "Handling promote request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: PromoteResponse = rollover_api::promote(&mut persistence, preparation_id, &req)?;
    Ok(Json(response))
}

/// Handler for GET `/preparations/{id}/transitions`.
async fn handle_list_transitions(
    AxumState(app_state): AxumState<AppState>,
    Path(preparation_id): Path<i64>,
) -> Result<Json<Vec<StudentTransitionInfo>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let transitions: Vec<StudentTransitionInfo> =
        rollover_api::list_transitions(&mut persistence, preparation_id)?;
    Ok(Json(transitions))
}

/// Handler for POST `/years`.
async fn handle_create_year(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateYearRequest>,
) -> Result<(StatusCode, Json<SchoolYearInfo>), HttpError> {
    info!(school_id = req.school_id, label = %req.label, "Handling create_year request");

    let mut persistence = app_state.persistence.lock().await;
    let year: SchoolYearInfo = rollover_api::create_year(&mut persistence, &req)?;
    Ok((StatusCode::CREATED, Json(year)))
}

/// Handler for GET `/years?school_id=`.
async fn handle_list_years(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<ListYearsQuery>,
) -> Result<Json<Vec<SchoolYearInfo>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let years: Vec<SchoolYearInfo> = rollover_api::list_years(&mut persistence, query.school_id)?;
    Ok(Json(years))
}

/// Handler for POST `/years/{id}/classes`.
async fn handle_create_roster_class(
    AxumState(app_state): AxumState<AppState>,
    Path(year_id): Path<i64>,
    Json(req): Json<CreateRosterClassRequest>,
) -> Result<(StatusCode, Json<ClassInfo>), HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let class: ClassInfo = rollover_api::create_roster_class(&mut persistence, year_id, &req)?;
    Ok((StatusCode::CREATED, Json(class)))
}

/// Handler for GET `/years/{id}/classes`.
async fn handle_list_year_classes(
    AxumState(app_state): AxumState<AppState>,
    Path(year_id): Path<i64>,
) -> Result<Json<Vec<ClassInfo>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let classes: Vec<ClassInfo> = rollover_api::list_year_classes(&mut persistence, year_id)?;
    Ok(Json(classes))
}

/// Handler for POST `/classes/{id}/enrollments`.
async fn handle_create_enrollment(
    AxumState(app_state): AxumState<AppState>,
    Path(class_id): Path<i64>,
    Json(req): Json<CreateEnrollmentRequest>,
) -> Result<(StatusCode, Json<EnrollmentInfo>), HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let enrollment: EnrollmentInfo =
        rollover_api::create_enrollment(&mut persistence, class_id, &req)?;
    Ok((StatusCode::CREATED, Json(enrollment)))
}

/// Handler for GET `/classes/{id}/enrollments`.
async fn handle_list_class_enrollments(
    AxumState(app_state): AxumState<AppState>,
    Path(class_id): Path<i64>,
) -> Result<Json<Vec<EnrollmentInfo>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let enrollments: Vec<EnrollmentInfo> =
        rollover_api::list_class_enrollments(&mut persistence, class_id)?;
    Ok(Json(enrollments))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/preparations", post(handle_get_or_create_preparation))
        .route("/preparations/{id}", get(handle_get_preparation))
        .route("/preparations/{id}/advance", post(handle_advance_status))
        .route(
            "/preparations/{id}/classes",
            post(handle_create_class).get(handle_list_target_classes),
        )
        .route(
            "/preparations/{id}/classes/duplicate-all",
            post(handle_duplicate_all),
        )
        .route(
            "/preparations/{id}/mappings",
            post(handle_create_mapping).get(handle_list_mappings),
        )
        .route(
            "/preparations/{id}/mappings/progress",
            get(handle_mapping_progress),
        )
        .route(
            "/preparations/{id}/mappings/{mapping_id}",
            delete(handle_delete_mapping),
        )
        .route("/preparations/{id}/drafts", get(handle_default_drafts))
        .route("/preparations/{id}/promote", post(handle_promote))
        .route("/preparations/{id}/transitions", get(handle_list_transitions))
        .route("/years", post(handle_create_year).get(handle_list_years))
        .route(
            "/years/{id}/classes",
            post(handle_create_roster_class).get(handle_list_year_classes),
        )
        .route(
            "/classes/{id}/enrollments",
            post(handle_create_enrollment).get(handle_list_class_enrollments),
        )
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Rollover Server");

    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
    };

    let app: Router = build_router(app_state);

    let addr: SocketAddr = SocketAddr::new(args.bind, args.port);
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
