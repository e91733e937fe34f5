//! HTTP control plane for kccd.
//!
//! Local-only REST API over the core operations. Every handler checks the
//! optional bearer token, runs the corresponding core or collaborator
//! function against the configured repository, and maps the error taxonomy
//! onto status codes.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use kcc_core::config::Config;
use kcc_core::scaffold::{
    self, ControllerParams, IdentityParams, MockGcpParams, Scaffolded, TypesParams,
};
use kcc_core::types::FieldSpec;
use kcc_core::{classify, fieldedit, locate, phases, plan};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::git::{self, GitError};
use crate::mapper;

/// Shared state for HTTP handlers.
pub struct AppState {
    pub config: Config,
    pub auth_token: Option<String>,
}

/// Create the HTTP router with all endpoints.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/resources/{resource}", get(find_resource))
        .route(
            "/resources/{resource}/controller-type",
            get(controller_type),
        )
        .route(
            "/resources/{resource}/migration/status",
            get(migration_status),
        )
        .route("/resources/{resource}/migration/plan", get(migration_plan))
        .route("/fields", post(add_field))
        .route("/scaffold/types", post(scaffold_types))
        .route("/scaffold/identity", post(scaffold_identity))
        .route("/scaffold/controller", post(scaffold_controller))
        .route("/scaffold/mockgcp", post(scaffold_mockgcp))
        .route("/mapper/generate", post(generate_mapper))
        .route("/git/status", get(git_status))
        .route("/git/commit", post(git_commit))
        .with_state(state)
}

/// Start the HTTP server, bound to localhost only.
pub async fn start_server(
    config: Config,
    port: u16,
    auth_token: Option<String>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let state = Arc::new(AppState { config, auth_token });
    let router = create_router(state).layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    info!("HTTP server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    // Best-effort; if the handler cannot be registered we serve until killed.
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

/// Validate auth token if configured.
fn check_auth(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    if let Some(expected) = &state.auth_token {
        let provided = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.strip_prefix("Bearer ").unwrap_or(s));

        match provided {
            Some(token) if token == expected => Ok(()),
            Some(_) => Err(ApiError::new(
                StatusCode::UNAUTHORIZED,
                "invalid auth token",
            )),
            None => Err(ApiError::new(
                StatusCode::UNAUTHORIZED,
                "missing auth token",
            )),
        }
    } else {
        Ok(())
    }
}

// --- Error mapping ---

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<kcc_core::Error> for ApiError {
    fn from(err: kcc_core::Error) -> Self {
        let status = match &err {
            kcc_core::Error::NotFound { .. } => StatusCode::NOT_FOUND,
            kcc_core::Error::PreconditionFailed(_) => StatusCode::CONFLICT,
            kcc_core::Error::UnsupportedFieldType(_) => StatusCode::UNPROCESSABLE_ENTITY,
            kcc_core::Error::ExternalCommand { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            warn!("internal error: {err}");
        }
        Self::new(status, err.to_string())
    }
}

impl From<GitError> for ApiError {
    fn from(err: GitError) -> Self {
        let status = match &err {
            GitError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

// --- Request/Response types ---

#[derive(Debug, Deserialize)]
pub struct AddFieldRequest {
    pub types_file: String,
    pub spec: FieldSpec,
}

#[derive(Debug, Serialize)]
pub struct AddFieldResponse {
    pub types_file: String,
    pub rendered: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateMapperRequest {
    pub resource: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateMapperResponse {
    pub output: String,
}

#[derive(Debug, Serialize)]
pub struct GitStatusResponse {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct CommitRequest {
    pub message: String,
    #[serde(default)]
    pub files: Vec<String>,
}

// --- Handlers ---

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// GET /resources/{resource} - Locate a resource's artifacts.
async fn find_resource(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(resource): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    check_auth(&state, &headers)?;
    let location = locate::find_resource(&state.config, &resource)?;
    Ok(Json(location))
}

/// GET /resources/{resource}/controller-type - Classify a resource.
async fn controller_type(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(resource): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    check_auth(&state, &headers)?;
    let info = classify::detect_controller_type(&state.config, &resource)?;
    Ok(Json(info))
}

/// GET /resources/{resource}/migration/status - Phase-by-phase progress.
async fn migration_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(resource): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    check_auth(&state, &headers)?;
    let status = phases::migration_status(&state.config, &resource)?;
    Ok(Json(status))
}

/// GET /resources/{resource}/migration/plan - The 7-phase checklist.
async fn migration_plan(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(resource): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    check_auth(&state, &headers)?;
    let migration_plan = plan::plan_migration(&state.config, &resource)?;
    Ok(Json(migration_plan))
}

/// POST /fields - Insert a field into a types file.
async fn add_field(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<AddFieldRequest>,
) -> Result<impl IntoResponse, ApiError> {
    check_auth(&state, &headers)?;
    let rendered = fieldedit::add_field(&state.config, &req.types_file, &req.spec)?;
    info!(
        "added field {} to {}",
        req.spec.field_name, req.types_file
    );
    Ok(Json(AddFieldResponse {
        types_file: req.types_file,
        rendered,
    }))
}

async fn scaffold_types(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(params): Json<TypesParams>,
) -> Result<Json<Scaffolded>, ApiError> {
    check_auth(&state, &headers)?;
    Ok(Json(scaffold::scaffold_types(&state.config, &params)?))
}

async fn scaffold_identity(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(params): Json<IdentityParams>,
) -> Result<Json<Scaffolded>, ApiError> {
    check_auth(&state, &headers)?;
    Ok(Json(scaffold::scaffold_identity(&state.config, &params)?))
}

async fn scaffold_controller(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(params): Json<ControllerParams>,
) -> Result<Json<Scaffolded>, ApiError> {
    check_auth(&state, &headers)?;
    Ok(Json(scaffold::scaffold_controller(&state.config, &params)?))
}

async fn scaffold_mockgcp(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(params): Json<MockGcpParams>,
) -> Result<Json<Scaffolded>, ApiError> {
    check_auth(&state, &headers)?;
    Ok(Json(scaffold::scaffold_mockgcp(&state.config, &params)?))
}

/// POST /mapper/generate - Run the external mapper generator.
async fn generate_mapper(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<GenerateMapperRequest>,
) -> Result<impl IntoResponse, ApiError> {
    check_auth(&state, &headers)?;
    let output = mapper::generate_mapper(&state.config, &req.resource)?;
    Ok(Json(GenerateMapperResponse { output }))
}

/// GET /git/status - Short-format working tree status.
async fn git_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    check_auth(&state, &headers)?;
    let status = git::status(&state.config.repo_root)?;
    Ok(Json(GitStatusResponse { status }))
}

/// POST /git/commit - Validated commit with the configured identity.
async fn git_commit(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CommitRequest>,
) -> Result<impl IntoResponse, ApiError> {
    check_auth(&state, &headers)?;
    git::create_commit(&state.config, &req.message, &req.files)?;
    info!("created commit: {}", req.message.lines().next().unwrap_or(""));
    Ok(StatusCode::NO_CONTENT)
}
