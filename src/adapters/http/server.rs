//! HTTP server exposing course management, chat and the resource center.
//!
//! Endpoints:
//! - `GET  /api/courses`                     list courses
//! - `POST /api/courses`                     create a course or replace its topics
//! - `GET  /api/courses/:name`               course details
//! - `DELETE /api/courses/:name`             remove a course
//! - `POST /api/courses/:name/upload`        multipart topics file, or a lesson when `topic` is set
//! - `POST /api/courses/:name/lessons`       lesson text as JSON
//! - `GET  /api/courses/:name/lessons/:index` download a lesson's text
//! - `POST /api/chat`                        ask a question
//! - `GET  /api/history`                     chat log, newest first
//! - `DELETE /api/history`                   clear the chat log
//! - `GET  /api/resources`                   links and uploaded files
//! - `POST /api/resources/upload`            multipart learning file
//! - `GET  /api/resources/files/:filename`    download an uploaded file
//! - `GET  /health`                          liveness

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::domain::errors::DomainError;
use crate::domain::models::{ChatEntry, Course, Material, MaterialKind, ResourceLink, RetrievalStrategy};
use crate::infrastructure::AppContext;
use crate::services::ingest::parse_topics;
use crate::services::{ChatReply, UploadOutcome};

/// Configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct HttpServerConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
    pub max_upload_bytes: usize,
}

impl HttpServerConfig {
    pub fn from_context(ctx: &AppContext) -> Self {
        Self {
            host: ctx.config.server.host.clone(),
            port: ctx.config.server.port,
            enable_cors: true,
            max_upload_bytes: ctx.config.server.max_upload_bytes,
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// Handler error carrying a status code and a JSON body.
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorResponse {
                error: message.into(),
                code: "BAD_REQUEST".to_string(),
            },
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let (status, code) = match &err {
            DomainError::CourseNotFound(_) => (StatusCode::NOT_FOUND, "COURSE_NOT_FOUND"),
            DomainError::LessonNotFound { .. } => (StatusCode::NOT_FOUND, "LESSON_NOT_FOUND"),
            DomainError::MaterialNotFound(_) => (StatusCode::NOT_FOUND, "MATERIAL_NOT_FOUND"),
            DomainError::InvalidCourseName { .. } => (StatusCode::BAD_REQUEST, "INVALID_COURSE_NAME"),
            DomainError::InvalidUpload { .. } => (StatusCode::BAD_REQUEST, "INVALID_UPLOAD"),
            DomainError::UnsupportedFormat(_) => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, "UNSUPPORTED_FORMAT")
            }
            DomainError::ValidationFailed(_) => (StatusCode::BAD_REQUEST, "VALIDATION_FAILED"),
            DomainError::MissingApiKey(_) => (StatusCode::SERVICE_UNAVAILABLE, "MISSING_API_KEY"),
            DomainError::Llm(_) | DomainError::Embedding(_) => {
                (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR")
            }
            DomainError::Storage(_) | DomainError::SerializationError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR")
            }
        };
        if !err.is_client_error() {
            tracing::error!(error = %err, "request failed");
        }
        Self {
            status,
            body: ErrorResponse {
                error: err.to_string(),
                code: code.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

// Request and response types

#[derive(Debug, Deserialize)]
pub struct CreateCourseRequest {
    pub name: String,
    /// Topics as a list
    #[serde(default)]
    pub topics: Vec<String>,
    /// Topics as newline-separated text, appended to `topics`
    #[serde(default)]
    pub topics_text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddLessonRequest {
    pub topic: String,
    pub content: String,
    #[serde(default)]
    pub filename: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub course: String,
    pub question: String,
    #[serde(default)]
    pub strategy: Option<RetrievalStrategy>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub course: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    /// `stored`, `unchanged` or `empty`
    pub status: String,
    pub course: Option<Course>,
}

impl From<UploadOutcome> for UploadResponse {
    fn from(outcome: UploadOutcome) -> Self {
        match outcome {
            UploadOutcome::Stored(course) => Self {
                status: "stored".to_string(),
                course: Some(course),
            },
            UploadOutcome::Unchanged(course) => Self {
                status: "unchanged".to_string(),
                course: Some(course),
            },
            UploadOutcome::Empty => Self {
                status: "empty".to_string(),
                course: None,
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClearedResponse {
    pub removed: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResourcesResponse {
    pub links: Vec<ResourceLink>,
    pub materials: Vec<Material>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MaterialUploadResponse {
    pub stored: bool,
    pub material: Option<Material>,
}

/// Build the application router.
pub fn build_router(ctx: AppContext, config: &HttpServerConfig) -> Router {
    let app = Router::new()
        .route("/api/courses", get(list_courses).post(create_course))
        .route("/api/courses/:name", get(get_course).delete(delete_course))
        .route("/api/courses/:name/upload", post(upload_course_file))
        .route("/api/courses/:name/lessons", post(add_lesson))
        .route("/api/courses/:name/lessons/:index", get(download_lesson))
        .route("/api/chat", post(chat))
        .route("/api/history", get(get_history).delete(clear_history))
        .route("/api/resources", get(get_resources))
        .route("/api/resources/upload", post(upload_material))
        .route("/api/resources/files/:filename", get(download_material))
        .route("/health", get(health_check))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .with_state(ctx);

    if config.enable_cors {
        app.layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
            .layer(TraceLayer::new_for_http())
    } else {
        app.layer(TraceLayer::new_for_http())
    }
}

/// Bind and serve until the process is stopped.
pub async fn serve(ctx: AppContext, config: HttpServerConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let router = build_router(ctx, &config);

    tracing::info!("Teaching assistant HTTP server listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down HTTP server");
}

// Handler functions

async fn health_check() -> &'static str {
    "OK"
}

async fn list_courses(State(ctx): State<AppContext>) -> ApiResult<Json<Vec<Course>>> {
    Ok(Json(ctx.courses.list_courses().await?))
}

async fn create_course(
    State(ctx): State<AppContext>,
    Json(req): Json<CreateCourseRequest>,
) -> ApiResult<(StatusCode, Json<Course>)> {
    let mut topics = req.topics;
    if let Some(text) = &req.topics_text {
        topics.extend(parse_topics(text));
    }
    let course = ctx.courses.add_course(&req.name, topics).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

async fn get_course(State(ctx): State<AppContext>, Path(name): Path<String>) -> ApiResult<Json<Course>> {
    Ok(Json(ctx.courses.get_course(&name).await?))
}

async fn delete_course(State(ctx): State<AppContext>, Path(name): Path<String>) -> ApiResult<StatusCode> {
    ctx.courses.remove_course(&name).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Uploaded file plus the text fields sent alongside it.
struct UploadForm {
    filename: String,
    bytes: Vec<u8>,
    topic: Option<String>,
}

async fn read_upload(mut multipart: Multipart) -> ApiResult<UploadForm> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut topic = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().unwrap_or("upload.txt").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {e}")))?;
                file = Some((filename, bytes.to_vec()));
            }
            Some("topic") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read topic: {e}")))?;
                if !text.trim().is_empty() {
                    topic = Some(text.trim().to_string());
                }
            }
            _ => {}
        }
    }

    let (filename, bytes) = file.ok_or_else(|| ApiError::bad_request("Missing 'file' field"))?;
    Ok(UploadForm { filename, bytes, topic })
}

async fn upload_course_file(
    State(ctx): State<AppContext>,
    Path(name): Path<String>,
    multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let form = read_upload(multipart).await?;
    let outcome = match &form.topic {
        Some(topic) => {
            ctx.courses
                .upload_lesson(&name, topic, &form.filename, &form.bytes)
                .await?
        }
        None => ctx.courses.upload_topics(&name, &form.filename, &form.bytes).await?,
    };
    Ok(Json(outcome.into()))
}

async fn add_lesson(
    State(ctx): State<AppContext>,
    Path(name): Path<String>,
    Json(req): Json<AddLessonRequest>,
) -> ApiResult<Json<UploadResponse>> {
    let outcome = ctx
        .courses
        .add_lesson(&name, &req.topic, &req.content, req.filename.as_deref())
        .await?;
    Ok(Json(outcome.into()))
}

/// Response body sent as a file download.
fn attachment(filename: &str, content_type: &'static str, body: Vec<u8>) -> Response {
    let quoted: String = filename
        .chars()
        .map(|c| {
            if c == ' ' || (c.is_ascii_graphic() && c != '"' && c != '\\') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{quoted}\""))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));
    (
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(content_type)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response()
}

fn content_type_for(kind: MaterialKind) -> &'static str {
    match kind {
        MaterialKind::Pdf => "application/pdf",
        MaterialKind::Text => "text/plain; charset=utf-8",
        MaterialKind::Other => "application/octet-stream",
    }
}

async fn download_lesson(
    State(ctx): State<AppContext>,
    Path((name, index)): Path<(String, usize)>,
) -> ApiResult<Response> {
    let lesson = ctx.courses.lesson(&name, index).await?;
    Ok(attachment(
        &lesson.download_name(),
        "text/plain; charset=utf-8",
        lesson.content.into_bytes(),
    ))
}

async fn chat(State(ctx): State<AppContext>, Json(req): Json<ChatRequest>) -> ApiResult<Json<ChatReply>> {
    Ok(Json(ctx.chat.ask(&req.course, &req.question, req.strategy).await?))
}

async fn get_history(
    State(ctx): State<AppContext>,
    Query(params): Query<HistoryQuery>,
) -> ApiResult<Json<Vec<ChatEntry>>> {
    Ok(Json(ctx.chat.history(params.course.as_deref(), params.limit).await?))
}

async fn clear_history(
    State(ctx): State<AppContext>,
    Query(params): Query<HistoryQuery>,
) -> ApiResult<Json<ClearedResponse>> {
    let removed = ctx.chat.clear_history(params.course.as_deref()).await?;
    Ok(Json(ClearedResponse { removed }))
}

async fn get_resources(State(ctx): State<AppContext>) -> ApiResult<Json<ResourcesResponse>> {
    Ok(Json(ResourcesResponse {
        links: ctx.resources.links().to_vec(),
        materials: ctx.resources.materials().await?,
    }))
}

async fn upload_material(
    State(ctx): State<AppContext>,
    multipart: Multipart,
) -> ApiResult<Json<MaterialUploadResponse>> {
    let form = read_upload(multipart).await?;
    let material = ctx.resources.upload(&form.filename, &form.bytes).await?;
    Ok(Json(MaterialUploadResponse {
        stored: material.is_some(),
        material,
    }))
}

async fn download_material(
    State(ctx): State<AppContext>,
    Path(filename): Path<String>,
) -> ApiResult<Response> {
    let (material, bytes) = ctx.resources.download(&filename).await?;
    Ok(attachment(&material.filename, content_type_for(material.kind), bytes))
}
