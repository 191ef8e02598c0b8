//! HTTP server for the conversion API.
//!
//! # API Endpoints
//!
//! | Method | Path           | Description                               |
//! |--------|----------------|-------------------------------------------|
//! | GET    | `/health`      | Health check                              |
//! | GET    | `/api/kinds`   | Available conversions                     |
//! | POST   | `/api/convert` | Convert an upload (`file`, `kind`, `confirm`) |
//! | GET    | `/api/logs`    | SSE stream of conversion logs             |

use std::{convert::Infallible, net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    extract::{Multipart, State},
    http::{header, Method, StatusCode},
    response::{sse::Event, Json, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::{log_error, log_info, LOG_BROADCASTER};
use super::types::{error_response, ConvertResponse, KindInfo};
use crate::config::Rules;
use crate::error::{PipelineError, ServerError};
use crate::models::RecordKind;
use crate::parser::ParseOptions;
use crate::transform::pipeline::{convert_bytes, ConvertOptions};

type ApiError = (StatusCode, Json<Value>);

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Pipeline(PipelineError::Csv(_))
            | ServerError::Pipeline(PipelineError::Schema(_))
            | ServerError::Pipeline(PipelineError::UnknownKind(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ServerError::Pipeline(_) | ServerError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn into_api_error(self) -> ApiError {
        (self.status(), Json(error_response(&self.to_string())))
    }
}

/// Build the router around the rules every request converts with.
pub fn router(rules: Rules) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/kinds", get(kinds))
        .route("/api/convert", post(convert_upload))
        .route("/api/logs", get(sse_logs))
        .layer(cors)
        .with_state(Arc::new(rules))
}

/// Start the HTTP server.
pub async fn start_server(port: u16, rules: Rules) -> Result<(), Box<dyn std::error::Error>> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    eprintln!("🚀 Edusuite converter running on http://localhost:{}", port);
    eprintln!("   POST /api/convert - Convert an uploaded CSV");
    eprintln!("   GET  /api/kinds   - Available conversions");
    eprintln!("   GET  /api/logs    - SSE log stream");
    eprintln!("   GET  /health      - Health check");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(rules)).await?;

    Ok(())
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "edusuite",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "kinds": "GET /api/kinds",
            "convert": "POST /api/convert",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

async fn kinds() -> Json<Vec<KindInfo>> {
    Json(RecordKind::ALL.iter().copied().map(KindInfo::from).collect())
}

async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    // Lagged receivers skip what they missed.
    let stream = BroadcastStream::new(rx).filter_map(|result| {
        let entry = result.ok()?;
        let json = serde_json::to_string(&entry).ok()?;
        Some(Ok(Event::default().data(json)))
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Fields of a convert request.
#[derive(Debug, Default)]
struct ConvertRequest {
    file: Option<(Option<String>, Vec<u8>)>,
    kind: Option<String>,
    confirm: bool,
}

async fn read_request(mut multipart: Multipart) -> Result<ConvertRequest, ServerError> {
    let bad = |e: axum::extract::multipart::MultipartError| {
        ServerError::BadRequest(format!("Multipart error: {}", e))
    };
    let mut request = ConvertRequest::default();

    while let Some(field) = multipart.next_field().await.map_err(bad)? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().map(str::to_string);
                let bytes = field.bytes().await.map_err(bad)?;
                request.file = Some((file_name, bytes.to_vec()));
            }
            "kind" => request.kind = Some(field.text().await.map_err(bad)?),
            "confirm" => {
                let text = field.text().await.map_err(bad)?;
                request.confirm = matches!(text.trim(), "true" | "1" | "yes" | "YES");
            }
            _ => {}
        }
    }
    Ok(request)
}

async fn convert_upload(
    State(rules): State<Arc<Rules>>,
    multipart: Multipart,
) -> Result<Json<ConvertResponse>, ApiError> {
    let request = read_request(multipart)
        .await
        .map_err(ServerError::into_api_error)?;

    let kind: RecordKind = request
        .kind
        .as_deref()
        .ok_or_else(|| ServerError::BadRequest("No kind provided".to_string()))
        .and_then(|k| {
            k.parse()
                .map_err(|_| ServerError::from(PipelineError::UnknownKind(k.to_string())))
        })
        .map_err(ServerError::into_api_error)?;
    let (file_name, bytes) = request
        .file
        .ok_or_else(|| ServerError::BadRequest("No file provided".to_string()).into_api_error())?;

    log_info(format!(
        "📄 New upload: {} ({} bytes) as {}",
        file_name.as_deref().unwrap_or("unknown"),
        bytes.len(),
        kind
    ));

    let options = ConvertOptions {
        confirm: request.confirm,
    };
    let conversion = convert_bytes(kind, &bytes, &rules, &options, &ParseOptions::default())
        .map_err(|e| {
            log_error(format!("Conversion failed: {}", e));
            ServerError::from(e).into_api_error()
        })?;

    let response = ConvertResponse::from_conversion(conversion).map_err(|e| {
        ServerError::Internal(e.to_string()).into_api_error()
    })?;
    Ok(Json(response))
}
