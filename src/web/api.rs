use crate::pipeline::{
    decode, format_instant, transform, validate, MetricsSummary, NormalizedRecord,
};
use crate::web::counters::{CounterSnapshot, MetricsSink};
use crate::web::request_id::RequestIdResolver;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, ConnectInfo, State},
    http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

pub const REQUEST_ID_HEADER: &str = "x-request-id";
pub const PROCESSING_TIME_HEADER: &str = "x-processing-time-ms";

/// Shared state for the HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub request_ids: Arc<RequestIdResolver>,
    pub metrics: Arc<dyn MetricsSink>,
}

impl AppState {
    pub fn new(request_ids: RequestIdResolver, metrics: Arc<dyn MetricsSink>) -> Self {
        Self {
            request_ids: Arc::new(request_ids),
            metrics,
        }
    }

    fn reject(&self, request_id: String, message: impl Into<String>) -> ApiError {
        self.metrics.request_failed();
        ApiError::BadRequest {
            message: message.into(),
            request_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TransformResponse {
    pub transformed_logs: Vec<NormalizedRecord>,
    pub metrics: MetricsSummary,
    pub request_id: String,
    pub processed_at: String,
}

/// `/`, `/transform` and any unmatched path
pub async fn transform_logs(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    let start = Instant::now();
    let request_id = state.request_ids.resolve(&headers);
    state.metrics.request_started();

    let remote_addr = connect_info
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    info!(
        request_id = %request_id,
        method = %method,
        path = %uri.path(),
        remote_addr = %remote_addr,
        "Request started"
    );

    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            warn!(request_id = %request_id, error = %rejection, "Failed to read request body");
            return Err(state.reject(request_id, "failed to read request body"));
        }
    };

    let raw = match decode(&body) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(request_id = %request_id, error = %e, "Invalid JSON payload");
            return Err(state.reject(request_id, e.to_string()));
        }
    };

    info!(request_id = %request_id, log_count = raw.len(), "Processing batch");

    if let Err(e) = validate(&raw) {
        warn!(
            request_id = %request_id,
            log_index = e.index,
            error = %e.reason,
            "Validation failed"
        );
        return Err(state.reject(request_id, e.to_string()));
    }

    let (transformed_logs, metrics) = transform(&raw, &request_id);
    state.metrics.logs_processed(raw.len());

    let duration_ms = start.elapsed().as_millis();
    info!(
        request_id = %request_id,
        duration_ms = duration_ms as u64,
        logs_processed = transformed_logs.len(),
        errors = metrics.errors_by_type.len(),
        "Request completed"
    );

    let response_headers = [
        (HeaderName::from_static(REQUEST_ID_HEADER), HeaderValue::from_str(&request_id).ok()),
        (
            HeaderName::from_static(PROCESSING_TIME_HEADER),
            HeaderValue::from_str(&duration_ms.to_string()).ok(),
        ),
    ];

    let mut response = Json(TransformResponse {
        transformed_logs,
        metrics,
        request_id,
        processed_at: format_instant(Utc::now()),
    })
    .into_response();

    for (name, value) in response_headers {
        if let Some(value) = value {
            response.headers_mut().insert(name, value);
        }
    }

    Ok(response)
}

/// GET /metrics
pub async fn get_counters(State(state): State<AppState>) -> Json<CounterSnapshot> {
    Json(state.metrics.snapshot())
}

/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}

// Error handling
#[derive(Debug)]
pub enum ApiError {
    BadRequest { message: String, request_id: String },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, request_id) = match self {
            ApiError::BadRequest {
                message,
                request_id,
            } => (StatusCode::BAD_REQUEST, message, request_id),
        };

        (
            status,
            Json(serde_json::json!({ "error": message, "request_id": request_id })),
        )
            .into_response()
    }
}
