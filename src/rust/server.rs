//! HTTP surface of the inference service.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::classifier::Metrics;
use crate::error::ClassifierError;
use crate::service::{Classification, InferenceService, ModelInfo};

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub status: u16,
}

impl ClassifierError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::RequestError(_) => StatusCode::BAD_REQUEST,
            Self::ConnectionError(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::DataError(_) => "DATA_ERROR",
            Self::TrainingError(_) => "TRAINING_ERROR",
            Self::ArtifactError(_) => "ARTIFACT_ERROR",
            Self::RequestError(_) => "REQUEST_ERROR",
            Self::PredictionError(_) => "PREDICTION_ERROR",
            Self::ConnectionError(_) => "CONNECTION_ERROR",
        }
    }
}

impl IntoResponse for ClassifierError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();
        if status.is_server_error() {
            error!("Request failed: {}", message);
        } else {
            warn!("Rejected request: {}", message);
        }

        let body = Json(json!({
            "error": {
                "code": self.error_code(),
                "message": message,
                "status": status.as_u16(),
            }
        }));
        (status, body).into_response()
    }
}

pub async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": "Ticket Classifier API is running" }))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn classify(
    State(service): State<Arc<InferenceService>>,
    payload: Result<Json<ClassifyRequest>, JsonRejection>,
) -> Result<Json<Classification>, ClassifierError> {
    let Json(request) = payload.map_err(|rejection| ClassifierError::RequestError(rejection.body_text()))?;
    let classification = service.classify(&request.text)?;
    Ok(Json(classification))
}

pub async fn metrics(State(service): State<Arc<InferenceService>>) -> Json<Metrics> {
    Json(service.metrics())
}

pub async fn model_info(State(service): State<Arc<InferenceService>>) -> Json<ModelInfo> {
    Json(service.info())
}

/// Builds the API router around a loaded service.
pub fn build_router(service: Arc<InferenceService>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/classify/", post(classify))
        .route("/metrics/", get(metrics))
        .route("/info", get(model_info))
        .with_state(service)
        .layer(CorsLayer::permissive())
}

/// Serves on an already bound listener until `shutdown` resolves.
pub async fn serve_with_shutdown<F>(
    listener: TcpListener,
    service: Arc<InferenceService>,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!("Ticket classifier listening on http://{}", addr);
    }
    axum::serve(listener, build_router(service))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Binds `addr` and serves until Ctrl-C.
pub async fn serve(service: Arc<InferenceService>, addr: SocketAddr) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    serve_with_shutdown(listener, service, async {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
        }
    })
    .await
}
