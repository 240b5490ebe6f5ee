//! HTTP prediction service

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::disease::Disease;
use crate::error::{Result, RiskError};
use crate::inference::InferenceEngine;
use crate::input::{InputValue, RawInput};
use crate::schema::FeatureSchema;

/// Body of `POST /predict`
#[derive(Debug, Clone, Deserialize)]
pub struct PredictRequest {
    pub disease: String,
    #[serde(default)]
    pub symptoms: BTreeMap<String, Option<InputValue>>,
    /// Merged after `symptoms`, so it wins on a shared key
    #[serde(default)]
    pub clinical: BTreeMap<String, Option<InputValue>>,
}

/// Response of `POST /predict`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub disease: String,
    /// Risk percentage
    pub risk_level: f64,
    pub model_accuracy: Option<f64>,
}

/// Error returned to HTTP clients as `{"error": message}`
#[derive(Debug)]
pub enum ApiError {
    /// Failure raised while handling a well-formed request
    Risk(RiskError),
    /// Request body that is not valid JSON or does not match [`PredictRequest`]
    Body(JsonRejection),
}

impl From<RiskError> for ApiError {
    fn from(err: RiskError) -> Self {
        Self::Risk(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Body(rejection)
    }
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Risk(RiskError::InvalidDisease(_)) => StatusCode::BAD_REQUEST,
            Self::Risk(RiskError::MalformedInput { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Risk(RiskError::ArtifactNotFound { .. }) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Risk(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Body(rejection) => rejection.status(),
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Risk(err) => err.to_string(),
            Self::Body(rejection) => rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();
        match &self {
            Self::Risk(err) if !err.is_client_error() => error!("Request failed: {message}"),
            _ => warn!("Rejected request: {message}"),
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Routes for prediction, health and questionnaire schemas
pub fn router(engine: Arc<InferenceEngine>) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route("/health", get(health))
        .route("/schema/:disease", get(schema))
        .with_state(engine)
}

async fn predict(
    State(engine): State<Arc<InferenceEngine>>,
    payload: std::result::Result<Json<PredictRequest>, JsonRejection>,
) -> std::result::Result<Json<PredictResponse>, ApiError> {
    let Json(request) = payload?;
    let disease: Disease = request.disease.parse()?;
    let input = RawInput::from_json_maps([&request.symptoms, &request.clinical])?;

    // A cache miss reads artifacts from the store
    let result = tokio::task::spawn_blocking(move || engine.compute_risk(disease, &input))
        .await
        .map_err(|e| RiskError::Io(std::io::Error::other(e)))??;
    Ok(Json(PredictResponse {
        disease: disease.to_string(),
        risk_level: result.risk,
        model_accuracy: result.accuracy,
    }))
}

async fn health() -> &'static str {
    "ok"
}

async fn schema(
    Path(disease): Path<String>,
) -> std::result::Result<Json<&'static FeatureSchema>, ApiError> {
    Ok(Json(FeatureSchema::lookup(&disease)?))
}

/// Serve until Ctrl-C
pub async fn serve(bind: &str, engine: Arc<InferenceEngine>) -> Result<()> {
    let unavailable = engine.preload(&Disease::ALL);
    if unavailable.len() == Disease::ALL.len() {
        warn!("No trained models found; predictions will fail until models are trained");
    }

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, router(engine))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ArtifactId, ArtifactKind};

    #[test]
    fn test_status_mapping() {
        let status = |e: RiskError| ApiError::from(e).status();
        assert_eq!(status(RiskError::InvalidDisease("gout".into())), StatusCode::BAD_REQUEST);
        assert_eq!(
            status(RiskError::MalformedInput {
                feature: "age".into(),
                value: "old".into()
            }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status(RiskError::ArtifactNotFound {
                disease: Disease::Heart,
                kind: ArtifactKind::Model
            }),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status(RiskError::corrupt(
                ArtifactId::new(Disease::Heart, ArtifactKind::Model),
                "bad"
            )),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
