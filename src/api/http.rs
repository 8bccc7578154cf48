//! HTTP surface: a thin axum router over [`Predictor`].

use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};

use crate::common::error::PredictError;
use crate::features::domain::{feature_names, FEATURE_COUNT};
use crate::inference::{ErrorBody, Predictor};

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    model: ModelSummary,
}

#[derive(Debug, Serialize)]
struct ModelSummary {
    kind: &'static str,
    fingerprint: String,
    features: usize,
}

#[derive(Debug, Serialize)]
struct FeaturesResponse {
    features: Vec<&'static str>,
}

/// Build the service router. CORS is open to any origin.
pub fn router(predictor: Predictor) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/predict", post(predict))
        .route("/health", get(health))
        .route("/features", get(features))
        .layer(cors)
        .with_state(predictor)
}

async fn predict(State(predictor): State<Predictor>, body: Bytes) -> Response {
    let outcome = match serde_json::from_slice::<Value>(&body) {
        Ok(Value::Object(record)) => predictor.handle(&record),
        _ => Err(PredictError::MalformedRecord),
    };

    match outcome {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(err) => error_response(&err),
    }
}

async fn health(State(predictor): State<Predictor>) -> Json<HealthResponse> {
    let meta = predictor.model().metadata();
    Json(HealthResponse {
        status: "ok",
        model: ModelSummary {
            kind: meta.kind.as_str(),
            fingerprint: meta.fingerprint.clone(),
            features: FEATURE_COUNT,
        },
    })
}

async fn features() -> Json<FeaturesResponse> {
    Json(FeaturesResponse {
        features: feature_names().collect(),
    })
}

fn status_for(err: &PredictError) -> StatusCode {
    if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

fn error_response(err: &PredictError) -> Response {
    (status_for(err), Json(ErrorBody::from(err))).into_response()
}
