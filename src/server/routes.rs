use axum::{
    Json,
    Form,
    extract::{State, rejection::FormRejection},
    http::{Method, StatusCode},
    response::{Html, IntoResponse},
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, info_span, warn};
use uuid::Uuid;

use crate::features::first_values;
use crate::model::{ModelHolder, ModelStatus};
use crate::predict::{handle_request, OutcomeKind};
use super::page;
use super::types::{ApiResponse, PredictRequest, PredictResponse};

/// Returns a health check response
pub async fn health_check() -> &'static str {
    info!("Health check endpoint called");
    "Titanic survival predictor is running!"
}

/// Serves the prediction form (GET) and handles submissions (POST).
///
/// A body that is not a URL-encoded form is treated as an empty submission,
/// so every field falls back to its default. When a field is repeated, its
/// first value is used.
pub async fn index(
    State(model): State<Arc<ModelHolder>>,
    method: Method,
    form: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Html<String> {
    let fields = match form {
        Ok(Form(pairs)) => first_values(pairs),
        Err(e) => {
            warn!("Ignoring unreadable form body: {}", e);
            HashMap::new()
        }
    };

    let span = info_span!("form", request_id = %Uuid::new_v4(), %method);
    let outcome = span.in_scope(|| handle_request(&model, &method, &fields));

    Html(page::render(
        outcome.prediction.as_deref(),
        &outcome.inputs,
        model.is_available(),
    ))
}

/// Returns the loaded model's details, or why it is unavailable.
pub async fn model_status(State(model): State<Arc<ModelHolder>>) -> impl IntoResponse {
    info!("Model status endpoint called");
    Json(ApiResponse::<ModelStatus>::success(model.status()))
}

/// Runs a prediction from a JSON body.
///
/// Input problems are reported in the body with a 200 status; only a missing
/// model turns into 503 Service Unavailable.
pub async fn predict(
    State(model): State<Arc<ModelHolder>>,
    Json(request): Json<PredictRequest>,
) -> impl IntoResponse {
    let fields = request.into_fields();

    let span = info_span!("api_predict", request_id = %Uuid::new_v4());
    let outcome = span.in_scope(|| handle_request(&model, &Method::POST, &fields));

    match outcome.kind {
        OutcomeKind::Unavailable => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse::<PredictResponse>::error("Model is not loaded; predictions are unavailable")),
        ),
        OutcomeKind::InvalidInput | OutcomeKind::InferenceError => {
            let message = outcome.prediction.clone();
            let mut response = ApiResponse::success(PredictResponse::from(outcome));
            response.status = "error".to_string();
            response.message = message;
            (StatusCode::OK, Json(response))
        }
        _ => (StatusCode::OK, Json(ApiResponse::success(PredictResponse::from(outcome)))),
    }
}
