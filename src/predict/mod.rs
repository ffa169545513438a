//! # Prediction Handler
//!
//! Turns one form submission into the text shown on the page.
//!
//! `handle_request` is the single entry point used by both the HTML form and
//! the JSON API. It always returns an [`Outcome`]: validation and inference
//! failures become user-facing messages, and the submitted raw values are
//! always handed back for re-display.

use std::collections::HashMap;
use axum::http::Method;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::features::{ParsedInputs, RawInputs, ValidationError};
use crate::model::{Classifier, ModelHolder, PredictError};

/// The label the classifier uses for survivors.
pub const SURVIVED_LABEL: i64 = 1;

/// How a request was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    /// Nothing submitted, the blank form is shown
    Form,
    Survived,
    Died,
    InvalidInput,
    InferenceError,
    /// A submission arrived but no model is loaded
    Unavailable,
}

/// Result of handling one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    /// Text for the result area, `None` when there is nothing to report
    pub prediction: Option<String>,
    /// Values to pre-fill the form with
    pub inputs: RawInputs,
    pub kind: OutcomeKind,
}

impl Outcome {
    fn empty(kind: OutcomeKind) -> Self {
        Self {
            prediction: None,
            inputs: RawInputs::default(),
            kind,
        }
    }
}

/// Sentence shown for a predicted label.
///
/// Only the survivor label counts as survival; every other label, including
/// values outside {0, 1}, reads as "died".
pub fn survival_text(label: i64) -> String {
    let verb = if label == SURVIVED_LABEL { "survived" } else { "died" };
    format!("Prediction: the passenger would have {}.", verb)
}

/// Message for numeric fields that failed to parse.
pub fn validation_text(err: &ValidationError) -> String {
    format!(
        "Invalid input: check that all numbers are valid and use a period (.) for decimals. Detail: {}",
        err
    )
}

/// Message for failures while encoding or predicting.
pub fn inference_text(err: &PredictError) -> String {
    format!("An unexpected error occurred during prediction. Detail: {}", err)
}

/// Encodes parsed inputs and asks the classifier for a single label.
fn predict_label(classifier: &dyn Classifier, parsed: &ParsedInputs) -> Result<i64, PredictError> {
    let features = parsed.encode();
    let columns: Vec<String> = features
        .named()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect();
    debug!("Encoded passenger features: [{}]", columns.join(", "));

    let labels = classifier.predict(features.to_row().view())?;
    labels.first().copied().ok_or(PredictError::EmptyOutput)
}

/// Handles a request to the prediction page.
///
/// GET requests, any other non-POST method, and POSTs arriving while no model
/// is loaded get the default inputs and no prediction. A POST with a loaded
/// model echoes the submitted values (defaults for missing fields) together
/// with the prediction or an error message.
pub fn handle_request(
    model: &ModelHolder,
    method: &Method,
    form: &HashMap<String, String>,
) -> Outcome {
    if *method != Method::POST {
        return Outcome::empty(OutcomeKind::Form);
    }

    let Some(classifier) = model.classifier() else {
        warn!("Prediction requested but no model is loaded");
        return Outcome::empty(OutcomeKind::Unavailable);
    };

    let inputs = RawInputs::from_form(form);

    let result = inputs.parse().map(|parsed| predict_label(classifier, &parsed));
    let (prediction, kind) = match result {
        Err(e) => {
            info!(field = e.field(), "Rejected submission: {}", e);
            (validation_text(&e), OutcomeKind::InvalidInput)
        }
        Ok(Err(e)) => {
            warn!("Prediction failed: {}", e);
            (inference_text(&e), OutcomeKind::InferenceError)
        }
        Ok(Ok(label)) => {
            info!(label, "Prediction served");
            let kind = if label == SURVIVED_LABEL { OutcomeKind::Survived } else { OutcomeKind::Died };
            (survival_text(label), kind)
        }
    };

    Outcome {
        prediction: Some(prediction),
        inputs,
        kind,
    }
}
