use std::collections::HashMap;
use serde::{Deserialize, Serialize};

use crate::features::{RawInputs, FIELD_NAMES};
use crate::predict::{Outcome, OutcomeKind};

/// Generic API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: String,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: "success".to_string(),
            data: Some(data),
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            data: None,
            message: Some(message.into()),
        }
    }
}

/// JSON counterpart of the form submission. Every field is optional.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PredictRequest {
    pub pclass: Option<String>,
    pub age: Option<String>,
    pub fare: Option<String>,
    pub sibsp: Option<String>,
    pub parch: Option<String>,
    pub sex: Option<String>,
    pub embarked: Option<String>,
}

impl PredictRequest {
    /// Converts to the field map the form handler works with, dropping absent fields.
    pub fn into_fields(self) -> HashMap<String, String> {
        let values = [
            self.pclass,
            self.age,
            self.fare,
            self.sibsp,
            self.parch,
            self.sex,
            self.embarked,
        ];
        FIELD_NAMES
            .into_iter()
            .zip(values)
            .filter_map(|(name, value)| value.map(|v| (name.to_string(), v)))
            .collect()
    }
}


/// Response body of the prediction API
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub prediction: Option<String>,
    pub inputs: RawInputs,
    pub outcome: OutcomeKind,
}

impl From<Outcome> for PredictResponse {
    fn from(outcome: Outcome) -> Self {
        Self {
            prediction: outcome.prediction,
            inputs: outcome.inputs,
            outcome: outcome.kind,
        }
    }
}
