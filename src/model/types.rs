use std::path::PathBuf;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ModelHolder;
use crate::features::FEATURE_COLUMNS;

/// Model information for the status endpoint and the page banner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelStatus {
    /// Whether predictions can be served
    pub available: bool,
    /// Configured artifact path
    pub path: PathBuf,
    /// When the artifact was loaded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loaded_at: Option<DateTime<Utc>>,
    /// Number of trees in the forest
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_estimators: Option<usize>,
    /// Class labels the model can emit
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<i64>,
    /// Input column order
    pub features: Vec<String>,
    /// Why the model could not be loaded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<&ModelHolder> for ModelStatus {
    fn from(holder: &ModelHolder) -> Self {
        let features = FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect();
        match holder {
            ModelHolder::Loaded(model) => Self {
                available: true,
                path: model.path.clone(),
                loaded_at: Some(model.loaded_at),
                n_estimators: Some(model.classifier.n_estimators()),
                classes: model.classifier.classes().to_vec(),
                features,
                reason: None,
            },
            ModelHolder::Unavailable { path, reason } => Self {
                available: false,
                path: path.clone(),
                loaded_at: None,
                n_estimators: None,
                classes: Vec::new(),
                features,
                reason: Some(reason.clone()),
            },
        }
    }
}
