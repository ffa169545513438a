//! # Model Module
//!
//! Loading and holding the survival classifier.
//!
//! ## Key Components
//!
//! - `Classifier`: the inference seam, one integer label per input row
//! - `RandomForest`: the JSON-exported forest read from disk
//! - `ModelHolder`: the process-wide model state, either loaded or unavailable
//!
//! The holder is built once at startup and never mutated, so it can be shared
//! between request handlers behind an `Arc` without locking.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use chrono::{DateTime, Utc};
use ndarray::ArrayView2;
use thiserror::Error;
use tracing::{error, info};

pub mod forest;
pub mod types;

pub use forest::RandomForest;
pub use types::ModelStatus;

/// Errors that leave the model unavailable.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read model file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("model file is not a valid forest export: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unsupported model format version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
    #[error("model was trained on columns {found:?}, expected {expected:?}")]
    FeatureMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error("model has an empty {0}")]
    Empty(&'static str),
    #[error("tree {tree}, node {node}: {reason}")]
    InvalidTree {
        tree: usize,
        node: usize,
        reason: String,
    },
}

/// Errors raised while running a prediction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictError {
    #[error("expected {expected} feature columns, got {found}")]
    ShapeMismatch { expected: usize, found: usize },
    #[error("row {row} has a non-finite value in column {column}")]
    NonFinite { row: usize, column: &'static str },
    #[error("model returned no prediction")]
    EmptyOutput,
}

/// A trained classifier over rows of `FEATURE_COLUMNS`.
///
/// Implementations must be safe to call from several requests at once.
pub trait Classifier: Send + Sync {
    /// Number of input columns the model expects.
    fn n_features(&self) -> usize;

    /// Class labels the model can emit.
    fn classes(&self) -> &[i64];

    /// Number of sub-models (trees) in an ensemble, 1 otherwise.
    fn n_estimators(&self) -> usize {
        1
    }

    /// Predicts one class label per row of `rows`.
    fn predict(&self, rows: ArrayView2<f64>) -> Result<Vec<i64>, PredictError>;
}

/// A successfully loaded classifier and where it came from.
#[derive(Clone)]
pub struct LoadedModel {
    pub classifier: Arc<dyn Classifier>,
    pub path: PathBuf,
    pub loaded_at: DateTime<Utc>,
}

impl fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedModel")
            .field("path", &self.path)
            .field("loaded_at", &self.loaded_at)
            .field("classes", &self.classifier.classes())
            .field("n_estimators", &self.classifier.n_estimators())
            .finish()
    }
}

/// Process-wide model state, fixed at startup.
#[derive(Debug, Clone)]
pub enum ModelHolder {
    Loaded(LoadedModel),
    Unavailable { path: PathBuf, reason: String },
}

impl ModelHolder {
    /// Loads the forest at `path`.
    ///
    /// Never fails: a load error is logged once and recorded as
    /// `Unavailable`, so the server keeps running without predictions.
    pub fn load(path: &Path) -> Self {
        info!("Loading model from {}", path.display());
        match RandomForest::load(path) {
            Ok(forest) => {
                info!(
                    "Model loaded: {} trees, classes {:?}",
                    forest.trees().len(),
                    forest.classes()
                );
                Self::from_classifier(Arc::new(forest), path)
            }
            Err(e) => {
                error!("Failed to load model from {}: {}", path.display(), e);
                Self::Unavailable {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Wraps an already constructed classifier.
    pub fn from_classifier(classifier: Arc<dyn Classifier>, path: &Path) -> Self {
        Self::Loaded(LoadedModel {
            classifier,
            path: path.to_path_buf(),
            loaded_at: Utc::now(),
        })
    }

    /// The classifier, if one was loaded.
    pub fn classifier(&self) -> Option<&dyn Classifier> {
        match self {
            Self::Loaded(model) => Some(model.classifier.as_ref()),
            Self::Unavailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    /// Summary for the status endpoint.
    pub fn status(&self) -> ModelStatus {
        ModelStatus::from(self)
    }
}
