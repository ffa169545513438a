use std::fs;
use std::path::Path;
use ndarray::{ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use super::{Classifier, ModelError, PredictError};
use crate::features::FEATURE_COLUMNS;

/// Artifact format this build understands.
pub const SUPPORTED_FORMAT_VERSION: u32 = 1;

/// A node of an exported decision tree.
///
/// Split nodes send a row left when `row[feature] <= threshold`, with the
/// row value first rounded to `f32` as scikit-learn does before comparing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Per-class weights (sample counts or fractions) reaching this leaf.
    Leaf { value: Vec<f64> },
}

/// One tree of the forest, stored as a flat node list rooted at index 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Walks the tree for `row` and returns the leaf's class probabilities.
    fn leaf_probabilities(&self, row: ArrayView1<f64>) -> Vec<f64> {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Split { feature, threshold, left, right } => {
                    // Inputs are compared at f32 precision, like the trainer does
                    let value = row[*feature] as f32 as f64;
                    index = if value <= *threshold { *left } else { *right };
                }
                Node::Leaf { value } => {
                    let total: f64 = value.iter().sum();
                    if total > 0.0 {
                        return value.iter().map(|v| v / total).collect();
                    }
                    return value.clone();
                }
            }
        }
    }

    /// Checks node references so that `leaf_probabilities` can never index
    /// out of bounds or loop.
    fn validate(&self, tree: usize, n_features: usize, n_classes: usize) -> Result<(), ModelError> {
        let invalid = |node: usize, reason: String| ModelError::InvalidTree { tree, node, reason };

        if self.nodes.is_empty() {
            return Err(invalid(0, "tree has no nodes".to_string()));
        }

        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Split { feature, threshold, left, right } => {
                    if *feature >= n_features {
                        return Err(invalid(i, format!(
                            "feature index {} out of range for {} columns", feature, n_features
                        )));
                    }
                    if threshold.is_nan() {
                        return Err(invalid(i, "threshold is NaN".to_string()));
                    }
                    for child in [*left, *right] {
                        if child <= i || child >= self.nodes.len() {
                            return Err(invalid(i, format!("child index {} is invalid", child)));
                        }
                    }
                }
                Node::Leaf { value } => {
                    if value.len() != n_classes {
                        return Err(invalid(i, format!(
                            "leaf has {} class weights, expected {}", value.len(), n_classes
                        )));
                    }
                    if value.iter().any(|v| !v.is_finite() || *v < 0.0) {
                        return Err(invalid(i, "leaf weights must be finite and non-negative".to_string()));
                    }
                }
            }
        }
        Ok(())
    }
}

/// On-disk layout of a forest export, before validation.
#[derive(Deserialize)]
struct ForestFile {
    format_version: u32,
    #[serde(default)]
    feature_names: Option<Vec<String>>,
    classes: Vec<i64>,
    trees: Vec<DecisionTree>,
}

/// A random forest classifier exported from training as JSON.
///
/// Only constructed through [`RandomForest::load`] or
/// [`RandomForest::from_json`], so every instance has passed validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RandomForest {
    format_version: u32,
    /// Training column order; checked against `FEATURE_COLUMNS` when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    feature_names: Option<Vec<String>>,
    classes: Vec<i64>,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Reads and validates a forest artifact.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let content = fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parses and validates a forest from its JSON text.
    pub fn from_json(content: &str) -> Result<Self, ModelError> {
        let file: ForestFile = serde_json::from_str(content)?;
        let forest = Self {
            format_version: file.format_version,
            feature_names: file.feature_names,
            classes: file.classes,
            trees: file.trees,
        };
        forest.validate()?;
        Ok(forest)
    }

    pub fn format_version(&self) -> u32 {
        self.format_version
    }

    pub fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.format_version != SUPPORTED_FORMAT_VERSION {
            return Err(ModelError::UnsupportedVersion {
                found: self.format_version,
                supported: SUPPORTED_FORMAT_VERSION,
            });
        }

        if let Some(names) = &self.feature_names {
            if names.iter().map(String::as_str).ne(FEATURE_COLUMNS) {
                return Err(ModelError::FeatureMismatch {
                    expected: FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
                    found: names.clone(),
                });
            }
        }

        if self.classes.is_empty() {
            return Err(ModelError::Empty("class list"));
        }
        if self.trees.is_empty() {
            return Err(ModelError::Empty("tree list"));
        }

        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(i, self.n_features(), self.classes.len())?;
        }
        Ok(())
    }

    /// Mean class probabilities over all trees for one row.
    ///
    /// `row` must already be checked against `n_features`.
    pub(crate) fn predict_proba_row(&self, row: ArrayView1<f64>) -> Vec<f64> {
        let mut sums = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            for (sum, p) in sums.iter_mut().zip(tree.leaf_probabilities(row)) {
                *sum += p;
            }
        }
        let n = self.trees.len() as f64;
        sums.into_iter().map(|s| s / n).collect()
    }
}

impl Classifier for RandomForest {
    fn n_features(&self) -> usize {
        FEATURE_COLUMNS.len()
    }

    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn n_estimators(&self) -> usize {
        self.trees.len()
    }

    fn predict(&self, rows: ArrayView2<f64>) -> Result<Vec<i64>, PredictError> {
        if rows.ncols() != self.n_features() {
            return Err(PredictError::ShapeMismatch {
                expected: self.n_features(),
                found: rows.ncols(),
            });
        }

        rows.outer_iter()
            .enumerate()
            .map(|(i, row)| {
                if let Some(col) = row.iter().position(|v| !v.is_finite()) {
                    return Err(PredictError::NonFinite {
                        row: i,
                        column: FEATURE_COLUMNS[col],
                    });
                }

                // First maximum wins on ties
                let probabilities = self.predict_proba_row(row);
                let mut best = 0;
                for (class, p) in probabilities.iter().enumerate() {
                    if *p > probabilities[best] {
                        best = class;
                    }
                }
                Ok(self.classes[best])
            })
            .collect()
    }
}
