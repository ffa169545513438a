//! # Passenger Features
//!
//! Everything between the submitted form and the classifier input lives here:
//!
//! - `RawInputs`: the seven form fields exactly as the user typed them
//! - `ParsedInputs`: numeric fields coerced to their typed form
//! - `FeatureVector`: the fixed nine-column row handed to the model
//!
//! Raw inputs are kept separate from parsed ones so the page can always echo
//! what was submitted, even when coercion fails.

use std::collections::HashMap;
use serde::{Deserialize, Serialize};

pub mod encoder;

pub use encoder::{FeatureVector, ParsedInputs, ValidationError, FEATURE_COLUMNS};

/// Field names used by the form and the JSON API, in display order.
pub const FIELD_NAMES: [&str; 7] = ["pclass", "age", "fare", "sibsp", "parch", "sex", "embarked"];

/// Keeps the first value of each known field from submitted key/value pairs.
///
/// A repeated key does not override an earlier one, and unknown keys are
/// dropped.
pub fn first_values<I>(pairs: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut fields = HashMap::new();
    for (name, value) in pairs {
        if FIELD_NAMES.contains(&name.as_str()) {
            fields.entry(name).or_insert(value);
        }
    }
    fields
}

/// The seven passenger fields as submitted, always as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawInputs {
    pub pclass: String,
    pub age: String,
    pub fare: String,
    pub sibsp: String,
    pub parch: String,
    pub sex: String,
    pub embarked: String,
}

impl Default for RawInputs {
    /// Values shown on first page load.
    fn default() -> Self {
        Self {
            pclass: "3".to_string(),
            age: "30.0".to_string(),
            fare: "50.00".to_string(),
            sibsp: "0".to_string(),
            parch: "0".to_string(),
            sex: "female".to_string(),
            embarked: "S".to_string(),
        }
    }
}

impl RawInputs {
    /// Builds raw inputs from submitted form fields.
    ///
    /// Each missing field falls back to its default. Present fields are kept
    /// verbatim, including empty strings and surrounding whitespace.
    pub fn from_form(fields: &HashMap<String, String>) -> Self {
        let defaults = Self::default();
        let pick = |name: &str, fallback: String| fields.get(name).cloned().unwrap_or(fallback);

        Self {
            pclass: pick("pclass", defaults.pclass),
            age: pick("age", defaults.age),
            fare: pick("fare", defaults.fare),
            sibsp: pick("sibsp", defaults.sibsp),
            parch: pick("parch", defaults.parch),
            sex: pick("sex", defaults.sex),
            embarked: pick("embarked", defaults.embarked),
        }
    }

    /// Coerces the numeric fields, see [`ParsedInputs::parse`].
    pub fn parse(&self) -> Result<ParsedInputs, ValidationError> {
        ParsedInputs::parse(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_defaults_match_first_page_load() {
        let inputs = RawInputs::default();
        assert_eq!(inputs.pclass, "3");
        assert_eq!(inputs.age, "30.0");
        assert_eq!(inputs.fare, "50.00");
        assert_eq!(inputs.sibsp, "0");
        assert_eq!(inputs.parch, "0");
        assert_eq!(inputs.sex, "female");
        assert_eq!(inputs.embarked, "S");
    }

    #[test]
    fn test_from_empty_form_uses_defaults() {
        assert_eq!(RawInputs::from_form(&HashMap::new()), RawInputs::default());
    }

    #[test]
    fn test_from_form_keeps_submitted_values_verbatim() {
        let inputs = RawInputs::from_form(&form(&[
            ("pclass", "1"),
            ("age", " 4,5 "),
            ("sex", ""),
            ("embarked", "x"),
        ]));

        assert_eq!(inputs.pclass, "1");
        assert_eq!(inputs.age, " 4,5 ");
        assert_eq!(inputs.sex, "");
        assert_eq!(inputs.embarked, "x");
        // Missing fields fall back individually
        assert_eq!(inputs.fare, "50.00");
        assert_eq!(inputs.sibsp, "0");
        assert_eq!(inputs.parch, "0");
    }

    #[test]
    fn test_unknown_form_fields_are_ignored() {
        let inputs = RawInputs::from_form(&form(&[("name", "Rose"), ("pclass", "2")]));
        assert_eq!(inputs.pclass, "2");
        assert_eq!(inputs, RawInputs { pclass: "2".to_string(), ..RawInputs::default() });
    }

    #[test]
    fn test_first_values_keeps_first_occurrence() {
        let pairs = vec![
            ("age".to_string(), "5".to_string()),
            ("name".to_string(), "Rose".to_string()),
            ("age".to_string(), "thirty".to_string()),
            ("sex".to_string(), "male".to_string()),
        ];
        let fields = first_values(pairs);

        assert_eq!(fields.len(), 2);
        assert_eq!(fields["age"], "5");
        assert_eq!(fields["sex"], "male");
        assert!(!fields.contains_key("name"));
    }
}
