use std::num::{ParseFloatError, ParseIntError};
use ndarray::Array2;
use serde::Serialize;
use thiserror::Error;

use super::RawInputs;

/// Column order the classifier was trained on.
///
/// Nothing at prediction time can detect a reordering here: a mismatch only
/// shows up as wrong predictions.
pub const FEATURE_COLUMNS: [&str; 9] = [
    "Age",
    "SibSp",
    "Parch",
    "Fare",
    "Sex_male",
    "Embarked_Q",
    "Embarked_S",
    "Pclass_2",
    "Pclass_3",
];

/// A numeric form field that could not be coerced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must be a whole number, got {value:?} ({source})")]
    Integer {
        field: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },
    #[error("{field} must be a number, got {value:?} ({source})")]
    Float {
        field: &'static str,
        value: String,
        #[source]
        source: ParseFloatError,
    },
}

impl ValidationError {
    /// Name of the offending form field.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Integer { field, .. } | ValidationError::Float { field, .. } => field,
        }
    }
}

/// Typed passenger attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedInputs {
    pub pclass: i64,
    pub age: f64,
    pub fare: f64,
    pub sibsp: i64,
    pub parch: i64,
    pub sex: String,
    pub embarked: String,
}

fn parse_int(field: &'static str, value: &str) -> Result<i64, ValidationError> {
    value.trim().parse::<i64>().map_err(|source| ValidationError::Integer {
        field,
        value: value.to_string(),
        source,
    })
}

fn parse_float(field: &'static str, value: &str) -> Result<f64, ValidationError> {
    value.trim().parse::<f64>().map_err(|source| ValidationError::Float {
        field,
        value: value.to_string(),
        source,
    })
}

impl ParsedInputs {
    /// Coerces the numeric fields of `raw`.
    ///
    /// Fields are checked in the order pclass, age, fare, sibsp, parch and the
    /// first failure is returned. Surrounding whitespace is ignored; a comma
    /// decimal separator is rejected.
    ///
    /// Digit separators (`"1_0"`) are rejected, and integers must fit in an
    /// `i64`: an oversized class such as `"99999999999999999999"` is a
    /// validation error rather than the reference class.
    pub fn parse(raw: &RawInputs) -> Result<Self, ValidationError> {
        Ok(Self {
            pclass: parse_int("pclass", &raw.pclass)?,
            age: parse_float("age", &raw.age)?,
            fare: parse_float("fare", &raw.fare)?,
            sibsp: parse_int("sibsp", &raw.sibsp)?,
            parch: parse_int("parch", &raw.parch)?,
            sex: raw.sex.clone(),
            embarked: raw.embarked.clone(),
        })
    }

    /// One-hot encodes these inputs into the classifier's column layout.
    pub fn encode(&self) -> FeatureVector {
        FeatureVector::from(self)
    }
}

fn indicator(flag: bool) -> f64 {
    if flag { 1.0 } else { 0.0 }
}

/// A single classifier row in `FEATURE_COLUMNS` order.
///
/// Reference categories are female, Cherbourg (or any unknown port) and
/// first class (or any unknown class): they encode as all-zero indicators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FeatureVector {
    pub age: f64,
    pub sib_sp: f64,
    pub parch: f64,
    pub fare: f64,
    #[serde(rename = "Sex_male")]
    pub sex_male: f64,
    #[serde(rename = "Embarked_Q")]
    pub embarked_q: f64,
    #[serde(rename = "Embarked_S")]
    pub embarked_s: f64,
    #[serde(rename = "Pclass_2")]
    pub pclass_2: f64,
    #[serde(rename = "Pclass_3")]
    pub pclass_3: f64,
}

impl From<&ParsedInputs> for FeatureVector {
    fn from(inputs: &ParsedInputs) -> Self {
        Self {
            age: inputs.age,
            sib_sp: inputs.sibsp as f64,
            parch: inputs.parch as f64,
            fare: inputs.fare,
            sex_male: indicator(inputs.sex == "male"),
            embarked_q: indicator(inputs.embarked == "Q"),
            embarked_s: indicator(inputs.embarked == "S"),
            pclass_2: indicator(inputs.pclass == 2),
            pclass_3: indicator(inputs.pclass == 3),
        }
    }
}

impl FeatureVector {
    /// Values in `FEATURE_COLUMNS` order.
    pub fn values(&self) -> [f64; 9] {
        [
            self.age,
            self.sib_sp,
            self.parch,
            self.fare,
            self.sex_male,
            self.embarked_q,
            self.embarked_s,
            self.pclass_2,
            self.pclass_3,
        ]
    }

    /// Pairs each column name with its value.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> {
        FEATURE_COLUMNS.into_iter().zip(self.values())
    }

    /// Shapes the vector as a single-row table for [`crate::model::Classifier::predict`].
    pub fn to_row(&self) -> Array2<f64> {
        let values = self.values();
        Array2::from_shape_fn((1, values.len()), |(_, col)| values[col])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pclass: &str, sex: &str, embarked: &str) -> RawInputs {
        RawInputs {
            pclass: pclass.to_string(),
            sex: sex.to_string(),
            embarked: embarked.to_string(),
            ..RawInputs::default()
        }
    }

    #[test]
    fn test_reference_passenger_encodes_to_zero_indicators() {
        let inputs = RawInputs {
            pclass: "1".to_string(),
            age: "29".to_string(),
            fare: "100".to_string(),
            sibsp: "0".to_string(),
            parch: "0".to_string(),
            sex: "female".to_string(),
            embarked: "C".to_string(),
        };
        let features = inputs.parse().unwrap().encode();

        assert_eq!(
            features.values(),
            [29.0, 0.0, 0.0, 100.0, 0.0, 0.0, 0.0, 0.0, 0.0]
        );
    }

    #[test]
    fn test_indicator_grid() {
        for pclass in [1, 2, 3] {
            for sex in ["male", "female"] {
                for embarked in ["Q", "S", "C"] {
                    let f = raw(&pclass.to_string(), sex, embarked).parse().unwrap().encode();

                    match pclass {
                        1 => assert_eq!((f.pclass_2, f.pclass_3), (0.0, 0.0)),
                        2 => assert_eq!((f.pclass_2, f.pclass_3), (1.0, 0.0)),
                        _ => assert_eq!((f.pclass_2, f.pclass_3), (0.0, 1.0)),
                    }
                    match embarked {
                        "Q" => assert_eq!((f.embarked_q, f.embarked_s), (1.0, 0.0)),
                        "S" => assert_eq!((f.embarked_q, f.embarked_s), (0.0, 1.0)),
                        _ => assert_eq!((f.embarked_q, f.embarked_s), (0.0, 0.0)),
                    }
                    assert_eq!(f.sex_male, if sex == "male" { 1.0 } else { 0.0 });
                }
            }
        }
    }

    #[test]
    fn test_unrecognised_categories_fall_into_reference() {
        let f = raw("7", "Male", "s").parse().unwrap().encode();
        assert_eq!(f.sex_male, 0.0);
        assert_eq!((f.embarked_q, f.embarked_s), (0.0, 0.0));
        assert_eq!((f.pclass_2, f.pclass_3), (0.0, 0.0));
    }

    #[test]
    fn test_non_numeric_age_is_rejected() {
        let inputs = RawInputs { age: "thirty".to_string(), ..RawInputs::default() };
        let err = inputs.parse().unwrap_err();

        assert_eq!(err.field(), "age");
        assert!(err.to_string().contains("\"thirty\""));
    }

    #[test]
    fn test_comma_decimal_separator_is_rejected() {
        let inputs = RawInputs { fare: "7,25".to_string(), ..RawInputs::default() };
        assert_eq!(inputs.parse().unwrap_err().field(), "fare");
    }

    #[test]
    fn test_fractional_class_is_not_an_integer() {
        let inputs = RawInputs { pclass: "3.0".to_string(), ..RawInputs::default() };
        assert!(matches!(inputs.parse(), Err(ValidationError::Integer { field: "pclass", .. })));
    }

    #[test]
    fn test_first_failing_field_is_reported() {
        let inputs = RawInputs {
            age: "old".to_string(),
            parch: "many".to_string(),
            ..RawInputs::default()
        };
        assert_eq!(inputs.parse().unwrap_err().field(), "age");
    }

    #[test]
    fn test_digit_separators_and_oversized_integers_are_rejected() {
        let underscored = RawInputs { sibsp: "1_0".to_string(), ..RawInputs::default() };
        assert_eq!(underscored.parse().unwrap_err().field(), "sibsp");

        let oversized = RawInputs { pclass: "99999999999999999999".to_string(), ..RawInputs::default() };
        assert!(matches!(oversized.parse(), Err(ValidationError::Integer { field: "pclass", .. })));

        let underscored_float = RawInputs { fare: "1_000.5".to_string(), ..RawInputs::default() };
        assert_eq!(underscored_float.parse().unwrap_err().field(), "fare");
    }

    #[test]
    fn test_whitespace_is_trimmed_before_parsing() {
        let inputs = RawInputs {
            pclass: " 2 ".to_string(),
            age: "\t41.5\n".to_string(),
            ..RawInputs::default()
        };
        let parsed = inputs.parse().unwrap();
        assert_eq!(parsed.pclass, 2);
        assert_eq!(parsed.age, 41.5);
    }

    #[test]
    fn test_row_has_single_row_in_column_order() {
        let f = RawInputs::default().parse().unwrap().encode();
        let row = f.to_row();

        assert_eq!(row.shape(), &[1, 9]);
        assert_eq!(row.row(0).to_vec(), f.values().to_vec());
        let names: Vec<&str> = f.named().map(|(name, _)| name).collect();
        assert_eq!(names, FEATURE_COLUMNS.to_vec());
    }

    #[test]
    fn test_serialized_vector_uses_column_names() {
        let f = RawInputs::default().parse().unwrap().encode();
        let json = serde_json::to_value(f).unwrap();
        for column in FEATURE_COLUMNS {
            assert!(json.get(column).is_some(), "missing column {}", column);
        }
    }
}
