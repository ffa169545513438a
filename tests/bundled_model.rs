use std::path::Path;

use titanic_survival::features::RawInputs;
use titanic_survival::model::{Classifier, RandomForest};

fn bundled() -> RandomForest {
    RandomForest::load(&Path::new(env!("CARGO_MANIFEST_DIR")).join("models/titanic_forest.json"))
        .expect("bundled model should be valid")
}

fn predict(forest: &RandomForest, inputs: &RawInputs) -> i64 {
    let row = inputs.parse().unwrap().encode().to_row();
    forest.predict(row.view()).unwrap()[0]
}

#[test]
fn test_bundled_model_shape() {
    let forest = bundled();
    assert_eq!(forest.classes(), &[0, 1]);
    assert_eq!(forest.n_features(), 9);
    assert_eq!(forest.n_estimators(), 3);
}

#[test]
fn test_default_passenger_survives() {
    assert_eq!(predict(&bundled(), &RawInputs::default()), 1);
}

#[test]
fn test_adult_male_dies() {
    let inputs = RawInputs {
        pclass: "3".to_string(),
        age: "30".to_string(),
        sex: "male".to_string(),
        ..RawInputs::default()
    };
    assert_eq!(predict(&bundled(), &inputs), 0);
}

#[test]
fn test_young_boy_with_family_survives() {
    let inputs = RawInputs {
        age: "4".to_string(),
        sibsp: "1".to_string(),
        parch: "1".to_string(),
        sex: "male".to_string(),
        ..RawInputs::default()
    };
    assert_eq!(predict(&bundled(), &inputs), 1);
}

#[test]
fn test_predictions_are_deterministic() {
    let forest = bundled();
    let inputs = RawInputs {
        pclass: "2".to_string(),
        age: "27".to_string(),
        fare: "13".to_string(),
        sex: "female".to_string(),
        embarked: "Q".to_string(),
        ..RawInputs::default()
    };
    let first = predict(&forest, &inputs);
    for _ in 0..5 {
        assert_eq!(predict(&forest, &inputs), first);
    }
}
