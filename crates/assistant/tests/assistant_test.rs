//! End-to-end tests for the wellness assistant
//!
//! The three models are trained once from synthetic CSVs and shared.

mod common;

use anyhow::Result;
use once_cell::sync::Lazy;
use proptest::prelude::*;
use tempfile::TempDir;
use wellness_assistant::recommendations::DIABETES_CLEAR;
use wellness_assistant::{
    Condition, ConditionModel, DiabetesInput, FeatureMap, HeartInput, HypertensionInput,
    ModelSettings, WellnessAssistant,
};
use wellness_forest_core::{ModelError, DECISION_THRESHOLD};
use wellness_forest_trainer::{Dataset, TrainerError};

static ASSISTANT: Lazy<WellnessAssistant> = Lazy::new(|| {
    let dir = TempDir::new().unwrap();
    common::write_datasets(dir.path()).unwrap();
    WellnessAssistant::from_config(&common::config_for(dir.path())).unwrap()
});

fn defaults() -> (FeatureMap, FeatureMap, FeatureMap) {
    (
        FeatureMap::from(&DiabetesInput::default()),
        FeatureMap::from(&HeartInput::default()),
        FeatureMap::from(&HypertensionInput::default()),
    )
}

#[test]
fn test_default_records_are_healthy_for_diabetes() -> Result<()> {
    let assessment = ASSISTANT.assess_records(
        &DiabetesInput::default(),
        &HeartInput::default(),
        &HypertensionInput::default(),
    )?;

    assert_eq!(assessment.diabetes.label, 0);
    assert_eq!(assessment.diabetes.recommendations, vec![DIABETES_CLEAR]);
    assert_eq!(assessment.diabetes.attribution.feature_names.len(), 8);
    assert_eq!(assessment.heart.attribution.feature_names.len(), 13);
    assert_eq!(assessment.hypertension.attribution.feature_names.len(), 8);
    Ok(())
}

#[test]
fn test_high_glucose_flags_diabetes() -> Result<()> {
    let (_, heart, hypertension) = defaults();
    let diabetes = FeatureMap::from(&DiabetesInput {
        glucose: 220.0,
        bmi: 31.0,
        ..DiabetesInput::default()
    });

    let assessment = ASSISTANT.assess(&diabetes, &heart, &hypertension)?;
    assert_eq!(assessment.diabetes.label, 1);
    assert_eq!(
        assessment.diabetes.recommendations,
        vec![
            "⚠️ Possible diabetes risk. Consult a doctor.",
            "🏃 Exercise regularly to control weight.",
            "🥗 Reduce sugar intake, eat a balanced diet.",
        ]
    );
    Ok(())
}

#[test]
fn test_missing_feature_is_scoped_to_one_condition() {
    let (mut diabetes, heart, hypertension) = defaults();
    diabetes.remove("Glucose");

    let outcomes = ASSISTANT.assess_each(&diabetes, &heart, &hypertension);
    let err = outcomes.diabetes.as_ref().unwrap_err();
    assert_eq!(err.condition, Condition::Diabetes);
    assert!(matches!(&err.source, ModelError::MissingFeature(name) if name == "Glucose"));
    assert!(outcomes.heart.is_ok());
    assert!(outcomes.hypertension.is_ok());

    let err = outcomes.into_result().unwrap_err();
    assert_eq!(err.failed_conditions(), vec![Condition::Diabetes]);
}

#[test]
fn test_extra_keys_are_ignored() -> Result<()> {
    let (diabetes, heart, hypertension) = defaults();
    let noisy = diabetes.clone().with("ShoeSize", 44.0);

    let plain = ASSISTANT.assess(&diabetes, &heart, &hypertension)?;
    let extra = ASSISTANT.assess(&noisy, &heart, &hypertension)?;
    assert_eq!(plain.diabetes.probability, extra.diabetes.probability);
    Ok(())
}

#[test]
fn test_training_is_deterministic() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("heart.csv");
    common::write_heart(&path)?;

    let mut settings = ModelSettings::default();
    settings.forest.tree_count = 10;
    let first = ConditionModel::from_csv(Condition::Heart, &path, "target", &settings)?;
    let second = ConditionModel::from_csv(Condition::Heart, &path, "target", &settings)?;

    assert_eq!(first.fingerprint()?, second.fingerprint()?);
    assert_eq!(first.report(), second.report());
    let raw = FeatureMap::from(&HeartInput::default());
    assert_eq!(first.predict(&raw)?, second.predict(&raw)?);

    settings.forest.seed = 7;
    let reseeded = ConditionModel::from_csv(Condition::Heart, &path, "target", &settings)?;
    assert_ne!(first.fingerprint()?, reseeded.fingerprint()?);
    Ok(())
}

#[test]
fn test_report_uses_held_out_split() {
    let report = ASSISTANT.model(Condition::Diabetes).report();
    // ceil(0.2 * 160)
    assert_eq!(report.macro_avg.support, 32);
    assert!(report.accuracy > 0.8, "accuracy {}", report.accuracy);
}

#[test]
fn test_missing_dataset_names_condition() -> Result<()> {
    let dir = TempDir::new()?;
    common::write_diabetes(&dir.path().join("diabetes.csv"))?;

    let err = WellnessAssistant::from_config(&common::config_for(dir.path())).unwrap_err();
    assert_eq!(err.condition, Condition::Heart);
    assert!(matches!(err.source, TrainerError::DataLoad(_)));
    Ok(())
}

#[test]
fn test_wrong_label_column_fails_to_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("diabetes.csv");
    common::write_diabetes(&path).unwrap();

    let result = Dataset::from_csv(&path, "target");
    assert!(matches!(result, Err(TrainerError::DataLoad(_))));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_attribution_is_additive(
        glucose in 50.0f64..300.0,
        bmi in 10.0f64..60.0,
        chol in 100.0f64..600.0,
        systolic in 80.0f64..200.0,
    ) {
        let diabetes = FeatureMap::from(&DiabetesInput {
            glucose,
            bmi,
            ..DiabetesInput::default()
        });
        let heart = FeatureMap::from(&HeartInput { chol, ..HeartInput::default() });
        let hypertension = FeatureMap::from(&HypertensionInput {
            systolic_bp: systolic,
            ..HypertensionInput::default()
        });

        let assessment = ASSISTANT.assess(&diabetes, &heart, &hypertension).unwrap();
        for condition in Condition::ALL {
            let result = assessment.get(condition);
            prop_assert!((0.0..=1.0).contains(&result.probability));
            prop_assert_eq!(result.label == 1, result.probability > DECISION_THRESHOLD);
            prop_assert!((result.attribution.raw_output() - result.probability).abs() < 1e-6);
            prop_assert_eq!(
                result.attribution.baseline,
                ASSISTANT.model(condition).expected_value()
            );
            prop_assert!(!result.recommendations.is_empty());
        }
    }
}
