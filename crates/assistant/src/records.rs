//! Typed input records for the three conditions
//!
//! Field names follow the dataset headers exactly, so a record converts
//! into a [`FeatureMap`] that the matching condition model can align.
//! `Default` yields the reference form values.

use serde::{Deserialize, Serialize};
use wellness_forest_core::FeatureMap;

use crate::condition::Condition;

/// Diabetes screening inputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiabetesInput {
    #[serde(rename = "Pregnancies")]
    pub pregnancies: f64,
    #[serde(rename = "Glucose")]
    pub glucose: f64,
    #[serde(rename = "BloodPressure")]
    pub blood_pressure: f64,
    #[serde(rename = "SkinThickness")]
    pub skin_thickness: f64,
    #[serde(rename = "Insulin")]
    pub insulin: f64,
    #[serde(rename = "BMI")]
    pub bmi: f64,
    #[serde(rename = "DiabetesPedigreeFunction")]
    pub diabetes_pedigree_function: f64,
    #[serde(rename = "Age")]
    pub age: f64,
}

impl Default for DiabetesInput {
    fn default() -> Self {
        Self {
            pregnancies: 2.0,
            glucose: 120.0,
            blood_pressure: 80.0,
            skin_thickness: 20.0,
            insulin: 85.0,
            bmi: 25.0,
            diabetes_pedigree_function: 0.5,
            age: 35.0,
        }
    }
}

impl From<&DiabetesInput> for FeatureMap {
    fn from(input: &DiabetesInput) -> Self {
        FeatureMap::new()
            .with("Pregnancies", input.pregnancies)
            .with("Glucose", input.glucose)
            .with("BloodPressure", input.blood_pressure)
            .with("SkinThickness", input.skin_thickness)
            .with("Insulin", input.insulin)
            .with("BMI", input.bmi)
            .with("DiabetesPedigreeFunction", input.diabetes_pedigree_function)
            .with("Age", input.age)
    }
}

/// Heart disease inputs (Cleveland-style columns)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeartInput {
    pub age: f64,
    pub sex: f64,
    /// Chest pain type, 0-3
    pub cp: f64,
    /// Resting blood pressure
    pub trestbps: f64,
    pub chol: f64,
    /// Fasting blood sugar > 120
    pub fbs: f64,
    pub restecg: f64,
    /// Maximum heart rate
    pub thalach: f64,
    /// Exercise induced angina
    pub exang: f64,
    /// ST depression
    pub oldpeak: f64,
    pub slope: f64,
    pub ca: f64,
    pub thal: f64,
}

impl Default for HeartInput {
    fn default() -> Self {
        Self {
            age: 40.0,
            sex: 0.0,
            cp: 0.0,
            trestbps: 120.0,
            chol: 200.0,
            fbs: 0.0,
            restecg: 0.0,
            thalach: 150.0,
            exang: 0.0,
            oldpeak: 1.0,
            slope: 0.0,
            ca: 0.0,
            thal: 0.0,
        }
    }
}

impl From<&HeartInput> for FeatureMap {
    fn from(input: &HeartInput) -> Self {
        FeatureMap::new()
            .with("age", input.age)
            .with("sex", input.sex)
            .with("cp", input.cp)
            .with("trestbps", input.trestbps)
            .with("chol", input.chol)
            .with("fbs", input.fbs)
            .with("restecg", input.restecg)
            .with("thalach", input.thalach)
            .with("exang", input.exang)
            .with("oldpeak", input.oldpeak)
            .with("slope", input.slope)
            .with("ca", input.ca)
            .with("thal", input.thal)
    }
}

/// Hypertension inputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HypertensionInput {
    pub age: f64,
    pub sex: f64,
    #[serde(rename = "BMI")]
    pub bmi: f64,
    #[serde(rename = "systolicBP")]
    pub systolic_bp: f64,
    #[serde(rename = "diastolicBP")]
    pub diastolic_bp: f64,
    pub cholesterol: f64,
    pub smoking: f64,
    /// Diabetes history flag
    pub diabetes: f64,
}

impl Default for HypertensionInput {
    fn default() -> Self {
        Self {
            age: 40.0,
            sex: 0.0,
            bmi: 25.0,
            systolic_bp: 120.0,
            diastolic_bp: 80.0,
            cholesterol: 200.0,
            smoking: 0.0,
            diabetes: 0.0,
        }
    }
}

impl From<&HypertensionInput> for FeatureMap {
    fn from(input: &HypertensionInput) -> Self {
        FeatureMap::new()
            .with("age", input.age)
            .with("sex", input.sex)
            .with("BMI", input.bmi)
            .with("systolicBP", input.systolic_bp)
            .with("diastolicBP", input.diastolic_bp)
            .with("cholesterol", input.cholesterol)
            .with("smoking", input.smoking)
            .with("diabetes", input.diabetes)
    }
}

/// Accepted input range for one field, inclusive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRange {
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
}

impl FieldRange {
    const fn new(name: &'static str, min: f64, max: f64) -> Self {
        Self { name, min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

pub const DIABETES_RANGES: &[FieldRange] = &[
    FieldRange::new("Pregnancies", 0.0, 20.0),
    FieldRange::new("Glucose", 50.0, 300.0),
    FieldRange::new("BloodPressure", 50.0, 200.0),
    FieldRange::new("SkinThickness", 0.0, 100.0),
    FieldRange::new("Insulin", 0.0, 500.0),
    FieldRange::new("BMI", 10.0, 60.0),
    FieldRange::new("DiabetesPedigreeFunction", 0.0, 2.5),
    FieldRange::new("Age", 10.0, 100.0),
];

pub const HEART_RANGES: &[FieldRange] = &[
    FieldRange::new("age", 10.0, 100.0),
    FieldRange::new("sex", 0.0, 1.0),
    FieldRange::new("cp", 0.0, 3.0),
    FieldRange::new("trestbps", 80.0, 200.0),
    FieldRange::new("chol", 100.0, 600.0),
    FieldRange::new("fbs", 0.0, 1.0),
    FieldRange::new("restecg", 0.0, 2.0),
    FieldRange::new("thalach", 60.0, 220.0),
    FieldRange::new("exang", 0.0, 1.0),
    FieldRange::new("oldpeak", 0.0, 6.0),
    FieldRange::new("slope", 0.0, 2.0),
    FieldRange::new("ca", 0.0, 3.0),
    FieldRange::new("thal", 0.0, 3.0),
];

pub const HYPERTENSION_RANGES: &[FieldRange] = &[
    FieldRange::new("age", 10.0, 100.0),
    FieldRange::new("sex", 0.0, 1.0),
    FieldRange::new("BMI", 10.0, 60.0),
    FieldRange::new("systolicBP", 80.0, 200.0),
    FieldRange::new("diastolicBP", 40.0, 120.0),
    FieldRange::new("cholesterol", 100.0, 600.0),
    FieldRange::new("smoking", 0.0, 1.0),
    FieldRange::new("diabetes", 0.0, 1.0),
];

pub fn ranges_for(condition: Condition) -> &'static [FieldRange] {
    match condition {
        Condition::Diabetes => DIABETES_RANGES,
        Condition::Heart => HEART_RANGES,
        Condition::Hypertension => HYPERTENSION_RANGES,
    }
}

/// Names of present fields whose values fall outside their range
///
/// Absent fields are not reported; alignment catches those.
pub fn validate_ranges(condition: Condition, raw: &FeatureMap) -> Vec<&'static str> {
    ranges_for(condition)
        .iter()
        .filter(|range| raw.get(range.name).is_some_and(|v| !range.contains(v)))
        .map(|range| range.name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_within_ranges() {
        assert!(
            validate_ranges(Condition::Diabetes, &(&DiabetesInput::default()).into()).is_empty()
        );
        assert!(validate_ranges(Condition::Heart, &(&HeartInput::default()).into()).is_empty());
        assert!(
            validate_ranges(Condition::Hypertension, &(&HypertensionInput::default()).into())
                .is_empty()
        );
    }

    #[test]
    fn test_feature_map_uses_dataset_names() {
        let map = FeatureMap::from(&HypertensionInput::default());
        assert_eq!(map.len(), 8);
        assert_eq!(map.get("systolicBP"), Some(120.0));
        assert_eq!(map.get("BMI"), Some(25.0));

        let map = FeatureMap::from(&DiabetesInput::default());
        assert_eq!(map.get("DiabetesPedigreeFunction"), Some(0.5));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let input: DiabetesInput =
            serde_json::from_str(r#"{"Glucose": 180, "BMI": 31.5}"#).unwrap();
        assert_eq!(input.glucose, 180.0);
        assert_eq!(input.bmi, 31.5);
        assert_eq!(input.age, 35.0);
    }

    #[test]
    fn test_out_of_range_reported() {
        let raw = FeatureMap::new().with("chol", 900.0).with("sex", 1.0);
        assert_eq!(validate_ranges(Condition::Heart, &raw), vec!["chol"]);
    }
}
