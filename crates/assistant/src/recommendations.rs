//! Rule-based advisory messages
//!
//! Output order: risk message, threshold messages in table order, then the
//! all-clear message only when nothing else fired. Absent fields take a
//! neutral value that never triggers their rule.

use wellness_forest_core::FeatureMap;

use crate::condition::Condition;

pub const DIABETES_RISK: &str = "⚠️ Possible diabetes risk. Consult a doctor.";
pub const DIABETES_WEIGHT: &str = "🏃 Exercise regularly to control weight.";
pub const DIABETES_SUGAR: &str = "🥗 Reduce sugar intake, eat a balanced diet.";
pub const DIABETES_CLEAR: &str = "✅ Healthy glucose & BMI levels.";

pub const HEART_RISK: &str = "⚠️ Possible heart disease risk. Seek medical check-up.";
pub const HEART_CHOLESTEROL: &str = "🥑 Lower cholesterol through diet.";
pub const HEART_PRESSURE: &str = "💧 Monitor blood pressure, reduce salt intake.";
pub const HEART_CLEAR: &str = "✅ Healthy heart profile.";

pub const HYPERTENSION_RISK: &str = "⚠️ Hypertension risk detected. Consult a doctor.";
pub const HYPERTENSION_STRESS: &str = "🧘 Practice stress reduction and reduce salt intake.";
pub const HYPERTENSION_WEIGHT: &str = "🏃 Maintain healthy weight to lower BP.";
pub const HYPERTENSION_CLEAR: &str = "✅ Healthy blood pressure levels.";

/// A threshold rule: fires when `field > threshold`
struct Rule {
    field: &'static str,
    neutral: f64,
    threshold: f64,
    message: &'static str,
}

struct RuleSet {
    risk: &'static str,
    rules: &'static [Rule],
    all_clear: &'static str,
}

const DIABETES_RULES: RuleSet = RuleSet {
    risk: DIABETES_RISK,
    rules: &[
        Rule {
            field: "BMI",
            neutral: 25.0,
            threshold: 25.0,
            message: DIABETES_WEIGHT,
        },
        Rule {
            field: "Glucose",
            neutral: 100.0,
            threshold: 125.0,
            message: DIABETES_SUGAR,
        },
    ],
    all_clear: DIABETES_CLEAR,
};

const HEART_RULES: RuleSet = RuleSet {
    risk: HEART_RISK,
    rules: &[
        Rule {
            field: "chol",
            neutral: 200.0,
            threshold: 240.0,
            message: HEART_CHOLESTEROL,
        },
        Rule {
            field: "trestbps",
            neutral: 120.0,
            threshold: 140.0,
            message: HEART_PRESSURE,
        },
    ],
    all_clear: HEART_CLEAR,
};

const HYPERTENSION_RULES: RuleSet = RuleSet {
    risk: HYPERTENSION_RISK,
    rules: &[
        Rule {
            field: "systolicBP",
            neutral: 120.0,
            threshold: 140.0,
            message: HYPERTENSION_STRESS,
        },
        Rule {
            field: "BMI",
            neutral: 25.0,
            threshold: 25.0,
            message: HYPERTENSION_WEIGHT,
        },
    ],
    all_clear: HYPERTENSION_CLEAR,
};

impl RuleSet {
    fn apply(&self, raw: &FeatureMap, label: u8) -> Vec<String> {
        let mut recs = Vec::new();
        if label == 1 {
            recs.push(self.risk.to_string());
        }
        for rule in self.rules {
            if raw.get_or(rule.field, rule.neutral) > rule.threshold {
                recs.push(rule.message.to_string());
            }
        }
        if recs.is_empty() {
            recs.push(self.all_clear.to_string());
        }
        recs
    }
}

pub fn diabetes_recommendations(raw: &FeatureMap, label: u8) -> Vec<String> {
    DIABETES_RULES.apply(raw, label)
}

pub fn heart_recommendations(raw: &FeatureMap, label: u8) -> Vec<String> {
    HEART_RULES.apply(raw, label)
}

pub fn hypertension_recommendations(raw: &FeatureMap, label: u8) -> Vec<String> {
    HYPERTENSION_RULES.apply(raw, label)
}

pub fn recommendations_for(condition: Condition, raw: &FeatureMap, label: u8) -> Vec<String> {
    match condition {
        Condition::Diabetes => diabetes_recommendations(raw, label),
        Condition::Heart => heart_recommendations(raw, label),
        Condition::Hypertension => hypertension_recommendations(raw, label),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diabetes_all_rules() {
        let raw = FeatureMap::new().with("BMI", 32.0).with("Glucose", 180.0);
        assert_eq!(
            diabetes_recommendations(&raw, 1),
            vec![DIABETES_RISK, DIABETES_WEIGHT, DIABETES_SUGAR]
        );
    }

    #[test]
    fn test_thresholds_are_strict() {
        let raw = FeatureMap::new().with("BMI", 25.0).with("Glucose", 125.0);
        assert_eq!(diabetes_recommendations(&raw, 0), vec![DIABETES_CLEAR]);

        let raw = FeatureMap::new().with("chol", 240.0).with("trestbps", 140.0);
        assert_eq!(heart_recommendations(&raw, 0), vec![HEART_CLEAR]);
    }

    #[test]
    fn test_missing_fields_are_neutral() {
        let empty = FeatureMap::new();
        assert_eq!(diabetes_recommendations(&empty, 0), vec![DIABETES_CLEAR]);
        assert_eq!(heart_recommendations(&empty, 0), vec![HEART_CLEAR]);
        assert_eq!(hypertension_recommendations(&empty, 0), vec![HYPERTENSION_CLEAR]);
    }

    #[test]
    fn test_heart_all_rules() {
        let raw = FeatureMap::new().with("chol", 280.0).with("trestbps", 160.0);
        assert_eq!(
            heart_recommendations(&raw, 1),
            vec![HEART_RISK, HEART_CHOLESTEROL, HEART_PRESSURE]
        );
        assert_eq!(
            recommendations_for(Condition::Heart, &raw, 0),
            vec![HEART_CHOLESTEROL, HEART_PRESSURE]
        );
    }

    #[test]
    fn test_hypertension_all_rules() {
        let raw = FeatureMap::new().with("systolicBP", 165.0).with("BMI", 33.0);
        assert_eq!(
            hypertension_recommendations(&raw, 1),
            vec![HYPERTENSION_RISK, HYPERTENSION_STRESS, HYPERTENSION_WEIGHT]
        );
    }

    #[test]
    fn test_hypertension_order() {
        let raw = FeatureMap::new().with("BMI", 29.0).with("systolicBP", 150.0);
        assert_eq!(
            recommendations_for(Condition::Hypertension, &raw, 0),
            vec![HYPERTENSION_STRESS, HYPERTENSION_WEIGHT]
        );
    }

    #[test]
    fn test_risk_alone_suppresses_all_clear() {
        let empty = FeatureMap::new();
        assert_eq!(heart_recommendations(&empty, 1), vec![HEART_RISK]);
    }
}
