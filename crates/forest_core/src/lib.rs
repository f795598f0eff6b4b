//! Forest core for the wellness risk assistant
//!
//! Inference-side building blocks shared by the trainer and the assistant.
//!
//! Modules:
//! - `schema`: Ordered feature names and raw input records
//! - `scaler`: Per-feature standardization fitted on the training split
//! - `tree`: Binary classification tree nodes and traversal
//! - `forest`: Random-forest model, probability and label
//! - `explain`: TreeSHAP attribution of the positive-class probability
//! - `metrics`: Offline classification report
//! - `serde_canon`: Canonical JSON and Blake3 model fingerprints

pub mod errors;
pub mod explain;
pub mod forest;
pub mod metrics;
pub mod scaler;
pub mod schema;
pub mod serde_canon;
pub mod tree;

pub use errors::{ModelError, Result};
pub use explain::{Attribution, TreeExplainer};
pub use forest::{ForestModel, Prediction, DECISION_THRESHOLD};
pub use metrics::{evaluate, ClassMetrics, ClassificationReport};
pub use scaler::{ScalingParameters, StandardScaler, ZeroVariancePolicy};
pub use schema::{FeatureMap, FeatureSchema};
pub use tree::{Node, Tree};

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
