//! Wellness forest trainer - deterministic offline random-forest training
//!
//! Loads labelled CSV datasets, splits them reproducibly and grows Gini
//! CART ensembles whose output is consumed by `wellness-forest-core`.

pub mod cart;
pub mod dataset;
pub mod deterministic;
pub mod errors;
pub mod trainer;

pub use cart::{CartBuilder, TreeConfig};
pub use dataset::{Dataset, FeatureStats};
pub use deterministic::{derive_seed, LcgRng, SplitTieBreaker};
pub use errors::TrainerError;
pub use trainer::{ForestParams, ForestTrainer, MaxFeatures};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
