use thiserror::Error;
use wellness_forest_core::ModelError;

/// Errors returned by the dataset loader and the forest trainer.
#[derive(Debug, Error)]
pub enum TrainerError {
    #[error("dataset error: {0}")]
    DataLoad(String),

    #[error("training error: {0}")]
    Training(String),

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl From<csv::Error> for TrainerError {
    fn from(err: csv::Error) -> Self {
        TrainerError::DataLoad(err.to_string())
    }
}
