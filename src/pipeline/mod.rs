use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::input::InputError;
use crate::model::ModelError;
use crate::pipeline::preprocess::PreprocessError;
use crate::score::ScoreError;

pub mod evaluate;
pub mod generate;
pub mod preprocess;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Score(#[from] ScoreError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Preprocess(#[from] PreprocessError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("sample {index} of {dataset} has no style image")]
    MissingStyle { dataset: String, index: usize },
    #[error("failed to save {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
