use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::backend::BackendCommand;
use crate::input::benchmark::Benchmark;
use crate::model::Device;
use crate::pipeline::preprocess::STYLE_HEIGHT;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One evaluation entry: a folder of generated images scored against a reference dataset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetPair {
    pub fake_path: PathBuf,
    pub real_key: String,
}

impl DatasetPair {
    pub fn new(fake_path: impl Into<PathBuf>, real_key: impl Into<String>) -> Self {
        Self {
            fake_path: fake_path.into(),
            real_key: real_key.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvalConfig {
    pub pairs: Vec<DatasetPair>,
    pub csv_path: PathBuf,
    pub reference_root: PathBuf,
    pub scorer: BackendCommand,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            pairs: vec![
                DatasetPair::new("small_emuru_words", "iam_words__reference"),
                DatasetPair::new("small_emuru_lines", "iam_lines__reference"),
                DatasetPair::new("IAMWords_my_model", "iam_words__reference"),
                DatasetPair::new("IAMLines_my_model", "iam_lines__reference"),
            ],
            csv_path: PathBuf::from("eval_results.csv"),
            reference_root: PathBuf::from("references"),
            scorer: BackendCommand::new("hwd-score", Vec::new()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerationRun {
    pub benchmark: Benchmark,
    pub out_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerateConfig {
    pub model_path: PathBuf,
    pub device: Device,
    pub max_new_tokens: usize,
    pub style_height: u32,
    pub num_style_samples: usize,
    pub benchmark_root: PathBuf,
    pub runs: Vec<GenerationRun>,
    pub generator: BackendCommand,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("./emuru_result/head_t5_small_2e-5_ech5"),
            device: Device::Cuda,
            max_new_tokens: 256,
            style_height: STYLE_HEIGHT,
            num_style_samples: 1,
            benchmark_root: PathBuf::from("benchmarks"),
            runs: vec![
                GenerationRun {
                    benchmark: Benchmark::IamWords,
                    out_dir: PathBuf::from("IAMWords_my_model"),
                },
                GenerationRun {
                    benchmark: Benchmark::IamLines,
                    out_dir: PathBuf::from("IAMLines_my_model"),
                },
            ],
            generator: BackendCommand::new("hwd-generate", Vec::new()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub evaluate: EvalConfig,
    pub generate: GenerateConfig,
}

impl Config {
    /// Reads a JSON config file; fields it omits keep their built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
#[path = "../tests/src_inline/config.rs"]
mod tests;
