use std::ffi::OsString;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::DynamicImage;
use ndarray::Array4;
use serde::Deserialize;
use tempfile::TempDir;
use thiserror::Error;

use crate::backend::{BackendCommand, BackendError};

/// Style conditioning input, laid out as `[batch, channel, height, width]`.
pub type StyleTensor = Array4<f32>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    #[default]
    Cuda,
    Cpu,
}

impl Device {
    pub fn as_str(self) -> &'static str {
        match self {
            Device::Cuda => "cuda",
            Device::Cpu => "cpu",
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model not found at {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("generator backend failed: {0}")]
    Backend(#[from] BackendError),
    #[error("generator produced an unreadable image: {0}")]
    Image(#[from] image::ImageError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSpec {
    pub path: PathBuf,
    pub device: Device,
}

/// A loaded handwriting generator, held in inference mode for its whole lifetime.
pub trait Generator {
    fn generate(
        &mut self,
        gen_text: &str,
        style: &StyleTensor,
        max_new_tokens: usize,
    ) -> Result<DynamicImage, ModelError>;
}

/// Generator backed by an external inference program. Each call hands the
/// program the style tensor as raw little-endian f32 and reads back a PNG.
#[derive(Debug)]
pub struct CommandGenerator {
    spec: ModelSpec,
    command: BackendCommand,
    scratch: TempDir,
    calls: usize,
}

impl CommandGenerator {
    pub fn spec(&self) -> &ModelSpec {
        &self.spec
    }

    fn write_style(&self, style: &StyleTensor, path: &Path) -> std::io::Result<()> {
        let mut w = BufWriter::new(File::create(path)?);
        for v in style.iter() {
            w.write_all(&v.to_le_bytes())?;
        }
        w.flush()
    }
}

impl Generator for CommandGenerator {
    fn generate(
        &mut self,
        gen_text: &str,
        style: &StyleTensor,
        max_new_tokens: usize,
    ) -> Result<DynamicImage, ModelError> {
        self.calls += 1;
        let style_path = self.scratch.path().join(format!("style_{}.f32", self.calls));
        let output_path = self.scratch.path().join(format!("out_{}.png", self.calls));
        self.write_style(style, &style_path)?;

        let shape = style
            .shape()
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let args: [OsString; 14] = [
            "--model".into(),
            self.spec.path.clone().into_os_string(),
            "--device".into(),
            self.spec.device.as_str().into(),
            "--text".into(),
            gen_text.into(),
            "--style".into(),
            style_path.clone().into_os_string(),
            "--style-shape".into(),
            shape.into(),
            "--max-new-tokens".into(),
            max_new_tokens.to_string().into(),
            "--output".into(),
            output_path.clone().into_os_string(),
        ];
        self.command.run(args)?;

        let image = image::open(&output_path)?;
        std::fs::remove_file(&style_path)?;
        std::fs::remove_file(&output_path)?;
        Ok(image)
    }
}

/// Loads the generator at `spec.path`. Fails if the model path does not exist;
/// the device is passed through unchanged.
pub fn load_model(spec: ModelSpec, command: BackendCommand) -> Result<CommandGenerator, ModelError> {
    if !spec.path.exists() {
        return Err(ModelError::NotFound(spec.path));
    }
    let scratch = tempfile::Builder::new().prefix("hwbench-").tempdir()?;
    Ok(CommandGenerator {
        spec,
        command,
        scratch,
        calls: 0,
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/tests.rs"]
mod tests;
