use std::fs;
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::config::GenerateConfig;
use crate::input::benchmark::{BenchmarkDataset, BenchmarkSource};
use crate::model::Generator;
use crate::pipeline::PipelineError;
use crate::pipeline::preprocess::preprocess_style;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationSettings {
    pub max_new_tokens: usize,
    pub style_height: u32,
}

impl GenerationSettings {
    pub fn from_config(config: &GenerateConfig) -> Self {
        Self {
            max_new_tokens: config.max_new_tokens,
            style_height: config.style_height,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSummary {
    pub dataset: String,
    pub out_dir: PathBuf,
    pub manifest: PathBuf,
    pub written: usize,
}

/// Generates one image per sample into `out_dir`. The transcription manifest is
/// written before the first image, and each image is saved before the next
/// sample is read.
pub fn run_generation(
    dataset: &dyn BenchmarkDataset,
    generator: &mut dyn Generator,
    out_dir: &Path,
    settings: &GenerationSettings,
) -> Result<GenerationSummary, PipelineError> {
    fs::create_dir_all(out_dir)?;

    let manifest = dataset.save_transcriptions(out_dir)?;
    info!("saved {}", manifest.display());
    info!("saving images to {}", out_dir.display());

    let progress = ProgressBar::new(dataset.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{msg} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    progress.set_message(format!("Generating {}", dir_label(out_dir)));

    let mut written = 0usize;
    for index in 0..dataset.len() {
        let sample = dataset.sample(index)?;
        let style = sample
            .style_imgs
            .first()
            .ok_or_else(|| PipelineError::MissingStyle {
                dataset: dataset.name().to_string(),
                index,
            })?;
        let style_tensor = preprocess_style(style, settings.style_height)?;

        let dst_path = out_dir.join(&sample.dst_path);
        if let Some(parent) = dst_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let image = generator.generate(&sample.gen_text, &style_tensor, settings.max_new_tokens)?;
        image.save(&dst_path).map_err(|source| PipelineError::Save {
            path: dst_path.clone(),
            source,
        })?;
        written += 1;
        progress.inc(1);
    }
    progress.finish_and_clear();

    info!(
        "done generating {} ({} images) -> {}",
        dir_label(out_dir),
        written,
        out_dir.display()
    );
    Ok(GenerationSummary {
        dataset: dataset.name().to_string(),
        out_dir: out_dir.to_path_buf(),
        manifest,
        written,
    })
}

/// Runs every configured benchmark through the already-loaded generator, in order.
pub fn run_all_generations(
    config: &GenerateConfig,
    generator: &mut dyn Generator,
    source: &dyn BenchmarkSource,
) -> Result<Vec<GenerationSummary>, PipelineError> {
    let settings = GenerationSettings::from_config(config);
    let mut summaries = Vec::with_capacity(config.runs.len());
    for run in &config.runs {
        info!("generating {} ...", run.benchmark);
        let dataset = source.open(run.benchmark, config.num_style_samples)?;
        info!("{} size = {} samples", dataset.name(), dataset.len());
        summaries.push(run_generation(
            dataset.as_ref(),
            generator,
            &run.out_dir,
            &settings,
        )?);
    }
    Ok(summaries)
}

fn dir_label(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string())
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/generate.rs"]
mod tests;
