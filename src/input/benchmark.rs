use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};

use image::DynamicImage;
use serde::Deserialize;

use crate::input::InputError;
use crate::input::manifest::Transcriptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Benchmark {
    IamWords,
    IamLines,
}

impl Benchmark {
    pub fn name(self) -> &'static str {
        match self {
            Benchmark::IamWords => "IAMWords",
            Benchmark::IamLines => "IAMLines",
        }
    }

    pub fn index_file(self) -> &'static str {
        match self {
            Benchmark::IamWords => "iam_words.json",
            Benchmark::IamLines => "iam_lines.json",
        }
    }
}

impl fmt::Display for Benchmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One generation request. `dst_path` is relative to the run's output directory.
#[derive(Debug, Clone)]
pub struct Sample {
    pub gen_text: String,
    pub style_imgs: Vec<DynamicImage>,
    pub dst_path: PathBuf,
}

pub trait BenchmarkDataset {
    fn name(&self) -> &str;
    fn len(&self) -> usize;

    /// Decodes sample `index`, including its style images.
    fn sample(&self, index: usize) -> Result<Sample, InputError>;

    /// Writes the transcription manifest for every sample into `out_dir`.
    fn save_transcriptions(&self, out_dir: &Path) -> Result<PathBuf, InputError>;
}

pub trait BenchmarkSource {
    fn open(
        &self,
        benchmark: Benchmark,
        num_style_samples: usize,
    ) -> Result<Box<dyn BenchmarkDataset>, InputError>;
}

/// Benchmarks described by `<root>/<benchmark>.json` index files.
#[derive(Debug, Clone)]
pub struct FsBenchmarkSource {
    root: PathBuf,
}

impl FsBenchmarkSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl BenchmarkSource for FsBenchmarkSource {
    fn open(
        &self,
        benchmark: Benchmark,
        num_style_samples: usize,
    ) -> Result<Box<dyn BenchmarkDataset>, InputError> {
        let index = self.root.join(benchmark.index_file());
        let dataset = ShtgBenchmark::from_index(&index, benchmark, num_style_samples)?;
        Ok(Box::new(dataset))
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct IndexFile {
    samples: Vec<IndexEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct IndexEntry {
    gen_text: String,
    style_paths: Vec<PathBuf>,
    dst_path: PathBuf,
}

/// Styled handwritten text generation benchmark backed by an index file.
#[derive(Debug, Clone)]
pub struct ShtgBenchmark {
    benchmark: Benchmark,
    base_dir: PathBuf,
    num_style_samples: usize,
    entries: Vec<IndexEntry>,
}

impl ShtgBenchmark {
    pub fn from_index(
        index_path: &Path,
        benchmark: Benchmark,
        num_style_samples: usize,
    ) -> Result<Self, InputError> {
        if !index_path.is_file() {
            return Err(InputError::MissingInput(format!(
                "{} index {} not found",
                benchmark,
                index_path.display()
            )));
        }
        let text = fs::read_to_string(index_path)?;
        let index: IndexFile = serde_json::from_str(&text)
            .map_err(|e| InputError::Parse(format!("{}: {e}", index_path.display())))?;
        for (i, entry) in index.samples.iter().enumerate() {
            validate_dst_path(&entry.dst_path).map_err(|msg| {
                InputError::InvalidInput(format!(
                    "{} sample {i}: dst_path {}: {msg}",
                    benchmark,
                    entry.dst_path.display()
                ))
            })?;
        }
        let base_dir = index_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(Self {
            benchmark,
            base_dir,
            num_style_samples,
            entries: index.samples,
        })
    }
}

impl BenchmarkDataset for ShtgBenchmark {
    fn name(&self) -> &str {
        self.benchmark.name()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn sample(&self, index: usize) -> Result<Sample, InputError> {
        let entry = self.entries.get(index).ok_or_else(|| {
            InputError::InvalidInput(format!(
                "{} has {} samples, requested {index}",
                self.benchmark,
                self.entries.len()
            ))
        })?;
        let n_styles = self.num_style_samples.min(entry.style_paths.len());
        let mut style_imgs = Vec::with_capacity(n_styles);
        for rel in entry.style_paths.iter().take(self.num_style_samples) {
            style_imgs.push(image::open(self.base_dir.join(rel))?);
        }
        Ok(Sample {
            gen_text: entry.gen_text.clone(),
            style_imgs,
            dst_path: entry.dst_path.clone(),
        })
    }

    fn save_transcriptions(&self, out_dir: &Path) -> Result<PathBuf, InputError> {
        let mut transcriptions = Transcriptions::new();
        for entry in &self.entries {
            transcriptions.insert(&entry.dst_path, entry.gen_text.clone());
        }
        transcriptions.write(out_dir)
    }
}

fn validate_dst_path(path: &Path) -> Result<(), &'static str> {
    if path.file_name().is_none() {
        return Err("has no file name");
    }
    for component in path.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir => return Err("must not contain '..'"),
            Component::RootDir | Component::Prefix(_) => return Err("must be relative"),
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/benchmark.rs"]
mod tests;
