mod backend;
mod config;
mod input;
mod logging;
mod model;
mod pipeline;
mod report;
mod score;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::{error, info};

use crate::config::{Config, ConfigError, EvalConfig, GenerateConfig};
use crate::input::FsDatasetSource;
use crate::input::benchmark::FsBenchmarkSource;
use crate::model::{Device, ModelSpec, load_model};
use crate::pipeline::PipelineError;
use crate::pipeline::evaluate::run_evaluation;
use crate::pipeline::generate::run_all_generations;
use crate::report::text::render_summary_table;
use crate::score::MetricSuite;

#[derive(Debug, Parser)]
#[command(
    name = "hwbench",
    version,
    about = "Score and generate handwriting-image benchmark datasets"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score generated datasets against their references and write a CSV.
    Evaluate(EvaluateArgs),
    /// Run the handwriting generator over the IAM benchmarks.
    Generate(GenerateArgs),
}

#[derive(Debug, Args)]
struct EvaluateArgs {
    /// JSON config file; omitted fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output CSV path
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Directory holding one folder per reference dataset key
    #[arg(long)]
    reference_root: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// JSON config file; omitted fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, value_enum)]
    device: Option<Device>,
    #[arg(long)]
    max_new_tokens: Option<usize>,
}

fn main() {
    logging::init();
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        error!("{err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), PipelineError> {
    match cli.command {
        Command::Evaluate(args) => run_evaluate(&args),
        Command::Generate(args) => run_generate(&args),
    }
}

fn evaluate_config(args: &EvaluateArgs) -> Result<EvalConfig, ConfigError> {
    let mut config = Config::load(args.config.as_deref())?.evaluate;
    if let Some(csv) = &args.csv {
        config.csv_path = csv.clone();
    }
    if let Some(root) = &args.reference_root {
        config.reference_root = root.clone();
    }
    Ok(config)
}

fn generate_config(args: &GenerateArgs) -> Result<GenerateConfig, ConfigError> {
    let mut config = Config::load(args.config.as_deref())?.generate;
    if let Some(device) = args.device {
        config.device = device;
    }
    if let Some(max_new_tokens) = args.max_new_tokens {
        config.max_new_tokens = max_new_tokens;
    }
    Ok(config)
}

fn run_evaluate(args: &EvaluateArgs) -> Result<(), PipelineError> {
    let config = evaluate_config(args)?;
    let source = FsDatasetSource::new(config.reference_root.clone());
    let suite = MetricSuite::from_backend(&config.scorer);

    let rows = run_evaluation(&config, &source, &suite)?;
    info!("results:\n{}", render_summary_table(&rows));
    info!("CSV saved to {}", config.csv_path.display());
    Ok(())
}

fn run_generate(args: &GenerateArgs) -> Result<(), PipelineError> {
    let config = generate_config(args)?;

    info!("loading model from {}", config.model_path.display());
    let mut model = load_model(
        ModelSpec {
            path: config.model_path.clone(),
            device: config.device,
        },
        config.generator.clone(),
    )?;
    info!("model loaded on {}", model.spec().device);

    let source = FsBenchmarkSource::new(config.benchmark_root.clone());
    let summaries = run_all_generations(&config, &mut model, &source)?;
    for summary in &summaries {
        info!(
            "{}: {} images in {} (manifest {})",
            summary.dataset,
            summary.written,
            summary.out_dir.display(),
            summary.manifest.display()
        );
    }
    let total: usize = summaries.iter().map(|s| s.written).sum();
    info!(
        "all generation complete: {} images across {} datasets",
        total,
        summaries.len()
    );
    Ok(())
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
