use tracing::{info, warn};

use crate::config::{DatasetPair, EvalConfig};
use crate::input::DatasetSource;
use crate::input::manifest::{MANIFEST_FILE, Transcriptions, has_manifest};
use crate::pipeline::PipelineError;
use crate::report::ResultRow;
use crate::report::csv::write_results_csv;
use crate::score::{Metric, MetricSuite, Score};

/// Scores one generated dataset. Distribution metrics always run; CER runs only
/// when the generated folder carries a transcription manifest.
pub fn evaluate_pair(
    source: &dyn DatasetSource,
    suite: &MetricSuite,
    pair: &DatasetPair,
) -> Result<ResultRow, PipelineError> {
    info!("evaluating {}", pair.fake_path.display());

    let fakes = source.open_folder(&pair.fake_path)?;
    let reals = source.open_reference(&pair.real_key)?;
    info!("loaded {} generated samples", fakes.len());
    info!("loaded {} reference samples ({})", reals.len(), reals.name);
    if fakes.is_empty() {
        warn!("{} contains no images", fakes.name);
    }

    let mut distribution = [0.0f64; 4];
    for (step, (slot, (metric, scorer))) in distribution
        .iter_mut()
        .zip(suite.distribution())
        .enumerate()
    {
        let value = scorer.score(&fakes, &reals)?;
        info!("[{}] {} score: {}", step + 1, metric, value);
        *slot = value;
    }

    let cer = if has_manifest(&pair.fake_path) {
        let transcriptions = Transcriptions::read(&pair.fake_path)?;
        info!("found {} transcriptions", transcriptions.len());
        let value = suite.cer.score_text(&fakes)?;
        info!("[5] {} score: {}", Metric::Cer, value);
        Score::Present(value)
    } else {
        info!("[5] {} score skipped (no {})", Metric::Cer, MANIFEST_FILE);
        Score::Skipped(format!("no {MANIFEST_FILE}"))
    };

    let [hwd, fid, bfid, kid] = distribution;
    Ok(ResultRow {
        dataset_name: pair.fake_path.display().to_string(),
        scores: [
            Score::Present(hwd),
            Score::Present(fid),
            Score::Present(bfid),
            Score::Present(kid),
            cer,
        ],
    })
}

/// Evaluates every configured pair in order, then writes the results CSV.
/// The first failing pair aborts the run before anything is written.
pub fn run_evaluation(
    config: &EvalConfig,
    source: &dyn DatasetSource,
    suite: &MetricSuite,
) -> Result<Vec<ResultRow>, PipelineError> {
    let mut rows = Vec::with_capacity(config.pairs.len());
    for pair in &config.pairs {
        rows.push(evaluate_pair(source, suite, pair)?);
    }

    info!("saving results to {}", config.csv_path.display());
    write_results_csv(&config.csv_path, &rows)?;
    Ok(rows)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/evaluate.rs"]
mod tests;
