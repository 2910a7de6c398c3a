use std::ffi::OsString;

use crate::backend::BackendCommand;
use crate::input::ImageCollection;
use crate::input::manifest::manifest_path;
use crate::score::{Metric, ScoreError, Scorer, TextScorer};

/// Delegates one metric to an external scoring program, which must print the
/// score as the last non-empty line of its stdout.
#[derive(Debug, Clone)]
pub struct CommandScorer {
    metric: Metric,
    height: u32,
    command: BackendCommand,
}

impl CommandScorer {
    pub fn new(metric: Metric, command: BackendCommand) -> Self {
        Self {
            metric,
            height: metric.height(),
            command,
        }
    }

    fn base_args(&self, fakes: &ImageCollection) -> Vec<OsString> {
        vec![
            "--metric".into(),
            self.metric.backend_name().into(),
            "--height".into(),
            self.height.to_string().into(),
            "--fakes".into(),
            fakes.root.clone().into_os_string(),
        ]
    }

    fn invoke(&self, args: Vec<OsString>) -> Result<f64, ScoreError> {
        let stdout = self
            .command
            .run(args)
            .map_err(|source| ScoreError::Backend {
                metric: self.metric,
                source,
            })?;
        parse_score(self.metric, &stdout)
    }
}

impl Scorer for CommandScorer {
    fn score(&self, fakes: &ImageCollection, reals: &ImageCollection) -> Result<f64, ScoreError> {
        let mut args = self.base_args(fakes);
        args.push("--reals".into());
        args.push(reals.root.clone().into_os_string());
        self.invoke(args)
    }
}

impl TextScorer for CommandScorer {
    fn score_text(&self, fakes: &ImageCollection) -> Result<f64, ScoreError> {
        let mut args = self.base_args(fakes);
        args.push("--transcriptions".into());
        args.push(manifest_path(&fakes.root).into_os_string());
        self.invoke(args)
    }
}

/// Any float the backend prints is kept, `nan` and `inf` included; a degenerate
/// distribution is still a result.
pub fn parse_score(metric: Metric, stdout: &str) -> Result<f64, ScoreError> {
    let line = stdout
        .lines()
        .map(str::trim)
        .rfind(|l| !l.is_empty())
        .ok_or(ScoreError::EmptyOutput { metric })?;
    line.parse().map_err(|_| ScoreError::Parse {
        metric,
        output: line.to_string(),
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/score/command.rs"]
mod tests;
