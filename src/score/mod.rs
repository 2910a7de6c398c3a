use std::fmt;

use thiserror::Error;

use crate::backend::{BackendCommand, BackendError};
use crate::input::ImageCollection;

pub mod command;

use command::CommandScorer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Hwd,
    Fid,
    Bfid,
    Kid,
    Cer,
}

impl Metric {
    /// Column order of the results table.
    pub const ALL: [Metric; 5] = [
        Metric::Hwd,
        Metric::Fid,
        Metric::Bfid,
        Metric::Kid,
        Metric::Cer,
    ];

    pub fn column(self) -> &'static str {
        match self {
            Metric::Hwd => "HWD",
            Metric::Fid => "FID",
            Metric::Bfid => "BFID",
            Metric::Kid => "KID",
            Metric::Cer => "CER",
        }
    }

    pub fn backend_name(self) -> &'static str {
        match self {
            Metric::Hwd => "hwd",
            Metric::Fid => "fid",
            Metric::Bfid => "bfid",
            Metric::Kid => "kid",
            Metric::Cer => "cer",
        }
    }

    /// Image height the metric's feature extractor expects.
    pub fn height(self) -> u32 {
        match self {
            Metric::Cer => 64,
            _ => 32,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Metric::Hwd => 0,
            Metric::Fid => 1,
            Metric::Bfid => 2,
            Metric::Kid => 3,
            Metric::Cer => 4,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Score {
    Present(f64),
    Skipped(String),
}

impl Score {
    pub fn value(&self) -> Option<f64> {
        match self {
            Score::Present(v) => Some(*v),
            Score::Skipped(_) => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("{metric} backend failed: {source}")]
    Backend {
        metric: Metric,
        #[source]
        source: BackendError,
    },
    #[error("{metric} backend printed no score")]
    EmptyOutput { metric: Metric },
    #[error("{metric} backend printed a non-numeric score: {output:?}")]
    Parse { metric: Metric, output: String },
}

/// Compares a generated collection against a reference collection.
pub trait Scorer {
    fn score(&self, fakes: &ImageCollection, reals: &ImageCollection) -> Result<f64, ScoreError>;
}

/// Scores a generated collection on its own, against its transcriptions.
pub trait TextScorer {
    fn score_text(&self, fakes: &ImageCollection) -> Result<f64, ScoreError>;
}

pub struct MetricSuite {
    pub hwd: Box<dyn Scorer>,
    pub fid: Box<dyn Scorer>,
    pub bfid: Box<dyn Scorer>,
    pub kid: Box<dyn Scorer>,
    pub cer: Box<dyn TextScorer>,
}

impl MetricSuite {
    pub fn from_backend(command: &BackendCommand) -> Self {
        let scorer = |metric| CommandScorer::new(metric, command.clone());
        Self {
            hwd: Box::new(scorer(Metric::Hwd)),
            fid: Box::new(scorer(Metric::Fid)),
            bfid: Box::new(scorer(Metric::Bfid)),
            kid: Box::new(scorer(Metric::Kid)),
            cer: Box::new(scorer(Metric::Cer)),
        }
    }

    /// The distribution metrics in column order.
    pub fn distribution(&self) -> [(Metric, &dyn Scorer); 4] {
        [
            (Metric::Hwd, self.hwd.as_ref()),
            (Metric::Fid, self.fid.as_ref()),
            (Metric::Bfid, self.bfid.as_ref()),
            (Metric::Kid, self.kid.as_ref()),
        ]
    }
}
