pub mod csv;
pub mod text;

use crate::score::{Metric, Score};

/// One results-table row: a generated dataset and its score for every metric.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub dataset_name: String,
    pub scores: [Score; 5],
}

impl ResultRow {
    pub fn get(&self, metric: Metric) -> &Score {
        &self.scores[metric.index()]
    }
}

/// Present scores use the shortest round-trip form; skipped scores are empty.
pub fn format_score(score: &Score) -> String {
    score.value().map(format_float_repr).unwrap_or_default()
}

/// Shortest round-trip text for `v`. Magnitudes below 1e-4 or from 1e16 up use
/// a signed two-digit exponent (`5e-05`, `1e+16`); integral values keep a `.0`.
pub fn format_float_repr(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf".to_string() } else { "-inf".to_string() };
    }

    let sci = format!("{v:e}");
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let exp: i32 = exp.parse().unwrap_or(0);
    if v != 0.0 && !(-4..16).contains(&exp) {
        let sign = if exp < 0 { '-' } else { '+' };
        return format!("{mantissa}e{sign}{:02}", exp.unsigned_abs());
    }

    let fixed = v.to_string();
    if fixed.contains('.') {
        fixed
    } else {
        format!("{fixed}.0")
    }
}

pub fn format_f64_6(v: f64) -> String {
    format!("{:.6}", v)
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
