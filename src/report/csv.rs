use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::report::{ResultRow, format_score};
use crate::score::Metric;

pub fn header() -> String {
    let mut cols = vec!["dataset_name"];
    cols.extend(Metric::ALL.iter().map(|m| m.column()));
    cols.join(",")
}

pub fn render_results_csv(rows: &[ResultRow]) -> String {
    let mut out = header();
    out.push('\n');
    for row in rows {
        let mut fields = Vec::with_capacity(1 + Metric::ALL.len());
        fields.push(escape_field(&row.dataset_name).into_owned());
        for metric in Metric::ALL {
            fields.push(format_score(row.get(metric)));
        }
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

/// Creates or truncates `path` and writes the header plus one line per row.
pub fn write_results_csv(path: &Path, rows: &[ResultRow]) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut w = BufWriter::new(File::create(path)?);
    w.write_all(render_results_csv(rows).as_bytes())?;
    w.flush()
}

fn escape_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/csv.rs"]
mod tests;
