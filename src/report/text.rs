use crate::report::{ResultRow, format_f64_6};
use crate::score::{Metric, Score};

const VALUE_WIDTH: usize = 12;

pub fn render_summary_table(rows: &[ResultRow]) -> String {
    let name_width = rows
        .iter()
        .map(|r| r.dataset_name.chars().count())
        .max()
        .unwrap_or(0)
        .max("dataset".len());

    let mut out = String::new();
    out.push_str(&format!("{:<name_width$}", "dataset"));
    for metric in Metric::ALL {
        out.push_str(&format!(" {:>VALUE_WIDTH$}", metric.column()));
    }
    out.push('\n');
    out.push_str(&"-".repeat(name_width + Metric::ALL.len() * (VALUE_WIDTH + 1)));
    out.push('\n');

    for row in rows {
        out.push_str(&format!("{:<name_width$}", row.dataset_name));
        for metric in Metric::ALL {
            let cell = match row.get(metric) {
                Score::Present(v) => format_f64_6(*v),
                Score::Skipped(_) => "-".to_string(),
            };
            out.push_str(&format!(" {:>VALUE_WIDTH$}", cell));
        }
        out.push('\n');
    }

    for row in rows {
        for metric in Metric::ALL {
            if let Score::Skipped(reason) = row.get(metric) {
                out.push_str(&format!(
                    "{} skipped for {}: {}\n",
                    metric, row.dataset_name, reason
                ));
            }
        }
    }
    out
}
