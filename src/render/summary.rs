use crate::Result;
use crate::model::ConfigurationMetrics;

use anyhow::Context;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Aggregated arrays of every configuration, plus the axis they are indexed by.
#[derive(Debug, Clone, Serialize)]
pub struct Summary<'a> {
    pub worker_counts: &'a [u32],
    pub cases: &'a [String],
    pub configurations: &'a [ConfigurationMetrics],
}

pub fn render_summary_json(summary: &Summary<'_>) -> Result<String> {
    Ok(serde_json::to_string_pretty(summary)?)
}

pub fn write_summary_json(path: &Path, summary: &Summary<'_>) -> Result<()> {
    let json = render_summary_json(summary)?;
    fs::write(path, json).with_context(|| format!("write summary {}", path.display()))
}

/// Plain-text table, one block per configuration.
pub fn render_summary_table(summary: &Summary<'_>) -> String {
    let mut out = String::new();

    for metrics in summary.configurations {
        out.push_str(&format!(
            "{} ({}) [{}]\n",
            metrics.label,
            metrics.name,
            metrics.directory.display()
        ));
        out.push_str(&format!(
            "{:>8}  {:>16}  {:>14}  {:>16}  {:>8}  {:>8}  {:>8}\n",
            "workers",
            "avg. runtime (s)",
            "avg. sessions",
            "avg. session (s)",
            "done",
            "timeout",
            "missing"
        ));
        for (idx, workers) in metrics.worker_counts.iter().enumerate() {
            let value = |column: &[f64]| column.get(idx).copied().unwrap_or_default();
            let runs = metrics.runs.get(idx).copied().unwrap_or_default();
            out.push_str(&format!(
                "{:>8}  {:>16.3}  {:>14.2}  {:>16.4}  {:>8}  {:>8}  {:>8}\n",
                workers,
                value(&metrics.average_total_time),
                value(&metrics.average_comm_event_count),
                value(&metrics.average_comm_event_time),
                runs.completed,
                runs.timed_out,
                runs.missing
            ));
        }
        out.push('\n');
    }

    out
}
