//! Output side: charts for the comparison and a machine-readable summary.

pub mod chart;
pub mod summary;

pub use chart::{ChartSeries, ImageFormat, Marker, render_charts};
pub use summary::{Summary, render_summary_json, render_summary_table, write_summary_json};
