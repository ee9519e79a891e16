//! Line charts over worker counts (plotters).
//!
//! The x axis is the position in the worker-count list; tick labels show the
//! worker counts themselves. Series are built by pure functions so the layout
//! can be checked without touching a drawing backend.

use crate::Result;
use crate::model::ConfigurationMetrics;

use anyhow::Context;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Triangle,
    Cross,
}

impl Marker {
    pub fn for_index(index: usize) -> Self {
        match index % 3 {
            0 => Marker::Circle,
            1 => Marker::Triangle,
            _ => Marker::Cross,
        }
    }
}

/// One configuration's line: (worker index, value) points.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: String,
    pub marker: Marker,
    pub points: Vec<(usize, f64)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Svg,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }
}

const RUNTIME_SIZE: (u32, u32) = (640, 480);
const COMM_SIZE: (u32, u32) = (1000, 400);

fn build_series(
    metrics: &[ConfigurationMetrics],
    keep: impl Fn(usize) -> bool,
    value: impl Fn(&ConfigurationMetrics, usize) -> Option<f64>,
) -> Vec<ChartSeries> {
    metrics
        .iter()
        .enumerate()
        .map(|(i, m)| ChartSeries {
            label: m.label.clone(),
            marker: Marker::for_index(i),
            points: (0..m.worker_counts.len())
                .filter(|&idx| keep(idx) && m.has_data(idx))
                .filter_map(|idx| value(m, idx).map(|v| (idx, v)))
                .collect(),
        })
        .collect()
}

/// Average runtime per worker count. Worker counts a configuration has no logs for are left out.
pub fn runtime_series(metrics: &[ConfigurationMetrics]) -> Vec<ChartSeries> {
    build_series(metrics, |_| true, |m, idx| m.average_total_time.get(idx).copied())
}

/// Average number of communication sessions, for runs with more than one worker.
pub fn comm_count_series(
    metrics: &[ConfigurationMetrics],
    worker_counts: &[u32],
) -> Vec<ChartSeries> {
    build_series(
        metrics,
        |idx| worker_counts.get(idx).is_some_and(|&w| w > 1),
        |m, idx| m.average_comm_event_count.get(idx).copied(),
    )
}

/// Average session duration, for runs with more than one worker.
pub fn comm_time_series(
    metrics: &[ConfigurationMetrics],
    worker_counts: &[u32],
) -> Vec<ChartSeries> {
    build_series(
        metrics,
        |idx| worker_counts.get(idx).is_some_and(|&w| w > 1),
        |m, idx| m.average_comm_event_time.get(idx).copied(),
    )
}

struct Panel<'a> {
    y_desc: &'a str,
    series: &'a [ChartSeries],
}

enum Layout<'a> {
    Single(Panel<'a>),
    SideBySide(Panel<'a>, Panel<'a>),
}

/// Write `timing.<ext>` and `comm.<ext>` into `out_dir` and return their paths.
pub fn render_charts(
    out_dir: &Path,
    format: ImageFormat,
    worker_counts: &[u32],
    metrics: &[ConfigurationMetrics],
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("create output directory {}", out_dir.display()))?;

    let timing_path = out_dir.join(format!("timing.{}", format.extension()));
    let runtime = runtime_series(metrics);
    let timing = Layout::Single(Panel {
        y_desc: "avg. runtime (s)",
        series: &runtime,
    });
    render_image(&timing_path, format, RUNTIME_SIZE, worker_counts, &timing)
        .with_context(|| format!("render {}", timing_path.display()))?;

    let comm_path = out_dir.join(format!("comm.{}", format.extension()));
    let counts = comm_count_series(metrics, worker_counts);
    let times = comm_time_series(metrics, worker_counts);
    let comm = Layout::SideBySide(
        Panel {
            y_desc: "avg. # communication sessions",
            series: &counts,
        },
        Panel {
            y_desc: "avg. session time (s)",
            series: &times,
        },
    );
    render_image(&comm_path, format, COMM_SIZE, worker_counts, &comm)
        .with_context(|| format!("render {}", comm_path.display()))?;

    Ok(vec![timing_path, comm_path])
}

fn render_image(
    path: &Path,
    format: ImageFormat,
    size: (u32, u32),
    worker_counts: &[u32],
    layout: &Layout<'_>,
) -> Result<()> {
    match format {
        ImageFormat::Png => draw_layout(
            &BitMapBackend::new(path, size).into_drawing_area(),
            worker_counts,
            layout,
        ),
        ImageFormat::Svg => draw_layout(
            &SVGBackend::new(path, size).into_drawing_area(),
            worker_counts,
            layout,
        ),
    }
}

fn draw_layout<DB>(
    root: &DrawingArea<DB, Shift>,
    worker_counts: &[u32],
    layout: &Layout<'_>,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    match layout {
        Layout::Single(panel) => draw_panel(root, worker_counts, panel)?,
        Layout::SideBySide(left, right) => {
            let panels = root.split_evenly((1, 2));
            draw_panel(&panels[0], worker_counts, left)?;
            draw_panel(&panels[1], worker_counts, right)?;
        }
    }
    root.present()?;
    Ok(())
}

fn draw_panel<DB>(
    area: &DrawingArea<DB, Shift>,
    worker_counts: &[u32],
    panel: &Panel<'_>,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let xs: Vec<usize> = panel
        .series
        .iter()
        .flat_map(|s| s.points.iter().map(|p| p.0))
        .collect();
    let x_min = xs.iter().copied().min().unwrap_or(0);
    let x_max = xs
        .iter()
        .copied()
        .max()
        .unwrap_or(worker_counts.len().saturating_sub(1));
    let x_max = x_max.max(x_min + 1);

    let y_top = panel
        .series
        .iter()
        .flat_map(|s| s.points.iter().map(|p| p.1))
        .fold(0.0f64, f64::max);
    let y_max = if y_top > 0.0 { y_top * 1.1 } else { 1.0 };

    let mut chart = ChartBuilder::on(area)
        .margin(20)
        .x_label_area_size(35)
        .y_label_area_size(55)
        .build_cartesian_2d(x_min..x_max, 0f64..y_max)?;

    let tick_label = |idx: &usize| {
        worker_counts
            .get(*idx)
            .map(|w| w.to_string())
            .unwrap_or_default()
    };
    chart
        .configure_mesh()
        .x_labels(x_max - x_min + 1)
        .x_label_formatter(&tick_label)
        .x_desc("# workers")
        .y_desc(panel.y_desc)
        .draw()?;

    let mut labelled = false;
    for (i, series) in panel.series.iter().enumerate() {
        if series.points.is_empty() {
            continue;
        }
        let color = Palette99::pick(i).to_rgba();

        chart
            .draw_series(LineSeries::new(series.points.clone(), color.stroke_width(2)))?
            .label(series.label.as_str())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
        labelled = true;

        let points = series.points.iter().copied();
        match series.marker {
            Marker::Circle => {
                chart.draw_series(points.map(|p| Circle::new(p, 4, color.filled())))?;
            }
            Marker::Triangle => {
                chart.draw_series(
                    points.map(|p| TriangleMarker::new(p, 5, color.filled())),
                )?;
            }
            Marker::Cross => {
                chart.draw_series(points.map(|p| Cross::new(p, 4, color.stroke_width(2))))?;
            }
        }
    }

    if labelled {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .position(SeriesLabelPosition::UpperLeft)
            .draw()?;
    }

    Ok(())
}
