use clap::{Parser, Subcommand, ValueEnum};
use commplot::Result;
use commplot::experiment::{Experiment, ExperimentSpec, MissingLogPolicy};
use commplot::model::{ConfigurationMetrics, MetricAggregator};
use commplot::render::{self, ImageFormat, Summary};
use env_logger::Env;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "commplot")]
#[command(
    about = "Compare solver configurations by runtime and communication metrics",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate all run logs and render the comparison charts.
    Report {
        #[command(flatten)]
        input: InputArgs,

        /// Directory the charts are written to.
        #[arg(short = 'o', long, default_value = ".")]
        out_dir: PathBuf,

        #[arg(long, value_enum, default_value_t = Format::Png)]
        format: Format,

        /// Also write the aggregated arrays as JSON.
        #[arg(long)]
        summary: Option<PathBuf>,
    },

    /// Aggregate all run logs and print the averages.
    Summary {
        #[command(flatten)]
        input: InputArgs,

        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::Args)]
struct InputArgs {
    /// Experiment description (JSON). Defaults to the built-in layout.
    #[arg(long)]
    experiment: Option<PathBuf>,

    /// Base directory for relative results directories.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Treat a missing log file as an error instead of skipping it.
    #[arg(long)]
    strict: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Png,
    Svg,
}

impl From<Format> for ImageFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Png => ImageFormat::Png,
            Format::Svg => ImageFormat::Svg,
        }
    }
}

fn load_experiment(input: &InputArgs) -> Result<Experiment> {
    let mut spec = match &input.experiment {
        Some(path) => ExperimentSpec::load(path)?,
        None => ExperimentSpec::default_layout(),
    };
    if input.strict {
        spec.missing_logs = MissingLogPolicy::Fail;
    }
    spec.validate_and_build(&input.root)
}

fn aggregate(experiment: &Experiment) -> Result<Vec<ConfigurationMetrics>> {
    let aggregator = MetricAggregator::new(experiment)?;
    Ok(aggregator.aggregate_all()?)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.cmd {
        Commands::Report {
            input,
            out_dir,
            format,
            summary,
        } => {
            // 1) Validate the experiment.
            let experiment = load_experiment(&input)?;

            // 2) Scan + aggregate every configuration.
            let metrics = aggregate(&experiment)?;

            // 3) Render charts.
            let written = render::render_charts(
                &out_dir,
                format.into(),
                &experiment.worker_counts,
                &metrics,
            )?;
            for path in &written {
                println!("Wrote {}", path.display());
            }

            if let Some(path) = summary {
                write_summary(&path, &experiment, &metrics)?;
                println!("Wrote {}", path.display());
            }
        }
        Commands::Summary { input, json } => {
            let experiment = load_experiment(&input)?;
            let metrics = aggregate(&experiment)?;
            let summary = Summary {
                worker_counts: &experiment.worker_counts,
                cases: &experiment.cases,
                configurations: &metrics,
            };

            if json {
                println!("{}", render::render_summary_json(&summary)?);
            } else {
                print!("{}", render::render_summary_table(&summary));
            }
        }
    }

    Ok(())
}

fn write_summary(
    path: &Path,
    experiment: &Experiment,
    metrics: &[ConfigurationMetrics],
) -> Result<()> {
    render::write_summary_json(
        path,
        &Summary {
            worker_counts: &experiment.worker_counts,
            cases: &experiment.cases,
            configurations: metrics,
        },
    )
}
