use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use spreadcheck::driver::run_settings;
use spreadcheck::propagation::PropagationSettings;
use spreadcheck::visualization::{export_all, plot_layer_series, run_summary, snapshot_histograms, Series};

#[derive(Parser)]
#[command(name = "spreadcheck")]
#[command(about = "Check how Xavier/He scaling and ReLU shape the second moment across random linear layers")]
#[command(version)]
struct Cli {
    /// JSON settings file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of layers
    #[arg(long)]
    depth: Option<usize>,

    /// Units per layer (also the fan-in)
    #[arg(long)]
    width: Option<usize>,

    /// Rows of the random input batch
    #[arg(long)]
    batch: Option<usize>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum number of values sampled per histogram
    #[arg(long)]
    sample_cap: Option<usize>,

    /// Layers to sample for histograms, e.g. 1,5,10,20
    #[arg(long, value_delimiter = ',')]
    snapshot_layers: Option<Vec<usize>>,

    /// Number of histogram bins
    #[arg(long)]
    histogram_bins: Option<usize>,

    /// Also print text histograms of the sampled layers
    #[arg(long)]
    show_histograms: bool,

    /// Directory for histograms, charts and reports
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Only print summaries, write no files
    #[arg(long)]
    no_artifacts: bool,
}

impl Cli {
    fn settings(&self) -> spreadcheck::error::Result<PropagationSettings> {
        let mut settings = match &self.config {
            Some(path) => PropagationSettings::from_json_file(path)?,
            None => PropagationSettings::default(),
        };
        if let Some(depth) = self.depth {
            settings = settings.with_depth(depth);
        }
        if let Some(width) = self.width {
            settings = settings.with_width(width);
        }
        if let Some(batch) = self.batch {
            settings = settings.with_batch(batch);
        }
        if let Some(seed) = self.seed {
            settings = settings.with_seed(seed);
        }
        if let Some(cap) = self.sample_cap {
            settings = settings.with_sample_cap(cap);
        }
        if let Some(layers) = &self.snapshot_layers {
            settings = settings.with_snapshot_layers(layers.iter().copied());
        }
        if let Some(bins) = self.histogram_bins {
            settings = settings.with_histogram_bins(bins);
        }
        if let Some(dir) = &self.output_dir {
            settings = settings.with_output_dir(dir.clone());
        }
        Ok(settings)
    }
}

fn run(cli: &Cli) -> spreadcheck::error::Result<bool> {
    let settings = cli.settings()?;
    let mut rng = StdRng::seed_from_u64(settings.seed);
    let report = run_settings(&settings, &mut rng)?;

    for result in report.results() {
        println!("\n{}", run_summary(result));
        if cli.show_histograms {
            println!("{}", snapshot_histograms(result, settings.histogram_bins));
        }
    }

    let ex2: Vec<Series> = report
        .results()
        .map(|r| Series::from_values(r.config.name.clone(), &r.a_ex2_series()))
        .collect();
    println!("\n{}", plot_layer_series(&ex2, "E[a^2] across layers", 72, 20, true));
    for (name, err) in report.failures() {
        error!(pattern = name, error = %err, "pattern did not run");
    }

    if !cli.no_artifacts {
        let written = export_all(&report, &settings)?;
        info!(files = written.len(), dir = %settings.output_dir.display(), "artifacts written");
    }

    Ok(report.all_succeeded())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            error!(error = %e, "run aborted");
            ExitCode::FAILURE
        }
    }
}
