use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Marlin analytical compute engine for financial time series.
#[derive(Parser)]
#[command(
    name = "marlin",
    version,
    about = "Correlation, clustering and optimization engine for financial time series"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to TOML configuration file. `marlin.toml` is used if present.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Compute a pairwise correlation matrix from a JSON file of rows.
    Correlate(CorrelateArgs),
    /// Run K-means on a JSON file of points.
    Cluster(ClusterArgs),
    /// Minimise a built-in objective function.
    Optimize(OptimizeArgs),
    /// Read JSON-lines requests on stdin and write JSON-lines messages on stdout.
    Serve,
}

/// Arguments for the `correlate` subcommand.
#[derive(clap::Args)]
pub struct CorrelateArgs {
    /// JSON array of rows, each an object mapping symbol to number or null.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Override the minimum number of overlapping observations per pair.
    #[arg(long)]
    pub min_periods: Option<usize>,

    /// Drop rows where any symbol is missing before computing pairs.
    #[arg(long)]
    pub listwise: bool,
}

/// Arguments for the `cluster` subcommand.
#[derive(clap::Args)]
pub struct ClusterArgs {
    /// JSON array of points, each an array of numbers.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Override the number of clusters.
    #[arg(short)]
    pub k: Option<usize>,

    /// Override the iteration cap.
    #[arg(long)]
    pub max_iterations: Option<usize>,

    /// Override the RNG seed used for K-means++ seeding.
    #[arg(short, long)]
    pub seed: Option<u64>,
}

/// Built-in objectives available from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ObjectiveArg {
    /// Sum of squares.
    Sphere,
    /// Rosenbrock valley with `a = 1`, `b = 100`.
    Rosenbrock,
}

/// Arguments for the `optimize` subcommand.
#[derive(clap::Args)]
pub struct OptimizeArgs {
    /// Objective to minimise.
    #[arg(long, value_enum)]
    pub objective: ObjectiveArg,

    /// Comma-separated starting point, e.g. `1,2`.
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
    pub initial: Vec<f64>,

    /// Optimization method (`gd`, `gradient-descent`, `nm`, `nelder-mead`).
    #[arg(short, long)]
    pub method: Option<String>,

    /// Override the iteration cap.
    #[arg(long)]
    pub max_iterations: Option<usize>,
}
