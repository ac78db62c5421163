//! LU factorization demo
//!
//! Builds a test matrix, factorizes it with partial pivoting and prints
//! A, U, L and P such that PA = LU.
//!
//! Usage:
//!   cargo run --release --bin lu-pivot -- --dim 5 --kind symmetric
//!   cargo run --release --bin lu-pivot -- --dim 200 --kind random --seed 7 --json lu.json
//!   RUST_LOG=debug cargo run --bin lu-pivot -- --dim 4 --strict

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use math_audio_lu::export::{export_json, format_factorization, format_matrix};
use math_audio_lu::parallel::{is_parallel_available, worker_count};
use math_audio_lu::testdata::{DemoKind, demo_matrix, random_matrix};
use math_audio_lu::{LuConfig, PivotPolicy, lu_factorize};
use ndarray::Array2;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "lu-pivot")]
#[command(about = "Factorize a square matrix as PA = LU with partial pivoting", long_about = None)]
struct Args {
    /// Dimension m of the m x m matrix
    #[arg(short, long, default_value_t = 4)]
    dim: usize,

    /// Which test matrix to build
    #[arg(short, long, value_enum, default_value_t = MatrixKind::Nonsymmetric)]
    kind: MatrixKind,

    /// Seed for the random matrix
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Path to a JSON or TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fail on a singular pivot instead of producing inf/NaN
    #[arg(long)]
    strict: bool,

    /// Absolute pivot threshold for strict mode (implies --strict)
    #[arg(long)]
    tolerance: Option<f64>,

    /// Write the factors as JSON to this file
    #[arg(long)]
    json: Option<PathBuf>,

    /// Skip printing matrices larger than this dimension
    #[arg(long, default_value_t = 12)]
    print_limit: usize,

    /// Number of parallel threads (default: all cores)
    #[arg(short = 't', long)]
    threads: Option<usize>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MatrixKind {
    /// Nonsymmetric demo matrix
    Nonsymmetric,
    /// Symmetric demo matrix
    Symmetric,
    /// Uniform random entries in [-1, 1)
    Random,
}

fn build_config(args: &Args) -> anyhow::Result<LuConfig> {
    let mut config = match &args.config {
        Some(path) => LuConfig::from_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => LuConfig::default(),
    };

    if let Some(tolerance) = args.tolerance {
        if !(tolerance >= 0.0) {
            bail!("tolerance must be a non-negative number, got {tolerance}");
        }
        config.pivoting = PivotPolicy::Strict {
            tolerance: Some(tolerance),
        };
    } else if args.strict && !config.pivoting.is_strict() {
        config.pivoting = PivotPolicy::Strict { tolerance: None };
    }

    Ok(config)
}

fn build_matrix(args: &Args) -> Array2<f64> {
    match args.kind {
        MatrixKind::Nonsymmetric => demo_matrix(args.dim, DemoKind::Nonsymmetric),
        MatrixKind::Symmetric => demo_matrix(args.dim, DemoKind::Symmetric),
        MatrixKind::Random => random_matrix(args.dim, args.seed),
    }
}

#[cfg(feature = "parallel")]
fn init_threads(threads: Option<usize>) -> anyhow::Result<()> {
    if let Some(threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to set thread pool")?;
        log::info!("using {threads} threads");
    }
    Ok(())
}

#[cfg(not(feature = "parallel"))]
fn init_threads(threads: Option<usize>) -> anyhow::Result<()> {
    if threads.is_some() {
        log::warn!("--threads ignored: built without the `parallel` feature");
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.dim == 0 {
        bail!("dimension must be at least 1");
    }

    init_threads(args.threads)?;
    log::debug!(
        "parallel elimination available: {}, workers: {}",
        is_parallel_available(),
        worker_count()
    );
    let config = build_config(&args)?;
    let a = build_matrix(&args);

    let start = Instant::now();
    let factors = lu_factorize(&a, &config)?;
    log::info!(
        "factorized {}x{} matrix in {:.3} ms ({} row swaps)",
        args.dim,
        args.dim,
        start.elapsed().as_secs_f64() * 1000.0,
        factors.report.row_swaps
    );

    if args.dim <= args.print_limit {
        print!("{}", format_factorization(&a, &factors));
    } else {
        let k = args.dim.min(4);
        let u = factors.upper();
        print!("{}", format_matrix("U (leading block)", &u.slice(ndarray::s![..k, ..k])));
        println!("smallest pivot: {:e}", factors.report.smallest_pivot);
    }

    if let Some(path) = &args.json {
        export_json(&a, &factors, path)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("Saved factors to: {}", path.display());
    }

    Ok(())
}
