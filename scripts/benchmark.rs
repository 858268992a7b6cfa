// scripts/benchmark.rs
use clap::Parser;
use mc_pricer::math_utils::Timer;
use mc_pricer::mc::mc_engine::{mc_price_european, McConfig};
use mc_pricer::mc::payoffs::VanillaPayoff;
use mc_pricer::output;
use mc_pricer::{MarketParameters, PricerResult};
use serde::Serialize;
use std::env;
use std::path::PathBuf;

/// Throughput of the parallel pricer across worker counts
#[derive(Debug, Parser)]
#[command(name = "benchmark", version)]
struct Cli {
    /// Trials per run
    #[arg(default_value_t = 10_000_000)]
    paths: usize,

    /// CSV file for the results
    #[arg(long, default_value = "benchmark_results.csv")]
    output: PathBuf,
}

#[derive(Debug)]
struct SystemInfo {
    os: String,
    cpu_cores: usize,
    rayon_threads: usize,
    rustc_flags: String,
}

impl SystemInfo {
    fn gather() -> Self {
        Self {
            os: env::consts::OS.to_string(),
            cpu_cores: num_cpus::get(),
            rayon_threads: rayon::current_num_threads(),
            rustc_flags: env::var("RUSTFLAGS").unwrap_or_else(|_| "default".to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
struct BenchResult {
    workers: usize,
    paths: usize,
    elapsed_ms: f64,
    paths_per_sec: f64,
    price: f64,
    standard_error: f64,
}

fn bench(workers: usize, paths: usize) -> PricerResult<BenchResult> {
    let market = MarketParameters::new(100.0, 0.05, 0.2, 1.0)?;
    let call = VanillaPayoff::call(105.0)?;
    let cfg = McConfig {
        paths,
        seed: Some(42),
        workers,
        ..Default::default()
    };

    let timer = Timer::new();
    let result = mc_price_european(&cfg, &market, &call)?;
    let elapsed_ms = timer.elapsed_ms();

    Ok(BenchResult {
        workers,
        paths,
        elapsed_ms,
        paths_per_sec: paths as f64 / (elapsed_ms / 1000.0),
        price: result.price,
        standard_error: result.standard_error,
    })
}

fn run(cli: &Cli) -> PricerResult<()> {
    let info = SystemInfo::gather();
    println!(
        "OS: {}  cores: {}  rayon threads: {}  RUSTFLAGS: {}",
        info.os, info.cpu_cores, info.rayon_threads, info.rustc_flags
    );

    let mut worker_counts = vec![1, 2, 4, info.cpu_cores];
    worker_counts.sort_unstable();
    worker_counts.dedup();

    let mut results = Vec::new();
    for workers in worker_counts {
        let r = bench(workers, cli.paths)?;
        println!(
            "workers={:>3}  {:>10.1} ms  {:>14.0} paths/s  price={:.6} se={:.6}",
            r.workers, r.elapsed_ms, r.paths_per_sec, r.price, r.standard_error
        );
        results.push(r);
    }

    match output::write_benchmark_csv(&cli.output, &results) {
        Ok(()) => println!("Benchmark results written to {}", cli.output.display()),
        Err(e) => tracing::error!(
            path = %cli.output.display(),
            error = %e,
            "could not write benchmark results"
        ),
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!(?cli, "starting");

    if let Err(e) = run(&cli) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
