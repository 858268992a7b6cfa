// scripts/convergence.rs
use clap::Parser;
use mc_pricer::analytics::bs_analytic;
use mc_pricer::convergence::{convergence_csv_path, run_convergence, DEFAULT_SIMULATION_COUNTS};
use mc_pricer::math_utils::Timer;
use mc_pricer::mc::confidence::ConfidenceLevel;
use mc_pricer::mc::mc_engine::{mc_price_european, simulate_trials, McConfig};
use mc_pricer::mc::payoffs::{Payoff, VanillaPayoff};
use mc_pricer::output;
use mc_pricer::rng::RngFactory;
use mc_pricer::{MarketParameters, PricerResult};
use std::path::PathBuf;

/// Monte Carlo European option pricer with convergence analysis
#[derive(Debug, Parser)]
#[command(name = "convergence", version)]
struct Cli {
    /// Initial spot price
    #[arg(long, default_value_t = 100.0)]
    spot: f64,

    /// Strike price
    #[arg(long, default_value_t = 105.0)]
    strike: f64,

    /// Continuously compounded risk-free rate
    #[arg(long, default_value_t = 0.05)]
    rate: f64,

    /// Annualized volatility
    #[arg(long, default_value_t = 0.20)]
    volatility: f64,

    /// Time to maturity in years
    #[arg(long, default_value_t = 1.0)]
    maturity: f64,

    /// Trials for the headline call/put prices
    #[arg(long, default_value_t = 1_000_000)]
    paths: usize,

    /// Confidence level (0.90, 0.95 or 0.99)
    #[arg(long, default_value_t = 0.95)]
    confidence: f64,

    /// Base seed; omit for a time-based seed
    #[arg(long)]
    seed: Option<u64>,

    /// Worker streams (0 = one per logical CPU)
    #[arg(long, default_value_t = 1)]
    workers: usize,

    /// Comma-separated trial counts for the convergence study
    #[arg(long, value_delimiter = ',')]
    counts: Option<Vec<usize>>,

    /// Directory for CSV output
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Also export this many raw call trials to <output-dir>/call_option_trials.csv
    #[arg(long)]
    export_trials: Option<usize>,
}

impl Cli {
    fn engine_config(&self) -> McConfig {
        let cfg = McConfig {
            paths: self.paths,
            confidence_level: self.confidence,
            seed: self.seed,
            workers: self.workers.max(1),
        };
        if self.workers == 0 {
            cfg.with_all_cores()
        } else {
            cfg
        }
    }
}

fn price_and_report<P: Payoff + ?Sized>(
    label: &str,
    cfg: &McConfig,
    market: &MarketParameters,
    payoff: &P,
    analytic: f64,
) -> PricerResult<()> {
    let level = ConfidenceLevel::from_level(cfg.confidence_level);
    let timer = Timer::new();
    let result = mc_price_european(cfg, market, payoff)?;
    print!("{}", output::format_result_summary(label, &result, level));
    println!(
        "{} Analytic Reference: {:.6} (inside interval: {}, {:.1} ms)\n",
        label,
        analytic,
        result.contains(analytic),
        timer.elapsed_ms()
    );
    Ok(())
}

fn run_study<P: Payoff + ?Sized>(
    label: &str,
    prefix: &str,
    cli: &Cli,
    cfg: &McConfig,
    market: &MarketParameters,
    payoff: &P,
) -> PricerResult<()> {
    let counts = cli
        .counts
        .clone()
        .unwrap_or_else(|| DEFAULT_SIMULATION_COUNTS.to_vec());
    println!("\n--- Convergence Analysis for {} ---", label);

    let points = run_convergence(cfg, market, payoff, &counts)?;
    let level = ConfidenceLevel::from_level(cfg.confidence_level);
    print!("{}", output::format_convergence_table(&points, level));

    // CSV failures are reported but do not stop the remaining studies
    let path = convergence_csv_path(&cli.output_dir, prefix);
    match output::write_convergence_csv(&path, &points) {
        Ok(()) => println!("Convergence data saved to {}", path.display()),
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "could not write convergence data")
        }
    }
    Ok(())
}

fn export_trials(
    cli: &Cli,
    n: usize,
    market: &MarketParameters,
    call: &VanillaPayoff,
) -> PricerResult<()> {
    let mut rng = RngFactory::from_seed_or_time(cli.seed).worker_rng(0);
    let trials = simulate_trials(market, n, call, &mut rng)?;
    let path = cli.output_dir.join("call_option_trials.csv");
    match output::write_trials_to_csv(&path, &trials) {
        Ok(()) => println!("Raw trials saved to {}", path.display()),
        Err(e) => tracing::error!(path = %path.display(), error = %e, "could not write raw trials"),
    }
    Ok(())
}

fn run(cli: &Cli) -> PricerResult<()> {
    let market = MarketParameters::new(cli.spot, cli.rate, cli.volatility, cli.maturity)?;
    let call = VanillaPayoff::call(cli.strike)?;
    let put = VanillaPayoff::put(cli.strike)?;
    let cfg = cli.engine_config();

    println!("Monte Carlo European Option Pricer");
    println!("----------------------------------");
    println!("Initial Spot Price: {}", market.spot);
    println!("Strike Price: {}", cli.strike);
    println!("Risk-Free Rate: {}", market.rate);
    println!("Volatility: {}", market.volatility);
    println!("Time to Maturity: {} years", market.maturity);
    println!("Base Number of Simulations: {}", cfg.paths);
    println!(
        "Confidence Level: {}",
        ConfidenceLevel::from_level(cfg.confidence_level).level()
    );
    println!("Workers: {}\n", cfg.workers);

    price_and_report(
        "European Call",
        &cfg,
        &market,
        &call,
        bs_analytic::call_price(&market, cli.strike),
    )?;
    price_and_report(
        "European Put",
        &cfg,
        &market,
        &put,
        bs_analytic::put_price(&market, cli.strike),
    )?;

    run_study("Call Option", "call_option", cli, &cfg, &market, &call)?;
    run_study("Put Option", "put_option", cli, &cfg, &market, &put)?;

    if let Some(n) = cli.export_trials {
        export_trials(cli, n, &market, &call)?;
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
