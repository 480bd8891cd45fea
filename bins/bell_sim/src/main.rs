use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use quantum::BellState;
use rng::ShotRng;
use serde::Serialize;
use simulator::{
    estimate_chsh_shots, BellEngine, BellSession, ChshEstimate, EngineConfig, EngineSummary, Trial,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Entangled-pair Bell-test simulator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Bell state: phi_plus | phi_minus | psi_plus | psi_minus
    #[arg(long, default_value = "phi_plus")]
    state: BellState,

    /// Depolarizing noise p in [0, 1] (overrides the config file)
    #[arg(long)]
    noise: Option<f64>,

    /// Engine configuration (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pairs sampled at each CHSH setting (0 = skip sampling)
    #[arg(long, default_value_t = 10_000)]
    shots: u64,

    /// Random-basis trials to emit after the CHSH round
    #[arg(long, default_value_t = 0)]
    trials: u64,

    /// RNG seed (full reproducibility)
    #[arg(long, default_value = "default-seed")]
    seed: String,

    /// Number of Rayon worker threads (0 = Rayon default)
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Narrate engine construction
    #[arg(long)]
    debug: bool,
}

#[derive(Serialize)]
struct Report {
    state: String,
    engine: EngineSummary,
    estimate: Option<ChshEstimate>,
    trials: Vec<Trial>,
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn load_config(args: &Args) -> anyhow::Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => EngineConfig::default(),
    };
    if let Some(noise) = args.noise {
        config.noise = noise;
    }
    config.debug |= args.debug;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.debug);

    if args.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(args.threads)
            .build_global()
            .context("building Rayon thread pool")?;
    }

    let config = load_config(&args)?;
    if !(0.0..=1.0).contains(&config.noise) {
        bail!("--noise must lie in [0, 1], got {}", config.noise);
    }

    let engine = BellEngine::with_config(&args.state.vector(), &config)
        .with_context(|| format!("building engine for {}", args.state))?;

    let rng = ShotRng::new(args.seed.as_bytes());

    let estimate = if args.shots > 0 {
        let est = estimate_chsh_shots(&engine, args.shots, &rng.fork(b"chsh-round"))?;
        info!(
            s_estimated = est.s,
            s_exact = engine.chsh_value(),
            violates = est.violates_classical_bound(),
            "sampled CHSH round"
        );
        Some(est)
    } else {
        None
    };

    let trials = BellSession::new(&engine, rng.fork(b"session"))
        .take(args.trials as usize)
        .collect::<simulator::Result<Vec<_>>>()?;

    let report = Report {
        state: args.state.to_string(),
        engine: engine.summary(),
        estimate,
        trials,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("state: {}", report.state);
    println!("{}", report.engine);
    if let Some(est) = &report.estimate {
        println!();
        println!("sampled CHSH round ({} pairs per setting):", args.shots);
        for (k, (counts, c)) in est.counts.iter().zip(est.correlations.iter()).enumerate() {
            println!("  setting {}: counts [HH, HV, VH, VV] = {:?}, E = {:+.4}", k, counts, c);
        }
        println!("  S_estimated = {:.4}", est.s);
    }
    if !report.trials.is_empty() {
        println!();
        for t in &report.trials {
            println!(
                "trial: alice a{} bob b{} -> {} ({})",
                t.alice_setting,
                t.bob_setting,
                t.outcome,
                t.outcome.code()
            );
        }
    }

    Ok(())
}
