use anyhow::{bail, Context};
use clap::Parser;
use quantum::BellState;
use simulator::{noise_grid, noise_sweep, output::write_sweep_csv, EngineConfig, CLASSICAL_BOUND};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about = "CHSH value vs depolarizing noise")]
struct Args {
    /// Bell state: phi_plus | phi_minus | psi_plus | psi_minus
    #[arg(long, default_value = "phi_plus")]
    state: BellState,

    /// First noise level
    #[arg(long, default_value_t = 0.0)]
    start: f64,

    /// Last noise level (inclusive)
    #[arg(long, default_value_t = 1.0)]
    stop: f64,

    /// Number of intervals between start and stop
    #[arg(long, default_value_t = 50)]
    steps: usize,

    /// Pairs sampled per CHSH setting at each noise level (0 = exact only)
    #[arg(long, default_value_t = 0)]
    shots: u64,

    /// RNG seed
    #[arg(long, default_value = "noise-sweep")]
    seed: String,

    /// Number of Rayon worker threads (0 = Rayon default)
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Output CSV path
    #[arg(long, default_value = "noise_sweep.csv")]
    out: String,

    #[arg(long)]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    for (name, v) in [("start", args.start), ("stop", args.stop)] {
        if !(0.0..=1.0).contains(&v) {
            bail!("--{} must lie in [0, 1], got {}", name, v);
        }
    }

    if args.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(args.threads)
            .build_global()
            .context("building Rayon thread pool")?;
    }

    let noises = noise_grid(args.start, args.stop, args.steps);
    let points = noise_sweep(
        &args.state.vector(),
        &noises,
        &EngineConfig::default(),
        args.shots,
        &args.seed,
    )?;

    for p in &points {
        if !p.converged {
            warn!(noise = p.noise, s = p.s_max, "angle search did not converge");
        }
        match p.s_estimated {
            Some(est) => println!("p={:.4}  S={:.6}  S_shots={:.4}", p.noise, p.s_max, est),
            None => println!("p={:.4}  S={:.6}", p.noise, p.s_max),
        }
    }

    if let Some(p) = points.iter().find(|p| p.s_max <= CLASSICAL_BOUND) {
        info!(noise = p.noise, "S first reaches the classical bound");
    }

    write_sweep_csv(&args.out, &points).with_context(|| format!("writing {}", args.out))?;
    info!(path = %args.out, rows = points.len(), "CSV written");
    Ok(())
}
