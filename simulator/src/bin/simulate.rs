use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;

use fate_tower::config::{resolve_config, ConfigOverrides};
use fate_tower::report::{format_modes_line, format_reach_line, format_summary, render_histogram};
use fate_tower::simulation::{aggregate_statistics, save_statistics, simulate_with, Execution};
use fate_tower::Result;

/// Simulate the fate tower floor-climbing game.
#[derive(Parser, Debug)]
#[command(name = "fate-tower-simulate", version)]
struct Args {
    /// JSON config file; flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of walks (default: 500)
    #[arg(long)]
    trials: Option<usize>,

    /// Steps per walk (default: 100)
    #[arg(long)]
    steps: Option<usize>,

    /// RNG seed (default: 123)
    #[arg(long)]
    seed: Option<u64>,

    /// Floor to reach (default: 60)
    #[arg(long, allow_hyphen_values = true)]
    threshold: Option<i64>,

    /// Histogram buckets (default: 40)
    #[arg(long)]
    bins: Option<usize>,

    /// Divide the reach count by this instead of the number of walks
    #[arg(long)]
    divisor: Option<usize>,

    /// Write walk_statistics.json to DIR
    #[arg(long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Play walks on a single thread
    #[arg(long)]
    sequential: bool,

    /// Skip the text histogram
    #[arg(long)]
    no_histogram: bool,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            trial_count: self.trials,
            step_count: self.steps,
            seed: self.seed,
            threshold: self.threshold,
            bins: self.bins,
            divisor: self.divisor,
        }
    }
}

fn execute(args: &Args) -> Result<()> {
    let config = resolve_config(args.config.as_deref(), &args.overrides())?;

    let num_threads = if args.sequential {
        1
    } else {
        fate_tower::env_config::init_rayon_threads()
    };

    println!(
        "Fate Tower Simulation ({} walks x {} steps, seed {})",
        config.trial_count, config.step_count, config.seed
    );
    println!("Simulating ({} threads)...", num_threads);

    let t0 = Instant::now();
    let execution = if args.sequential {
        Execution::Sequential
    } else {
        Execution::Parallel
    };
    let experiment = simulate_with(&config, execution)?;
    let elapsed = t0.elapsed();

    let per_walk_us = elapsed.as_secs_f64() * 1e6 / config.trial_count as f64;
    println!("  Elapsed:     {:.1} ms", elapsed.as_secs_f64() * 1000.0);
    println!("  Per walk:    {:.1} \u{00b5}s", per_walk_us);
    println!();

    let stats = aggregate_statistics(
        &experiment.result,
        experiment.threshold,
        config.bins,
        config.divisor,
    )?;

    println!("Results:");
    println!(
        "  {}",
        format_reach_line(experiment.threshold, experiment.reach_percentage)
    );
    println!("  {}", format_modes_line(&experiment.modes));
    println!();
    println!("{}", format_summary(&stats));

    if !args.no_histogram {
        println!();
        println!("Final floor histogram ({} bins):", config.bins);
        print!("{}", render_histogram(&stats.terminal.histogram, 50));
    }

    if let Some(dir) = &args.output {
        let path = dir.join("walk_statistics.json");
        save_statistics(&stats, &path)?;
        println!();
        println!("  Statistics:  {}", path.display());
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    if let Err(e) = execute(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
