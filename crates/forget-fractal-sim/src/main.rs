//! # Forget Fractal simulator
//!
//! Plays one session against a simulated bomb and prints the session
//! journal, or the full report as JSON.
//!
//! ## Usage
//!
//! ```text
//! forget-fractal-sim --seed 42 --modules 8 --strategy optimal
//! forget-fractal-sim --strategy overspend --json
//! ```
//!
//! Log filter: `FORGET_FRACTAL_LOG` (default `forget_fractal=info,forget_fractal_sim=info`).
//! Puzzle settings come from the `FORGET_FRACTAL_*` variables.

use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

use forget_fractal::PuzzleConfig;
use forget_fractal_sim::{run, SimConfig};

const DEFAULT_LOG_FILTER: &str = "forget_fractal=info,forget_fractal_sim=info";

struct Args {
    sim:  SimConfig,
    json: bool,
}

// ─────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = std::env::var("FORGET_FRACTAL_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());
    fmt()
        .with_env_filter(EnvFilter::try_new(&filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;
    let report = run(args.sim).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print!("{}", report.journal);
    println!();
    println!("seed:      {}", report.seed);
    println!("strategy:  {}", report.strategy);
    println!("stages:    {} over {} ticks ({} redraws)", report.stages, report.ticks, report.redraws);
    println!("budget:    {}", report.budget);
    println!(
        "verdicts:  {}",
        report.verdicts.iter().map(ToString::to_string).collect::<Vec<_>>().join(" | ")
    );
    println!("strikes:   {}", report.strikes);
    println!(
        "outcome:   {}",
        if report.solved { "solved" } else if report.exploded { "exploded" } else { "unsolved" }
    );
    Ok(())
}

fn parse_args() -> anyhow::Result<Args> {
    let args: Vec<String> = std::env::args().collect();

    let mut sim = SimConfig { puzzle: PuzzleConfig::from_env(), ..SimConfig::default() };
    sim.seed = sim.puzzle.seed;
    let mut json = false;

    let mut i = 1;
    while i < args.len() {
        let value = |i: usize| {
            args.get(i + 1)
                .ok_or_else(|| anyhow::anyhow!("{} needs a value", args[i]))
        };
        match args[i].as_str() {
            "--seed" => {
                sim.seed = Some(value(i)?.parse()?);
                i += 1;
            }
            "--modules" => {
                sim.modules = value(i)?.parse()?;
                i += 1;
            }
            "--strategy" => {
                sim.strategy = value(i)?.parse()?;
                i += 1;
            }
            "--attempts" => {
                sim.max_attempts = value(i)?.parse()?;
                i += 1;
            }
            "--tick-ms" => {
                sim.tick = Duration::from_millis(value(i)?.parse()?);
                i += 1;
            }
            "--json" => json = true,
            "--help" | "-h" => {
                eprintln!(
                    "Usage: forget-fractal-sim [--seed N] [--modules N] \
                     [--strategy optimal|overspend|copy-original|invalid] \
                     [--attempts N] [--tick-ms N] [--json]"
                );
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
            }
        }
        i += 1;
    }

    Ok(Args { sim, json })
}
