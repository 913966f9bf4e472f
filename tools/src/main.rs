//! stream-runner: headless streaming generator for the match stats store.
//!
//! Usage:
//!   stream-runner --db stats.db
//!   stream-runner --db stats.db --interval-secs 5 --seed 12345 --cycles 100
//!
//! Runs until interrupted (Ctrl+C) unless --cycles is given. A clean
//! shutdown exits 0; fatal startup errors exit non-zero with a diagnostic.

use anyhow::Result;
use matchstream_core::{
    config::StreamConfig,
    scheduler::StreamLoop,
    store::MetricsStore,
};
use std::env;
use std::time::Duration;

#[derive(serde::Serialize)]
struct RunSummary {
    db: String,
    teams: usize,
    cycles: u64,
    rows_written: i64,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let db_flag = args
        .windows(2)
        .find(|w| w[0] == "--db")
        .map(|w| w[1].as_str());
    let cycles = parse_arg(&args, "--cycles", 0u64);
    let json_summary = args.iter().any(|a| a == "--json");

    let mut cfg = StreamConfig::from_env(db_flag)?;
    if let Some(interval) = args
        .windows(2)
        .find(|w| w[0] == "--interval-secs")
        .and_then(|w| w[1].parse::<u64>().ok())
    {
        cfg.interval = Duration::from_secs(interval);
    }
    if let Some(seed) = args
        .windows(2)
        .find(|w| w[0] == "--seed")
        .and_then(|w| w[1].parse::<u64>().ok())
    {
        cfg.seed = seed;
    }

    log::info!(
        "stream-runner: db={} interval={:?} seed={}",
        cfg.db_path,
        cfg.interval,
        cfg.seed
    );

    let store = MetricsStore::open(&cfg.db_path)?;
    store.migrate()?;

    let mut stream = StreamLoop::build(&cfg, store)?;
    let shutdown = stream.shutdown_handle();
    ctrlc::set_handler(move || {
        log::info!("interrupt received, finishing current cycle");
        shutdown.trigger();
    })?;

    let completed = if cycles == 0 {
        stream.run()?
    } else {
        stream.run_cycles(cycles)?
    };

    let teams = stream.team_count();
    let store = stream.into_store();
    let summary = RunSummary {
        db: cfg.db_path,
        teams,
        cycles: completed,
        rows_written: store.sample_count()?,
    };

    if json_summary {
        println!("{}", serde_json::to_string(&summary)?);
    } else {
        println!("=== RUN SUMMARY ===");
        println!("  db:           {}", summary.db);
        println!("  teams:        {}", summary.teams);
        println!("  cycles:       {}", summary.cycles);
        println!("  rows written: {}", summary.rows_written);
    }

    Ok(())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
