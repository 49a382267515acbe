use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use brawl::prelude::*;
use brawl::DEFAULT_LOG_FILE;

const RESULTS_FILE: &str = "dungeon_final.txt";

fn main() -> anyhow::Result<()> {
    let _log_guard = brawl::logging::init()?;

    print_banner();

    let file_observer = FileObserver::open(DEFAULT_LOG_FILE)
        .with_context(|| format!("opening {DEFAULT_LOG_FILE}"))?;
    let mut sim = Simulation::builder()
        .config(SimConfig::default())
        .observer(Arc::new(ConsoleObserver::stdout()))
        .observer(Arc::new(file_observer))
        .snapshot_sink(Arc::new(ConsoleSnapshotSink))
        .build();

    let handle = sim.stop_handle();
    ctrlc::set_handler(move || handle.stop()).context("installing interrupt handler")?;

    sim.start().context("starting simulation")?;
    sim.wait(sim.config().duration + Duration::from_secs(1));
    let report = sim.stop();

    let saved = save_to_path(sim.registry(), RESULTS_FILE, SaveScope::Living)
        .with_context(|| format!("saving {RESULTS_FILE}"))?;

    print_survivors(&sim);
    println!(
        "Stopped: {}. Fights: {}, kills: {}, survivors: {}.",
        report.reason,
        report.metrics.fights,
        report.metrics.kills,
        saved
    );
    println!("Results saved to '{RESULTS_FILE}' and '{DEFAULT_LOG_FILE}'.");
    Ok(())
}

fn print_banner() {
    println!("=== BRAWL: DUNGEON SIMULATOR ===");
    println!("Dragons, bulls and toads.");
    println!("Rules:");
    for kind in Kind::ALL {
        let stats = kind.stats();
        let prey = kind.prey().map_or_else(|| "nobody".to_string(), |p| format!("{p}s"));
        println!(
            "- {kind} ({}) moves up to {}, reaches {}, attacks {prey}",
            kind.symbol(),
            stats.move_distance,
            stats.kill_distance
        );
    }
    println!("- Every fight is a d6 contest; the attacker must roll higher");
    println!("================================\n");
}

fn print_survivors(sim: &Simulation) {
    let survivors = sim.registry().survivors();
    println!("\n=== SURVIVORS ({}) ===", survivors.len());
    println!("{:<8} {:>7} {:>7}  NAME", "KIND", "X", "Y");
    for e in &survivors {
        println!("{:<8} {:>7.1} {:>7.1}  {}", e.kind().to_string(), e.x(), e.y(), e.name());
    }
}
