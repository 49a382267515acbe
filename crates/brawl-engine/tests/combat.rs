//! End-to-end combat through the running loops.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use brawl_core::{Event, Kind};
use brawl_engine::{ScanWindow, SimConfig, Simulation};
use brawl_test_utils::{bull, dragon, toad, RecordingObserver, ScriptedDice};

fn fast_config() -> SimConfig {
    SimConfig {
        population: 0,
        tick_interval: Duration::from_millis(5),
        dequeue_timeout: Duration::from_millis(10),
        supervisor_interval: Duration::from_millis(5),
        seed: Some(99),
        ..SimConfig::default()
    }
}

fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    cond()
}

#[test]
fn forced_win_kills_the_defender() {
    let recorder = RecordingObserver::shared();
    let mut sim = Simulation::builder()
        .config(fast_config())
        .observer(recorder.clone())
        .entities([dragon("Smaug", 50.0, 50.0), bull("Ferdinand", 50.0, 50.0)])
        .dice(ScriptedDice::attacker_wins())
        .build();
    assert_eq!(sim.registry().alive_count(), 2);

    sim.start().unwrap();
    assert!(wait_until(Duration::from_secs(3), || sim
        .registry()
        .alive_count()
        == 1));
    let report = sim.stop();

    let survivors = sim.registry().survivors();
    assert_eq!(survivors.len(), 1);
    assert_eq!(survivors[0].kind(), Kind::Dragon);
    assert_eq!(report.metrics.kills, 1);
    assert_eq!(
        recorder.combat_events(),
        vec![
            Event::Fight {
                attacker: "Smaug".into(),
                defender: "Ferdinand".into(),
                defender_died: true,
            },
            Event::Die {
                name: "Ferdinand".into()
            },
        ]
    );
}

#[test]
fn forced_hold_never_kills() {
    let recorder = RecordingObserver::shared();
    let mut sim = Simulation::builder()
        .config(fast_config())
        .observer(recorder.clone())
        .entities([bull("b", 50.0, 50.0), toad("t", 50.0, 50.0)])
        .dice(ScriptedDice::defender_holds())
        .build();
    sim.start().unwrap();
    assert!(wait_until(Duration::from_secs(5), || sim.fights() >= 1));
    sim.stop();

    assert_eq!(sim.registry().alive_count(), 2);
    assert_eq!(recorder.count(|e| matches!(e, Event::Die { .. })), 0);
    assert!(recorder.count(|e| matches!(
        e,
        Event::Fight {
            defender_died: false,
            ..
        }
    )) >= 1);
}

#[test]
fn toads_never_fight() {
    let recorder = RecordingObserver::shared();
    let mut sim = Simulation::builder()
        .config(fast_config())
        .observer(recorder.clone())
        .entities([toad("a", 50.0, 50.0), toad("b", 50.0, 50.0)])
        .dice(ScriptedDice::attacker_wins())
        .build();
    sim.start().unwrap();
    assert!(wait_until(Duration::from_secs(2), || sim
        .metrics()
        .ineligible_discarded
        >= 5));
    let report = sim.stop();
    assert_eq!(report.metrics.fights, 0);
    assert!(recorder.combat_events().is_empty());
}

#[test]
fn counters_agree_with_delivered_events() {
    let recorder = RecordingObserver::shared();
    let mut sim = Simulation::builder()
        .config(SimConfig {
            population: 40,
            ..fast_config()
        })
        .observer(recorder.clone())
        .build();
    sim.start().unwrap();
    assert!(wait_until(Duration::from_secs(3), || sim.fights() >= 5));
    let report = sim.stop();

    let combat = recorder.combat_events();
    let fights = combat
        .iter()
        .filter(|e| matches!(e, Event::Fight { .. }))
        .count() as u64;
    let deaths = combat
        .iter()
        .filter(|e| matches!(e, Event::Die { .. }))
        .count() as u64;
    assert_eq!(fights, report.metrics.fights);
    assert_eq!(deaths, report.metrics.kills);
    assert_eq!(
        sim.registry().len() - sim.registry().alive_count(),
        deaths as usize
    );

    // Every kill is reported as Fight(died) immediately followed by Die.
    for (i, event) in combat.iter().enumerate() {
        if let Event::Fight {
            defender,
            defender_died: true,
            ..
        } = event
        {
            assert_eq!(
                combat.get(i + 1),
                Some(&Event::Die {
                    name: defender.clone()
                })
            );
        }
    }

    let moves = recorder.count(|e| matches!(e, Event::Move { .. })) as u64;
    assert_eq!(moves, report.metrics.moves);
}

#[test]
fn positions_stay_in_bounds_under_load() {
    let mut sim = Simulation::builder()
        .config(SimConfig {
            population: 50,
            scan_window: ScanWindow::Prefix(10),
            ..fast_config()
        })
        .build();
    sim.start().unwrap();
    for _ in 0..20 {
        for e in sim.registry().snapshot() {
            assert!(e.position().in_bounds(), "{e} left the world");
        }
        thread::sleep(Duration::from_millis(5));
    }
    sim.stop();
}

#[test]
fn observers_share_one_recorder_across_threads() {
    let recorder = Arc::new(RecordingObserver::new());
    let mut sim = Simulation::builder()
        .config(fast_config())
        .observer(recorder.clone())
        .observer(recorder.clone())
        .entities([dragon("d", 50.0, 50.0), bull("b", 50.0, 50.0)])
        .dice(ScriptedDice::attacker_wins())
        .build();
    sim.start().unwrap();
    assert!(wait_until(Duration::from_secs(3), || sim
        .registry()
        .alive_count()
        == 1));
    sim.stop();
    // Registered twice, so every combat event arrives twice in a row.
    let combat = recorder.combat_events();
    assert_eq!(combat.len(), 4);
    assert_eq!(combat[0], combat[1]);
    assert_eq!(combat[2], combat[3]);
}
