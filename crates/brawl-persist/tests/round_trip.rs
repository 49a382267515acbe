//! Save-then-load round trips through real files.

use std::fs;

use brawl_core::{Entity, EntityFactory, Kind};
use brawl_engine::Registry;
use brawl_persist::{load_from_path, save_to_path, SaveScope};
use brawl_test_utils::{bull, corpse, dragon, toad};
use proptest::prelude::*;

fn tuples(entities: &[Entity]) -> Vec<(Kind, f64, f64, String)> {
    entities
        .iter()
        .map(|e| (e.kind(), e.x(), e.y(), e.name().to_string()))
        .collect()
}

#[test]
fn living_population_survives_a_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dungeon_final.txt");

    let source = Registry::from_entities(vec![
        dragon("Smaug the Golden", 0.0, 100.0),
        corpse(Kind::Bull, "gone"),
        bull("Ferdinand", 33.25, 7.0),
        toad("t", 99.5, 0.125),
    ]);
    assert_eq!(save_to_path(&source, &path, SaveScope::Living).unwrap(), 3);

    let target = Registry::from_entities(vec![dragon("stale", 1.0, 1.0)]);
    let report = load_from_path(&target, &path, &mut EntityFactory::new(0)).unwrap();
    assert_eq!(report.loaded, 3);
    assert!(report.skipped.is_empty());
    assert_eq!(tuples(&target.snapshot()), tuples(&source.survivors()));
    assert_eq!(target.alive_count(), 3);
}

#[test]
fn all_scope_reloads_dead_entities_as_living() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("all.txt");
    let source = Registry::from_entities(vec![corpse(Kind::Toad, "ghost")]);
    save_to_path(&source, &path, SaveScope::All).unwrap();

    let target = Registry::new();
    load_from_path(&target, &path, &mut EntityFactory::new(0)).unwrap();
    assert_eq!(target.alive_count(), 1);
    assert_eq!(fs::read_to_string(&path).unwrap(), "Toad 0 0 ghost\n");
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let registry = Registry::from_entities(vec![dragon("keep", 1.0, 1.0)]);
    let err = load_from_path(
        &registry,
        dir.path().join("nope.txt"),
        &mut EntityFactory::new(0),
    );
    assert!(matches!(err, Err(brawl_persist::PersistError::Io(_))));
    assert_eq!(registry.len(), 1);
}

proptest! {
    #[test]
    fn random_populations_round_trip(seed in any::<u64>(), n in 0usize..40) {
        let mut factory = EntityFactory::new(seed);
        let source = Registry::new();
        for _ in 0..n {
            source.push(factory.create_random_in_world());
        }

        let mut buf = Vec::new();
        brawl_persist::save(&source, &mut buf, SaveScope::Living).unwrap();
        let target = Registry::new();
        let report = brawl_persist::load(&target, buf.as_slice(), &mut factory).unwrap();

        prop_assert_eq!(report.loaded, n);
        prop_assert_eq!(tuples(&target.snapshot()), tuples(&source.snapshot()));
    }
}
