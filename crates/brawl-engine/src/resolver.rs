//! Authoritative combat resolution.
//!
//! A [`CombatTask`] only says two entities were close at detection time.
//! [`CombatResolver::resolve`] re-checks liveness and eligibility against
//! current state, rolls the contest, and applies the outcome, all inside
//! one exclusive registry section. Observer notification happens after
//! the lock is released.

use std::sync::Arc;

use brawl_core::{Dice, Event, ObserverSet};

use crate::detector::CombatTask;
use crate::metrics::SimMetrics;
use crate::registry::Registry;

/// Outcome of resolving one task.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// A participant was dead or unknown. Nothing happened.
    Stale,
    /// The attacker's kind cannot target the defender's kind. Nothing happened.
    Ineligible,
    /// Contest rolled; the defender survived.
    Repelled {
        /// Attack roll.
        attack: u8,
        /// Defense roll.
        defense: u8,
    },
    /// Contest rolled; the defender died.
    Killed {
        /// Attack roll.
        attack: u8,
        /// Defense roll.
        defense: u8,
    },
}

impl Resolution {
    /// Whether a contest was actually rolled.
    pub fn is_contest(&self) -> bool {
        matches!(self, Self::Repelled { .. } | Self::Killed { .. })
    }
}

/// Applies combat tasks to the registry.
pub struct CombatResolver<D: Dice> {
    registry: Arc<Registry>,
    observers: Arc<ObserverSet>,
    metrics: Arc<SimMetrics>,
    dice: D,
}

impl<D: Dice> CombatResolver<D> {
    /// Resolver over shared state, rolling with `dice`.
    pub fn new(
        registry: Arc<Registry>,
        observers: Arc<ObserverSet>,
        metrics: Arc<SimMetrics>,
        dice: D,
    ) -> Self {
        Self {
            registry,
            observers,
            metrics,
            dice,
        }
    }

    /// Resolve one task.
    ///
    /// Either the full outcome (state change plus its events) happens or
    /// nothing does. Discarded tasks emit no events and do not count as
    /// fights.
    pub fn resolve(&mut self, task: CombatTask) -> Resolution {
        let dice = &mut self.dice;
        let (resolution, events) = self.registry.write(|entities| {
            let (a, d) = (task.attacker.index(), task.defender.index());
            if a == d {
                return (Resolution::Stale, Vec::new());
            }
            let (Some(attacker), Some(defender)) = (entities.get(a), entities.get(d)) else {
                return (Resolution::Stale, Vec::new());
            };
            if !attacker.is_alive() || !defender.is_alive() {
                return (Resolution::Stale, Vec::new());
            }
            if !attacker.can_attack(defender) {
                return (Resolution::Ineligible, Vec::new());
            }

            let attack = dice.roll_attack(attacker);
            let defense = dice.roll_defense(defender);
            let attacker_name = attacker.name().to_string();
            let defender_name = defender.name().to_string();

            if attack > defense {
                entities[d].die();
                let events = vec![
                    Event::Fight {
                        attacker: attacker_name,
                        defender: defender_name.clone(),
                        defender_died: true,
                    },
                    Event::Die {
                        name: defender_name,
                    },
                ];
                (Resolution::Killed { attack, defense }, events)
            } else {
                let events = vec![Event::Fight {
                    attacker: attacker_name,
                    defender: defender_name,
                    defender_died: false,
                }];
                (Resolution::Repelled { attack, defense }, events)
            }
        });

        match &resolution {
            Resolution::Stale => {
                self.metrics.add_stale(1);
                tracing::debug!(?task, "stale combat task discarded");
            }
            Resolution::Ineligible => {
                self.metrics.add_ineligible(1);
                tracing::debug!(?task, "ineligible combat task discarded");
            }
            Resolution::Killed { attack, defense } => {
                self.metrics.add_fights(1);
                self.metrics.add_kills(1);
                tracing::debug!(?task, attack, defense, "defender killed");
            }
            Resolution::Repelled { attack, defense } => {
                self.metrics.add_fights(1);
                tracing::debug!(?task, attack, defense, "defender held");
            }
        }

        let failures = self.observers.emit_all(&events);
        if failures > 0 {
            self.metrics.add_observer_failures(failures as u64);
        }
        resolution
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brawl_core::{Entity, EntityId, Kind};
    use brawl_test_utils::{
        bull, corpse, dragon, toad, FailingObserver, RecordingObserver, ScriptedDice,
    };

    struct Fixture {
        registry: Arc<Registry>,
        recorder: Arc<RecordingObserver>,
        metrics: Arc<SimMetrics>,
        resolver: CombatResolver<ScriptedDice>,
    }

    fn fixture(entities: Vec<Entity>, dice: ScriptedDice) -> Fixture {
        let registry = Arc::new(Registry::from_entities(entities));
        let recorder = RecordingObserver::shared();
        let observers = Arc::new(ObserverSet::new());
        observers.add(recorder.clone());
        let metrics = Arc::new(SimMetrics::new());
        let resolver = CombatResolver::new(
            Arc::clone(&registry),
            observers,
            Arc::clone(&metrics),
            dice,
        );
        Fixture {
            registry,
            recorder,
            metrics,
            resolver,
        }
    }

    fn task(a: u32, d: u32) -> CombatTask {
        CombatTask {
            attacker: EntityId(a),
            defender: EntityId(d),
        }
    }

    #[test]
    fn winning_roll_kills_and_emits_fight_then_die() {
        let mut f = fixture(
            vec![dragon("Smaug", 5.0, 5.0), bull("Ferdinand", 5.0, 5.0)],
            ScriptedDice::attacker_wins(),
        );
        let r = f.resolver.resolve(task(0, 1));
        assert_eq!(r, Resolution::Killed { attack: 6, defense: 1 });
        assert!(!f.registry.get(EntityId(1)).unwrap().is_alive());
        assert_eq!(
            f.recorder.events(),
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
        let m = f.metrics.snapshot();
        assert_eq!((m.fights, m.kills), (1, 1));
    }

    #[test]
    fn tie_goes_to_defender() {
        let mut f = fixture(
            vec![bull("b", 5.0, 5.0), toad("t", 5.0, 5.0)],
            ScriptedDice::fixed(4, 4),
        );
        let r = f.resolver.resolve(task(0, 1));
        assert_eq!(r, Resolution::Repelled { attack: 4, defense: 4 });
        assert!(f.registry.get(EntityId(1)).unwrap().is_alive());
        assert_eq!(
            f.recorder.events(),
            vec![Event::Fight {
                attacker: "b".into(),
                defender: "t".into(),
                defender_died: false,
            }]
        );
        let m = f.metrics.snapshot();
        assert_eq!((m.fights, m.kills), (1, 0));
    }

    #[test]
    fn dead_participant_is_stale_and_silent() {
        let mut f = fixture(
            vec![dragon("d", 5.0, 5.0), corpse(Kind::Bull, "gone")],
            ScriptedDice::attacker_wins(),
        );
        let before = f.registry.snapshot();
        assert_eq!(f.resolver.resolve(task(0, 1)), Resolution::Stale);
        assert_eq!(f.resolver.resolve(task(1, 0)), Resolution::Stale);
        assert_eq!(f.registry.snapshot(), before);
        assert!(f.recorder.events().is_empty());
        let m = f.metrics.snapshot();
        assert_eq!((m.fights, m.stale_discarded), (0, 2));
    }

    #[test]
    fn unknown_ids_and_self_pairs_are_stale() {
        let mut f = fixture(vec![dragon("d", 5.0, 5.0)], ScriptedDice::attacker_wins());
        assert_eq!(f.resolver.resolve(task(0, 7)), Resolution::Stale);
        assert_eq!(f.resolver.resolve(task(0, 0)), Resolution::Stale);
        assert!(f.registry.get(EntityId(0)).unwrap().is_alive());
    }

    #[test]
    fn ineligible_pairs_are_discarded() {
        let mut f = fixture(
            vec![
                toad("t", 5.0, 5.0),
                bull("b", 5.0, 5.0),
                dragon("d", 5.0, 5.0),
                dragon("d2", 5.0, 5.0),
            ],
            ScriptedDice::attacker_wins(),
        );
        for t in [task(0, 1), task(1, 2), task(2, 0), task(2, 3)] {
            assert_eq!(f.resolver.resolve(t), Resolution::Ineligible);
        }
        assert_eq!(f.registry.alive_count(), 4);
        assert!(f.recorder.events().is_empty());
        assert_eq!(f.metrics.snapshot().ineligible_discarded, 4);
    }

    #[test]
    fn duplicate_task_after_kill_is_stale() {
        let mut f = fixture(
            vec![dragon("d", 5.0, 5.0), bull("b", 5.0, 5.0)],
            ScriptedDice::attacker_wins(),
        );
        assert!(matches!(f.resolver.resolve(task(0, 1)), Resolution::Killed { .. }));
        assert_eq!(f.resolver.resolve(task(0, 1)), Resolution::Stale);
        assert_eq!(f.recorder.combat_events().len(), 2);
        assert_eq!(f.metrics.fights(), 1);
    }

    #[test]
    fn observer_failure_does_not_undo_outcome() {
        let registry = Arc::new(Registry::from_entities(vec![
            dragon("d", 5.0, 5.0),
            bull("b", 5.0, 5.0),
        ]));
        let observers = Arc::new(ObserverSet::new());
        let failing = Arc::new(FailingObserver::new());
        let recorder = RecordingObserver::shared();
        observers.add(failing.clone());
        observers.add(recorder.clone());
        let metrics = Arc::new(SimMetrics::new());
        let mut resolver = CombatResolver::new(
            Arc::clone(&registry),
            observers,
            Arc::clone(&metrics),
            ScriptedDice::attacker_wins(),
        );

        assert!(resolver.resolve(task(0, 1)).is_contest());
        assert_eq!(registry.alive_count(), 1);
        assert_eq!(failing.calls(), 2);
        assert_eq!(recorder.events().len(), 2);
        assert_eq!(metrics.snapshot().observer_failures, 2);
    }

    #[test]
    fn scripted_sequence_drives_mixed_outcomes() {
        let mut f = fixture(
            vec![
                dragon("d", 5.0, 5.0),
                bull("b1", 5.0, 5.0),
                bull("b2", 5.0, 5.0),
            ],
            ScriptedDice::sequence(&[(2, 5), (5, 2)]),
        );
        assert_eq!(
            f.resolver.resolve(task(0, 1)),
            Resolution::Repelled { attack: 2, defense: 5 }
        );
        assert_eq!(
            f.resolver.resolve(task(0, 2)),
            Resolution::Killed { attack: 5, defense: 2 }
        );
        let alive: Vec<_> = f
            .registry
            .survivors()
            .iter()
            .map(|e| e.name().to_string())
            .collect();
        assert_eq!(alive, vec!["d", "b1"]);
    }
}
