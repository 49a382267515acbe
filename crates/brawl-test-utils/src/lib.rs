//! Test utilities and mock capabilities for brawl development.
//!
//! Provides recording and failing implementations of [`Observer`], a
//! [`ScriptedDice`] that forces contest outcomes, and small entity
//! builders for arranging scenarios.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use brawl_core::{Dice, Entity, Event, Kind, Observer, ObserverError};

/// Observer that records every event it receives, in order.
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<Event>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Copy of everything recorded so far.
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    /// Recorded events excluding moves.
    pub fn combat_events(&self) -> Vec<Event> {
        self.events()
            .into_iter()
            .filter(|e| !matches!(e, Event::Move { .. }))
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| pred(e)).count()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl Observer for RecordingObserver {
    fn on_fight(
        &self,
        attacker: &str,
        defender: &str,
        defender_died: bool,
    ) -> Result<(), ObserverError> {
        self.push(Event::Fight {
            attacker: attacker.to_string(),
            defender: defender.to_string(),
            defender_died,
        });
        Ok(())
    }

    fn on_move(&self, name: &str, x: f64, y: f64) -> Result<(), ObserverError> {
        self.push(Event::Move {
            name: name.to_string(),
            x,
            y,
        });
        Ok(())
    }

    fn on_die(&self, name: &str) -> Result<(), ObserverError> {
        self.push(Event::Die {
            name: name.to_string(),
        });
        Ok(())
    }
}

/// Observer that rejects every event and counts the attempts.
#[derive(Default)]
pub struct FailingObserver {
    calls: AtomicUsize,
}

impl FailingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail(&self) -> Result<(), ObserverError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ObserverError::Rejected {
            reason: "failing observer".into(),
        })
    }
}

impl Observer for FailingObserver {
    fn on_fight(&self, _: &str, _: &str, _: bool) -> Result<(), ObserverError> {
        self.fail()
    }

    fn on_move(&self, _: &str, _: f64, _: f64) -> Result<(), ObserverError> {
        self.fail()
    }

    fn on_die(&self, _: &str) -> Result<(), ObserverError> {
        self.fail()
    }
}

/// Observer that panics on every combat event.
pub struct PanickingObserver;

impl Observer for PanickingObserver {
    fn on_fight(&self, _: &str, _: &str, _: bool) -> Result<(), ObserverError> {
        panic!("PanickingObserver::on_fight")
    }

    fn on_die(&self, _: &str) -> Result<(), ObserverError> {
        panic!("PanickingObserver::on_die")
    }
}

/// Dice that return scripted values.
///
/// Queued rolls are consumed first; once a queue is empty the fixed
/// fallback value is returned forever.
pub struct ScriptedDice {
    attacks: VecDeque<u8>,
    defenses: VecDeque<u8>,
    attack_fallback: u8,
    defense_fallback: u8,
}

impl ScriptedDice {
    /// Always roll `attack` for attackers and `defense` for defenders.
    pub fn fixed(attack: u8, defense: u8) -> Self {
        Self {
            attacks: VecDeque::new(),
            defenses: VecDeque::new(),
            attack_fallback: attack,
            defense_fallback: defense,
        }
    }

    /// Attacker always wins (6 against 1).
    pub fn attacker_wins() -> Self {
        Self::fixed(6, 1)
    }

    /// Defender always holds (1 against 6).
    pub fn defender_holds() -> Self {
        Self::fixed(1, 6)
    }

    /// Play the given pairs in order, then fall back to a tie.
    pub fn sequence(pairs: &[(u8, u8)]) -> Self {
        Self {
            attacks: pairs.iter().map(|p| p.0).collect(),
            defenses: pairs.iter().map(|p| p.1).collect(),
            attack_fallback: 1,
            defense_fallback: 1,
        }
    }
}

impl Dice for ScriptedDice {
    fn roll_attack(&mut self, _attacker: &Entity) -> u8 {
        self.attacks.pop_front().unwrap_or(self.attack_fallback)
    }

    fn roll_defense(&mut self, _defender: &Entity) -> u8 {
        self.defenses.pop_front().unwrap_or(self.defense_fallback)
    }
}

pub fn dragon(name: &str, x: f64, y: f64) -> Entity {
    Entity::new(Kind::Dragon, x, y, name)
}

pub fn bull(name: &str, x: f64, y: f64) -> Entity {
    Entity::new(Kind::Bull, x, y, name)
}

pub fn toad(name: &str, x: f64, y: f64) -> Entity {
    Entity::new(Kind::Toad, x, y, name)
}

/// A dead entity of `kind` at the origin.
pub fn corpse(kind: Kind, name: &str) -> Entity {
    let mut e = Entity::new(kind, 0.0, 0.0, name);
    e.die();
    e
}
