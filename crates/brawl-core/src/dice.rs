//! The [`Dice`] capability: attack and defense rolls for one contest.
//!
//! The resolver never draws randomness itself; it asks a `Dice`. The
//! default [`RandomDice`] delegates to the entity's own roll methods with
//! a loop-local RNG. Tests swap in scripted dice to force outcomes.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::entity::Entity;

/// Source of contest rolls.
pub trait Dice: Send {
    /// Attack power for `attacker`.
    fn roll_attack(&mut self, attacker: &Entity) -> u8;

    /// Defense power for `defender`.
    fn roll_defense(&mut self, defender: &Entity) -> u8;
}

/// Uniform six-sided dice backed by ChaCha8.
#[derive(Debug)]
pub struct RandomDice {
    rng: ChaCha8Rng,
}

impl RandomDice {
    /// Deterministic dice.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Dice seeded from operating-system entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_os_rng(),
        }
    }
}

impl Dice for RandomDice {
    fn roll_attack(&mut self, attacker: &Entity) -> u8 {
        attacker.roll_attack(&mut self.rng)
    }

    fn roll_defense(&mut self, defender: &Entity) -> u8 {
        defender.roll_defense(&mut self.rng)
    }
}

impl<D: Dice + ?Sized> Dice for Box<D> {
    fn roll_attack(&mut self, attacker: &Entity) -> u8 {
        (**self).roll_attack(attacker)
    }

    fn roll_defense(&mut self, defender: &Entity) -> u8 {
        (**self).roll_defense(defender)
    }
}
