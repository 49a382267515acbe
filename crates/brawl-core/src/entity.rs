//! The [`Entity`] record: mutable position and alive flag plus a fixed kind.
//!
//! Death is a flag, not removal. Once `alive` is false it is never reset,
//! and a dead entity neither moves nor attacks.

use std::fmt;

use rand::Rng;

use crate::kind::Kind;

/// Lower world bound on both axes (inclusive).
pub const WORLD_MIN: f64 = 0.0;

/// Upper world bound on both axes (inclusive).
pub const WORLD_MAX: f64 = 100.0;

/// A point in the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Position {
    /// Create a position without bounds validation.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether both coordinates lie within `[WORLD_MIN, WORLD_MAX]`.
    pub fn in_bounds(self) -> bool {
        (WORLD_MIN..=WORLD_MAX).contains(&self.x) && (WORLD_MIN..=WORLD_MAX).contains(&self.y)
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// One simulated creature.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    kind: Kind,
    name: String,
    position: Position,
    alive: bool,
}

impl Entity {
    /// Create a living entity. Bounds are the caller's responsibility.
    pub fn new(kind: Kind, x: f64, y: f64, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            position: Position::new(x, y),
            alive: true,
        }
    }

    /// The entity's kind.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Display name. Not required to be unique.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current position.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Current x coordinate.
    pub fn x(&self) -> f64 {
        self.position.x
    }

    /// Current y coordinate.
    pub fn y(&self) -> f64 {
        self.position.y
    }

    /// Whether the entity is still alive.
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Maximum per-axis step magnitude.
    pub fn move_distance(&self) -> i32 {
        self.kind.stats().move_distance
    }

    /// Maximum range at which this entity triggers an encounter.
    pub fn kill_distance(&self) -> i32 {
        self.kind.stats().kill_distance
    }

    /// Take one random step.
    ///
    /// Draws an independent integer offset in `[-move_distance,
    /// move_distance]` per axis. The step is committed only if the
    /// candidate lies inside the world; otherwise the entity stays put.
    /// Returns `true` if the position was committed.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if !self.alive {
            return false;
        }
        let reach = self.move_distance();
        let dx = rng.random_range(-reach..=reach);
        let dy = rng.random_range(-reach..=reach);
        let candidate = Position::new(self.position.x + dx as f64, self.position.y + dy as f64);
        if !candidate.in_bounds() {
            return false;
        }
        self.position = candidate;
        true
    }

    /// Euclidean distance between the two current positions.
    pub fn distance_to(&self, other: &Entity) -> f64 {
        self.position.distance(other.position)
    }

    /// Whether this entity's kind may attack `other`'s kind.
    ///
    /// Ignores alive state; the resolver checks that separately.
    pub fn can_attack(&self, other: &Entity) -> bool {
        self.kind.can_target(other.kind)
    }

    /// Uniform attack roll in `[1, 6]`.
    pub fn roll_attack<R: Rng + ?Sized>(&self, rng: &mut R) -> u8 {
        rng.random_range(1..=6)
    }

    /// Uniform defense roll in `[1, 6]`.
    pub fn roll_defense<R: Rng + ?Sized>(&self, rng: &mut R) -> u8 {
        rng.random_range(1..=6)
    }

    /// Mark the entity dead. Idempotent.
    pub fn die(&mut self) {
        self.alive = false;
    }

    /// One save-file record: `<kind> <x> <y> <name>`.
    pub fn serialize(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.kind, self.position.x, self.position.y, self.name
        )
    }
}
