//! Entity construction: random seeding, explicit creation, and record parsing.
//!
//! [`EntityFactory`] owns its own RNG so that seeding is reproducible when
//! a seed is supplied and nothing depends on process-wide random state.

use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::entity::{Entity, Position};
use crate::error::{EntityError, ParseError};
use crate::kind::Kind;

const NAME_PREFIXES: [&str; 5] = ["Grim", "Ash", "Thorn", "Mire", "Vex"];
const NAME_SUFFIXES: [&str; 5] = ["fang", "hide", "maw", "horn", "scale"];

/// Prefix for synthesized names of records that carry none.
pub const PLACEHOLDER_PREFIX: &str = "Unnamed_";

/// Builds entities for seeding and loading.
#[derive(Debug)]
pub struct EntityFactory {
    rng: ChaCha8Rng,
}

impl EntityFactory {
    /// Factory with a deterministic RNG.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Factory seeded from operating-system entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_os_rng(),
        }
    }

    /// A random `Prefix_suffix` name.
    pub fn random_name(&mut self) -> String {
        let prefix = NAME_PREFIXES.choose(&mut self.rng).copied().unwrap_or("Nameless");
        let suffix = NAME_SUFFIXES.choose(&mut self.rng).copied().unwrap_or("one");
        format!("{prefix}_{suffix}")
    }

    /// A uniformly random kind with a random name at `(x, y)`.
    ///
    /// No bounds validation.
    pub fn create_random(&mut self, x: f64, y: f64) -> Entity {
        let kind = Kind::ALL[self.rng.random_range(0..Kind::ALL.len())];
        let name = self.random_name();
        Entity::new(kind, x, y, name)
    }

    /// A random entity at a uniformly random in-bounds position.
    pub fn create_random_in_world(&mut self) -> Entity {
        let x = self.rng.random_range(crate::WORLD_MIN..=crate::WORLD_MAX);
        let y = self.rng.random_range(crate::WORLD_MIN..=crate::WORLD_MAX);
        self.create_random(x, y)
    }

    /// Explicit construction from a kind name.
    pub fn create(
        &mut self,
        kind: &str,
        x: f64,
        y: f64,
        name: impl Into<String>,
    ) -> Result<Entity, EntityError> {
        let kind: Kind = kind.parse()?;
        Ok(Entity::new(kind, x, y, name))
    }

    /// Parse one `<kind> <x> <y> <name>` record.
    ///
    /// The name is the remainder of the line after the y field, with
    /// leading whitespace removed; it may contain spaces. A record with
    /// no name gets a synthesized placeholder.
    pub fn parse(&mut self, line: &str) -> Result<Entity, ParseError> {
        let (kind_tok, rest) = next_token(line)
            .ok_or(ParseError::MissingField { field: "kind" })?;
        let (x_tok, rest) = next_token(rest)
            .ok_or(ParseError::MissingField { field: "x" })?;
        let (y_tok, rest) = next_token(rest)
            .ok_or(ParseError::MissingField { field: "y" })?;

        let x = parse_coord("x", x_tok)?;
        let y = parse_coord("y", y_tok)?;
        if !Position::new(x, y).in_bounds() {
            return Err(ParseError::OutOfBounds { x, y });
        }
        let kind: Kind = kind_tok.parse()?;

        let name = rest.trim_start();
        let name = if name.is_empty() {
            format!("{PLACEHOLDER_PREFIX}{}", self.random_name())
        } else {
            name.to_string()
        };
        Ok(Entity::new(kind, x, y, name))
    }
}

/// Split off the next whitespace-delimited token, returning it and the
/// untouched remainder (which starts at the delimiter).
fn next_token(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    let end = s.find(char::is_whitespace).unwrap_or(s.len());
    Some(s.split_at(end))
}

fn parse_coord(field: &'static str, token: &str) -> Result<f64, ParseError> {
    match token.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ParseError::InvalidNumber {
            field,
            value: token.to_string(),
        }),
    }
}
