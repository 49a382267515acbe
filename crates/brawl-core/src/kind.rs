//! Entity kinds, their fixed stats, and the static eligibility table.
//!
//! Attack eligibility is keyed on the [`Kind`] tag of both participants.
//! Each kind names at most one prey kind; there is no runtime type
//! inspection anywhere in the combat path.

use std::fmt;
use std::str::FromStr;

use crate::error::EntityError;

/// The fixed category of an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    /// Long-range hunter. Preys on [`Kind::Bull`].
    Dragon,
    /// Mid-range bruiser. Preys on [`Kind::Toad`].
    Bull,
    /// Slow and harmless. Preys on nothing.
    Toad,
}

/// Movement and engagement parameters shared by every entity of a kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KindStats {
    /// Maximum per-axis step magnitude for one move.
    pub move_distance: i32,
    /// Maximum Euclidean range at which an encounter is detected.
    pub kill_distance: i32,
    /// The only kind this kind may attack, if any.
    pub prey: Option<Kind>,
    /// Single-character map symbol.
    pub symbol: char,
}

const DRAGON: KindStats = KindStats {
    move_distance: 50,
    kill_distance: 30,
    prey: Some(Kind::Bull),
    symbol: 'D',
};

const BULL: KindStats = KindStats {
    move_distance: 30,
    kill_distance: 10,
    prey: Some(Kind::Toad),
    symbol: 'B',
};

const TOAD: KindStats = KindStats {
    move_distance: 1,
    kill_distance: 10,
    prey: None,
    symbol: 'T',
};

impl Kind {
    /// All kinds in canonical order.
    pub const ALL: [Kind; 3] = [Kind::Dragon, Kind::Bull, Kind::Toad];

    /// Fixed stats for this kind.
    pub const fn stats(self) -> &'static KindStats {
        match self {
            Kind::Dragon => &DRAGON,
            Kind::Bull => &BULL,
            Kind::Toad => &TOAD,
        }
    }

    /// Canonical name, as written to save files.
    pub const fn name(self) -> &'static str {
        match self {
            Kind::Dragon => "Dragon",
            Kind::Bull => "Bull",
            Kind::Toad => "Toad",
        }
    }

    /// Map symbol for grid snapshots.
    pub const fn symbol(self) -> char {
        self.stats().symbol
    }

    /// The kind this kind is allowed to attack.
    pub const fn prey(self) -> Option<Kind> {
        self.stats().prey
    }

    /// Whether an attacker of this kind may attack a defender of `other`.
    pub fn can_target(self, other: Kind) -> bool {
        self.prey() == Some(other)
    }

    /// Position of this kind in [`Kind::ALL`].
    pub const fn index(self) -> usize {
        match self {
            Kind::Dragon => 0,
            Kind::Bull => 1,
            Kind::Toad => 2,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Kind {
    type Err = EntityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| EntityError::UnknownKind { kind: s.to_string() })
    }
}

/// Per-kind tally, indexed by [`Kind::index`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KindCounts([usize; 3]);

impl KindCounts {
    /// Count one more entity of `kind`.
    pub fn add(&mut self, kind: Kind) {
        self.0[kind.index()] += 1;
    }

    /// Number of entities of `kind`.
    pub fn get(&self, kind: Kind) -> usize {
        self.0[kind.index()]
    }

    /// Sum over all kinds.
    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_one_direction_per_hunting_pair() {
        for a in Kind::ALL {
            for b in Kind::ALL {
                if a == b {
                    assert!(!a.can_target(b), "{a} must not target its own kind");
                    continue;
                }
                // Never both directions.
                assert!(!(a.can_target(b) && b.can_target(a)), "{a} <-> {b}");
            }
        }
        assert!(Kind::Dragon.can_target(Kind::Bull));
        assert!(Kind::Bull.can_target(Kind::Toad));
        assert!(!Kind::Dragon.can_target(Kind::Toad));
        assert!(!Kind::Toad.can_target(Kind::Dragon));
        assert!(!Kind::Toad.can_target(Kind::Bull));
    }

    #[test]
    fn stats_match_table() {
        assert_eq!(Kind::Dragon.stats().move_distance, 50);
        assert_eq!(Kind::Dragon.stats().kill_distance, 30);
        assert_eq!(Kind::Bull.stats().move_distance, 30);
        assert_eq!(Kind::Bull.stats().kill_distance, 10);
        assert_eq!(Kind::Toad.stats().move_distance, 1);
        assert_eq!(Kind::Toad.stats().kill_distance, 10);
    }

    #[test]
    fn name_round_trips_through_from_str() {
        for k in Kind::ALL {
            assert_eq!(k.name().parse::<Kind>().unwrap(), k);
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "Goblin".parse::<Kind>().unwrap_err();
        assert_eq!(
            err,
            EntityError::UnknownKind {
                kind: "Goblin".into()
            }
        );
        // Case-sensitive.
        assert!("dragon".parse::<Kind>().is_err());
    }

    #[test]
    fn counts_accumulate() {
        let mut c = KindCounts::default();
        c.add(Kind::Toad);
        c.add(Kind::Toad);
        c.add(Kind::Dragon);
        assert_eq!(c.get(Kind::Toad), 2);
        assert_eq!(c.get(Kind::Dragon), 1);
        assert_eq!(c.get(Kind::Bull), 0);
        assert_eq!(c.total(), 3);
    }
}
