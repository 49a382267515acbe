//! Strongly-typed entity handle.

use std::fmt;

/// Handle to an entity inside a registry.
///
/// `EntityId(n)` is the n-th entity in registry (creation) order. The
/// registry never removes entities, so a handle stays valid for the
/// lifetime of the population it was issued from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Position of this entity in registry order.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
