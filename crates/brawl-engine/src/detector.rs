//! Encounter detection: which entities are within an attacker's reach.
//!
//! Detection only measures distance. Whether the attacker may actually
//! target the defender's kind is decided later, by the resolver, against
//! the state at resolution time.

use brawl_core::{Entity, EntityId};

use crate::config::ScanWindow;

/// A prospective fight. Holds ids only; entity state is re-read when
/// the task is resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CombatTask {
    /// Entity that initiated the encounter.
    pub attacker: EntityId,
    /// Entity within the attacker's kill distance.
    pub defender: EntityId,
}

/// Every living entity in `window` within `attacker`'s kill distance.
///
/// Returns nothing for a dead or unknown attacker. The attacker never
/// pairs with itself. Tasks are in registry order.
pub fn detect(entities: &[Entity], attacker: EntityId, window: ScanWindow) -> Vec<CombatTask> {
    let Some(a) = entities.get(attacker.index()) else {
        return Vec::new();
    };
    if !a.is_alive() {
        return Vec::new();
    }
    let reach = f64::from(a.kill_distance());
    let limit = window.limit(entities.len());

    entities[..limit]
        .iter()
        .enumerate()
        .filter(|&(i, e)| i != attacker.index() && e.is_alive() && a.distance_to(e) <= reach)
        .map(|(i, _)| CombatTask {
            attacker,
            defender: EntityId(i as u32),
        })
        .collect()
}
