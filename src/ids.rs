//! Combatant identifiers and side membership.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of the encounter a combatant belongs to. Side identity drives
/// victory conditions, default targeting, and the initiative tiebreak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Party,
    Opposition,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Party => Side::Opposition,
            Side::Opposition => Side::Party,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Party => write!(f, "party"),
            Side::Opposition => write!(f, "opposition"),
        }
    }
}

/// Build a canonical ID for a player character: `pc:<unique name>`.
pub fn pc_id(name: &str) -> String {
    format!("pc:{name}")
}

/// Build a canonical ID for a monster: `monster:<name>:<zero-based index>`.
pub fn monster_id(name: &str, index: usize) -> String {
    format!("monster:{name}:{index}")
}
