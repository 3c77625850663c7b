//! Immutable read-only projections of encounter state.
//!
//! Views are the only supported external read path — external consumers
//! (tactical providers, UIs) never see the engine's mutable context
//! directly. Every field is a frozen value or an immutable container, so
//! there is nothing to mutate even by accident.

use crate::ids::Side;
use std::collections::BTreeSet;

/// A read-only snapshot of one combatant at the moment `get_view()` was called.
#[derive(Debug, Clone, PartialEq)]
pub struct CombatantView {
    pub id: String,
    pub name: String,
    pub side: Side,
    pub alive: bool,
    pub hp: i64,
    pub max_hp: i64,
    pub initiative: i64,
}

/// A read-only snapshot of the whole encounter at the moment of the call.
#[derive(Debug, Clone, PartialEq)]
pub struct CombatView {
    pub round_no: u32,
    pub current_id: Option<String>,
    pub combatants: Vec<CombatantView>,
    pub announced_deaths: BTreeSet<String>,
}

impl CombatView {
    pub fn combatant(&self, id: &str) -> Option<&CombatantView> {
        self.combatants.iter().find(|c| c.id == id)
    }

    pub fn living_opponents_of(&self, side: Side) -> impl Iterator<Item = &CombatantView> {
        self.combatants.iter().filter(move |c| c.alive && c.side != side)
    }
}

/// Resolves ties when two combatants roll the same initiative value.
/// Side-then-ID is the only policy shipped; exposing it as a trait keeps
/// the door open without inventing unrequested tie-break rules.
pub trait TiebreakPolicy: std::fmt::Debug {
    /// Total order over combatants with equal initiative rolls: `Less` means
    /// `a` goes first.
    fn order(&self, a: &CombatantView, b: &CombatantView) -> std::cmp::Ordering;
}

/// Party acts before opposition; within a side, lexicographic ID order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SideThenIdTiebreak;

impl TiebreakPolicy for SideThenIdTiebreak {
    fn order(&self, a: &CombatantView, b: &CombatantView) -> std::cmp::Ordering {
        let side_rank = |s: Side| if s == Side::Party { 0 } else { 1 };
        side_rank(a.side).cmp(&side_rank(b.side)).then_with(|| a.id.cmp(&b.id))
    }
}
