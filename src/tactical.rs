//! Tactical providers: pluggable decision-making for non-interactive sides.
//!
//! Providers see only an immutable [`CombatView`], never the engine's
//! mutable context — the same isolation external consumers get, so a
//! provider cannot observe or cause anything a UI couldn't.

use crate::dice::{choose, DiceService};
use crate::error::EngineFault;
use crate::ids::Side;
use crate::intent::Intent;
use crate::view::CombatView;

pub trait TacticalProvider: std::fmt::Debug {
    fn choose_intent(
        &self,
        view: &CombatView,
        actor_id: &str,
        dice: &mut dyn DiceService,
    ) -> Result<Intent, EngineFault>;
}

/// Picks uniformly at random among melee attacks against living opponents.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomMeleeProvider;

impl TacticalProvider for RandomMeleeProvider {
    fn choose_intent(
        &self,
        view: &CombatView,
        actor_id: &str,
        dice: &mut dyn DiceService,
    ) -> Result<Intent, EngineFault> {
        let actor_side = view
            .combatant(actor_id)
            .map(|c| c.side)
            .ok_or_else(|| EngineFault::MissingCombatant(actor_id.to_string()))?;
        // `view.combatants` inherits `HashMap` iteration order from `get_view`,
        // which varies per process; sort so the same dice sequence always
        // picks the same target across independent engine instances.
        let mut targets: Vec<String> = view.living_opponents_of(actor_side).map(|c| c.id.clone()).collect();
        targets.sort();
        let target_id = choose(dice, &targets)?.clone();
        Ok(Intent::MeleeAttack { actor_id: actor_id.to_string(), target_id })
    }
}

/// Always attacks the living opponent with the lowest current HP, ties
/// broken by ID. Demonstrates the provider trait is genuinely pluggable;
/// not exercised by any required scenario.
#[derive(Debug, Clone, Copy, Default)]
pub struct FocusLowestHpProvider;

impl TacticalProvider for FocusLowestHpProvider {
    fn choose_intent(
        &self,
        view: &CombatView,
        actor_id: &str,
        _dice: &mut dyn DiceService,
    ) -> Result<Intent, EngineFault> {
        let actor_side = view
            .combatant(actor_id)
            .map(|c| c.side)
            .ok_or_else(|| EngineFault::MissingCombatant(actor_id.to_string()))?;
        let target = view
            .living_opponents_of(actor_side)
            .min_by(|a, b| a.hp.cmp(&b.hp).then_with(|| a.id.cmp(&b.id)))
            .ok_or_else(|| EngineFault::Internal(format!("no living opponents for {actor_id}")))?;
        Ok(Intent::MeleeAttack { actor_id: actor_id.to_string(), target_id: target.id.clone() })
    }
}
