//! Action interface: validate, then execute into a pure `(events, effects)`
//! pair. Actions never mutate combatant state directly — the engine applies
//! the returned effects (see [`crate::effect`]).

mod flee;
mod melee;
mod ranged;
mod spell;

use crate::combatant::Combatant;
use crate::dice::DiceService;
use crate::effect::Effect;
use crate::error::EngineFault;
use crate::events::{Event, Rejection};
use crate::intent::Intent;
use std::collections::HashMap;

/// Read-only view over engine state an action needs to validate/execute:
/// the combatant roster and whose turn it currently is.
pub struct ActionContext<'a> {
    pub combatants: &'a HashMap<String, Box<dyn Combatant>>,
    pub current_combatant_id: &'a str,
}

impl<'a> ActionContext<'a> {
    pub fn actor(&self, id: &str) -> Option<&dyn Combatant> {
        self.combatants.get(id).map(|b| b.as_ref())
    }
}

/// The pure output of executing a validated intent.
#[derive(Debug, Clone, Default)]
pub struct ActionResult {
    pub events: Vec<Event>,
    pub effects: Vec<Effect>,
}

/// Validate an intent, collecting *every* applicable rejection rather than
/// stopping at the first failure.
pub fn validate_intent(intent: &Intent, ctx: &ActionContext) -> Vec<Rejection> {
    match intent {
        Intent::MeleeAttack { .. } => melee::validate(intent, ctx),
        Intent::RangedAttack { .. } => ranged::validate(intent, ctx),
        Intent::CastSpell { .. } => spell::validate(intent, ctx),
        Intent::Flee { .. } => flee::validate(intent, ctx),
    }
}

/// Execute an already-validated intent, producing resolution events and effects.
///
/// Only exhausted dice or similarly unexpected internal trouble surfaces as
/// an `Err` here — rule-level refusals were already filtered out by
/// [`validate_intent`] before the engine ever calls this.
pub fn execute_intent(
    intent: &Intent,
    ctx: &ActionContext,
    dice: &mut dyn DiceService,
) -> Result<ActionResult, EngineFault> {
    match intent {
        Intent::MeleeAttack { .. } => melee::execute(intent, ctx, dice),
        Intent::RangedAttack { .. } => ranged::execute(intent, ctx, dice),
        Intent::CastSpell { .. } => spell::execute(intent, ctx, dice),
        Intent::Flee { .. } => flee::execute(intent, ctx, dice),
    }
}

/// Shared actor/target liveness and turn-order checks every attack action needs.
pub(super) fn check_actor_and_target(
    ctx: &ActionContext,
    actor_id: &str,
    target_id: &str,
) -> Vec<Rejection> {
    use crate::events::RejectionCode;
    let mut rejections = Vec::new();

    let actor = ctx.actor(actor_id);
    match actor {
        Some(a) if !a.is_alive() => {
            rejections.push(Rejection::new(RejectionCode::ActorDead, format!("{actor_id} is dead")))
        }
        None => rejections.push(Rejection::new(RejectionCode::ActorDead, format!("{actor_id} does not exist"))),
        _ => {}
    }
    if actor_id != ctx.current_combatant_id {
        rejections.push(Rejection::new(
            RejectionCode::ActorNotCurrent,
            format!("{actor_id} is not the current combatant"),
        ));
    }

    match ctx.actor(target_id) {
        Some(t) if !t.is_alive() => {
            rejections.push(Rejection::new(RejectionCode::TargetDead, format!("{target_id} is dead")))
        }
        Some(t) => {
            if let Some(a) = actor {
                if t.side() == a.side() {
                    rejections.push(Rejection::new(
                        RejectionCode::TargetNotOpponent,
                        format!("{target_id} is on the same side as {actor_id}"),
                    ));
                }
            }
        }
        None => rejections.push(Rejection::new(RejectionCode::TargetDead, format!("{target_id} does not exist"))),
    }

    rejections
}
