//! Flee: reserved for a future escape system. Validation passes the usual
//! actor liveness/turn-order checks, then always yields a single stub
//! rejection — full flee semantics live outside this core, and the
//! re-decision path (`ValidateIntent` on rejection) is what lets a forced
//! flee intent fall back to normal decision-making.

use super::{ActionContext, ActionResult};
use crate::dice::DiceService;
use crate::error::EngineFault;
use crate::events::{Rejection, RejectionCode};
use crate::intent::Intent;

pub fn validate(intent: &Intent, ctx: &ActionContext) -> Vec<Rejection> {
    let Intent::Flee { actor_id } = intent else {
        unreachable!("flee::validate called with non-flee intent")
    };

    let mut rejections = Vec::new();
    match ctx.actor(actor_id) {
        Some(a) if !a.is_alive() => {
            rejections.push(Rejection::new(RejectionCode::ActorDead, format!("{actor_id} is dead")));
            return rejections;
        }
        None => {
            rejections.push(Rejection::new(RejectionCode::ActorDead, format!("{actor_id} does not exist")));
            return rejections;
        }
        _ => {}
    }
    if actor_id != ctx.current_combatant_id {
        rejections.push(Rejection::new(
            RejectionCode::ActorNotCurrent,
            format!("{actor_id} is not the current combatant"),
        ));
        return rejections;
    }

    rejections.push(Rejection::new(
        RejectionCode::FleeNotImplemented,
        format!("{actor_id} cannot flee in this core; full escape rules are out of scope"),
    ));
    rejections
}

pub fn execute(
    _intent: &Intent,
    _ctx: &ActionContext,
    _dice: &mut dyn DiceService,
) -> Result<ActionResult, EngineFault> {
    // Unreachable in normal engine flow: validate() above never returns an
    // empty rejection list, so ValidateIntent never advances to ExecuteAction
    // for a Flee intent. Kept for trait/dispatch uniformity.
    Ok(ActionResult::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::{Combatant, SimpleCombatant};
    use crate::ids::Side;
    use std::collections::HashMap;

    fn ctx<'a>(combatants: &'a HashMap<String, Box<dyn Combatant>>, current: &'a str) -> ActionContext<'a> {
        ActionContext { combatants, current_combatant_id: current }
    }

    #[test]
    fn flee_always_yields_stub_rejection_when_actor_is_current() {
        let hero = SimpleCombatant::new("pc:Hero", Side::Party, 10, 15, 16);
        let mut combatants: HashMap<String, Box<dyn Combatant>> = HashMap::new();
        combatants.insert(hero.id.clone(), Box::new(hero));
        let intent = Intent::Flee { actor_id: "pc:Hero".to_string() };
        let context = ctx(&combatants, "pc:Hero");
        let rejections = validate(&intent, &context);
        assert_eq!(rejections.len(), 1);
        assert_eq!(rejections[0].code, RejectionCode::FleeNotImplemented);
    }

    #[test]
    fn flee_from_dead_actor_reports_actor_dead_not_the_stub() {
        let hero = SimpleCombatant::new("pc:Hero", Side::Party, 0, 15, 16);
        let mut combatants: HashMap<String, Box<dyn Combatant>> = HashMap::new();
        combatants.insert(hero.id.clone(), Box::new(hero));
        let intent = Intent::Flee { actor_id: "pc:Hero".to_string() };
        let context = ctx(&combatants, "pc:Hero");
        let rejections = validate(&intent, &context);
        assert_eq!(rejections, vec![Rejection::new(RejectionCode::ActorDead, "pc:Hero is dead")]);
    }
}
