//! Melee attack: THAC0-based to-hit, strength modifier on both roll and damage.

use super::{check_actor_and_target, ActionContext, ActionResult};
use crate::dice::DiceService;
use crate::effect::Effect;
use crate::error::EngineFault;
use crate::events::{Event, Rejection};
use crate::intent::Intent;

pub fn validate(intent: &Intent, ctx: &ActionContext) -> Vec<Rejection> {
    let Intent::MeleeAttack { actor_id, target_id } = intent else {
        unreachable!("melee::validate called with non-melee intent")
    };
    check_actor_and_target(ctx, actor_id, target_id)
}

pub fn execute(
    intent: &Intent,
    ctx: &ActionContext,
    dice: &mut dyn DiceService,
) -> Result<ActionResult, EngineFault> {
    let Intent::MeleeAttack { actor_id, target_id } = intent else {
        unreachable!("melee::execute called with non-melee intent")
    };
    let actor = ctx
        .actor(actor_id)
        .ok_or_else(|| EngineFault::MissingCombatant(actor_id.clone()))?;
    let mut events = Vec::new();
    let mut effects = Vec::new();

    for _ in 0..actor.attacks_per_round() {
        let Some(target) = ctx.actor(target_id) else { break };
        if !target.is_alive() {
            break;
        }

        let roll = dice.d20()?;
        let modifier = actor.strength_modifier() as i64;
        let total = roll + modifier;
        let needed = (actor.thac0() - target.armor_class()) as i64;

        let critical = roll == 20;
        let hit = if roll == 1 {
            false
        } else {
            critical || total >= needed
        };

        events.push(Event::AttackRolled {
            attacker_id: actor_id.clone(),
            defender_id: target_id.clone(),
            roll,
            total,
            needed,
            hit,
            critical,
        });

        if hit {
            let weapon_die = actor
                .weapon()
                .map(|w| w.melee_damage_die)
                .unwrap_or_else(|| "1d4".to_string());
            let base = dice.roll(&weapon_die)? + modifier;
            let amount = if critical {
                ((base as f64) * 1.5).floor() as i64
            } else {
                base
            }
            .max(1);

            effects.push(Effect::Damage {
                source_id: actor_id.clone(),
                target_id: target_id.clone(),
                amount,
            });
        }
    }

    Ok(ActionResult { events, effects })
}
