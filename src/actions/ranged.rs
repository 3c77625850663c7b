//! Ranged attack: same to-hit/threshold machinery as melee, but keyed off
//! dexterity instead of strength, and with no ability modifier on damage.
//! Monster ranged attacks are deferred out of this core.

use super::{check_actor_and_target, ActionContext, ActionResult};
use crate::dice::DiceService;
use crate::effect::Effect;
use crate::error::EngineFault;
use crate::events::{Event, Rejection, RejectionCode};
use crate::intent::Intent;

fn is_monster(id: &str) -> bool {
    id.starts_with("monster:")
}

pub fn validate(intent: &Intent, ctx: &ActionContext) -> Vec<Rejection> {
    let Intent::RangedAttack { actor_id, target_id } = intent else {
        unreachable!("ranged::validate called with non-ranged intent")
    };
    let mut rejections = check_actor_and_target(ctx, actor_id, target_id);

    if is_monster(actor_id) {
        rejections.push(Rejection::new(
            RejectionCode::MonsterActionNotSupported,
            format!("{actor_id} cannot take ranged actions; deferred"),
        ));
    } else if let Some(actor) = ctx.actor(actor_id) {
        let has_ranged = actor.weapon().map(|w| w.ranged_damage_die.is_some()).unwrap_or(false);
        if !has_ranged {
            rejections.push(Rejection::new(
                RejectionCode::NoRangedWeapon,
                format!("{actor_id} has no ranged weapon equipped"),
            ));
        }
    }

    rejections
}

pub fn execute(
    intent: &Intent,
    ctx: &ActionContext,
    dice: &mut dyn DiceService,
) -> Result<ActionResult, EngineFault> {
    let Intent::RangedAttack { actor_id, target_id } = intent else {
        unreachable!("ranged::execute called with non-ranged intent")
    };
    let actor = ctx
        .actor(actor_id)
        .ok_or_else(|| EngineFault::MissingCombatant(actor_id.clone()))?;
    let target = ctx
        .actor(target_id)
        .ok_or_else(|| EngineFault::MissingCombatant(target_id.clone()))?;

    let roll = dice.d20()?;
    let modifier = actor.dexterity_modifier() as i64;
    let total = roll + modifier;
    let needed = (actor.thac0() - target.armor_class()) as i64;

    let critical = roll == 20;
    let hit = if roll == 1 { false } else { critical || total >= needed };

    let events = vec![Event::AttackRolled {
        attacker_id: actor_id.clone(),
        defender_id: target_id.clone(),
        roll,
        total,
        needed,
        hit,
        critical,
    }];
    let mut effects = Vec::new();

    if hit {
        let weapon_die = actor
            .weapon()
            .and_then(|w| w.ranged_damage_die)
            .unwrap_or_else(|| "1d6".to_string());
        let base = dice.roll(&weapon_die)?;
        let amount = if critical { ((base as f64) * 1.5).floor() as i64 } else { base }.max(1);

        effects.push(Effect::Damage {
            source_id: actor_id.clone(),
            target_id: target_id.clone(),
            amount,
        });
    }

    Ok(ActionResult { events, effects })
}
