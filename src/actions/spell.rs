//! Cast spell: catalog lookup, class/slot/target validation, then a
//! `ConsumeSlot` effect followed by per-target damage/condition effects.
//! Spells auto-hit; there are no saving throws in this core.

use super::{ActionContext, ActionResult};
use crate::dice::DiceService;
use crate::effect::Effect;
use crate::error::EngineFault;
use crate::events::{Event, Rejection, RejectionCode};
use crate::intent::Intent;
use crate::spells::{get_spell, SpellDefinition, ALL_LIVING_OPPONENTS};

pub fn validate(intent: &Intent, ctx: &ActionContext) -> Vec<Rejection> {
    let Intent::CastSpell { actor_id, spell_id, slot_level, target_ids } = intent else {
        unreachable!("spell::validate called with non-spell intent")
    };
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

    for target_id in target_ids {
        match ctx.actor(target_id) {
            Some(t) if !t.is_alive() => {
                rejections.push(Rejection::new(RejectionCode::TargetDead, format!("{target_id} is dead")))
            }
            None => rejections.push(Rejection::new(
                RejectionCode::TargetDead,
                format!("{target_id} does not exist"),
            )),
            _ => {}
        }
    }

    let Some(spell) = get_spell(spell_id) else {
        rejections.push(Rejection::new(RejectionCode::UnknownSpell, format!("unknown spell {spell_id}")));
        return rejections;
    };

    if let Some(caster) = actor.and_then(|a| a.as_spellcaster()) {
        if !spell.usable_by(caster.caster_class()) {
            rejections.push(Rejection::new(
                RejectionCode::IneligibleCaster,
                format!("{actor_id}'s class cannot cast {spell_id}"),
            ));
        }
        if *slot_level != spell.level {
            rejections.push(Rejection::new(
                RejectionCode::SlotLevelMismatch,
                format!("{spell_id} is level {} but slot_level {slot_level} was supplied", spell.level),
            ));
        } else if caster.max_slots(*slot_level) == 0 {
            rejections.push(Rejection::new(
                RejectionCode::NoSpellSlot,
                format!("{actor_id} has no level {slot_level} slots for their class"),
            ));
        }
    } else if actor.is_some() {
        rejections.push(Rejection::new(
            RejectionCode::IneligibleCaster,
            format!("{actor_id} cannot cast spells"),
        ));
    }

    if spell.num_targets != ALL_LIVING_OPPONENTS {
        let expects_self = spell.self_target && target_ids.is_empty();
        if !expects_self && target_ids.len() != 1 {
            rejections.push(Rejection::new(
                RejectionCode::InvalidTarget,
                format!("{spell_id} requires exactly one target"),
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
    let Intent::CastSpell { actor_id, spell_id, slot_level, target_ids } = intent else {
        unreachable!("spell::execute called with non-spell intent")
    };
    let spell = get_spell(spell_id)
        .ok_or_else(|| EngineFault::Internal(format!("spell {spell_id} vanished from catalog mid-execution")))?;

    let resolved_targets = resolve_targets(spell, actor_id, target_ids, ctx);

    let events = vec![Event::SpellCast {
        caster_id: actor_id.clone(),
        spell_id: spell_id.to_string(),
        spell_name: spell.name.to_string(),
        target_ids: resolved_targets.clone(),
    }];

    let mut effects = vec![Effect::ConsumeSlot { caster_id: actor_id.clone(), level: *slot_level }];

    for target_id in &resolved_targets {
        if let Some(damage_die) = spell.damage_die {
            let amount = dice.roll(damage_die)?.max(1);
            effects.push(Effect::Damage {
                source_id: actor_id.clone(),
                target_id: target_id.clone(),
                amount,
            });
        }
        if let Some(condition_id) = spell.condition_id {
            effects.push(Effect::ApplyCondition {
                source_id: actor_id.clone(),
                target_id: target_id.clone(),
                condition_id: condition_id.to_string(),
                duration: spell.condition_duration,
            });
        }
    }

    Ok(ActionResult { events, effects })
}

fn resolve_targets(spell: &SpellDefinition, actor_id: &str, target_ids: &[String], ctx: &ActionContext) -> Vec<String> {
    if spell.num_targets == ALL_LIVING_OPPONENTS {
        let Some(actor_side) = ctx.actor(actor_id).map(|a| a.side()) else { return Vec::new() };
        return ctx
            .combatants
            .values()
            .filter(|c| c.side() != actor_side && c.is_alive())
            .map(|c| c.id().to_string())
            .collect();
    }
    if spell.self_target && target_ids.is_empty() {
        return vec![actor_id.to_string()];
    }
    target_ids.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::{CasterClass, Combatant, SimpleCombatant};
    use crate::dice::FixedDice;
    use crate::ids::Side;
    use std::collections::HashMap;

    fn ctx<'a>(combatants: &'a HashMap<String, Box<dyn Combatant>>, current: &'a str) -> ActionContext<'a> {
        ActionContext { combatants, current_combatant_id: current }
    }

    #[test]
    fn unknown_spell_is_rejected() {
        let wizard = SimpleCombatant::new("pc:Wizard", Side::Party, 4, 11, 19).with_caster(CasterClass::MagicUser, &[(1, 1)]);
        let mut combatants: HashMap<String, Box<dyn Combatant>> = HashMap::new();
        combatants.insert(wizard.id.clone(), Box::new(wizard));
        let intent = Intent::CastSpell {
            actor_id: "pc:Wizard".to_string(),
            spell_id: "fireball".to_string(),
            slot_level: 3,
            target_ids: vec!["monster:Goblin:0".to_string()],
        };
        let context = ctx(&combatants, "pc:Wizard");
        let rejections = validate(&intent, &context);
        assert!(rejections.iter().any(|r| r.code == RejectionCode::UnknownSpell));
    }

    #[test]
    fn ineligible_class_is_rejected() {
        let cleric = SimpleCombatant::new("pc:Cleric", Side::Party, 8, 14, 17).with_caster(CasterClass::Cleric, &[(1, 1)]);
        let mut combatants: HashMap<String, Box<dyn Combatant>> = HashMap::new();
        combatants.insert(cleric.id.clone(), Box::new(cleric));
        let intent = Intent::CastSpell {
            actor_id: "pc:Cleric".to_string(),
            spell_id: "magic_missile".to_string(),
            slot_level: 1,
            target_ids: vec!["monster:Goblin:0".to_string()],
        };
        let context = ctx(&combatants, "pc:Cleric");
        let rejections = validate(&intent, &context);
        assert!(rejections.iter().any(|r| r.code == RejectionCode::IneligibleCaster));
    }

    #[test]
    fn self_target_spell_with_empty_targets_resolves_to_caster() {
        let wizard = SimpleCombatant::new("pc:Wizard", Side::Party, 4, 11, 19).with_caster(CasterClass::MagicUser, &[(1, 1)]);
        let mut combatants: HashMap<String, Box<dyn Combatant>> = HashMap::new();
        combatants.insert(wizard.id.clone(), Box::new(wizard));
        let intent = Intent::CastSpell {
            actor_id: "pc:Wizard".to_string(),
            spell_id: "shield".to_string(),
            slot_level: 1,
            target_ids: Vec::new(),
        };
        let context = ctx(&combatants, "pc:Wizard");
        assert!(validate(&intent, &context).is_empty());

        let mut dice = FixedDice::new(Vec::<i64>::new());
        let result = execute(&intent, &context, &mut dice).unwrap();
        assert!(matches!(
            &result.events[0],
            Event::SpellCast { target_ids, .. } if target_ids == &["pc:Wizard".to_string()]
        ));
    }

    #[test]
    fn sleep_targets_all_living_opponents_without_explicit_list() {
        let wizard = SimpleCombatant::new("pc:Wizard", Side::Party, 4, 11, 19).with_caster(CasterClass::MagicUser, &[(1, 1)]);
        let mut combatants: HashMap<String, Box<dyn Combatant>> = HashMap::new();
        combatants.insert(wizard.id.clone(), Box::new(wizard));
        let intent = Intent::CastSpell {
            actor_id: "pc:Wizard".to_string(),
            spell_id: "sleep".to_string(),
            slot_level: 1,
            target_ids: Vec::new(),
        };
        let context = ctx(&combatants, "pc:Wizard");
        assert!(validate(&intent, &context).is_empty());
    }
}
