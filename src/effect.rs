//! Tagged mutation descriptors and their dispatch.
//!
//! Actions compute a pure `(events, effects)` pair; only [`apply_effects`]
//! touches combatant state. Effects are applied in emission order; if one
//! fails, processing stops for that action — effects already applied remain
//! applied (mutation is monotonic).

use crate::combatant::Combatant;
use crate::events::{Event, Rejection, RejectionCode};
use std::collections::HashMap;

/// A single tagged mutation to apply to the encounter's state.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Damage { source_id: String, target_id: String, amount: i64 },
    ConsumeSlot { caster_id: String, level: u8 },
    ApplyCondition { source_id: String, target_id: String, condition_id: String, duration: Option<u32> },
}

/// Per-combatant remaining spell slots, keyed by level. Populated lazily on
/// first access so non-casters never need an entry.
pub type SlotTable = HashMap<String, HashMap<u8, u8>>;

/// Apply a batch of effects in order, stopping at the first failure.
///
/// Returns the mutation events produced by effects that succeeded, and —
/// if an effect failed — the rejection that should accompany an
/// `ActionRejected` event for the remainder of the action.
pub fn apply_effects(
    effects: &[Effect],
    combatants: &mut HashMap<String, Box<dyn Combatant>>,
    slots: &mut SlotTable,
) -> (Vec<Event>, Option<Rejection>) {
    let mut events = Vec::new();

    for effect in effects {
        log::debug!("applying effect: {effect:?}");
        match effect {
            Effect::Damage { source_id, target_id, amount } => {
                let Some(target) = combatants.get_mut(target_id) else {
                    return (
                        events,
                        Some(Rejection::new(
                            RejectionCode::InvalidTarget,
                            format!("unknown damage target {target_id}"),
                        )),
                    );
                };
                target.apply_damage(*amount);
                events.push(Event::DamageApplied {
                    source_id: source_id.clone(),
                    target_id: target_id.clone(),
                    amount: *amount,
                    target_hp_after: target.current_hp(),
                });
            }
            Effect::ConsumeSlot { caster_id, level } => {
                let max_slots = combatants
                    .get(caster_id)
                    .and_then(|c| c.as_spellcaster())
                    .map(|c| c.max_slots(*level))
                    .unwrap_or(0);
                let remaining = slots
                    .entry(caster_id.clone())
                    .or_default()
                    .entry(*level)
                    .or_insert(max_slots);
                if *remaining == 0 {
                    return (
                        events,
                        Some(Rejection::new(
                            RejectionCode::NoSpellSlot,
                            format!("{caster_id} has no remaining level {level} slots"),
                        )),
                    );
                }
                *remaining -= 1;
                events.push(Event::SpellSlotConsumed {
                    caster_id: caster_id.clone(),
                    level: *level,
                    remaining: *remaining,
                });
            }
            Effect::ApplyCondition { source_id, target_id, condition_id, duration } => {
                let Some(target) = combatants.get_mut(target_id) else {
                    return (
                        events,
                        Some(Rejection::new(
                            RejectionCode::InvalidTarget,
                            format!("unknown condition target {target_id}"),
                        )),
                    );
                };
                target.add_condition(condition_id);
                events.push(Event::ConditionApplied {
                    source_id: source_id.clone(),
                    target_id: target_id.clone(),
                    condition_id: condition_id.clone(),
                    duration: *duration,
                });
            }
        }
    }

    (events, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::{CasterClass, SimpleCombatant};
    use crate::ids::Side;

    fn registry(combatants: Vec<SimpleCombatant>) -> HashMap<String, Box<dyn Combatant>> {
        combatants.into_iter().map(|c| (c.id.clone(), Box::new(c) as Box<dyn Combatant>)).collect()
    }

    #[test]
    fn damage_effect_updates_hp_and_emits_event() {
        let mut combatants = registry(vec![SimpleCombatant::new("monster:Goblin:0", Side::Opposition, 7, 7, 19)]);
        let mut slots = SlotTable::new();
        let effects = vec![Effect::Damage {
            source_id: "pc:Hero".to_string(),
            target_id: "monster:Goblin:0".to_string(),
            amount: 7,
        }];
        let (events, rejection) = apply_effects(&effects, &mut combatants, &mut slots);
        assert!(rejection.is_none());
        assert_eq!(combatants["monster:Goblin:0"].current_hp(), 0);
        assert!(matches!(events[0], Event::DamageApplied { target_hp_after: 0, .. }));
    }

    #[test]
    fn consume_slot_stops_remaining_effects_when_exhausted() {
        let mut combatants = registry(vec![SimpleCombatant::new("pc:Wizard", Side::Party, 4, 11, 19)
            .with_caster(CasterClass::MagicUser, &[(1, 1)])]);
        let mut slots = SlotTable::new();

        let first = vec![Effect::ConsumeSlot { caster_id: "pc:Wizard".to_string(), level: 1 }];
        let (events, rejection) = apply_effects(&first, &mut combatants, &mut slots);
        assert!(rejection.is_none());
        assert_eq!(events.len(), 1);

        let second = vec![
            Effect::ConsumeSlot { caster_id: "pc:Wizard".to_string(), level: 1 },
            Effect::Damage { source_id: "pc:Wizard".to_string(), target_id: "pc:Wizard".to_string(), amount: 1 },
        ];
        let (events, rejection) = apply_effects(&second, &mut combatants, &mut slots);
        assert!(events.is_empty(), "no effects after a failed ConsumeSlot should apply");
        assert_eq!(rejection.unwrap().code, RejectionCode::NoSpellSlot);
    }
}
