//! Stable event serialization and human-readable formatting.
//!
//! Serialization rides `serde`'s internally-tagged representation — the
//! `kind` field `#[serde(tag = "kind")]` adds is the same discriminator
//! [`crate::events::Event::kind`] returns, so there's nothing to keep in
//! sync by hand. The formatter is a separate, hand-written function in the
//! "short declarative sentence per outcome" register (see
//! `get_combat_text`/`get_initiative_text` in the sibling OSR example this
//! imitates): one arm per variant, no attempt at the serialized schema.

use crate::events::{Event, Outcome};
use serde_json::Value;

/// Serialize one event to its stable, additive-only JSON representation.
/// Enum fields round-trip as their symbolic (snake_case) name; nested
/// events would recurse through the same `serde_json::to_value` call, but
/// no current variant nests another event.
pub fn serialize_event(event: &Event) -> Value {
    serde_json::to_value(event).expect("Event serialization is infallible: no maps with non-string keys")
}

/// Render one event as a single human-readable line for logging. Consumers
/// that need structured data should use [`serialize_event`] instead — this
/// exists only for quick operator-facing logs.
///
/// Suppresses `NeedAction` when the same batch also carries a
/// `ForcedIntentApplied` for that combatant: the menu was built but never
/// interactable, so surfacing it would mislead a reader of the log.
pub fn format_batch(events: &[Event]) -> Vec<String> {
    let forced_ids: std::collections::HashSet<&str> = events
        .iter()
        .filter_map(|e| match e {
            Event::ForcedIntentApplied { id, .. } => Some(id.as_str()),
            _ => None,
        })
        .collect();

    events
        .iter()
        .filter_map(|event| match event {
            Event::NeedAction { id, .. } if forced_ids.contains(id.as_str()) => None,
            other => Some(format_event(other)),
        })
        .collect()
}

/// Render a single event as a human-readable line, independent of batch context.
pub fn format_event(event: &Event) -> String {
    match event {
        Event::EncounterStarted { encounter_id } => format!("Encounter {encounter_id} begins."),
        Event::SurpriseRolled { party_surprised, opposition_surprised, party_roll, opposition_roll } => {
            format!(
                "Surprise: party rolls {party_roll} ({}), opposition rolls {opposition_roll} ({}).",
                if *party_surprised { "surprised" } else { "alert" },
                if *opposition_surprised { "surprised" } else { "alert" },
            )
        }
        Event::RoundStarted { round_no } => format!("-- Round {round_no} --"),
        Event::InitiativeRolled { order } => {
            let parts: Vec<String> = order.iter().map(|(id, roll)| format!("{id}={roll}")).collect();
            format!("Initiative: {}", parts.join(", "))
        }
        Event::TurnQueueBuilt { queue } => format!("Turn order: {}", queue.join(" -> ")),
        Event::TurnStarted { id } => format!("{id}'s turn."),
        Event::TurnSkipped { id, reason } => format!("{id} is skipped ({reason})."),
        Event::NeedAction { id, available } => format!("{id} must choose an action ({} available).", available.len()),
        Event::AttackRolled { attacker_id, defender_id, roll, hit, critical, .. } => {
            if *critical {
                format!("{attacker_id} rolls {roll} against {defender_id}: critical hit!")
            } else if *hit {
                format!("{attacker_id} hits {defender_id} (rolled {roll}).")
            } else {
                format!("{attacker_id} misses {defender_id} (rolled {roll}).")
            }
        }
        Event::SpellCast { caster_id, spell_name, target_ids, .. } => {
            if target_ids.len() == 1 && target_ids[0] == *caster_id {
                format!("{caster_id} casts {spell_name} on themself.")
            } else {
                format!("{caster_id} casts {spell_name} at {}.", target_ids.join(", "))
            }
        }
        Event::DamageApplied { source_id, target_id, amount, target_hp_after } => {
            format!("{source_id} deals {amount} damage to {target_id} ({target_hp_after} hp left).")
        }
        Event::SpellSlotConsumed { caster_id, level, remaining } => {
            format!("{caster_id} spends a level {level} slot ({remaining} remaining).")
        }
        Event::ConditionApplied { source_id, target_id, condition_id, duration } => match duration {
            Some(d) => format!("{source_id} afflicts {target_id} with {condition_id} for {d} rounds."),
            None => format!("{source_id} afflicts {target_id} with {condition_id}."),
        },
        Event::EntityDied { entity_id } => format!("{entity_id} dies."),
        Event::MoraleCheckRolled { id, roll, threshold, failed } => format!(
            "{id} rolls morale: {roll} vs {threshold} ({}).",
            if *failed { "failed" } else { "held" }
        ),
        Event::ForcedIntentQueued { id, .. } => format!("A forced action is queued for {id}."),
        Event::ForcedIntentApplied { id, .. } => format!("{id} is forced into their queued action."),
        Event::VictoryDetermined { outcome } => match outcome {
            Outcome::PartyVictory => "The party is victorious.".to_string(),
            Outcome::OppositionVictory => "The opposition is victorious.".to_string(),
            Outcome::Faulted => "The encounter ended in an engine fault.".to_string(),
        },
        Event::ActionRejected { id, reasons } => {
            let joined: Vec<&str> = reasons.iter().map(|r| r.reason.as_str()).collect();
            format!("{id}'s action is rejected: {}.", joined.join("; "))
        }
        Event::EncounterFaulted { state, message, .. } => format!("Engine fault in state {state}: {message}."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Outcome, Rejection, RejectionCode};

    #[test]
    fn serialize_uses_variant_name_as_kind() {
        let event = Event::RoundStarted { round_no: 3 };
        let value = serialize_event(&event);
        assert_eq!(value["kind"], "RoundStarted");
        assert_eq!(value["round_no"], 3);
    }

    #[test]
    fn serialize_round_trips_through_json() {
        let event = Event::ActionRejected {
            id: "pc:Hero".to_string(),
            reasons: vec![Rejection::new(RejectionCode::NoSpellSlot, "no slots left")],
        };
        let first = serialize_event(&event);
        let deserialized: Event = serde_json::from_value(first.clone()).unwrap();
        let second = serialize_event(&deserialized);
        assert_eq!(first, second);
    }

    #[test]
    fn format_batch_suppresses_need_action_after_forced_intent() {
        use crate::intent::{ActionChoice, Intent};
        let flee = Intent::Flee { actor_id: "pc:Hero".to_string() };
        let events = vec![
            Event::ForcedIntentApplied { id: "pc:Hero".to_string(), kind: flee.clone() },
            Event::NeedAction {
                id: "pc:Hero".to_string(),
                available: vec![ActionChoice::new("flee", Default::default(), flee)],
            },
        ];
        let lines = format_batch(&events);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("forced"));
    }

    #[test]
    fn format_event_renders_victory() {
        let line = format_event(&Event::VictoryDetermined { outcome: Outcome::PartyVictory });
        assert_eq!(line, "The party is victorious.");
    }
}
