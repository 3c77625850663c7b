//! The six literal end-to-end scenarios from this engine's test plan.

mod common;

use common::*;
use osr_encounter_engine::{monster_id, pc_id, EncounterState, Event, FocusLowestHpProvider, Intent, Outcome, RejectionCode};

fn events_of(results: &[osr_encounter_engine::StepResult]) -> Vec<&Event> {
    results.iter().flat_map(|r| r.events.iter()).collect()
}

#[test]
fn one_pc_kills_one_hp_goblin_with_a_critical() {
    let mut engine = engine_with(vec![hero()], vec![goblin(0, 1)], [5, 5, 20, 6]);

    let decision = engine.step_until_decision(None, 64).unwrap();
    assert!(decision.last().unwrap().needs_intent);
    assert_eq!(decision.last().unwrap().pending_combatant_id.as_deref(), Some(pc_id("Hero")).as_deref());

    let intent = Intent::MeleeAttack { actor_id: pc_id("Hero"), target_id: monster_id("Goblin", 0) };
    let results = engine.step_until_decision(Some(intent), 64).unwrap();
    let events = events_of(&results);

    assert!(events.iter().any(|e| matches!(e, Event::AttackRolled { hit: true, critical: true, .. })));
    assert!(events.iter().any(|e| matches!(e, Event::DamageApplied { target_hp_after: 0, .. })));
    assert!(events.iter().any(|e| matches!(e, Event::EntityDied { entity_id } if entity_id == &monster_id("Goblin", 0))));
    assert!(events.iter().any(|e| matches!(e, Event::VictoryDetermined { outcome: Outcome::PartyVictory })));
    assert_eq!(engine.outcome(), Some(Outcome::PartyVictory));
}

#[test]
fn magic_user_casts_magic_missile_twice_second_cast_finds_no_slot() {
    let mut engine = engine_with(
        vec![wizard(1)],
        vec![goblin(0, 20)],
        [
            5, 5, // round 1 group initiative, party first
            2,    // cast #1 damage (1d4+1 -> 3)
            0,    // goblin's target choice (only the wizard is available)
            1,    // goblin's attack roll: natural 1, auto-miss
            5, 5, // round 2 group initiative
            2,    // cast #2 damage roll, rolled but discarded when the slot check fails
        ],
    );

    engine.step_until_decision(None, 64).unwrap();
    let cast = Intent::CastSpell {
        actor_id: pc_id("Wizard"),
        spell_id: "magic_missile".to_string(),
        slot_level: 1,
        target_ids: vec![monster_id("Goblin", 0)],
    };
    let first = engine.step_until_decision(Some(cast.clone()), 64).unwrap();
    let first_events = events_of(&first);
    assert!(first_events.iter().any(|e| matches!(e, Event::SpellCast { .. })));
    assert!(first_events.iter().any(|e| matches!(e, Event::SpellSlotConsumed { level: 1, remaining: 0 })));
    assert!(first_events.iter().any(|e| matches!(e, Event::DamageApplied { .. })));
    // Second decision point should land back on the wizard, in round 2.
    assert_eq!(first.last().unwrap().pending_combatant_id.as_deref(), Some(pc_id("Wizard")).as_deref());

    let second = engine.step_until_decision(Some(cast), 64).unwrap();
    let second_events = events_of(&second);
    assert!(second_events.iter().any(|e| matches!(e, Event::SpellCast { .. })));
    assert!(second_events
        .iter()
        .any(|e| matches!(e, Event::ActionRejected { reasons, .. } if reasons.iter().any(|r| r.code == RejectionCode::NoSpellSlot))));
    assert!(!second_events.iter().any(|e| matches!(e, Event::DamageApplied { .. })));
}

#[test]
fn cleric_casting_hold_person_at_the_wrong_slot_level_is_rejected() {
    let mut engine = engine_with(vec![cleric(1)], vec![goblin(0, 7)], [5, 5]);
    engine.step_until_decision(None, 64).unwrap();

    let intent = Intent::CastSpell {
        actor_id: pc_id("Cleric"),
        spell_id: "hold_person".to_string(),
        slot_level: 1,
        target_ids: vec![monster_id("Goblin", 0)],
    };
    let results = engine.step_until_decision(Some(intent), 64).unwrap();
    let events = events_of(&results);

    assert!(events
        .iter()
        .any(|e| matches!(e, Event::ActionRejected { reasons, .. } if reasons.iter().any(|r| r.code == RejectionCode::SlotLevelMismatch))));
    assert!(!events.iter().any(|e| matches!(e, Event::SpellCast { .. })));
    assert!(!events.iter().any(|e| matches!(e, Event::DamageApplied { .. } | Event::ConditionApplied { .. })));
}

#[test]
fn magic_user_attempting_hold_person_is_an_ineligible_caster() {
    let mut engine = engine_with(vec![wizard(1)], vec![goblin(0, 7)], [5, 5]);
    engine.step_until_decision(None, 64).unwrap();

    let intent = Intent::CastSpell {
        actor_id: pc_id("Wizard"),
        spell_id: "hold_person".to_string(),
        slot_level: 2,
        target_ids: vec![monster_id("Goblin", 0)],
    };
    let results = engine.step_until_decision(Some(intent), 64).unwrap();
    let events = events_of(&results);

    assert!(events
        .iter()
        .any(|e| matches!(e, Event::ActionRejected { reasons, .. } if reasons.iter().any(|r| r.code == RejectionCode::IneligibleCaster))));
}

#[test]
fn forced_flee_falls_back_to_a_fresh_decision_for_the_same_pc() {
    let mut engine = engine_with(vec![hero()], vec![goblin(0, 7)], [5, 5]);
    engine.queue_forced_intent(pc_id("Hero"), Intent::Flee { actor_id: pc_id("Hero") }, None).unwrap();

    let results = engine.step_until_decision(None, 64).unwrap();
    let events = events_of(&results);

    assert!(events.iter().any(|e| matches!(e, Event::ForcedIntentApplied { id, .. } if id == &pc_id("Hero"))));
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::ActionRejected { reasons, .. } if reasons.iter().any(|r| r.code == RejectionCode::FleeNotImplemented))));
    let last = results.last().unwrap();
    assert!(last.needs_intent);
    assert_eq!(last.pending_combatant_id.as_deref(), Some(pc_id("Hero")).as_deref());
    assert!(matches!(events.last().unwrap(), Event::NeedAction { .. }));
}

#[test]
fn full_auto_resolve_never_emits_need_action_and_still_reaches_victory() {
    let mut config = osr_encounter_engine::EngineConfig::default();
    config.roll_surprise = false;
    config.auto_resolve = true;

    let mut engine = osr_encounter_engine::Engine::new(
        "auto-resolve-encounter",
        vec![hero()],
        vec![goblin(0, 1)],
        Box::new(osr_encounter_engine::FixedDice::new([
            5, 5, // round 1 group initiative, party first
            15,   // hero's to-hit roll (FocusLowestHpProvider targets without consulting dice)
            4,    // hero's weapon damage roll
        ])),
        Some(Box::new(FocusLowestHpProvider)),
        config,
    );

    let results = engine.step_until_decision(None, 64).unwrap();
    let events = events_of(&results);

    assert!(!events.iter().any(|e| matches!(e, Event::NeedAction { .. })));
    assert!(events.iter().any(|e| matches!(e, Event::VictoryDetermined { outcome: Outcome::PartyVictory })));
    assert_eq!(engine.outcome(), Some(Outcome::PartyVictory));
    assert_eq!(results.last().unwrap().state, EncounterState::Ended);
}
