//! Drives one fixed encounter end to end and prints every event as a
//! formatted log line. Relocated from the teacher's `run_sim_from_file.rs`
//! pattern (read input, run, print logs, print results) but with the file
//! argument dropped in favor of a hardcoded scenario, since this core has
//! no persistence layer to read scenarios from.

use osr_encounter_engine::{
    monster_id, pc_id, CasterClass, Combatant, EngineConfig, FixedDice, FocusLowestHpProvider, Intent, Side,
    SimpleCombatant,
};

fn main() {
    env_logger::init();

    let hero: Box<dyn Combatant> = Box::new(
        SimpleCombatant::new(pc_id("Hero"), Side::Party, 12, 15, 16)
            .with_name("Hero")
            .with_weapon("1d8", None),
    );
    let wizard: Box<dyn Combatant> = Box::new(
        SimpleCombatant::new(pc_id("Zara"), Side::Party, 4, 11, 19)
            .with_name("Zara")
            .with_caster(CasterClass::MagicUser, &[(1, 2)]),
    );
    let goblin_a: Box<dyn Combatant> =
        Box::new(SimpleCombatant::new(monster_id("Goblin", 0), Side::Opposition, 7, 6, 19).with_name("Goblin"));
    let goblin_b: Box<dyn Combatant> =
        Box::new(SimpleCombatant::new(monster_id("Goblin", 1), Side::Opposition, 7, 6, 19).with_name("Goblin"));

    let mut config = EngineConfig::default();
    config.roll_surprise = false;

    let dice = FixedDice::new([
        5, 5, // tied group initiative, party acts first
        18, 6, // Hero hits Goblin:0 for 1d8
        14, // Zara's Magic Missile damage roll at Goblin:1
        2, 2, // opposition group initiative for round 2
        11, // Goblin:1's attack roll against Hero (if it survives)
    ]);

    let mut engine = osr_encounter_engine::Engine::new(
        "demo-encounter",
        vec![hero, wizard],
        vec![goblin_a, goblin_b],
        Box::new(dice),
        Some(Box::new(FocusLowestHpProvider)),
        config,
    );

    let mut next_intent = None;
    loop {
        let results = engine
            .step_until_decision(next_intent.take(), config.default_max_steps)
            .expect("demo encounter should not fault under its fixed dice script");

        for result in &results {
            for line in osr_encounter_engine::format_batch(&result.events) {
                println!("{line}");
            }
        }

        let last = results.last().expect("step_until_decision always returns at least one result");
        if !last.needs_intent {
            break;
        }

        let actor_id = last.pending_combatant_id.clone().expect("a decision point always names the actor");
        next_intent = Some(scripted_intent(&actor_id));
    }

    match engine.outcome() {
        Some(outcome) => println!("\nFinal outcome: {outcome:?}"),
        None => println!("\nEncounter ended without a recorded outcome."),
    }
}

/// The fixed script this demo walks through for its two party members.
fn scripted_intent(actor_id: &str) -> Intent {
    if actor_id == pc_id("Zara") {
        Intent::CastSpell {
            actor_id: actor_id.to_string(),
            spell_id: "magic_missile".to_string(),
            slot_level: 1,
            target_ids: vec![monster_id("Goblin", 1)],
        }
    } else {
        Intent::MeleeAttack { actor_id: actor_id.to_string(), target_id: monster_id("Goblin", 0) }
    }
}
