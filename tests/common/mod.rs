//! Shared fixtures for the integration test suite.

use osr_encounter_engine::{monster_id, pc_id, CasterClass, Combatant, EngineConfig, Engine, FixedDice, Side, SimpleCombatant};

pub fn hero() -> Box<dyn Combatant> {
    Box::new(SimpleCombatant::new(pc_id("Hero"), Side::Party, 10, 15, 16).with_name("Hero").with_weapon("1d8", None))
}

pub fn wizard(slots_at_level_1: u8) -> Box<dyn Combatant> {
    Box::new(
        SimpleCombatant::new(pc_id("Wizard"), Side::Party, 4, 11, 19)
            .with_name("Wizard")
            .with_caster(CasterClass::MagicUser, &[(1, slots_at_level_1)]),
    )
}

pub fn cleric(slots_at_level_1: u8) -> Box<dyn Combatant> {
    Box::new(
        SimpleCombatant::new(pc_id("Cleric"), Side::Party, 8, 14, 17)
            .with_name("Cleric")
            .with_caster(CasterClass::Cleric, &[(1, slots_at_level_1)]),
    )
}

pub fn goblin(index: usize, hp: i64) -> Box<dyn Combatant> {
    Box::new(SimpleCombatant::new(monster_id("Goblin", index), Side::Opposition, hp, 6, 19).with_name("Goblin"))
}

pub fn ogre(attacks_per_round: u32) -> Box<dyn Combatant> {
    Box::new(
        SimpleCombatant::new(monster_id("Ogre", 0), Side::Opposition, 20, 14, 8)
            .with_name("Ogre")
            .with_attacks_per_round(attacks_per_round),
    )
}

/// An engine with surprise rolls disabled, so fixed dice sequences only
/// need to account for initiative and action resolution.
pub fn engine_with(
    party: Vec<Box<dyn Combatant>>,
    opposition: Vec<Box<dyn Combatant>>,
    rolls: impl IntoIterator<Item = i64>,
) -> Engine {
    let mut config = EngineConfig::default();
    config.roll_surprise = false;
    Engine::new("test-encounter", party, opposition, Box::new(FixedDice::new(rolls)), None, config)
}
