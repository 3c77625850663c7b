//! Static spell catalog.
//!
//! A module-level constant mapping, initialized once and read-only for the
//! life of the program — the idiomatic-Rust stand-in for a dynamically
//! loaded, mutable spell table.

use crate::combatant::CasterClass;
use std::sync::OnceLock;

/// `num_targets == -1` denotes all living opponents; `1` denotes single target.
pub const ALL_LIVING_OPPONENTS: i32 = -1;

#[derive(Debug, Clone, PartialEq)]
pub struct SpellDefinition {
    pub spell_id: &'static str,
    pub name: &'static str,
    pub level: u8,
    pub usable_by: &'static [CasterClass],
    pub damage_die: Option<&'static str>,
    pub num_targets: i32,
    pub auto_hit: bool,
    pub condition_id: Option<&'static str>,
    pub condition_duration: Option<u32>,
    /// Whether an empty `target_ids` is valid for this spell (it targets the caster).
    pub self_target: bool,
}

impl SpellDefinition {
    pub fn usable_by(&self, class: CasterClass) -> bool {
        self.usable_by.contains(&class)
    }
}

fn catalog() -> &'static [SpellDefinition] {
    static CATALOG: OnceLock<Vec<SpellDefinition>> = OnceLock::new();
    CATALOG.get_or_init(|| {
        vec![
            SpellDefinition {
                spell_id: "magic_missile",
                name: "Magic Missile",
                level: 1,
                usable_by: &[CasterClass::MagicUser],
                damage_die: Some("1d4+1"),
                num_targets: 1,
                auto_hit: true,
                condition_id: None,
                condition_duration: None,
                self_target: false,
            },
            SpellDefinition {
                spell_id: "hold_person",
                name: "Hold Person",
                level: 2,
                usable_by: &[CasterClass::Cleric],
                damage_die: None,
                num_targets: 1,
                auto_hit: true,
                condition_id: Some("held"),
                condition_duration: Some(4),
                self_target: false,
            },
            SpellDefinition {
                spell_id: "sleep",
                name: "Sleep",
                level: 1,
                usable_by: &[CasterClass::MagicUser],
                damage_die: None,
                num_targets: ALL_LIVING_OPPONENTS,
                auto_hit: true,
                condition_id: Some("asleep"),
                condition_duration: Some(10),
                self_target: false,
            },
            SpellDefinition {
                spell_id: "shield",
                name: "Shield",
                level: 1,
                usable_by: &[CasterClass::MagicUser],
                damage_die: None,
                num_targets: 1,
                auto_hit: true,
                condition_id: Some("warded"),
                condition_duration: Some(1),
                self_target: true,
            },
        ]
    })
}

/// Look up a spell by ID. Returns `None` if no spell with that ID exists.
pub fn get_spell(spell_id: &str) -> Option<&'static SpellDefinition> {
    catalog().iter().find(|s| s.spell_id == spell_id)
}

/// All spells in the catalog, for choice-building. Read-only.
pub fn all_spells() -> &'static [SpellDefinition] {
    catalog()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_up_known_spell() {
        let spell = get_spell("magic_missile").unwrap();
        assert_eq!(spell.level, 1);
        assert!(spell.usable_by(CasterClass::MagicUser));
        assert!(!spell.usable_by(CasterClass::Cleric));
    }

    #[test]
    fn unknown_spell_is_none() {
        assert!(get_spell("fireball").is_none());
    }
}
