//! The narrow, read-mostly interface the engine uses to consult and mutate
//! combatants. The core never constructs characters or monsters — it only
//! reads and mutates through these traits, which external collaborators
//! (character sheets, monster instances) implement.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A single weapon the combatant has equipped.
#[derive(Debug, Clone, PartialEq)]
pub struct WeaponDescriptor {
    /// Damage die for a melee swing, e.g. `"1d8"`.
    pub melee_damage_die: String,
    /// Damage die for a ranged attack, if the weapon has a ranged profile.
    pub ranged_damage_die: Option<String>,
}

/// The closed set of spellcasting classes this core supports. A full class
/// system (levels, multiclassing, ability-score tables) is out of scope —
/// this exists only to let the spell catalog gate `usable_by` and let
/// casters look up their slot table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CasterClass {
    MagicUser,
    Cleric,
}

/// Narrow, stable capability interface every combatant (player character or
/// monster) implements. The engine reads through this trait; it never
/// touches a concrete character type directly.
pub trait Combatant: std::fmt::Debug {
    fn id(&self) -> &str;
    fn display_name(&self) -> &str;
    fn side(&self) -> crate::ids::Side;
    fn is_alive(&self) -> bool;
    fn current_hp(&self) -> i64;
    fn max_hp(&self) -> i64;
    fn armor_class(&self) -> i32;
    /// THAC0 ("to hit armor class 0"): lower is better, OSR convention.
    fn thac0(&self) -> i32;
    fn initiative_modifier(&self) -> i32;
    fn strength_modifier(&self) -> i32;
    fn dexterity_modifier(&self) -> i32;
    fn weapon(&self) -> Option<WeaponDescriptor>;
    fn conditions(&self) -> HashSet<String>;
    /// Monsters with multiple attacks per round report it here; PCs return 1.
    fn attacks_per_round(&self) -> u32 {
        1
    }

    /// Apply damage, floored at 0. Implementors decide their own HP storage.
    fn apply_damage(&mut self, amount: i64);
    fn add_condition(&mut self, condition_id: &str);

    /// Optional downcast to the spellcasting capability. Non-casters keep
    /// the default `None` rather than satisfying the trait with stub data —
    /// this is the Rust-native stand-in for a runtime `hasattr` check.
    fn as_spellcaster(&self) -> Option<&dyn SpellcasterCapable> {
        None
    }
}

/// Capability interface satisfied only by combatants that can cast spells.
/// This is the Rust-native replacement for runtime attribute introspection:
/// a monster or fighter simply doesn't implement this trait, rather than
/// failing a `hasattr`-style check at call time.
pub trait SpellcasterCapable: Combatant {
    fn caster_class(&self) -> CasterClass;
    /// Slots available at the caster's current level for the given spell level.
    /// Zero means the caster's class/level table defines no slot there.
    fn max_slots(&self, level: u8) -> u8;
}

/// A minimal, concrete combatant used by tests and the demo binary. Real
/// consumers (a character sheet, a monster instance) provide their own type
/// implementing [`Combatant`]/[`SpellcasterCapable`] instead of this one.
#[derive(Debug, Clone)]
pub struct SimpleCombatant {
    pub id: String,
    pub display_name: String,
    pub side: crate::ids::Side,
    pub hp: i64,
    pub max_hp: i64,
    pub armor_class: i32,
    pub thac0: i32,
    pub initiative_modifier: i32,
    pub strength_modifier: i32,
    pub dexterity_modifier: i32,
    pub weapon: Option<WeaponDescriptor>,
    pub conditions: HashSet<String>,
    pub attacks_per_round: u32,
    pub caster_class: Option<CasterClass>,
    pub slots_by_level: std::collections::BTreeMap<u8, u8>,
}

impl SimpleCombatant {
    pub fn new(id: impl Into<String>, side: crate::ids::Side, hp: i64, armor_class: i32, thac0: i32) -> Self {
        Self {
            id: id.into(),
            display_name: String::new(),
            side,
            hp,
            max_hp: hp,
            armor_class,
            thac0,
            initiative_modifier: 0,
            strength_modifier: 0,
            dexterity_modifier: 0,
            weapon: None,
            conditions: HashSet::new(),
            attacks_per_round: 1,
            caster_class: None,
            slots_by_level: std::collections::BTreeMap::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    pub fn with_weapon(mut self, melee_die: impl Into<String>, ranged_die: Option<String>) -> Self {
        self.weapon = Some(WeaponDescriptor {
            melee_damage_die: melee_die.into(),
            ranged_damage_die: ranged_die,
        });
        self
    }

    pub fn with_caster(mut self, class: CasterClass, slots_by_level: &[(u8, u8)]) -> Self {
        self.caster_class = Some(class);
        self.slots_by_level = slots_by_level.iter().copied().collect();
        self
    }

    pub fn with_attacks_per_round(mut self, n: u32) -> Self {
        self.attacks_per_round = n;
        self
    }
}

impl Combatant for SimpleCombatant {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        if self.display_name.is_empty() {
            &self.id
        } else {
            &self.display_name
        }
    }

    fn side(&self) -> crate::ids::Side {
        self.side
    }

    fn is_alive(&self) -> bool {
        self.hp > 0
    }

    fn current_hp(&self) -> i64 {
        self.hp
    }

    fn max_hp(&self) -> i64 {
        self.max_hp
    }

    fn armor_class(&self) -> i32 {
        self.armor_class
    }

    fn thac0(&self) -> i32 {
        self.thac0
    }

    fn initiative_modifier(&self) -> i32 {
        self.initiative_modifier
    }

    fn strength_modifier(&self) -> i32 {
        self.strength_modifier
    }

    fn dexterity_modifier(&self) -> i32 {
        self.dexterity_modifier
    }

    fn weapon(&self) -> Option<WeaponDescriptor> {
        self.weapon.clone()
    }

    fn conditions(&self) -> HashSet<String> {
        self.conditions.clone()
    }

    fn attacks_per_round(&self) -> u32 {
        self.attacks_per_round
    }

    fn apply_damage(&mut self, amount: i64) {
        self.hp = (self.hp - amount).max(0);
    }

    fn add_condition(&mut self, condition_id: &str) {
        self.conditions.insert(condition_id.to_string());
    }

    fn as_spellcaster(&self) -> Option<&dyn SpellcasterCapable> {
        self.caster_class.map(|_| self as &dyn SpellcasterCapable)
    }
}

impl SpellcasterCapable for SimpleCombatant {
    fn caster_class(&self) -> CasterClass {
        self.caster_class.expect("caster_class queried on a non-caster SimpleCombatant")
    }

    fn max_slots(&self, level: u8) -> u8 {
        self.slots_by_level.get(&level).copied().unwrap_or(0)
    }
}
