//! A state-driven OSR-style tactical combat engine core.
//!
//! [`engine::Engine`] is the entry point: construct it with a party, an
//! opposition, a dice service, and an optional tactical provider, then drive
//! it forward one transition at a time with `step`/`step_until_decision`.
//! Everything else in this crate exists to support that loop: the combatant
//! capability traits collaborators implement, the closed event/intent
//! vocabularies, the action/effect pipeline, and the read-only view types
//! external consumers (UIs, tactical providers) see instead of engine
//! internals.

pub mod actions;
pub mod combatant;
pub mod config;
pub mod dice;
pub mod effect;
pub mod engine;
pub mod error;
pub mod events;
pub mod ids;
pub mod intent;
pub mod serialize;
pub mod spells;
pub mod tactical;
pub mod view;

pub use combatant::{CasterClass, Combatant, SimpleCombatant, SpellcasterCapable, WeaponDescriptor};
pub use config::EngineConfig;
pub use dice::{DiceService, FixedDice, RandomDice};
pub use engine::{Engine, EncounterState, StepResult};
pub use error::{EngineError, EngineFault, UsageFault};
pub use events::{Event, Outcome, Rejection, RejectionCode};
pub use ids::{monster_id, pc_id, Side};
pub use intent::{ActionChoice, Intent};
pub use serialize::{format_batch, format_event, serialize_event};
pub use spells::{get_spell, SpellDefinition};
pub use tactical::{FocusLowestHpProvider, RandomMeleeProvider, TacticalProvider};
pub use view::{CombatView, CombatantView, SideThenIdTiebreak, TiebreakPolicy};
