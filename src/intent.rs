//! Decisions a combatant can make, and how they're presented to a decider.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A fully-specified proposed action from a combatant.
///
/// `CastSpell::target_ids` is a genuine sequence, never a nullable scalar:
/// an empty list means self-targeting, and "no target specified" is
/// unrepresentable rather than ambiguous with self-cast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Intent {
    MeleeAttack { actor_id: String, target_id: String },
    RangedAttack { actor_id: String, target_id: String },
    CastSpell { actor_id: String, spell_id: String, slot_level: u8, target_ids: Vec<String> },
    Flee { actor_id: String },
}

impl Intent {
    pub fn actor_id(&self) -> &str {
        match self {
            Intent::MeleeAttack { actor_id, .. }
            | Intent::RangedAttack { actor_id, .. }
            | Intent::CastSpell { actor_id, .. }
            | Intent::Flee { actor_id } => actor_id,
        }
    }
}

/// A presentation-neutral descriptor offered to a decider for one possible
/// intent. Rendering a display string is the formatter's job, not this
/// type's — `ui_key`/`ui_args` carry only structured data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionChoice {
    pub ui_key: String,
    pub ui_args: BTreeMap<String, String>,
    pub intent: Intent,
}

impl ActionChoice {
    pub fn new(ui_key: impl Into<String>, ui_args: BTreeMap<String, String>, intent: Intent) -> Self {
        Self { ui_key: ui_key.into(), ui_args, intent }
    }

    /// A convenience display string computed from `ui_key`/`ui_args`; never stored.
    pub fn label(&self) -> String {
        if self.ui_args.is_empty() {
            return self.ui_key.clone();
        }
        let args = self
            .ui_args
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{} ({})", self.ui_key, args)
    }
}
