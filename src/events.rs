//! The closed catalog of events the engine emits.
//!
//! Every variant is immutable once produced; `kind` — the variant name —
//! is derived for free by serializing with an internally-tagged
//! representation (see [`crate::serialize`]), so there is no separate
//! hand-maintained discriminator to drift out of sync with the enum.

use crate::intent::{ActionChoice, Intent};
use serde::{Deserialize, Serialize};

/// How an encounter ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    PartyVictory,
    OppositionVictory,
    Faulted,
}

/// A single structured reason an action was refused. Consumers branch on
/// `code`, never on the prose in `reason`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub code: RejectionCode,
    pub reason: String,
}

impl Rejection {
    pub fn new(code: RejectionCode, reason: impl Into<String>) -> Self {
        Self { code, reason: reason.into() }
    }
}

/// Enumerated rejection reasons. Validators collect every applicable code,
/// never just the first failure, so a consumer can present them together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionCode {
    ActorDead,
    ActorNotCurrent,
    TargetDead,
    TargetNotOpponent,
    NoRangedWeapon,
    UnknownSpell,
    IneligibleCaster,
    SlotLevelMismatch,
    NoSpellSlot,
    MonsterActionNotSupported,
    InvalidTarget,
    /// Flee has no resolution in this core; every legal attempt still
    /// produces this rejection so the decision loop falls back to a normal
    /// re-decision rather than silently doing nothing.
    FleeNotImplemented,
}

/// An immutable, tagged event. `kind` is the serialized tag; see
/// [`crate::serialize::serialize_event`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Event {
    // --- Lifecycle / control ---
    EncounterStarted {
        encounter_id: String,
    },
    SurpriseRolled {
        party_surprised: bool,
        opposition_surprised: bool,
        party_roll: i64,
        opposition_roll: i64,
    },
    RoundStarted {
        round_no: u32,
    },
    InitiativeRolled {
        order: Vec<(String, i64)>,
    },
    TurnQueueBuilt {
        queue: Vec<String>,
    },
    TurnStarted {
        id: String,
    },
    TurnSkipped {
        id: String,
        reason: String,
    },
    NeedAction {
        id: String,
        available: Vec<ActionChoice>,
    },

    // --- Resolution (ExecuteAction only) ---
    AttackRolled {
        attacker_id: String,
        defender_id: String,
        roll: i64,
        total: i64,
        needed: i64,
        hit: bool,
        critical: bool,
    },
    SpellCast {
        caster_id: String,
        spell_id: String,
        spell_name: String,
        target_ids: Vec<String>,
    },

    // --- Mutation (ApplyEffects only) ---
    DamageApplied {
        source_id: String,
        target_id: String,
        amount: i64,
        target_hp_after: i64,
    },
    SpellSlotConsumed {
        caster_id: String,
        level: u8,
        remaining: u8,
    },
    ConditionApplied {
        source_id: String,
        target_id: String,
        condition_id: String,
        duration: Option<u32>,
    },

    // --- Death / morale / victory ---
    EntityDied {
        entity_id: String,
    },
    MoraleCheckRolled {
        id: String,
        roll: i64,
        threshold: i64,
        failed: bool,
    },
    ForcedIntentQueued {
        id: String,
        kind: Intent,
    },
    ForcedIntentApplied {
        id: String,
        kind: Intent,
    },
    VictoryDetermined {
        outcome: Outcome,
    },

    // --- Errors ---
    ActionRejected {
        id: String,
        reasons: Vec<Rejection>,
    },
    EncounterFaulted {
        state: String,
        actor_id: Option<String>,
        error_kind: String,
        message: String,
    },
}

impl Event {
    /// The stable discriminator tag, matching the variant name used in
    /// serialized output. Cheaper than round-tripping through serde when a
    /// caller only needs to branch on kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::EncounterStarted { .. } => "EncounterStarted",
            Event::SurpriseRolled { .. } => "SurpriseRolled",
            Event::RoundStarted { .. } => "RoundStarted",
            Event::InitiativeRolled { .. } => "InitiativeRolled",
            Event::TurnQueueBuilt { .. } => "TurnQueueBuilt",
            Event::TurnStarted { .. } => "TurnStarted",
            Event::TurnSkipped { .. } => "TurnSkipped",
            Event::NeedAction { .. } => "NeedAction",
            Event::AttackRolled { .. } => "AttackRolled",
            Event::SpellCast { .. } => "SpellCast",
            Event::DamageApplied { .. } => "DamageApplied",
            Event::SpellSlotConsumed { .. } => "SpellSlotConsumed",
            Event::ConditionApplied { .. } => "ConditionApplied",
            Event::EntityDied { .. } => "EntityDied",
            Event::MoraleCheckRolled { .. } => "MoraleCheckRolled",
            Event::ForcedIntentQueued { .. } => "ForcedIntentQueued",
            Event::ForcedIntentApplied { .. } => "ForcedIntentApplied",
            Event::VictoryDetermined { .. } => "VictoryDetermined",
            Event::ActionRejected { .. } => "ActionRejected",
            Event::EncounterFaulted { .. } => "EncounterFaulted",
        }
    }
}
