//! Error types for the encounter engine.
//!
//! Three distinct failure classes are kept apart on purpose: a rule
//! rejection is expected play (handled entirely through events, never
//! surfaced here), an [`EngineFault`] is an unexpected internal error that
//! ends the encounter, and a [`UsageFault`] is a caller contract violation.
//! Conflating these would force every consumer to string-match to tell them
//! apart.

use std::fmt;

/// An unexpected error raised from inside a single state transition.
///
/// Caught at the transition boundary by the engine, turned into an
/// `EncounterFaulted` event, and never allowed to unwind out of `step`.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineFault {
    /// The deterministic dice service ran out of recorded rolls.
    DiceExhausted(String),
    /// The engine referenced a combatant ID the collaborator set didn't contain.
    MissingCombatant(String),
    /// `step_until_decision` ran `max_steps` transitions without reaching a decision point.
    StepBudgetExhausted { max_steps: u32 },
    /// Any other invariant violation not worth a dedicated variant.
    Internal(String),
}

impl fmt::Display for EngineFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineFault::DiceExhausted(msg) => write!(f, "dice sequence exhausted: {msg}"),
            EngineFault::MissingCombatant(id) => write!(f, "unknown combatant id: {id}"),
            EngineFault::StepBudgetExhausted { max_steps } => {
                write!(f, "step_until_decision exceeded max_steps={max_steps}")
            }
            EngineFault::Internal(msg) => write!(f, "internal engine error: {msg}"),
        }
    }
}

impl EngineFault {
    /// A stable, lowercase discriminator for `EncounterFaulted.error_kind`.
    pub fn kind_name(&self) -> &'static str {
        match self {
            EngineFault::DiceExhausted(_) => "dice_exhausted",
            EngineFault::MissingCombatant(_) => "missing_combatant",
            EngineFault::StepBudgetExhausted { .. } => "step_budget_exhausted",
            EngineFault::Internal(_) => "internal",
        }
    }
}

impl std::error::Error for EngineFault {}

/// A caller contract violation: the caller, not the game rules, is at fault.
#[derive(Debug, Clone, PartialEq)]
pub enum UsageFault {
    /// An intent was supplied while the encounter was not in `AwaitIntent`.
    WrongState { expected: &'static str, actual: &'static str },
    /// The intent's actor does not match the combatant the engine is waiting on.
    CombatantMismatch { expected: String, actual: String },
    /// `queue_forced_intent` (or `step`) was called after the encounter ended.
    EncounterEnded,
}

impl fmt::Display for UsageFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UsageFault::WrongState { expected, actual } => {
                write!(f, "expected state {expected}, engine is in {actual}")
            }
            UsageFault::CombatantMismatch { expected, actual } => write!(
                f,
                "intent actor {actual} does not match pending combatant {expected}"
            ),
            UsageFault::EncounterEnded => write!(f, "encounter has already ended"),
        }
    }
}

impl std::error::Error for UsageFault {}

/// The error surfaced to callers of the engine's public facade.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// The caller violated the step/intent protocol.
    Usage(UsageFault),
    /// The encounter faulted; this mirrors the `EncounterFaulted` event
    /// already emitted into the step's event batch.
    Faulted(EngineFault),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Usage(u) => write!(f, "usage error: {u}"),
            EngineError::Faulted(e) => write!(f, "engine fault: {e}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<UsageFault> for EngineError {
    fn from(u: UsageFault) -> Self {
        EngineError::Usage(u)
    }
}

impl From<EngineFault> for EngineError {
    fn from(e: EngineFault) -> Self {
        EngineError::Faulted(e)
    }
}
