//! Engine-wide tunables. Kept intentionally small: this core has very few
//! genuine configuration knobs, since rule content (THAC0 tables, spell
//! balance) is supplied by collaborators, not configured here.

use serde::{Deserialize, Serialize};

/// Configuration consulted by [`crate::engine::Engine`] at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Route every combatant (party included) through the tactical provider,
    /// suppressing `NeedAction` entirely. Used for batch simulation.
    pub auto_resolve: bool,
    /// Ceiling passed to `step_until_decision` when the caller doesn't
    /// override it.
    pub default_max_steps: u32,
    /// Roll surprise per §4.10. Disabling is useful for deterministic tests
    /// that don't want to burn dice rolls on a mechanic they aren't exercising.
    pub roll_surprise: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { auto_resolve: false, default_max_steps: 64, roll_surprise: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_documented_values() {
        let config = EngineConfig::default();
        assert!(!config.auto_resolve);
        assert_eq!(config.default_max_steps, 64);
        assert!(config.roll_surprise);
    }

    #[test]
    fn deserializes_with_partial_overrides() {
        let config: EngineConfig = serde_json::from_str(r#"{"auto_resolve": true}"#).unwrap();
        assert!(config.auto_resolve);
        assert_eq!(config.default_max_steps, 64);
    }
}
