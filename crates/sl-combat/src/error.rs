//! Error types for the combat engine.

use crate::character::CharacterId;

/// Errors that can occur while setting up or resolving combat.
///
/// Misses, glitches and other dice outcomes are never errors; they are
/// reported through [`crate::attack::AttackOutcome`].
#[derive(Debug, thiserror::Error)]
pub enum CombatError {
    /// The caller supplied something the rules cannot act on. Nothing was mutated.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A static rule table has no entry for the requested lookup.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A character id did not match any combatant in the match.
    #[error("unknown combatant: {0}")]
    UnknownCombatant(CharacterId),

    /// The match has already ended; no further actions can be resolved.
    #[error("match is already over")]
    MatchOver,
}

impl CombatError {
    /// Shorthand for building an [`CombatError::InvalidInput`].
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Returns true for errors the batch runner may skip over.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::UnknownCombatant(_))
    }
}

/// Convenience result type for combat operations.
pub type CombatResult<T> = Result<T, CombatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            CombatError::invalid("no weapon").to_string(),
            "invalid input: no weapon"
        );
        assert_eq!(
            CombatError::Configuration("no range table for blade".into()).to_string(),
            "configuration error: no range table for blade"
        );
        assert_eq!(
            CombatError::UnknownCombatant(CharacterId(7)).to_string(),
            "unknown combatant: #7"
        );
        assert_eq!(CombatError::MatchOver.to_string(), "match is already over");
    }

    #[test]
    fn configuration_is_not_recoverable() {
        assert!(CombatError::invalid("x").is_recoverable());
        assert!(!CombatError::Configuration("x".into()).is_recoverable());
        assert!(!CombatError::MatchOver.is_recoverable());
    }
}
