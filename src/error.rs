//! Error taxonomy
//!
//! Nothing here is fatal to a running session: spawn errors skip a single
//! entity, tuning errors are reported before a session exists.

use thiserror::Error;

use crate::host::EntityKind;

/// Failure reported by the host when instantiating an entity
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpawnError {
    /// The host has no template for this kind; spawns of it become no-ops
    #[error("no template configured for {0}")]
    ConfigurationMissing(EntityKind),
    /// Instantiation failed this time; the next generation pass retries naturally
    #[error("failed to instantiate {kind}: {reason}")]
    TransientSpawnFailure { kind: EntityKind, reason: String },
}

/// Failure loading a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Archetype;

    #[test]
    fn test_spawn_error_messages() {
        let missing = SpawnError::ConfigurationMissing(EntityKind::Platform(Archetype::Gold));
        assert_eq!(missing.to_string(), "no template configured for gold platform");

        let transient = SpawnError::TransientSpawnFailure {
            kind: EntityKind::Powerup,
            reason: "pool exhausted".into(),
        };
        assert_eq!(
            transient.to_string(),
            "failed to instantiate powerup: pool exhausted"
        );
    }

    #[test]
    fn test_tuning_parse_error_converts() {
        let err: TuningError = serde_json::from_str::<crate::Tuning>("{ not json")
            .unwrap_err()
            .into();
        assert!(matches!(err, TuningError::Parse(_)));
    }
}
