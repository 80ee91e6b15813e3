use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for a recording session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Simulation error: {0}")]
    Simulation(#[from] SimError),

    #[error("Recording error: {0}")]
    Record(#[from] RecordError),

    #[error("Input error: {0}")]
    Input(#[from] InputError),
}

/// Action catalog errors.
///
/// All three are fatal: duplicates and frozen-catalog writes abort startup,
/// unknown lookups after setup indicate a wiring bug.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Action already registered: {0}")]
    DuplicateAction(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Catalog is frozen, cannot register {0}")]
    CatalogFrozen(String),
}

/// Simulator collaborator errors.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("Reset failed: {0}")]
    ResetFailed(String),

    #[error("Step failed: {0}")]
    StepFailed(String),

    #[error("Invalid action {name}: {reason}")]
    InvalidAction { name: String, reason: String },
}

/// Session recording errors.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Image encoding failed for {path}: {message}")]
    Image { path: PathBuf, message: String },

    #[error("Manifest serialization failed: {0}")]
    Serialize(String),

    #[error("Step {got} out of order, last recorded step was {last}")]
    StepOrder { last: u32, got: u32 },

    #[error("Session recorder is closed")]
    Closed,
}

impl RecordError {
    /// Attach a path to an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Invalid key binding: {0}")]
    InvalidKey(String),
}

/// Input source errors.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_error_from_catalog_error() {
        let err = CatalogError::DuplicateAction("look_leftish".into());
        let session_err: SessionError = err.into();
        assert!(matches!(session_err, SessionError::Catalog(_)));
        assert!(session_err.to_string().contains("look_leftish"));
    }

    #[test]
    fn session_error_from_sim_error() {
        let err = SimError::StepFailed("agent has no sensor".into());
        let session_err: SessionError = err.into();
        assert!(matches!(session_err, SessionError::Simulation(_)));
    }

    #[test]
    fn session_error_from_record_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let session_err: SessionError = RecordError::io("/tmp/poses", io).into();
        assert!(matches!(session_err, SessionError::Record(_)));
        assert!(session_err.to_string().contains("/tmp/poses"));
    }

    #[test]
    fn record_error_display_messages() {
        assert_eq!(
            RecordError::StepOrder { last: 3, got: 2 }.to_string(),
            "Step 2 out of order, last recorded step was 3"
        );
        assert_eq!(RecordError::Closed.to_string(), "Session recorder is closed");
    }

    #[test]
    fn config_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let config_err: ConfigError = io_err.into();
        assert!(matches!(config_err, ConfigError::Io(_)));
    }

    #[test]
    fn catalog_error_display_messages() {
        assert_eq!(
            CatalogError::DuplicateAction("move_backward".into()).to_string(),
            "Action already registered: move_backward"
        );
        assert_eq!(
            CatalogError::UnknownAction("move_up".into()).to_string(),
            "Unknown action: move_up"
        );
        assert_eq!(
            CatalogError::CatalogFrozen("late".into()).to_string(),
            "Catalog is frozen, cannot register late"
        );
    }

    #[test]
    fn sim_error_display_messages() {
        assert_eq!(
            SimError::ResetFailed("no scene".into()).to_string(),
            "Reset failed: no scene"
        );
        assert_eq!(
            SimError::InvalidAction {
                name: "look_leftish".into(),
                reason: "no actuation spec".into()
            }
            .to_string(),
            "Invalid action look_leftish: no actuation spec"
        );
    }

    #[test]
    fn config_error_display_messages() {
        assert_eq!(
            ConfigError::InvalidValue {
                field: "success_distance".into(),
                message: "must be finite".into()
            }
            .to_string(),
            "Invalid value for success_distance: must be finite"
        );
        assert_eq!(
            ConfigError::InvalidKey("ctrl+q".into()).to_string(),
            "Invalid key binding: ctrl+q"
        );
    }
}
