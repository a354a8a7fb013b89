use thiserror::Error;

pub type SyncResult<T> = Result<T, SyncError>;

/// Errors surfaced by the sync service.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A meal-planner unit has no inventory counterpart and is not a special-case unit.
    #[error("could not find a matching inventory unit for {unit}")]
    UnmappedUnit { unit: String },

    /// Two ingredients with different units were merged. Always a caller bug.
    #[error("cannot add ingredients with different units: {left:?} and {right:?}")]
    UnitMismatch {
        left: Option<String>,
        right: Option<String>,
    },

    /// A remote system failed to answer or answered garbage.
    #[error("{system} is unavailable: {message}")]
    Unavailable {
        system: &'static str,
        message: String,
    },

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl SyncError {
    pub fn unavailable(system: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Unavailable {
            system,
            message: err.to_string(),
        }
    }
}
