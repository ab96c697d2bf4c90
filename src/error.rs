//! The application error type.

/// The errors that may occur while tracking budgets, habits and goals.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// User supplied data was rejected before any state changed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The value stored under `key` could not be parsed as the expected
    /// collection.
    ///
    /// Loading recovers from this by starting with an empty collection.
    #[error("stored value for \"{key}\" is corrupt: {reason}")]
    CorruptPersistedState { key: String, reason: String },

    /// Writing the collection for `key` failed.
    ///
    /// The in-memory state is kept, so the session continues with unsaved
    /// changes.
    #[error("could not save \"{key}\": {reason}")]
    PersistenceWrite { key: String, reason: String },

    /// An unexpected SQLite error.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("could not serialize as JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The terminal could not be set up or drawn to.
    #[error("terminal error: {0}")]
    Terminal(String),
}

impl Error {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Error::InvalidInput(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_message() {
        let error = Error::invalid_input("Description cannot be empty");
        assert_eq!(
            error.to_string(),
            "invalid input: Description cannot be empty"
        );
    }

    #[test]
    fn test_persistence_write_message_names_key() {
        let error = Error::PersistenceWrite {
            key: "habits".to_string(),
            reason: "quota exceeded".to_string(),
        };
        assert!(error.to_string().contains("\"habits\""));
        assert!(error.to_string().contains("quota exceeded"));
    }
}
