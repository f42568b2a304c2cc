/// Errors raised by the scene manager.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    /// The requested scene name has no registered factory.
    #[error("scene not found: {name}")]
    NotFound { name: String },
}

/// Construction-time audio failures. After construction the synth never
/// errors; it degrades to a silent no-op instead.
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    /// The audio backend rejected a generated sound buffer.
    #[error("audio unavailable: {0}")]
    Unavailable(String),
}

/// Persistence failures. Callers treat these as advisory: a failed load
/// yields an empty set and a failed save is dropped after logging.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error reading or writing the backing file.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored value exists but is not valid JSON for the expected shape.
    #[error("corrupt stored value under key '{key}': {message}")]
    Corrupt { key: String, message: String },
}

/// Validation failures for imported leaderboard payloads. A rejected import
/// leaves the existing records untouched.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ImportError {
    /// Payload is missing the `version` field.
    #[error("import payload is missing 'version'")]
    MissingVersion,

    /// Payload `scores` field is absent or not an array of score records.
    #[error("import payload 'scores' is missing or malformed")]
    BadScores,
}
