use thiserror::Error;

/// Unified error type for the entire pru-simulator-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
///
/// Numeric parse failures are deliberately *not* represented here:
/// unparseable user input is coerced to zero by the calculator, never raised.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Storage ─────────────────────────────────────────────────────
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Simulation record not found: {0}")]
    RecordNotFound(i64),

    // ── External Sinks ──────────────────────────────────────────────
    #[error("Clipboard sink error: {0}")]
    Clipboard(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}
