use crate::errors::CoreError;
use crate::models::record::SavedSimulation;

/// Encodes and decodes the persisted history collection.
///
/// Plain JSON with the field names the data model declares — no
/// compression, no binary framing, so the stored value stays readable
/// and forward-compatible.
pub struct StorageManager;

impl StorageManager {
    /// Serialize the full history (newest first) to a JSON string.
    pub fn encode_history(records: &[SavedSimulation]) -> Result<String, CoreError> {
        serde_json::to_string(records).map_err(|e| {
            CoreError::Serialization(format!("Failed to serialize simulation history: {e}"))
        })
    }

    /// Parse a raw stored value back into records. The caller decides
    /// what a failure means (the repository falls back to an empty
    /// history rather than crashing).
    pub fn decode_history(raw: &str) -> Result<Vec<SavedSimulation>, CoreError> {
        serde_json::from_str(raw).map_err(|e| {
            CoreError::Deserialization(format!("Failed to parse simulation history: {e}"))
        })
    }
}
