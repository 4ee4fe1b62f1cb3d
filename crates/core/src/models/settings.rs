use serde::{Deserialize, Serialize};

/// UI preferences persisted alongside the simulation history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Dark-mode preference. Stored under its own key as "true"/"false".
    pub dark_mode: bool,
}
