use serde::{Deserialize, Serialize};

use super::metrics::PositionMetrics;
use super::transaction::Transaction;

/// The in-progress simulation being edited.
///
/// Invariant: `transactions` is never empty; element 0 is always the
/// `Initial` lot, every later element is a `Purchase`. The repository
/// enforces this — removal of index 0 is rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Simulation {
    /// Free-text label.
    pub name: String,

    /// Ordered (chronological) transaction list. The aggregate formulas
    /// are pure sums, so order only matters for display.
    pub transactions: Vec<Transaction>,

    /// Hypothetical sell price as entered (decimal string, empty = absent).
    #[serde(default)]
    pub projected_sell_price: String,

    /// Frozen metrics carried over when a saved record is loaded for
    /// editing. `None` for a fresh simulation.
    #[serde(default)]
    pub result: Option<PositionMetrics>,
}

impl Default for Simulation {
    fn default() -> Self {
        Self {
            name: String::new(),
            transactions: vec![Transaction::initial_today()],
            projected_sell_price: String::new(),
            result: None,
        }
    }
}

impl Simulation {
    /// The structurally required initial lot (element 0).
    #[must_use]
    pub fn initial_transaction(&self) -> &Transaction {
        &self.transactions[0]
    }
}
