pub mod errors;
pub mod models;
pub mod services;
pub mod storage;

use tracing::warn;

use errors::CoreError;
use models::{
    metrics::PositionMetrics, record::SavedSimulation, settings::Settings,
    simulation::Simulation, transaction::Transaction,
};
use services::{
    calculator::PositionCalculator,
    repository::SimulationRepository,
    share::{self, ClipboardSink},
};
use storage::{keys, store::KeyValueStore};

/// Main entry point for the PRU Simulator core library.
///
/// Holds the saved-simulation history, the simulation currently being
/// edited, UI settings, and the storage backend. A UI layer drives it:
/// mutate the current simulation, query live metrics, save snapshots.
#[must_use]
pub struct PruSimulator {
    repository: SimulationRepository,
    settings: Settings,
    store: Box<dyn KeyValueStore>,
    /// Tracks whether any mutation has occurred since the last save/load.
    dirty: bool,
}

impl std::fmt::Debug for PruSimulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PruSimulator")
            .field("history", &self.repository.history().len())
            .field("transactions", &self.repository.current().transactions.len())
            .field("settings", &self.settings)
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl PruSimulator {
    /// Create a simulator over the given storage backend, with the
    /// default flat tax rate.
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self::with_calculator(store, PositionCalculator::new())
    }

    /// Create a simulator with a non-default tax rate.
    pub fn with_tax_rate(store: Box<dyn KeyValueStore>, tax_rate: f64) -> Self {
        Self::with_calculator(store, PositionCalculator::with_tax_rate(tax_rate))
    }

    fn with_calculator(store: Box<dyn KeyValueStore>, calculator: PositionCalculator) -> Self {
        Self {
            repository: SimulationRepository::with_calculator(calculator),
            settings: Settings::default(),
            store,
            dirty: false,
        }
    }

    /// Load persisted state: the simulation history (migrated to the
    /// current schema) and the dark-mode preference. Unreadable state
    /// degrades to defaults — this never fails.
    pub fn load(&mut self) {
        self.repository.load_history(self.store.as_ref());

        match self.store.get(keys::DARK_MODE) {
            Ok(Some(value)) => self.settings.dark_mode = value == "true",
            Ok(None) => {}
            Err(err) => warn!(%err, "could not read dark-mode preference"),
        }

        self.dirty = false;
    }

    // ── Current Simulation ──────────────────────────────────────────

    #[must_use]
    pub fn current(&self) -> &Simulation {
        self.repository.current()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.repository.current_mut().name = name.into();
        self.dirty = true;
    }

    pub fn set_projected_sell_price(&mut self, price: impl Into<String>) {
        self.repository.current_mut().projected_sell_price = price.into();
        self.dirty = true;
    }

    /// Mutable access to one transaction of the current simulation,
    /// for field edits. `None` when the index is out of range.
    pub fn transaction_mut(&mut self, index: usize) -> Option<&mut Transaction> {
        self.dirty = true;
        self.repository.current_mut().transactions.get_mut(index)
    }

    /// Append a fresh empty purchase dated today.
    pub fn add_transaction(&mut self) {
        self.repository.add_transaction();
        self.dirty = true;
    }

    /// Remove the transaction at `index`. Rejects index 0 — the initial
    /// lot is structurally required.
    pub fn remove_transaction(&mut self, index: usize) -> Result<(), CoreError> {
        self.repository.remove_transaction(index)?;
        self.dirty = true;
        Ok(())
    }

    /// Replace the current simulation with a fresh default.
    pub fn reset_simulation(&mut self) {
        self.repository.reset_current();
        self.dirty = true;
    }

    // ── Metrics ─────────────────────────────────────────────────────

    /// Live metrics for the current simulation, recomputed from scratch
    /// on every call.
    #[must_use]
    pub fn metrics(&self) -> PositionMetrics {
        self.repository.metrics()
    }

    /// The current reference price ("new PRU"): weighted average cost
    /// per share including fees.
    #[must_use]
    pub fn reference_price(&self) -> f64 {
        self.repository
            .calculator()
            .average_cost_with_fees(&self.repository.current().transactions)
    }

    #[must_use]
    pub fn tax_rate(&self) -> f64 {
        self.repository.calculator().tax_rate()
    }

    // ── History ─────────────────────────────────────────────────────

    /// Saved records, most recent first.
    #[must_use]
    pub fn history(&self) -> &[SavedSimulation] {
        self.repository.history()
    }

    /// Snapshot the current simulation into a new saved record and
    /// persist the history. Returns the new record's id.
    pub fn save_simulation(&mut self) -> Result<i64, CoreError> {
        let id = self.repository.save(self.store.as_mut())?;
        self.dirty = false;
        Ok(id)
    }

    /// Delete a saved record by id and persist. Idempotent.
    pub fn delete_simulation(&mut self, id: i64) -> Result<(), CoreError> {
        self.repository.delete_record(self.store.as_mut(), id)
    }

    /// Copy a saved record into the editing buffer (back-filling dates
    /// and fee fields missing from older data). The stored record is
    /// not modified.
    pub fn load_simulation(&mut self, id: i64) -> Result<(), CoreError> {
        self.repository.load_for_editing(id)?;
        self.dirty = false;
        Ok(())
    }

    // ── Settings ────────────────────────────────────────────────────

    #[must_use]
    pub fn is_dark_mode(&self) -> bool {
        self.settings.dark_mode
    }

    /// Flip the dark-mode preference and persist it immediately.
    /// Returns the new value.
    pub fn toggle_dark_mode(&mut self) -> Result<bool, CoreError> {
        self.settings.dark_mode = !self.settings.dark_mode;
        let value = if self.settings.dark_mode { "true" } else { "false" };
        self.store.set(keys::DARK_MODE, value)?;
        Ok(self.settings.dark_mode)
    }

    // ── Sharing ─────────────────────────────────────────────────────

    /// Plain-text summary of the current simulation.
    #[must_use]
    pub fn generate_share_text(&self) -> String {
        share::generate_share_text(self.repository.current(), self.repository.calculator())
    }

    /// Write the share text to an external sink. The one suspending
    /// operation in the library; failure is recovered locally and
    /// reported as `false`, never propagated.
    pub async fn share_results(&self, sink: &dyn ClipboardSink) -> bool {
        match sink.write_text(&self.generate_share_text()).await {
            Ok(()) => true,
            Err(err) => {
                warn!(%err, "failed to write share text to sink");
                false
            }
        }
    }

    // ── Dirty State ─────────────────────────────────────────────────

    /// Returns `true` if the current simulation has been modified since
    /// the last save or load.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }
}
