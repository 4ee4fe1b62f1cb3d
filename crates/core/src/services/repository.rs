use chrono::Utc;
use tracing::{debug, warn};

use crate::errors::CoreError;
use crate::models::metrics::PositionMetrics;
use crate::models::record::SavedSimulation;
use crate::models::simulation::Simulation;
use crate::models::transaction::Transaction;
use crate::services::calculator::PositionCalculator;
use crate::services::migration::{self, CURRENT_SCHEMA_VERSION};
use crate::storage::keys;
use crate::storage::manager::StorageManager;
use crate::storage::store::KeyValueStore;

/// Owns the saved-simulation history (newest first) and the current
/// editable simulation, and moves them across the storage boundary.
///
/// Exactly one logical actor mutates this state — no locking, every
/// operation is synchronous.
#[derive(Debug)]
pub struct SimulationRepository {
    history: Vec<SavedSimulation>,
    current: Simulation,
    calculator: PositionCalculator,
}

impl SimulationRepository {
    pub fn new() -> Self {
        Self::with_calculator(PositionCalculator::new())
    }

    pub fn with_calculator(calculator: PositionCalculator) -> Self {
        Self {
            history: Vec::new(),
            current: Simulation::default(),
            calculator,
        }
    }

    // ── Accessors ───────────────────────────────────────────────────

    #[must_use]
    pub fn current(&self) -> &Simulation {
        &self.current
    }

    /// Mutable access to the editing buffer (name, sell price, fields).
    /// Structural changes to the transaction list go through
    /// [`add_transaction`](Self::add_transaction) /
    /// [`remove_transaction`](Self::remove_transaction).
    pub fn current_mut(&mut self) -> &mut Simulation {
        &mut self.current
    }

    /// Saved records, most recent first.
    #[must_use]
    pub fn history(&self) -> &[SavedSimulation] {
        &self.history
    }

    #[must_use]
    pub fn calculator(&self) -> &PositionCalculator {
        &self.calculator
    }

    /// Live metrics for the current simulation, recomputed from scratch.
    #[must_use]
    pub fn metrics(&self) -> PositionMetrics {
        self.calculator.metrics(&self.current)
    }

    // ── Editing the current simulation ──────────────────────────────

    /// Append a fresh empty purchase dated today. No upper bound.
    pub fn add_transaction(&mut self) {
        self.current.transactions.push(Transaction::purchase_today());
    }

    /// Remove the transaction at `index` from the current simulation.
    /// The initial lot (index 0) is structurally required and cannot be
    /// removed; out-of-range indices are rejected the same way.
    pub fn remove_transaction(&mut self, index: usize) -> Result<(), CoreError> {
        if index == 0 {
            return Err(CoreError::Validation(
                "The initial lot cannot be removed".into(),
            ));
        }
        if index >= self.current.transactions.len() {
            return Err(CoreError::Validation(format!(
                "No transaction at index {index}"
            )));
        }
        self.current.transactions.remove(index);
        Ok(())
    }

    /// Copy a saved record into the editing buffer, back-filling any
    /// transaction missing a date (today) or fee fields (empty).
    ///
    /// This only touches the copy: the persisted record — including its
    /// `schemaVersion` — is left exactly as stored.
    pub fn load_for_editing(&mut self, id: i64) -> Result<(), CoreError> {
        let record = self
            .history
            .iter()
            .find(|r| r.id == id)
            .ok_or(CoreError::RecordNotFound(id))?;

        let mut simulation = Simulation {
            name: record.name.clone(),
            transactions: record.transactions.clone(),
            projected_sell_price: record.projected_sell_price.clone(),
            result: record.result.clone(),
        };

        // Malformed stored data must not break the never-empty invariant.
        if simulation.transactions.is_empty() {
            simulation.transactions.push(Transaction::initial_today());
        }

        let today = Utc::now().date_naive();
        for transaction in &mut simulation.transactions {
            if transaction.date.is_none() {
                transaction.date = Some(today);
            }
            if transaction.fixed_fee.is_none() {
                transaction.fixed_fee = Some(String::new());
            }
            if transaction.fee_rate.is_none() {
                transaction.fee_rate = Some(String::new());
            }
        }

        self.current = simulation;
        Ok(())
    }

    /// Replace the current simulation with a fresh default: one empty
    /// initial transaction dated today.
    pub fn reset_current(&mut self) {
        self.current = Simulation::default();
    }

    // ── History lifecycle ───────────────────────────────────────────

    /// Snapshot the current simulation into a new saved record and
    /// persist the history. Returns the new record's id.
    ///
    /// The id is the save timestamp in milliseconds, bumped past the
    /// newest existing id so two saves inside the same millisecond
    /// still produce distinct, increasing ids.
    pub fn save(&mut self, store: &mut dyn KeyValueStore) -> Result<i64, CoreError> {
        let now = Utc::now();
        let mut id = now.timestamp_millis();
        if let Some(newest) = self.history.first() {
            if id <= newest.id {
                id = newest.id + 1;
            }
        }

        let record = SavedSimulation {
            id,
            saved_at: now,
            schema_version: CURRENT_SCHEMA_VERSION.to_string(),
            name: self.current.name.clone(),
            transactions: self.current.transactions.clone(),
            projected_sell_price: self.current.projected_sell_price.clone(),
            result: Some(self.calculator.metrics(&self.current)),
            extra: serde_json::Map::new(),
        };

        self.history.insert(0, record);
        self.persist_history(store)?;
        debug!(id, "saved simulation");
        Ok(id)
    }

    /// Remove the record with a matching id and persist. Idempotent:
    /// an absent id is not an error.
    pub fn delete_record(
        &mut self,
        store: &mut dyn KeyValueStore,
        id: i64,
    ) -> Result<(), CoreError> {
        self.history.retain(|r| r.id != id);
        self.persist_history(store)
    }

    /// Read the persisted history, migrating records saved under older
    /// schemas. A missing key means an empty history; an unreadable
    /// value also means an empty history (never a crash — there is no
    /// error-reporting channel at this boundary), but gets logged.
    pub fn load_history(&mut self, store: &dyn KeyValueStore) {
        let raw = match store.get(keys::SIMULATIONS) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(%err, "could not read simulation history; starting empty");
                self.history = Vec::new();
                return;
            }
        };

        let Some(raw) = raw else {
            self.history = Vec::new();
            return;
        };

        match StorageManager::decode_history(&raw) {
            Ok(mut records) => {
                migration::migrate(&mut records);
                debug!(count = records.len(), "loaded simulation history");
                self.history = records;
            }
            Err(err) => {
                warn!(%err, "stored simulation history is unreadable; starting empty");
                self.history = Vec::new();
            }
        }
    }

    /// Write the full history back to the store. Write failures are
    /// surfaced as errors rather than left to crash the caller.
    pub fn persist_history(&self, store: &mut dyn KeyValueStore) -> Result<(), CoreError> {
        let raw = StorageManager::encode_history(&self.history)?;
        store.set(keys::SIMULATIONS, &raw)
    }
}

impl Default for SimulationRepository {
    fn default() -> Self {
        Self::new()
    }
}
