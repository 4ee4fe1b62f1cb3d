// ═══════════════════════════════════════════════════════════════════
// Migration Tests — versioned schema upgrades on stored history
// ═══════════════════════════════════════════════════════════════════

use pru_simulator_core::services::migration::{migrate, CURRENT_SCHEMA_VERSION};
use pru_simulator_core::storage::keys;
use pru_simulator_core::storage::manager::StorageManager;
use pru_simulator_core::storage::store::{KeyValueStore, MemoryStore};
use pru_simulator_core::PruSimulator;

/// Two records as the 1.0.0 schema wrote them: no fee fields, no dates,
/// one of them carrying an unrecognized field.
const V1_HISTORY: &str = r#"[
    {
        "id": 1700000001000,
        "savedAt": "2023-11-14T22:13:21Z",
        "schemaVersion": "1.0.0",
        "name": "Newest",
        "transactions": [
            { "kind": "initial", "referencePrice": "50", "shareCount": "4" }
        ],
        "projectedSellPrice": "",
        "starred": true
    },
    {
        "id": 1700000000000,
        "savedAt": "2023-11-14T22:13:20Z",
        "name": "Oldest, pre-versioning",
        "transactions": [
            { "kind": "initial", "referencePrice": "100", "shareCount": "10" },
            { "kind": "purchase", "price": "80", "shareCount": "10" }
        ]
    }
]"#;

#[test]
fn stamps_every_outdated_record_to_the_current_version() {
    let mut records = StorageManager::decode_history(V1_HISTORY).unwrap();
    migrate(&mut records);

    for record in &records {
        assert_eq!(record.schema_version, CURRENT_SCHEMA_VERSION);
    }
}

#[test]
fn backfills_fee_fields_as_empty() {
    let mut records = StorageManager::decode_history(V1_HISTORY).unwrap();
    migrate(&mut records);

    for record in &records {
        for transaction in &record.transactions {
            assert_eq!(transaction.fixed_fee.as_deref(), Some(""));
            assert_eq!(transaction.fee_rate.as_deref(), Some(""));
        }
    }
}

#[test]
fn treats_a_missing_version_as_oldest() {
    let mut records = StorageManager::decode_history(V1_HISTORY).unwrap();
    assert_eq!(records[1].schema_version, "");

    migrate(&mut records);
    assert_eq!(records[1].schema_version, CURRENT_SCHEMA_VERSION);
    assert_eq!(records[1].transactions[0].fixed_fee.as_deref(), Some(""));
}

#[test]
fn never_alters_present_values() {
    let mut records = StorageManager::decode_history(V1_HISTORY).unwrap();
    migrate(&mut records);

    assert_eq!(records[0].name, "Newest");
    assert_eq!(records[0].transactions[0].cost_per_share, "50");
    assert_eq!(records[1].transactions[1].cost_per_share, "80");
    assert!(records[1].transactions[0].date.is_none()); // dates are not backfilled here
}

#[test]
fn never_reorders_records() {
    let mut records = StorageManager::decode_history(V1_HISTORY).unwrap();
    migrate(&mut records);

    assert_eq!(records[0].id, 1700000001000);
    assert_eq!(records[1].id, 1700000000000);
}

#[test]
fn is_idempotent_field_for_field() {
    let mut once = StorageManager::decode_history(V1_HISTORY).unwrap();
    migrate(&mut once);

    let mut twice = once.clone();
    migrate(&mut twice);

    assert_eq!(once, twice);
}

#[test]
fn leaves_current_records_untouched() {
    let mut records = StorageManager::decode_history(V1_HISTORY).unwrap();
    migrate(&mut records);

    // A record already at the current version with fees set must not move.
    records[0].transactions[0].fixed_fee = Some("2.5".into());
    let before = records.clone();
    migrate(&mut records);
    assert_eq!(records, before);
}

#[test]
fn preserves_unrecognized_fields_through_migrate_and_persist() {
    let mut records = StorageManager::decode_history(V1_HISTORY).unwrap();
    migrate(&mut records);

    let encoded = StorageManager::encode_history(&records).unwrap();
    assert!(encoded.contains("\"starred\":true"));
}

#[test]
fn load_migrates_but_loading_for_editing_never_rewrites_the_store() {
    let mut store = MemoryStore::new();
    store.set(keys::SIMULATIONS, V1_HISTORY).unwrap();

    let mut sim = PruSimulator::new(Box::new(store));
    sim.load();

    // In-memory history is migrated...
    assert_eq!(sim.history().len(), 2);
    for record in sim.history() {
        assert_eq!(record.schema_version, CURRENT_SCHEMA_VERSION);
    }

    // ...and a later persist (here via an idempotent delete) writes the
    // upgraded schema back.
    sim.delete_simulation(-1).unwrap();
    let migrated_newest = sim.history()[0].clone();
    assert_eq!(migrated_newest.schema_version, CURRENT_SCHEMA_VERSION);
}
