// ═══════════════════════════════════════════════════════════════════
// Storage Tests — key-value backends, encoding, corruption recovery
// ═══════════════════════════════════════════════════════════════════

use pru_simulator_core::errors::CoreError;
use pru_simulator_core::storage::keys;
use pru_simulator_core::storage::manager::StorageManager;
use pru_simulator_core::storage::store::{FileStore, KeyValueStore, MemoryStore};
use pru_simulator_core::PruSimulator;

// ═══════════════════════════════════════════════════════════════════
// MemoryStore
// ═══════════════════════════════════════════════════════════════════

mod memory_store {
    use super::*;

    #[test]
    fn get_missing_key_is_none() {
        let store = MemoryStore::new();
        assert!(store.get("nope").unwrap().is_none());
    }

    #[test]
    fn set_then_get_round_trips() {
        let mut store = MemoryStore::new();
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn set_overwrites() {
        let mut store = MemoryStore::new();
        store.set("k", "v1").unwrap();
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));
    }
}

// ═══════════════════════════════════════════════════════════════════
// FileStore
// ═══════════════════════════════════════════════════════════════════

mod file_store {
    use super::*;

    #[test]
    fn get_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert!(store.get(keys::SIMULATIONS).unwrap().is_none());
    }

    #[test]
    fn set_then_get_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        store.set(keys::SIMULATIONS, "[]").unwrap();
        assert_eq!(store.get(keys::SIMULATIONS).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn keys_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        store.set(keys::SIMULATIONS, "[]").unwrap();
        store.set(keys::DARK_MODE, "true").unwrap();

        assert_eq!(store.get(keys::SIMULATIONS).unwrap().as_deref(), Some("[]"));
        assert_eq!(store.get(keys::DARK_MODE).unwrap().as_deref(), Some("true"));
    }

    #[test]
    fn creates_the_directory_on_first_write() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let mut store = FileStore::new(&nested);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }
}

// ═══════════════════════════════════════════════════════════════════
// StorageManager
// ═══════════════════════════════════════════════════════════════════

mod manager {
    use super::*;

    #[test]
    fn empty_history_encodes_to_an_empty_array() {
        assert_eq!(StorageManager::encode_history(&[]).unwrap(), "[]");
    }

    #[test]
    fn decode_rejects_garbage() {
        let err = StorageManager::decode_history("not json at all").unwrap_err();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }

    #[test]
    fn decode_rejects_the_wrong_shape() {
        let err = StorageManager::decode_history(r#"{"not":"an array"}"#).unwrap_err();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Corruption recovery & cross-instance persistence
// ═══════════════════════════════════════════════════════════════════

mod recovery {
    use super::*;

    #[test]
    fn corrupt_history_degrades_to_empty_without_panicking() {
        let mut store = MemoryStore::new();
        store.set(keys::SIMULATIONS, "{{{ definitely not json").unwrap();

        let mut sim = PruSimulator::new(Box::new(store));
        sim.load();
        assert!(sim.history().is_empty());
    }

    #[test]
    fn missing_history_is_empty() {
        let mut sim = PruSimulator::new(Box::new(MemoryStore::new()));
        sim.load();
        assert!(sim.history().is_empty());
    }

    #[test]
    fn history_survives_across_instances() {
        let dir = tempfile::tempdir().unwrap();

        let mut first = PruSimulator::new(Box::new(FileStore::new(dir.path())));
        first.set_name("Persisted run");
        let id = first.save_simulation().unwrap();

        let mut second = PruSimulator::new(Box::new(FileStore::new(dir.path())));
        second.load();
        assert_eq!(second.history().len(), 1);
        assert_eq!(second.history()[0].id, id);
        assert_eq!(second.history()[0].name, "Persisted run");
    }

    #[test]
    fn dark_mode_survives_across_instances() {
        let dir = tempfile::tempdir().unwrap();

        let mut first = PruSimulator::new(Box::new(FileStore::new(dir.path())));
        assert!(!first.is_dark_mode());
        assert!(first.toggle_dark_mode().unwrap());

        let mut second = PruSimulator::new(Box::new(FileStore::new(dir.path())));
        second.load();
        assert!(second.is_dark_mode());
    }
}
