use crate::models::record::SavedSimulation;

/// Schema version stamped on every record saved by this build.
///
/// History: "1.0.0" predates per-transaction fee fields; "1.1.0" added
/// `fixedFee` and `feeRate`.
pub const CURRENT_SCHEMA_VERSION: &str = "1.1.0";

/// One schema upgrade, applied to every record below `introduced_in`.
/// Each step must be idempotent: running it on already-upgraded data
/// changes nothing.
struct MigrationStep {
    introduced_in: &'static str,
    apply: fn(&mut SavedSimulation),
}

/// Ordered oldest-to-newest. Append new steps here when the schema grows.
const STEPS: &[MigrationStep] = &[MigrationStep {
    introduced_in: "1.1.0",
    apply: backfill_fee_fields,
}];

/// Migrate a loaded history collection to the current schema, in place.
///
/// Records already at the current version are untouched. Migration never
/// alters present values, never reorders records, and never removes
/// fields it doesn't recognize (those ride along in each record's
/// `extra` map). Idempotent: migrating twice equals migrating once.
pub fn migrate(records: &mut [SavedSimulation]) {
    for record in records.iter_mut() {
        if record.schema_version == CURRENT_SCHEMA_VERSION {
            continue;
        }
        for step in STEPS {
            if version_lt(&record.schema_version, step.introduced_in) {
                (step.apply)(record);
            }
        }
        record.schema_version = CURRENT_SCHEMA_VERSION.to_string();
    }
}

/// 1.1.0: give every transaction the fee fields, empty where absent.
fn backfill_fee_fields(record: &mut SavedSimulation) {
    for transaction in &mut record.transactions {
        if transaction.fixed_fee.is_none() {
            transaction.fixed_fee = Some(String::new());
        }
        if transaction.fee_rate.is_none() {
            transaction.fee_rate = Some(String::new());
        }
    }
}

/// Dotted-version comparison. Missing or unparseable components count
/// as zero, so an empty version (pre-versioning data) sorts below
/// everything and receives every step.
fn version_lt(a: &str, b: &str) -> bool {
    let parse = |v: &str| -> Vec<u32> {
        v.split('.')
            .map(|part| part.trim().parse::<u32>().unwrap_or(0))
            .collect()
    };
    let (a, b) = (parse(a), parse(b));
    let len = a.len().max(b.len());
    for i in 0..len {
        let (x, y) = (
            a.get(i).copied().unwrap_or(0),
            b.get(i).copied().unwrap_or(0),
        );
        if x != y {
            return x < y;
        }
    }
    false
}
