pub mod metrics;
pub mod record;
pub mod settings;
pub mod simulation;
pub mod transaction;
