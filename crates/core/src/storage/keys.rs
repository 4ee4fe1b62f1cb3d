/// Storage key holding the serialized simulation history.
pub const SIMULATIONS: &str = "pru-simulations";

/// Storage key holding the dark-mode preference ("true"/"false").
pub const DARK_MODE: &str = "darkMode";
