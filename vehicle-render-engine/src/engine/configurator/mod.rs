//! Mode-driven scene configuration.
//!
//! `configure` maps a mode context onto an ordered mutation set without touching
//! the world; `apply_vehicle_mode` settles that set and writes it onto whichever
//! parts the loaded vehicle actually has.

/// System writing settled part states and respawning mode attachments.
pub mod apply;

/// Pure mode to mutation mapping and per-part settling.
pub mod mutation;
