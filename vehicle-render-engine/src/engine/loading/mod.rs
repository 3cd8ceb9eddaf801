//! Vehicle asset loading.
//!
//! Reads the vehicle manifest once and swaps the spawned glTF scene whenever the
//! requested body style changes.

/// Manifest loading and body style driven scene respawning.
pub mod variant_loader;
