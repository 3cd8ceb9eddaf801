//! Runtime systems at the edge of the engine.
//!
//! Provides the viewer input model, native keyboard shortcuts and frame rate
//! reporting.

/// FPS notifications and the native heads-up overlay.
///
/// Sends frame rate updates to the frontend via RPC and updates native UI text.
pub mod fps_tracking;

/// Viewer inputs (mode, drivetrain, body style, technical metadata) and their parsing.
///
/// Handles keyboard input on native builds; WASM hosts drive inputs over RPC.
pub mod viewer_inputs;
