//! Vehicle scene graph access.
//!
//! Maps asset node names onto logical parts and anchors, walks the hierarchy
//! below the vehicle root and builds edge overlays for technical views.

/// Feature edge extraction and lazily built outline overlays.
pub mod edge_overlay;

/// Hierarchy traversal, root-space transforms and visibility writes.
pub mod hierarchy;

/// Logical parts, anchors and their alias tables.
///
/// Resolves names once per loaded vehicle so that missing nodes are skipped everywhere else.
pub mod parts;
