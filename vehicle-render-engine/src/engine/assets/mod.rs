//! Runtime asset definitions for the vehicle viewer.

/// JSON manifest mapping body styles to glTF scenes and default technical metadata.
pub mod vehicle_manifest;
