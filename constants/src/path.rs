/// Vehicle manifest, relative to the asset root.
pub const VEHICLE_MANIFEST_PATH: &str = "vehicles/manifest.json";
