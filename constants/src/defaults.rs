//! Values substituted when technical metadata omits a field.

pub const DEFAULT_ENGINE_HP: f32 = 220.0;
pub const DEFAULT_TRUNK_CAPACITY_LITERS: f32 = 500.0;
pub const DEFAULT_LENGTH_MM: f32 = 4341.0;
pub const DEFAULT_WIDTH_MM: f32 = 1804.0;
pub const DEFAULT_HEIGHT_MM: f32 = 1440.0;
pub const DEFAULT_HAS_FRONT_SENSORS: bool = true;
pub const DEFAULT_HAS_REAR_SENSORS: bool = true;

/// Roof height (asset units) when the roof anchor is missing.
pub const DEFAULT_ROOF_HEIGHT: f32 = 1.45;

/// Horsepower that fills the output gauge ring.
pub const GAUGE_FULL_SCALE_HP: f32 = 600.0;
