use bevy::color::{Color, LinearRgba};

pub const PAINT: Color = Color::srgb(0.62, 0.05, 0.07);
pub const CHROME: Color = Color::srgb(0.9, 0.9, 0.92);
pub const GLASS: Color = Color::srgba(0.75, 0.85, 0.95, 0.25);
pub const TINTED_GLASS: Color = Color::srgba(0.18, 0.24, 0.3, 0.55);
pub const DARK_GLASS: Color = Color::srgba(0.02, 0.02, 0.03, 0.8);
pub const SATIN: Color = Color::srgb(0.16, 0.16, 0.17);
pub const GRAPHITE: Color = Color::srgb(0.09, 0.1, 0.11);
pub const OUTLINE: Color = Color::srgb(0.35, 0.75, 1.0);
pub const TECHNICAL: Color = Color::srgba(0.2, 0.85, 1.0, 0.45);

pub const GHOST_RIM: LinearRgba = LinearRgba::new(0.25, 0.7, 1.0, 1.0);
pub const GHOST_MIN_ALPHA: f32 = 0.04;
pub const GHOST_MAX_ALPHA: f32 = 0.85;
pub const GHOST_FRESNEL_POWER: f32 = 2.5;

pub const HOT_METAL: Color = Color::srgb(1.0, 0.42, 0.08);
pub const HOT_METAL_EMISSIVE: LinearRgba = LinearRgba::new(6.0, 1.6, 0.2, 1.0);

/// Magma oscillates between these two hues.
pub const MAGMA_LOW: LinearRgba = LinearRgba::new(0.8, 0.08, 0.0, 1.0);
pub const MAGMA_HIGH: LinearRgba = LinearRgba::new(1.0, 0.55, 0.05, 1.0);
pub const MAGMA_EMISSIVE_GAIN: f32 = 4.0;

pub const ENGINE_GLOW: Color = Color::srgb(1.0, 0.45, 0.1);

pub const PULSE: Color = Color::srgb(0.2, 0.9, 1.0);
pub const BEAM: LinearRgba = LinearRgba::new(0.3, 0.8, 4.0, 1.0);
pub const GAUGE: Color = Color::srgb(1.0, 0.55, 0.1);
pub const CARGO_FILL: Color = Color::srgba(0.3, 0.8, 0.4, 0.3);
pub const MEASURE_LINE: Color = Color::srgb(1.0, 0.27, 0.0);
