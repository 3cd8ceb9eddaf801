use std::f32::consts::TAU;

/// Trunk lid angle when fully open (radians about the hinge).
pub const TRUNK_OPEN_ANGLE: f32 = 1.15;
/// Exponential easing rate for the trunk lid, per second.
pub const TRUNK_EASE_RATE: f32 = 4.0;
/// Exponential easing rate for the cargo volume openness, per second.
pub const CARGO_EASE_RATE: f32 = 3.0;

/// Magma colour and engine glow oscillation frequency (Hz).
pub const MAGMA_PULSE_HZ: f32 = 0.8;
pub const ENGINE_GLOW_REST: f32 = 0.0;
pub const ENGINE_GLOW_MIN: f32 = 20_000.0;
pub const ENGINE_GLOW_MAX: f32 = 120_000.0;

/// Wheel spin in performance mode (radians per second).
pub const WHEEL_SPIN_RATE: f32 = 4.0 * TAU;

/// Idle vibration of the vehicle root.
pub const JITTER_AMPLITUDE: f32 = 0.004;
pub const JITTER_ROTATION: f32 = 0.0025;
pub const JITTER_FREQUENCIES: [f32; 3] = [31.0, 23.0, 17.0];

/// Sensor pulses emitted per anchor, phases evenly spaced in [0, 1).
pub const PULSE_COUNT: usize = 3;
/// Pulse loops per second.
pub const PULSE_RATE: f32 = 0.6;
pub const PULSE_MIN_SCALE: f32 = 0.2;
pub const PULSE_MAX_SCALE: f32 = 1.6;
pub const PULSE_PEAK_ALPHA: f32 = 0.65;

/// Beam dash scroll speed in beam lengths per second.
pub const BEAM_SCROLL_SPEED: f32 = 0.75;
pub const BEAM_DASH_COUNT: f32 = 6.0;
pub const BEAM_BASE_GLOW: f32 = 0.15;
