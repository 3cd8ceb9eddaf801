use bevy::math::Vec3;

/// Draw order every part returns to on a mode reset.
pub const DRAW_ORDER_DEFAULT: i32 = 0;

/// Glazing in performance mode composites after the satin shell.
pub const DRAW_ORDER_GLAZING: i32 = 10;

/// Internal parts drawn over the body shell to fake an x-ray view.
pub const DRAW_ORDER_XRAY: i32 = 999;

/// Camera layer of the regular scene.
pub const SCENE_RENDER_LAYER: usize = 0;

/// Camera layer composited over the scene by the x-ray camera.
pub const XRAY_RENDER_LAYER: usize = 1;

/// Faces whose normals differ by more than this angle produce an outline edge.
pub const EDGE_THRESHOLD_DEGREES: f32 = 30.0;

/// Positions are welded at this precision before edge adjacency is computed.
pub const EDGE_WELD_PRECISION: f32 = 1.0e4;

/// Cross-section of a dimension line (metres).
pub const DRAW_LINE_WIDTH: f32 = 0.012;

/// Distance dimension lines are pushed away from the body.
pub const MEASURE_OFFSET: f32 = 0.25;

pub const PULSE_RING_RADIUS: f32 = 0.35;
pub const PULSE_RING_THICKNESS: f32 = 0.012;

pub const BEAM_RADIUS: f32 = 0.02;
pub const BEAM_PATH_SEGMENTS: usize = 32;
pub const BEAM_RADIAL_SEGMENTS: usize = 8;
/// Height the beam arcs above the straight line between anchor and wheel.
pub const BEAM_ARC_LIFT: f32 = 0.35;

pub const GAUGE_INNER_RADIUS: f32 = 0.42;
pub const GAUGE_OUTER_RADIUS: f32 = 0.5;
pub const GAUGE_HEIGHT_OFFSET: f32 = 0.9;
/// Segments of a completely filled gauge arc.
pub const GAUGE_ARC_SEGMENTS: usize = 64;

/// Full cargo volume box (width, height, depth) in metres.
pub const CARGO_VOLUME_SIZE: [f32; 3] = [0.95, 0.5, 0.75];

/// Smallest vertical scale used for a closed cargo volume, keeps the transform invertible.
pub const CARGO_MIN_SCALE: f32 = 0.001;

pub const ENGINE_GLOW_RANGE: f32 = 3.5;

/// Glow position (vehicle space) while no engine node is resolved.
pub const ENGINE_GLOW_FALLBACK: Vec3 = Vec3::new(0.0, 0.6, 0.0);
