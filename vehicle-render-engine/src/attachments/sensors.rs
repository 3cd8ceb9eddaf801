use super::{AttachmentKind, AttachmentPart, SpawnContext};
use bevy::prelude::*;
use constants::animation::{
    PULSE_COUNT, PULSE_MAX_SCALE, PULSE_MIN_SCALE, PULSE_PEAK_ALPHA, PULSE_RATE,
};

/// One expanding radar ring. `slot` selects the shared pulse material it fades.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct SensorPulse {
    pub phase: f32,
    pub slot: usize,
}

/// Evenly spaced phases in [0, 1).
pub fn pulse_phases(count: usize) -> Vec<f32> {
    (0..count).map(|i| i as f32 / count as f32).collect()
}

/// Ring scale and opacity at `elapsed` seconds. Rings grow from the minimum to
/// the maximum scale while fading out, then wrap.
pub fn pulse_state(elapsed: f32, phase: f32) -> (f32, f32) {
    let t = (elapsed * PULSE_RATE + phase).rem_euclid(1.0);
    let scale = PULSE_MIN_SCALE + (PULSE_MAX_SCALE - PULSE_MIN_SCALE) * t;
    let alpha = PULSE_PEAK_ALPHA * (1.0 - t);
    (scale, alpha)
}

pub fn spawn_sensor_scan(commands: &mut Commands, anchor: Entity, context: &SpawnContext) -> Entity {
    let cluster = commands
        .spawn((
            Transform::IDENTITY,
            Visibility::default(),
            context.tag(AttachmentKind::SensorScan),
            AttachmentPart,
            ChildOf(anchor),
        ))
        .id();

    for (slot, phase) in pulse_phases(PULSE_COUNT).into_iter().enumerate() {
        let (scale, _) = pulse_state(0.0, phase);
        commands.spawn((
            Mesh3d(context.primitives.pulse_ring.clone()),
            MeshMaterial3d(context.library.pulses[slot].clone()),
            Transform::from_scale(Vec3::splat(scale)),
            SensorPulse { phase, slot },
            AttachmentPart,
            ChildOf(cluster),
        ));
    }

    cluster
}
