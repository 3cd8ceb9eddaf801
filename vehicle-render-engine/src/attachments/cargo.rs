use super::{AttachmentKind, AttachmentLabel, AttachmentPart, SpawnContext};
use bevy::prelude::*;
use constants::render_settings::{CARGO_MIN_SCALE, CARGO_VOLUME_SIZE};

/// Trunk cargo box. `openness` eases between 0 (collapsed) and 1 (full height)
/// following the trunk flag; the box and its outline are scaled together.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct CargoVolume {
    pub capacity_liters: f32,
    pub openness: f32,
}

/// Vertical scale for an openness value. Never reaches zero so the transform
/// stays invertible.
pub fn cargo_scale(openness: f32) -> f32 {
    openness.clamp(0.0, 1.0).max(CARGO_MIN_SCALE)
}

pub fn capacity_label(capacity_liters: f32) -> String {
    format!("{:.0} L", capacity_liters)
}

pub fn spawn_cargo_volume(
    commands: &mut Commands,
    anchor: Entity,
    capacity_liters: f32,
    context: &SpawnContext,
) -> Entity {
    let size = Vec3::from_array(CARGO_VOLUME_SIZE);
    // Box sits on the anchor and grows upwards
    let body = Transform::from_translation(Vec3::Y * size.y * 0.5).with_scale(size);

    let volume = commands
        .spawn((
            Transform::from_scale(Vec3::new(1.0, cargo_scale(0.0), 1.0)),
            Visibility::default(),
            CargoVolume {
                capacity_liters,
                openness: 0.0,
            },
            AttachmentLabel(capacity_label(capacity_liters)),
            context.tag(AttachmentKind::CargoVolume),
            AttachmentPart,
            ChildOf(anchor),
        ))
        .id();

    commands.spawn((
        Mesh3d(context.primitives.unit_cube.clone()),
        MeshMaterial3d(context.library.cargo_fill.clone()),
        body,
        AttachmentPart,
        ChildOf(volume),
    ));
    commands.spawn((
        Mesh3d(context.primitives.unit_cube_outline.clone()),
        MeshMaterial3d(context.library.outline.clone()),
        body,
        AttachmentPart,
        ChildOf(volume),
    ));

    volume
}
