use super::{AttachmentKind, AttachmentLabel, AttachmentPart, SpawnContext};
use crate::engine::scene::parts::Anchor;
use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use constants::defaults::GAUGE_FULL_SCALE_HP;
use constants::render_settings::{
    GAUGE_ARC_SEGMENTS, GAUGE_HEIGHT_OFFSET, GAUGE_INNER_RADIUS, GAUGE_OUTER_RADIUS,
};
use std::f32::consts::{FRAC_PI_2, TAU};

/// Annular gauge showing engine output: a dim full track with a bright arc
/// swept over `fill` of the circle.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct OutputGauge {
    pub horsepower: f32,
    /// Fraction of full scale, 0..=1.
    pub fill: f32,
}

impl OutputGauge {
    pub fn new(horsepower: f32) -> Self {
        Self {
            horsepower,
            fill: (horsepower / GAUGE_FULL_SCALE_HP).clamp(0.0, 1.0),
        }
    }

    /// Angle the filled arc sweeps, clockwise from twelve o'clock.
    pub fn sweep(&self) -> f32 {
        self.fill * TAU
    }
}

/// Marks the filled arc of a gauge.
#[derive(Component, Debug)]
pub struct GaugeArc;

pub fn gauge_label(horsepower: f32) -> String {
    format!("{:.0} HP", horsepower)
}

/// Flat ring segment in the XY plane starting at +Y and running clockwise
/// through `sweep` radians. `None` for an empty sweep.
pub fn gauge_arc_mesh(sweep: f32) -> Option<Mesh> {
    let sweep = sweep.clamp(0.0, TAU);
    if sweep <= f32::EPSILON {
        return None;
    }
    let segments = ((sweep / TAU) * GAUGE_ARC_SEGMENTS as f32).ceil().max(1.0) as usize;

    let mut positions = Vec::with_capacity((segments + 1) * 2);
    let mut uvs = Vec::with_capacity((segments + 1) * 2);
    for step in 0..=segments {
        let t = step as f32 / segments as f32;
        let angle = FRAC_PI_2 - sweep * t;
        let direction = Vec3::new(angle.cos(), angle.sin(), 0.0);
        positions.push((direction * GAUGE_INNER_RADIUS).to_array());
        positions.push((direction * GAUGE_OUTER_RADIUS).to_array());
        uvs.push([t, 0.0]);
        uvs.push([t, 1.0]);
    }
    let normals = vec![[0.0, 0.0, 1.0]; positions.len()];

    let mut indices = Vec::with_capacity(segments * 6);
    for step in 0..segments as u32 {
        let inner = step * 2;
        let outer = inner + 1;
        let next_inner = inner + 2;
        let next_outer = inner + 3;
        indices.extend_from_slice(&[inner, next_inner, outer, outer, next_inner, next_outer]);
    }

    Some(
        Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
            .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
            .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
            .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
            .with_inserted_indices(Indices::U32(indices)),
    )
}

pub fn spawn_output_gauge(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    horsepower: f32,
    context: &SpawnContext,
) -> Entity {
    let base = context
        .parts
        .anchor(Anchor::Drivetrain)
        .and_then(|anchor| context.position_of(anchor))
        .unwrap_or(Vec3::ZERO);

    // Ring meshes lie in XY; lay the gauge flat above the drivetrain
    let transform = Transform::from_translation(base + Vec3::Y * GAUGE_HEIGHT_OFFSET)
        .with_rotation(Quat::from_rotation_x(-FRAC_PI_2));
    let gauge = OutputGauge::new(horsepower);

    let root = commands
        .spawn((
            transform,
            Visibility::default(),
            gauge,
            AttachmentLabel(gauge_label(horsepower)),
            context.tag(AttachmentKind::OutputGauge),
            AttachmentPart,
            ChildOf(context.root),
        ))
        .id();

    commands.spawn((
        Mesh3d(context.primitives.gauge_ring.clone()),
        MeshMaterial3d(context.library.technical.clone()),
        Transform::default(),
        AttachmentPart,
        ChildOf(root),
    ));

    if let Some(arc) = gauge_arc_mesh(gauge.sweep()) {
        commands.spawn((
            Mesh3d(meshes.add(arc)),
            MeshMaterial3d(context.library.gauge.clone()),
            // Lifted off the track so the two never z-fight
            Transform::from_xyz(0.0, 0.0, 0.002),
            GaugeArc,
            AttachmentPart,
            ChildOf(root),
        ));
    }

    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::render::mesh::VertexAttributeValues;

    fn arc_end_angle(mesh: &Mesh) -> f32 {
        let Some(VertexAttributeValues::Float32x3(positions)) =
            mesh.attribute(Mesh::ATTRIBUTE_POSITION)
        else {
            panic!("arc has no positions");
        };
        let [x, y, _] = positions[positions.len() - 1];
        // Clockwise from +Y
        (x.atan2(y) + TAU) % TAU
    }

    #[test]
    fn fill_is_clamped_to_full_scale() {
        assert_eq!(OutputGauge::new(GAUGE_FULL_SCALE_HP * 2.0).fill, 1.0);
        assert_eq!(OutputGauge::new(-5.0).fill, 0.0);
        assert_eq!(gauge_label(220.0), "220 HP");
    }

    #[test]
    fn arc_sweep_follows_horsepower() {
        for horsepower in [90.0, 220.0, 310.0, 450.0] {
            let gauge = OutputGauge::new(horsepower);
            let mesh = gauge_arc_mesh(gauge.sweep()).unwrap();
            let expected = horsepower / GAUGE_FULL_SCALE_HP * TAU;
            assert!(
                (arc_end_angle(&mesh) - expected).abs() < 1.0e-4,
                "{horsepower} HP ends at {}",
                arc_end_angle(&mesh)
            );
        }
    }

    #[test]
    fn more_output_means_more_arc() {
        let small = gauge_arc_mesh(OutputGauge::new(150.0).sweep()).unwrap();
        let large = gauge_arc_mesh(OutputGauge::new(450.0).sweep()).unwrap();
        assert!(large.count_vertices() > small.count_vertices());
    }

    #[test]
    fn zero_output_has_no_arc() {
        assert!(gauge_arc_mesh(OutputGauge::new(0.0).sweep()).is_none());
    }
}
