use super::{AttachmentKind, AttachmentPart, SpawnContext, beam_source};
use crate::engine::scene::parts::Part;
use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use constants::render_settings::{
    BEAM_ARC_LIFT, BEAM_PATH_SEGMENTS, BEAM_RADIAL_SEGMENTS, BEAM_RADIUS,
};
use std::f32::consts::TAU;

/// Animated tube carrying power from the drivetrain to one wheel.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnergyBeam {
    pub wheel: Part,
}

fn catmull_rom(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * ((2.0 * p1)
        + (p2 - p0) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (3.0 * p1 - p0 - 3.0 * p2 + p3) * t3)
}

/// Curved path from `start` to `end` through a midpoint lifted by
/// `BEAM_ARC_LIFT`. Returns `segments + 1` points, first and last exact.
pub fn beam_path(start: Vec3, end: Vec3, segments: usize) -> Vec<Vec3> {
    let segments = segments.max(2);
    let mid = (start + end) * 0.5 + Vec3::Y * BEAM_ARC_LIFT;
    let before = 2.0 * start - mid;
    let after = 2.0 * end - mid;
    let half = segments / 2;

    let mut path = Vec::with_capacity(segments + 1);
    for i in 0..half {
        path.push(catmull_rom(before, start, mid, end, i as f32 / half as f32));
    }
    let rest = segments - half;
    for i in 0..rest {
        path.push(catmull_rom(start, mid, end, after, i as f32 / rest as f32));
    }
    path.push(end);
    path
}

/// Tube swept along `path`. UV x runs 0..1 from start to end, which the beam
/// shader scrolls its dashes along.
pub fn tube_mesh(path: &[Vec3], radius: f32, radial_segments: usize) -> Mesh {
    let rings = path.len();
    let stride = radial_segments + 1;
    let mut positions = Vec::with_capacity(rings * stride);
    let mut normals = Vec::with_capacity(rings * stride);
    let mut uvs = Vec::with_capacity(rings * stride);

    for (i, point) in path.iter().enumerate() {
        let prev = path[i.saturating_sub(1)];
        let next = path[(i + 1).min(rings - 1)];
        let direction = (next - prev).normalize_or_zero();
        let tangent = if direction == Vec3::ZERO { Vec3::X } else { direction };
        let reference = if tangent.dot(Vec3::Y).abs() > 0.99 {
            Vec3::X
        } else {
            Vec3::Y
        };
        let normal = tangent.cross(reference).normalize();
        let binormal = tangent.cross(normal);
        let u = i as f32 / (rings.max(2) - 1) as f32;

        for j in 0..stride {
            let v = j as f32 / radial_segments as f32;
            let angle = v * TAU;
            let offset = normal * angle.cos() + binormal * angle.sin();
            positions.push((*point + offset * radius).to_array());
            normals.push(offset.to_array());
            uvs.push([u, v]);
        }
    }

    let mut indices: Vec<u32> = Vec::with_capacity(rings.saturating_sub(1) * radial_segments * 6);
    for i in 0..rings.saturating_sub(1) {
        for j in 0..radial_segments {
            let a = (i * stride + j) as u32;
            let b = a + stride as u32;
            indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }

    Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
        .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
        .with_inserted_indices(Indices::U32(indices))
}

pub fn spawn_energy_beam(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    wheel: Part,
    context: &SpawnContext,
) -> Option<Entity> {
    let source = beam_source(context.parts, wheel)?;
    let start = context.position_of(source)?;
    let end = context.position_of(context.parts.get(wheel)?)?;

    let path = beam_path(start, end, BEAM_PATH_SEGMENTS);
    let mesh = meshes.add(tube_mesh(&path, BEAM_RADIUS, BEAM_RADIAL_SEGMENTS));

    let beam = commands
        .spawn((
            Mesh3d(mesh),
            MeshMaterial3d(context.library.beam.clone()),
            Transform::IDENTITY,
            EnergyBeam { wheel },
            context.tag(AttachmentKind::EnergyBeam),
            AttachmentPart,
            ChildOf(context.root),
        ))
        .id();
    Some(beam)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn path_starts_and_ends_on_its_endpoints() {
        let start = Vec3::new(0.0, 0.3, 0.0);
        let end = Vec3::new(0.8, 0.35, 1.3);
        let path = beam_path(start, end, BEAM_PATH_SEGMENTS);

        assert_eq!(path.len(), BEAM_PATH_SEGMENTS + 1);
        assert_relative_eq!(path[0].distance(start), 0.0, epsilon = 1e-5);
        assert_relative_eq!(path[path.len() - 1].distance(end), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn path_arcs_above_the_straight_line() {
        let start = Vec3::ZERO;
        let end = Vec3::new(0.0, 0.0, 2.0);
        let path = beam_path(start, end, 16);

        let apex = path[8];
        assert_relative_eq!(apex.y, BEAM_ARC_LIFT, epsilon = 1e-5);
        assert!(path[1..path.len() - 1].iter().all(|p| p.y > 0.0));
    }

    #[test]
    fn tube_has_a_ring_per_path_point() {
        let path = beam_path(Vec3::ZERO, Vec3::X, 4);
        let mesh = tube_mesh(&path, 0.02, 6);
        assert_eq!(mesh.count_vertices(), path.len() * 7);
        assert_eq!(mesh.indices().map(|i| i.len()), Some((path.len() - 1) * 6 * 6));
    }
}
