//! Feature-edge extraction and the outline overlays built from it
use super::hierarchy::SceneNodes;
use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::{PrimitiveTopology, VertexAttributeValues};
use constants::render_settings::{EDGE_THRESHOLD_DEGREES, EDGE_WELD_PRECISION};
use std::collections::HashMap;

/// Line overlay attached as a child of the node it outlines.
#[derive(Component, Debug, Default)]
pub struct EdgeOverlay;

/// Tags a node whose overlay has been built, so extraction runs once per node.
#[derive(Component, Debug, Default)]
pub struct EdgeOverlayBuilt;

type WeldKey = (i64, i64, i64);

fn weld_key(position: Vec3) -> WeldKey {
    (
        (position.x * EDGE_WELD_PRECISION).round() as i64,
        (position.y * EDGE_WELD_PRECISION).round() as i64,
        (position.z * EDGE_WELD_PRECISION).round() as i64,
    )
}

/// Edges that are either open (one adjacent face) or creased beyond
/// `threshold_degrees`. Coincident vertices are welded first so split normals
/// and UV seams do not register as boundaries. Output order follows the order
/// edges are first met in the triangle list.
pub fn feature_edges(
    positions: &[Vec3],
    triangles: &[[usize; 3]],
    threshold_degrees: f32,
) -> Vec<[Vec3; 2]> {
    let mut welded: Vec<Vec3> = Vec::new();
    let mut weld_lookup: HashMap<WeldKey, usize> = HashMap::new();
    let remap: Vec<usize> = positions
        .iter()
        .map(|position| {
            *weld_lookup.entry(weld_key(*position)).or_insert_with(|| {
                welded.push(*position);
                welded.len() - 1
            })
        })
        .collect();

    let mut edge_order: Vec<(usize, usize)> = Vec::new();
    let mut edge_normals: HashMap<(usize, usize), Vec<Vec3>> = HashMap::new();

    for triangle in triangles {
        let Some(corners) = triangle
            .iter()
            .map(|index| remap.get(*index).copied())
            .collect::<Option<Vec<usize>>>()
        else {
            continue;
        };
        let (a, b, c) = (corners[0], corners[1], corners[2]);
        if a == b || b == c || a == c {
            continue;
        }

        let normal = (welded[b] - welded[a])
            .cross(welded[c] - welded[a])
            .normalize_or_zero();
        if normal == Vec3::ZERO {
            continue;
        }

        for (start, end) in [(a, b), (b, c), (c, a)] {
            let key = (start.min(end), start.max(end));
            edge_normals
                .entry(key)
                .or_insert_with(|| {
                    edge_order.push(key);
                    Vec::new()
                })
                .push(normal);
        }
    }

    let crease_cos = threshold_degrees.to_radians().cos();
    edge_order
        .into_iter()
        .filter(|key| {
            let normals = &edge_normals[key];
            normals.len() == 1
                || normals.iter().enumerate().any(|(i, first)| {
                    normals[i + 1..]
                        .iter()
                        .any(|second| first.dot(*second) < crease_cos)
                })
        })
        .map(|(start, end)| [welded[start], welded[end]])
        .collect()
}

/// Feature edges of a triangle-list mesh. Other topologies yield nothing.
pub fn mesh_feature_edges(mesh: &Mesh, threshold_degrees: f32) -> Vec<[Vec3; 2]> {
    if mesh.primitive_topology() != PrimitiveTopology::TriangleList {
        return Vec::new();
    }
    let Some(VertexAttributeValues::Float32x3(raw)) = mesh.attribute(Mesh::ATTRIBUTE_POSITION)
    else {
        return Vec::new();
    };

    let positions: Vec<Vec3> = raw.iter().map(|p| Vec3::from_array(*p)).collect();
    let indices: Vec<usize> = match mesh.indices() {
        Some(indices) => indices.iter().collect(),
        None => (0..positions.len()).collect(),
    };
    let triangles: Vec<[usize; 3]> = indices
        .chunks_exact(3)
        .map(|tri| [tri[0], tri[1], tri[2]])
        .collect();

    feature_edges(&positions, &triangles, threshold_degrees)
}

pub fn line_list_mesh(segments: &[[Vec3; 2]]) -> Mesh {
    let positions: Vec<[f32; 3]> = segments
        .iter()
        .flat_map(|[start, end]| [start.to_array(), end.to_array()])
        .collect();

    let mut mesh = Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh
}

/// Build the overlay for `node` the first time it is requested. Geometry from
/// every surface below the node is gathered into node space. The overlay starts
/// hidden and its entity is returned so the caller can show it in the same pass.
pub fn ensure_overlay(
    commands: &mut Commands,
    node: Entity,
    nodes: &SceneNodes,
    meshes: &mut Assets<Mesh>,
    outline: &Handle<StandardMaterial>,
) -> Option<Entity> {
    if nodes.overlay_built(node) {
        return None;
    }

    let mut found_geometry = false;
    let mut segments = Vec::new();
    for surface in nodes.surfaces_of(node) {
        let Some(mesh) = nodes.mesh_of(surface).and_then(|m| meshes.get(&m.0)) else {
            continue;
        };
        let Some(to_node) = nodes.relative_transform(surface, node) else {
            continue;
        };
        found_geometry = true;
        segments.extend(
            mesh_feature_edges(mesh, EDGE_THRESHOLD_DEGREES)
                .into_iter()
                .map(|[start, end]| [to_node.transform_point(start), to_node.transform_point(end)]),
        );
    }

    // Geometry not loaded yet: leave untagged so a later pass retries.
    if !found_geometry {
        return None;
    }
    commands.entity(node).insert(EdgeOverlayBuilt);
    if segments.is_empty() {
        return None;
    }

    debug!("Built edge overlay with {} segments", segments.len());
    let overlay = commands
        .spawn((
            Mesh3d(meshes.add(line_list_mesh(&segments))),
            MeshMaterial3d(outline.clone()),
            Transform::IDENTITY,
            Visibility::Hidden,
            EdgeOverlay,
            ChildOf(node),
        ))
        .id();
    Some(overlay)
}

/// Show or hide every overlay below `node`. Nodes without overlays are untouched.
pub fn set_overlay_visible(
    commands: &mut Commands,
    node: Entity,
    nodes: &mut SceneNodes,
    visible: bool,
) {
    for overlay in nodes.overlays_below(node) {
        nodes.set_visible(commands, overlay, visible);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_yields_its_twelve_edges() {
        let mesh = Mesh::from(Cuboid::new(1.0, 2.0, 3.0));
        let edges = mesh_feature_edges(&mesh, EDGE_THRESHOLD_DEGREES);
        assert_eq!(edges.len(), 12);
        for [start, end] in &edges {
            let delta = (*end - *start).abs();
            let axes_moved = [delta.x, delta.y, delta.z]
                .iter()
                .filter(|d| **d > 1e-4)
                .count();
            assert_eq!(axes_moved, 1, "diagonal edge leaked: {start} -> {end}");
        }
    }

    #[test]
    fn flat_quad_keeps_only_boundary() {
        let positions = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, 1.0),
        ];
        let edges = feature_edges(&positions, &[[0, 1, 2], [0, 2, 3]], 30.0);
        assert_eq!(edges.len(), 4);
    }

    #[test]
    fn shallow_crease_is_dropped_and_sharp_crease_kept() {
        let fold = |height: f32| {
            let positions = [
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(-1.0, height, 0.0),
            ];
            feature_edges(&positions, &[[0, 1, 2], [1, 0, 3]], 30.0).len()
        };
        // 10 degree fold: four open edges, no crease
        assert_eq!(fold(10f32.to_radians().tan()), 4);
        // 60 degree fold: shared edge becomes a feature
        assert_eq!(fold(60f32.to_radians().tan()), 5);
    }

    #[test]
    fn split_vertices_are_welded() {
        let positions = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, 1.0),
        ];
        let edges = feature_edges(&positions, &[[0, 1, 2], [3, 4, 5]], 30.0);
        assert_eq!(edges.len(), 4);
    }

    #[test]
    fn line_meshes_pair_vertices() {
        let mesh = line_list_mesh(&[[Vec3::ZERO, Vec3::X], [Vec3::Y, Vec3::Z]]);
        assert_eq!(mesh.primitive_topology(), PrimitiveTopology::LineList);
        assert_eq!(mesh.count_vertices(), 4);
    }
}
