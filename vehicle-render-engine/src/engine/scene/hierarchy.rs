use super::edge_overlay::{EdgeOverlay, EdgeOverlayBuilt};
use super::parts::ResolvedParts;
use crate::attachments::AttachmentPart;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::render::view::RenderLayers;
use constants::render_settings::{DRAW_ORDER_XRAY, SCENE_RENDER_LAYER, XRAY_RENDER_LAYER};

const MAX_HIERARCHY_DEPTH: usize = 64;

/// Compositing order. Surfaces at or above the x-ray order are drawn by the
/// x-ray camera after the whole scene, so nothing in the scene occludes them.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct DrawOrder(pub i32);

impl DrawOrder {
    pub fn is_xray(self) -> bool {
        self.0 >= DRAW_ORDER_XRAY
    }

    /// Camera layer a surface with this order is rendered on.
    pub fn render_layers(self) -> RenderLayers {
        if self.is_xray() {
            RenderLayers::layer(XRAY_RENDER_LAYER)
        } else {
            RenderLayers::layer(SCENE_RENDER_LAYER)
        }
    }
}

/// Layers for lights, which must reach both the scene and the x-ray pass.
pub fn lit_layers() -> RenderLayers {
    RenderLayers::from_layers(&[SCENE_RENDER_LAYER, XRAY_RENDER_LAYER])
}

/// Move surfaces whose draw order changed onto the matching camera layer.
pub fn sync_draw_layers(
    mut commands: Commands,
    changed: Query<(Entity, &DrawOrder, Option<&RenderLayers>), Changed<DrawOrder>>,
) {
    for (entity, order, current) in &changed {
        let layers = order.render_layers();
        if current != Some(&layers) {
            commands.entity(entity).insert(layers);
        }
    }
}

/// Transform of `entity` expressed in the space of its ancestor `root`,
/// composed from local transforms so it is valid before transform propagation.
pub fn root_space_transform(
    entity: Entity,
    root: Entity,
    poses: &Query<(&Transform, Option<&ChildOf>)>,
) -> Option<Transform> {
    let mut accumulated = Transform::IDENTITY;
    let mut current = entity;

    for _ in 0..MAX_HIERARCHY_DEPTH {
        if current == root {
            return Some(accumulated);
        }
        let (local, parent) = poses.get(current).ok()?;
        accumulated = local.mul_transform(accumulated);
        current = parent?.parent();
    }

    None
}

/// Read access to the vehicle hierarchy plus visibility writes, shared by the
/// configurator and the attachment spawner.
#[derive(SystemParam)]
pub struct SceneNodes<'w, 's> {
    children: Query<'w, 's, &'static Children>,
    poses: Query<'w, 's, (&'static Transform, Option<&'static ChildOf>)>,
    surfaces: Query<'w, 's, &'static Mesh3d, (Without<EdgeOverlay>, Without<AttachmentPart>)>,
    overlays: Query<'w, 's, (), With<EdgeOverlay>>,
    overlay_built: Query<'w, 's, (), With<EdgeOverlayBuilt>>,
    visibility: Query<'w, 's, &'static mut Visibility>,
    parts: Res<'w, ResolvedParts>,
}

impl SceneNodes<'_, '_> {
    /// `node` and every descendant that belongs to it. Descent stops at nodes
    /// resolved as another part, so nested parts keep their own styling.
    pub fn owned_by(&self, node: Entity) -> Vec<Entity> {
        let mut owned = Vec::new();
        let mut stack = vec![(node, 0)];
        while let Some((entity, depth)) = stack.pop() {
            if entity != node && self.parts.is_part_node(entity) {
                continue;
            }
            owned.push(entity);
            if depth >= MAX_HIERARCHY_DEPTH {
                continue;
            }
            if let Ok(children) = self.children.get(entity) {
                let children: &[Entity] = children;
                stack.extend(children.iter().rev().map(|child| (*child, depth + 1)));
            }
        }
        owned
    }

    /// Surfaces owned by `node` carrying renderable geometry of their own.
    pub fn surfaces_of(&self, node: Entity) -> Vec<Entity> {
        self.owned_by(node)
            .into_iter()
            .filter(|entity| self.surfaces.contains(*entity))
            .collect()
    }

    pub fn mesh_of(&self, surface: Entity) -> Option<&Mesh3d> {
        self.surfaces.get(surface).ok()
    }

    pub fn relative_transform(&self, entity: Entity, ancestor: Entity) -> Option<Transform> {
        root_space_transform(entity, ancestor, &self.poses)
    }

    pub fn translation_in(&self, entity: Entity, ancestor: Entity) -> Option<Vec3> {
        self.relative_transform(entity, ancestor)
            .map(|transform| transform.translation)
    }

    pub fn overlay_built(&self, node: Entity) -> bool {
        self.overlay_built.contains(node)
    }

    /// Overlay entities owned by `node`.
    pub fn overlays_below(&self, node: Entity) -> Vec<Entity> {
        self.owned_by(node)
            .into_iter()
            .filter(|entity| self.overlays.contains(*entity))
            .collect()
    }

    pub fn set_visible(&mut self, commands: &mut Commands, entity: Entity, visible: bool) {
        let target = if visible {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        match self.visibility.get_mut(entity) {
            Ok(mut visibility) => {
                visibility.set_if_neq(target);
            }
            Err(_) => {
                commands.entity(entity).insert(target);
            }
        }
    }
}
