use super::mutation::{ModeContext, configure};
use crate::attachments::{ModeAttachment, SpawnContext, plan_attachments, spawn_attachment};
use crate::engine::material_library::{MaterialLibrary, PrimitiveLibrary, assign_material};
use crate::engine::scene::edge_overlay::{ensure_overlay, set_overlay_visible};
use crate::engine::scene::hierarchy::{DrawOrder, SceneNodes};
use crate::engine::scene::parts::ResolvedParts;
use crate::engine::systems::viewer_inputs::ViewerInputs;
use crate::rpc::web_rpc::WebRpcInterface;
use bevy::prelude::*;

/// Run one configurator pass whenever the inputs or the part table change.
/// Settled part states are written first, then the previous mode's attachments
/// are torn down and the new set is spawned.
pub fn apply_vehicle_mode(
    mut commands: Commands,
    inputs: Res<ViewerInputs>,
    parts: Res<ResolvedParts>,
    library: Res<MaterialLibrary>,
    primitives: Res<PrimitiveLibrary>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut nodes: SceneNodes,
    attachments: Query<Entity, With<ModeAttachment>>,
    rpc: Option<ResMut<WebRpcInterface>>,
) {
    if !inputs.is_changed() && !parts.is_changed() {
        return;
    }
    let Some(root) = parts.root() else {
        return;
    };

    let context = ModeContext::from(&*inputs);
    let states = configure(&context).settle();

    let mut touched = 0;
    for (part, state) in &states {
        let Some(node) = parts.get(*part) else {
            continue;
        };
        touched += 1;

        if let Some(visible) = state.visible {
            nodes.set_visible(&mut commands, node, visible);
        }

        let surfaces = nodes.surfaces_of(node);
        if let Some(material) = state.material {
            let handle = library.handle(material);
            for surface in &surfaces {
                assign_material(&mut commands, *surface, &handle);
            }
        }

        if let Some(order) = state.draw_order {
            commands.entity(node).insert(DrawOrder(order));
            for surface in surfaces.iter().filter(|surface| **surface != node) {
                commands.entity(*surface).insert(DrawOrder(order));
            }
        }

        let fresh_overlay = if state.ensure_overlay {
            ensure_overlay(&mut commands, node, &nodes, &mut meshes, &library.outline)
        } else {
            None
        };

        if let Some(visible) = state.overlay_visible {
            set_overlay_visible(&mut commands, node, &mut nodes, visible);
            if visible {
                if let Some(overlay) = fresh_overlay {
                    commands.entity(overlay).insert(Visibility::Inherited);
                }
            }
        }
    }

    for attachment in &attachments {
        commands.entity(attachment).despawn();
    }

    let spawn_context = SpawnContext {
        root,
        mode: context.mode,
        parts: &parts,
        nodes: &nodes,
        library: &library,
        primitives: &primitives,
    };
    let spawned: Vec<_> = plan_attachments(&context, &parts)
        .into_iter()
        .filter(|spec| {
            spawn_attachment(&mut commands, &mut meshes, spec, &spawn_context).is_some()
        })
        .collect();

    info!(
        "Applied {} mode ({}) to {} parts, {} attachments",
        context.mode,
        context.drivetrain,
        touched,
        spawned.len()
    );

    if let Some(mut rpc) = rpc {
        let kinds: Vec<_> = spawned.iter().map(|spec| spec.kind()).collect();
        let label_texts: Vec<String> = spawned.iter().flat_map(|spec| spec.labels()).collect();
        rpc.send_notification(
            "mode_applied",
            serde_json::json!({
                "mode": context.mode,
                "drivetrain": context.drivetrain,
                "body_style": context.body_style,
                "attachments": kinds,
                "labels": label_texts,
            }),
        );
    }
}
