//! Vehicle viewer engine: part resolution, mode configuration and animation.

use bevy::prelude::*;

use crate::engine::animation::{AnimationDriver, drive_vehicle_animation};
use crate::engine::configurator::apply::apply_vehicle_mode;
use crate::engine::material_library::{MaterialLibrary, PrimitiveLibrary};
use crate::engine::scene::hierarchy::sync_draw_layers;
use crate::engine::scene::parts::{ResolvedParts, resolve_vehicle_parts};
use crate::engine::systems::viewer_inputs::{TrunkControl, ViewerInputs};
use crate::rpc::web_rpc::RpcSet;

pub mod animation;
pub mod assets;
pub mod configurator;
pub mod core;
pub mod loading;
pub mod material_library;
pub mod scene;
pub mod shaders;
pub mod systems;

/// Resolve, configure, layer and animate, in that order, once per frame.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VehicleModeSet;

/// Core viewer systems. Requires `Assets<Mesh>`, `Assets<StandardMaterial>`,
/// the two custom material asset stores and `Time`; the material plugins
/// themselves are registered by the app so headless tests can run without a
/// renderer.
pub struct VehicleModePlugin;

impl Plugin for VehicleModePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ViewerInputs>()
            .init_resource::<TrunkControl>()
            .init_resource::<ResolvedParts>()
            .init_resource::<AnimationDriver>()
            .init_resource::<MaterialLibrary>()
            .init_resource::<PrimitiveLibrary>()
            .configure_sets(
                Update,
                VehicleModeSet
                    .after(RpcSet::Receive)
                    .before(RpcSet::Send),
            )
            .add_systems(
                Update,
                (
                    resolve_vehicle_parts,
                    apply_vehicle_mode,
                    sync_draw_layers,
                    drive_vehicle_animation,
                )
                    .chain()
                    .in_set(VehicleModeSet),
            );
    }
}
