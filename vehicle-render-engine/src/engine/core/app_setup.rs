// Standard library and external crates
use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy::render::camera::ClearColorConfig;
use bevy::render::view::RenderLayers;
use bevy_common_assets::json::JsonAssetPlugin;

// Crate engine modules
use crate::engine::assets::vehicle_manifest::VehicleManifest;
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::variant_loader::{VariantLoader, start_loading, sync_vehicle_variant};
use crate::engine::scene::hierarchy::lit_layers;
use crate::engine::shaders::{EnergyBeamMaterial, GhostMaterial};
use crate::engine::systems::fps_tracking::fps_notification_system;
use crate::engine::{VehicleModePlugin, VehicleModeSet};
use constants::render_settings::{SCENE_RENDER_LAYER, XRAY_RENDER_LAYER};
// Create Web RPC modules
use crate::rpc::web_rpc::{RpcSet, WebRpcPlugin};

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::systems::{
    fps_tracking::{create_native_overlays, hud_text_update_system},
    viewer_inputs::handle_mode_shortcuts,
};

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        // Custom materials must exist before the library builds its handles.
        .add_plugins(MaterialPlugin::<GhostMaterial>::default())
        .add_plugins(MaterialPlugin::<EnergyBeamMaterial>::default())
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Registers VehicleManifest as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<VehicleManifest>::new(&["json"]))
        .add_plugins(WebRpcPlugin)
        .add_plugins(VehicleModePlugin);

    app.init_resource::<VariantLoader>();

    app.add_systems(Startup, (setup, start_loading).chain())
        .add_systems(
            Update,
            (
                sync_vehicle_variant
                    .after(RpcSet::Receive)
                    .before(VehicleModeSet),
                fps_notification_system.before(RpcSet::Send),
            ),
        );

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(Startup, create_native_overlays).add_systems(
            Update,
            (
                handle_mode_shortcuts.before(VehicleModeSet),
                hud_text_update_system.after(VehicleModeSet),
            ),
        );
    }

    app
}

fn spawn_lighting(commands: &mut Commands) {
    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::ZYX,
            0.0,
            1.0,
            -std::f32::consts::FRAC_PI_4,
        )),
        lit_layers(),
    ));
}

/// Second camera riding on the main one. It renders only x-ray surfaces, after
/// the scene, keeping the scene's colour and starting from a cleared depth
/// buffer, so the body shell can never hide what it draws.
pub fn xray_camera() -> impl Bundle {
    (
        Camera3d::default(),
        Camera {
            order: 1,
            clear_color: ClearColorConfig::None,
            ..default()
        },
        Transform::IDENTITY,
        RenderLayers::layer(XRAY_RENDER_LAYER),
    )
}

fn spawn_camera(commands: &mut Commands) {
    commands
        .spawn((
            Camera3d::default(),
            Transform::from_xyz(-4.5, 2.2, 5.5).looking_at(Vec3::new(0.0, 0.6, 0.0), Vec3::Y),
            RenderLayers::layer(SCENE_RENDER_LAYER),
        ))
        .with_children(|camera| {
            camera.spawn(xray_camera());
        });
}

// Startup system that only handles basic initialisation
fn setup(mut commands: Commands) {
    println!("=== Vehicle viewer starting ===");
    spawn_lighting(&mut commands);
    spawn_camera(&mut commands);
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
