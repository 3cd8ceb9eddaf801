use crate::engine::scene::parts::ResolvedParts;
use crate::engine::systems::viewer_inputs::{TrunkControl, ViewerInputs};
use crate::rpc::web_rpc::WebRpcInterface;
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;

/// Native overlay text showing frame rate and the active viewer inputs.
#[derive(Component)]
pub struct HudText;

pub fn fps_notification_system(
    mut rpc_interface: ResMut<WebRpcInterface>,
    diagnostics: Res<DiagnosticsStore>,
    mut last_send_time: Local<f32>,
    time: Res<Time>,
) {
    let current_time = time.elapsed_secs();

    // Send FPS every 0.5 seconds
    if current_time - *last_send_time >= 0.5 {
        if let Some(fps) = diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) {
            if let Some(value) = fps.smoothed() {
                rpc_interface.send_notification(
                    "fps_update",
                    serde_json::json!({
                        "fps": value as f32
                    }),
                );
                *last_send_time = current_time;
            }
        }
    }
}

pub fn create_native_overlays(mut commands: Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(1., 1., 1.)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                HudText,
            ));
        });
}

pub fn hud_line(inputs: &ViewerInputs, trunk: &TrunkControl, parts: &ResolvedParts, fps: Option<f64>) -> String {
    let fps = fps.map_or_else(|| "--".to_string(), |value| format!("{value:.1}"));
    format!(
        "{} | {} | {} | trunk {} | parts {} | FPS: {}",
        inputs.mode,
        inputs.drivetrain,
        if inputs.body_style.is_empty() { "default" } else { inputs.body_style.as_str() },
        if trunk.open { "open" } else { "closed" },
        parts.part_count(),
        fps
    )
}

pub fn hud_text_update_system(
    diagnostics: Res<DiagnosticsStore>,
    inputs: Res<ViewerInputs>,
    trunk: Res<TrunkControl>,
    parts: Res<ResolvedParts>,
    mut query: Query<&mut Text, With<HudText>>,
) {
    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps| fps.smoothed());
    for mut text in &mut query {
        text.0 = hud_line(&inputs, &trunk, &parts, fps);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::systems::viewer_inputs::{Drivetrain, VehicleMode};

    #[test]
    fn hud_line_names_mode_and_drivetrain() {
        let inputs = ViewerInputs {
            mode: VehicleMode::Utility,
            drivetrain: Drivetrain::FourWheel,
            ..Default::default()
        };
        let line = hud_line(&inputs, &TrunkControl { open: true }, &ResolvedParts::default(), None);
        assert_eq!(line, "utility | 4WD | default | trunk open | parts 0 | FPS: --");
    }
}
