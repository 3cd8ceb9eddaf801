//! Per-frame, mode-aware procedural animation driven from one clock
use crate::attachments::cargo::{CargoVolume, cargo_scale};
use crate::attachments::sensors::{SensorPulse, pulse_state};
use crate::engine::material_library::MaterialLibrary;
use crate::engine::scene::parts::{EngineGlow, Part, ResolvedParts, RestPose};
use crate::engine::shaders::EnergyBeamMaterial;
use crate::engine::systems::viewer_inputs::{TrunkControl, VehicleMode, ViewerInputs};
use bevy::prelude::*;
use constants::animation::{
    CARGO_EASE_RATE, ENGINE_GLOW_MAX, ENGINE_GLOW_MIN, ENGINE_GLOW_REST, JITTER_AMPLITUDE,
    JITTER_FREQUENCIES, JITTER_ROTATION, MAGMA_PULSE_HZ, PULSE_COUNT, TRUNK_EASE_RATE,
    TRUNK_OPEN_ANGLE, WHEEL_SPIN_RATE,
};
use constants::palette::{MAGMA_EMISSIVE_GAIN, MAGMA_HIGH, MAGMA_LOW, PULSE};
use std::f32::consts::TAU;

/// Exponential approach. The step fraction stays in [0, 1) so the value never
/// passes the target.
pub fn ease_toward(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    let factor = 1.0 - (-rate * dt.max(0.0)).exp();
    current + (target - current) * factor
}

fn lerp_linear(from: LinearRgba, to: LinearRgba, t: f32) -> LinearRgba {
    LinearRgba::new(
        from.red + (to.red - from.red) * t,
        from.green + (to.green - from.green) * t,
        from.blue + (to.blue - from.blue) * t,
        from.alpha + (to.alpha - from.alpha) * t,
    )
}

/// Explicit animation state carried between frames.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct AnimationDriver {
    pub trunk_angle: f32,
    pub wheel_spin: f32,
    pub light_intensity: f32,
    last_elapsed: Option<f32>,
}

/// Everything one frame writes into the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriverFrame {
    pub delta: f32,
    pub trunk_angle: f32,
    pub wheel_spin: f32,
    pub light_intensity: f32,
    /// Magma colour while the engine bay is lit, otherwise `None`.
    pub magma: Option<LinearRgba>,
    pub jitter_offset: Vec3,
    pub jitter_roll: f32,
}

impl AnimationDriver {
    /// Advance to `elapsed` seconds. Time only moves forward; a repeated or
    /// earlier clock value gives a zero step.
    pub fn advance(&mut self, mode: VehicleMode, elapsed: f32) -> DriverFrame {
        let delta = self
            .last_elapsed
            .map(|last| (elapsed - last).max(0.0))
            .unwrap_or(0.0);
        self.last_elapsed = Some(self.last_elapsed.map_or(elapsed, |last| last.max(elapsed)));

        let trunk_target = if mode == VehicleMode::Utility {
            TRUNK_OPEN_ANGLE
        } else {
            0.0
        };
        self.trunk_angle = ease_toward(self.trunk_angle, trunk_target, TRUNK_EASE_RATE, delta);

        let performance = mode == VehicleMode::Performance;
        let mut magma = None;
        let mut jitter_offset = Vec3::ZERO;
        let mut jitter_roll = 0.0;

        if performance {
            self.wheel_spin = (self.wheel_spin + WHEEL_SPIN_RATE * delta).rem_euclid(TAU);

            let wave = 0.5 + 0.5 * (TAU * MAGMA_PULSE_HZ * elapsed).sin();
            magma = Some(lerp_linear(MAGMA_LOW, MAGMA_HIGH, wave));
            self.light_intensity = ENGINE_GLOW_MIN + (ENGINE_GLOW_MAX - ENGINE_GLOW_MIN) * wave;

            let [vertical, lateral, roll] = JITTER_FREQUENCIES;
            jitter_offset = Vec3::new(
                0.0,
                JITTER_AMPLITUDE * (elapsed * vertical).sin(),
                0.5 * JITTER_AMPLITUDE * (elapsed * lateral).sin(),
            );
            jitter_roll = JITTER_ROTATION * (elapsed * roll).sin();
        } else {
            self.light_intensity = ENGINE_GLOW_REST;
        }

        DriverFrame {
            delta,
            trunk_angle: self.trunk_angle,
            wheel_spin: self.wheel_spin,
            light_intensity: self.light_intensity,
            magma,
            jitter_offset,
            jitter_roll,
        }
    }
}

/// Apply one driver frame. Every node is optional; absent parts are skipped.
pub fn drive_vehicle_animation(
    time: Res<Time>,
    inputs: Res<ViewerInputs>,
    trunk: Res<TrunkControl>,
    parts: Res<ResolvedParts>,
    library: Res<MaterialLibrary>,
    mut driver: ResMut<AnimationDriver>,
    mut standard_materials: ResMut<Assets<StandardMaterial>>,
    mut beam_materials: ResMut<Assets<EnergyBeamMaterial>>,
    mut posed: Query<(&mut Transform, &RestPose)>,
    mut pulses: Query<(&mut Transform, &SensorPulse), Without<RestPose>>,
    mut cargo: Query<(&mut Transform, &mut CargoVolume), (Without<RestPose>, Without<SensorPulse>)>,
    mut glows: Query<&mut PointLight, With<EngineGlow>>,
) {
    let elapsed = time.elapsed_secs();
    let frame = driver.advance(inputs.mode, elapsed);

    if let Some((mut transform, rest)) = parts.get(Part::Trunk).and_then(|e| posed.get_mut(e).ok()) {
        transform.rotation = rest.0.rotation * Quat::from_rotation_x(-frame.trunk_angle);
    }

    for wheel in Part::WHEELS {
        if let Some((mut transform, rest)) = parts.get(wheel).and_then(|e| posed.get_mut(e).ok()) {
            transform.rotation = rest.0.rotation * Quat::from_rotation_x(frame.wheel_spin);
        }
    }

    if let Some((mut transform, rest)) = parts.root().and_then(|e| posed.get_mut(e).ok()) {
        let jittered = Transform {
            translation: rest.0.translation + frame.jitter_offset,
            rotation: rest.0.rotation * Quat::from_rotation_z(frame.jitter_roll),
            scale: rest.0.scale,
        };
        transform.set_if_neq(jittered);
    }

    if let Some(colour) = frame.magma {
        if let Some(magma) = standard_materials.get_mut(&library.magma) {
            magma.base_color = colour.into();
            magma.emissive = colour * MAGMA_EMISSIVE_GAIN;
        }
        if let Some(beam) = beam_materials.get_mut(&library.beam) {
            beam.set_time(elapsed);
        }
    }

    for mut light in &mut glows {
        if light.intensity != frame.light_intensity {
            light.intensity = frame.light_intensity;
        }
    }

    if !pulses.is_empty() {
        for (mut transform, pulse) in &mut pulses {
            let (scale, _) = pulse_state(elapsed, pulse.phase);
            transform.scale = Vec3::splat(scale);
        }
        let mut faded = [false; PULSE_COUNT];
        for (_, pulse) in &pulses {
            let Some(slot_faded) = faded.get_mut(pulse.slot) else {
                continue;
            };
            if *slot_faded {
                continue;
            }
            *slot_faded = true;
            let (_, alpha) = pulse_state(elapsed, pulse.phase);
            if let Some(material) = library
                .pulses
                .get(pulse.slot)
                .and_then(|handle| standard_materials.get_mut(handle))
            {
                material.base_color = PULSE.with_alpha(alpha);
            }
        }
    }

    let cargo_target = if trunk.open { 1.0 } else { 0.0 };
    for (mut transform, mut volume) in &mut cargo {
        let openness = ease_toward(volume.openness, cargo_target, CARGO_EASE_RATE, frame.delta);
        if openness != volume.openness {
            volume.openness = openness;
            transform.scale.y = cargo_scale(openness);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn easing_is_monotone_and_never_overshoots() {
        let mut value = 0.0;
        for _ in 0..200 {
            let next = ease_toward(value, 1.0, CARGO_EASE_RATE, 0.05);
            assert!(next >= value);
            assert!(next <= 1.0);
            value = next;
        }
        assert_relative_eq!(value, 1.0, epsilon = 1e-3);
        assert_eq!(ease_toward(0.3, 1.0, CARGO_EASE_RATE, 0.0), 0.3);
    }

    #[test]
    fn repeated_clock_value_is_a_no_op() {
        let mut driver = AnimationDriver::default();
        driver.advance(VehicleMode::Performance, 0.0);
        let first = driver.advance(VehicleMode::Performance, 1.25);
        let state = driver.clone();
        let second = driver.advance(VehicleMode::Performance, 1.25);

        assert_eq!(second.delta, 0.0);
        assert_eq!(first.wheel_spin, second.wheel_spin);
        assert_eq!(first.trunk_angle, second.trunk_angle);
        assert_eq!(driver, state);
    }

    #[test]
    fn trunk_opens_only_in_utility() {
        let mut driver = AnimationDriver::default();
        driver.advance(VehicleMode::Utility, 0.0);
        for step in 1..=120 {
            driver.advance(VehicleMode::Utility, step as f32 / 30.0);
        }
        assert!(driver.trunk_angle > TRUNK_OPEN_ANGLE * 0.99);
        assert!(driver.trunk_angle <= TRUNK_OPEN_ANGLE);

        for step in 121..=240 {
            driver.advance(VehicleMode::Showroom, step as f32 / 30.0);
        }
        assert!(driver.trunk_angle < TRUNK_OPEN_ANGLE * 0.01);
        assert!(driver.trunk_angle >= 0.0);
    }

    #[test]
    fn performance_effects_rest_outside_performance() {
        let mut driver = AnimationDriver::default();
        driver.advance(VehicleMode::Performance, 0.0);
        let hot = driver.advance(VehicleMode::Performance, 0.3);
        assert!(hot.magma.is_some());
        assert!(hot.light_intensity >= ENGINE_GLOW_MIN);
        assert!(hot.wheel_spin > 0.0);

        let calm = driver.advance(VehicleMode::Safety, 0.6);
        assert!(calm.magma.is_none());
        assert_eq!(calm.light_intensity, ENGINE_GLOW_REST);
        assert_eq!(calm.jitter_offset, Vec3::ZERO);
        assert_eq!(calm.jitter_roll, 0.0);
        assert_eq!(calm.wheel_spin, hot.wheel_spin);
    }
}
