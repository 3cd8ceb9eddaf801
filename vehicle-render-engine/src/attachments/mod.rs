//! Mode-owned procedural geometry: sensor pulses, energy beams, the output
//! gauge, the cargo volume and dimension lines.
//!
//! Planning is pure (`plan_attachments`) and spawning is per kind. Every
//! attachment root carries `ModeAttachment` and every entity in its tree carries
//! `AttachmentPart`, so a configurator pass can tear the whole set down at once.

pub mod beams;
pub mod cargo;
pub mod dimensions;
pub mod gauge;
pub mod sensors;

use crate::engine::configurator::mutation::ModeContext;
use crate::engine::material_library::{MaterialLibrary, PrimitiveLibrary};
use crate::engine::scene::hierarchy::SceneNodes;
use crate::engine::scene::parts::{Anchor, Part, ResolvedParts};
use crate::engine::systems::viewer_inputs::{Axle, VehicleDimensions, VehicleMode};
use bevy::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttachmentKind {
    SensorScan,
    EnergyBeam,
    OutputGauge,
    CargoVolume,
    Dimensions,
}

/// One attachment the active mode wants, with the data needed to build it.
#[derive(Debug, Clone, PartialEq)]
pub enum AttachmentSpec {
    SensorScan { anchor: Anchor },
    EnergyBeam { wheel: Part },
    OutputGauge { horsepower: f32 },
    CargoVolume { capacity_liters: f32 },
    Dimensions { labels: VehicleDimensions },
}

impl AttachmentSpec {
    pub fn kind(&self) -> AttachmentKind {
        match self {
            Self::SensorScan { .. } => AttachmentKind::SensorScan,
            Self::EnergyBeam { .. } => AttachmentKind::EnergyBeam,
            Self::OutputGauge { .. } => AttachmentKind::OutputGauge,
            Self::CargoVolume { .. } => AttachmentKind::CargoVolume,
            Self::Dimensions { .. } => AttachmentKind::Dimensions,
        }
    }

    /// Label texts the spawned attachment will carry.
    pub fn labels(&self) -> Vec<String> {
        match self {
            Self::SensorScan { .. } | Self::EnergyBeam { .. } => Vec::new(),
            Self::OutputGauge { horsepower } => vec![gauge::gauge_label(*horsepower)],
            Self::CargoVolume { capacity_liters } => {
                vec![cargo::capacity_label(*capacity_liters)]
            }
            Self::Dimensions { labels } => [labels.length_mm, labels.width_mm, labels.height_mm]
                .iter()
                .map(|millimetres| dimensions::dimension_label(*millimetres))
                .collect(),
        }
    }
}

/// Root of an attachment tree, owned by the mode that spawned it.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct ModeAttachment {
    pub owner: VehicleMode,
    pub kind: AttachmentKind,
}

/// Present on every entity of an attachment tree. Keeps attachment geometry out
/// of material swaps and edge extraction.
#[derive(Component, Debug, Default)]
pub struct AttachmentPart;

/// Display text for an attachment (horsepower, capacity, a dimension).
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct AttachmentLabel(pub String);

/// Source node a beam is routed from: the drivetrain anchor when present,
/// otherwise the drive unit on the wheel's axle.
pub fn beam_source(parts: &ResolvedParts, wheel: Part) -> Option<Entity> {
    parts.anchor(Anchor::Drivetrain).or_else(|| {
        let unit = match wheel.axle()? {
            Axle::Front => Part::FrontDriveUnit,
            Axle::Rear => Part::RearDriveUnit,
        };
        parts.get(unit)
    })
}

/// Attachments for the context's mode, limited to what the resolved nodes
/// can actually host.
pub fn plan_attachments(context: &ModeContext, parts: &ResolvedParts) -> Vec<AttachmentSpec> {
    let mut plan = Vec::new();

    match context.mode {
        VehicleMode::Showroom => {}
        VehicleMode::Safety => {
            if context.tech.has_front_sensors() && parts.anchor(Anchor::FrontSensor).is_some() {
                plan.push(AttachmentSpec::SensorScan {
                    anchor: Anchor::FrontSensor,
                });
            }
            if context.tech.has_rear_sensors() && parts.anchor(Anchor::RearSensor).is_some() {
                plan.push(AttachmentSpec::SensorScan {
                    anchor: Anchor::RearSensor,
                });
            }
        }
        VehicleMode::Performance => {
            for wheel in Part::WHEELS {
                let powered = wheel
                    .axle()
                    .is_some_and(|axle| context.drivetrain.powers(axle));
                if powered && parts.get(wheel).is_some() && beam_source(parts, wheel).is_some() {
                    plan.push(AttachmentSpec::EnergyBeam { wheel });
                }
            }
            plan.push(AttachmentSpec::OutputGauge {
                horsepower: context.tech.engine_hp(),
            });
        }
        VehicleMode::Utility => {
            if parts.anchor(Anchor::Trunk).is_some() {
                plan.push(AttachmentSpec::CargoVolume {
                    capacity_liters: context.tech.trunk_capacity_liters(),
                });
            }
            let wheels_present = [Part::WheelFrontLeft, Part::WheelFrontRight, Part::WheelRearLeft]
                .iter()
                .all(|wheel| parts.get(*wheel).is_some());
            if wheels_present {
                plan.push(AttachmentSpec::Dimensions {
                    labels: context.tech.dimensions(),
                });
            }
        }
    }

    plan
}

/// Everything a builder needs to place an attachment under the vehicle.
pub struct SpawnContext<'a, 'w, 's> {
    pub root: Entity,
    pub mode: VehicleMode,
    pub parts: &'a ResolvedParts,
    pub nodes: &'a SceneNodes<'w, 's>,
    pub library: &'a MaterialLibrary,
    pub primitives: &'a PrimitiveLibrary,
}

impl SpawnContext<'_, '_, '_> {
    pub fn tag(&self, kind: AttachmentKind) -> ModeAttachment {
        ModeAttachment {
            owner: self.mode,
            kind,
        }
    }

    /// Position of a resolved node in vehicle root space.
    pub fn position_of(&self, entity: Entity) -> Option<Vec3> {
        self.nodes.translation_in(entity, self.root)
    }
}

/// Build one planned attachment and return its root. `None` when a node it
/// depends on disappeared between planning and spawning.
pub fn spawn_attachment(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    spec: &AttachmentSpec,
    context: &SpawnContext,
) -> Option<Entity> {
    match spec {
        AttachmentSpec::SensorScan { anchor } => {
            let anchor_entity = context.parts.anchor(*anchor)?;
            Some(sensors::spawn_sensor_scan(commands, anchor_entity, context))
        }
        AttachmentSpec::EnergyBeam { wheel } => {
            beams::spawn_energy_beam(commands, meshes, *wheel, context)
        }
        AttachmentSpec::OutputGauge { horsepower } => {
            Some(gauge::spawn_output_gauge(commands, meshes, *horsepower, context))
        }
        AttachmentSpec::CargoVolume { capacity_liters } => {
            let anchor = context.parts.anchor(Anchor::Trunk)?;
            Some(cargo::spawn_cargo_volume(commands, anchor, *capacity_liters, context))
        }
        AttachmentSpec::Dimensions { labels } => {
            dimensions::spawn_dimensions(commands, labels, context)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::systems::viewer_inputs::{Drivetrain, TechMetadata};

    fn table(names: &[&str]) -> ResolvedParts {
        let nodes: Vec<(Entity, &str)> = names
            .iter()
            .enumerate()
            .map(|(i, name)| (Entity::from_raw(i as u32 + 1), *name))
            .collect();
        ResolvedParts::from_nodes(Entity::from_raw(0), &nodes)
    }

    fn full_vehicle() -> ResolvedParts {
        table(&[
            "Body",
            "Trunk",
            "Wheel_FL",
            "Wheel_FR",
            "Wheel_RL",
            "Wheel_RR",
            "Engine",
            "Drivetrain_Front",
            "Drivetrain_Rear",
            "Anchor_Sensor_Front",
            "Anchor_Sensor_Rear",
            "Anchor_Drivetrain",
            "Anchor_Trunk",
            "Anchor_Roof",
        ])
    }

    fn context(mode: VehicleMode, drivetrain: Drivetrain, tech: TechMetadata) -> ModeContext {
        ModeContext {
            mode,
            drivetrain,
            tech,
            ..Default::default()
        }
    }

    #[test]
    fn showroom_plans_nothing() {
        let plan = plan_attachments(
            &context(VehicleMode::Showroom, Drivetrain::Awd, TechMetadata::default()),
            &full_vehicle(),
        );
        assert!(plan.is_empty());
    }

    #[test]
    fn sensor_flags_gate_each_anchor_independently() {
        let tech = TechMetadata::default().with("has_rear_sensors", false);
        let plan = plan_attachments(
            &context(VehicleMode::Safety, Drivetrain::Awd, tech),
            &full_vehicle(),
        );
        assert_eq!(
            plan,
            vec![AttachmentSpec::SensorScan {
                anchor: Anchor::FrontSensor
            }]
        );
    }

    #[test]
    fn missing_front_anchor_still_plans_rear_scan() {
        let parts = table(&["Body", "Anchor_BlindSpot"]);
        let plan = plan_attachments(
            &context(VehicleMode::Safety, Drivetrain::Awd, TechMetadata::default()),
            &parts,
        );
        assert_eq!(
            plan,
            vec![AttachmentSpec::SensorScan {
                anchor: Anchor::RearSensor
            }]
        );
    }

    #[test]
    fn beams_follow_powered_wheels() {
        let plan = plan_attachments(
            &context(VehicleMode::Performance, Drivetrain::Fwd, TechMetadata::default()),
            &full_vehicle(),
        );
        assert_eq!(
            plan,
            vec![
                AttachmentSpec::EnergyBeam {
                    wheel: Part::WheelFrontLeft
                },
                AttachmentSpec::EnergyBeam {
                    wheel: Part::WheelFrontRight
                },
                AttachmentSpec::OutputGauge { horsepower: 220.0 },
            ]
        );
    }

    #[test]
    fn gauge_is_planned_without_any_anchor() {
        let plan = plan_attachments(
            &context(
                VehicleMode::Performance,
                Drivetrain::Awd,
                TechMetadata::default().with("engine_hp", 480),
            ),
            &table(&["Body"]),
        );
        assert_eq!(plan, vec![AttachmentSpec::OutputGauge { horsepower: 480.0 }]);
    }

    #[test]
    fn utility_needs_trunk_anchor_and_wheels() {
        let plan = plan_attachments(
            &context(VehicleMode::Utility, Drivetrain::Awd, TechMetadata::default()),
            &full_vehicle(),
        );
        assert_eq!(
            plan.iter().map(AttachmentSpec::kind).collect::<Vec<_>>(),
            vec![AttachmentKind::CargoVolume, AttachmentKind::Dimensions]
        );

        let sparse = plan_attachments(
            &context(VehicleMode::Utility, Drivetrain::Awd, TechMetadata::default()),
            &table(&["Body", "Wheel_FL"]),
        );
        assert!(sparse.is_empty());
    }
}
