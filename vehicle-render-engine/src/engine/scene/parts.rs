use super::hierarchy::{lit_layers, root_space_transform};
use crate::engine::systems::viewer_inputs::Axle;
use bevy::prelude::*;
use constants::animation::ENGINE_GLOW_REST;
use constants::palette::ENGINE_GLOW;
use constants::render_settings::{ENGINE_GLOW_FALLBACK, ENGINE_GLOW_RANGE};
use serde::Serialize;
use std::collections::HashMap;

/// Logical vehicle part the configurator targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Part {
    Shell,
    Trunk,
    Glazing,
    Lights,
    InteriorTrim,
    WheelFrontLeft,
    WheelFrontRight,
    WheelRearLeft,
    WheelRearRight,
    Engine,
    FrontDriveUnit,
    RearDriveUnit,
    Exhaust,
    Airbags,
}

impl Part {
    pub const ALL: [Part; 14] = [
        Part::Shell,
        Part::Trunk,
        Part::Glazing,
        Part::Lights,
        Part::InteriorTrim,
        Part::WheelFrontLeft,
        Part::WheelFrontRight,
        Part::WheelRearLeft,
        Part::WheelRearRight,
        Part::Engine,
        Part::FrontDriveUnit,
        Part::RearDriveUnit,
        Part::Exhaust,
        Part::Airbags,
    ];

    pub const WHEELS: [Part; 4] = [
        Part::WheelFrontLeft,
        Part::WheelFrontRight,
        Part::WheelRearLeft,
        Part::WheelRearRight,
    ];

    /// Parts hidden in showroom and revealed by the other modes.
    pub const INTERNAL: [Part; 5] = [
        Part::Engine,
        Part::FrontDriveUnit,
        Part::RearDriveUnit,
        Part::Exhaust,
        Part::Airbags,
    ];

    /// Candidate node names in priority order. The first alias present wins.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Shell => &["Body", "body", "Shell", "shell", "chassis-shell"],
            Self::Trunk => &["Trunk", "trunk", "Hatch", "hatch", "Tailgate"],
            Self::Glazing => &["Glass", "glass", "Windows", "windows", "glazing"],
            Self::Lights => &["Lights", "lights", "Headlights", "headlights"],
            Self::InteriorTrim => &["Interior", "interior", "Trim", "interior-trim"],
            Self::WheelFrontLeft => &["Wheel_FL", "wheel_fl", "WheelFrontLeft", "front-left-wheel"],
            Self::WheelFrontRight => &["Wheel_FR", "wheel_fr", "WheelFrontRight", "front-right-wheel"],
            Self::WheelRearLeft => &["Wheel_RL", "wheel_rl", "WheelRearLeft", "rear-left-wheel"],
            Self::WheelRearRight => &["Wheel_RR", "wheel_rr", "WheelRearRight", "rear-right-wheel"],
            Self::Engine => &["Engine", "engine", "Motor", "motor", "engine-block"],
            Self::FrontDriveUnit => &["Drivetrain_Front", "drivetrain_front", "FrontAxle", "front-drive-unit"],
            Self::RearDriveUnit => &["Drivetrain_Rear", "drivetrain_rear", "RearAxle", "rear-drive-unit"],
            Self::Exhaust => &["Exhaust", "exhaust"],
            Self::Airbags => &["Airbags", "airbags", "Airbag"],
        }
    }

    pub fn canonical_name(&self) -> &'static str {
        match self {
            Self::Shell => "chassis-shell",
            Self::Trunk => "trunk",
            Self::Glazing => "glazing",
            Self::Lights => "lights",
            Self::InteriorTrim => "interior-trim",
            Self::WheelFrontLeft => "front-left-wheel",
            Self::WheelFrontRight => "front-right-wheel",
            Self::WheelRearLeft => "rear-left-wheel",
            Self::WheelRearRight => "rear-right-wheel",
            Self::Engine => "engine-block",
            Self::FrontDriveUnit => "front-drive-unit",
            Self::RearDriveUnit => "rear-drive-unit",
            Self::Exhaust => "exhaust",
            Self::Airbags => "airbags",
        }
    }

    /// Axle for wheels and drive units; `None` for everything else.
    pub fn axle(&self) -> Option<Axle> {
        match self {
            Self::WheelFrontLeft | Self::WheelFrontRight | Self::FrontDriveUnit => Some(Axle::Front),
            Self::WheelRearLeft | Self::WheelRearRight | Self::RearDriveUnit => Some(Axle::Rear),
            _ => None,
        }
    }

    pub fn is_wheel(&self) -> bool {
        Self::WHEELS.contains(self)
    }
}

/// Placement points for attachments. Resolved like parts but never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    FrontSensor,
    RearSensor,
    Drivetrain,
    Trunk,
    Roof,
}

impl Anchor {
    pub const ALL: [Anchor; 5] = [
        Anchor::FrontSensor,
        Anchor::RearSensor,
        Anchor::Drivetrain,
        Anchor::Trunk,
        Anchor::Roof,
    ];

    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::FrontSensor => &["Anchor_Sensor_Front", "sensor_front", "Radar_Front"],
            Self::RearSensor => &["Anchor_Sensor_Rear", "sensor_rear", "Radar_Rear", "Anchor_BlindSpot"],
            Self::Drivetrain => &["Anchor_Drivetrain", "drivetrain_center"],
            Self::Trunk => &["Anchor_Trunk", "trunk_floor"],
            Self::Roof => &["Anchor_Roof", "roof"],
        }
    }
}

/// First alias, in priority order, matched by any node name. Ties between
/// nodes sharing a name go to the earliest node in traversal order.
pub fn resolve_alias(nodes: &[(Entity, &str)], aliases: &[&str]) -> Option<Entity> {
    aliases.iter().find_map(|alias| {
        nodes
            .iter()
            .find(|(_, name)| name == alias)
            .map(|(entity, _)| *entity)
    })
}

/// Marks the root entity of the loaded vehicle hierarchy.
#[derive(Component, Debug, Default)]
pub struct VehicleRoot;

/// Local transform captured at resolution time. Animated nodes are driven
/// as an offset from it so repeated frames never accumulate drift.
#[derive(Component, Debug, Clone, Copy)]
pub struct RestPose(pub Transform);

/// Point light placed at the engine and animated in performance mode.
#[derive(Component, Debug, Default)]
pub struct EngineGlow;

/// Part and anchor table for the current vehicle. Missing entries are normal.
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct ResolvedParts {
    root: Option<Entity>,
    parts: HashMap<Part, Entity>,
    anchors: HashMap<Anchor, Entity>,
}

impl ResolvedParts {
    pub fn from_nodes(root: Entity, nodes: &[(Entity, &str)]) -> Self {
        let parts = Part::ALL
            .iter()
            .filter_map(|part| resolve_alias(nodes, part.aliases()).map(|e| (*part, e)))
            .collect();
        let anchors = Anchor::ALL
            .iter()
            .filter_map(|anchor| resolve_alias(nodes, anchor.aliases()).map(|e| (*anchor, e)))
            .collect();
        Self {
            root: Some(root),
            parts,
            anchors,
        }
    }

    pub fn root(&self) -> Option<Entity> {
        self.root
    }

    pub fn get(&self, part: Part) -> Option<Entity> {
        self.parts.get(&part).copied()
    }

    pub fn anchor(&self, anchor: Anchor) -> Option<Entity> {
        self.anchors.get(&anchor).copied()
    }

    pub fn missing_parts(&self) -> Vec<Part> {
        Part::ALL
            .into_iter()
            .filter(|part| !self.parts.contains_key(part))
            .collect()
    }

    /// Whether `entity` is the node some part resolved to.
    pub fn is_part_node(&self, entity: Entity) -> bool {
        self.parts.values().any(|node| *node == entity)
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    pub fn anchor_count(&self) -> usize {
        self.anchors.len()
    }
}

/// Rebuild the part table when the vehicle root changes or new named nodes
/// appear under it (glTF scenes spawn over several frames).
pub fn resolve_vehicle_parts(
    mut commands: Commands,
    mut resolved: ResMut<ResolvedParts>,
    roots: Query<Entity, With<VehicleRoot>>,
    names: Query<&Name>,
    children: Query<&Children>,
    added_names: Query<(), Added<Name>>,
    poses: Query<(&Transform, Option<&ChildOf>)>,
    rest_poses: Query<(), With<RestPose>>,
    glows: Query<(Entity, &ChildOf), With<EngineGlow>>,
) {
    let root = roots.iter().next();
    if root == resolved.root() && added_names.is_empty() {
        return;
    }

    let Some(root) = root else {
        if resolved.root().is_some() {
            info!("Vehicle root removed, clearing part table");
            *resolved = ResolvedParts::default();
        }
        return;
    };

    let nodes: Vec<(Entity, &str)> = std::iter::once(root)
        .chain(children.iter_descendants(root))
        .filter_map(|entity| names.get(entity).ok().map(|name| (entity, name.as_str())))
        .collect();

    let table = ResolvedParts::from_nodes(root, &nodes);
    if *resolved != table {
        info!(
            "Resolved {}/{} vehicle parts and {}/{} anchors from {} named nodes",
            table.part_count(),
            Part::ALL.len(),
            table.anchor_count(),
            Anchor::ALL.len(),
            nodes.len()
        );
        let missing = table.missing_parts();
        if !missing.is_empty() {
            debug!(
                "Unresolved parts: {:?}",
                missing.iter().map(Part::canonical_name).collect::<Vec<_>>()
            );
        }
        *resolved = table;
    }

    let animated = std::iter::once(root).chain(
        Part::WHEELS
            .iter()
            .chain(std::iter::once(&Part::Trunk))
            .filter_map(|part| resolved.get(*part)),
    );
    for entity in animated {
        if rest_poses.contains(entity) {
            continue;
        }
        if let Ok((transform, _)) = poses.get(entity) {
            commands.entity(entity).insert(RestPose(*transform));
        }
    }

    // The engine node may arrive after the glow was first placed
    let glow_position = resolved
        .get(Part::Engine)
        .and_then(|engine| root_space_transform(engine, root, &poses))
        .map(|transform| transform.translation)
        .unwrap_or(ENGINE_GLOW_FALLBACK);

    match glows.iter().find(|(_, parent)| parent.parent() == root) {
        Some((glow, _)) => {
            let placed = poses.get(glow).ok().map(|(transform, _)| transform.translation);
            if placed != Some(glow_position) {
                commands
                    .entity(glow)
                    .insert(Transform::from_translation(glow_position));
            }
        }
        None => {
            commands.spawn((
                PointLight {
                    color: ENGINE_GLOW,
                    intensity: ENGINE_GLOW_REST,
                    range: ENGINE_GLOW_RANGE,
                    shadows_enabled: false,
                    ..default()
                },
                Transform::from_translation(glow_position),
                lit_layers(),
                EngineGlow,
                ChildOf(root),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(index: u32) -> Entity {
        Entity::from_raw(index)
    }

    #[test]
    fn alias_priority_beats_traversal_order() {
        let nodes = [(entity(1), "hatch"), (entity(2), "Trunk")];
        assert_eq!(resolve_alias(&nodes, Part::Trunk.aliases()), Some(entity(2)));
    }

    #[test]
    fn duplicate_names_resolve_to_first_node() {
        let nodes = [(entity(7), "Body"), (entity(3), "Body")];
        assert_eq!(resolve_alias(&nodes, Part::Shell.aliases()), Some(entity(7)));
    }

    #[test]
    fn unknown_names_leave_parts_unresolved() {
        let nodes = [(entity(1), "Wheel_FL"), (entity(2), "SpareTyre")];
        let table = ResolvedParts::from_nodes(entity(0), &nodes);
        assert_eq!(table.get(Part::WheelFrontLeft), Some(entity(1)));
        assert_eq!(table.get(Part::WheelFrontRight), None);
        assert_eq!(table.anchor(Anchor::Roof), None);
        assert_eq!(table.part_count(), 1);
        assert_eq!(table.missing_parts().len(), Part::ALL.len() - 1);
    }

    #[test]
    fn anchors_resolve_from_their_own_aliases() {
        let nodes = [(entity(4), "Anchor_BlindSpot"), (entity(5), "Anchor_Trunk")];
        let table = ResolvedParts::from_nodes(entity(0), &nodes);
        assert_eq!(table.anchor(Anchor::RearSensor), Some(entity(4)));
        assert_eq!(table.anchor(Anchor::Trunk), Some(entity(5)));
        assert_eq!(table.get(Part::Trunk), None);
    }

    #[test]
    fn axles_cover_wheels_and_drive_units() {
        assert_eq!(Part::WheelRearRight.axle(), Some(Axle::Rear));
        assert_eq!(Part::FrontDriveUnit.axle(), Some(Axle::Front));
        assert_eq!(Part::Exhaust.axle(), None);
    }
}
