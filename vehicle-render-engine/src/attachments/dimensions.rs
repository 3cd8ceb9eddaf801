use super::{AttachmentKind, AttachmentLabel, AttachmentPart, SpawnContext};
use crate::engine::scene::parts::{Anchor, Part};
use crate::engine::systems::viewer_inputs::VehicleDimensions;
use bevy::prelude::*;
use constants::defaults::DEFAULT_ROOF_HEIGHT;
use constants::render_settings::{DRAW_LINE_WIDTH, MEASURE_OFFSET};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub start: Vec3,
    pub end: Vec3,
    pub distance: f32,
}

impl Measurement {
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self {
            start,
            end,
            distance: start.distance(end),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionAxis {
    Length,
    Width,
    Height,
}

/// The three measurement lines. The height line starts exactly where the
/// width line ends.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct DimensionSet {
    pub length: Measurement,
    pub width: Measurement,
    pub height: Measurement,
}

/// One rendered line of a dimension set.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasurementLine(pub DimensionAxis);

pub fn dimension_label(millimetres: f32) -> String {
    format!("{:.0} mm", millimetres)
}

fn on_ground(point: Vec3) -> Vec3 {
    Vec3::new(point.x, 0.0, point.z)
}

/// Lines from wheel positions in vehicle space: length along the left side
/// from rear axle to front axle, width across the front, height rising from
/// the width line's end to the roof.
pub fn dimension_lines(
    front_left: Vec3,
    front_right: Vec3,
    rear_left: Vec3,
    roof_height: f32,
) -> DimensionSet {
    let (front_left, front_right, rear_left) =
        (on_ground(front_left), on_ground(front_right), on_ground(rear_left));
    let outward = (front_left - front_right).normalize_or_zero();
    let forward = (front_left - rear_left).normalize_or_zero();

    let length = Measurement::new(
        rear_left + outward * MEASURE_OFFSET,
        front_left + outward * MEASURE_OFFSET,
    );
    let width = Measurement::new(
        front_left + forward * MEASURE_OFFSET,
        front_right + forward * MEASURE_OFFSET,
    );
    let height = Measurement::new(width.end, width.end + Vec3::Y * roof_height);

    DimensionSet {
        length,
        width,
        height,
    }
}

fn spawn_line(
    commands: &mut Commands,
    parent: Entity,
    measurement: &Measurement,
    axis: DimensionAxis,
    label: String,
    context: &SpawnContext,
) {
    let delta = measurement.end - measurement.start;
    if measurement.distance <= f32::EPSILON {
        return;
    }

    let rotation = Quat::from_rotation_arc(Vec3::X, delta / measurement.distance);
    let midpoint = (measurement.start + measurement.end) * 0.5;
    commands.spawn((
        Mesh3d(context.primitives.unit_cube.clone()),
        MeshMaterial3d(context.library.measure_line.clone()),
        Transform {
            translation: midpoint,
            rotation,
            scale: Vec3::new(measurement.distance, DRAW_LINE_WIDTH, DRAW_LINE_WIDTH),
        },
        MeasurementLine(axis),
        AttachmentLabel(label),
        AttachmentPart,
        ChildOf(parent),
    ));
}

pub fn spawn_dimensions(
    commands: &mut Commands,
    labels: &VehicleDimensions,
    context: &SpawnContext,
) -> Option<Entity> {
    let front_left = context.position_of(context.parts.get(Part::WheelFrontLeft)?)?;
    let front_right = context.position_of(context.parts.get(Part::WheelFrontRight)?)?;
    let rear_left = context.position_of(context.parts.get(Part::WheelRearLeft)?)?;
    let roof_height = context
        .parts
        .anchor(Anchor::Roof)
        .and_then(|roof| context.position_of(roof))
        .map(|roof| roof.y)
        .unwrap_or(DEFAULT_ROOF_HEIGHT);

    let set = dimension_lines(front_left, front_right, rear_left, roof_height);
    let root = commands
        .spawn((
            Transform::IDENTITY,
            Visibility::default(),
            set,
            context.tag(AttachmentKind::Dimensions),
            AttachmentPart,
            ChildOf(context.root),
        ))
        .id();

    let lines = [
        (&set.length, DimensionAxis::Length, labels.length_mm),
        (&set.width, DimensionAxis::Width, labels.width_mm),
        (&set.height, DimensionAxis::Height, labels.height_mm),
    ];
    for (measurement, axis, millimetres) in lines {
        spawn_line(
            commands,
            root,
            measurement,
            axis,
            dimension_label(millimetres),
            context,
        );
    }

    Some(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sedan() -> DimensionSet {
        dimension_lines(
            Vec3::new(0.8, 0.33, 1.35),
            Vec3::new(-0.8, 0.33, 1.35),
            Vec3::new(0.8, 0.33, -1.35),
            1.45,
        )
    }

    #[test]
    fn height_starts_where_width_ends() {
        let set = sedan();
        assert_eq!(set.height.start, set.width.end);
        assert_relative_eq!(set.height.distance, 1.45);
        assert_relative_eq!(set.height.end.y - set.height.start.y, 1.45);
    }

    #[test]
    fn length_runs_rear_to_front_outside_the_left_wheels() {
        let set = sedan();
        assert_relative_eq!(set.length.distance, 2.7, epsilon = 1e-5);
        assert!(set.length.end.z > set.length.start.z);
        assert_relative_eq!(set.length.start.x, 0.8 + MEASURE_OFFSET, epsilon = 1e-5);
        assert_relative_eq!(set.length.start.y, 0.0);
    }

    #[test]
    fn width_sits_ahead_of_the_front_axle() {
        let set = sedan();
        assert_relative_eq!(set.width.distance, 1.6, epsilon = 1e-5);
        assert_relative_eq!(set.width.start.z, 1.35 + MEASURE_OFFSET, epsilon = 1e-5);
    }

    #[test]
    fn invariants_hold_for_asymmetric_layouts() {
        // Deterministic scatter of skewed, offset and lopsided wheel layouts
        let mut seed = 0x2545_f491_u32;
        let mut next = move |span: f32| {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            (seed as f32 / u32::MAX as f32 - 0.5) * span
        };

        for _ in 0..200 {
            let front_left = Vec3::new(0.7 + next(0.4), 0.3 + next(0.2), 1.2 + next(0.8));
            let front_right = Vec3::new(-0.7 + next(0.4), 0.3 + next(0.2), 1.2 + next(0.8));
            let rear_left = Vec3::new(0.7 + next(0.4), 0.3 + next(0.2), -1.2 + next(0.8));
            let roof = 1.2 + next(0.8).abs();

            let set = dimension_lines(front_left, front_right, rear_left, roof);

            assert_eq!(set.height.start, set.width.end);
            assert_relative_eq!(set.height.distance, roof, epsilon = 1e-5);
            assert_relative_eq!(set.height.end.x, set.height.start.x);
            assert_relative_eq!(set.height.end.z, set.height.start.z);

            for point in [set.length.start, set.length.end, set.width.start, set.width.end] {
                assert_eq!(point.y, 0.0);
            }
            assert_relative_eq!(
                set.length.distance,
                on_ground(front_left).distance(on_ground(rear_left)),
                epsilon = 1e-4
            );
            assert_relative_eq!(
                set.width.distance,
                on_ground(front_left).distance(on_ground(front_right)),
                epsilon = 1e-4
            );
        }
    }
}
