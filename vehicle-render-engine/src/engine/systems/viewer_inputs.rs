use bevy::prelude::*;
use constants::defaults::{
    DEFAULT_ENGINE_HP, DEFAULT_HAS_FRONT_SENSORS, DEFAULT_HAS_REAR_SENSORS, DEFAULT_HEIGHT_MM,
    DEFAULT_LENGTH_MM, DEFAULT_TRUNK_CAPACITY_LITERS, DEFAULT_WIDTH_MM,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Raw input rejected at the viewer boundary.
///
/// These indicate a caller bug rather than asset variance, so they are never
/// defaulted away. Nothing inside the configurator produces them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("unknown vehicle mode `{0}` (expected showroom, safety, performance or utility)")]
    UnknownMode(String),
    #[error("unknown drivetrain `{0}` (expected FWD, RWD, AWD or 4WD)")]
    UnknownDrivetrain(String),
    #[error("technical metadata must be a JSON object")]
    MetadataNotObject,
}

/// Operating mode driving which mutation set the configurator applies.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum VehicleMode {
    #[default]
    Showroom,
    Safety,
    Performance,
    Utility,
}

impl VehicleMode {
    pub const ALL: [VehicleMode; 4] = [
        VehicleMode::Showroom,
        VehicleMode::Safety,
        VehicleMode::Performance,
        VehicleMode::Utility,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Showroom => "showroom",
            Self::Safety => "safety",
            Self::Performance => "performance",
            Self::Utility => "utility",
        }
    }
}

impl FromStr for VehicleMode {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "showroom" => Ok(Self::Showroom),
            "safety" => Ok(Self::Safety),
            "performance" => Ok(Self::Performance),
            "utility" => Ok(Self::Utility),
            _ => Err(InputError::UnknownMode(s.to_string())),
        }
    }
}

impl fmt::Display for VehicleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Axle a part or power delivery belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axle {
    Front,
    Rear,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Drivetrain {
    #[serde(rename = "FWD")]
    Fwd,
    #[serde(rename = "RWD")]
    Rwd,
    #[default]
    #[serde(rename = "AWD")]
    Awd,
    #[serde(rename = "4WD")]
    FourWheel,
}

impl Drivetrain {
    /// Power delivery membership. Visibility, material and draw order of the
    /// drivetrain-dependent parts are all derived from this one test.
    pub fn powers(self, axle: Axle) -> bool {
        match axle {
            Axle::Front => matches!(self, Self::Fwd | Self::Awd | Self::FourWheel),
            Axle::Rear => matches!(self, Self::Rwd | Self::Awd | Self::FourWheel),
        }
    }

    pub fn powers_front(self) -> bool {
        self.powers(Axle::Front)
    }

    pub fn powers_rear(self) -> bool {
        self.powers(Axle::Rear)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fwd => "FWD",
            Self::Rwd => "RWD",
            Self::Awd => "AWD",
            Self::FourWheel => "4WD",
        }
    }
}

impl FromStr for Drivetrain {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "FWD" => Ok(Self::Fwd),
            "RWD" => Ok(Self::Rwd),
            "AWD" => Ok(Self::Awd),
            "4WD" => Ok(Self::FourWheel),
            _ => Err(InputError::UnknownDrivetrain(s.to_string())),
        }
    }
}

impl fmt::Display for Drivetrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body dimensions in millimetres as displayed on the dimension labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VehicleDimensions {
    pub length_mm: f32,
    pub width_mm: f32,
    pub height_mm: f32,
}

impl Default for VehicleDimensions {
    fn default() -> Self {
        Self {
            length_mm: DEFAULT_LENGTH_MM,
            width_mm: DEFAULT_WIDTH_MM,
            height_mm: DEFAULT_HEIGHT_MM,
        }
    }
}

/// Open key-value technical metadata supplied by the host.
///
/// Recognised keys are read through typed accessors that substitute literal
/// defaults for missing or malformed values. Dimension keys may be given either
/// flat (`"dimensions.length_mm"`) or nested (`{"dimensions": {"length_mm": ..}}`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TechMetadata(Map<String, Value>);

impl TechMetadata {
    pub fn from_value(value: Value) -> Result<Self, InputError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::default()),
            _ => Err(InputError::MetadataNotObject),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    fn lookup(&self, key: &str) -> Option<&Value> {
        if let Some(value) = self.0.get(key) {
            return Some(value);
        }
        let (head, tail) = key.split_once('.')?;
        self.0.get(head)?.get(tail)
    }

    fn number(&self, key: &str) -> Option<f32> {
        let value = match self.lookup(key)? {
            Value::Number(number) => number.as_f64().map(|v| v as f32),
            Value::String(text) => text.trim().parse::<f32>().ok(),
            _ => None,
        };
        value.filter(|v| v.is_finite())
    }

    fn flag(&self, key: &str) -> Option<bool> {
        match self.lookup(key)? {
            Value::Bool(flag) => Some(*flag),
            Value::String(text) => text.trim().parse::<bool>().ok(),
            Value::Number(number) => number.as_f64().map(|v| v != 0.0),
            _ => None,
        }
    }

    pub fn engine_hp(&self) -> f32 {
        self.number("engine_hp").unwrap_or(DEFAULT_ENGINE_HP)
    }

    pub fn has_front_sensors(&self) -> bool {
        self.flag("has_front_sensors")
            .unwrap_or(DEFAULT_HAS_FRONT_SENSORS)
    }

    pub fn has_rear_sensors(&self) -> bool {
        self.flag("has_rear_sensors")
            .unwrap_or(DEFAULT_HAS_REAR_SENSORS)
    }

    pub fn trunk_capacity_liters(&self) -> f32 {
        self.number("trunk_capacity_liters")
            .unwrap_or(DEFAULT_TRUNK_CAPACITY_LITERS)
    }

    pub fn dimensions(&self) -> VehicleDimensions {
        let defaults = VehicleDimensions::default();
        VehicleDimensions {
            length_mm: self
                .number("dimensions.length_mm")
                .unwrap_or(defaults.length_mm),
            width_mm: self
                .number("dimensions.width_mm")
                .unwrap_or(defaults.width_mm),
            height_mm: self
                .number("dimensions.height_mm")
                .unwrap_or(defaults.height_mm),
        }
    }
}

/// Inputs whose change triggers a configurator pass.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct ViewerInputs {
    pub mode: VehicleMode,
    pub drivetrain: Drivetrain,
    /// Only used to pick which asset variant is loaded.
    pub body_style: String,
    pub tech: TechMetadata,
}

/// Trunk open flag. Kept apart from `ViewerInputs` so toggling it eases the cargo
/// volume instead of re-running the configurator.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct TrunkControl {
    pub open: bool,
}

/// A validated change to the viewer inputs, from RPC or keyboard.
#[derive(Debug, Clone, PartialEq)]
pub enum InputUpdate {
    Mode(VehicleMode),
    Drivetrain(Drivetrain),
    BodyStyle(String),
    TechMetadata(TechMetadata),
    TrunkOpen(bool),
}

impl InputUpdate {
    /// Write the update, touching the resource only when the value differs so
    /// change detection does not fire spurious configurator passes.
    pub fn apply(self, inputs: &mut ResMut<ViewerInputs>, trunk: &mut ResMut<TrunkControl>) -> bool {
        match self {
            Self::Mode(mode) => {
                if inputs.mode == mode {
                    return false;
                }
                inputs.mode = mode;
                info!("Vehicle mode: {}", mode);
            }
            Self::Drivetrain(drivetrain) => {
                if inputs.drivetrain == drivetrain {
                    return false;
                }
                inputs.drivetrain = drivetrain;
                info!("Drivetrain: {}", drivetrain);
            }
            Self::BodyStyle(body_style) => {
                if inputs.body_style == body_style {
                    return false;
                }
                info!("Body style: {}", body_style);
                inputs.body_style = body_style;
            }
            Self::TechMetadata(tech) => {
                if inputs.tech == tech {
                    return false;
                }
                inputs.tech = tech;
                info!("Technical metadata updated");
            }
            Self::TrunkOpen(open) => {
                if trunk.open == open {
                    return false;
                }
                trunk.open = open;
                info!("Trunk open: {}", open);
            }
        }
        true
    }
}

/// Handle mode, drivetrain and trunk shortcuts on native builds.
/// On WASM the same updates arrive through the RPC layer.
#[cfg(not(target_arch = "wasm32"))]
pub fn handle_mode_shortcuts(
    mut inputs: ResMut<ViewerInputs>,
    mut trunk: ResMut<TrunkControl>,
    keyboard: Res<ButtonInput<KeyCode>>,
) {
    let bindings = [
        (KeyCode::Digit1, InputUpdate::Mode(VehicleMode::Showroom)),
        (KeyCode::Digit2, InputUpdate::Mode(VehicleMode::Safety)),
        (KeyCode::Digit3, InputUpdate::Mode(VehicleMode::Performance)),
        (KeyCode::Digit4, InputUpdate::Mode(VehicleMode::Utility)),
        (KeyCode::KeyF, InputUpdate::Drivetrain(Drivetrain::Fwd)),
        (KeyCode::KeyR, InputUpdate::Drivetrain(Drivetrain::Rwd)),
        (KeyCode::KeyA, InputUpdate::Drivetrain(Drivetrain::Awd)),
        (KeyCode::KeyX, InputUpdate::Drivetrain(Drivetrain::FourWheel)),
    ];

    for (key, update) in bindings {
        if keyboard.just_pressed(key) {
            update.apply(&mut inputs, &mut trunk);
        }
    }

    if keyboard.just_pressed(KeyCode::KeyT) {
        let open = !trunk.open;
        InputUpdate::TrunkOpen(open).apply(&mut inputs, &mut trunk);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;
    use serde_json::json;

    #[test]
    fn mode_strings_parse_case_insensitively() {
        assert_eq!("Safety".parse::<VehicleMode>(), Ok(VehicleMode::Safety));
        assert_eq!(" utility ".parse::<VehicleMode>(), Ok(VehicleMode::Utility));
        assert_eq!(
            "xray".parse::<VehicleMode>(),
            Err(InputError::UnknownMode("xray".to_string()))
        );
    }

    #[test]
    fn drivetrain_power_delivery() {
        assert!(Drivetrain::Fwd.powers_front() && !Drivetrain::Fwd.powers_rear());
        assert!(!Drivetrain::Rwd.powers_front() && Drivetrain::Rwd.powers_rear());
        assert!(Drivetrain::Awd.powers_front() && Drivetrain::Awd.powers_rear());
        assert!(Drivetrain::FourWheel.powers_front() && Drivetrain::FourWheel.powers_rear());
        assert_eq!("4wd".parse::<Drivetrain>(), Ok(Drivetrain::FourWheel));
        assert!("6WD".parse::<Drivetrain>().is_err());
        assert_eq!(Drivetrain::default(), Drivetrain::Awd);
    }

    #[test]
    fn missing_metadata_falls_back_to_literals() {
        let tech = TechMetadata::default();
        assert_eq!(tech.engine_hp(), 220.0);
        assert_eq!(tech.trunk_capacity_liters(), 500.0);
        assert!(tech.has_front_sensors());
        assert!(tech.has_rear_sensors());
        assert_eq!(
            tech.dimensions(),
            VehicleDimensions {
                length_mm: 4341.0,
                width_mm: 1804.0,
                height_mm: 1440.0,
            }
        );
    }

    #[test]
    fn metadata_reads_flat_and_nested_keys() {
        let tech = TechMetadata::from_value(json!({
            "engine_hp": "310",
            "has_front_sensors": false,
            "dimensions": { "length_mm": 4700, "width_mm": "bogus" },
            "dimensions.height_mm": 1500
        }))
        .unwrap();

        assert_eq!(tech.engine_hp(), 310.0);
        assert!(!tech.has_front_sensors());
        assert!(tech.has_rear_sensors());
        let dimensions = tech.dimensions();
        assert_eq!(dimensions.length_mm, 4700.0);
        assert_eq!(dimensions.width_mm, 1804.0);
        assert_eq!(dimensions.height_mm, 1500.0);
    }

    #[test]
    fn metadata_must_be_an_object() {
        assert_eq!(
            TechMetadata::from_value(json!([1, 2])),
            Err(InputError::MetadataNotObject)
        );
        assert!(TechMetadata::from_value(Value::Null).unwrap().is_empty());
    }

    #[test]
    fn unchanged_updates_do_not_touch_inputs() {
        let mut app = App::new();
        app.init_resource::<ViewerInputs>()
            .init_resource::<TrunkControl>();
        app.update();

        let applied = app
            .world_mut()
            .run_system_once(|mut inputs: ResMut<ViewerInputs>, mut trunk: ResMut<TrunkControl>| {
                let same = InputUpdate::Mode(VehicleMode::Showroom).apply(&mut inputs, &mut trunk);
                let changed = InputUpdate::TrunkOpen(true).apply(&mut inputs, &mut trunk);
                (same, changed)
            })
            .unwrap();

        assert_eq!(applied, (false, true));
        assert!(app.world().resource::<TrunkControl>().open);
    }
}
