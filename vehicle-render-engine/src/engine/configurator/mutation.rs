use crate::engine::material_library::SurfaceMaterial;
use crate::engine::scene::parts::Part;
use crate::engine::systems::viewer_inputs::{
    Axle, Drivetrain, TechMetadata, VehicleMode, ViewerInputs,
};
use constants::render_settings::{DRAW_ORDER_DEFAULT, DRAW_ORDER_GLAZING, DRAW_ORDER_XRAY};
use std::collections::BTreeMap;

/// Inputs of one configurator pass. Immutable for the duration of the pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModeContext {
    pub mode: VehicleMode,
    pub drivetrain: Drivetrain,
    pub body_style: String,
    pub tech: TechMetadata,
}

impl From<&ViewerInputs> for ModeContext {
    fn from(inputs: &ViewerInputs) -> Self {
        Self {
            mode: inputs.mode,
            drivetrain: inputs.drivetrain,
            body_style: inputs.body_style.clone(),
            tech: inputs.tech.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Visible(Part, bool),
    Material(Part, SurfaceMaterial),
    DrawOrder(Part, i32),
    EnsureOverlay(Part),
    OverlayVisible(Part, bool),
}

impl Mutation {
    pub fn part(&self) -> Part {
        match self {
            Self::Visible(part, _)
            | Self::Material(part, _)
            | Self::DrawOrder(part, _)
            | Self::EnsureOverlay(part)
            | Self::OverlayVisible(part, _) => *part,
        }
    }
}

/// Final state for one part after folding the ordered mutations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartState {
    pub visible: Option<bool>,
    pub material: Option<SurfaceMaterial>,
    pub draw_order: Option<i32>,
    pub ensure_overlay: bool,
    pub overlay_visible: Option<bool>,
}

/// Ordered mutation list produced by one configurator pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MutationSet {
    mutations: Vec<Mutation>,
}

impl MutationSet {
    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    fn push_all(&mut self, parts: &[Part], mutation: impl Fn(Part) -> Mutation) {
        self.mutations.extend(parts.iter().map(|part| mutation(*part)));
    }

    fn show(&mut self, parts: &[Part]) {
        self.push_all(parts, |part| Mutation::Visible(part, true));
    }

    fn hide(&mut self, parts: &[Part]) {
        self.push_all(parts, |part| Mutation::Visible(part, false));
    }

    fn wear(&mut self, parts: &[Part], material: SurfaceMaterial) {
        self.push_all(parts, |part| Mutation::Material(part, material));
    }

    fn order(&mut self, parts: &[Part], order: i32) {
        self.push_all(parts, |part| Mutation::DrawOrder(part, order));
    }

    /// Later mutations override earlier ones, per field.
    pub fn settle(&self) -> BTreeMap<Part, PartState> {
        let mut states: BTreeMap<Part, PartState> = BTreeMap::new();
        for mutation in &self.mutations {
            let state = states.entry(mutation.part()).or_default();
            match *mutation {
                Mutation::Visible(_, visible) => state.visible = Some(visible),
                Mutation::Material(_, material) => state.material = Some(material),
                Mutation::DrawOrder(_, order) => state.draw_order = Some(order),
                Mutation::EnsureOverlay(_) => state.ensure_overlay = true,
                Mutation::OverlayVisible(_, visible) => state.overlay_visible = Some(visible),
            }
        }
        states
    }
}

const SHOWN_AT_REST: [Part; 9] = [
    Part::Shell,
    Part::Glazing,
    Part::InteriorTrim,
    Part::WheelFrontLeft,
    Part::WheelFrontRight,
    Part::WheelRearLeft,
    Part::WheelRearRight,
    Part::Lights,
    Part::Trunk,
];

const BODY: [Part; 2] = [Part::Shell, Part::Trunk];

/// Map the context onto the ordered mutation set for its mode.
pub fn configure(context: &ModeContext) -> MutationSet {
    let mut set = MutationSet::default();

    set.hide(&Part::INTERNAL);
    set.show(&SHOWN_AT_REST);
    set.order(&Part::ALL, DRAW_ORDER_DEFAULT);
    set.push_all(&Part::ALL, |part| Mutation::OverlayVisible(part, false));

    match context.mode {
        VehicleMode::Showroom => showroom(&mut set),
        VehicleMode::Safety => safety(&mut set),
        VehicleMode::Performance => performance(&mut set, context.drivetrain),
        VehicleMode::Utility => utility(&mut set),
    }

    set.push_all(&Part::ALL, |part| Mutation::OverlayVisible(part, false));
    if context.mode == VehicleMode::Utility {
        set.push_all(&BODY, |part| Mutation::OverlayVisible(part, true));
    }

    set
}

fn showroom(set: &mut MutationSet) {
    set.wear(&BODY, SurfaceMaterial::Paint);
    set.wear(&[Part::Glazing, Part::Lights], SurfaceMaterial::Glass);
    set.wear(&Part::WHEELS, SurfaceMaterial::Chrome);
    set.wear(&[Part::InteriorTrim], SurfaceMaterial::Graphite);
}

fn safety(set: &mut MutationSet) {
    set.wear(
        &[Part::Shell, Part::Trunk, Part::Glazing, Part::Lights, Part::InteriorTrim],
        SurfaceMaterial::Ghost,
    );
    set.wear(&Part::WHEELS, SurfaceMaterial::Ghost);
    set.show(&[Part::Airbags]);
    set.wear(&[Part::Airbags], SurfaceMaterial::Technical);
}

fn performance(set: &mut MutationSet, drivetrain: Drivetrain) {
    set.wear(&BODY, SurfaceMaterial::Satin);
    set.order(&BODY, DRAW_ORDER_DEFAULT);

    set.show(&[Part::Glazing]);
    set.wear(&[Part::Glazing], SurfaceMaterial::DarkGlass);
    set.order(&[Part::Glazing], DRAW_ORDER_GLAZING);

    set.hide(&[Part::InteriorTrim, Part::Lights]);

    let engine_bay = [Part::Engine, Part::Exhaust];
    set.show(&engine_bay);
    set.wear(&engine_bay, SurfaceMaterial::Magma);
    set.order(&engine_bay, DRAW_ORDER_XRAY);

    for (axle, unit, wheels) in [
        (
            Axle::Front,
            Part::FrontDriveUnit,
            [Part::WheelFrontLeft, Part::WheelFrontRight],
        ),
        (
            Axle::Rear,
            Part::RearDriveUnit,
            [Part::WheelRearLeft, Part::WheelRearRight],
        ),
    ] {
        if drivetrain.powers(axle) {
            set.show(&[unit]);
            set.wear(&[unit], SurfaceMaterial::HotMetal);
            set.order(&[unit], DRAW_ORDER_XRAY);
            set.wear(&wheels, SurfaceMaterial::HotMetal);
            set.order(&wheels, DRAW_ORDER_XRAY);
        } else {
            set.wear(&wheels, SurfaceMaterial::Satin);
            set.order(&wheels, DRAW_ORDER_DEFAULT);
        }
    }
}

fn utility(set: &mut MutationSet) {
    set.wear(&BODY, SurfaceMaterial::Graphite);
    set.wear(&Part::WHEELS, SurfaceMaterial::Graphite);
    set.wear(&[Part::InteriorTrim], SurfaceMaterial::Graphite);
    set.wear(&[Part::Glazing], SurfaceMaterial::TintedGlass);
    set.wear(&[Part::Lights], SurfaceMaterial::Glass);
    set.push_all(&BODY, Mutation::EnsureOverlay);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(mode: VehicleMode, drivetrain: Drivetrain) -> ModeContext {
        ModeContext {
            mode,
            drivetrain,
            ..Default::default()
        }
    }

    fn settled(mode: VehicleMode, drivetrain: Drivetrain) -> BTreeMap<Part, PartState> {
        configure(&context(mode, drivetrain)).settle()
    }

    #[test]
    fn showroom_hides_internals_and_paints_body() {
        let states = settled(VehicleMode::Showroom, Drivetrain::Awd);
        for part in Part::INTERNAL {
            assert_eq!(states[&part].visible, Some(false), "{part:?} visible");
        }
        assert_eq!(states[&Part::Shell].material, Some(SurfaceMaterial::Paint));
        assert_eq!(states[&Part::Trunk].material, Some(SurfaceMaterial::Paint));
        assert_eq!(states[&Part::Glazing].material, Some(SurfaceMaterial::Glass));
        for wheel in Part::WHEELS {
            assert_eq!(states[&wheel].material, Some(SurfaceMaterial::Chrome));
        }
        assert!(states.values().all(|s| s.draw_order == Some(DRAW_ORDER_DEFAULT)));
        assert!(states.values().all(|s| s.overlay_visible == Some(false)));
    }

    #[test]
    fn safety_ghosts_shell_and_reveals_airbags() {
        let states = settled(VehicleMode::Safety, Drivetrain::Awd);
        assert_eq!(states[&Part::Shell].material, Some(SurfaceMaterial::Ghost));
        assert_eq!(states[&Part::Glazing].material, Some(SurfaceMaterial::Ghost));
        assert_eq!(states[&Part::Airbags].visible, Some(true));
        assert_eq!(states[&Part::Airbags].material, Some(SurfaceMaterial::Technical));
        assert_eq!(states[&Part::Engine].visible, Some(false));
    }

    #[test]
    fn rwd_heats_only_the_rear_axle() {
        let states = settled(VehicleMode::Performance, Drivetrain::Rwd);

        assert_eq!(states[&Part::RearDriveUnit].visible, Some(true));
        assert_eq!(states[&Part::RearDriveUnit].material, Some(SurfaceMaterial::HotMetal));
        assert_eq!(states[&Part::RearDriveUnit].draw_order, Some(DRAW_ORDER_XRAY));
        assert_eq!(states[&Part::FrontDriveUnit].visible, Some(false));

        for wheel in [Part::WheelRearLeft, Part::WheelRearRight] {
            assert_eq!(states[&wheel].material, Some(SurfaceMaterial::HotMetal));
            assert_eq!(states[&wheel].draw_order, Some(DRAW_ORDER_XRAY));
        }
        for wheel in [Part::WheelFrontLeft, Part::WheelFrontRight] {
            assert_eq!(states[&wheel].material, Some(SurfaceMaterial::Satin));
            assert_eq!(states[&wheel].draw_order, Some(DRAW_ORDER_DEFAULT));
        }

        assert_eq!(states[&Part::Engine].material, Some(SurfaceMaterial::Magma));
        assert_eq!(states[&Part::Engine].draw_order, Some(DRAW_ORDER_XRAY));
        assert_eq!(states[&Part::Glazing].material, Some(SurfaceMaterial::DarkGlass));
        assert_eq!(states[&Part::Glazing].draw_order, Some(DRAW_ORDER_GLAZING));
        assert_eq!(states[&Part::InteriorTrim].visible, Some(false));
        assert_eq!(states[&Part::Lights].visible, Some(false));
    }

    #[test]
    fn power_membership_drives_every_drivetrain() {
        for drivetrain in [Drivetrain::Fwd, Drivetrain::Rwd, Drivetrain::Awd, Drivetrain::FourWheel] {
            let states = settled(VehicleMode::Performance, drivetrain);
            for (unit, axle) in [(Part::FrontDriveUnit, Axle::Front), (Part::RearDriveUnit, Axle::Rear)] {
                let powered = drivetrain.powers(axle);
                assert_eq!(states[&unit].visible, Some(powered), "{drivetrain} {unit:?}");
                let expected_order = if powered { DRAW_ORDER_XRAY } else { DRAW_ORDER_DEFAULT };
                assert_eq!(states[&unit].draw_order, Some(expected_order));
            }
        }
    }

    #[test]
    fn utility_is_the_only_mode_with_visible_overlays() {
        for mode in VehicleMode::ALL {
            let states = settled(mode, Drivetrain::Awd);
            let visible: Vec<Part> = states
                .iter()
                .filter(|(_, s)| s.overlay_visible == Some(true))
                .map(|(part, _)| *part)
                .collect();
            if mode == VehicleMode::Utility {
                assert_eq!(visible, vec![Part::Shell, Part::Trunk]);
                assert!(states[&Part::Shell].ensure_overlay);
            } else {
                assert!(visible.is_empty(), "{mode} shows overlays on {visible:?}");
            }
        }
    }

    #[test]
    fn configure_is_deterministic() {
        let ctx = context(VehicleMode::Utility, Drivetrain::Fwd);
        assert_eq!(configure(&ctx), configure(&ctx));
    }

    #[test]
    fn leaving_performance_resets_draw_orders() {
        let states = settled(VehicleMode::Showroom, Drivetrain::FourWheel);
        assert_eq!(states[&Part::Engine].draw_order, Some(DRAW_ORDER_DEFAULT));
        assert_eq!(states[&Part::WheelFrontLeft].draw_order, Some(DRAW_ORDER_DEFAULT));
    }
}
