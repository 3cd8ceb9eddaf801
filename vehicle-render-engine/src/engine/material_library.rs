use super::scene::edge_overlay::{line_list_mesh, mesh_feature_edges};
use super::shaders::{EnergyBeamMaterial, GhostMaterial};
use bevy::prelude::*;
use constants::animation::PULSE_COUNT;
use constants::palette::{
    BEAM, CARGO_FILL, CHROME, DARK_GLASS, GAUGE, GLASS, GRAPHITE, HOT_METAL, HOT_METAL_EMISSIVE,
    MAGMA_EMISSIVE_GAIN, MAGMA_LOW, MEASURE_LINE, OUTLINE, PAINT, PULSE, SATIN, TECHNICAL,
    TINTED_GLASS,
};
use constants::render_settings::{
    EDGE_THRESHOLD_DEGREES, GAUGE_INNER_RADIUS, GAUGE_OUTER_RADIUS, PULSE_RING_RADIUS,
    PULSE_RING_THICKNESS,
};
use serde::Serialize;

/// Named surface finishes the configurator can put on a part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SurfaceMaterial {
    Paint,
    Chrome,
    Glass,
    TintedGlass,
    DarkGlass,
    Satin,
    Graphite,
    Outline,
    Ghost,
    HotMetal,
    Magma,
    Technical,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MaterialHandle {
    Standard(Handle<StandardMaterial>),
    Ghost(Handle<GhostMaterial>),
}

/// Shared material handles, created once at startup.
///
/// Every part wearing a given finish points at the same handle, so mutating the
/// asset (magma pulse, pulse ring fade, beam scroll) reaches them all at once.
#[derive(Resource, Debug, Clone)]
pub struct MaterialLibrary {
    pub paint: Handle<StandardMaterial>,
    pub chrome: Handle<StandardMaterial>,
    pub glass: Handle<StandardMaterial>,
    pub tinted_glass: Handle<StandardMaterial>,
    pub dark_glass: Handle<StandardMaterial>,
    pub satin: Handle<StandardMaterial>,
    pub graphite: Handle<StandardMaterial>,
    pub outline: Handle<StandardMaterial>,
    pub hot_metal: Handle<StandardMaterial>,
    pub magma: Handle<StandardMaterial>,
    pub technical: Handle<StandardMaterial>,
    pub ghost: Handle<GhostMaterial>,
    /// One per pulse slot so each ring fades independently.
    pub pulses: [Handle<StandardMaterial>; PULSE_COUNT],
    pub beam: Handle<EnergyBeamMaterial>,
    pub gauge: Handle<StandardMaterial>,
    pub cargo_fill: Handle<StandardMaterial>,
    pub measure_line: Handle<StandardMaterial>,
}

fn translucent(colour: Color) -> StandardMaterial {
    StandardMaterial {
        base_color: colour,
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        double_sided: true,
        cull_mode: None,
        ..default()
    }
}

fn unlit(colour: Color) -> StandardMaterial {
    StandardMaterial {
        base_color: colour,
        unlit: true,
        ..default()
    }
}

fn glazing(colour: Color, roughness: f32) -> StandardMaterial {
    StandardMaterial {
        base_color: colour,
        alpha_mode: AlphaMode::Blend,
        perceptual_roughness: roughness,
        reflectance: 0.9,
        double_sided: true,
        cull_mode: None,
        ..default()
    }
}

impl MaterialLibrary {
    pub fn build(
        standard: &mut Assets<StandardMaterial>,
        ghosts: &mut Assets<GhostMaterial>,
        beams: &mut Assets<EnergyBeamMaterial>,
    ) -> Self {
        Self {
            paint: standard.add(StandardMaterial {
                base_color: PAINT,
                metallic: 0.6,
                perceptual_roughness: 0.3,
                clearcoat: 1.0,
                clearcoat_perceptual_roughness: 0.1,
                ..default()
            }),
            chrome: standard.add(StandardMaterial {
                base_color: CHROME,
                metallic: 1.0,
                perceptual_roughness: 0.08,
                ..default()
            }),
            glass: standard.add(glazing(GLASS, 0.05)),
            tinted_glass: standard.add(glazing(TINTED_GLASS, 0.1)),
            dark_glass: standard.add(glazing(DARK_GLASS, 0.15)),
            satin: standard.add(StandardMaterial {
                base_color: SATIN,
                metallic: 0.2,
                perceptual_roughness: 0.55,
                ..default()
            }),
            graphite: standard.add(StandardMaterial {
                base_color: GRAPHITE,
                perceptual_roughness: 0.85,
                ..default()
            }),
            outline: standard.add(unlit(OUTLINE)),
            hot_metal: standard.add(StandardMaterial {
                base_color: HOT_METAL,
                emissive: HOT_METAL_EMISSIVE,
                metallic: 1.0,
                perceptual_roughness: 0.3,
                ..default()
            }),
            magma: standard.add(StandardMaterial {
                base_color: MAGMA_LOW.into(),
                emissive: MAGMA_LOW * MAGMA_EMISSIVE_GAIN,
                perceptual_roughness: 0.6,
                ..default()
            }),
            technical: standard.add(translucent(TECHNICAL)),
            ghost: ghosts.add(GhostMaterial::default()),
            pulses: std::array::from_fn(|_| standard.add(translucent(PULSE.with_alpha(0.0)))),
            beam: beams.add(EnergyBeamMaterial::new(BEAM)),
            gauge: standard.add(StandardMaterial {
                double_sided: true,
                cull_mode: None,
                ..unlit(GAUGE)
            }),
            cargo_fill: standard.add(translucent(CARGO_FILL)),
            measure_line: standard.add(unlit(MEASURE_LINE)),
        }
    }

    pub fn handle(&self, material: SurfaceMaterial) -> MaterialHandle {
        let standard = match material {
            SurfaceMaterial::Ghost => return MaterialHandle::Ghost(self.ghost.clone()),
            SurfaceMaterial::Paint => &self.paint,
            SurfaceMaterial::Chrome => &self.chrome,
            SurfaceMaterial::Glass => &self.glass,
            SurfaceMaterial::TintedGlass => &self.tinted_glass,
            SurfaceMaterial::DarkGlass => &self.dark_glass,
            SurfaceMaterial::Satin => &self.satin,
            SurfaceMaterial::Graphite => &self.graphite,
            SurfaceMaterial::Outline => &self.outline,
            SurfaceMaterial::HotMetal => &self.hot_metal,
            SurfaceMaterial::Magma => &self.magma,
            SurfaceMaterial::Technical => &self.technical,
        };
        MaterialHandle::Standard(standard.clone())
    }
}

impl FromWorld for MaterialLibrary {
    fn from_world(world: &mut World) -> Self {
        world.resource_scope(|world, mut standard: Mut<Assets<StandardMaterial>>| {
            world.resource_scope(|world, mut ghosts: Mut<Assets<GhostMaterial>>| {
                let mut beams = world.resource_mut::<Assets<EnergyBeamMaterial>>();
                Self::build(&mut standard, &mut ghosts, &mut beams)
            })
        })
    }
}

/// Swap the material on one surface. A surface carries exactly one material
/// component, so the other kind is removed first.
pub fn assign_material(commands: &mut Commands, surface: Entity, handle: &MaterialHandle) {
    match handle {
        MaterialHandle::Standard(material) => {
            commands
                .entity(surface)
                .remove::<MeshMaterial3d<GhostMaterial>>()
                .insert(MeshMaterial3d(material.clone()));
        }
        MaterialHandle::Ghost(material) => {
            commands
                .entity(surface)
                .remove::<MeshMaterial3d<StandardMaterial>>()
                .insert(MeshMaterial3d(material.clone()));
        }
    }
}

/// Meshes shared by every attachment instance.
#[derive(Resource, Debug, Clone)]
pub struct PrimitiveLibrary {
    pub pulse_ring: Handle<Mesh>,
    pub unit_cube: Handle<Mesh>,
    pub unit_cube_outline: Handle<Mesh>,
    pub gauge_ring: Handle<Mesh>,
}

impl FromWorld for PrimitiveLibrary {
    fn from_world(world: &mut World) -> Self {
        let mut meshes = world.resource_mut::<Assets<Mesh>>();
        let cube = Mesh::from(Cuboid::new(1.0, 1.0, 1.0));
        let cube_edges = mesh_feature_edges(&cube, EDGE_THRESHOLD_DEGREES);

        Self {
            pulse_ring: meshes.add(Torus::new(
                PULSE_RING_RADIUS - PULSE_RING_THICKNESS,
                PULSE_RING_RADIUS + PULSE_RING_THICKNESS,
            )),
            unit_cube_outline: meshes.add(line_list_mesh(&cube_edges)),
            unit_cube: meshes.add(cube),
            gauge_ring: meshes.add(Annulus::new(GAUGE_INNER_RADIUS, GAUGE_OUTER_RADIUS)),
        }
    }
}
