//! Custom vehicle materials: fresnel ghost shell and scrolling energy beam
use bevy::pbr::{MaterialPipeline, MaterialPipelineKey};
use bevy::render::mesh::MeshVertexBufferLayoutRef;
use bevy::render::render_resource::{
    RenderPipelineDescriptor, SpecializedMeshPipelineError,
};
use bevy::{
    prelude::*,
    reflect::TypePath,
    render::render_resource::{AsBindGroup, ShaderRef},
};
use constants::animation::{BEAM_BASE_GLOW, BEAM_DASH_COUNT, BEAM_SCROLL_SPEED};
use constants::palette::{GHOST_FRESNEL_POWER, GHOST_MAX_ALPHA, GHOST_MIN_ALPHA, GHOST_RIM};

pub const GHOST_SHADER_PATH: &str = "shaders/ghost_fresnel.wgsl";
pub const BEAM_SHADER_PATH: &str = "shaders/energy_beam.wgsl";

/// View-dependent translucent shell: nearly clear face-on, opaque rim at
/// grazing angles. Depth writes are off so internals stay visible through it.
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct GhostMaterial {
    #[uniform(0)]
    pub rim_colour: LinearRgba,

    /// x = face-on alpha, y = grazing alpha, z = fresnel exponent
    #[uniform(1)]
    pub params: Vec4,
}

impl Default for GhostMaterial {
    fn default() -> Self {
        Self {
            rim_colour: GHOST_RIM,
            params: Vec4::new(GHOST_MIN_ALPHA, GHOST_MAX_ALPHA, GHOST_FRESNEL_POWER, 0.0),
        }
    }
}

impl Material for GhostMaterial {
    fn fragment_shader() -> ShaderRef {
        GHOST_SHADER_PATH.into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        AlphaMode::Blend
    }

    fn specialize(
        _pipeline: &MaterialPipeline<Self>,
        descriptor: &mut RenderPipelineDescriptor,
        _layout: &MeshVertexBufferLayoutRef,
        _key: MaterialPipelineKey<Self>,
    ) -> Result<(), SpecializedMeshPipelineError> {
        descriptor.primitive.cull_mode = None;
        if let Some(depth_stencil) = descriptor.depth_stencil.as_mut() {
            depth_stencil.depth_write_enabled = false;
        }
        Ok(())
    }
}

/// Additive tube material with dashes scrolling from the drive unit to the wheel.
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct EnergyBeamMaterial {
    #[uniform(0)]
    pub colour: LinearRgba,

    /// x = elapsed seconds, y = scroll speed, z = dash count, w = base glow
    #[uniform(1)]
    pub params: Vec4,
}

impl EnergyBeamMaterial {
    pub fn new(colour: LinearRgba) -> Self {
        Self {
            colour,
            params: Vec4::new(0.0, BEAM_SCROLL_SPEED, BEAM_DASH_COUNT, BEAM_BASE_GLOW),
        }
    }

    pub fn set_time(&mut self, elapsed: f32) {
        self.params.x = elapsed;
    }
}

impl Material for EnergyBeamMaterial {
    fn fragment_shader() -> ShaderRef {
        BEAM_SHADER_PATH.into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        AlphaMode::Add
    }

    fn specialize(
        _pipeline: &MaterialPipeline<Self>,
        descriptor: &mut RenderPipelineDescriptor,
        _layout: &MeshVertexBufferLayoutRef,
        _key: MaterialPipelineKey<Self>,
    ) -> Result<(), SpecializedMeshPipelineError> {
        descriptor.primitive.cull_mode = None;
        Ok(())
    }
}
