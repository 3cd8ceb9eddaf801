use crate::engine::assets::vehicle_manifest::{VehicleManifest, VehicleVariant};
use crate::engine::scene::parts::VehicleRoot;
use crate::engine::systems::viewer_inputs::{TechMetadata, ViewerInputs};
use bevy::prelude::*;
use constants::path::VEHICLE_MANIFEST_PATH;

/// Tracks the manifest handle and which body style is currently on screen.
#[derive(Resource, Default)]
pub struct VariantLoader {
    manifest: Option<Handle<VehicleManifest>>,
    requested_style: Option<String>,
    spawned_style: Option<String>,
    root: Option<Entity>,
    /// Metadata this loader last copied from the manifest. Anything else in
    /// `ViewerInputs::tech` was set by the host.
    seeded_tech: Option<TechMetadata>,
}

impl VariantLoader {
    pub fn spawned_style(&self) -> Option<&str> {
        self.spawned_style.as_deref()
    }

    /// Bring `tech` in line with a newly spawned variant and remember what
    /// the manifest contributed.
    pub fn seed_tech(&mut self, tech: &mut TechMetadata, variant: &VehicleVariant) {
        if let Some(next) = next_tech_metadata(tech, self.seeded_tech.as_ref(), variant) {
            debug!("Using {} metadata from the manifest", variant.body_style);
            *tech = next;
        }
        if *tech == variant.tech_metadata {
            self.seeded_tech = Some(variant.tech_metadata.clone());
        }
    }
}

/// What a body style request resolves to against the manifest.
#[derive(Debug, PartialEq)]
pub enum VariantChange<'a> {
    /// Same request as last frame, or the variant is already spawned.
    Unchanged,
    Unknown(String),
    Spawn(&'a VehicleVariant),
}

/// Metadata to show after switching to `variant`. Host-provided metadata is
/// kept; empty or manifest-seeded metadata follows the new variant.
pub fn next_tech_metadata(
    current: &TechMetadata,
    seeded: Option<&TechMetadata>,
    variant: &VehicleVariant,
) -> Option<TechMetadata> {
    let from_manifest = current.is_empty() || seeded == Some(current);
    (from_manifest && current != &variant.tech_metadata).then(|| variant.tech_metadata.clone())
}

/// Decide whether `body_style` needs a respawn. An empty request falls back to
/// the manifest default.
pub fn select_variant<'a>(
    manifest: &'a VehicleManifest,
    body_style: &str,
    spawned_style: Option<&str>,
) -> VariantChange<'a> {
    let requested = match body_style.trim() {
        "" => manifest.default_body_style.as_str(),
        style => style,
    };

    match manifest.variant(requested) {
        None => VariantChange::Unknown(requested.to_string()),
        Some(variant) if spawned_style == Some(variant.body_style.as_str()) => {
            VariantChange::Unchanged
        }
        Some(variant) => VariantChange::Spawn(variant),
    }
}

pub fn start_loading(mut loader: ResMut<VariantLoader>, asset_server: Res<AssetServer>) {
    println!("=== Loading vehicle manifest: {} ===", VEHICLE_MANIFEST_PATH);
    loader.manifest = Some(asset_server.load(VEHICLE_MANIFEST_PATH));
}

/// Spawn the glTF scene for the requested body style, replacing the previous
/// vehicle root. Unknown styles keep the current vehicle on screen.
pub fn sync_vehicle_variant(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    manifests: Res<Assets<VehicleManifest>>,
    mut loader: ResMut<VariantLoader>,
    mut inputs: ResMut<ViewerInputs>,
) {
    let Some(handle) = loader.manifest.clone() else {
        return;
    };
    let Some(manifest) = manifests.get(&handle) else {
        return;
    };
    if loader.requested_style.as_deref() == Some(inputs.body_style.as_str()) {
        return;
    }
    loader.requested_style = Some(inputs.body_style.clone());

    let variant = match select_variant(manifest, &inputs.body_style, loader.spawned_style()) {
        VariantChange::Unchanged => return,
        VariantChange::Unknown(style) => {
            warn!(
                "Unknown body style '{}', keeping {:?} (available: {:?})",
                style,
                loader.spawned_style(),
                manifest.body_styles().collect::<Vec<_>>()
            );
            return;
        }
        VariantChange::Spawn(variant) => variant,
    };

    if let Some(previous) = loader.root.take() {
        commands.entity(previous).despawn();
    }

    info!("Spawning {} from {}", variant.body_style, variant.scene);
    let root = commands
        .spawn((
            SceneRoot(asset_server.load(GltfAssetLabel::Scene(0).from_asset(variant.scene.clone()))),
            VehicleRoot,
        ))
        .id();
    loader.root = Some(root);
    loader.spawned_style = Some(variant.body_style.clone());

    loader.seed_tech(&mut inputs.tech, variant);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest() -> VehicleManifest {
        serde_json::from_value(serde_json::json!({
            "default_body_style": "sedan",
            "variants": [
                {
                    "body_style": "sedan",
                    "scene": "vehicles/sedan.glb",
                    "tech_metadata": {"engine_hp": 220, "trunk_capacity_liters": 500}
                },
                {
                    "body_style": "suv",
                    "scene": "vehicles/suv.glb",
                    "tech_metadata": {"engine_hp": 310, "trunk_capacity_liters": 780}
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn manifest_metadata_follows_the_body_style() {
        let manifest = manifest();
        let mut loader = VariantLoader::default();
        let mut tech = TechMetadata::default();

        loader.seed_tech(&mut tech, manifest.variant("sedan").unwrap());
        assert_eq!(tech.engine_hp(), 220.0);

        loader.seed_tech(&mut tech, manifest.variant("suv").unwrap());
        assert_eq!(tech.engine_hp(), 310.0);
        assert_eq!(tech.trunk_capacity_liters(), 780.0);

        loader.seed_tech(&mut tech, manifest.variant("sedan").unwrap());
        assert_eq!(tech.trunk_capacity_liters(), 500.0);
    }

    #[test]
    fn host_metadata_survives_a_body_style_switch() {
        let manifest = manifest();
        let mut loader = VariantLoader::default();
        let mut tech = TechMetadata::default();
        loader.seed_tech(&mut tech, manifest.variant("sedan").unwrap());

        tech = TechMetadata::default().with("engine_hp", 505);
        loader.seed_tech(&mut tech, manifest.variant("suv").unwrap());
        assert_eq!(tech.engine_hp(), 505.0);
    }

    #[test]
    fn empty_request_uses_the_default_style() {
        let manifest = manifest();
        match select_variant(&manifest, "  ", None) {
            VariantChange::Spawn(variant) => assert_eq!(variant.body_style, "sedan"),
            other => panic!("expected spawn, got {other:?}"),
        }
    }

    #[test]
    fn spawned_style_is_not_respawned() {
        let manifest = manifest();
        assert_eq!(select_variant(&manifest, "SUV", Some("suv")), VariantChange::Unchanged);
    }

    #[test]
    fn unknown_style_keeps_current_vehicle() {
        let manifest = manifest();
        assert_eq!(
            select_variant(&manifest, "roadster", Some("sedan")),
            VariantChange::Unknown("roadster".to_string())
        );
    }
}
