use crate::engine::systems::viewer_inputs::TechMetadata;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// One loadable body style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleVariant {
    pub body_style: String,
    /// glTF file relative to the asset root; scene 0 is spawned.
    pub scene: String,
    #[serde(default)]
    pub tech_metadata: TechMetadata,
}

/// Body styles the viewer can load, as a JSON asset.
#[derive(Asset, Debug, Clone, PartialEq, Serialize, Deserialize, TypePath)]
pub struct VehicleManifest {
    pub default_body_style: String,
    pub variants: Vec<VehicleVariant>,
}

impl VehicleManifest {
    /// Case-insensitive lookup by body style.
    pub fn variant(&self, body_style: &str) -> Option<&VehicleVariant> {
        let wanted = body_style.trim();
        self.variants
            .iter()
            .find(|variant| variant.body_style.eq_ignore_ascii_case(wanted))
    }

    pub fn body_styles(&self) -> impl Iterator<Item = &str> {
        self.variants.iter().map(|variant| variant.body_style.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
        "default_body_style": "sedan",
        "variants": [
            {"body_style": "sedan", "scene": "vehicles/sedan.glb",
             "tech_metadata": {"engine_hp": 220}},
            {"body_style": "SUV", "scene": "vehicles/suv.glb"}
        ]
    }"#;

    #[test]
    fn parses_variants_with_optional_metadata() {
        let manifest: VehicleManifest = serde_json::from_str(MANIFEST).unwrap();
        assert_eq!(manifest.body_styles().collect::<Vec<_>>(), vec!["sedan", "SUV"]);
        assert_eq!(manifest.variants[0].tech_metadata.engine_hp(), 220.0);
        assert!(manifest.variants[1].tech_metadata.is_empty());
    }

    #[test]
    fn lookup_ignores_case_and_whitespace() {
        let manifest: VehicleManifest = serde_json::from_str(MANIFEST).unwrap();
        assert_eq!(
            manifest.variant(" suv ").map(|v| v.scene.as_str()),
            Some("vehicles/suv.glb")
        );
        assert!(manifest.variant("coupe").is_none());
    }

    #[test]
    fn metadata_must_be_an_object() {
        let broken = r#"{"default_body_style": "a",
            "variants": [{"body_style": "a", "scene": "a.glb", "tech_metadata": 3}]}"#;
        assert!(serde_json::from_str::<VehicleManifest>(broken).is_err());
    }

    #[test]
    fn shipped_manifest_is_complete() {
        let manifest: VehicleManifest =
            serde_json::from_str(include_str!("../../../assets/vehicles/manifest.json")).unwrap();

        assert!(manifest.variant(&manifest.default_body_style).is_some());
        for variant in &manifest.variants {
            assert!(variant.scene.starts_with("vehicles/"), "{}", variant.scene);
            assert!(variant.scene.ends_with(".glb"), "{}", variant.scene);
            assert!(!variant.tech_metadata.is_empty(), "{} has no metadata", variant.body_style);
        }
        let suv = manifest.variant("suv").unwrap();
        assert_eq!(suv.tech_metadata.engine_hp(), 310.0);
        assert_eq!(suv.tech_metadata.trunk_capacity_liters(), 780.0);
    }
}
