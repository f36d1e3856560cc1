//! Piece template registry
//!
//! Piece archetypes arrive as named objects inside one or more OBJ files. The
//! registry indexes every named object by its trimmed name; placement then
//! asks for a template by a key derived from piece kind and color.
//!
//! Asset packs disagree on naming (`White_Pawn` vs. `Pawn` / `Pawn.001`), so
//! key derivation is a [`TemplateKeys`] strategy rather than a fixed format.

use super::pieces::{PieceColor, PieceKind};
use crate::assets::{MeshData, ObjModel};
use crate::rendering::bounds::Bounds3;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Derives the registry key for a piece archetype
pub trait TemplateKeys {
    fn key(&self, kind: PieceKind, color: PieceColor) -> String;
}

/// Configurable naming conventions for template keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum NamingConvention {
    /// `"{Color}_{Kind}"`, e.g. `White_Pawn`, `Black_King`
    #[default]
    ColorPrefixed,
    /// One pattern per side with `{Color}` and `{Kind}` placeholders,
    /// e.g. `{ light: "{Kind}", dark: "{Kind}.001" }`
    Patterns { light: String, dark: String },
}

impl NamingConvention {
    /// Light pieces use the bare kind name, dark pieces the `.001` duplicate
    pub fn duplicate_suffix() -> Self {
        NamingConvention::Patterns {
            light: "{Kind}".into(),
            dark: "{Kind}.001".into(),
        }
    }
}

impl TemplateKeys for NamingConvention {
    fn key(&self, kind: PieceKind, color: PieceColor) -> String {
        match self {
            NamingConvention::ColorPrefixed => format!("{}_{}", color.name(), kind.name()),
            NamingConvention::Patterns { light, dark } => {
                let pattern = if color.is_light() { light } else { dark };
                pattern
                    .replace("{Color}", color.name())
                    .replace("{Kind}", kind.name())
            }
        }
    }
}

/// A reusable piece geometry, never mutated after extraction
#[derive(Debug, Clone)]
pub struct PieceTemplate {
    pub name: String,
    pub geometry: Arc<MeshData>,
    /// Model-space box; `None` when the geometry has no vertex
    pub bounds: Option<Bounds3>,
}

impl PieceTemplate {
    pub fn new(name: impl Into<String>, geometry: MeshData) -> Self {
        let bounds = geometry.bounds();
        Self {
            name: name.into(),
            geometry: Arc::new(geometry),
            bounds,
        }
    }

    /// Model-space height, zero for empty geometry
    pub fn raw_height(&self) -> f32 {
        self.bounds.map(|b| b.size().y).unwrap_or(0.0)
    }
}

/// Templates indexed by trimmed object name
#[derive(Resource, Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, PieceTemplate>,
}

impl TemplateRegistry {
    /// Indexes every named object of `model`, returning how many were recorded
    ///
    /// Names are trimmed; a later object with the same name replaces the
    /// earlier one. Objects whose name is empty or whitespace are skipped.
    pub fn register_model(&mut self, model: &ObjModel) -> usize {
        let mut recorded = 0;
        for object in &model.objects {
            let name = object.name.trim();
            if name.is_empty() {
                warn!(
                    "[TEMPLATES] Skipping unnamed object with {} vertices",
                    object.mesh.vertex_count()
                );
                continue;
            }
            if self.templates.contains_key(name) {
                debug!("[TEMPLATES] Replacing template `{}`", name);
            }
            self.insert(PieceTemplate::new(name, object.mesh.clone()));
            recorded += 1;
        }
        info!(
            "[TEMPLATES] Recorded {} templates ({} total)",
            recorded,
            self.len()
        );
        recorded
    }

    pub fn insert(&mut self, template: PieceTemplate) {
        self.templates.insert(template.name.clone(), template);
    }

    pub fn get(&self, key: &str) -> Option<&PieceTemplate> {
        self.templates.get(key)
    }

    /// Template for a piece archetype under the given key strategy
    pub fn resolve(
        &self,
        keys: &impl TemplateKeys,
        kind: PieceKind,
        color: PieceColor,
    ) -> Option<&PieceTemplate> {
        self.get(&keys.key(kind, color))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Registered names, sorted for stable output
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn templates(&self) -> impl Iterator<Item = &PieceTemplate> {
        self.templates.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ObjObject;

    fn triangle(height: f32) -> MeshData {
        MeshData {
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, height, 0.0]],
            ..default()
        }
    }

    fn object(name: &str, height: f32) -> ObjObject {
        ObjObject {
            name: name.to_string(),
            mesh: triangle(height),
        }
    }

    #[test]
    fn test_color_prefixed_keys() {
        let naming = NamingConvention::ColorPrefixed;
        assert_eq!(naming.key(PieceKind::Pawn, PieceColor::White), "White_Pawn");
        assert_eq!(naming.key(PieceKind::King, PieceColor::Black), "Black_King");
    }

    #[test]
    fn test_duplicate_suffix_keys() {
        //! The `Kind` / `Kind.001` convention distinguishes colors by suffix.
        let naming = NamingConvention::duplicate_suffix();
        assert_eq!(naming.key(PieceKind::Queen, PieceColor::White), "Queen");
        assert_eq!(naming.key(PieceKind::Queen, PieceColor::Black), "Queen.001");
    }

    #[test]
    fn test_custom_patterns_support_color_placeholder() {
        let naming = NamingConvention::Patterns {
            light: "piece-{Color}-{Kind}".into(),
            dark: "piece-{Color}-{Kind}".into(),
        };
        assert_eq!(
            naming.key(PieceKind::Knight, PieceColor::Black),
            "piece-Black-Knight"
        );
    }

    #[test]
    fn test_naming_convention_json_round_trip() {
        let json = r#"{"Patterns":{"light":"{Kind}","dark":"{Kind}.001"}}"#;
        let naming: NamingConvention = serde_json::from_str(json).unwrap();
        assert_eq!(naming, NamingConvention::duplicate_suffix());
    }

    #[test]
    fn test_register_trims_names_and_skips_blank() {
        //! Whitespace around names is dropped; blank names are skipped
        //! without failing the rest of the model.
        let model = ObjModel {
            objects: vec![object("  White_Pawn ", 1.0), object("   ", 1.0), object("", 1.0)],
        };
        let mut registry = TemplateRegistry::default();
        assert_eq!(registry.register_model(&model), 1);
        assert_eq!(registry.names(), vec!["White_Pawn"]);
    }

    #[test]
    fn test_last_write_wins_on_collision() {
        let mut registry = TemplateRegistry::default();
        registry.register_model(&ObjModel {
            objects: vec![object("White_Rook", 1.0)],
        });
        registry.register_model(&ObjModel {
            objects: vec![object("White_Rook", 3.0)],
        });
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("White_Rook").unwrap().raw_height(), 3.0);
    }

    #[test]
    fn test_resolve_uses_key_strategy() {
        let mut registry = TemplateRegistry::default();
        registry.register_model(&ObjModel {
            objects: vec![object("Bishop.001", 2.0)],
        });
        let naming = NamingConvention::duplicate_suffix();
        assert!(registry
            .resolve(&naming, PieceKind::Bishop, PieceColor::Black)
            .is_some());
        assert!(registry
            .resolve(&naming, PieceKind::Bishop, PieceColor::White)
            .is_none());
    }

    #[test]
    fn test_empty_geometry_template_has_zero_height() {
        let template = PieceTemplate::new("Empty", MeshData::default());
        assert!(template.bounds.is_none());
        assert_eq!(template.raw_height(), 0.0);
    }
}
