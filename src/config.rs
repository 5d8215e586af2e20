//! Configuration system for Plexus Studio RS
//! Immutable effect parameters, color palette and the declared parameter schema

use serde::{Deserialize, Serialize};

// ============================================================================
// Parameter schema
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub enum ParamKind {
    Int,
    Float,
}

/// Declared metadata for one tunable parameter, consumed by the host UI.
#[derive(Clone, Copy, Debug)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub default: f64,
    pub min: f64,
    pub max: f64,
    pub description: &'static str,
}

pub const PARAM_SCHEMA: &[ParamSpec] = &[
    ParamSpec {
        name: "particle_count",
        kind: ParamKind::Int,
        default: 200.0,
        min: 50.0,
        max: 500.0,
        description: "Number of 3D particles",
    },
    ParamSpec {
        name: "animation_speed",
        kind: ParamKind::Float,
        default: 0.3,
        min: 0.1,
        max: 2.0,
        description: "Animation speed multiplier",
    },
    ParamSpec {
        name: "camera_distance",
        kind: ParamKind::Int,
        default: 800.0,
        min: 400.0,
        max: 1200.0,
        description: "Camera distance from focus plane",
    },
    ParamSpec {
        name: "aperture",
        kind: ParamKind::Float,
        default: 2.8,
        min: 1.4,
        max: 8.0,
        description: "Camera aperture (lower = more blur)",
    },
    ParamSpec {
        name: "space_depth",
        kind: ParamKind::Int,
        default: 1000.0,
        min: 500.0,
        max: 2000.0,
        description: "3D space depth",
    },
];

// ============================================================================
// Effect configuration
// ============================================================================

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct PlexusConfig {
    pub particle_count: usize,
    pub animation_speed: f32,
    pub camera_distance: f32,
    pub aperture: f32,
    pub space_width: f32,
    pub space_height: f32,
    pub space_depth: f32,
    pub max_connection_distance: f32,
    pub max_connections_per_particle: usize,
}

impl Default for PlexusConfig {
    fn default() -> Self {
        Self {
            particle_count: 200,
            animation_speed: 0.3,
            camera_distance: 800.0,
            aperture: 2.8,
            space_width: 1200.0,
            space_height: 800.0,
            space_depth: 1000.0,
            max_connection_distance: 200.0,
            max_connections_per_particle: 8,
        }
    }
}

impl PlexusConfig {
    /// Clamp every schema-declared parameter into its valid range.
    ///
    /// External values are expected pre-validated, but the effect is
    /// constructed from whatever the host hands it, so the entry point clamps
    /// once and the core never re-checks.
    pub fn sanitize(mut self) -> Self {
        for spec in PARAM_SCHEMA {
            let v = self.get(spec.name).clamp(spec.min, spec.max);
            self.set(spec.name, v);
        }
        self.space_width = self.space_width.max(1.0);
        self.space_height = self.space_height.max(1.0);
        self.max_connection_distance = self.max_connection_distance.max(1.0);
        self
    }

    /// Read a schema parameter by name. Unknown names return 0.
    pub fn get(&self, name: &str) -> f64 {
        match name {
            "particle_count" => self.particle_count as f64,
            "animation_speed" => self.animation_speed as f64,
            "camera_distance" => self.camera_distance as f64,
            "aperture" => self.aperture as f64,
            "space_depth" => self.space_depth as f64,
            _ => 0.0,
        }
    }

    /// Write a schema parameter by name. Unknown names are ignored.
    pub fn set(&mut self, name: &str, value: f64) {
        match name {
            "particle_count" => self.particle_count = value.round() as usize,
            "animation_speed" => self.animation_speed = value as f32,
            "camera_distance" => self.camera_distance = value as f32,
            "aperture" => self.aperture = value as f32,
            "space_depth" => self.space_depth = value as f32,
            _ => {}
        }
    }

    pub fn preset_names() -> Vec<&'static str> {
        vec!["Default", "Macro", "Deep Field"]
    }

    pub fn preset(name: &str) -> Self {
        match name {
            "Macro" => Self {
                camera_distance: 600.0,
                aperture: 1.4,
                ..Self::default()
            },
            "Deep Field" => Self {
                particle_count: 320,
                space_depth: 2000.0,
                aperture: 4.0,
                animation_speed: 0.2,
                ..Self::default()
            },
            _ => Self::default(),
        }
    }
}

// ============================================================================
// Color palette
// ============================================================================

/// Named colors of the plexus look. Immutable after construction.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct ColorPalette {
    pub background: [u8; 3],
    pub particle_sharp: [u8; 3],
    pub particle_medium: [u8; 3],
    pub particle_soft: [u8; 3],
    pub connection_bright: [u8; 3],
    pub connection_medium: [u8; 3],
    pub connection_soft: [u8; 3],
    pub glow_white: [u8; 3],
    pub glow_blue: [u8; 3],
    pub atmosphere: [u8; 3],
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self {
            background: [4, 8, 16],
            particle_sharp: [240, 250, 255],
            particle_medium: [180, 220, 245],
            particle_soft: [120, 160, 200],
            connection_bright: [200, 230, 255],
            connection_medium: [140, 180, 220],
            connection_soft: [80, 120, 160],
            glow_white: [255, 255, 255],
            glow_blue: [150, 200, 255],
            atmosphere: [20, 40, 80],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_schema_defaults() {
        let config = PlexusConfig::default();
        for spec in PARAM_SCHEMA {
            assert_eq!(
                config.get(spec.name),
                spec.default,
                "default mismatch for {}",
                spec.name
            );
        }
    }

    #[test]
    fn sanitize_clamps_out_of_range_values() {
        let config = PlexusConfig {
            particle_count: 10_000,
            aperture: -3.0,
            camera_distance: 0.0,
            ..Default::default()
        }
        .sanitize();

        assert_eq!(config.particle_count, 500);
        assert_eq!(config.aperture, 1.4);
        assert_eq!(config.camera_distance, 400.0);
    }

    #[test]
    fn schema_declares_five_parameters() {
        assert_eq!(PARAM_SCHEMA.len(), 5);
        for spec in PARAM_SCHEMA {
            assert!(spec.min < spec.max);
            assert!(spec.default >= spec.min && spec.default <= spec.max);
        }
    }

    #[test]
    fn presets_resolve_by_name() {
        for name in PlexusConfig::preset_names() {
            let preset = PlexusConfig::preset(name).sanitize();
            assert_eq!(preset, PlexusConfig::preset(name));
        }
        assert_eq!(PlexusConfig::preset("unknown"), PlexusConfig::default());
    }
}
