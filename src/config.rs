//! Serializable generator configuration.
//!
//! A [`GeneratorConfig`] captures every tunable of the engine, the transform
//! envelope and the batch pipeline in a JSON-friendly format. Every field has
//! a default, so an empty object is a valid configuration.
//!
//! # Example
//!
//! ```
//! use map_symbol_renderer::{EngineConfig, GeneratorConfig, PipelineSettings};
//!
//! let config = GeneratorConfig::new()
//!     .with_engine(EngineConfig {
//!         ink: "#202020".into(),
//!         ..EngineConfig::default()
//!     })
//!     .with_pipeline(PipelineSettings {
//!         yield_every: 50,
//!         ..PipelineSettings::default()
//!     });
//!
//! let json = config.to_json().unwrap();
//! let restored = GeneratorConfig::from_json(&json).unwrap();
//! assert_eq!(restored.pipeline.yield_every, 50);
//! ```

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

// ============================================================================
// Engine
// ============================================================================

/// Settings for the rendering backend.
///
/// Colors are hex strings (`#rrggbb`); they are parsed when the engine
/// initializes, so a bad color surfaces as an engine initialization failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Color of every stroke and fill.
    pub ink: String,

    /// Background fill. `None` leaves the surface transparent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,

    /// Whether primitives are anti-aliased.
    pub anti_alias: bool,

    /// Largest surface edge the engine will allocate, in pixels.
    pub max_surface_size: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ink: "#000000".into(),
            background: None,
            anti_alias: true,
            max_surface_size: 512,
        }
    }
}

// ============================================================================
// Transform
// ============================================================================

/// Sampling ranges of the randomized transform envelope.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransformSettings {
    /// Rotation is sampled from `[-max_rotation_deg, max_rotation_deg]`.
    pub max_rotation_deg: f32,

    /// Lower bound of the sampled scale.
    pub min_scale: f32,

    /// Upper bound of the sampled scale.
    pub max_scale: f32,

    /// Center offset per axis, as a fraction of the icon size.
    pub max_offset_fraction: f32,
}

impl Default for TransformSettings {
    fn default() -> Self {
        Self {
            max_rotation_deg: 20.0,
            min_scale: 0.5,
            max_scale: 1.0,
            max_offset_fraction: 0.05,
        }
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// Settings of the batch pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PipelineSettings {
    /// Icons produced between two progress events / scheduler yields.
    pub yield_every: usize,

    /// File name handed to the downloader.
    pub archive_name: String,

    /// Fixed RNG seed. Renders are entropy-seeded when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            yield_every: 200,
            archive_name: "map-symbols.zip".into(),
            seed: None,
        }
    }
}

impl PipelineSettings {
    /// Yield interval, never zero.
    pub fn yield_interval(&self) -> usize {
        self.yield_every.max(1)
    }

    /// Creates the RNG for one run.
    pub fn rng(&self) -> ChaCha8Rng {
        match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        }
    }
}

// ============================================================================
// GeneratorConfig
// ============================================================================

/// All generator settings.
///
/// # JSON Format
///
/// ```json
/// {
///   "engine": { "ink": "#000000", "antiAlias": true, "maxSurfaceSize": 512 },
///   "transform": { "maxRotationDeg": 20.0, "minScale": 0.5, "maxScale": 1.0, "maxOffsetFraction": 0.05 },
///   "pipeline": { "yieldEvery": 200, "archiveName": "map-symbols.zip" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorConfig {
    pub engine: EngineConfig,
    pub transform: TransformSettings,
    pub pipeline: PipelineSettings,
}

impl GeneratorConfig {
    /// Creates a configuration with every default.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_transform(mut self, transform: TransformSettings) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_pipeline(mut self, pipeline: PipelineSettings) -> Self {
        self.pipeline = pipeline;
        self
    }

    /// Serializes the configuration to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the configuration to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn empty_object_uses_defaults() {
        let config = GeneratorConfig::from_json("{}").unwrap();
        assert_eq!(config, GeneratorConfig::default());
        assert_eq!(config.transform.max_rotation_deg, 20.0);
        assert_eq!(config.pipeline.yield_every, 200);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let json = r##"{ "engine": { "background": "#ffffff" }, "pipeline": { "seed": 7 } }"##;
        let config = GeneratorConfig::from_json(json).unwrap();

        assert_eq!(config.engine.background.as_deref(), Some("#ffffff"));
        assert_eq!(config.engine.ink, "#000000");
        assert_eq!(config.pipeline.seed, Some(7));
        assert_eq!(config.pipeline.archive_name, "map-symbols.zip");
    }

    #[test]
    fn serializes_camel_case() {
        let json = GeneratorConfig::new().to_json().unwrap();
        assert!(json.contains("\"maxSurfaceSize\":512"));
        assert!(json.contains("\"yieldEvery\":200"));
        assert!(!json.contains("seed"), "absent seed should be skipped");
    }

    #[test]
    fn yield_interval_is_never_zero() {
        let settings = PipelineSettings {
            yield_every: 0,
            ..PipelineSettings::default()
        };
        assert_eq!(settings.yield_interval(), 1);
    }

    #[test]
    fn seeded_rng_repeats() {
        let settings = PipelineSettings {
            seed: Some(42),
            ..PipelineSettings::default()
        };
        let a: u64 = settings.rng().r#gen();
        let b: u64 = settings.rng().r#gen();
        assert_eq!(a, b);
    }
}
