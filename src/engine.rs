//! The shared rendering backend.
//!
//! [`RenderingEngine`] turns an [`EngineConfig`] into ready-to-use colors and
//! limits and hands out [`Surface`]s. It is created once per
//! [`EngineFactory`]: the first [`acquire`](EngineFactory::acquire) runs the
//! initialization, concurrent callers await the same in-flight attempt, and
//! later callers get the cached result. A failed initialization is cached
//! too; recovering from it means building a new factory.

use std::ops::Deref;
use std::sync::Arc;

use palette::Srgb;
use resvg::tiny_skia::Color;
use tokio::sync::OnceCell;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::surface::Surface;

/// Hard upper bound on any surface edge.
pub const SURFACE_SIZE_LIMIT: u32 = 4096;

// ============================================================================
// RenderingEngine
// ============================================================================

/// An initialized rasterizer with resolved drawing colors.
#[derive(Debug)]
pub struct RenderingEngine {
    ink: Color,
    background: Color,
    anti_alias: bool,
    max_surface_size: u32,
}

impl RenderingEngine {
    /// Resolves the configuration and probes the rasterizer.
    pub async fn initialize(config: &EngineConfig) -> Result<Self, EngineError> {
        if config.max_surface_size == 0 || config.max_surface_size > SURFACE_SIZE_LIMIT {
            return Err(EngineError::InitFailed(format!(
                "max surface size {} is outside 1..={SURFACE_SIZE_LIMIT}",
                config.max_surface_size
            )));
        }

        let ink = parse_color(&config.ink)?;
        let background = match &config.background {
            Some(hex) => parse_color(hex)?,
            None => Color::TRANSPARENT,
        };

        let engine = Self {
            ink,
            background,
            anti_alias: config.anti_alias,
            max_surface_size: config.max_surface_size,
        };

        // A backend that cannot allocate the smallest surface is unusable.
        engine
            .create_surface(1)
            .map_err(|e| EngineError::InitFailed(e.to_string()))?;

        tracing::debug!(
            anti_alias = engine.anti_alias,
            max_surface_size = engine.max_surface_size,
            "rendering engine initialized"
        );
        Ok(engine)
    }

    /// Creates a blank square surface filled with the background color.
    pub fn create_surface(&self, size: u32) -> Result<Surface, EngineError> {
        if size == 0 || size > self.max_surface_size {
            return Err(EngineError::SurfaceAllocation { size });
        }
        Surface::new(size, self.ink, self.background, self.anti_alias)
            .ok_or(EngineError::SurfaceAllocation { size })
    }

    pub fn max_surface_size(&self) -> u32 {
        self.max_surface_size
    }
}

/// Parses `#rrggbb` (leading `#` optional) into an opaque color.
fn parse_color(hex: &str) -> Result<Color, EngineError> {
    let rgb: Srgb<u8> = hex
        .trim()
        .parse()
        .map_err(|e| EngineError::InitFailed(format!("invalid color `{hex}`: {e}")))?;
    Ok(Color::from_rgba8(rgb.red, rgb.green, rgb.blue, 255))
}

// ============================================================================
// EngineHandle
// ============================================================================

/// Cheap, cloneable reference to the shared engine.
#[derive(Debug, Clone)]
pub struct EngineHandle(Arc<RenderingEngine>);

impl EngineHandle {
    /// Returns true if both handles point at the same engine instance.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for EngineHandle {
    type Target = RenderingEngine;

    fn deref(&self) -> &RenderingEngine {
        &self.0
    }
}

// ============================================================================
// EngineFactory
// ============================================================================

/// Constructs the engine once and returns the shared handle afterwards.
pub struct EngineFactory {
    config: EngineConfig,
    engine: OnceCell<Result<EngineHandle, EngineError>>,
}

impl EngineFactory {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            engine: OnceCell::new(),
        }
    }

    /// Returns the shared engine, initializing it on first use.
    pub async fn acquire(&self) -> Result<EngineHandle, EngineError> {
        self.engine
            .get_or_init(|| async {
                RenderingEngine::initialize(&self.config)
                    .await
                    .map(|engine| EngineHandle(Arc::new(engine)))
                    .inspect_err(|e| tracing::error!(error = %e, "engine initialization failed"))
            })
            .await
            .clone()
    }

    /// True once an initialization attempt has finished, successfully or not.
    pub fn is_resolved(&self) -> bool {
        self.engine.initialized()
    }
}

impl Default for EngineFactory {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn acquire_is_memoized() {
        let factory = EngineFactory::default();
        assert!(!factory.is_resolved());

        let first = factory.acquire().await.unwrap();
        let second = factory.acquire().await.unwrap();
        assert!(first.ptr_eq(&second));
        assert!(factory.is_resolved());
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_engine() {
        let factory = EngineFactory::default();
        let (a, b, c) = tokio::join!(factory.acquire(), factory.acquire(), factory.acquire());
        let (a, b, c) = (a.unwrap(), b.unwrap(), c.unwrap());
        assert!(a.ptr_eq(&b));
        assert!(b.ptr_eq(&c));
    }

    #[tokio::test]
    async fn failure_is_cached() {
        let factory = EngineFactory::new(EngineConfig {
            ink: "not-a-color".into(),
            ..EngineConfig::default()
        });

        let first = factory.acquire().await.unwrap_err();
        assert!(matches!(first, EngineError::InitFailed(_)));
        assert!(factory.is_resolved());

        let second = factory.acquire().await.unwrap_err();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn rejects_out_of_range_surface_limit() {
        let config = EngineConfig {
            max_surface_size: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            RenderingEngine::initialize(&config).await,
            Err(EngineError::InitFailed(_))
        ));
    }

    #[tokio::test]
    async fn surface_sizes_are_bounded() {
        let engine = RenderingEngine::initialize(&EngineConfig::default()).await.unwrap();
        assert_eq!(engine.create_surface(512).unwrap().size(), 512);
        assert_eq!(
            engine.create_surface(513).err(),
            Some(EngineError::SurfaceAllocation { size: 513 })
        );
        assert_eq!(
            engine.create_surface(0).err(),
            Some(EngineError::SurfaceAllocation { size: 0 })
        );
    }

    #[test]
    fn parses_hex_colors() {
        assert!(parse_color("#ff8800").is_ok());
        assert!(parse_color("ff8800").is_ok());
        assert!(parse_color("#ff88").is_err());
    }

    #[tokio::test]
    async fn background_fills_surface() {
        let config = EngineConfig {
            background: Some("#ffffff".into()),
            ..EngineConfig::default()
        };
        let engine = RenderingEngine::initialize(&config).await.unwrap();
        let surface = engine.create_surface(4).unwrap();
        let pixmap = surface.pixmap().unwrap();
        assert_eq!(&pixmap.data()[..4], &[255, 255, 255, 255]);
    }
}
