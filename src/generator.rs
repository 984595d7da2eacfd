//! Single-icon generation.
//!
//! [`IconGenerator`] owns the catalog, the validated drawer table, the
//! transform envelope and the encoder. One [`generate`](IconGenerator::generate)
//! call allocates a surface, draws the category's design inside a freshly
//! sampled envelope and returns the encoded [`Icon`].

use std::sync::Arc;

use rand::RngCore;

use crate::category::{CategoryRegistry, SymbolCategory};
use crate::config::TransformSettings;
use crate::drawer::{DrawerTable, SymbolDesign};
use crate::encoder::IconEncoder;
use crate::engine::RenderingEngine;
use crate::error::{ConfigurationError, InputError, Result};
use crate::icon::{Icon, SizePx};
use crate::request::clamp_pixel_size;
use crate::transform::SymbolTransform;

pub struct IconGenerator {
    registry: Arc<CategoryRegistry>,
    drawers: DrawerTable,
    transform: SymbolTransform,
    encoder: IconEncoder,
}

impl IconGenerator {
    /// Pairs a registry with its drawer table.
    ///
    /// The table must have been built for this registry; a length mismatch is
    /// a configuration error.
    pub fn new(
        registry: Arc<CategoryRegistry>,
        drawers: DrawerTable,
        transform: SymbolTransform,
    ) -> Result<Self, ConfigurationError> {
        if let Some(category) = registry.iter().find(|c| drawers.get(c.id).is_none()) {
            return Err(ConfigurationError::MissingDrawer(category.key.clone()));
        }
        Ok(Self {
            registry,
            drawers,
            transform,
            encoder: IconEncoder::new(),
        })
    }

    /// The built-in catalog with its built-in designs.
    pub fn builtin(settings: TransformSettings) -> Result<Self, ConfigurationError> {
        let registry = CategoryRegistry::builtin();
        let drawers = DrawerTable::builtin(&registry)?;
        Self::new(Arc::new(registry), drawers, SymbolTransform::new(settings))
    }

    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    pub fn design(&self, category_id: usize) -> Option<SymbolDesign> {
        self.drawers.get(category_id)
    }

    fn category(&self, category_id: usize) -> Result<&SymbolCategory, InputError> {
        self.registry
            .get(category_id)
            .ok_or(InputError::UnknownCategory {
                id: category_id,
                len: self.registry.len(),
            })
    }

    /// Renders and encodes one icon of `category_id`.
    ///
    /// `size` is clamped like a request's pixel size. Fails with
    /// [`InputError::UnknownCategory`] for ids outside the registry and with
    /// an engine error if the surface cannot be allocated or encoded.
    pub fn generate(
        &self,
        engine: &RenderingEngine,
        category_id: usize,
        size: u32,
        rng: &mut dyn RngCore,
    ) -> Result<Icon> {
        let category = self.category(category_id)?;
        let design = self
            .drawers
            .get(category.id)
            .ok_or_else(|| ConfigurationError::MissingDrawer(category.key.clone()))?;

        let size = clamp_pixel_size(size as i64);
        let mut surface = engine.create_surface(size)?;
        self.transform
            .render(&mut surface, rng, |frame, ctx, rng| design.draw(frame, ctx, rng));

        let bytes = self.encoder.encode(&surface)?;
        Ok(Icon::new(category.id, SizePx::square(size), bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::error::Error;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    async fn engine() -> RenderingEngine {
        RenderingEngine::initialize(&EngineConfig::default()).await.unwrap()
    }

    #[tokio::test]
    async fn every_category_and_size_produces_bytes() {
        let engine = engine().await;
        let generator = IconGenerator::builtin(TransformSettings::default()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        for category in generator.registry().iter() {
            for size in [8u32, 9, 16, 31, 64, 100, 255, 512] {
                let icon = generator.generate(&engine, category.id, size, &mut rng).unwrap();
                assert!(!icon.bytes().is_empty(), "{} at {size}px", category.key);
                assert_eq!(icon.dimensions(), SizePx::square(size));
                assert_eq!(icon.category_id(), category.id);
            }
        }
    }

    #[tokio::test]
    async fn out_of_range_ids_fail() {
        let engine = engine().await;
        let generator = IconGenerator::builtin(TransformSettings::default()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        for id in [12usize, 13, usize::MAX] {
            let err = generator.generate(&engine, id, 32, &mut rng).unwrap_err();
            assert!(matches!(
                err,
                Error::Input(InputError::UnknownCategory { len: 12, .. })
            ));
        }
    }

    #[tokio::test]
    async fn consecutive_renders_differ() {
        let engine = engine().await;
        let generator = IconGenerator::builtin(TransformSettings::default()).unwrap();
        let mut rng = ChaCha8Rng::from_entropy();

        for category in generator.registry().iter() {
            if generator.design(category.id).is_some_and(SymbolDesign::is_placeholder) {
                continue;
            }
            let a = generator.generate(&engine, category.id, 64, &mut rng).unwrap();
            let b = generator.generate(&engine, category.id, 64, &mut rng).unwrap();
            assert_ne!(a.bytes(), b.bytes(), "{} repeated itself", category.key);
            assert_eq!(a.dimensions(), b.dimensions());
        }
    }

    #[tokio::test]
    async fn placeholders_render_blank() {
        let engine = engine().await;
        let generator = IconGenerator::builtin(TransformSettings::default()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mine = generator.registry().by_key("mine").unwrap().id;

        let icon = generator.generate(&engine, mine, 32, &mut rng).unwrap();
        let decoded = image::load_from_memory(icon.bytes()).unwrap().to_rgba8();
        assert!(decoded.pixels().all(|p| p.0[3] == 0));
    }

    #[tokio::test]
    async fn sizes_are_clamped() {
        let engine = engine().await;
        let generator = IconGenerator::builtin(TransformSettings::default()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        let small = generator.generate(&engine, 0, 2, &mut rng).unwrap();
        assert_eq!(small.dimensions(), SizePx::square(8));
        let large = generator.generate(&engine, 0, 4000, &mut rng).unwrap();
        assert_eq!(large.dimensions(), SizePx::square(512));
    }

    #[test]
    fn mismatched_table_is_rejected() {
        let builtin = CategoryRegistry::builtin();
        let small = CategoryRegistry::new(builtin.iter().take(2).cloned().collect()).unwrap();
        let table = DrawerTable::build(
            &small,
            &[
                ("town", SymbolDesign::ConcentricCircles),
                ("crossroads", SymbolDesign::CrossedDiagonals),
            ],
        )
        .unwrap();

        let result = IconGenerator::new(Arc::new(builtin), table, SymbolTransform::default());
        assert_eq!(
            result.err(),
            Some(ConfigurationError::MissingDrawer("hospital".into()))
        );
    }
}
