//! The randomized transform envelope.
//!
//! Every icon is drawn inside the same envelope: a frame centered on the
//! surface, rotated, scaled and nudged by freshly sampled amounts. The
//! sampled scale travels to the drawer in a [`TransformContext`] so stroke
//! widths can be compensated and stay visually constant.

use rand::{Rng, RngCore};

use crate::config::TransformSettings;
use crate::surface::Surface;

// ============================================================================
// TransformContext
// ============================================================================

/// Per-render view of the envelope, handed to the drawer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformContext {
    /// Canvas edge in pixels.
    pub size: f32,

    /// Scale applied to the frame for this render.
    pub scale: f32,
}

impl TransformContext {
    /// A context with no scaling.
    pub fn neutral(size: u32) -> Self {
        Self {
            size: size as f32,
            scale: 1.0,
        }
    }

    /// Stroke width for a thickness of `size * factor` rendered pixels.
    ///
    /// The frame is scaled by `scale`, so the width is divided by it to keep
    /// the rendered thickness independent of the sampled scale. Never below 1.
    pub fn stroke(&self, factor: f32) -> f32 {
        compensated_stroke(self.size, factor, self.scale)
    }

    /// `fraction` of the canvas edge, in frame units.
    pub fn len(&self, fraction: f32) -> f32 {
        self.size * fraction
    }
}

/// `max(1, size * factor / scale)`.
pub fn compensated_stroke(size: f32, factor: f32, scale: f32) -> f32 {
    (size * factor / scale).max(1.0)
}

// ============================================================================
// TransformSample
// ============================================================================

/// One draw of the envelope's random parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformSample {
    pub rotation_deg: f32,
    pub scale: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

// ============================================================================
// SymbolTransform
// ============================================================================

/// Applies the randomized rotation, scale and jitter around a draw call.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymbolTransform {
    settings: TransformSettings,
}

impl SymbolTransform {
    pub fn new(settings: TransformSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &TransformSettings {
        &self.settings
    }

    /// Samples rotation, scale and center offset for a canvas of `size`.
    pub fn sample(&self, size: u32, rng: &mut dyn RngCore) -> TransformSample {
        let s = &self.settings;
        let max_offset = size as f32 * s.max_offset_fraction.abs();
        TransformSample {
            rotation_deg: symmetric(rng, s.max_rotation_deg.abs()),
            scale: between(rng, s.min_scale, s.max_scale),
            offset_x: symmetric(rng, max_offset),
            offset_y: symmetric(rng, max_offset),
        }
    }

    /// Samples an envelope and draws inside it.
    pub fn render<F>(&self, surface: &mut Surface, rng: &mut dyn RngCore, draw: F) -> TransformSample
    where
        F: FnOnce(&mut Surface, &TransformContext, &mut dyn RngCore),
    {
        let sample = self.sample(surface.size(), rng);
        self.render_with(surface, sample, rng, draw);
        sample
    }

    /// Draws inside a given envelope.
    ///
    /// Order is: move to the center, rotate, scale, then offset. The surface
    /// state is restored when this returns or unwinds.
    pub fn render_with<F>(
        &self,
        surface: &mut Surface,
        sample: TransformSample,
        rng: &mut dyn RngCore,
        draw: F,
    ) where
        F: FnOnce(&mut Surface, &TransformContext, &mut dyn RngCore),
    {
        let center = surface.size() as f32 / 2.0;
        let ctx = TransformContext {
            size: surface.size() as f32,
            scale: sample.scale,
        };

        let mut frame = surface.save();
        frame.translate(center, center);
        frame.rotate(sample.rotation_deg);
        frame.scale(sample.scale);
        frame.translate(sample.offset_x, sample.offset_y);

        draw(&mut *frame, &ctx, rng);
    }
}

/// Uniform sample from `[-bound, bound]`.
fn symmetric(rng: &mut dyn RngCore, bound: f32) -> f32 {
    if bound > 0.0 {
        rng.gen_range(-bound..=bound)
    } else {
        0.0
    }
}

/// Uniform sample from `[lo, hi]`, tolerating a reversed or empty range.
fn between(rng: &mut dyn RngCore, lo: f32, hi: f32) -> f32 {
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    if hi > lo { rng.gen_range(lo..=hi) } else { lo }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::engine::RenderingEngine;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use resvg::tiny_skia::Transform;

    #[test]
    fn samples_stay_in_range() {
        let transform = SymbolTransform::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..2000 {
            let s = transform.sample(200, &mut rng);
            assert!((-20.0..=20.0).contains(&s.rotation_deg));
            assert!((0.5..=1.0).contains(&s.scale));
            assert!(s.offset_x.abs() <= 10.0);
            assert!(s.offset_y.abs() <= 10.0);
        }
    }

    #[test]
    fn stroke_compensation_law() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for size in [8u32, 33, 128, 512] {
            for _ in 0..200 {
                let scale = rng.gen_range(0.5f32..=1.0);
                let factor = rng.gen_range(0.0f32..0.2);
                let ctx = TransformContext {
                    size: size as f32,
                    scale,
                };
                let expected = (size as f32 * factor / scale).max(1.0);
                assert_eq!(ctx.stroke(factor), expected);
                assert!(ctx.stroke(factor) >= 1.0);
            }
        }
    }

    #[test]
    fn tiny_strokes_floor_at_one_pixel() {
        let ctx = TransformContext { size: 8.0, scale: 1.0 };
        assert_eq!(ctx.stroke(0.01), 1.0);
        assert_eq!(TransformContext::neutral(64).scale, 1.0);
    }

    #[test]
    fn degenerate_settings_do_not_panic() {
        let transform = SymbolTransform::new(TransformSettings {
            max_rotation_deg: 0.0,
            min_scale: 0.8,
            max_scale: 0.8,
            max_offset_fraction: 0.0,
        });
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let s = transform.sample(64, &mut rng);
        assert_eq!(s.rotation_deg, 0.0);
        assert_eq!(s.scale, 0.8);
        assert_eq!((s.offset_x, s.offset_y), (0.0, 0.0));
    }

    #[tokio::test]
    async fn render_passes_sampled_scale_and_restores_state() {
        let engine = RenderingEngine::initialize(&EngineConfig::default()).await.unwrap();
        let mut surface = engine.create_surface(64).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let mut seen = None;
        let sample = SymbolTransform::default().render(&mut surface, &mut rng, |frame, ctx, _| {
            assert_eq!(frame.depth(), 1);
            assert_ne!(frame.transform(), Transform::identity());
            seen = Some(*ctx);
            frame.fill_circle(0.0, 0.0, 4.0);
        });

        let ctx = seen.unwrap();
        assert_eq!(ctx.scale, sample.scale);
        assert_eq!(ctx.size, 64.0);
        assert_eq!(surface.depth(), 0);
        assert_eq!(surface.transform(), Transform::identity());
        assert!(surface.painted_pixels() > 0);
    }

    #[tokio::test]
    async fn origin_maps_to_jittered_center() {
        let engine = RenderingEngine::initialize(&EngineConfig::default()).await.unwrap();
        let mut surface = engine.create_surface(100).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let sample = TransformSample {
            rotation_deg: 0.0,
            scale: 0.5,
            offset_x: 4.0,
            offset_y: -2.0,
        };

        SymbolTransform::default().render_with(&mut surface, sample, &mut rng, |frame, _, _| {
            let t = frame.transform();
            // Offset is applied inside the scaled frame.
            assert_eq!((t.tx, t.ty), (52.0, 49.0));
            assert_eq!((t.sx, t.sy), (0.5, 0.5));
        });
    }

    #[tokio::test]
    async fn state_is_restored_after_panicking_drawer() {
        let engine = RenderingEngine::initialize(&EngineConfig::default()).await.unwrap();
        let mut surface = engine.create_surface(16).unwrap();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let mut rng = ChaCha8Rng::seed_from_u64(0);
            SymbolTransform::default().render(&mut surface, &mut rng, |_, _, _| {
                panic!("drawer failed");
            });
        }));

        assert!(result.is_err());
        assert_eq!(surface.depth(), 0);
        assert_eq!(surface.transform(), Transform::identity());
    }
}
