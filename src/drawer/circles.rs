//! Designs built around a central ring.
//!
//! Lengths are fractions of the canvas edge; ranges are listed per routine.

use rand::RngCore;

use super::uniform;
use crate::surface::Surface;
use crate::transform::TransformContext;

/// Ring with a solid dot at its center.
///
/// - ring radius: 0.30–0.40
/// - ring stroke: 0.05–0.08
/// - dot radius: 0.07–0.12
pub fn concentric_circles(surface: &mut Surface, ctx: &TransformContext, rng: &mut dyn RngCore) {
    let ring = ctx.len(uniform(rng, 0.30, 0.40));
    let stroke = uniform(rng, 0.05, 0.08);
    let dot = ctx.len(uniform(rng, 0.07, 0.12));

    surface.set_stroke_width(ctx.stroke(stroke));
    surface.circle(0.0, 0.0, ring);
    surface.fill_circle(0.0, 0.0, dot);
}

/// Ring enclosing a plus of one horizontal and one vertical bar.
///
/// - ring radius: 0.36–0.42
/// - ring stroke: 0.04–0.06
/// - bar half-length: 0.18–0.25
/// - bar thickness: 0.07–0.11
pub fn barred_circle(surface: &mut Surface, ctx: &TransformContext, rng: &mut dyn RngCore) {
    let ring = ctx.len(uniform(rng, 0.36, 0.42));
    let stroke = uniform(rng, 0.04, 0.06);
    let arm = ctx.len(uniform(rng, 0.18, 0.25));
    let bar = ctx.len(uniform(rng, 0.07, 0.11));

    surface.set_stroke_width(ctx.stroke(stroke));
    surface.circle(0.0, 0.0, ring);
    surface.fill_rect(-arm, -bar / 2.0, arm * 2.0, bar);
    surface.fill_rect(-bar / 2.0, -arm, bar, arm * 2.0);
}

/// Ring with four T-shaped strokes pointing outward at right angles.
///
/// Each T is drawn once and rotated into place, with a small per-arm wobble.
///
/// - ring radius: 0.18–0.24
/// - stroke: 0.05–0.07
/// - stem length: 0.10–0.15
/// - crossbar half-width: 0.06–0.10
/// - per-arm wobble: ±4°
pub fn t_junction_circle(surface: &mut Surface, ctx: &TransformContext, rng: &mut dyn RngCore) {
    let ring = ctx.len(uniform(rng, 0.18, 0.24));
    let stroke = uniform(rng, 0.05, 0.07);
    let stem = ctx.len(uniform(rng, 0.10, 0.15));
    let half_bar = ctx.len(uniform(rng, 0.06, 0.10));

    surface.set_stroke_width(ctx.stroke(stroke));
    surface.circle(0.0, 0.0, ring);

    let tip = ring + stem;
    for quarter in 0..4 {
        let wobble = uniform(rng, -4.0, 4.0);
        surface.push();
        surface.rotate(quarter as f32 * 90.0 + wobble);
        surface.line(0.0, -ring, 0.0, -tip);
        surface.line(-half_bar, -tip, half_bar, -tip);
        surface.pop();
    }
}

/// Small ring with eight evenly spaced radial spokes.
///
/// - hub radius: 0.10–0.15
/// - gap between hub and spokes: 0.03–0.06
/// - spoke outer radius: 0.34–0.42
/// - stroke: 0.04–0.07
pub fn spoked_circle(surface: &mut Surface, ctx: &TransformContext, rng: &mut dyn RngCore) {
    let hub = ctx.len(uniform(rng, 0.10, 0.15));
    let gap = ctx.len(uniform(rng, 0.03, 0.06));
    let outer = ctx.len(uniform(rng, 0.34, 0.42));
    let stroke = uniform(rng, 0.04, 0.07);

    surface.set_stroke_width(ctx.stroke(stroke));
    surface.circle(0.0, 0.0, hub);

    let inner = hub + gap;
    for spoke in 0..8 {
        let (sin, cos) = (spoke as f32 * std::f32::consts::FRAC_PI_4).sin_cos();
        surface.line(inner * cos, inner * sin, outer * cos, outer * sin);
    }
}
