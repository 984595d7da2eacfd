//! Designs built from straight strokes and outlines.

use rand::{Rng, RngCore};

use super::uniform;
use crate::surface::Surface;
use crate::transform::TransformContext;

/// Two diagonal strokes crossing at the origin.
///
/// - half-extent: 0.28–0.38
/// - per-endpoint jitter: ±0.03
/// - stroke: 0.06–0.10
pub fn crossed_diagonals(surface: &mut Surface, ctx: &TransformContext, rng: &mut dyn RngCore) {
    let reach = ctx.len(uniform(rng, 0.28, 0.38));
    let stroke = uniform(rng, 0.06, 0.10);
    let mut jitter = || ctx.len(uniform(rng, -0.03, 0.03));

    let a = (-reach + jitter(), -reach + jitter());
    let b = (reach + jitter(), reach + jitter());
    let c = (-reach + jitter(), reach + jitter());
    let d = (reach + jitter(), -reach + jitter());

    surface.set_stroke_width(ctx.stroke(stroke));
    surface.line(a.0, a.1, b.0, b.1);
    surface.line(c.0, c.1, d.0, d.1);
}

/// Closed pentagon (a house silhouette with a pointed roof) with a cross
/// inside.
///
/// - half-width: 0.22–0.30
/// - half-height: 0.30–0.38
/// - apex-to-eave drop: 0.25–0.40 of the full height
/// - cross arm: 0.35–0.55 of the half-width
/// - stroke: 0.04–0.07
pub fn crossed_pentagon(surface: &mut Surface, ctx: &TransformContext, rng: &mut dyn RngCore) {
    let half_w = ctx.len(uniform(rng, 0.22, 0.30));
    let half_h = ctx.len(uniform(rng, 0.30, 0.38));
    let eave = -half_h + 2.0 * half_h * uniform(rng, 0.25, 0.40);
    let arm = half_w * uniform(rng, 0.35, 0.55);
    let stroke = uniform(rng, 0.04, 0.07);

    surface.set_stroke_width(ctx.stroke(stroke));
    surface.polygon(&[
        (0.0, -half_h),
        (half_w, eave),
        (half_w, half_h),
        (-half_w, half_h),
        (-half_w, eave),
    ]);

    let cross_y = (eave + half_h) / 2.0;
    let cross_h = (half_h - eave) * 0.35;
    surface.line(0.0, cross_y - cross_h, 0.0, cross_y + cross_h);
    surface.line(-arm, cross_y - cross_h * 0.3, arm, cross_y - cross_h * 0.3);
}

/// One L-shape drawn four times at 90° increments.
///
/// - gap from the origin: 0.04–0.08
/// - arm length: 0.18–0.30
/// - stroke: 0.05–0.08
pub fn fourfold_l(surface: &mut Surface, ctx: &TransformContext, rng: &mut dyn RngCore) {
    let gap = ctx.len(uniform(rng, 0.04, 0.08));
    let arm = ctx.len(uniform(rng, 0.18, 0.30));
    let stroke = uniform(rng, 0.05, 0.08);
    let corner = [(gap, gap + arm), (gap, gap), (gap + arm, gap)];

    surface.set_stroke_width(ctx.stroke(stroke));
    for quarter in 0..4 {
        surface.push();
        surface.rotate(quarter as f32 * 90.0);
        surface.polyline(&corner);
        surface.pop();
    }
}

/// Rectangle whose top edge alternates between raised and lowered steps.
///
/// - half-width: 0.28–0.36
/// - half-height: 0.22–0.30
/// - step height: 0.06–0.11
/// - raised steps: 2–4
/// - stroke: 0.04–0.07
pub fn stepped_outline(surface: &mut Surface, ctx: &TransformContext, rng: &mut dyn RngCore) {
    let half_w = ctx.len(uniform(rng, 0.28, 0.36));
    let half_h = ctx.len(uniform(rng, 0.22, 0.30));
    let step = ctx.len(uniform(rng, 0.06, 0.11));
    let raised: usize = rng.gen_range(2..=4);
    let stroke = uniform(rng, 0.04, 0.07);

    let segments = raised * 2 - 1;
    let width = half_w * 2.0 / segments as f32;
    // Lowered segments sit on the wall top; raised ones stick out above it.
    let wall_top = -half_h + step;

    let mut outline = Vec::with_capacity(segments * 2 + 2);
    outline.push((-half_w, half_h));
    for i in 0..segments {
        let y = if i % 2 == 0 { -half_h } else { wall_top };
        let x0 = -half_w + i as f32 * width;
        outline.push((x0, y));
        outline.push((x0 + width, y));
    }
    outline.push((half_w, half_h));

    surface.set_stroke_width(ctx.stroke(stroke));
    surface.polygon(&outline);
}
