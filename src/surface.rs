//! Offscreen raster surfaces.
//!
//! A [`Surface`] wraps a `tiny_skia` pixmap with a current transform, a
//! save/restore stack and a small set of stroke and fill primitives. All
//! coordinates passed to the primitives are in the current (transformed)
//! frame; the transform is applied at rasterization time.

use std::ops::{Deref, DerefMut};

use resvg::tiny_skia::{
    Color, FillRule, LineCap, LineJoin, Paint, Path, PathBuilder, Pixmap, Rect, Stroke, Transform,
};

/// Drawing state captured by [`Surface::push`].
#[derive(Debug, Clone, Copy)]
struct DrawState {
    transform: Transform,
    stroke_width: f32,
}

// ============================================================================
// Surface
// ============================================================================

/// An offscreen drawing target produced by the rendering engine.
pub struct Surface {
    pixmap: Option<Pixmap>,
    size: u32,
    state: DrawState,
    saved: Vec<DrawState>,
    paint: Paint<'static>,
    blank: [u8; 4],
}

impl Surface {
    /// Creates a square surface filled with `background`.
    ///
    /// Returns `None` if the pixmap cannot be allocated.
    pub(crate) fn new(size: u32, ink: Color, background: Color, anti_alias: bool) -> Option<Self> {
        let mut pixmap = Pixmap::new(size, size)?;
        pixmap.fill(background);

        let mut blank = [0u8; 4];
        blank.copy_from_slice(&pixmap.data()[..4]);

        let mut paint = Paint::default();
        paint.set_color(ink);
        paint.anti_alias = anti_alias;

        Some(Self {
            pixmap: Some(pixmap),
            size,
            state: DrawState {
                transform: Transform::identity(),
                stroke_width: 1.0,
            },
            saved: Vec::new(),
            paint,
            blank,
        })
    }

    /// Edge length in pixels.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// The current transform.
    pub fn transform(&self) -> Transform {
        self.state.transform
    }

    /// Number of states currently pushed.
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    // ---- State stack ----

    /// Saves the current transform and stroke width.
    pub fn push(&mut self) {
        self.saved.push(self.state);
    }

    /// Restores the most recently pushed state.
    ///
    /// Returns `false` if nothing was pushed.
    pub fn pop(&mut self) -> bool {
        match self.saved.pop() {
            Some(state) => {
                self.state = state;
                true
            }
            None => false,
        }
    }

    /// Pushes the current state and returns a guard that restores it on drop.
    ///
    /// The guard dereferences to the surface, so drawing continues through it.
    pub fn save(&mut self) -> SavedState<'_> {
        let depth = self.saved.len();
        self.push();
        SavedState {
            surface: self,
            depth,
        }
    }

    fn restore_to(&mut self, depth: usize) {
        while self.saved.len() > depth {
            self.pop();
        }
    }

    // ---- Transform ----

    /// Rotates the frame by `degrees` (clockwise in pixel space).
    pub fn rotate(&mut self, degrees: f32) {
        self.state.transform = self.state.transform.pre_concat(Transform::from_rotate(degrees));
    }

    /// Scales the frame uniformly.
    pub fn scale(&mut self, factor: f32) {
        self.state.transform = self.state.transform.pre_scale(factor, factor);
    }

    /// Moves the frame origin.
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.state.transform = self.state.transform.pre_translate(dx, dy);
    }

    // ---- Primitives ----

    /// Sets the stroke width in the current frame's units.
    pub fn set_stroke_width(&mut self, width: f32) {
        self.state.stroke_width = width.max(0.0);
    }

    pub fn stroke_width(&self) -> f32 {
        self.state.stroke_width
    }

    /// Strokes a straight segment.
    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.polyline(&[(x1, y1), (x2, y2)]);
    }

    /// Strokes a circle outline. Non-positive radii draw nothing.
    pub fn circle(&mut self, cx: f32, cy: f32, radius: f32) {
        if let Some(path) = circle_path(cx, cy, radius) {
            self.stroke(&path);
        }
    }

    /// Fills a disc.
    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32) {
        if let Some(path) = circle_path(cx, cy, radius) {
            self.fill(&path);
        }
    }

    /// Strokes an open polyline through `points`. Needs at least two points.
    pub fn polyline(&mut self, points: &[(f32, f32)]) {
        if let Some(path) = build_path(points, false) {
            self.stroke(&path);
        }
    }

    /// Strokes a closed shape through `points`. Needs at least two points.
    pub fn polygon(&mut self, points: &[(f32, f32)]) {
        if let Some(path) = build_path(points, true) {
            self.stroke(&path);
        }
    }

    /// Strokes a rectangle outline. Empty rectangles draw nothing.
    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        if let Some(rect) = non_empty_rect(x, y, width, height) {
            self.stroke(&PathBuilder::from_rect(rect));
        }
    }

    /// Fills a rectangle.
    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        if let Some(rect) = non_empty_rect(x, y, width, height) {
            self.fill(&PathBuilder::from_rect(rect));
        }
    }

    fn stroke(&mut self, path: &Path) {
        let Some(pixmap) = self.pixmap.as_mut() else {
            return;
        };
        let stroke = Stroke {
            width: self.state.stroke_width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        pixmap.stroke_path(path, &self.paint, &stroke, self.state.transform, None);
    }

    fn fill(&mut self, path: &Path) {
        let Some(pixmap) = self.pixmap.as_mut() else {
            return;
        };
        pixmap.fill_path(path, &self.paint, FillRule::Winding, self.state.transform, None);
    }

    // ---- Pixel buffer ----

    /// The backing pixmap, if the surface still owns one.
    pub fn pixmap(&self) -> Option<&Pixmap> {
        self.pixmap.as_ref()
    }

    /// Detaches the backing pixmap. Later draws are no-ops and encoding fails.
    pub fn take_pixmap(&mut self) -> Option<Pixmap> {
        self.pixmap.take()
    }

    /// Counts pixels that differ from the initial background.
    pub fn painted_pixels(&self) -> usize {
        self.pixmap.as_ref().map_or(0, |pixmap| {
            pixmap
                .data()
                .chunks_exact(4)
                .filter(|px| *px != self.blank.as_slice())
                .count()
        })
    }
}

fn build_path(points: &[(f32, f32)], closed: bool) -> Option<Path> {
    if points.len() < 2 {
        return None;
    }
    let (&(x0, y0), rest) = points.split_first()?;
    let mut builder = PathBuilder::new();
    builder.move_to(x0, y0);
    for &(x, y) in rest {
        builder.line_to(x, y);
    }
    if closed {
        builder.close();
    }
    builder.finish()
}

fn circle_path(cx: f32, cy: f32, radius: f32) -> Option<Path> {
    if radius <= 0.0 || !radius.is_finite() {
        return None;
    }
    PathBuilder::from_circle(cx, cy, radius)
}

fn non_empty_rect(x: f32, y: f32, width: f32, height: f32) -> Option<Rect> {
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    Rect::from_xywh(x, y, width, height)
}

// ============================================================================
// SavedState
// ============================================================================

/// Scope guard returned by [`Surface::save`].
///
/// Dropping it restores the surface to the state it had before `save`,
/// including when the scope unwinds.
pub struct SavedState<'a> {
    surface: &'a mut Surface,
    depth: usize,
}

impl Deref for SavedState<'_> {
    type Target = Surface;

    fn deref(&self) -> &Surface {
        self.surface
    }
}

impl DerefMut for SavedState<'_> {
    fn deref_mut(&mut self) -> &mut Surface {
        self.surface
    }
}

impl Drop for SavedState<'_> {
    fn drop(&mut self) {
        self.surface.restore_to(self.depth);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface(size: u32) -> Surface {
        Surface::new(size, Color::BLACK, Color::TRANSPARENT, true).unwrap()
    }

    #[test]
    fn new_surface_is_blank() {
        let s = surface(16);
        assert_eq!(s.size(), 16);
        assert_eq!(s.painted_pixels(), 0);
        assert_eq!(s.depth(), 0);
    }

    #[test]
    fn zero_size_fails() {
        assert!(Surface::new(0, Color::BLACK, Color::WHITE, true).is_none());
    }

    #[test]
    fn primitives_paint_pixels() {
        let mut s = surface(32);
        s.set_stroke_width(2.0);
        s.line(4.0, 4.0, 28.0, 28.0);
        let after_line = s.painted_pixels();
        assert!(after_line > 0);

        s.fill_circle(16.0, 16.0, 6.0);
        assert!(s.painted_pixels() > after_line);
    }

    #[test]
    fn degenerate_shapes_are_ignored() {
        let mut s = surface(16);
        s.polyline(&[]);
        s.polygon(&[(3.0, 3.0)]);
        s.circle(8.0, 8.0, 0.0);
        s.rect(1.0, 1.0, 0.0, 0.0);
        s.fill_circle(8.0, 8.0, -2.0);
        s.fill_rect(2.0, 2.0, 5.0, 0.0);
        s.rect(2.0, 2.0, -4.0, 4.0);
        assert_eq!(s.painted_pixels(), 0);

        s.rect(2.0, 2.0, 6.0, 6.0);
        assert!(s.painted_pixels() > 0);
    }

    #[test]
    fn guard_restores_transform_and_stroke() {
        let mut s = surface(16);
        s.set_stroke_width(3.0);
        {
            let mut frame = s.save();
            frame.translate(8.0, 8.0);
            frame.rotate(15.0);
            frame.set_stroke_width(9.0);
            frame.push();
            frame.scale(2.0);
            assert_eq!(frame.depth(), 2);
        }
        assert_eq!(s.depth(), 0);
        assert_eq!(s.transform(), Transform::identity());
        assert_eq!(s.stroke_width(), 3.0);
    }

    #[test]
    fn pop_on_empty_stack_is_noop() {
        let mut s = surface(8);
        assert!(!s.pop());
        s.push();
        assert!(s.pop());
    }

    #[test]
    fn background_is_not_counted() {
        let mut s = Surface::new(8, Color::BLACK, Color::WHITE, false).unwrap();
        assert_eq!(s.painted_pixels(), 0);
        s.fill_rect(0.0, 0.0, 2.0, 2.0);
        assert_eq!(s.painted_pixels(), 4);
    }

    #[test]
    fn detached_surface_draws_nothing() {
        let mut s = surface(8);
        assert!(s.take_pixmap().is_some());
        s.fill_rect(0.0, 0.0, 8.0, 8.0);
        assert!(s.pixmap().is_none());
        assert_eq!(s.painted_pixels(), 0);
    }
}
