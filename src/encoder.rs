//! Surface → PNG encoding.

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, Rgba, RgbaImage};
use resvg::tiny_skia::Pixmap;

use crate::error::EngineError;
use crate::surface::Surface;

/// Serializes rendered surfaces to PNG bytes.
///
/// Compression favors speed: batch runs encode thousands of small icons and
/// the archive deflates them again.
#[derive(Debug, Clone, Copy, Default)]
pub struct IconEncoder;

impl IconEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Encodes the surface's pixel buffer as PNG.
    ///
    /// Fails with [`EngineError::SurfaceUnavailable`] if the surface no
    /// longer owns a pixel buffer.
    pub fn encode(&self, surface: &Surface) -> Result<Vec<u8>, EngineError> {
        let pixmap = surface.pixmap().ok_or(EngineError::SurfaceUnavailable)?;
        let image = pixmap_to_rgba_image(pixmap);

        let mut bytes = Vec::new();
        PngEncoder::new_with_quality(&mut bytes, CompressionType::Fast, FilterType::Adaptive)
            .write_image(
                image.as_raw(),
                image.width(),
                image.height(),
                ExtendedColorType::Rgba8,
            )
            .map_err(|e| EngineError::Encode(e.to_string()))?;
        Ok(bytes)
    }
}

/// Copies the pixmap into straight-alpha RGBA; tiny_skia stores premultiplied.
fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (px, out) in pixmap.pixels().iter().zip(img.pixels_mut()) {
        let c = px.demultiply();
        *out = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    img
}
