//! Rendered icon values.
//!
//! An [`Icon`] is the encoded output of one render: the image bytes plus the
//! dimensions and category it was drawn for. Icons are transient; the
//! pipeline appends each one to the archive and drops it.

/// A 2D size in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizePx {
    pub width: u32,
    pub height: u32,
}

impl SizePx {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A `size x size` square.
    pub fn square(size: u32) -> Self {
        Self::new(size, size)
    }
}

/// One encoded map symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icon {
    category_id: usize,
    dimensions: SizePx,
    bytes: Vec<u8>,
}

impl Icon {
    /// File extension of the encoded bytes.
    pub const EXTENSION: &'static str = "png";

    pub fn new(category_id: usize, dimensions: SizePx, bytes: Vec<u8>) -> Self {
        Self {
            category_id,
            dimensions,
            bytes,
        }
    }

    pub fn category_id(&self) -> usize {
        self.category_id
    }

    /// The declared pixel dimensions.
    pub fn dimensions(&self) -> SizePx {
        self.dimensions
    }

    /// The encoded image.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_accessors() {
        let icon = Icon::new(3, SizePx::square(16), vec![1, 2, 3]);
        assert_eq!(icon.category_id(), 3);
        assert_eq!(icon.dimensions(), SizePx::new(16, 16));
        assert_eq!(icon.bytes(), &[1, 2, 3]);
    }
}
