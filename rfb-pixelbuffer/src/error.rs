//! Errors raised by pixel decoding and canvas access.

use rfb_common::Rect;
use thiserror::Error;

/// Failures from [`PixelSampleDecoder`](crate::PixelSampleDecoder),
/// [`ColorMap`](crate::ColorMap) and the canvas types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PixelBufferError {
    /// A write target lies outside the surface it was requested from.
    #[error("rectangle {rect:?} outside {width}x{height} surface")]
    OutOfBounds { rect: Rect, width: u32, height: u32 },

    /// A copy source lies outside the canvas.
    #[error("copy source {rect:?} outside {width}x{height} canvas")]
    SourceOutOfBounds { rect: Rect, width: u32, height: u32 },

    /// An indexed sample has no palette entry (or cannot be a 16-bit index).
    #[error("no color map entry for palette index {0}")]
    PaletteIndex(u32),

    /// The negotiated pixel format cannot be decoded.
    #[error("unsupported pixel format: {0}")]
    UnsupportedPixelFormat(String),

    /// A sample slice does not match the format's bytes per pixel.
    #[error("pixel sample is {actual} bytes, format needs {expected}")]
    SampleLength { expected: usize, actual: usize },

    /// An image write supplied the wrong number of pixels for its rectangle.
    #[error("image has {actual} pixels, rectangle needs {expected}")]
    ImageLength { expected: usize, actual: usize },

    /// A palette update would run past index 65535.
    #[error("color map update of {count} entries from index {first} overflows the palette")]
    ColorMapOverflow { first: u16, count: usize },
}
