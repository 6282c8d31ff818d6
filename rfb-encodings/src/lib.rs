//! Core decoding interfaces for RFB (VNC) encodings.
//!
//! This crate defines the [`Decoder`] trait that all encoding implementations implement.
//! A decoder reads a single framebuffer update rectangle's payload (as sent by the
//! server using a specific encoding), converts its pixels through a
//! [`PixelSampleDecoder`], and writes them into a [`MutablePixelBuffer`] covering
//! exactly that rectangle.
//!
//! # Key Concepts
//!
//! - **Delimited payloads**: Decoders read from a [`PayloadReader`] over bytes the
//!   transport has already framed; running out of bytes is an error, never a wait
//! - **Rectangle-based**: Decoders operate on a single rectangle at a time, in
//!   coordinates local to it
//! - **Fail-fast policy**: Decoders must not perform defensive fallbacks; fail with clear errors
//! - **Stateless**: One decoder value serves every rectangle of every update
//!
//! # Example
//!
//! ```
//! use rfb_common::Rect;
//! use rfb_encodings::{Decoder, RawDecoder};
//! use rfb_pixelbuffer::{Canvas, ColorMap, PixelBuffer, PixelSampleDecoder, Rgb};
//! use rfb_protocol::io::PayloadReader;
//! use rfb_protocol::messages::PixelFormat;
//!
//! let map = ColorMap::new();
//! let pixels = PixelSampleDecoder::new(PixelFormat::rgb888(), &map).unwrap();
//! let mut canvas = Canvas::new(4, 4);
//!
//! // One 1x1 red pixel, little-endian 0x00FF0000
//! let payload = [0x00, 0x00, 0xFF, 0x00];
//! let mut view = canvas.view_mut(Rect::new(2, 1, 1, 1)).unwrap();
//! RawDecoder
//!     .decode(&mut PayloadReader::new(&payload), &pixels, &mut view)
//!     .unwrap();
//!
//! assert_eq!(canvas.get_pixel(2, 1), Some(Rgb::new(255, 0, 0)));
//! ```
//!
//! # Encoding Types
//!
//! - [`ENCODING_RAW`] (0): Uncompressed pixel data
//! - [`ENCODING_COPYRECT`] (1): Copy from another screen region
//! - [`ENCODING_RRE`] (2): Rise-and-Run-length Encoding
//! - [`ENCODING_HEXTILE`] (5): Tiled encoding with sub-rectangles
//!
//! Pseudo-encodings (negative values) carry no pixels and are handled by the
//! update processor:
//!
//! - [`ENCODING_LAST_RECT`] (-224): Last rectangle in update
//! - [`ENCODING_DESKTOP_SIZE`] (-223): Desktop resolution change

pub mod error;
pub use error::{DecodeError, ErrorKind, TileColor};

// Re-export types from rfb-protocol and rfb-pixelbuffer used by decoders
pub use rfb_pixelbuffer::{MutablePixelBuffer, PixelSampleDecoder, Rgb};
pub use rfb_protocol::io::PayloadReader;
pub use rfb_protocol::messages::types::{
    Encoding, ENCODING_COPYRECT, ENCODING_DESKTOP_SIZE, ENCODING_HEXTILE, ENCODING_LAST_RECT,
    ENCODING_RAW, ENCODING_RRE,
};

// Encoding implementations
pub mod raw;
pub use raw::RawDecoder;

pub mod copyrect;
pub use copyrect::CopyRectDecoder;

pub mod rre;
pub use rre::RREDecoder;

pub mod hextile;
pub use hextile::HextileDecoder;

/// Core trait for all RFB encoding/decoding implementations.
///
/// # Contract
///
/// Implementors must:
/// - Read exactly the bytes for the rectangle as defined by their encoding
/// - Convert every pixel through the supplied [`PixelSampleDecoder`]
/// - Write only through `target`, whose dimensions are the rectangle's
/// - Fail fast with a [`DecodeError`] (no defensive fallbacks)
///
/// Bytes left in `payload` afterwards are the caller's concern.
pub trait Decoder {
    /// Returns the RFB encoding this decoder handles.
    fn encoding(&self) -> Encoding;

    /// Decode one rectangle's payload into `target`.
    fn decode(
        &self,
        payload: &mut PayloadReader<'_>,
        pixels: &PixelSampleDecoder<'_>,
        target: &mut dyn MutablePixelBuffer,
    ) -> Result<(), DecodeError>;
}

/// Read and convert one wire pixel.
pub(crate) fn read_pixel(
    payload: &mut PayloadReader<'_>,
    pixels: &PixelSampleDecoder<'_>,
) -> Result<Rgb, DecodeError> {
    let sample = payload.read_bytes(pixels.bytes_per_pixel())?;
    Ok(pixels.decode(sample)?)
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Helpers shared by the decoder tests.

    use rfb_common::Rect;
    use rfb_pixelbuffer::{encode_true_color, Canvas, PixelBuffer, Rgb};
    use rfb_protocol::messages::PixelFormat;

    /// Create a simple RGB888 pixel format for testing (wire format)
    pub fn test_pixel_format() -> PixelFormat {
        PixelFormat::rgb888()
    }

    /// Wire bytes for `rgb` in the test format.
    pub fn px(rgb: Rgb) -> Vec<u8> {
        encode_true_color(&test_pixel_format(), rgb)
    }

    /// Every pixel of `rect` in row-major order.
    pub fn pixels_in(canvas: &Canvas, rect: Rect) -> Vec<Rgb> {
        let mut out = Vec::with_capacity(rect.area() as usize);
        for y in 0..rect.height {
            for x in 0..rect.width {
                out.extend(canvas.get_pixel(rect.x as u32 + x, rect.y as u32 + y));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rfb_pixelbuffer::ColorMap;

    #[test]
    fn test_decoders_report_their_encoding() {
        assert_eq!(RawDecoder.encoding(), Encoding::Raw);
        assert_eq!(CopyRectDecoder.encoding(), Encoding::CopyRect);
        assert_eq!(RREDecoder.encoding(), Encoding::Rre);
        assert_eq!(HextileDecoder.encoding(), Encoding::Hextile);
    }

    #[test]
    fn test_encoding_constants() {
        assert_eq!(ENCODING_RAW, 0);
        assert_eq!(ENCODING_COPYRECT, 1);
        assert_eq!(ENCODING_RRE, 2);
        assert_eq!(ENCODING_HEXTILE, 5);
        assert_eq!(ENCODING_LAST_RECT, -224);
        assert_eq!(ENCODING_DESKTOP_SIZE, -223);
    }

    #[test]
    fn test_read_pixel_truncated() {
        let map = ColorMap::new();
        let pixels =
            PixelSampleDecoder::new(test_support::test_pixel_format(), &map).unwrap();
        let mut payload = PayloadReader::new(&[1, 2, 3]);
        let err = read_pixel(&mut payload, &pixels).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedPayload);
    }
}
