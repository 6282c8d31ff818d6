//! Raw encoding decoder - uncompressed pixel data.
//!
//! Raw encoding (type 0) is the simplest VNC encoding. It transmits pixels as
//! uncompressed data in the server's pixel format. The decoder reads
//! `width * height * bytes_per_pixel` bytes and writes every pixel of the
//! rectangle.
//!
//! # Wire Format
//!
//! ```text
//! +-------------+
//! | Pixel data  |  width * height * bytes_per_pixel bytes, row-major
//! +-------------+
//! ```
//!
//! The payload length is checked before anything is written: a short payload
//! is truncated, a long one is malformed.
//!
//! # Example
//!
//! ```
//! use rfb_encodings::{Decoder, Encoding, RawDecoder};
//!
//! let decoder = RawDecoder;
//! assert_eq!(decoder.encoding(), Encoding::Raw);
//! ```

use crate::{DecodeError, Decoder, Encoding, MutablePixelBuffer, PayloadReader, PixelSampleDecoder};
use rfb_common::Rect;
use rfb_pixelbuffer::PixelBuffer;

/// Decoder for raw (uncompressed) pixel data.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawDecoder;

impl Decoder for RawDecoder {
    fn encoding(&self) -> Encoding {
        Encoding::Raw
    }

    fn decode(
        &self,
        payload: &mut PayloadReader<'_>,
        pixels: &PixelSampleDecoder<'_>,
        target: &mut dyn MutablePixelBuffer,
    ) -> Result<(), DecodeError> {
        let (width, height) = target.dimensions();
        tracing::debug!(
            target: "rfb_encodings::framing",
            "Raw decode start: rect={:?} payload={}",
            target.bounds(),
            payload.remaining()
        );

        let expected = width as usize * height as usize * pixels.bytes_per_pixel();
        if payload.remaining() > expected {
            return Err(DecodeError::PayloadLength {
                expected,
                actual: payload.remaining(),
            });
        }

        decode_region(payload, pixels, target, Rect::from_size(width, height))?;

        tracing::debug!(
            target: "rfb_encodings::framing",
            "Raw decode end: bytes_consumed={}",
            payload.consumed()
        );
        Ok(())
    }
}

/// Decode `region.area()` packed pixels into `region` (local to `target`).
///
/// Nothing is written unless the whole region's pixels are read and
/// converted. Hextile raw tiles go through here too.
pub fn decode_region(
    payload: &mut PayloadReader<'_>,
    pixels: &PixelSampleDecoder<'_>,
    target: &mut dyn MutablePixelBuffer,
    region: Rect,
) -> Result<(), DecodeError> {
    let len = region.area() as usize * pixels.bytes_per_pixel();
    let samples = payload.read_bytes(len)?;
    let colors = pixels.decode_run(samples)?;
    target.image_rect(region, &colors)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{pixels_in, px, test_pixel_format};
    use crate::ErrorKind;
    use rfb_pixelbuffer::{Canvas, ColorMap, PixelBuffer, PixelBufferError, Rgb};
    use rfb_protocol::messages::PixelFormat;

    const RED: Rgb = Rgb::new(255, 0, 0);
    const GREEN: Rgb = Rgb::new(0, 255, 0);
    const BLUE: Rgb = Rgb::new(0, 0, 255);

    fn decode_into(canvas: &mut Canvas, rect: Rect, payload: &[u8]) -> Result<(), DecodeError> {
        let map = ColorMap::new();
        let pixels = PixelSampleDecoder::new(test_pixel_format(), &map).unwrap();
        let mut view = canvas.view_mut(rect).unwrap();
        RawDecoder.decode(&mut PayloadReader::new(payload), &pixels, &mut view)
    }

    #[test]
    fn test_decode_empty_rectangle() {
        let mut canvas = Canvas::new(10, 10);
        decode_into(&mut canvas, Rect::new(0, 0, 0, 5), &[]).unwrap();
        assert_eq!(canvas, Canvas::new(10, 10));
    }

    #[test]
    fn test_decode_single_pixel() {
        let mut canvas = Canvas::new(10, 10);
        decode_into(&mut canvas, Rect::new(5, 5, 1, 1), &px(RED)).unwrap();
        assert_eq!(canvas.get_pixel(5, 5), Some(RED));
        assert_eq!(canvas.get_pixel(4, 5), Some(Rgb::BLACK));
    }

    #[test]
    fn test_decode_small_rectangle() {
        let mut canvas = Canvas::new(10, 10);
        let colors = [RED, GREEN, BLUE, RED, GREEN, BLUE];
        let payload: Vec<u8> = colors.iter().flat_map(|c| px(*c)).collect();

        let rect = Rect::new(2, 3, 3, 2);
        decode_into(&mut canvas, rect, &payload).unwrap();
        assert_eq!(pixels_in(&canvas, rect), colors.to_vec());
    }

    #[test]
    fn test_decode_short_payload_writes_nothing() {
        let mut canvas = Canvas::new(10, 10);
        let payload: Vec<u8> = [RED, RED, RED].iter().flat_map(|c| px(*c)).collect();

        let err = decode_into(&mut canvas, Rect::new(0, 0, 2, 2), &payload).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedPayload);
        assert_eq!(canvas, Canvas::new(10, 10));
    }

    #[test]
    fn test_decode_long_payload_rejected() {
        let mut canvas = Canvas::new(10, 10);
        let mut payload = px(RED);
        payload.push(0);

        let err = decode_into(&mut canvas, Rect::new(0, 0, 1, 1), &payload).unwrap_err();
        assert_eq!(
            err,
            DecodeError::PayloadLength {
                expected: 4,
                actual: 5
            }
        );
        assert_eq!(canvas.get_pixel(0, 0), Some(Rgb::BLACK));
    }

    #[test]
    fn test_decode_rgb565_format() {
        let pf = PixelFormat {
            bits_per_pixel: 16,
            depth: 16,
            big_endian: false,
            true_color: true,
            red_max: 31,
            green_max: 63,
            blue_max: 31,
            red_shift: 11,
            green_shift: 5,
            blue_shift: 0,
        };
        let map = ColorMap::new();
        let pixels = PixelSampleDecoder::new(pf, &map).unwrap();
        let mut canvas = Canvas::new(4, 4);
        let mut view = canvas.view_mut(Rect::new(0, 0, 2, 1)).unwrap();

        // Red (0xF800) then blue (0x001F), little-endian
        let payload = [0x00, 0xF8, 0x1F, 0x00];
        RawDecoder
            .decode(&mut PayloadReader::new(&payload), &pixels, &mut view)
            .unwrap();
        assert_eq!(canvas.get_pixel(0, 0), Some(RED));
        assert_eq!(canvas.get_pixel(1, 0), Some(BLUE));
    }

    #[test]
    fn test_decode_indexed_missing_entry() {
        let map = ColorMap::new();
        let pixels = PixelSampleDecoder::new(PixelFormat::indexed8(), &map).unwrap();
        let mut canvas = Canvas::new(4, 4);
        let mut view = canvas.view_mut(Rect::new(0, 0, 2, 1)).unwrap();

        let err = RawDecoder
            .decode(&mut PayloadReader::new(&[0, 1]), &pixels, &mut view)
            .unwrap_err();
        assert_eq!(err, DecodeError::PixelBuffer(PixelBufferError::PaletteIndex(0)));
        assert_eq!(err.kind(), ErrorKind::PaletteIndex);
    }
}
