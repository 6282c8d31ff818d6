//! CopyRect encoding decoder - copy a block from elsewhere on the screen.
//!
//! CopyRect (type 1) tells the client to copy an existing region of its own
//! framebuffer to the rectangle's position. It is cheap on the wire (4 bytes
//! regardless of size) and typically used for scrolling and window moves.
//!
//! # Wire Format
//!
//! ```text
//! +-------------+
//! | src_x       |  2 bytes (u16)
//! +-------------+
//! | src_y       |  2 bytes (u16)
//! +-------------+
//! ```
//!
//! Source and destination may overlap; the result is always as if the source
//! block had been read in full before any destination pixel was written.

use crate::{DecodeError, Decoder, Encoding, MutablePixelBuffer, PayloadReader, PixelSampleDecoder};
use rfb_common::Point;

/// Decoder for CopyRect.
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyRectDecoder;

impl Decoder for CopyRectDecoder {
    fn encoding(&self) -> Encoding {
        Encoding::CopyRect
    }

    fn decode(
        &self,
        payload: &mut PayloadReader<'_>,
        _pixels: &PixelSampleDecoder<'_>,
        target: &mut dyn MutablePixelBuffer,
    ) -> Result<(), DecodeError> {
        let src_x = payload.read_u16()?;
        let src_y = payload.read_u16()?;
        tracing::debug!(
            target: "rfb_encodings::framing",
            "CopyRect: src=({}, {}) dest={:?}",
            src_x,
            src_y,
            target.bounds()
        );

        target.copy_from(Point::new(i32::from(src_x), i32::from(src_y)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{pixels_in, test_pixel_format};
    use crate::ErrorKind;
    use rfb_common::Rect;
    use rfb_pixelbuffer::{Canvas, ColorMap, PixelBuffer, Rgb};

    fn copy_payload(x: u16, y: u16) -> Vec<u8> {
        let mut data = x.to_be_bytes().to_vec();
        data.extend_from_slice(&y.to_be_bytes());
        data
    }

    /// Canvas where every pixel encodes its own coordinates.
    fn gradient(width: u32, height: u32) -> Canvas {
        let mut canvas = Canvas::new(width, height);
        let pixels: Vec<Rgb> = (0..height)
            .flat_map(|y| (0..width).map(move |x| Rgb::new(x as u8, y as u8, 0x40)))
            .collect();
        canvas
            .view_mut(canvas.bounds())
            .unwrap()
            .image_rect(Rect::from_size(width, height), &pixels)
            .unwrap();
        canvas
    }

    fn decode_into(canvas: &mut Canvas, dest: Rect, payload: &[u8]) -> Result<(), DecodeError> {
        let map = ColorMap::new();
        let pixels = PixelSampleDecoder::new(test_pixel_format(), &map).unwrap();
        let mut view = canvas.view_mut(dest).unwrap();
        let mut reader = PayloadReader::new(payload);
        CopyRectDecoder.decode(&mut reader, &pixels, &mut view)?;
        assert!(reader.is_empty());
        Ok(())
    }

    /// Copy `src` to `dest` and compare against a frozen snapshot.
    fn assert_copy_matches_snapshot(src: (u16, u16), dest: Rect) {
        let mut canvas = gradient(48, 48);
        let before = canvas.clone();
        decode_into(&mut canvas, dest, &copy_payload(src.0, src.1)).unwrap();

        let source = Rect::new(src.0.into(), src.1.into(), dest.width, dest.height);
        assert_eq!(pixels_in(&canvas, dest), pixels_in(&before, source));

        // Everything outside the destination is untouched
        for y in 0..48 {
            for x in 0..48 {
                if !dest.contains_point(x as i32, y as i32) {
                    assert_eq!(canvas.get_pixel(x, y), before.get_pixel(x, y));
                }
            }
        }
    }

    #[test]
    fn test_decode_disjoint() {
        assert_copy_matches_snapshot((0, 0), Rect::new(30, 30, 10, 10));
    }

    #[test]
    fn test_decode_identical_source() {
        assert_copy_matches_snapshot((8, 8), Rect::new(8, 8, 16, 16));
    }

    #[test]
    fn test_decode_one_pixel_shift_overlaps() {
        assert_copy_matches_snapshot((10, 10), Rect::new(11, 10, 20, 20));
        assert_copy_matches_snapshot((10, 10), Rect::new(10, 11, 20, 20));
        assert_copy_matches_snapshot((11, 11), Rect::new(10, 10, 20, 20));
    }

    #[test]
    fn test_decode_empty_rectangle_consumes_payload() {
        let mut canvas = gradient(8, 8);
        let before = canvas.clone();
        decode_into(&mut canvas, Rect::new(2, 2, 0, 0), &copy_payload(500, 500)).unwrap();
        assert_eq!(canvas, before);
    }

    #[test]
    fn test_decode_truncated() {
        let mut canvas = Canvas::new(8, 8);
        let err = decode_into(&mut canvas, Rect::new(0, 0, 2, 2), &[0, 1, 0]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedPayload);
    }

    #[test]
    fn test_decode_source_out_of_bounds() {
        let mut canvas = gradient(16, 16);
        let before = canvas.clone();
        let err = decode_into(&mut canvas, Rect::new(0, 0, 8, 8), &copy_payload(12, 0))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedRectangle);
        assert_eq!(canvas, before);
    }
}
