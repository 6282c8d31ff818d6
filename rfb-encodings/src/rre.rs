//! RRE encoding decoder - Rise-and-Run-length Encoding.
//!
//! RRE (Rise-and-Run-length Encoding, type 2) is a simple VNC encoding that
//! represents rectangular regions as a background color plus a list of solid-color
//! sub-rectangles. This encoding is efficient for screens with large areas of
//! uniform color, such as desktop backgrounds or flat UI elements.
//!
//! # Wire Format
//!
//! ```text
//! +------------------+
//! | num_subrects     |  4 bytes (u32, network byte order)
//! +------------------+
//! | background_pixel |  bytes_per_pixel bytes
//! +------------------+
//! | Subrectangle 1   |
//! |   pixel          |  bytes_per_pixel bytes
//! |   x              |  2 bytes (u16)
//! |   y              |  2 bytes (u16)
//! |   width          |  2 bytes (u16)
//! |   height         |  2 bytes (u16)
//! +------------------+
//! | Subrectangle 2   |
//! |   ...            |
//! +------------------+
//! ```
//!
//! The decoder first fills the entire rectangle with the background color, then
//! paints each sub-rectangle in payload order. Sub-rectangles may overlap; later
//! ones win. Coordinates are relative to the rectangle's top-left corner.
//!
//! # Example
//!
//! ```
//! use rfb_encodings::{Decoder, Encoding, RREDecoder};
//!
//! let decoder = RREDecoder;
//! assert_eq!(decoder.encoding(), Encoding::Rre);
//! ```

use crate::{
    read_pixel, DecodeError, Decoder, Encoding, MutablePixelBuffer, PayloadReader,
    PixelSampleDecoder,
};
use rfb_common::Rect;
use rfb_pixelbuffer::PixelBuffer;

/// Bytes of geometry per sub-rectangle, after its pixel.
const SUBRECT_GEOMETRY_LEN: usize = 8;

/// Decoder for RRE (Rise-and-Run-length Encoding).
#[derive(Debug, Clone, Copy, Default)]
pub struct RREDecoder;

impl Decoder for RREDecoder {
    fn encoding(&self) -> Encoding {
        Encoding::Rre
    }

    fn decode(
        &self,
        payload: &mut PayloadReader<'_>,
        pixels: &PixelSampleDecoder<'_>,
        target: &mut dyn MutablePixelBuffer,
    ) -> Result<(), DecodeError> {
        let (width, height) = target.dimensions();
        let num_subrects = payload.read_u32()?;
        tracing::debug!(
            target: "rfb_encodings::framing",
            "RRE decode start: rect={:?} num_subrects={} payload={}",
            target.bounds(),
            num_subrects,
            payload.remaining()
        );

        // Reject a count the payload cannot hold before painting anything
        let bpp = pixels.bytes_per_pixel();
        let needed = (num_subrects as usize)
            .saturating_mul(bpp + SUBRECT_GEOMETRY_LEN)
            .saturating_add(bpp);
        payload.ensure(needed)?;

        let background = read_pixel(payload, pixels)?;
        target.fill_rect(Rect::from_size(width, height), background)?;

        for index in 0..num_subrects {
            let color = read_pixel(payload, pixels)?;
            let x = payload.read_u16()?;
            let y = payload.read_u16()?;
            let w = payload.read_u16()?;
            let h = payload.read_u16()?;

            let subrect = Rect::new(i32::from(x), i32::from(y), u32::from(w), u32::from(h));
            if !subrect.fits_within(width, height) {
                return Err(DecodeError::SubrectOutOfBounds {
                    index,
                    rect: subrect,
                    width,
                    height,
                });
            }

            // Zero-area sub-rectangles don't affect the output
            if subrect.is_empty() {
                continue;
            }
            target.fill_rect(subrect, color)?;
        }

        tracing::debug!(
            target: "rfb_encodings::framing",
            "RRE decode end: bytes_consumed={}",
            payload.consumed()
        );
        Ok(())
    }
}
