//! Hextile encoding decoder - Tiled encoding with multiple sub-encodings.
//!
//! Hextile (type 5) is one of the most commonly used VNC encodings. It divides rectangles
//! into 16x16 pixel tiles (with smaller tiles at edges), and each tile can use different
//! sub-encodings for optimal compression. This encoding provides a good balance between
//! bandwidth efficiency and decoding speed.
//!
//! # Wire Format
//!
//! For each 16x16 tile in the rectangle (smaller at edges), in raster order:
//!
//! ```text
//! +------------------+
//! | tile_type        |  1 byte (bit flags)
//! +------------------+
//! | [raw_pixels]     |  tile_w * tile_h * bpp bytes (if RAW bit set)
//! +------------------+
//! | [background]     |  bpp bytes (if BACKGROUND_SPECIFIED)
//! +------------------+
//! | [foreground]     |  bpp bytes (if FOREGROUND_SPECIFIED)
//! +------------------+
//! | [num_subrects]   |  1 byte (if ANY_SUBRECTS)
//! +------------------+
//! | [subrects...]    |  For each subrect:
//! |   [pixel]        |    bpp bytes (if SUBRECTS_COLOURED)
//! |   xy             |    1 byte: x=(xy>>4), y=(xy&0xF)
//! |   wh             |    1 byte: w=((wh>>4)+1), h=((wh&0xF)+1)
//! +------------------+
//! ```
//!
//! # Tile Type Flags
//!
//! - **RAW (0x01)**: Tile is raw uncompressed pixels (ignores other flags)
//! - **BACKGROUND_SPECIFIED (0x02)**: New background color follows
//! - **FOREGROUND_SPECIFIED (0x04)**: New foreground color follows
//! - **ANY_SUBRECTS (0x08)**: Subrectangles follow after optional colors
//! - **SUBRECTS_COLOURED (0x10)**: Each subrect has its own color (vs using foreground)
//!
//! # State Persistence
//!
//! Background and foreground colors persist across tiles **within a single rectangle**,
//! and start out undefined for each new rectangle. A raw tile leaves both untouched.
//!
//! # Example
//!
//! ```
//! use rfb_encodings::{Decoder, Encoding, HextileDecoder};
//!
//! let decoder = HextileDecoder;
//! assert_eq!(decoder.encoding(), Encoding::Hextile);
//! ```

use crate::{
    raw, read_pixel, DecodeError, Decoder, Encoding, MutablePixelBuffer, PayloadReader,
    PixelSampleDecoder, Rgb, TileColor,
};
use bitflags::bitflags;
use rfb_common::Rect;
use rfb_pixelbuffer::PixelBuffer;

bitflags! {
    /// Hextile tile subencoding byte.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct HextileFlags: u8 {
        const RAW = 0x01;
        const BACKGROUND_SPECIFIED = 0x02;
        const FOREGROUND_SPECIFIED = 0x04;
        const ANY_SUBRECTS = 0x08;
        const SUBRECTS_COLOURED = 0x10;
    }
}

/// Standard Hextile tile size (tiles at rectangle edges may be smaller).
pub const TILE_SIZE: u32 = 16;

/// Decoder for Hextile encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct HextileDecoder;

/// Colours carried from tile to tile within one rectangle.
#[derive(Debug, Default)]
struct TileState {
    background: Option<Rgb>,
    foreground: Option<Rgb>,
}

impl Decoder for HextileDecoder {
    fn encoding(&self) -> Encoding {
        Encoding::Hextile
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
            "Hextile decode start: rect={:?} payload={}",
            target.bounds(),
            payload.remaining()
        );

        let mut state = TileState::default();

        // Process tiles in 16x16 blocks, top-to-bottom, left-to-right
        for ty in (0..height).step_by(TILE_SIZE as usize) {
            let tile_h = TILE_SIZE.min(height - ty);
            for tx in (0..width).step_by(TILE_SIZE as usize) {
                let tile_w = TILE_SIZE.min(width - tx);
                let tile = Rect::new(tx as i32, ty as i32, tile_w, tile_h);
                decode_tile(payload, pixels, target, tile, &mut state)?;
            }
        }

        tracing::debug!(
            target: "rfb_encodings::framing",
            "Hextile decode end: bytes_consumed={}",
            payload.consumed()
        );
        Ok(())
    }
}

fn decode_tile(
    payload: &mut PayloadReader<'_>,
    pixels: &PixelSampleDecoder<'_>,
    target: &mut dyn MutablePixelBuffer,
    tile: Rect,
    state: &mut TileState,
) -> Result<(), DecodeError> {
    let flags = HextileFlags::from_bits_retain(payload.read_u8()?);

    if flags.contains(HextileFlags::RAW) {
        return raw::decode_region(payload, pixels, target, tile);
    }

    if flags.contains(HextileFlags::BACKGROUND_SPECIFIED) {
        state.background = Some(read_pixel(payload, pixels)?);
    }
    let background = state.background.ok_or(DecodeError::UndefinedTileColor {
        color: TileColor::Background,
        tile: tile.origin(),
    })?;
    target.fill_rect(tile, background)?;

    if flags.contains(HextileFlags::FOREGROUND_SPECIFIED) {
        state.foreground = Some(read_pixel(payload, pixels)?);
    }

    if !flags.contains(HextileFlags::ANY_SUBRECTS) {
        return Ok(());
    }

    let num_subrects = payload.read_u8()?;
    let coloured = flags.contains(HextileFlags::SUBRECTS_COLOURED);
    for index in 0..num_subrects {
        let color = if coloured {
            read_pixel(payload, pixels)?
        } else {
            state.foreground.ok_or(DecodeError::UndefinedTileColor {
                color: TileColor::Foreground,
                tile: tile.origin(),
            })?
        };

        let xy = payload.read_u8()?;
        let wh = payload.read_u8()?;
        let subrect = Rect::new(
            i32::from(xy >> 4),
            i32::from(xy & 0x0F),
            u32::from(wh >> 4) + 1,
            u32::from(wh & 0x0F) + 1,
        );

        // Edge tiles are smaller than 16x16, so a valid nibble can still overrun
        if !subrect.fits_within(tile.width, tile.height) {
            return Err(DecodeError::SubrectOutOfBounds {
                index: u32::from(index),
                rect: subrect,
                width: tile.width,
                height: tile.height,
            });
        }
        target.fill_rect(subrect.translate(tile.x, tile.y), color)?;
    }

    Ok(())
}
