//! Core RFB protocol types.
//!
//! This module defines fundamental types used throughout the RFB protocol:
//! - [`PixelFormat`] - Describes pixel format (bit depths, color channels, endianness)
//! - [`Encoding`] - Closed set of rectangle encodings this decoder understands
//! - [`Rectangle`] - Rectangle header plus its encoding-specific payload

use super::MessageError;
use crate::io::PayloadReader;
use bytes::Bytes;
use rfb_common::Rect;
use serde::{Deserialize, Serialize};

/// RFB pixel format specification.
///
/// Describes how pixels are encoded on the wire, including:
/// - Bits per pixel and color depth
/// - RGB channel sizes and bit positions
/// - Byte order (big/little endian)
/// - True color vs. color-map (palette) indexing
///
/// # Wire Format
///
/// PixelFormat is 16 bytes on the wire:
/// - 1 byte: bits_per_pixel
/// - 1 byte: depth
/// - 1 byte: big_endian (0 or 1)
/// - 1 byte: true_color (0 or 1)
/// - 2 bytes: red_max
/// - 2 bytes: green_max
/// - 2 bytes: blue_max
/// - 1 byte: red_shift
/// - 1 byte: green_shift
/// - 1 byte: blue_shift
/// - 3 bytes: padding (must be zero)
///
/// # Examples
///
/// ```
/// use rfb_protocol::messages::types::PixelFormat;
///
/// let pf = PixelFormat::rgb888();
/// assert_eq!(pf.bytes_per_pixel(), 4);
/// assert!(pf.true_color);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelFormat {
    pub bits_per_pixel: u8,
    pub depth: u8,
    pub big_endian: bool,
    pub true_color: bool,
    pub red_max: u16,
    pub green_max: u16,
    pub blue_max: u16,
    pub red_shift: u8,
    pub green_shift: u8,
    pub blue_shift: u8,
}

impl PixelFormat {
    /// Size of the wire representation in bytes.
    pub const WIRE_LEN: usize = 16;

    /// Calculate bytes per pixel, rounded up.
    pub fn bytes_per_pixel(&self) -> u8 {
        self.bits_per_pixel.div_ceil(8)
    }

    /// Standard little-endian 32bpp true-color format (R at bit 16, G at 8, B at 0).
    pub fn rgb888() -> Self {
        Self {
            bits_per_pixel: 32,
            depth: 24,
            big_endian: false,
            true_color: true,
            red_max: 255,
            green_max: 255,
            blue_max: 255,
            red_shift: 16,
            green_shift: 8,
            blue_shift: 0,
        }
    }

    /// 8bpp palette-indexed format; channel fields are unused.
    pub fn indexed8() -> Self {
        Self {
            bits_per_pixel: 8,
            depth: 8,
            big_endian: false,
            true_color: false,
            red_max: 0,
            green_max: 0,
            blue_max: 0,
            red_shift: 0,
            green_shift: 0,
            blue_shift: 0,
        }
    }

    /// Parse the 16-byte wire form.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - fewer than 16 bytes remain
    /// - boolean fields (big_endian, true_color) are not 0 or 1
    /// - padding bytes are not zero
    pub fn read_from(reader: &mut PayloadReader<'_>) -> Result<Self, MessageError> {
        reader.ensure(Self::WIRE_LEN)?;

        let bits_per_pixel = reader.read_u8()?;
        let depth = reader.read_u8()?;
        let big_endian = read_bool(reader, "big_endian")?;
        let true_color = read_bool(reader, "true_color")?;
        let red_max = reader.read_u16()?;
        let green_max = reader.read_u16()?;
        let blue_max = reader.read_u16()?;
        let red_shift = reader.read_u8()?;
        let green_shift = reader.read_u8()?;
        let blue_shift = reader.read_u8()?;

        let padding = reader.read_bytes(3)?;
        if padding != [0, 0, 0] {
            return Err(MessageError::NonZeroPadding(padding.to_vec()));
        }

        Ok(Self {
            bits_per_pixel,
            depth,
            big_endian,
            true_color,
            red_max,
            green_max,
            blue_max,
            red_shift,
            green_shift,
            blue_shift,
        })
    }

    /// Serialize to the 16-byte wire form.
    pub fn to_bytes(&self) -> [u8; Self::WIRE_LEN] {
        let mut out = [0u8; Self::WIRE_LEN];
        out[0] = self.bits_per_pixel;
        out[1] = self.depth;
        out[2] = u8::from(self.big_endian);
        out[3] = u8::from(self.true_color);
        out[4..6].copy_from_slice(&self.red_max.to_be_bytes());
        out[6..8].copy_from_slice(&self.green_max.to_be_bytes());
        out[8..10].copy_from_slice(&self.blue_max.to_be_bytes());
        out[10] = self.red_shift;
        out[11] = self.green_shift;
        out[12] = self.blue_shift;
        out
    }
}

fn read_bool(reader: &mut PayloadReader<'_>, field: &'static str) -> Result<bool, MessageError> {
    match reader.read_u8()? {
        0 => Ok(false),
        1 => Ok(true),
        value => Err(MessageError::InvalidBoolean { field, value }),
    }
}

//
// Encoding type constants
//

/// Raw encoding - uncompressed pixel data.
pub const ENCODING_RAW: i32 = 0;

/// CopyRect encoding - copy from another screen region.
pub const ENCODING_COPYRECT: i32 = 1;

/// RRE (Rise-and-Run-length Encoding).
pub const ENCODING_RRE: i32 = 2;

/// Hextile encoding - 16x16 tile-based compression.
pub const ENCODING_HEXTILE: i32 = 5;

/// Pseudo-encoding: last rectangle marker in framebuffer update.
pub const ENCODING_LAST_RECT: i32 = -224;

/// Pseudo-encoding: desktop size change notification.
pub const ENCODING_DESKTOP_SIZE: i32 = -223;

/// Every rectangle encoding this workspace can act on.
///
/// The wire carries a signed 32-bit tag; [`Encoding::from_tag`] maps it onto
/// this closed set so dispatch can be matched exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Encoding {
    Raw,
    CopyRect,
    Rre,
    Hextile,
    DesktopSize,
    LastRect,
}

impl Encoding {
    /// Encodings that carry pixel data (as opposed to pseudo-encodings).
    pub const PIXEL_ENCODINGS: [Encoding; 4] = [
        Encoding::Raw,
        Encoding::CopyRect,
        Encoding::Rre,
        Encoding::Hextile,
    ];

    /// Map a wire tag onto a known encoding.
    pub fn from_tag(tag: i32) -> Option<Self> {
        match tag {
            ENCODING_RAW => Some(Self::Raw),
            ENCODING_COPYRECT => Some(Self::CopyRect),
            ENCODING_RRE => Some(Self::Rre),
            ENCODING_HEXTILE => Some(Self::Hextile),
            ENCODING_DESKTOP_SIZE => Some(Self::DesktopSize),
            ENCODING_LAST_RECT => Some(Self::LastRect),
            _ => None,
        }
    }

    /// The wire tag for this encoding.
    pub fn tag(self) -> i32 {
        match self {
            Self::Raw => ENCODING_RAW,
            Self::CopyRect => ENCODING_COPYRECT,
            Self::Rre => ENCODING_RRE,
            Self::Hextile => ENCODING_HEXTILE,
            Self::DesktopSize => ENCODING_DESKTOP_SIZE,
            Self::LastRect => ENCODING_LAST_RECT,
        }
    }

    /// True for pseudo-encodings, which carry no pixels.
    pub fn is_pseudo(self) -> bool {
        self.tag() < 0
    }
}

impl std::fmt::Display for Encoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Raw => "Raw",
            Self::CopyRect => "CopyRect",
            Self::Rre => "RRE",
            Self::Hextile => "Hextile",
            Self::DesktopSize => "DesktopSize",
            Self::LastRect => "LastRect",
        };
        f.write_str(name)
    }
}

/// One rectangle of a framebuffer update.
///
/// The payload is the encoding-specific body, already delimited by the
/// transport. For `DesktopSize` the width and height are the new framebuffer
/// size and the payload is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rectangle {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
    /// Signed wire tag; may name an encoding this crate does not know.
    pub encoding: i32,
    pub payload: Bytes,
}

impl Rectangle {
    /// Create a rectangle with the given bounds, encoding tag and payload.
    pub fn new(
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        encoding: i32,
        payload: impl Into<Bytes>,
    ) -> Self {
        Self {
            x,
            y,
            width,
            height,
            encoding,
            payload: payload.into(),
        }
    }

    /// Desktop-size pseudo-rectangle announcing a new framebuffer size.
    pub fn desktop_size(width: u16, height: u16) -> Self {
        Self::new(0, 0, width, height, ENCODING_DESKTOP_SIZE, Bytes::new())
    }

    /// Bounds in framebuffer coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::new(
            i32::from(self.x),
            i32::from(self.y),
            u32::from(self.width),
            u32::from(self.height),
        )
    }

    /// The known encoding for this rectangle's tag, if any.
    pub fn known_encoding(&self) -> Option<Encoding> {
        Encoding::from_tag(self.encoding)
    }
}
