//! Server-to-client RFB messages consumed by the framebuffer decoder.
//!
//! The transport delivers these already framed; only the palette message
//! body is parsed here, since its length depends on a count inside it.

use super::types::Rectangle;
use super::MessageError;
use crate::io::PayloadReader;

/// FramebufferUpdate message - an ordered batch of rectangles.
///
/// Rectangle order is significant: later rectangles may read (CopyRect) or
/// overwrite pixels written by earlier ones, and a desktop-size rectangle
/// changes the bounds every following rectangle is checked against.
///
/// # Wire Format
///
/// - 1 byte: message type (0)
/// - 1 byte: padding
/// - 2 bytes: number of rectangles
/// - For each rectangle: 12-byte header (x, y, width, height, encoding)
///   followed by the encoding-specific payload
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FramebufferUpdate {
    pub rectangles: Vec<Rectangle>,
}

impl FramebufferUpdate {
    /// Build an update from rectangles in wire order.
    pub fn new(rectangles: Vec<Rectangle>) -> Self {
        Self { rectangles }
    }

    /// Number of rectangles in the update.
    pub fn len(&self) -> usize {
        self.rectangles.len()
    }

    /// True if the update carries no rectangles.
    pub fn is_empty(&self) -> bool {
        self.rectangles.is_empty()
    }
}

impl FromIterator<Rectangle> for FramebufferUpdate {
    fn from_iter<I: IntoIterator<Item = Rectangle>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Color map entry (RGB triplet, 16 bits per channel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ColorMapEntry {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
}

impl ColorMapEntry {
    /// Size of one entry on the wire.
    pub const WIRE_LEN: usize = 6;

    pub const fn new(red: u16, green: u16, blue: u16) -> Self {
        Self { red, green, blue }
    }
}

/// SetColorMapEntries message - update color map.
///
/// Used for palette-based color modes (not common in modern VNC).
///
/// # Wire Format
///
/// - 1 byte: message type (1)
/// - 1 byte: padding
/// - 2 bytes: first color index
/// - 2 bytes: number of colors
/// - For each color: 6 bytes (red u16, green u16, blue u16)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetColorMapEntries {
    pub first_color: u16,
    pub colors: Vec<ColorMapEntry>,
}

impl SetColorMapEntries {
    pub fn new(first_color: u16, colors: Vec<ColorMapEntry>) -> Self {
        Self {
            first_color,
            colors,
        }
    }

    /// Parse the message body (everything after the message-type byte).
    ///
    /// The declared count is checked against the bytes available before any
    /// entry is allocated, so a hostile count cannot force a large allocation.
    pub fn read_from(reader: &mut PayloadReader<'_>) -> Result<Self, MessageError> {
        reader.skip(1)?; // padding
        let first_color = reader.read_u16()?;
        let count = usize::from(reader.read_u16()?);
        reader.ensure(count * ColorMapEntry::WIRE_LEN)?;

        let mut colors = Vec::with_capacity(count);
        for _ in 0..count {
            colors.push(ColorMapEntry {
                red: reader.read_u16()?,
                green: reader.read_u16()?,
                blue: reader.read_u16()?,
            });
        }

        Ok(Self {
            first_color,
            colors,
        })
    }

    /// Serialize the message body (without the message-type byte).
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(5 + self.colors.len() * ColorMapEntry::WIRE_LEN);
        out.push(0); // padding
        out.extend_from_slice(&self.first_color.to_be_bytes());
        out.extend_from_slice(&(self.colors.len() as u16).to_be_bytes());
        for color in &self.colors {
            out.extend_from_slice(&color.red.to_be_bytes());
            out.extend_from_slice(&color.green.to_be_bytes());
            out.extend_from_slice(&color.blue.to_be_bytes());
        }
        out
    }
}
