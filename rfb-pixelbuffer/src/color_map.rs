//! Palette for color-map (indexed) pixel formats.
//!
//! Entries arrive in batches via `SetColorMapEntries` and are only ever added
//! or overwritten, never removed. A map lives for the whole session.

use crate::PixelBufferError;
use rfb_protocol::messages::ColorMapEntry;
use std::collections::HashMap;

/// Number of addressable palette slots.
pub const PALETTE_SLOTS: usize = 1 << 16;

/// Sparse palette keyed by 16-bit index.
///
/// # Example
///
/// ```
/// use rfb_pixelbuffer::ColorMap;
/// use rfb_protocol::messages::ColorMapEntry;
///
/// let mut map = ColorMap::new();
/// map.update(5, &[ColorMapEntry::new(0xFFFF, 0, 0)]).unwrap();
/// assert_eq!(map.lookup(5), Some(ColorMapEntry::new(0xFFFF, 0, 0)));
/// assert_eq!(map.lookup(6), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorMap {
    entries: HashMap<u16, ColorMapEntry>,
}

impl ColorMap {
    /// Create an empty palette.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `colors[i]` at `first + i`, overwriting existing entries.
    ///
    /// The batch is rejected as a whole if it would run past the last slot;
    /// nothing is written in that case.
    pub fn update(&mut self, first: u16, colors: &[ColorMapEntry]) -> Result<(), PixelBufferError> {
        if usize::from(first) + colors.len() > PALETTE_SLOTS {
            return Err(PixelBufferError::ColorMapOverflow {
                first,
                count: colors.len(),
            });
        }

        for (index, color) in (first..=u16::MAX).zip(colors) {
            self.entries.insert(index, *color);
        }
        Ok(())
    }

    /// Entry at `index`, if one has been set.
    pub fn lookup(&self, index: u16) -> Option<ColorMapEntry> {
        self.entries.get(&index).copied()
    }

    /// Number of populated slots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
