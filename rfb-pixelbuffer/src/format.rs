//! Pixel sample decoding from RFB wire formats to canvas colours.
//!
//! The canvas always stores 8-bit RGB. Every encoded pixel on the wire is
//! converted through a [`PixelSampleDecoder`] built from the negotiated
//! [`PixelFormat`] and the session's [`ColorMap`].
//!
//! # True Color Model
//!
//! The RFB protocol supports two color models:
//! - **True color** (direct color): Each pixel directly encodes RGB values using bit fields
//! - **Color map**: Pixels are indices into a separate color lookup table
//!
//! # Channel Extraction and Scaling
//!
//! To extract a color component from a true-color pixel value:
//! 1. Shift right by the channel's shift value
//! 2. Mask with the channel's max value
//! 3. Scale to 8-bit: `(component * 255) / channel_max`
//!
//! Palette entries carry 16-bit channels, scaled to 8-bit with `/ 257`.
//!
//! # Example
//!
//! ```
//! use rfb_pixelbuffer::{ColorMap, PixelSampleDecoder, Rgb};
//! use rfb_protocol::messages::PixelFormat;
//!
//! let map = ColorMap::new();
//! let decoder = PixelSampleDecoder::new(PixelFormat::rgb888(), &map).unwrap();
//!
//! // Little-endian 0x00AABBCC
//! let rgb = decoder.decode(&[0xCC, 0xBB, 0xAA, 0x00]).unwrap();
//! assert_eq!(rgb, Rgb::new(0xAA, 0xBB, 0xCC));
//! ```

use crate::{ColorMap, PixelBufferError};
use rfb_protocol::messages::{ColorMapEntry, PixelFormat};

/// An 8-bit-per-channel canvas colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Canvas byte order.
    pub const fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    pub const fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2])
    }
}

impl From<ColorMapEntry> for Rgb {
    fn from(entry: ColorMapEntry) -> Self {
        Rgb::new(
            (entry.red / 257) as u8,
            (entry.green / 257) as u8,
            (entry.blue / 257) as u8,
        )
    }
}

/// Converts wire pixels to [`Rgb`] under one pixel format.
///
/// Holds no mutable state; one decoder is built per update and shared by
/// every rectangle in it.
#[derive(Debug, Clone, Copy)]
pub struct PixelSampleDecoder<'a> {
    format: PixelFormat,
    color_map: &'a ColorMap,
    bytes_per_pixel: usize,
}

impl<'a> PixelSampleDecoder<'a> {
    /// Validate `format` and build a decoder over it.
    ///
    /// Only 8, 16 and 32 bits per pixel are accepted. True-color formats must
    /// have non-zero channel maxima and shifts below 32.
    pub fn new(format: PixelFormat, color_map: &'a ColorMap) -> Result<Self, PixelBufferError> {
        if !matches!(format.bits_per_pixel, 8 | 16 | 32) {
            return Err(PixelBufferError::UnsupportedPixelFormat(format!(
                "{} bits per pixel",
                format.bits_per_pixel
            )));
        }

        if format.true_color {
            let channels = [
                ("red", format.red_max, format.red_shift),
                ("green", format.green_max, format.green_shift),
                ("blue", format.blue_max, format.blue_shift),
            ];
            for (name, max, shift) in channels {
                if max == 0 {
                    return Err(PixelBufferError::UnsupportedPixelFormat(format!(
                        "{name} channel max is zero"
                    )));
                }
                if shift >= 32 {
                    return Err(PixelBufferError::UnsupportedPixelFormat(format!(
                        "{name} channel shift {shift} out of range"
                    )));
                }
            }
        }

        Ok(Self {
            format,
            color_map,
            bytes_per_pixel: usize::from(format.bytes_per_pixel()),
        })
    }

    pub fn format(&self) -> &PixelFormat {
        &self.format
    }

    /// Wire size of one pixel.
    pub fn bytes_per_pixel(&self) -> usize {
        self.bytes_per_pixel
    }

    /// Decode one pixel. `sample` must be exactly [`bytes_per_pixel`](Self::bytes_per_pixel) long.
    pub fn decode(&self, sample: &[u8]) -> Result<Rgb, PixelBufferError> {
        if sample.len() != self.bytes_per_pixel {
            return Err(PixelBufferError::SampleLength {
                expected: self.bytes_per_pixel,
                actual: sample.len(),
            });
        }

        let value = self.assemble(sample);
        if self.format.true_color {
            Ok(Rgb::new(
                scale_channel(value, self.format.red_shift, self.format.red_max),
                scale_channel(value, self.format.green_shift, self.format.green_max),
                scale_channel(value, self.format.blue_shift, self.format.blue_max),
            ))
        } else {
            let index = u16::try_from(value).map_err(|_| PixelBufferError::PaletteIndex(value))?;
            self.color_map
                .lookup(index)
                .map(Rgb::from)
                .ok_or(PixelBufferError::PaletteIndex(value))
        }
    }

    /// Decode a packed run of pixels.
    pub fn decode_run(&self, samples: &[u8]) -> Result<Vec<Rgb>, PixelBufferError> {
        if samples.len() % self.bytes_per_pixel != 0 {
            return Err(PixelBufferError::SampleLength {
                expected: samples.len().next_multiple_of(self.bytes_per_pixel),
                actual: samples.len(),
            });
        }
        samples
            .chunks_exact(self.bytes_per_pixel)
            .map(|sample| self.decode(sample))
            .collect()
    }

    fn assemble(&self, sample: &[u8]) -> u32 {
        if self.format.big_endian {
            sample
                .iter()
                .fold(0u32, |value, &byte| (value << 8) | u32::from(byte))
        } else {
            sample
                .iter()
                .rev()
                .fold(0u32, |value, &byte| (value << 8) | u32::from(byte))
        }
    }
}

fn scale_channel(value: u32, shift: u8, max: u16) -> u8 {
    let max = u32::from(max);
    let component = (value >> shift) & max;
    (component * 255 / max) as u8
}

/// Encode `rgb` as a true-color pixel in `format`.
///
/// The inverse of decoding for true-color formats; used to build payloads.
///
/// ```
/// use rfb_pixelbuffer::{encode_true_color, Rgb};
/// use rfb_protocol::messages::PixelFormat;
///
/// let raw = encode_true_color(&PixelFormat::rgb888(), Rgb::new(0xAA, 0xBB, 0xCC));
/// assert_eq!(raw, vec![0xCC, 0xBB, 0xAA, 0x00]);
/// ```
pub fn encode_true_color(format: &PixelFormat, rgb: Rgb) -> Vec<u8> {
    // Scale from 8-bit to format range
    let r = u32::from(rgb.r) * u32::from(format.red_max) / 255;
    let g = u32::from(rgb.g) * u32::from(format.green_max) / 255;
    let b = u32::from(rgb.b) * u32::from(format.blue_max) / 255;

    let value = (r << format.red_shift) | (g << format.green_shift) | (b << format.blue_shift);

    let bpp = usize::from(format.bytes_per_pixel());
    let le = value.to_le_bytes();
    let mut out = le[..bpp.min(4)].to_vec();
    if format.big_endian {
        out.reverse();
    }
    out
}
