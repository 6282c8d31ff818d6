//! Pixel buffer traits.
//!
//! This module defines the two access levels decoders and hosts use:
//!
//! - [`PixelBuffer`]: Read-only access to pixel data
//! - [`MutablePixelBuffer`]: Bounded write access with rendering operations
//!
//! # Coordinates
//!
//! A mutable buffer handed to a decoder covers exactly one rectangle of the
//! canvas. Rectangles passed to [`fill_rect`](MutablePixelBuffer::fill_rect)
//! and [`image_rect`](MutablePixelBuffer::image_rect) are **local** to that
//! rectangle (origin at its top-left corner); anything reaching past its
//! edges is rejected rather than clipped. Only the copy source passed to
//! [`copy_from`](MutablePixelBuffer::copy_from) is in canvas coordinates.
//!
//! # Example
//!
//! ```
//! use rfb_common::Rect;
//! use rfb_pixelbuffer::{Canvas, MutablePixelBuffer, PixelBuffer, Rgb};
//!
//! let mut canvas = Canvas::new(100, 100);
//! {
//!     let mut view = canvas.view_mut(Rect::new(10, 10, 20, 20)).unwrap();
//!     view.fill_rect(Rect::new(0, 0, 5, 5), Rgb::new(255, 0, 0)).unwrap();
//! }
//! assert_eq!(canvas.get_pixel(10, 10), Some(Rgb::new(255, 0, 0)));
//! assert_eq!(canvas.get_pixel(15, 15), Some(Rgb::BLACK));
//! ```

use crate::{PixelBufferError, Rgb};
use rfb_common::{Point, Rect};

/// Read-only pixel buffer access.
pub trait PixelBuffer {
    /// Returns the dimensions of the pixel buffer as (width, height).
    fn dimensions(&self) -> (u32, u32);

    /// Colour at `(x, y)`, or `None` outside the buffer.
    fn get_pixel(&self, x: u32, y: u32) -> Option<Rgb>;
}

/// Bounded write access to one rectangle of a canvas.
///
/// This is the only surface decoders write through, so a decoder can never
/// touch pixels outside the rectangle it was given.
pub trait MutablePixelBuffer: PixelBuffer {
    /// The covered rectangle in canvas coordinates.
    fn bounds(&self) -> Rect;

    /// Fill a local rectangle with a solid colour.
    fn fill_rect(&mut self, rect: Rect, color: Rgb) -> Result<(), PixelBufferError>;

    /// Write row-major `pixels` into a local rectangle.
    ///
    /// `pixels.len()` must equal the rectangle's area.
    fn image_rect(&mut self, rect: Rect, pixels: &[Rgb]) -> Result<(), PixelBufferError>;

    /// Fill the whole buffer with the same-sized block whose top-left corner
    /// is `src` in canvas coordinates.
    ///
    /// The result equals copying from a frozen snapshot taken before the call,
    /// whether or not source and destination overlap.
    fn copy_from(&mut self, src: Point) -> Result<(), PixelBufferError>;
}
