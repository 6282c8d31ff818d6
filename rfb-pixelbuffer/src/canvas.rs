//! The reconstructed remote screen.
//!
//! [`Canvas`] owns an RGB buffer (3 bytes per pixel, row-major, no padding).
//! Decoders get a [`CanvasView`] over one rectangle at a time; observers on
//! other threads get an immutable [`CanvasSnapshot`].
//!
//! # Memory Layout
//!
//! ```text
//! Total size = W * H * 3 bytes
//! Pixel at (x, y) starts at offset: (y * W + x) * 3
//! ```

use crate::{MutablePixelBuffer, PixelBuffer, PixelBufferError, Rgb};
use rfb_common::{Point, Rect};

/// Canvas bytes per pixel.
pub const BYTES_PER_PIXEL: usize = 3;

/// A framebuffer that owns its RGB pixel data.
///
/// # Example
///
/// ```
/// use rfb_pixelbuffer::{Canvas, PixelBuffer};
///
/// let canvas = Canvas::new(800, 600);
/// assert_eq!(canvas.dimensions(), (800, 600));
/// assert_eq!(canvas.data().len(), 800 * 600 * 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Canvas {
    /// Creates a black canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; buffer_len(width, height)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The whole canvas as a rectangle at the origin.
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Raw RGB bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Change the canvas size, keeping the top-left `min(w) x min(h)` block.
    ///
    /// The rest of the new canvas is black. The replacement buffer is built
    /// in full before it is swapped in.
    pub fn resize(&mut self, width: u32, height: u32) {
        let mut data = vec![0u8; buffer_len(width, height)];

        let keep_cols = self.width.min(width) as usize;
        let keep_rows = self.height.min(height) as usize;
        let row_bytes = keep_cols * BYTES_PER_PIXEL;
        for y in 0..keep_rows {
            let src = y * self.width as usize * BYTES_PER_PIXEL;
            let dst = y * width as usize * BYTES_PER_PIXEL;
            data[dst..dst + row_bytes].copy_from_slice(&self.data[src..src + row_bytes]);
        }

        self.width = width;
        self.height = height;
        self.data = data;
    }

    /// Borrow `rect` for writing.
    ///
    /// Fails unless `rect` lies entirely inside the canvas.
    pub fn view_mut(&mut self, rect: Rect) -> Result<CanvasView<'_>, PixelBufferError> {
        if !rect.fits_within(self.width, self.height) {
            return Err(PixelBufferError::OutOfBounds {
                rect,
                width: self.width,
                height: self.height,
            });
        }
        Ok(CanvasView {
            canvas: self,
            bounds: rect,
        })
    }

    /// Immutable copy of the current pixels.
    pub fn snapshot(&self) -> CanvasSnapshot {
        CanvasSnapshot {
            width: self.width,
            height: self.height,
            data: self.data.clone(),
        }
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL
    }

    // Callers have checked `rect` against the canvas.
    fn fill(&mut self, rect: Rect, color: Rgb) {
        let pixel = color.to_bytes();
        for y in 0..rect.height {
            let start = self.offset(rect.x as u32, rect.y as u32 + y);
            let row = &mut self.data[start..start + rect.width as usize * BYTES_PER_PIXEL];
            for chunk in row.chunks_exact_mut(BYTES_PER_PIXEL) {
                chunk.copy_from_slice(&pixel);
            }
        }
    }

    fn write(&mut self, rect: Rect, pixels: &[Rgb]) {
        if rect.is_empty() {
            return;
        }
        for (y, src_row) in pixels.chunks_exact(rect.width as usize).enumerate() {
            let start = self.offset(rect.x as u32, rect.y as u32 + y as u32);
            let row = &mut self.data[start..start + rect.width as usize * BYTES_PER_PIXEL];
            for (chunk, color) in row.chunks_exact_mut(BYTES_PER_PIXEL).zip(src_row) {
                chunk.copy_from_slice(&color.to_bytes());
            }
        }
    }

    fn copy(&mut self, src: Rect, dest: Rect) {
        let row_bytes = src.width as usize * BYTES_PER_PIXEL;
        let mut staging = Vec::with_capacity(row_bytes * src.height as usize);
        for y in 0..src.height {
            let start = self.offset(src.x as u32, src.y as u32 + y);
            staging.extend_from_slice(&self.data[start..start + row_bytes]);
        }
        for (y, row) in staging.chunks_exact(row_bytes).enumerate() {
            let start = self.offset(dest.x as u32, dest.y as u32 + y as u32);
            self.data[start..start + row_bytes].copy_from_slice(row);
        }
    }
}

impl PixelBuffer for Canvas {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn get_pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = self.offset(x, y);
        Some(Rgb::new(
            self.data[start],
            self.data[start + 1],
            self.data[start + 2],
        ))
    }
}

/// Immutable copy of a canvas, safe to hand to another thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasSnapshot {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl CanvasSnapshot {
    /// Raw RGB bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl PixelBuffer for CanvasSnapshot {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn get_pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        Some(Rgb::new(
            self.data[start],
            self.data[start + 1],
            self.data[start + 2],
        ))
    }
}

/// Mutable handle on one rectangle of a [`Canvas`].
///
/// All coordinates given to it are local to the rectangle, except the copy
/// source, which is in canvas coordinates.
#[derive(Debug)]
pub struct CanvasView<'a> {
    canvas: &'a mut Canvas,
    bounds: Rect,
}

impl CanvasView<'_> {
    fn to_canvas(&self, local: Rect) -> Result<Rect, PixelBufferError> {
        if !local.fits_within(self.bounds.width, self.bounds.height) {
            return Err(PixelBufferError::OutOfBounds {
                rect: local,
                width: self.bounds.width,
                height: self.bounds.height,
            });
        }
        Ok(local.translate(self.bounds.x, self.bounds.y))
    }
}

impl PixelBuffer for CanvasView<'_> {
    fn dimensions(&self) -> (u32, u32) {
        (self.bounds.width, self.bounds.height)
    }

    fn get_pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.bounds.width || y >= self.bounds.height {
            return None;
        }
        self.canvas
            .get_pixel(self.bounds.x as u32 + x, self.bounds.y as u32 + y)
    }
}

impl MutablePixelBuffer for CanvasView<'_> {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb) -> Result<(), PixelBufferError> {
        let target = self.to_canvas(rect)?;
        self.canvas.fill(target, color);
        Ok(())
    }

    fn image_rect(&mut self, rect: Rect, pixels: &[Rgb]) -> Result<(), PixelBufferError> {
        let target = self.to_canvas(rect)?;
        let expected = rect.area() as usize;
        if pixels.len() != expected {
            return Err(PixelBufferError::ImageLength {
                expected,
                actual: pixels.len(),
            });
        }
        self.canvas.write(target, pixels);
        Ok(())
    }

    fn copy_from(&mut self, src: Point) -> Result<(), PixelBufferError> {
        if self.bounds.is_empty() {
            return Ok(());
        }
        let source = Rect::new(src.x, src.y, self.bounds.width, self.bounds.height);
        if !source.fits_within(self.canvas.width, self.canvas.height) {
            return Err(PixelBufferError::SourceOutOfBounds {
                rect: source,
                width: self.canvas.width,
                height: self.canvas.height,
            });
        }
        self.canvas.copy(source, self.bounds);
        Ok(())
    }
}

fn buffer_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * BYTES_PER_PIXEL
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const RED: Rgb = Rgb::new(255, 0, 0);
    const BLUE: Rgb = Rgb::new(0, 0, 255);

    /// Canvas where every pixel encodes its own coordinates.
    fn gradient(width: u32, height: u32) -> Canvas {
        let mut canvas = Canvas::new(width, height);
        let pixels: Vec<Rgb> = (0..height)
            .flat_map(|y| (0..width).map(move |x| Rgb::new(x as u8, y as u8, 7)))
            .collect();
        canvas
            .view_mut(canvas.bounds())
            .unwrap()
            .image_rect(Rect::from_size(width, height), &pixels)
            .unwrap();
        canvas
    }

    #[test]
    fn test_create_canvas() {
        let canvas = Canvas::new(100, 50);
        assert_eq!(canvas.dimensions(), (100, 50));
        assert_eq!(canvas.data().len(), 100 * 50 * 3);
        assert_eq!(canvas.get_pixel(99, 49), Some(Rgb::BLACK));
        assert_eq!(canvas.get_pixel(100, 0), None);
    }

    #[test]
    fn test_view_rejects_out_of_bounds() {
        let mut canvas = Canvas::new(100, 100);
        let err = canvas.view_mut(Rect::new(90, 50, 20, 10)).unwrap_err();
        assert_eq!(
            err,
            PixelBufferError::OutOfBounds {
                rect: Rect::new(90, 50, 20, 10),
                width: 100,
                height: 100
            }
        );
        assert!(canvas.view_mut(Rect::new(50, 50, 50, 50)).is_ok());
    }

    #[test]
    fn test_view_fill_is_local_and_bounded() {
        let mut canvas = Canvas::new(100, 100);
        let mut view = canvas.view_mut(Rect::new(10, 10, 20, 20)).unwrap();
        view.fill_rect(Rect::new(5, 5, 10, 10), RED).unwrap();
        assert!(view.fill_rect(Rect::new(15, 15, 10, 10), RED).is_err());
        assert_eq!(view.get_pixel(5, 5), Some(RED));

        assert_eq!(canvas.get_pixel(15, 15), Some(RED));
        assert_eq!(canvas.get_pixel(24, 24), Some(RED));
        assert_eq!(canvas.get_pixel(25, 25), Some(Rgb::BLACK));
        assert_eq!(canvas.get_pixel(14, 14), Some(Rgb::BLACK));
    }

    #[test]
    fn test_image_rect_length_checked() {
        let mut canvas = Canvas::new(10, 10);
        let mut view = canvas.view_mut(Rect::new(0, 0, 4, 4)).unwrap();
        let err = view
            .image_rect(Rect::new(0, 0, 2, 2), &[RED, RED, RED])
            .unwrap_err();
        assert_eq!(
            err,
            PixelBufferError::ImageLength {
                expected: 4,
                actual: 3
            }
        );
        view.image_rect(Rect::new(1, 1, 2, 1), &[RED, BLUE]).unwrap();
        assert_eq!(canvas.get_pixel(1, 1), Some(RED));
        assert_eq!(canvas.get_pixel(2, 1), Some(BLUE));
    }

    #[test]
    fn test_copy_from_disjoint() {
        let mut canvas = gradient(32, 32);
        let before = canvas.snapshot();
        canvas
            .view_mut(Rect::new(20, 20, 8, 8))
            .unwrap()
            .copy_from(Point::new(0, 0))
            .unwrap();
        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(canvas.get_pixel(20 + x, 20 + y), before.get_pixel(x, y));
            }
        }
    }

    #[test]
    fn test_copy_from_overlapping_matches_snapshot() {
        // Shift right and down by one pixel: a naive forward copy would smear
        for (dx, dy) in [(1i32, 0i32), (0, 1), (1, 1), (-1, 0), (0, -1)] {
            let mut canvas = gradient(16, 16);
            let before = canvas.snapshot();
            let dest = Rect::new(4 + dx, 4 + dy, 8, 8);
            canvas
                .view_mut(dest)
                .unwrap()
                .copy_from(Point::new(4, 4))
                .unwrap();
            for y in 0..8 {
                for x in 0..8 {
                    assert_eq!(
                        canvas.get_pixel(dest.x as u32 + x, dest.y as u32 + y),
                        before.get_pixel(4 + x, 4 + y),
                        "shift ({dx}, {dy}) at ({x}, {y})"
                    );
                }
            }
        }
    }

    #[test]
    fn test_copy_from_identical_is_noop() {
        let mut canvas = gradient(16, 16);
        let before = canvas.clone();
        canvas
            .view_mut(Rect::new(2, 2, 10, 10))
            .unwrap()
            .copy_from(Point::new(2, 2))
            .unwrap();
        assert_eq!(canvas, before);
    }

    #[test]
    fn test_copy_from_source_out_of_bounds() {
        let mut canvas = Canvas::new(16, 16);
        let err = canvas
            .view_mut(Rect::new(0, 0, 8, 8))
            .unwrap()
            .copy_from(Point::new(10, 0))
            .unwrap_err();
        assert!(matches!(err, PixelBufferError::SourceOutOfBounds { .. }));
    }

    #[test]
    fn test_resize_grow_and_shrink() {
        let mut canvas = gradient(8, 6);
        let before = canvas.snapshot();

        canvas.resize(10, 4);
        assert_eq!(canvas.dimensions(), (10, 4));
        assert_eq!(canvas.data().len(), 10 * 4 * 3);
        assert_eq!(canvas.get_pixel(7, 3), before.get_pixel(7, 3));
        assert_eq!(canvas.get_pixel(8, 0), Some(Rgb::BLACK));
        assert_eq!(canvas.get_pixel(0, 4), None);
    }

    #[test]
    fn test_resize_to_zero() {
        let mut canvas = gradient(4, 4);
        canvas.resize(0, 0);
        assert_eq!(canvas.dimensions(), (0, 0));
        assert!(canvas.data().is_empty());
        canvas.resize(2, 2);
        assert_eq!(canvas.get_pixel(1, 1), Some(Rgb::BLACK));
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut canvas = Canvas::new(4, 4);
        let snap = canvas.snapshot();
        canvas
            .view_mut(Rect::new(0, 0, 1, 1))
            .unwrap()
            .fill_rect(Rect::new(0, 0, 1, 1), RED)
            .unwrap();
        assert_eq!(snap.get_pixel(0, 0), Some(Rgb::BLACK));
        assert_eq!(canvas.get_pixel(0, 0), Some(RED));
    }

    proptest! {
        /// Resize keeps exactly the overlapping top-left block and zeroes the rest.
        #[test]
        fn test_resize_preserves_top_left(
            w1 in 0u32..40, h1 in 0u32..40,
            w2 in 0u32..40, h2 in 0u32..40
        ) {
            let mut canvas = gradient(w1, h1);
            let before = canvas.snapshot();
            canvas.resize(w2, h2);

            prop_assert_eq!(canvas.dimensions(), (w2, h2));
            for y in 0..h2 {
                for x in 0..w2 {
                    let expected = if x < w1 && y < h1 {
                        before.get_pixel(x, y)
                    } else {
                        Some(Rgb::BLACK)
                    };
                    prop_assert_eq!(canvas.get_pixel(x, y), expected);
                }
            }
        }
    }
}
