//! In-memory RGB frame used as the drawing surface.

use core::convert::Infallible;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;

/// A heap-allocated RGB888 pixel buffer implementing [`DrawTarget`].
///
/// Pixels outside the canvas are silently dropped, so drawing code never has
/// to clip manually and the target is infallible. The raw buffer is exposed
/// row-major as 3 bytes per pixel for the sinks to encode or pack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Frame {
    /// Create a frame filled with the given background color.
    pub fn new(width: u32, height: u32, background: Rgb888) -> Self {
        // Size arithmetic in usize; u32 products overflow for large canvases.
        let pixels = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixels * 3);
        for _ in 0..pixels {
            data.extend_from_slice(&[background.r(), background.g(), background.b()]);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Canvas width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Canvas height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGB888 pixel data, row-major, 3 bytes per pixel.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Read back a single pixel; `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb888> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        Some(Rgb888::new(
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
        ))
    }
}

impl OriginDimensions for Frame {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for Frame {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }
            let (x, y) = (point.x as u32, point.y as u32);
            if x >= self.width || y >= self.height {
                continue;
            }
            let idx = (y as usize * self.width as usize + x as usize) * 3;
            self.data[idx] = color.r();
            self.data[idx + 1] = color.g();
            self.data[idx + 2] = color.b();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_frame_is_filled_with_background() {
        let bg = Rgb888::new(12, 17, 27);
        let frame = Frame::new(4, 3, bg);
        assert_eq!(frame.data().len(), 4 * 3 * 3);
        assert_eq!(frame.pixel(0, 0), Some(bg));
        assert_eq!(frame.pixel(3, 2), Some(bg));
        assert_eq!(frame.pixel(4, 0), None);
    }

    #[test]
    fn draw_iter_writes_pixels_and_ignores_out_of_bounds() {
        let mut frame = Frame::new(2, 2, Rgb888::BLACK);
        let red = Rgb888::new(255, 0, 0);
        frame
            .draw_iter([
                Pixel(Point::new(1, 1), red),
                Pixel(Point::new(-1, 0), red),
                Pixel(Point::new(5, 5), red),
            ])
            .unwrap();
        assert_eq!(frame.pixel(1, 1), Some(red));
        assert_eq!(frame.pixel(0, 0), Some(Rgb888::BLACK));
    }
}
