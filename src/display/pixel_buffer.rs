use crate::geometry::{Point, Rect, Size};
use crate::pixel::{self, pack_argb, premultiply, read_pixel, write_pixel, BYTES_PER_PIXEL};
use crate::sprite::Sprite;

use super::{DEFAULT_HEIGHT, DEFAULT_WIDTH};

// ============================================================================
// PixelBuffer
// ============================================================================

/// Premultiplied ARGB8888 canvas with an explicit row stride.
/// Sprites are composited onto this and it is handed to the display as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    row_bytes: usize,
}

impl PixelBuffer {
    /// Create a new pixel buffer with default resolution (640x480)
    pub fn new() -> Self {
        Self::with_size(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }

    /// Create a tightly packed, fully transparent buffer
    pub fn with_size(width: u32, height: u32) -> Self {
        Self::with_row_bytes(width, height, 0)
    }

    /// Create a buffer with `row_bytes` per row (0 = tightly packed).
    /// Strides below `width * 4` are raised to `width * 4`.
    pub fn with_row_bytes(width: u32, height: u32, row_bytes: usize) -> Self {
        let row_bytes = row_bytes.max(width as usize * BYTES_PER_PIXEL);
        Self {
            pixels: vec![0; row_bytes * height as usize],
            width,
            height,
            row_bytes,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width as i32, self.height as i32)
    }

    #[inline]
    pub fn row_bytes(&self) -> usize {
        self.row_bytes
    }

    /// Check if coordinates are within bounds
    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    /// Calculate byte offset for pixel at (x, y)
    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        y as usize * self.row_bytes + x as usize * BYTES_PER_PIXEL
    }

    /// Clear to an opaque color
    pub fn clear(&mut self, r: u8, g: u8, b: u8) {
        self.clear_argb(pack_argb(255, r, g, b));
    }

    /// Clear to a premultiplied pixel value. Row padding is left alone.
    pub fn clear_argb(&mut self, argb: u32) {
        pixel::fill(
            &mut self.pixels,
            self.width as usize,
            self.height as usize,
            self.row_bytes,
            argb,
        );
    }

    /// Read a premultiplied pixel (bounds checked)
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<u32> {
        if self.in_bounds(x, y) {
            Some(read_pixel(&self.pixels, self.pixel_index(x as u32, y as u32)))
        } else {
            None
        }
    }

    /// Write a premultiplied pixel (bounds checked)
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, argb: u32) {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            write_pixel(&mut self.pixels, idx, argb);
        }
    }

    /// Filled disc with a soft, linearly fading rim.
    /// Color is straight (not premultiplied); `feather` is the rim width in
    /// pixels. Pixels are written, not blended, so this is meant for
    /// building sprite images on a transparent buffer.
    pub fn fill_circle_soft(
        &mut self,
        cx: i32,
        cy: i32,
        radius: i32,
        r: u8,
        g: u8,
        b: u8,
        a: u8,
        feather: f32,
    ) {
        if radius <= 0 {
            return;
        }
        let r_f = radius as f32;
        let feather = feather.clamp(0.0, r_f);

        let y_start = (cy - radius).max(0);
        let y_end = (cy + radius).min(self.height as i32 - 1);
        let x_start = (cx - radius).max(0);
        let x_end = (cx + radius).min(self.width as i32 - 1);

        for y in y_start..=y_end {
            let dy = (y - cy) as f32 + 0.5;
            for x in x_start..=x_end {
                let dx = (x - cx) as f32 + 0.5;
                let dist = (dx * dx + dy * dy).sqrt();
                if dist >= r_f {
                    continue;
                }

                let coverage = if feather > 0.0 {
                    ((r_f - dist) / feather).min(1.0)
                } else {
                    1.0
                };
                let alpha = (a as f32 * coverage).round() as u8;
                self.set_pixel(x, y, premultiply(alpha, r, g, b));
            }
        }
    }

    /// Composite `src_rect` of `sprite` onto this buffer at `dest_point`
    pub fn composite<B: AsRef<[u8]>>(&mut self, sprite: &Sprite<B>, src_rect: Rect, dest_point: Point) {
        let size = self.size();
        let row_bytes = self.row_bytes;
        sprite.composite_from_rect_to_point(src_rect, &mut self.pixels, size, row_bytes, dest_point);
    }

    /// Hand the buffer over to a new sprite
    pub fn into_sprite(self) -> Sprite {
        let size = self.size();
        Sprite::new(self.pixels, size, self.row_bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }
}

impl Default for PixelBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::unpack_argb;

    #[test]
    fn test_with_row_bytes_raises_short_stride() {
        let buf = PixelBuffer::with_row_bytes(10, 2, 8);
        assert_eq!(buf.row_bytes(), 40);
        assert_eq!(buf.as_bytes().len(), 80);
    }

    #[test]
    fn test_set_get_respects_stride() {
        let mut buf = PixelBuffer::with_row_bytes(3, 3, 64);
        buf.set_pixel(2, 1, 0x11223344);
        assert_eq!(buf.get_pixel(2, 1), Some(0x11223344));
        assert_eq!(read_pixel(buf.as_bytes(), 64 + 8), 0x11223344);
        assert_eq!(buf.get_pixel(3, 1), None);
        assert_eq!(buf.get_pixel(-1, 0), None);
    }

    #[test]
    fn test_clear_leaves_padding() {
        let mut buf = PixelBuffer::with_row_bytes(2, 2, 16);
        buf.clear(1, 2, 3);
        assert_eq!(buf.get_pixel(1, 1), Some(pack_argb(255, 1, 2, 3)));
        assert!(buf.as_bytes()[8..16].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_soft_circle_is_premultiplied() {
        let mut buf = PixelBuffer::with_size(32, 32);
        buf.fill_circle_soft(16, 16, 12, 200, 100, 50, 255, 4.0);

        // center fully covered
        assert_eq!(buf.get_pixel(16, 16), Some(pack_argb(255, 200, 100, 50)));
        // corners untouched
        assert_eq!(buf.get_pixel(0, 0), Some(0));

        for y in 0..32 {
            for x in 0..32 {
                let (a, r, g, b) = unpack_argb(buf.get_pixel(x, y).unwrap());
                assert!(r <= a && g <= a && b <= a, "({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_composite_through_canvas() {
        let mut sprite_img = PixelBuffer::with_size(2, 2);
        sprite_img.clear(9, 8, 7);
        let sprite = sprite_img.into_sprite();

        let mut canvas = PixelBuffer::with_row_bytes(4, 4, 32);
        canvas.clear(0, 0, 0);
        canvas.composite(&sprite, sprite.bounds(), Point::new(3, -1));

        assert_eq!(canvas.get_pixel(3, 0), Some(pack_argb(255, 9, 8, 7)));
        assert_eq!(canvas.get_pixel(3, 1), Some(pack_argb(255, 0, 0, 0)));
        assert_eq!(canvas.get_pixel(2, 0), Some(pack_argb(255, 0, 0, 0)));
    }
}
