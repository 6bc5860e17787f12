//! Sprite: an owned pixel buffer that composites itself onto other buffers
//!
//! All buffers are premultiplied ARGB8888 (see [`crate::pixel`]) addressed
//! as `y * row_bytes + x * 4`. Row strides may exceed `width * 4`; padding
//! bytes are never touched.

use crate::geometry::{Point, Rect, Size};
use crate::pixel::{read_pixel, source_over, write_pixel, BYTES_PER_PIXEL};

/// Resolve a caller supplied stride: 0 means tightly packed
#[inline]
fn resolve_row_bytes(size: Size, row_bytes: usize) -> usize {
    if row_bytes == 0 {
        size.packed_row_bytes()
    } else {
        row_bytes
    }
}

/// Region to copy once both clips are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ClippedSpan {
    src_x: usize,
    src_y: usize,
    dest_x: usize,
    dest_y: usize,
    width: usize,
    height: usize,
}

/// Clip `src_rect` against the sprite bounds and the destination bounds.
/// Returns None when nothing is left to copy.
fn clip_span(src_rect: Rect, src_size: Size, dest_size: Size, dest_point: Point) -> Option<ClippedSpan> {
    // i64 so that i32::MIN / i32::MAX inputs cannot overflow
    let mut sx = src_rect.x as i64;
    let mut sy = src_rect.y as i64;
    let mut sx_end = sx + src_rect.width as i64;
    let mut sy_end = sy + src_rect.height as i64;
    let mut dx = dest_point.x as i64;
    let mut dy = dest_point.y as i64;

    // Source bounds: trimming the start also shifts the destination start
    if sx < 0 {
        dx -= sx;
        sx = 0;
    }
    if sy < 0 {
        dy -= sy;
        sy = 0;
    }
    sx_end = sx_end.min(src_size.width as i64);
    sy_end = sy_end.min(src_size.height as i64);

    // Destination bounds: trimming the start also shifts the source start
    if dx < 0 {
        sx -= dx;
        dx = 0;
    }
    if dy < 0 {
        sy -= dy;
        dy = 0;
    }

    let width = (sx_end - sx).min(dest_size.width as i64 - dx);
    let height = (sy_end - sy).min(dest_size.height as i64 - dy);
    if width <= 0 || height <= 0 {
        return None;
    }

    Some(ClippedSpan {
        src_x: sx as usize,
        src_y: sy as usize,
        dest_x: dx as usize,
        dest_y: dy as usize,
        width: width as usize,
        height: height as usize,
    })
}

/// A pixel buffer plus its logical size and row stride.
///
/// The sprite is the sole owner of its buffer. `B` is any owning byte
/// container; the buffer is released through `B`'s own `Drop`, exactly
/// once, when it is replaced or when the sprite goes away. There is no
/// `Clone` impl: use [`Sprite::to_owned_sprite`] for an explicit copy.
///
/// Preconditions (not checked in release builds): `row_bytes` is at least
/// `size.width * 4`, and the buffer holds at least
/// `(height - 1) * row_bytes + width * 4` bytes.
#[derive(Debug)]
pub struct Sprite<B = Vec<u8>> {
    pixels: B,
    size: Size,
    row_bytes: usize,
}

impl<B: AsRef<[u8]>> Sprite<B> {
    /// Take ownership of `pixels`. If `row_bytes` is 0 the rows are assumed
    /// to be tightly packed (`size.width * 4`).
    pub fn new(pixels: B, size: Size, row_bytes: usize) -> Self {
        let row_bytes = resolve_row_bytes(size, row_bytes);
        debug_assert_layout(pixels.as_ref(), size, row_bytes);
        Self {
            pixels,
            size,
            row_bytes,
        }
    }

    /// Replace the owned buffer. The previous buffer is dropped before this
    /// returns.
    pub fn set_pixel_buffer(&mut self, pixels: B, size: Size, row_bytes: usize) {
        let row_bytes = resolve_row_bytes(size, row_bytes);
        debug_assert_layout(pixels.as_ref(), size, row_bytes);
        self.pixels = pixels;
        self.size = size;
        self.row_bytes = row_bytes;
    }

    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    #[inline]
    pub fn row_bytes(&self) -> usize {
        self.row_bytes
    }

    /// The sprite's own coordinate space: `[0, 0] x size`
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.size)
    }

    /// Raw bytes of the owned buffer, including any row padding
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        self.pixels.as_ref()
    }

    /// Read one pixel in sprite coordinates
    pub fn pixel_at(&self, x: i32, y: i32) -> Option<u32> {
        if !self.bounds().contains_point(Point::new(x, y)) {
            return None;
        }
        let offset = y as usize * self.row_bytes + x as usize * BYTES_PER_PIXEL;
        Some(read_pixel(self.pixels.as_ref(), offset))
    }

    /// Give the buffer back to the caller, consuming the sprite
    pub fn into_pixel_buffer(self) -> B {
        self.pixels
    }

    /// Copy into a freshly allocated, tightly packed sprite
    pub fn to_owned_sprite(&self) -> Sprite<Vec<u8>> {
        let row = self.size.packed_row_bytes();
        let height = self.size.height.max(0) as usize;
        let src = self.pixels.as_ref();
        let mut pixels = Vec::with_capacity(row * height);
        for y in 0..height {
            let start = y * self.row_bytes;
            pixels.extend_from_slice(&src[start..start + row]);
        }
        Sprite::new(pixels, self.size, row)
    }

    /// Composite the part of the sprite inside `src_rect` onto `dest` with
    /// the top-left of `src_rect` placed at `dest_point`.
    ///
    /// Source-over with premultiplied alpha, clipped against both the sprite
    /// and the destination. Out-of-range rectangles and points are never an
    /// error: they clip down to a smaller or empty region, and an empty
    /// region leaves `dest` untouched. `dest_row_bytes` of 0 means tightly
    /// packed.
    pub fn composite_from_rect_to_point(
        &self,
        src_rect: Rect,
        dest: &mut [u8],
        dest_size: Size,
        dest_row_bytes: usize,
        dest_point: Point,
    ) {
        let Some(span) = clip_span(src_rect, self.size, dest_size, dest_point) else {
            return;
        };
        let dest_row_bytes = resolve_row_bytes(dest_size, dest_row_bytes);
        debug_assert_layout(dest, dest_size, dest_row_bytes);

        let src = self.pixels.as_ref();
        let span_bytes = span.width * BYTES_PER_PIXEL;

        for row in 0..span.height {
            let src_start = (span.src_y + row) * self.row_bytes + span.src_x * BYTES_PER_PIXEL;
            let dest_start = (span.dest_y + row) * dest_row_bytes + span.dest_x * BYTES_PER_PIXEL;
            let src_row = &src[src_start..src_start + span_bytes];
            let dest_row = &mut dest[dest_start..dest_start + span_bytes];

            for (col, s) in src_row.chunks_exact(BYTES_PER_PIXEL).enumerate() {
                let s = read_pixel(s, 0);
                // Fully transparent source leaves the destination as-is
                if s == 0 {
                    continue;
                }
                let offset = col * BYTES_PER_PIXEL;
                let d = read_pixel(dest_row, offset);
                write_pixel(dest_row, offset, source_over(s, d));
            }
        }
    }

    /// Composite the whole sprite with its top-left at `dest_point`
    pub fn composite_to_point(
        &self,
        dest: &mut [u8],
        dest_size: Size,
        dest_row_bytes: usize,
        dest_point: Point,
    ) {
        self.composite_from_rect_to_point(self.bounds(), dest, dest_size, dest_row_bytes, dest_point);
    }
}

#[inline]
fn debug_assert_layout(buf: &[u8], size: Size, row_bytes: usize) {
    debug_assert!(
        row_bytes >= size.packed_row_bytes(),
        "row_bytes ({}) smaller than width * 4 ({})",
        row_bytes,
        size.packed_row_bytes()
    );
    if !size.is_empty() {
        let needed = (size.height as usize - 1) * row_bytes + size.packed_row_bytes();
        debug_assert!(
            buf.len() >= needed,
            "buffer holds {} bytes, {}x{} with row_bytes {} needs {}",
            buf.len(),
            size.width,
            size.height,
            row_bytes,
            needed
        );
    }
}
