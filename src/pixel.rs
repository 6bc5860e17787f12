//! ARGB8888 premultiplied pixel format
//!
//! Each pixel is one native-endian `u32` holding `0xAARRGGBB`. Color
//! channels are already scaled by alpha, so source-over reduces to
//! `out = src + dst * (255 - src_a) / 255` on every channel, alpha included.

/// Bytes per pixel
pub const BYTES_PER_PIXEL: usize = 4;

// ============================================================================
// Channel Math
// ============================================================================

/// Divide by 255 with round-to-nearest.
/// Exact for every product of two u8 values (x <= 65025).
#[inline]
pub fn div255_round(x: u32) -> u32 {
    let x = x + 128;
    (x + (x >> 8)) >> 8
}

/// Source-over one premultiplied channel, clamped to 255 for inputs that
/// break the premultiplied invariant (color > alpha)
#[inline]
fn over_channel(src: u32, dst: u32, inv_alpha: u32) -> u32 {
    (src + div255_round(dst * inv_alpha)).min(255)
}

// ============================================================================
// Packing
// ============================================================================

#[inline]
pub const fn pack_argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Split a pixel into (a, r, g, b)
#[inline]
pub const fn unpack_argb(pixel: u32) -> (u8, u8, u8, u8) {
    (
        (pixel >> 24) as u8,
        (pixel >> 16) as u8,
        (pixel >> 8) as u8,
        pixel as u8,
    )
}

/// Convert a straight (non-premultiplied) color to the premultiplied format
#[inline]
pub fn premultiply(a: u8, r: u8, g: u8, b: u8) -> u32 {
    let alpha = a as u32;
    pack_argb(
        a,
        div255_round(r as u32 * alpha) as u8,
        div255_round(g as u32 * alpha) as u8,
        div255_round(b as u32 * alpha) as u8,
    )
}

// ============================================================================
// Blending
// ============================================================================

/// Premultiplied source-over: `src` drawn on top of `dst`
#[inline]
pub fn source_over(src: u32, dst: u32) -> u32 {
    let src_a = src >> 24;
    if src_a == 255 {
        return src;
    }
    if src == 0 {
        return dst;
    }

    let inv = 255 - src_a;
    let a = over_channel(src_a, dst >> 24, inv);
    let r = over_channel((src >> 16) & 0xff, (dst >> 16) & 0xff, inv);
    let g = over_channel((src >> 8) & 0xff, (dst >> 8) & 0xff, inv);
    let b = over_channel(src & 0xff, dst & 0xff, inv);
    (a << 24) | (r << 16) | (g << 8) | b
}

// ============================================================================
// Byte Buffer Access
// ============================================================================

/// Read the pixel starting at byte `offset`
#[inline]
pub fn read_pixel(buf: &[u8], offset: usize) -> u32 {
    let mut word = [0u8; BYTES_PER_PIXEL];
    word.copy_from_slice(&buf[offset..offset + BYTES_PER_PIXEL]);
    u32::from_ne_bytes(word)
}

/// Write the pixel starting at byte `offset`
#[inline]
pub fn write_pixel(buf: &mut [u8], offset: usize, pixel: u32) {
    buf[offset..offset + BYTES_PER_PIXEL].copy_from_slice(&pixel.to_ne_bytes());
}

/// Fill the first `width` pixels of every row with `pixel`, leaving any
/// padding bytes between rows alone
pub fn fill(buf: &mut [u8], width: usize, height: usize, row_bytes: usize, pixel: u32) {
    let bytes = pixel.to_ne_bytes();
    for y in 0..height {
        let start = y * row_bytes;
        for px in buf[start..start + width * BYTES_PER_PIXEL].chunks_exact_mut(BYTES_PER_PIXEL) {
            px.copy_from_slice(&bytes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_div255_round_matches_reference() {
        for x in 0..=255 * 255 {
            assert_eq!(div255_round(x), (x + 127) / 255, "x={}", x);
        }
    }

    #[test]
    fn test_pack_unpack() {
        let p = pack_argb(0x12, 0x34, 0x56, 0x78);
        assert_eq!(p, 0x12345678);
        assert_eq!(unpack_argb(p), (0x12, 0x34, 0x56, 0x78));
    }

    #[test]
    fn test_premultiply() {
        assert_eq!(premultiply(255, 10, 20, 30), pack_argb(255, 10, 20, 30));
        assert_eq!(premultiply(0, 10, 20, 30), 0);
        assert_eq!(premultiply(128, 128, 255, 0), pack_argb(128, 64, 128, 0));
    }

    #[test]
    fn test_over_opaque_source_replaces() {
        let src = pack_argb(255, 1, 2, 3);
        assert_eq!(source_over(src, pack_argb(255, 200, 100, 50)), src);
    }

    #[test]
    fn test_over_transparent_source_keeps_dest() {
        let dst = pack_argb(77, 10, 20, 30);
        assert_eq!(source_over(0, dst), dst);
    }

    #[test]
    fn test_over_half_gray_on_black() {
        let out = source_over(pack_argb(128, 64, 64, 64), pack_argb(255, 0, 0, 0));
        assert_eq!(unpack_argb(out), (255, 64, 64, 64));
    }

    #[test]
    fn test_over_onto_transparent_dest() {
        let src = pack_argb(100, 50, 40, 30);
        assert_eq!(source_over(src, 0), src);
    }

    #[test]
    fn test_over_clamps_invalid_premultiplied_input() {
        // color channel larger than alpha
        let out = source_over(pack_argb(10, 250, 0, 0), pack_argb(255, 255, 0, 0));
        assert_eq!(unpack_argb(out).1, 255);
    }

    #[test]
    fn test_fill_skips_padding() {
        let mut buf = vec![0xAAu8; 2 * 12];
        fill(&mut buf, 2, 2, 12, 0x01020304);
        assert_eq!(read_pixel(&buf, 0), 0x01020304);
        assert_eq!(read_pixel(&buf, 4), 0x01020304);
        assert_eq!(&buf[8..12], &[0xAA; 4]);
        assert_eq!(read_pixel(&buf, 12), 0x01020304);
        assert_eq!(&buf[20..24], &[0xAA; 4]);
    }
}
