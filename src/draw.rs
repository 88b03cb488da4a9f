//! Software drawing on a colour plane
//!
//! Everything here is pixel-exact so overlay images can be checked in tests:
//! filled boxes, thick rectangle outlines and a tiny scaled 5x7 bitmap font.
//! Coordinates may lie far outside the plane; work is clipped up front.

use crate::types::{Bgr, ColorPlane};

/// `[start, start + len)` clipped to `[0, limit)`.
fn clip_span(start: i32, len: i32, limit: usize) -> (usize, usize) {
    let limit = limit as i64;
    let lo = (start as i64).clamp(0, limit);
    let hi = (start as i64 + len.max(0) as i64).clamp(lo, limit);
    (lo as usize, hi as usize)
}

/// Fill `w x h` pixels starting at (x,y); clipped to the plane.
pub fn fill_rect(plane: &mut ColorPlane, x: i32, y: i32, w: i32, h: i32, color: Bgr) {
    let (x0, x1) = clip_span(x, w, plane.width);
    let (y0, y1) = clip_span(y, h, plane.height);
    for py in y0..y1 {
        let row = py * plane.width;
        for px in x0..x1 {
            let i = (row + px) * ColorPlane::CHANNELS;
            plane.data[i..i + ColorPlane::CHANNELS].copy_from_slice(&color.0);
        }
    }
}

/// Outline the rectangle with corners (x0,y0) and (x1,y1).
/// The stroke is centred on the corner lines, like OpenCV's thick rectangles:
/// a 3px stroke covers one pixel either side of each edge.
pub fn stroke_rect(
    plane: &mut ColorPlane,
    x0: i32, y0: i32,
    x1: i32, y1: i32,
    thickness: i32,
    color: Bgr,
) {
    let half = thickness / 2;
    let (left, top) = (x0.saturating_sub(half), y0.saturating_sub(half));
    let span_w = x1.saturating_sub(x0).saturating_add(2 * half + 1);
    let span_h = y1.saturating_sub(y0).saturating_add(2 * half + 1);
    // top, bottom
    fill_rect(plane, left, top, span_w, thickness, color);
    fill_rect(plane, left, y1.saturating_sub(half), span_w, thickness, color);
    // left, right
    fill_rect(plane, left, top, thickness, span_h, color);
    fill_rect(plane, x1.saturating_sub(half), top, thickness, span_h, color);
}

/// Copy `src` into `dst` with its top-left at (x,y).
pub fn blit(dst: &mut ColorPlane, src: &ColorPlane, x: i32, y: i32) {
    for sy in 0..src.height {
        for sx in 0..src.width {
            dst.put(x.saturating_add(sx as i32), y.saturating_add(sy as i32), src.pixel(sx, sy));
        }
    }
}

/* ---------- 5x7 bitmap font (digits, the capitals of element kinds, punctuation) ---------- */

pub const GLYPH_W: i32 = 5;
pub const GLYPH_H: i32 = 7;
/// Horizontal advance per character at scale 1.
pub const ADVANCE: i32 = GLYPH_W + 1;

/// Return a 5x7 glyph bitmap for a limited character set.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'N' => g!(0b10001,0b11001,0b10101,0b10011,0b10001,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        ',' => g!(0b00000,0b00000,0b00000,0b00000,0b00110,0b00100,0b01000),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        '_' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b11111),
        '"' => g!(0b01010,0b01010,0b00000,0b00000,0b00000,0b00000,0b00000),
        '[' => g!(0b01110,0b01000,0b01000,0b01000,0b01000,0b01000,0b01110),
        ']' => g!(0b01110,0b00010,0b00010,0b00010,0b00010,0b00010,0b01110),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),

        _ => None,
    }
}

fn stamp_glyph(plane: &mut ColorPlane, x: i32, y: i32, rows: &[u8; 7], scale: i32, color: Bgr) {
    for (ry, rowbits) in rows.iter().enumerate() {
        for rx in 0..GLYPH_W {
            if (rowbits & (1 << (4 - rx))) != 0 {
                let px = x.saturating_add(rx * scale);
                let py = y.saturating_add(ry as i32 * scale);
                fill_rect(plane, px, py, scale, scale, color);
            }
        }
    }
}

/// Draw a string with its top-left at (x,y). Lower case is drawn as upper
/// case; characters without a glyph leave a blank cell.
pub fn draw_text(plane: &mut ColorPlane, mut x: i32, y: i32, text: &str, scale: i32, color: Bgr) {
    for ch in text.chars() {
        if let Some(rows) = glyph5x7(ch.to_ascii_uppercase()) {
            stamp_glyph(plane, x, y, &rows, scale, color);
        }
        x = x.saturating_add(ADVANCE * scale);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Bgr = Bgr::new(0, 0, 255);
    const BLACK: Bgr = Bgr::new(0, 0, 0);

    #[test]
    fn fill_clips_to_plane() {
        let mut p = ColorPlane::new(4, 4);
        fill_rect(&mut p, -2, -2, 4, 4, RED);
        assert_eq!(p.pixel(0, 0), RED);
        assert_eq!(p.pixel(1, 1), RED);
        assert_eq!(p.pixel(2, 2), BLACK);
    }

    #[test]
    fn stroke_is_centred_on_edges() {
        let mut p = ColorPlane::new(20, 20);
        stroke_rect(&mut p, 5, 5, 14, 14, 3, RED);
        for i in 4..=6 {
            assert_eq!(p.pixel(i, 10), RED, "left band x={i}");
            assert_eq!(p.pixel(10, i), RED, "top band y={i}");
        }
        for i in 13..=15 {
            assert_eq!(p.pixel(i, 10), RED, "right band x={i}");
            assert_eq!(p.pixel(10, i), RED, "bottom band y={i}");
        }
        assert_eq!(p.pixel(3, 10), BLACK);
        assert_eq!(p.pixel(7, 10), BLACK);
        assert_eq!(p.pixel(16, 16), BLACK);
        assert_eq!(p.pixel(15, 15), RED);
        assert_eq!(p.pixel(10, 10), BLACK);
    }

    #[test]
    fn text_scales_glyphs() {
        let mut p = ColorPlane::new(30, 20);
        draw_text(&mut p, 1, 1, "1", 2, RED);
        // '1' top row is 0b00100: third column set, scaled 2x
        assert_eq!(p.pixel(5, 1), RED);
        assert_eq!(p.pixel(6, 2), RED);
        assert_eq!(p.pixel(1, 1), BLACK);
    }

    #[test]
    fn unknown_glyph_is_blank_but_advances() {
        let mut p = ColorPlane::new(20, 10);
        draw_text(&mut p, 0, 0, "#-", 1, RED);
        assert!((0..6).all(|x| p.pixel(x, 3) == BLACK));
        // '-' lands in the second cell, row 3
        assert_eq!(p.pixel(6, 3), RED);
        assert_eq!(p.pixel(10, 3), RED);
    }

    #[test]
    fn huge_shapes_are_clipped_not_walked() {
        let mut p = ColorPlane::new(20, 10);
        let start = std::time::Instant::now();
        fill_rect(&mut p, -1_000_000_000, -5, i32::MAX, i32::MAX, RED);
        stroke_rect(&mut p, i32::MIN, 2, i32::MAX, i32::MAX, 3, RED);
        draw_text(&mut p, i32::MAX - 3, 0, "99.99", 2, RED);
        assert!(start.elapsed() < std::time::Duration::from_secs(1));
        assert!(p.data.chunks_exact(3).all(|px| px == RED.0));
    }

    #[test]
    fn fill_ignores_negative_size() {
        let mut p = ColorPlane::new(4, 4);
        fill_rect(&mut p, 2, 2, -3, 5, RED);
        assert!(p.data.iter().all(|&b| b == 0));
    }

    #[test]
    fn blit_copies() {
        let src = ColorPlane::filled(2, 2, RED);
        let mut dst = ColorPlane::new(4, 4);
        blit(&mut dst, &src, 1, 1);
        assert_eq!(dst.pixel(1, 1), RED);
        assert_eq!(dst.pixel(2, 2), RED);
        assert_eq!(dst.pixel(3, 3), BLACK);
    }
}
