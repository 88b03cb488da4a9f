//! Turns a raw captured frame into a BGR colour plane plus an alpha plane.
//! Two layouts are understood; anything else degrades to an empty plane
//! and a logged error so an automation run can keep going.

use crate::error::Error;
use crate::types::{AlphaPlane, ColorPlane};

/// Pixel storage as delivered by the capture side.
#[derive(Clone, Debug)]
pub enum RawPixels {
    /// One word per pixel, 0x??RRGGBB. Read big-endian as `[unused, R, G, B]`.
    PackedRgb(Vec<u32>),
    /// Four bytes per pixel: `[A, B, G, R]`.
    Abgr(Vec<u8>),
    /// Three bytes per pixel, `[B, G, R]`. Not supported.
    Bgr(Vec<u8>),
    /// One byte per pixel. Not supported.
    Gray(Vec<u8>),
}

impl RawPixels {
    pub fn layout_name(&self) -> &'static str {
        match self {
            RawPixels::PackedRgb(_) => "INT_RGB",
            RawPixels::Abgr(_) => "4BYTE_ABGR",
            RawPixels::Bgr(_) => "3BYTE_BGR",
            RawPixels::Gray(_) => "BYTE_GRAY",
        }
    }
}

#[derive(Clone, Debug)]
pub struct RawFrame {
    pub width: usize,
    pub height: usize,
    pub pixels: RawPixels,
}

/// Result of splitting a frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Planes {
    pub color: ColorPlane,
    pub alpha: Option<AlphaPlane>,
}

/// Split a frame, or say why it cannot be split.
pub fn try_split(frame: &RawFrame) -> Result<Planes, Error> {
    let (w, h) = (frame.width, frame.height);
    let count = w * h;
    let mut color = Vec::with_capacity(count * ColorPlane::CHANNELS);
    let mut alpha = Vec::with_capacity(count);

    match &frame.pixels {
        RawPixels::PackedRgb(words) => {
            tracing::trace!(width = w, height = h, "split: INT_RGB");
            check_len(count, words.len(), "words")?;
            for word in words {
                // [unused, R, G, B] -> alpha = unused, colour = B, G, R
                let [a, r, g, b] = word.to_be_bytes();
                alpha.push(a);
                color.extend_from_slice(&[b, g, r]);
            }
        }
        RawPixels::Abgr(bytes) => {
            tracing::trace!(width = w, height = h, "split: 4BYTE_ABGR");
            check_len(count * 4, bytes.len(), "bytes")?;
            for px in bytes.chunks_exact(4) {
                // already B, G, R after the alpha byte
                alpha.push(px[0]);
                color.extend_from_slice(&px[1..4]);
            }
        }
        other => {
            return Err(Error::UnsupportedPixelFormat {
                layout: other.layout_name(),
                width: w,
                height: h,
            });
        }
    }

    Ok(Planes {
        color: ColorPlane { width: w, height: h, data: color },
        alpha: Some(AlphaPlane { width: w, height: h, data: alpha }),
    })
}

fn check_len(expected: usize, actual: usize, unit: &'static str) -> Result<(), Error> {
    if expected != actual {
        return Err(Error::FrameSize { expected, actual, unit });
    }
    Ok(())
}

/// Split a frame; on failure log and hand back empty planes.
pub fn split(frame: &RawFrame) -> Planes {
    try_split(frame).unwrap_or_else(|e| {
        tracing::error!(error = %e, "split: giving up on frame");
        Planes::default()
    })
}

/// Colour plane only; empty when the frame could not be converted.
pub fn to_color_plane(frame: &RawFrame) -> ColorPlane {
    split(frame).color
}
