//! Pixel containers shared by the bridge, the codec and the overlay renderer.

use crate::error::Error;

/// What a window actually shows: one u32 per pixel.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameBuffer {
    pub width: usize,      // window width in pixels
    pub height: usize,     // window height in pixels
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

/// One colour in plane byte order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bgr(pub [u8; 3]);

impl Bgr {
    pub const fn new(b: u8, g: u8, r: u8) -> Self {
        Self([b, g, r])
    }

    /// Pack as 0x00RRGGBB.
    #[inline]
    pub fn to_u32(self) -> u32 {
        let [b, g, r] = self.0;
        ((r as u32) << 16) | ((g as u32) << 8) | b as u32
    }
}

/// Three interleaved bytes per pixel, always blue, green, red.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ColorPlane {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>, // length = width * height * 3
}

impl ColorPlane {
    pub const CHANNELS: usize = 3;

    /// Black plane of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, data: vec![0; width * height * Self::CHANNELS] }
    }

    /// Plane filled with one colour.
    pub fn filled(width: usize, height: usize, color: Bgr) -> Self {
        let mut data = Vec::with_capacity(width * height * Self::CHANNELS);
        for _ in 0..width * height {
            data.extend_from_slice(&color.0);
        }
        Self { width, height, data }
    }

    /// Zero-size plane, the degraded result of a failed conversion.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Byte count the dimensions call for, `None` if it overflows.
    pub fn expected_len(&self) -> Option<usize> {
        self.width.checked_mul(self.height)?.checked_mul(Self::CHANNELS)
    }

    /// The fields are public; drawing needs `data` to match the dimensions.
    pub fn is_consistent(&self) -> bool {
        self.expected_len() == Some(self.data.len())
    }

    pub fn check_consistent(&self) -> Result<(), Error> {
        if self.is_consistent() {
            return Ok(());
        }
        Err(Error::FrameSize {
            expected: self.expected_len().unwrap_or(usize::MAX),
            actual: self.data.len(),
            unit: "bytes",
        })
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Bgr {
        let i = (y * self.width + x) * Self::CHANNELS;
        Bgr([self.data[i], self.data[i + 1], self.data[i + 2]])
    }

    /// Write one pixel; coordinates outside the plane are ignored.
    #[inline]
    pub fn put(&mut self, x: i32, y: i32, color: Bgr) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return;
        }
        let i = (y * self.width + x) * Self::CHANNELS;
        self.data[i..i + Self::CHANNELS].copy_from_slice(&color.0);
    }

    /// Repack for the window: 0x00RRGGBB per pixel.
    pub fn to_frame_buffer(&self) -> FrameBuffer {
        let pixels = self
            .data
            .chunks_exact(Self::CHANNELS)
            .map(|bgr| Bgr([bgr[0], bgr[1], bgr[2]]).to_u32())
            .collect();
        FrameBuffer { width: self.width, height: self.height, pixels }
    }
}

/// One transparency byte per pixel.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct AlphaPlane {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>, // length = width * height
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_ignores_out_of_bounds() {
        let mut plane = ColorPlane::new(2, 2);
        plane.put(-1, 0, Bgr::new(1, 2, 3));
        plane.put(2, 1, Bgr::new(1, 2, 3));
        assert!(plane.data.iter().all(|&b| b == 0));

        plane.put(1, 1, Bgr::new(1, 2, 3));
        assert_eq!(plane.pixel(1, 1), Bgr::new(1, 2, 3));
    }

    #[test]
    fn frame_buffer_packs_rgb() {
        let plane = ColorPlane::filled(1, 1, Bgr::new(0x33, 0x22, 0x11));
        assert_eq!(plane.to_frame_buffer().pixels, vec![0x00_11_22_33]);
    }

    #[test]
    fn consistency_follows_dimensions() {
        assert!(ColorPlane::new(10, 10).is_consistent());
        assert!(ColorPlane::empty().is_consistent());
        let short = ColorPlane { width: 10, height: 10, data: vec![0; 30] };
        assert!(!short.is_consistent());
        let huge = ColorPlane { width: usize::MAX, height: 2, data: Vec::new() };
        assert_eq!(huge.expected_len(), None);
        assert!(!huge.is_consistent());
        assert!(matches!(
            short.check_consistent(),
            Err(Error::FrameSize { expected: 300, actual: 30, .. })
        ));
    }

    #[test]
    fn empty_plane() {
        assert!(ColorPlane::empty().is_empty());
        assert!(!ColorPlane::new(1, 1).is_empty());
    }
}
