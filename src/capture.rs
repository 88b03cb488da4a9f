//! Stands in for a screen grabber: reads a saved screenshot and hands it out
//! as a packed-RGB raw frame, the same shape a live capture backend delivers.

use std::path::Path;

use image::RgbImage;

use crate::bridge::{RawFrame, RawPixels};
use crate::error::Error;

pub struct ImageCapture {
    width: u32,
    height: u32,
    image: RgbImage,
}

impl ImageCapture {
    /// Load the snapshot once; nothing is shown yet.
    pub fn open(path: &Path) -> Result<Self, Error> {
        let image = image::open(path)
            .map_err(|source| Error::ImageIo { path: path.to_path_buf(), source })?
            .to_rgb8();
        let (width, height) = image.dimensions();
        tracing::debug!(path = ?path, width, height, "capture: snapshot loaded");
        Ok(Self { width, height, image })
    }

    /// Wrap an image that is already in memory.
    pub fn from_image(image: RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Self { width, height, image }
    }

    /// One frame as 0x00RRGGBB words.
    pub fn next_frame(&self) -> RawFrame {
        let mut out = Vec::with_capacity((self.width as usize) * (self.height as usize));
        for (_x, _y, pixel) in self.image.enumerate_pixels() {
            let r = pixel[0] as u32;
            let g = pixel[1] as u32;
            let b = pixel[2] as u32;
            out.push((r << 16) | (g << 8) | b);
        }
        RawFrame {
            width: self.width as usize,
            height: self.height as usize,
            pixels: RawPixels::PackedRgb(out),
        }
    }

    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
