//! Colour plane <-> compressed bytes, and image file names
//!
//! The public helpers never fail hard: problems are logged and the caller
//! gets an empty result. `try_*` variants expose the cause.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage};

use crate::error::Error;
use crate::types::ColorPlane;

pub const DEFAULT_EXTENSION: &str = "png";
pub const VALID_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "tiff", "bmp"];

fn to_rgb_image(plane: &ColorPlane) -> Result<RgbImage, Error> {
    plane.check_consistent()?;
    let too_large = || Error::FrameSize {
        expected: u32::MAX as usize,
        actual: plane.width.max(plane.height),
        unit: "pixels per side",
    };
    let w = u32::try_from(plane.width).map_err(|_| too_large())?;
    let h = u32::try_from(plane.height).map_err(|_| too_large())?;
    let mut rgb = plane.data.clone();
    for px in rgb.chunks_exact_mut(ColorPlane::CHANNELS) {
        px.swap(0, 2);
    }
    RgbImage::from_raw(w, h, rgb).ok_or_else(too_large)
}

fn from_rgb_image(image: RgbImage) -> ColorPlane {
    let (w, h) = image.dimensions();
    let mut data = image.into_raw();
    for px in data.chunks_exact_mut(ColorPlane::CHANNELS) {
        px.swap(0, 2);
    }
    ColorPlane { width: w as usize, height: h as usize, data }
}

fn image_format(name: &str) -> Result<ImageFormat, Error> {
    ImageFormat::from_extension(name).ok_or_else(|| Error::InvalidFilename(name.to_string()))
}

pub fn try_encode(plane: &ColorPlane, format: &str) -> Result<Vec<u8>, Error> {
    let fmt = image_format(format)?;
    let image = to_rgb_image(plane)?;
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, fmt)
        .map_err(|source| Error::ImageEncode { format: format.to_string(), source })?;
    Ok(out.into_inner())
}

/// Compress a plane; empty on failure.
pub fn encode(plane: &ColorPlane, format: &str) -> Vec<u8> {
    try_encode(plane, format).unwrap_or_else(|e| {
        tracing::error!(error = %e, width = plane.width, height = plane.height, "encode failed");
        Vec::new()
    })
}

pub fn encode_png(plane: &ColorPlane) -> Vec<u8> {
    encode(plane, DEFAULT_EXTENSION)
}

pub fn try_decode(bytes: &[u8]) -> Result<ColorPlane, Error> {
    let image = image::load_from_memory(bytes).map_err(Error::ImageDecode)?;
    Ok(from_rgb_image(image.to_rgb8()))
}

/// Decompress bytes; `None` (and a logged error) on malformed input.
pub fn decode(bytes: &[u8]) -> Option<ColorPlane> {
    match try_decode(bytes) {
        Ok(plane) => Some(plane),
        Err(e) => {
            tracing::error!(error = %e, len = bytes.len(), "decode failed");
            None
        }
    }
}

pub fn try_validate_filename(name: &str) -> Result<String, Error> {
    match name.rfind('.') {
        Some(dot) if dot > 0 => {
            let ext = name[dot + 1..].to_ascii_lowercase();
            if VALID_EXTENSIONS.contains(&ext.as_str()) {
                Ok(name.to_string())
            } else {
                Err(Error::InvalidFilename(name.to_string()))
            }
        }
        _ => Ok(format!("{name}.{DEFAULT_EXTENSION}")),
    }
}

/// `shot` -> `shot.png`, `shot.JPG` unchanged, `shot.xyz` -> `""`.
/// An empty result means the name is unusable.
pub fn validate_filename(name: &str) -> String {
    try_validate_filename(name).unwrap_or_else(|e| {
        tracing::error!(error = %e, "rejecting file name");
        String::new()
    })
}

/// Write a plane to disk, format taken from the (validated) file name.
pub fn save(plane: &ColorPlane, name: &str) -> Result<PathBuf, Error> {
    let name = try_validate_filename(name)?;
    let path = PathBuf::from(&name);
    let bytes = try_encode(plane, &name_extension(&name))?;
    std::fs::write(&path, bytes).map_err(|e| Error::ImageIo {
        path: path.clone(),
        source: image::ImageError::IoError(e),
    })?;
    tracing::debug!(path = ?path, "saved image");
    Ok(path)
}

fn name_extension(name: &str) -> String {
    name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase()).unwrap_or_default()
}

/// Read and decode an image file; `None` (and a logged error) on failure.
pub fn load(path: &Path) -> Option<ColorPlane> {
    match image::open(path) {
        Ok(image) => Some(from_rgb_image(image.to_rgb8())),
        Err(source) => {
            let e = Error::ImageIo { path: path.to_path_buf(), source };
            tracing::error!(error = %e, "load failed");
            None
        }
    }
}
