//! Primary display abstraction
//!
//! minifb cannot query monitor geometry, so the size comes from settings.

use crate::config::{MACOS_TITLE_BAR_OFFSET, Settings};
use crate::element::{DisplayId, Element, Kind};

/// The screen overlays are centred on.
pub trait PrimaryDisplay: Send + Sync {
    /// Screen bounds as a `Screen` element bound to this display.
    fn bounds(&self) -> Element;

    fn center(&self) -> Element {
        self.bounds().center()
    }
}

/// A display of known, fixed size at the origin.
#[derive(Debug, Clone)]
pub struct FixedDisplay {
    pub id: DisplayId,
    pub width: u32,
    pub height: u32,
}

impl FixedDisplay {
    pub fn new(width: u32, height: u32) -> Self {
        Self { id: DisplayId(0), width, height }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.display_width, settings.display_height)
    }
}

impl PrimaryDisplay for FixedDisplay {
    fn bounds(&self) -> Element {
        Element::with_kind(Kind::Screen, 0, 0, self.width as i32, self.height as i32)
            .with_display(self.id)
    }
}

/// Operating system family, for placement quirks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    MacOs,
    Windows,
    Linux,
    Other,
}

impl OsFamily {
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            OsFamily::MacOs
        } else if cfg!(target_os = "windows") {
            OsFamily::Windows
        } else if cfg!(target_os = "linux") {
            OsFamily::Linux
        } else {
            OsFamily::Other
        }
    }

    /// Extra downward shift for top-level windows.
    pub fn vertical_offset(self) -> i32 {
        match self {
            OsFamily::MacOs => MACOS_TITLE_BAR_OFFSET,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_of_fixed_display() {
        let d = FixedDisplay::new(1920, 1080);
        let c = d.center();
        assert_eq!((c.x, c.y), (960, 540));
        assert!(d.bounds().is_special());
        assert_eq!(d.bounds().kind(), Kind::Screen);
    }

    #[test]
    fn only_macos_is_offset() {
        assert_eq!(OsFamily::MacOs.vertical_offset(), 22);
        assert_eq!(OsFamily::Windows.vertical_offset(), 0);
        assert_eq!(OsFamily::Linux.vertical_offset(), 0);
    }
}
