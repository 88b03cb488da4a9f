//! Screen element model and highlight overlays
//!
//! Rectangles and points on screen, the algebra used to derive new regions
//! from them, and the machinery that turns a captured frame into an
//! annotated overlay window.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                    scheduler                        │
//! │     blocking / deferred show, vanish, stop()        │
//! ├─────────────────────────────────────────────────────┤
//! │                    surface                          │
//! │        UI thread owning every minifb window         │
//! ├─────────────────────────────────────────────────────┤
//! │               renderer  +  display                  │
//! │    outline, label, score text, titled border        │
//! ├─────────────────────────────────────────────────────┤
//! │          bridge  +  codec  +  capture  +  draw      │
//! │   raw frame -> BGR plane, PNG/JPEG/BMP, 5x7 font    │
//! ├─────────────────────────────────────────────────────┤
//! │            element  +  algebra  +  json             │
//! │         geometry, text and JSON forms               │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod algebra;
pub mod bridge;
pub mod capture;
pub mod codec;
pub mod config;
pub mod display;
pub mod draw;
pub mod element;
pub mod error;
mod json;
pub mod logging;
pub mod renderer;
pub mod scheduler;
pub mod surface;
pub mod types;

pub use bridge::{Planes, RawFrame, RawPixels};
pub use config::Settings;
pub use display::{FixedDisplay, OsFamily, PrimaryDisplay};
pub use element::{DisplayId, Element, Kind};
pub use error::Error;
pub use renderer::{Annotation, Lifetime, OverlayRenderer, OverlayWindow};
pub use scheduler::{OverlayScheduler, OverlayState, ShowTiming};
pub use surface::{MinifbBackend, SurfaceBackend, SurfaceId, UiThread};
pub use types::{AlphaPlane, Bgr, ColorPlane, FrameBuffer};
