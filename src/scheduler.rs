//! Timed and deferred overlay display
//!
//! One scheduler owns the UI thread and tracks at most one overlay handle.
//! Timers run on short-lived background threads; every window operation is
//! sent to the UI thread.
//!
//! ```text
//!   show(ms >= 0)  Idle -> Showing --(ms)--> Closed          caller blocks ms
//!   show(ms < 0)   Idle -> Pending --(show delay)--> Showing
//!                          --(vanish delay, if any)--> Closed  caller blocks |ms|
//!   stop()         Showing -> Closed
//! ```
//!
//! While another deferred show is still waiting, a closed overlay leaves
//! the scheduler in `Pending` rather than `Closed`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use crate::config::Settings;
use crate::element::Element;
use crate::error::Error;
use crate::renderer::{Annotation, Lifetime, OverlayRenderer};
use crate::surface::{SurfaceId, UiThread};
use crate::types::ColorPlane;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    Idle,
    Pending,
    Showing,
    Closed,
}

/// When an overlay appears and for how long the caller waits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowTiming {
    /// Show now, block the caller for the duration, then close.
    Blocking(Duration),
    /// Show on a background thread after `show_delay`; close after
    /// `vanish_delay` or on `stop()`. The caller only pauses `caller_pause`.
    Deferred {
        caller_pause: Duration,
        show_delay: Duration,
        vanish_delay: Option<Duration>,
    },
}

struct Tracked {
    state: OverlayState,
    handle: Option<SurfaceId>,
    /// Deferred shows whose window is not open yet.
    in_flight: usize,
}

impl Tracked {
    /// State once nothing tracked is showing.
    fn settled(&self) -> OverlayState {
        if self.in_flight > 0 { OverlayState::Pending } else { OverlayState::Closed }
    }
}

struct Inner {
    ui: UiThread,
    renderer: OverlayRenderer,
    show_delay: Duration,
    vanish_delay: Option<Duration>,
    tracked: Mutex<Tracked>,
}

impl Inner {
    fn tracked(&self) -> MutexGuard<'_, Tracked> {
        // the guarded data stays consistent even if a holder panicked
        self.tracked.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn track(&self, id: SurfaceId, deferred: bool) {
        let mut t = self.tracked();
        if deferred {
            t.in_flight = t.in_flight.saturating_sub(1);
        }
        if let Some(previous) = t.handle.replace(id) {
            tracing::warn!(previous = previous.0, id = id.0, "overlay handle overwritten, previous window stays open");
        }
        t.state = OverlayState::Showing;
        tracing::debug!(id = id.0, "overlay showing");
    }

    /// Dispose `id`; the tracked state only changes if `id` is still the
    /// tracked window.
    fn close_own(&self, id: SurfaceId) {
        self.ui.close(id);
        let mut t = self.tracked();
        if t.handle == Some(id) {
            t.handle = None;
            t.state = t.settled();
            tracing::debug!(id = id.0, state = ?t.state, "overlay closed");
        }
    }
}

#[derive(Clone)]
pub struct OverlayScheduler {
    inner: Arc<Inner>,
}

impl OverlayScheduler {
    pub fn new(ui: UiThread, renderer: OverlayRenderer, settings: &Settings) -> Self {
        Self {
            inner: Arc::new(Inner {
                ui,
                renderer,
                show_delay: settings.show_delay(),
                vanish_delay: settings.vanish_delay(),
                tracked: Mutex::new(Tracked { state: OverlayState::Idle, handle: None, in_flight: 0 }),
            }),
        }
    }

    pub fn state(&self) -> OverlayState {
        self.inner.tracked().state
    }

    /// The window currently tracked, if any.
    pub fn tracked(&self) -> Option<SurfaceId> {
        self.inner.tracked().handle
    }

    /// Timing for the integer duration API: `ms >= 0` blocks for `ms`,
    /// negative values defer using the configured delays and pause the
    /// caller for `|ms|`.
    pub fn timing(&self, ms: i64) -> ShowTiming {
        if ms >= 0 {
            ShowTiming::Blocking(Duration::from_millis(ms.unsigned_abs()))
        } else {
            ShowTiming::Deferred {
                caller_pause: Duration::from_millis(ms.unsigned_abs()),
                show_delay: self.inner.show_delay,
                vanish_delay: self.inner.vanish_delay,
            }
        }
    }

    /// Show `content` for `element` without annotations.
    /// Returns false when there was nothing to show.
    pub fn show(&self, element: &Element, content: Arc<ColorPlane>, ms: i64) -> Result<bool, Error> {
        self.show_with(element, content, Vec::new(), self.timing(ms))
    }

    /// Show `content` with scored rectangles; `element` must be valid.
    pub fn show_all(
        &self,
        element: &Element,
        content: Arc<ColorPlane>,
        annotations: Vec<Annotation>,
        ms: i64,
    ) -> Result<bool, Error> {
        if !element.is_valid() {
            tracing::warn!(%element, "not showing overlay for invalid element");
            return Ok(false);
        }
        self.show_with(element, content, annotations, self.timing(ms))
    }

    pub fn show_with(
        &self,
        element: &Element,
        content: Arc<ColorPlane>,
        annotations: Vec<Annotation>,
        timing: ShowTiming,
    ) -> Result<bool, Error> {
        if content.is_empty() {
            tracing::trace!(%element, "no content, nothing to show");
            return Ok(false);
        }
        if let Err(e) = content.check_consistent() {
            tracing::error!(%element, error = %e, "malformed content, nothing to show");
            return Ok(false);
        }
        match timing {
            ShowTiming::Blocking(duration) => {
                self.show_blocking(element, content, annotations, duration)?;
            }
            ShowTiming::Deferred { caller_pause, show_delay, vanish_delay } => {
                self.show_deferred(element, content, annotations, show_delay, vanish_delay)?;
                thread::sleep(caller_pause);
            }
        }
        Ok(true)
    }

    fn show_blocking(
        &self,
        element: &Element,
        content: Arc<ColorPlane>,
        annotations: Vec<Annotation>,
        duration: Duration,
    ) -> Result<(), Error> {
        let window = self
            .inner
            .renderer
            .render(element, content, annotations, Lifetime::Bounded(duration));
        let id = self.inner.ui.open(window)?;
        self.inner.track(id, false);
        thread::sleep(duration);
        self.inner.close_own(id);
        Ok(())
    }

    fn show_deferred(
        &self,
        element: &Element,
        content: Arc<ColorPlane>,
        annotations: Vec<Annotation>,
        show_delay: Duration,
        vanish_delay: Option<Duration>,
    ) -> Result<(), Error> {
        {
            let mut t = self.inner.tracked();
            t.in_flight += 1;
            if t.state != OverlayState::Showing {
                t.state = OverlayState::Pending;
                tracing::debug!(delay = ?show_delay, "overlay pending");
            }
        }

        let inner = Arc::clone(&self.inner);
        let element = element.clone();
        let spawned = thread::Builder::new()
            .name("overlay-timer".into())
            .spawn(move || {
                thread::sleep(show_delay);
                let window = inner
                    .renderer
                    .render(&element, content, annotations, Lifetime::UntilStopped);
                let id = match inner.ui.open(window) {
                    Ok(id) => id,
                    Err(e) => {
                        tracing::error!(error = %e, "deferred overlay failed to open");
                        let mut t = inner.tracked();
                        t.in_flight = t.in_flight.saturating_sub(1);
                        if t.state == OverlayState::Pending {
                            t.state = t.settled();
                        }
                        return;
                    }
                };
                inner.track(id, true);
                // the vanish timer starts only once the window is up
                if let Some(vanish) = vanish_delay {
                    thread::sleep(vanish);
                    inner.close_own(id);
                }
            });
        if let Err(e) = spawned {
            let mut t = self.inner.tracked();
            t.in_flight = t.in_flight.saturating_sub(1);
            if t.state == OverlayState::Pending {
                t.state = t.settled();
            }
            return Err(Error::WindowInit(format!("spawn overlay timer: {e}")));
        }
        Ok(())
    }

    /// Close the tracked window. Does nothing unless an overlay is showing.
    pub fn stop(&self) {
        let id = {
            let mut t = self.inner.tracked();
            if t.state != OverlayState::Showing {
                return;
            }
            t.state = t.settled();
            t.handle.take()
        };
        if let Some(id) = id {
            self.inner.ui.close(id);
            tracing::debug!(id = id.0, "overlay stopped");
        }
    }
}
