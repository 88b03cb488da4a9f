//! Window backends and the thread that owns them
//!
//! # Threading model
//!
//! Native windows must be created, updated and destroyed on the thread that
//! owns them. All overlay windows therefore live on one dedicated UI thread;
//! other threads only send it commands. The backend itself is built inside
//! that thread through a factory, so it never has to be `Send`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use minifb::{Window, WindowOptions};

use crate::error::Error;
use crate::renderer::OverlayWindow;
use crate::types::FrameBuffer;

/// How often open windows are serviced when no command arrives.
pub const PUMP_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u64);

/// Something that can put overlay windows on screen.
pub trait SurfaceBackend {
    fn open(&mut self, id: SurfaceId, window: &OverlayWindow) -> Result<(), Error>;

    /// Dispose a window. Returns false when it was not open.
    fn close(&mut self, id: SurfaceId) -> bool;

    /// Keep open windows responsive.
    fn pump(&mut self);
}

/// Borderless, always-on-top minifb windows.
#[derive(Default)]
pub struct MinifbBackend {
    windows: HashMap<SurfaceId, (Window, FrameBuffer)>,
}

impl MinifbBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SurfaceBackend for MinifbBackend {
    fn open(&mut self, id: SurfaceId, overlay: &OverlayWindow) -> Result<(), Error> {
        let fb = overlay.frame_buffer();
        let options = WindowOptions {
            borderless: true,
            title: false,
            resize: false,
            topmost: true,
            ..WindowOptions::default()
        };
        let title = overlay.title().unwrap_or("overlay");
        let mut window = Window::new(title, fb.width, fb.height, options)
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        let (x, y) = overlay.position();
        window.set_position(x as isize, y as isize);
        window
            .update_with_buffer(&fb.pixels, fb.width, fb.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        self.windows.insert(id, (window, fb));
        Ok(())
    }

    fn close(&mut self, id: SurfaceId) -> bool {
        // dropping the minifb window destroys it
        self.windows.remove(&id).is_some()
    }

    fn pump(&mut self) {
        self.windows.retain(|id, (window, fb)| {
            if !window.is_open() {
                tracing::debug!(id = id.0, "overlay window closed by user");
                return false;
            }
            if let Err(e) = window.update_with_buffer(&fb.pixels, fb.width, fb.height) {
                tracing::error!(id = id.0, error = %e, "overlay window update failed");
            }
            true
        });
    }
}

enum UiCommand {
    Open {
        id: SurfaceId,
        window: Box<OverlayWindow>,
        reply: Sender<Result<(), Error>>,
    },
    Close(SurfaceId),
    Shutdown,
}

/// Handle to the thread owning every overlay window.
pub struct UiThread {
    tx: Sender<UiCommand>,
    handle: Option<JoinHandle<()>>,
    next_id: AtomicU64,
}

impl UiThread {
    /// Start the UI thread; `create_backend` runs on it.
    pub fn spawn<B, F>(create_backend: F) -> Result<Self, Error>
    where
        B: SurfaceBackend,
        F: FnOnce() -> Result<B, Error> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<UiCommand>();
        let (confirm_tx, confirm_rx) = mpsc::channel::<Result<(), Error>>();

        let handle = thread::Builder::new()
            .name("overlay-ui".into())
            .spawn(move || {
                let mut backend = match create_backend() {
                    Ok(b) => {
                        let _ = confirm_tx.send(Ok(()));
                        b
                    }
                    Err(e) => {
                        let _ = confirm_tx.send(Err(e));
                        return;
                    }
                };

                loop {
                    match rx.recv_timeout(PUMP_INTERVAL) {
                        Ok(UiCommand::Open { id, window, reply }) => {
                            let result = backend.open(id, &window);
                            if result.is_ok() {
                                tracing::debug!(id = id.0, "overlay window opened");
                            }
                            let _ = reply.send(result);
                        }
                        Ok(UiCommand::Close(id)) => {
                            if backend.close(id) {
                                tracing::debug!(id = id.0, "overlay window disposed");
                            }
                        }
                        Ok(UiCommand::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
                        Err(RecvTimeoutError::Timeout) => {}
                    }
                    backend.pump();
                }
            })
            .map_err(|e| Error::WindowInit(format!("spawn UI thread: {e}")))?;

        confirm_rx.recv().map_err(|_| Error::UiThreadGone)??;

        Ok(Self { tx, handle: Some(handle), next_id: AtomicU64::new(1) })
    }

    pub fn spawn_minifb() -> Result<Self, Error> {
        Self::spawn(|| Ok(MinifbBackend::new()))
    }

    /// Put a window on screen; returns once it exists (or failed).
    pub fn open(&self, window: OverlayWindow) -> Result<SurfaceId, Error> {
        // a malformed plane would panic while composing on the UI thread
        window.content().check_consistent()?;
        let id = SurfaceId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (reply, result) = mpsc::channel();
        self.tx
            .send(UiCommand::Open { id, window: Box::new(window), reply })
            .map_err(|_| Error::UiThreadGone)?;
        result.recv().map_err(|_| Error::UiThreadGone)??;
        Ok(id)
    }

    /// Ask for a window to be disposed. Unknown ids are ignored.
    pub fn close(&self, id: SurfaceId) {
        if self.tx.send(UiCommand::Close(id)).is_err() {
            tracing::warn!(id = id.0, "UI thread gone, cannot close overlay");
        }
    }
}

impl Drop for UiThread {
    fn drop(&mut self) {
        let _ = self.tx.send(UiCommand::Shutdown);
        if let Some(handle) = self.handle.take() {
            if handle.thread().id() != thread::current().id() {
                let _ = handle.join();
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-process backend that records what would have been shown.

    use super::*;
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};
    use std::thread::ThreadId;
    use std::time::Instant;

    #[derive(Debug, Clone)]
    pub enum Event {
        Opened { id: SurfaceId, at: Instant, decorated: bool, thread: ThreadId },
        Closed { id: SurfaceId, at: Instant, thread: ThreadId },
    }

    #[derive(Clone, Default)]
    pub struct EventLog(Arc<Mutex<Vec<Event>>>);

    impl EventLog {
        pub fn events(&self) -> Vec<Event> {
            self.0.lock().unwrap().clone()
        }

        pub fn opened(&self) -> Vec<(SurfaceId, Instant, bool)> {
            self.events()
                .into_iter()
                .filter_map(|e| match e {
                    Event::Opened { id, at, decorated, .. } => Some((id, at, decorated)),
                    _ => None,
                })
                .collect()
        }

        pub fn closed(&self) -> Vec<(SurfaceId, Instant)> {
            self.events()
                .into_iter()
                .filter_map(|e| match e {
                    Event::Closed { id, at, .. } => Some((id, at)),
                    _ => None,
                })
                .collect()
        }

        /// Poll until `cond` holds or two seconds pass.
        pub fn wait_for(&self, cond: impl Fn(&EventLog) -> bool) -> bool {
            let deadline = Instant::now() + Duration::from_secs(2);
            while Instant::now() < deadline {
                if cond(self) {
                    return true;
                }
                thread::sleep(Duration::from_millis(2));
            }
            cond(self)
        }
    }

    pub struct RecordingBackend {
        log: EventLog,
        open: HashSet<SurfaceId>,
    }

    impl RecordingBackend {
        pub fn new(log: EventLog) -> Self {
            Self { log, open: HashSet::new() }
        }
    }

    impl SurfaceBackend for RecordingBackend {
        fn open(&mut self, id: SurfaceId, window: &OverlayWindow) -> Result<(), Error> {
            self.open.insert(id);
            self.log.0.lock().unwrap().push(Event::Opened {
                id,
                at: Instant::now(),
                decorated: window.is_decorated(),
                thread: thread::current().id(),
            });
            Ok(())
        }

        fn close(&mut self, id: SurfaceId) -> bool {
            if !self.open.remove(&id) {
                return false;
            }
            self.log.0.lock().unwrap().push(Event::Closed {
                id,
                at: Instant::now(),
                thread: thread::current().id(),
            });
            true
        }

        fn pump(&mut self) {}
    }

    pub fn recording_ui() -> (UiThread, EventLog) {
        let log = EventLog::default();
        let backend_log = log.clone();
        let ui = UiThread::spawn(move || Ok(RecordingBackend::new(backend_log)))
            .expect("recording backend never fails");
        (ui, log)
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::display::FixedDisplay;
    use crate::element::Element;
    use crate::renderer::{Lifetime, OverlayRenderer};
    use crate::types::ColorPlane;
    use std::sync::Arc;

    fn window() -> OverlayWindow {
        OverlayRenderer::new(Arc::new(FixedDisplay::new(800, 600))).render(
            &Element::new(0, 0, 10, 10),
            Arc::new(ColorPlane::new(10, 10)),
            Vec::new(),
            Lifetime::UntilStopped,
        )
    }

    #[test]
    fn windows_live_on_the_ui_thread() {
        let (ui, log) = recording_ui();
        let id = ui.open(window()).unwrap();
        ui.close(id);
        assert!(log.wait_for(|l| l.closed().len() == 1));

        let threads: Vec<_> = log
            .events()
            .into_iter()
            .map(|e| match e {
                Event::Opened { thread, .. } | Event::Closed { thread, .. } => thread,
            })
            .collect();
        assert_eq!(threads.len(), 2);
        assert_eq!(threads[0], threads[1]);
        assert_ne!(threads[0], thread::current().id());
    }

    #[test]
    fn close_is_idempotent() {
        let (ui, log) = recording_ui();
        let id = ui.open(window()).unwrap();
        ui.close(id);
        ui.close(id);
        ui.close(SurfaceId(999));
        // a later open proves the closes were processed
        let next = ui.open(window()).unwrap();
        assert_ne!(next, id);
        assert_eq!(log.closed().len(), 1);
    }

    #[test]
    fn malformed_content_never_reaches_the_ui_thread() {
        let (ui, log) = recording_ui();
        let bad = ColorPlane { width: 10, height: 10, data: vec![0; 30] };
        let malformed = OverlayRenderer::new(Arc::new(FixedDisplay::new(800, 600))).render(
            &Element::new(0, 0, 10, 10),
            Arc::new(bad),
            Vec::new(),
            Lifetime::Bounded(Duration::from_millis(10)),
        );
        assert!(matches!(ui.open(malformed), Err(Error::FrameSize { .. })));
        assert!(log.events().is_empty());
        // the UI thread is still serving
        assert!(ui.open(window()).is_ok());
    }

    #[test]
    fn failing_backend_reports_error() {
        let result = UiThread::spawn(|| -> Result<RecordingBackend, Error> {
            Err(Error::WindowInit("no display".into()))
        });
        assert!(matches!(result, Err(Error::WindowInit(_))));
    }
}
