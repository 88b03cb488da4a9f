//! Overlay image composition
//!
//! Turns a colour plane plus scored match rectangles into the picture an
//! overlay window shows, and decides where on the primary display it goes.
//! Drawing order per annotation is fixed: outline, label box, score text.

use std::sync::Arc;
use std::time::Duration;

use crate::display::{OsFamily, PrimaryDisplay};
use crate::draw;
use crate::element::Element;
use crate::types::{Bgr, ColorPlane, FrameBuffer};

pub const HIGHLIGHT: Bgr = Bgr::new(0, 0, 255);
pub const LABEL_BACKGROUND: Bgr = Bgr::new(255, 255, 255);
pub const LABEL_FOREGROUND: Bgr = Bgr::new(0, 0, 0);
pub const BORDER_COLOR: Bgr = Bgr::new(0, 255, 0);
pub const TITLE_COLOR: Bgr = Bgr::new(0, 0, 0);

/// Outline corners sit this far outside the top-left...
pub const OUTLINE_OUTSET: i32 = 4;
/// ...and this far past the bottom-right.
pub const OUTLINE_TRAIL: i32 = 3;
pub const OUTLINE_THICKNESS: i32 = 3;

pub const LABEL_INSET: i32 = 5;
pub const LABEL_WIDTH: i32 = 70;
pub const LABEL_HEIGHT: i32 = 25;
/// Score text offset inside the label box.
pub const LABEL_PADDING: i32 = 5;
pub const LABEL_TEXT_SCALE: i32 = 2;

pub const BORDER_TOP: i32 = 22;
pub const BORDER_SIDE: i32 = 3;

/// A scored rectangle to highlight on the overlay.
#[derive(Debug, Clone)]
pub struct Annotation {
    pub bounds: Element,
    pub score: f64,
}

impl Annotation {
    pub fn new(bounds: Element, score: f64) -> Self {
        Self { bounds, score }
    }

    /// Use the element's own score, 0 when it has none.
    pub fn from_element(element: &Element) -> Self {
        Self::new(element.clone(), element.score().unwrap_or(0.0))
    }

    /// Confidence in percent, capped below 100.
    pub fn label(&self) -> String {
        format!("{:.2}", (self.score * 100.0).min(99.99))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
    Bounded(Duration),
    UntilStopped,
}

/// Everything needed to put one overlay on screen.
#[derive(Debug, Clone)]
pub struct OverlayWindow {
    content: Arc<ColorPlane>,
    annotations: Vec<Annotation>,
    position: (i32, i32),
    title: Option<String>,
    lifetime: Lifetime,
}

impl OverlayWindow {
    pub fn content(&self) -> &ColorPlane {
        &self.content
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Screen position of the window's top-left corner.
    pub fn position(&self) -> (i32, i32) {
        self.position
    }

    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    pub fn is_decorated(&self) -> bool {
        self.title.is_some()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Size of the composed image.
    pub fn size(&self) -> (usize, usize) {
        let (w, h) = (self.content.width, self.content.height);
        if self.is_decorated() {
            (w + 2 * BORDER_SIDE as usize, h + (BORDER_TOP + BORDER_SIDE) as usize)
        } else {
            (w, h)
        }
    }

    /// Draw the annotations on a copy of the content, then frame it if decorated.
    pub fn compose(&self) -> ColorPlane {
        let mut img = (*self.content).clone();
        for a in &self.annotations {
            draw_annotation(&mut img, a);
        }
        match &self.title {
            Some(title) => with_border(&img, title),
            None => img,
        }
    }

    pub fn frame_buffer(&self) -> FrameBuffer {
        self.compose().to_frame_buffer()
    }
}

fn draw_annotation(img: &mut ColorPlane, a: &Annotation) {
    let r = &a.bounds;
    let br = r.bottom_right();
    draw::stroke_rect(
        img,
        r.x.saturating_sub(OUTLINE_OUTSET), r.y.saturating_sub(OUTLINE_OUTSET),
        br.x.saturating_add(OUTLINE_TRAIL), br.y.saturating_add(OUTLINE_TRAIL),
        OUTLINE_THICKNESS,
        HIGHLIGHT,
    );
    let (lx, ly) = (r.x.saturating_add(LABEL_INSET), r.y.saturating_add(LABEL_INSET));
    draw::fill_rect(img, lx, ly, LABEL_WIDTH, LABEL_HEIGHT, LABEL_BACKGROUND);
    draw::draw_text(
        img,
        lx.saturating_add(LABEL_PADDING),
        ly.saturating_add(LABEL_PADDING),
        &a.label(),
        LABEL_TEXT_SCALE,
        LABEL_FOREGROUND,
    );
}

fn with_border(img: &ColorPlane, title: &str) -> ColorPlane {
    let mut framed = ColorPlane::filled(
        img.width + 2 * BORDER_SIDE as usize,
        img.height + (BORDER_TOP + BORDER_SIDE) as usize,
        BORDER_COLOR,
    );
    draw::blit(&mut framed, img, BORDER_SIDE, BORDER_TOP);
    let text_y = (BORDER_TOP - draw::GLYPH_H) / 2;
    draw::draw_text(&mut framed, BORDER_SIDE + 2, text_y, title, 1, TITLE_COLOR);
    framed
}

/// Builds overlay windows centred on the primary display.
#[derive(Clone)]
pub struct OverlayRenderer {
    display: Arc<dyn PrimaryDisplay>,
    os: OsFamily,
}

impl OverlayRenderer {
    pub fn new(display: Arc<dyn PrimaryDisplay>) -> Self {
        Self { display, os: OsFamily::current() }
    }

    pub fn with_os(mut self, os: OsFamily) -> Self {
        self.os = os;
        self
    }

    /// Top-left that centres a `w x h` image on the display.
    pub fn position_for(&self, w: usize, h: usize) -> (i32, i32) {
        let loc = self.display.center().offset(-(w as i32 / 2), -(h as i32 / 2));
        (loc.x, loc.y + self.os.vertical_offset())
    }

    /// Bounded windows get a titled border showing the element; windows that
    /// stay until stopped do not.
    pub fn render(
        &self,
        element: &Element,
        content: Arc<ColorPlane>,
        annotations: Vec<Annotation>,
        lifetime: Lifetime,
    ) -> OverlayWindow {
        let position = self.position_for(content.width, content.height);
        let title = match lifetime {
            Lifetime::Bounded(_) => Some(element.to_string()),
            Lifetime::UntilStopped => None,
        };
        tracing::trace!(
            width = content.width,
            height = content.height,
            annotations = annotations.len(),
            ?lifetime,
            "render overlay"
        );
        OverlayWindow { content, annotations, position, title, lifetime }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::FixedDisplay;
    use crate::element::Kind;

    const BLACK: Bgr = Bgr::new(0, 0, 0);

    fn renderer(os: OsFamily) -> OverlayRenderer {
        OverlayRenderer::new(Arc::new(FixedDisplay::new(1920, 1080))).with_os(os)
    }

    fn annotated(score: f64) -> OverlayWindow {
        let content = Arc::new(ColorPlane::new(200, 150));
        let target = Element::with_kind(Kind::Target, 50, 40, 60, 30);
        renderer(OsFamily::Linux).render(
            &Element::new(0, 0, 200, 150),
            content,
            vec![Annotation::new(target, score)],
            Lifetime::UntilStopped,
        )
    }

    #[test]
    fn centred_on_display() {
        assert_eq!(renderer(OsFamily::Linux).position_for(200, 150), (860, 465));
        assert_eq!(renderer(OsFamily::Windows).position_for(201, 151), (860, 465));
        assert_eq!(renderer(OsFamily::MacOs).position_for(200, 150), (860, 487));
    }

    #[test]
    fn score_label_is_capped() {
        let t = Element::point(0, 0);
        assert_eq!(Annotation::new(t.clone(), 0.5).label(), "50.00");
        assert_eq!(Annotation::new(t.clone(), 0.875).label(), "87.50");
        assert_eq!(Annotation::new(t.clone(), 1.0).label(), "99.99");
        assert_eq!(Annotation::new(t, 0.0).label(), "0.00");
    }

    #[test]
    fn annotation_from_scored_element() {
        let t = Element::with_kind(Kind::Target, 0, 0, 5, 5).with_score(0.42);
        assert_eq!(Annotation::from_element(&t).score, 0.42);
        assert_eq!(Annotation::from_element(&Element::new(0, 0, 5, 5)).score, 0.0);
    }

    #[test]
    fn outline_pixels() {
        let img = annotated(0.5).compose();
        // corners at (46,36) and (113,73), 3px stroke centred on them
        for x in 45..=47 {
            assert_eq!(img.pixel(x, 60), HIGHLIGHT, "left x={x}");
        }
        // the label box covers the right band down to y=69
        for x in 112..=114 {
            assert_eq!(img.pixel(x, 71), HIGHLIGHT, "right x={x}");
        }
        assert_eq!(img.pixel(113, 60), LABEL_BACKGROUND);
        assert_eq!(img.pixel(80, 36), HIGHLIGHT);
        assert_eq!(img.pixel(80, 73), HIGHLIGHT);
        assert_eq!(img.pixel(44, 60), BLACK);
        assert_eq!(img.pixel(48, 60), BLACK);
        assert_eq!(img.pixel(115, 71), BLACK);
    }

    #[test]
    fn label_box_and_text() {
        let img = annotated(0.5).compose();
        // box covers [55,125) x [45,70)
        assert_eq!(img.pixel(55, 45), LABEL_BACKGROUND);
        assert_eq!(img.pixel(124, 69), LABEL_BACKGROUND);
        assert_eq!(img.pixel(57, 47), LABEL_BACKGROUND);
        assert_eq!(img.pixel(125, 50), BLACK);
        assert_eq!(img.pixel(54, 50), BLACK);
        assert_eq!(img.pixel(80, 70), BLACK);
        // "50.00" starts at (60,50); '5' has a full top row
        assert_eq!(img.pixel(60, 50), LABEL_FOREGROUND);
        assert_eq!(img.pixel(69, 51), LABEL_FOREGROUND);
    }

    #[test]
    fn oversized_annotations_compose_quickly() {
        let content = Arc::new(ColorPlane::new(200, 150));
        let annotations = vec![
            Annotation::new(Element::new(0, 0, 200_000_000, 10), 0.5),
            Annotation::new(Element::new(2_000_000_000, 0, 200_000_000, 10), 0.5),
            Annotation::new(Element::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX), 0.5),
        ];
        let window = renderer(OsFamily::Linux).render(
            &Element::new(0, 0, 200, 150),
            content,
            annotations,
            Lifetime::Bounded(Duration::from_millis(10)),
        );
        let start = std::time::Instant::now();
        let img = window.compose();
        assert!(start.elapsed() < Duration::from_secs(1));
        // the first outline's bottom band (y 12..=14) spans the whole plane
        let (dx, dy) = (BORDER_SIDE as usize, BORDER_TOP as usize);
        assert_eq!(img.pixel(dx + 150, dy + 13), HIGHLIGHT);
        // the third one ends at (2,2) after saturating
        assert_eq!(img.pixel(dx + 2, dy + 2), HIGHLIGHT);
        assert_eq!(img.pixel(dx + 150, dy + 100), Bgr::new(0, 0, 0));
    }

    #[test]
    fn content_is_not_modified() {
        let window = annotated(0.9);
        let _ = window.compose();
        assert!(window.content().data.iter().all(|&b| b == 0));
    }

    #[test]
    fn until_stopped_has_no_border() {
        let window = annotated(0.5);
        assert!(!window.is_decorated());
        assert_eq!(window.size(), (200, 150));
        let img = window.compose();
        assert_eq!((img.width, img.height), (200, 150));
    }

    #[test]
    fn bounded_window_is_framed() {
        let content = Arc::new(ColorPlane::filled(40, 30, Bgr::new(9, 9, 9)));
        let element = Element::new(10, 20, 40, 30);
        let window = renderer(OsFamily::Linux).render(
            &element,
            content,
            Vec::new(),
            Lifetime::Bounded(Duration::from_millis(50)),
        );
        assert_eq!(window.title(), Some("[\"RECTANGLE\", [10, 20, 40, 30]]"));
        // position still follows the content size
        assert_eq!(window.position(), (940, 525));

        let img = window.compose();
        assert_eq!((img.width, img.height), (46, 55));
        assert_eq!(window.size(), (46, 55));
        assert_eq!(img.pixel(0, 0), BORDER_COLOR);
        assert_eq!(img.pixel(45, 54), BORDER_COLOR);
        assert_eq!(img.pixel(3, 22), Bgr::new(9, 9, 9));
        assert_eq!(img.pixel(42, 51), Bgr::new(9, 9, 9));
        assert_eq!(window.frame_buffer().pixels.len(), 46 * 55);
    }
}
