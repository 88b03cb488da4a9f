//! Geometry on elements: combine, test, derive points, move
//!
//! Points take part as zero-size rectangles at their coordinate. All
//! coordinate arithmetic saturates at the `i32` range.

use crate::config::Settings;
use crate::element::Element;

/// Bounds as (left, top, right, bottom) with negative sizes read as zero.
fn edges(e: &Element) -> (i32, i32, i32, i32) {
    (e.x, e.y, e.x.saturating_add(e.w.max(0)), e.y.saturating_add(e.h.max(0)))
}

impl Element {
    // ---- combine ----

    /// Smallest rectangle enclosing both bounding boxes.
    pub fn union(&self, other: &Element) -> Element {
        let (l1, t1, r1, b1) = edges(self);
        let (l2, t2, r2, b2) = edges(other);
        let (l, t) = (l1.min(l2), t1.min(t2));
        Element::new(l, t, r1.max(r2).saturating_sub(l), b1.max(b2).saturating_sub(t))
    }

    /// Overlap of both bounding boxes. Disjoint boxes give a 0 x 0 rectangle
    /// at the overlap origin.
    pub fn intersection(&self, other: &Element) -> Element {
        let (l1, t1, r1, b1) = edges(self);
        let (l2, t2, r2, b2) = edges(other);
        let (l, t) = (l1.max(l2), t1.max(t2));
        let (w, h) = (r1.min(r2).saturating_sub(l), b1.min(b2).saturating_sub(t));
        if w <= 0 || h <= 0 {
            return Element::new(l, t, 0, 0);
        }
        Element::new(l, t, w, h)
    }

    /// Edges count as inside. Only rectangles contain anything, and only
    /// rectangles or points can be contained.
    pub fn contains(&self, inner: &Element) -> bool {
        if !self.is_rectangle() {
            return false;
        }
        let (l, t, r, b) = edges(self);
        let inside = |x: i32, y: i32| x >= l && x <= r && y >= t && y <= b;
        if inner.is_rectangle() {
            let (il, it, ir, ib) = edges(inner);
            return inside(il, it) && inside(ir, it) && inside(il, ib) && inside(ir, ib);
        }
        if inner.is_point() {
            return inside(inner.x, inner.y);
        }
        false
    }

    // ---- derived points ----

    pub fn center(&self) -> Element {
        Element::point(self.x.saturating_add(self.w / 2), self.y.saturating_add(self.h / 2))
    }

    pub fn top_left(&self) -> Element {
        Element::point(self.x, self.y)
    }

    pub fn top_right(&self) -> Element {
        Element::point(self.x.saturating_add(self.w), self.y)
    }

    pub fn bottom_left(&self) -> Element {
        Element::point(self.x, self.y.saturating_add(self.h))
    }

    pub fn bottom_right(&self) -> Element {
        Element::point(self.x.saturating_add(self.w), self.y.saturating_add(self.h))
    }

    pub fn size(&self) -> (i32, i32) {
        (self.w, self.h)
    }

    pub fn pixel_size(&self) -> i64 {
        self.w as i64 * self.h as i64
    }

    /// New point at `center + (dx, dy)`.
    pub fn offset(&self, dx: i32, dy: i32) -> Element {
        let c = self.center();
        Element::point(c.x.saturating_add(dx), c.y.saturating_add(dy))
    }

    /// Middle of the left edge.
    pub fn left_at(&self) -> Element {
        if self.is_point() {
            return self.top_left();
        }
        Element::point(self.x, self.y.saturating_add(self.h / 2))
    }

    /// Middle of the right edge.
    pub fn right_at(&self) -> Element {
        if self.is_point() {
            return self.top_left();
        }
        Element::point(self.x.saturating_add(self.w), self.y.saturating_add(self.h / 2))
    }

    /// Middle of the top edge.
    pub fn above_at(&self) -> Element {
        if self.is_point() {
            return self.top_left();
        }
        Element::point(self.x.saturating_add(self.w / 2), self.y)
    }

    /// Middle of the bottom edge.
    pub fn below_at(&self) -> Element {
        if self.is_point() {
            return self.top_left();
        }
        Element::point(self.x.saturating_add(self.w / 2), self.y.saturating_add(self.h))
    }

    // Positive offsets always move further in the named direction.

    pub fn left(&self, off: i32) -> Element {
        let a = self.left_at();
        Element::point(a.x.saturating_sub(off), a.y)
    }

    pub fn right(&self, off: i32) -> Element {
        let a = self.right_at();
        Element::point(a.x.saturating_add(off), a.y)
    }

    pub fn above(&self, off: i32) -> Element {
        let a = self.above_at();
        Element::point(a.x, a.y.saturating_sub(off))
    }

    pub fn below(&self, off: i32) -> Element {
        let a = self.below_at();
        Element::point(a.x, a.y.saturating_add(off))
    }

    // ---- resize ----

    /// Expand by the default grow margin on every side.
    pub fn grow(&mut self) -> &mut Self {
        self.grow_by(DEFAULT_GROW_MARGIN)
    }

    /// Expand by the configured grow margin on every side.
    pub fn grow_with(&mut self, settings: &Settings) -> &mut Self {
        self.grow_by(settings.grow_margin)
    }

    pub fn grow_by(&mut self, margin: i32) -> &mut Self {
        let twice = margin.saturating_mul(2);
        self.x = self.x.saturating_sub(margin);
        self.y = self.y.saturating_sub(margin);
        self.w = self.w.saturating_add(twice);
        self.h = self.h.saturating_add(twice);
        self
    }

    pub fn shrink_by(&mut self, margin: i32) -> &mut Self {
        self.grow_by(margin.saturating_neg())
    }

    // ---- move ----

    /// Move by a delta. No-op unless the element is on screen.
    pub fn translate(&mut self, dx: i32, dy: i32) {
        if self.is_on_screen() {
            self.shift(dx, dy);
        }
    }

    /// Move to an absolute position, dragging the attached target by the
    /// same delta. No-op unless the element is on screen.
    pub fn at(&mut self, x: i32, y: i32) {
        if self.is_on_screen() {
            let (dx, dy) = (x.saturating_sub(self.x), y.saturating_sub(self.y));
            self.shift(dx, dy);
        }
    }
}

/// Margin applied by [`Element::grow`]. [`Element::grow_with`] uses
/// `Settings::grow_margin` instead, which defaults to the same value.
pub const DEFAULT_GROW_MARGIN: i32 = 20;
