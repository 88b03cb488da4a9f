//! On-screen entities: points, rectangles and their scored/variant flavours
//!
//! An [`Element`] is a plain value. The geometric operations live in
//! `algebra.rs`, the JSON form in `json.rs`.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::error::Error;

/// Closed set of element variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Kind {
    Point,
    Rectangle,
    Picture,
    Target,
    Window,
    Screen,
    Pattern,
}

impl Kind {
    pub const ALL: [Kind; 7] = [
        Kind::Point,
        Kind::Rectangle,
        Kind::Picture,
        Kind::Target,
        Kind::Window,
        Kind::Screen,
        Kind::Pattern,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Point => "POINT",
            Kind::Rectangle => "RECTANGLE",
            Kind::Picture => "PICTURE",
            Kind::Target => "TARGET",
            Kind::Window => "WINDOW",
            Kind::Screen => "SCREEN",
            Kind::Pattern => "PATTERN",
        }
    }

    pub fn from_name(name: &str) -> Option<Kind> {
        Kind::ALL.into_iter().find(|k| k.as_str() == name)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies the display surface an element lives on. Does not own it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayId(pub u32);

#[derive(Debug, Clone)]
pub struct Element {
    pub x: i32,
    pub y: i32,
    /// -1 until initialised
    pub w: i32,
    pub h: i32,
    kind: Kind,
    name: String,
    score: Option<f64>,
    display: Option<DisplayId>,
    target: Option<Box<Element>>,
    wait_for_this: Option<f64>,
    wait_for_match: Option<f64>,
    last_wait_for_this: f64,
    last_wait_for_match: f64,
}

impl Default for Element {
    /// The unset element: origin, size -1 x -1.
    fn default() -> Self {
        let mut elem = Self {
            x: 0,
            y: 0,
            w: -1,
            h: -1,
            kind: Kind::Rectangle,
            name: String::new(),
            score: None,
            display: None,
            target: None,
            wait_for_this: None,
            wait_for_match: None,
            last_wait_for_this: 0.0,
            last_wait_for_match: 0.0,
        };
        elem.name = elem.default_name();
        elem
    }
}

impl Element {
    /// A rectangle; point-sized input keeps the Rectangle kind but clamps
    /// negative sizes to zero.
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self::with_kind(Kind::Rectangle, x, y, w, h)
    }

    pub fn point(x: i32, y: i32) -> Self {
        Self::with_kind(Kind::Point, x, y, 0, 0)
    }

    pub fn with_kind(kind: Kind, x: i32, y: i32, w: i32, h: i32) -> Self {
        let mut elem = Self { kind, x, y, w, h, ..Self::default() };
        if elem.is_point() {
            elem.w = w.max(0);
            elem.h = h.max(0);
        }
        elem.name = elem.default_name();
        elem
    }

    /// Build from up to four coordinates `[x, y, w, h]`; missing entries are 0.
    /// An empty slice gives the unset element.
    pub fn from_slice(rect: &[i32]) -> Self {
        if rect.is_empty() {
            return Self::default();
        }
        let at = |i: usize| rect.get(i).copied().unwrap_or(0);
        Self::new(at(0), at(1), at(2), at(3))
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score.clamp(0.0, 1.0));
        self
    }

    pub fn with_display(mut self, display: DisplayId) -> Self {
        self.display = Some(display);
        self
    }

    fn default_name(&self) -> String {
        format!(
            "{}_{:04}_{:04}_{:04}x{:04}",
            self.kind, self.x, self.y, self.w, self.h
        )
    }

    // ---- variants ----

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn is_point(&self) -> bool {
        self.w < 2 && self.h < 2
    }

    /// Usable as a search region or content holder.
    pub fn is_valid(&self) -> bool {
        self.w > 1 && self.h > 1
    }

    pub fn is_rectangle(&self) -> bool {
        match self.kind {
            Kind::Rectangle => !self.is_point(),
            Kind::Window => true,
            _ => false,
        }
    }

    /// Only these may be moved by `translate`/`at`.
    pub fn is_on_screen(&self) -> bool {
        matches!(self.kind, Kind::Rectangle | Kind::Picture | Kind::Window)
    }

    pub fn is_target(&self) -> bool {
        matches!(self.kind, Kind::Target | Kind::Picture)
    }

    /// Bound to a live display surface.
    pub fn is_special(&self) -> bool {
        self.display.is_some()
    }

    pub fn display(&self) -> Option<DisplayId> {
        self.display
    }

    // ---- info ----

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn score(&self) -> Option<f64> {
        self.score
    }

    pub fn set_score(&mut self, score: f64) {
        self.score = Some(score.clamp(0.0, 1.0));
    }

    /// Compares the full bounds, unlike `==` which only looks at the origin.
    pub fn same_bounds(&self, other: &Element) -> bool {
        (self.x, self.y, self.w, self.h) == (other.x, other.y, other.w, other.h)
    }

    // ---- attached target ----

    pub fn target(&self) -> Option<&Element> {
        self.target.as_deref()
    }

    pub fn attach_target(&mut self, target: Element) {
        self.target = Some(Box::new(target));
    }

    pub fn detach_target(&mut self) -> Option<Element> {
        self.target.take().map(|t| *t)
    }

    /// Move this element and its attached target by a delta, ignoring the
    /// on-screen restriction.
    pub(crate) fn shift(&mut self, dx: i32, dy: i32) {
        self.x = self.x.saturating_add(dx);
        self.y = self.y.saturating_add(dy);
        if let Some(target) = self.target.as_mut() {
            target.shift(dx, dy);
        }
    }

    // ---- waiting times ----

    pub fn wait_for_this(&self, settings: &Settings) -> f64 {
        self.wait_for_this.unwrap_or(settings.auto_wait_timeout)
    }

    pub fn set_wait_for_this(&mut self, secs: f64) {
        self.wait_for_this = Some(secs);
    }

    pub fn wait_for_match(&self, settings: &Settings) -> f64 {
        self.wait_for_match.unwrap_or(settings.auto_wait_timeout)
    }

    pub fn set_wait_for_match(&mut self, secs: f64) {
        self.wait_for_match = Some(secs);
    }

    pub fn last_wait_for_this(&self) -> f64 {
        self.last_wait_for_this
    }

    pub fn set_last_wait_for_this(&mut self, secs: f64) {
        self.last_wait_for_this = secs;
    }

    pub fn last_wait_for_match(&self) -> f64 {
        self.last_wait_for_match
    }

    pub fn set_last_wait_for_match(&mut self, secs: f64) {
        self.last_wait_for_match = secs;
    }
}

// Equality and order only look at the origin.
impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl Eq for Element {}

impl Hash for Element {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x.hash(state);
        self.y.hash(state);
    }
}

impl Ord for Element {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.x, self.y).cmp(&(other.x, other.y))
    }
}

impl PartialOrd for Element {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// `["KIND", [x, y]]` for points, `["KIND", [x, y, w, h]]` otherwise, with
/// `, score` appended for scored targets.
impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_point() {
            return write!(f, "[\"{}\", [{}, {}]]", self.kind, self.x, self.y);
        }
        write!(
            f,
            "[\"{}\", [{}, {}, {}, {}]",
            self.kind, self.x, self.y, self.w, self.h
        )?;
        if let (true, Some(score)) = (self.is_target(), self.score) {
            write!(f, ", {score}")?;
        }
        f.write_str("]")
    }
}

impl FromStr for Element {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let fail = |reason| Error::ElementText { text: text.to_string(), reason };

        let inner = text
            .trim()
            .strip_prefix("[\"")
            .and_then(|s| s.strip_suffix(']'))
            .ok_or_else(|| fail("not a bracketed element"))?;
        let (kind_name, rest) = inner
            .split_once("\", [")
            .ok_or_else(|| fail("missing coordinate list"))?;
        let kind = Kind::from_name(kind_name).ok_or_else(|| fail("unknown kind"))?;
        let (coords, extra) = rest
            .split_once(']')
            .ok_or_else(|| fail("unterminated coordinate list"))?;

        let nums = coords
            .split(',')
            .map(|n| n.trim().parse::<i32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| fail("bad coordinate"))?;

        let mut elem = match nums.as_slice() {
            [x, y] => Element::with_kind(kind, *x, *y, 0, 0),
            [x, y, w, h] => Element::with_kind(kind, *x, *y, *w, *h),
            _ => return Err(fail("expected 2 or 4 coordinates")),
        };

        if !extra.is_empty() {
            let score = extra
                .strip_prefix(", ")
                .and_then(|s| s.parse::<f64>().ok())
                .ok_or_else(|| fail("bad score"))?;
            elem.set_score(score);
        }
        Ok(elem)
    }
}
