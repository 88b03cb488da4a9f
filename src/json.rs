//! Structured (JSON) form of an element
//!
//! `{"type": "RECTANGLE", "x": 1, "y": 2, "w": 30, "h": 40}` plus optional
//! `name` and `score`. Decoding fails on a missing coordinate or an
//! unknown type.

use serde::{Deserialize, Serialize};

use crate::element::{Element, Kind};
use crate::error::Error;

#[derive(Debug, Serialize, Deserialize)]
struct ElementRecord {
    #[serde(rename = "type")]
    kind: Kind,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    score: Option<f64>,
}

impl From<&Element> for ElementRecord {
    fn from(e: &Element) -> Self {
        Self {
            kind: e.kind(),
            x: e.x,
            y: e.y,
            w: e.w,
            h: e.h,
            name: Some(e.name().to_string()),
            score: e.score(),
        }
    }
}

impl From<ElementRecord> for Element {
    fn from(r: ElementRecord) -> Self {
        let mut elem = Element::with_kind(r.kind, r.x, r.y, r.w, r.h);
        if let Some(name) = r.name {
            elem.set_name(name);
        }
        if let Some(score) = r.score {
            elem.set_score(score);
        }
        elem
    }
}

impl Element {
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string(&ElementRecord::from(self)).map_err(Error::ElementJson)
    }

    pub fn to_json_value(&self) -> Result<serde_json::Value, Error> {
        serde_json::to_value(ElementRecord::from(self)).map_err(Error::ElementJson)
    }

    pub fn from_json(text: &str) -> Result<Element, Error> {
        let record: ElementRecord = serde_json::from_str(text).map_err(Error::ElementJson)?;
        Ok(record.into())
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Element, Error> {
        let record: ElementRecord = serde_json::from_value(value).map_err(Error::ElementJson)?;
        Ok(record.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_round_trip() {
        let mut t = Element::with_kind(Kind::Target, 4, 5, 60, 70).with_score(0.5);
        t.set_name("button");
        let back = Element::from_json(&t.to_json().unwrap()).unwrap();
        assert!(back.same_bounds(&t));
        assert_eq!(back.kind(), Kind::Target);
        assert_eq!(back.name(), "button");
        assert_eq!(back.score(), Some(0.5));
    }

    #[test]
    fn json_field_names() {
        let v = Element::new(1, 2, 3, 4).to_json_value().unwrap();
        assert_eq!(v["type"], "RECTANGLE");
        assert_eq!(v["x"], 1);
        assert_eq!(v["h"], 4);
        assert!(v.get("score").is_none());
    }

    #[test]
    fn json_minimal_object() {
        let e = Element::from_json_value(json!({"type": "WINDOW", "x": 0, "y": 0, "w": 9, "h": 9}))
            .unwrap();
        assert_eq!(e.kind(), Kind::Window);
        assert_eq!(e.name(), "WINDOW_0000_0000_0009x0009");
    }

    #[test]
    fn json_rejects_missing_coordinate() {
        for field in ["x", "y", "w", "h"] {
            let mut v = json!({"type": "RECTANGLE", "x": 1, "y": 2, "w": 3, "h": 4});
            v.as_object_mut().unwrap().remove(field);
            assert!(Element::from_json_value(v).is_err(), "missing {field}");
        }
    }

    #[test]
    fn json_rejects_unknown_type() {
        let v = json!({"type": "BLOB", "x": 1, "y": 2, "w": 3, "h": 4});
        assert!(matches!(Element::from_json_value(v), Err(Error::ElementJson(_))));
        let v = json!({"x": 1, "y": 2, "w": 3, "h": 4});
        assert!(Element::from_json_value(v).is_err());
    }

    #[test]
    fn json_rejects_non_numeric() {
        let v = json!({"type": "POINT", "x": "one", "y": 2, "w": 0, "h": 0});
        assert!(Element::from_json_value(v).is_err());
    }
}
