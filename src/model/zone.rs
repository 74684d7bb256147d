//! Zone-level types.

use super::lenient;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic type tag of a zone.
///
/// The well-known tags get their own variant; any other tag is kept verbatim
/// in [`ZoneType::Other`]. Serializes to and from the plain tag string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ZoneType {
    /// Running main text (the anchor type)
    MainZone,
    /// Marginal notes
    MarginTextZone,
    /// Decorated initials
    DropCapitalZone,
    /// Illustrations and other graphics
    GraphicZone,
    /// Lines not attached to a typed zone
    DefaultLine,
    /// Any other tag, including the literal "Other"
    Other(String),
}

impl ZoneType {
    /// Tag string as it appears in layout records.
    pub fn as_str(&self) -> &str {
        match self {
            ZoneType::MainZone => "MainZone",
            ZoneType::MarginTextZone => "MarginTextZone",
            ZoneType::DropCapitalZone => "DropCapitalZone",
            ZoneType::GraphicZone => "GraphicZone",
            ZoneType::DefaultLine => "DefaultLine",
            ZoneType::Other(tag) => tag,
        }
    }

    /// Check if this is the anchor type that marks a representative page.
    pub fn is_anchor(&self) -> bool {
        matches!(self, ZoneType::MainZone)
    }
}

impl Default for ZoneType {
    fn default() -> Self {
        ZoneType::Other("Other".to_string())
    }
}

impl From<&str> for ZoneType {
    fn from(tag: &str) -> Self {
        match tag {
            "MainZone" => ZoneType::MainZone,
            "MarginTextZone" => ZoneType::MarginTextZone,
            "DropCapitalZone" => ZoneType::DropCapitalZone,
            "GraphicZone" => ZoneType::GraphicZone,
            "DefaultLine" => ZoneType::DefaultLine,
            other => ZoneType::Other(other.to_string()),
        }
    }
}

impl From<String> for ZoneType {
    fn from(tag: String) -> Self {
        ZoneType::from(tag.as_str())
    }
}

impl From<ZoneType> for String {
    fn from(zone_type: ZoneType) -> Self {
        match zone_type {
            ZoneType::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ZoneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transcribed text line inside a zone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextLine {
    /// Free-form line content
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub content: Option<String>,
}

impl TextLine {
    /// Create a line with content.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
        }
    }

    /// Line content, empty when absent.
    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}

/// A rectangular region on a page image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    /// Top-left corner `[x, y]`
    #[serde(default = "origin", deserialize_with = "lenient::numbers")]
    pub xy: Vec<f64>,

    /// Size `[width, height]`
    #[serde(default = "origin", deserialize_with = "lenient::numbers")]
    pub wh: Vec<f64>,

    /// Semantic type tag
    #[serde(default, rename = "type", deserialize_with = "lenient::zone_type")]
    pub zone_type: ZoneType,

    /// Transcribed lines, if any
    #[serde(default, deserialize_with = "lenient::entries")]
    pub lines: Vec<TextLine>,
}

fn origin() -> Vec<f64> {
    vec![0.0, 0.0]
}

impl Zone {
    /// Create a zone from position, size and type.
    pub fn new(zone_type: impl Into<ZoneType>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            xy: vec![x, y],
            wh: vec![width, height],
            zone_type: zone_type.into(),
            lines: Vec::new(),
        }
    }

    /// Add a text line to the zone.
    pub fn with_line(mut self, content: impl Into<String>) -> Self {
        self.lines.push(TextLine::new(content));
        self
    }

    /// Geometry of the zone, if both pairs have two components and the size is positive.
    pub fn rect(&self) -> Option<ZoneRect> {
        match (self.xy.as_slice(), self.wh.as_slice()) {
            (&[x, y], &[w, h]) if w > 0.0 && h > 0.0 => Some(ZoneRect {
                x,
                y,
                width: w,
                height: h,
                zone_type: self.zone_type.clone(),
            }),
            _ => None,
        }
    }
}

/// Validated zone geometry in its page's coordinate space.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneRect {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Width (positive)
    pub width: f64,
    /// Height (positive)
    pub height: f64,
    /// Semantic type tag
    pub zone_type: ZoneType,
}

impl ZoneRect {
    /// Rescale the rectangle with independent x/y factors.
    pub fn scaled(&self, scale_x: f64, scale_y: f64) -> ZoneRect {
        ZoneRect {
            x: self.x * scale_x,
            y: self.y * scale_y,
            width: self.width * scale_x,
            height: self.height * scale_y,
            zone_type: self.zone_type.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_type_round_trip_tags() {
        assert_eq!(ZoneType::from("MainZone"), ZoneType::MainZone);
        assert_eq!(
            ZoneType::from("NumberingZone"),
            ZoneType::Other("NumberingZone".into())
        );
        assert_eq!(String::from(ZoneType::GraphicZone), "GraphicZone");
        assert_eq!(ZoneType::default().as_str(), "Other");
    }

    #[test]
    fn test_zone_deserialize_defaults() {
        let zone: Zone = serde_json::from_str("{}").unwrap();
        assert_eq!(zone.xy, vec![0.0, 0.0]);
        assert_eq!(zone.wh, vec![0.0, 0.0]);
        assert_eq!(zone.zone_type, ZoneType::Other("Other".into()));
        assert!(zone.rect().is_none());
    }

    #[test]
    fn test_zone_deserialize_type_and_lines() {
        let zone: Zone = serde_json::from_str(
            r#"{"xy": [10, 20], "wh": [30, 40], "type": "MarginTextZone",
                "lines": [{"content": "ave maria"}, {}]}"#,
        )
        .unwrap();
        assert_eq!(zone.zone_type, ZoneType::MarginTextZone);
        assert_eq!(zone.lines.len(), 2);
        assert_eq!(zone.lines[1].text(), "");
        let rect = zone.rect().unwrap();
        assert_eq!((rect.x, rect.y, rect.width, rect.height), (10.0, 20.0, 30.0, 40.0));
    }

    #[test]
    fn test_zone_rect_rejects_bad_geometry() {
        assert!(Zone::new("MainZone", 0.0, 0.0, 0.0, 10.0).rect().is_none());
        assert!(Zone::new("MainZone", 0.0, 0.0, 10.0, -1.0).rect().is_none());

        let mut zone = Zone::new("MainZone", 0.0, 0.0, 10.0, 10.0);
        zone.xy = vec![1.0];
        assert!(zone.rect().is_none());
    }

    #[test]
    fn test_zone_rect_scaled() {
        let rect = Zone::new("MainZone", 10.0, 20.0, 30.0, 40.0).rect().unwrap();
        let scaled = rect.scaled(2.0, 0.5);
        assert_eq!(scaled.x, 20.0);
        assert_eq!(scaled.y, 10.0);
        assert_eq!(scaled.width, 60.0);
        assert_eq!(scaled.height, 20.0);
    }

    #[test]
    fn test_zone_wrong_types_read_as_absent() {
        let zone: Zone = serde_json::from_str(
            r#"{"type": null, "xy": [1, "a"], "wh": "big", "lines": null}"#,
        )
        .unwrap();
        assert_eq!(zone.zone_type, ZoneType::default());
        assert!(zone.xy.is_empty());
        assert!(zone.wh.is_empty());
        assert!(zone.lines.is_empty());
        assert!(zone.rect().is_none());

        let zone: Zone = serde_json::from_str(
            r#"{"type": 3, "lines": [{"content": ["x"]}, 5, {"content": "amen"}]}"#,
        )
        .unwrap();
        assert_eq!(zone.zone_type, ZoneType::default());
        let texts: Vec<&str> = zone.lines.iter().map(TextLine::text).collect();
        assert_eq!(texts, vec!["", "amen"]);
    }
}
