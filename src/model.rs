//! Core data model for Doodle Map.
//! Serde shapes match the snapshots earlier builds wrote to localStorage
//! (camelCase marker fields, `"#rrggbb"` colors), so old saves restore.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub w: f64,
    pub h: f64,
}

impl Size {
    pub fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }
}

/// Marker color, serialized as a `"#rrggbb"` hex string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Default for Rgb {
    fn default() -> Self {
        // The red chip the app starts with.
        Self::new(0xe5, 0x39, 0x35)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug)]
pub struct ParseRgbError;

impl FromStr for Rgb {
    type Err = ParseRgbError;

    fn from_str(s: &str) -> Result<Self, ParseRgbError> {
        let hex = s.strip_prefix('#').ok_or(ParseRgbError)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(ParseRgbError);
        }
        let byte = |range| u8::from_str_radix(&hex[range], 16).map_err(|_| ParseRgbError);
        Ok(Self::new(byte(0..2)?, byte(2..4)?, byte(4..6)?))
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse()
            .map_err(|_| D::Error::custom("expected \"#rrggbb\""))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Day,
    Night,
}

impl Theme {
    pub fn css_class(self) -> &'static str {
        match self {
            Theme::Day => "day-theme",
            Theme::Night => "night-theme",
        }
    }
}

/// A placed annotation. Position is in map space, so it stays attached to the
/// same spot on the image under any pan/zoom.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub x_map: f64,
    pub y_map: f64,
    pub color: Rgb,
    /// Fixed at creation; keeps the procedural outline identical between
    /// frames while distinct markers still look hand-drawn.
    pub jitter_seed: f64,
}

/// Durable projection of the session, written through after every mutation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub theme: Theme,
    pub color: Rgb,
    pub scale: f64,
    pub translation: Vec2,
    pub markers: Vec<Marker>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            color: Rgb::default(),
            scale: 1.0,
            translation: Vec2::default(),
            markers: Vec::new(),
        }
    }
}

impl Snapshot {
    /// Field-tolerant restore: each missing or malformed field falls back to
    /// its default on its own instead of aborting the whole load, and
    /// malformed marker entries are dropped individually.
    pub fn merge_value(value: serde_json::Value) -> Self {
        let mut snap = Self::default();
        let serde_json::Value::Object(mut fields) = value else {
            return snap;
        };
        snap.theme = take_field(&mut fields, "theme", snap.theme);
        snap.color = take_field(&mut fields, "color", snap.color);
        snap.scale = take_field(&mut fields, "scale", snap.scale);
        snap.translation = take_field(&mut fields, "translation", snap.translation);
        if let Some(serde_json::Value::Array(items)) = fields.remove("markers") {
            snap.markers = items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect();
        }
        snap
    }
}

fn take_field<T: serde::de::DeserializeOwned>(
    fields: &mut serde_json::Map<String, serde_json::Value>,
    key: &str,
    fallback: T,
) -> T {
    fields
        .remove(key)
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or(fallback)
}
