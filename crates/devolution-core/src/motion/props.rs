//! L4 Atomic Layer: Animatable properties and their values

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::timing::lerp;

/// A visual property that a tween can drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Property {
    Opacity,
    /// Horizontal offset in layout pixels
    TranslateX,
    /// Vertical offset in layout pixels
    TranslateY,
    Scale,
    /// Tilt around the horizontal axis, degrees
    RotateX,
    /// Depth rotation around the vertical axis, degrees
    RotateY,
    /// In-plane rotation, degrees
    Rotation,
    /// Fraction of the element revealed by a left-to-right clip wipe
    ClipReveal,
    /// Explicit pixel height
    Height,
    Color,
}

impl Property {
    pub fn is_color(self) -> bool {
        matches!(self, Property::Color)
    }
}

/// 24-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse "#RRGGBB", "RRGGBB", "#RGB" or "RGB"
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
                let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
                let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
                Some(Self::new(r, g, b))
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Self::new(r, g, b))
            }
            _ => None,
        }
    }

    /// Per-channel interpolation
    pub fn mix(self, other: Rgb, t: f64) -> Rgb {
        let channel = |a: u8, b: u8| lerp(a as f64, b as f64, t).round().clamp(0.0, 255.0) as u8;
        Rgb::new(
            channel(self.r, other.r),
            channel(self.g, other.g),
            channel(self.b, other.b),
        )
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rgb::from_hex(s).ok_or_else(|| crate::Error::InvalidColor(s.to_string()))
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Value of a property at a point in time
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Scalar(f64),
    Color(Rgb),
}

impl Value {
    pub fn interpolate(self, to: Value, t: f64) -> Value {
        match (self, to) {
            (Value::Scalar(a), Value::Scalar(b)) => Value::Scalar(lerp(a, b, t)),
            (Value::Color(a), Value::Color(b)) => Value::Color(a.mix(b, t)),
            // kinds are validated before a tween starts
            (_, to) => to,
        }
    }

    pub fn as_scalar(self) -> Option<f64> {
        match self {
            Value::Scalar(v) => Some(v),
            Value::Color(_) => None,
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Scalar(v)
    }
}

impl From<Rgb> for Value {
    fn from(c: Rgb) -> Self {
        Value::Color(c)
    }
}

/// Ordered set of property targets, built fluently
///
/// Setting the same property twice keeps the last value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props {
    entries: Vec<(Property, Value)>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, property: Property, value: impl Into<Value>) -> Self {
        self.insert(property, value.into());
        self
    }

    pub fn insert(&mut self, property: Property, value: Value) {
        if let Some(slot) = self.entries.iter_mut().find(|(p, _)| *p == property) {
            slot.1 = value;
        } else {
            self.entries.push((property, value));
        }
    }

    pub fn opacity(self, v: f64) -> Self {
        self.with(Property::Opacity, v)
    }

    pub fn x(self, v: f64) -> Self {
        self.with(Property::TranslateX, v)
    }

    pub fn y(self, v: f64) -> Self {
        self.with(Property::TranslateY, v)
    }

    pub fn scale(self, v: f64) -> Self {
        self.with(Property::Scale, v)
    }

    pub fn rotate_x(self, v: f64) -> Self {
        self.with(Property::RotateX, v)
    }

    pub fn rotate_y(self, v: f64) -> Self {
        self.with(Property::RotateY, v)
    }

    pub fn rotation(self, v: f64) -> Self {
        self.with(Property::Rotation, v)
    }

    pub fn clip_reveal(self, v: f64) -> Self {
        self.with(Property::ClipReveal, v)
    }

    pub fn height(self, v: f64) -> Self {
        self.with(Property::Height, v)
    }

    pub fn color(self, c: Rgb) -> Self {
        self.with(Property::Color, c)
    }

    pub fn get(&self, property: Property) -> Option<Value> {
        self.entries
            .iter()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Property, Value)> + '_ {
        self.entries.iter().copied()
    }

    pub fn properties(&self) -> impl Iterator<Item = Property> + '_ {
        self.entries.iter().map(|(p, _)| *p)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
