use std::fmt;

use serde::{
    Deserialize, Serialize,
    de::{self, MapAccess, SeqAccess, Unexpected, Visitor},
};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Stable identity of an actor registered with an [`crate::Engine`].
///
/// Ids are allocated in registration order and never reused by the same engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActorId(pub u64);

/// Straight-alpha RGBA8 color.
///
/// Serializes as `#RRGGBBAA`. Deserializes from a hex string, an `[r,g,b[,a]]` byte array,
/// an `{r,g,b[,a]}` byte map, or an `{h,s,b[,a]}` map as taken by [`Color::from_hsb`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = opaque).
    pub a: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::from_rgba8(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::from_rgba8(255, 255, 255, 255);
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::from_rgba8(0, 0, 0, 0);

    /// Build a color from straight RGBA8 channels.
    pub const fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Build a color from normalized `0..=1` channels. Out-of-range values are clamped.
    pub fn from_unit_rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        fn to_u8(x: f64) -> u8 {
            (x.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        Self::from_rgba8(to_u8(r), to_u8(g), to_u8(b), to_u8(a))
    }

    /// Hue/saturation/brightness constructor.
    ///
    /// `hue` is in degrees (any value, wrapped into `[0, 360)`); `saturation`, `brightness`
    /// and `alpha` are normalized to `0..=1`.
    pub fn from_hsb(hue: f64, saturation: f64, brightness: f64, alpha: f64) -> Self {
        let h = crate::foundation::math::normalize_degrees(hue) / 60.0;
        let s = saturation.clamp(0.0, 1.0);
        let v = brightness.clamp(0.0, 1.0);

        let c = v * s;
        let x = c * (1.0 - ((h % 2.0) - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = v - c;
        Self::from_unit_rgba(r + m, g + m, b + m, alpha)
    }

    /// Convert into premultiplied RGBA8 bytes.
    pub fn to_premul(self) -> [u8; 4] {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        [
            premul(self.r, self.a),
            premul(self.g, self.a),
            premul(self.b, self.a),
            self.a,
        ]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&format!(
            "#{:02x}{:02x}{:02x}{:02x}",
            self.r, self.g, self.b, self.a
        ))
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(ColorVisitor)
    }
}

const CHANNELS: [&str; 6] = ["r", "g", "b", "h", "s", "a"];

struct ColorVisitor;

impl<'de> Visitor<'de> for ColorVisitor {
    type Value = Color;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"#RRGGBB[AA]\", [r, g, b(, a)] bytes, {r, g, b(, a)} bytes or {h, s, b(, a)}")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Color, E> {
        parse_hex(v).map_err(E::custom)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Color, A::Error> {
        let mut rgba = [0, 0, 0, u8::MAX];
        let mut len = 0;
        while let Some(byte) = seq.next_element::<u8>()? {
            let Some(slot) = rgba.get_mut(len) else {
                return Err(de::Error::invalid_length(len + 1, &self));
            };
            *slot = byte;
            len += 1;
        }
        if len < 3 {
            return Err(de::Error::invalid_length(len, &self));
        }
        let [r, g, b, a] = rgba;
        Ok(Color::from_rgba8(r, g, b, a))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Color, A::Error> {
        let mut values = [None::<f64>; 6];
        while let Some(key) = map.next_key::<String>()? {
            let Some(i) = CHANNELS.iter().position(|c| *c == key) else {
                return Err(de::Error::unknown_field(&key, &CHANNELS));
            };
            if values[i].replace(map.next_value()?).is_some() {
                return Err(de::Error::duplicate_field(CHANNELS[i]));
            }
        }

        let byte = channel_byte::<A::Error>;
        // `b` is blue next to `r`/`g` and brightness next to `h`/`s`.
        match values {
            [Some(r), Some(g), Some(b), None, None, a] => Ok(Color::from_rgba8(
                byte(r)?,
                byte(g)?,
                byte(b)?,
                a.map(byte).transpose()?.unwrap_or(u8::MAX),
            )),
            [None, None, Some(v), Some(h), Some(s), a] => {
                Ok(Color::from_hsb(h, s, v, a.unwrap_or(1.0)))
            }
            _ => Err(de::Error::custom(
                "color map needs exactly r, g, b or h, s, b (plus optional a)",
            )),
        }
    }
}

fn channel_byte<E: de::Error>(v: f64) -> Result<u8, E> {
    if v.fract() == 0.0 && (0.0..=255.0).contains(&v) {
        Ok(v as u8)
    } else {
        Err(E::invalid_value(
            Unexpected::Float(v),
            &"an integer channel in 0..=255",
        ))
    }
}

fn parse_hex(s: &str) -> Result<Color, String> {
    let trimmed = s.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if !matches!(digits.len(), 6 | 8) || !digits.bytes().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("invalid color {s:?}: expected #RRGGBB or #RRGGBBAA"));
    }
    let packed = u32::from_str_radix(digits, 16).map_err(|e| e.to_string())?;
    let packed = if digits.len() == 6 {
        (packed << 8) | 0xff
    } else {
        packed
    };
    let [r, g, b, a] = packed.to_be_bytes();
    Ok(Color::from_rgba8(r, g, b, a))
}

/// Animation rate of an actor.
///
/// Finite speeds are always positive and finite; everything else collapses to
/// [`Speed::Instant`], which applies motion without consuming frame time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Speed {
    /// Units per second (before the engine's per-kind scale).
    Finite(f64),
    /// Unbounded rate.
    Instant,
}

impl Speed {
    /// Default rate for new actors, in units per second.
    pub const DEFAULT: Self = Self::Finite(1000.0);

    /// Map a raw rate onto a valid speed. `v <= 0`, NaN and infinities become [`Speed::Instant`].
    pub fn new(v: f64) -> Self {
        if v.is_finite() && v > 0.0 {
            Self::Finite(v)
        } else {
            Self::Instant
        }
    }

    /// Rate in units per second, `f64::INFINITY` for [`Speed::Instant`].
    pub fn units_per_sec(self) -> f64 {
        match self {
            Self::Finite(v) => v,
            Self::Instant => f64::INFINITY,
        }
    }

    /// Return `true` for the unbounded rate.
    pub fn is_instant(self) -> bool {
        matches!(self, Self::Instant)
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
