//! CSS color strings as stored on categories and in styling settings.
//!
//! Supports `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb()`/`rgba()` with
//! comma or space separated components, `transparent`, and a handful of
//! named colors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ColorError;

/// An 8-bit RGBA color (straight, not premultiplied, alpha).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Parses a color, falling back when the string is not a valid color.
    pub fn parse_or(s: &str, fallback: Rgba) -> Rgba {
        s.parse().unwrap_or_else(|e| {
            tracing::warn!("{}, using {}", e, fallback);
            fallback
        })
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(
                f,
                "#{:02x}{:02x}{:02x}{:02x}",
                self.r, self.g, self.b, self.a
            )
        }
    }
}

impl FromStr for Rgba {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_ascii_lowercase();

        if let Some(hex) = input.strip_prefix('#') {
            return parse_hex(s, hex);
        }

        if let Some(args) = input
            .strip_prefix("rgba(")
            .or_else(|| input.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_functional(s, args);
        }

        named(&input).ok_or_else(|| ColorError::Unrecognised(s.to_string()))
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

fn parse_hex(original: &str, hex: &str) -> Result<Rgba, ColorError> {
    let invalid = || ColorError::InvalidComponent {
        color: original.to_string(),
        component: hex.to_string(),
    };
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);

    let parsed = match hex.len() {
        3 => (nibble(0), nibble(1), nibble(2), Ok(255)),
        4 => (nibble(0), nibble(1), nibble(2), nibble(3)),
        6 => (byte(0), byte(2), byte(4), Ok(255)),
        8 => (byte(0), byte(2), byte(4), byte(6)),
        _ => return Err(ColorError::Unrecognised(original.to_string())),
    };

    match parsed {
        (Ok(r), Ok(g), Ok(b), Ok(a)) => Ok(Rgba::new(r, g, b, a)),
        _ => Err(invalid()),
    }
}

fn parse_functional(original: &str, args: &str) -> Result<Rgba, ColorError> {
    let parts: Vec<&str> = args
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect();
    if parts.len() != 3 && parts.len() != 4 {
        return Err(ColorError::Unrecognised(original.to_string()));
    }

    let invalid = |component: &str| ColorError::InvalidComponent {
        color: original.to_string(),
        component: component.to_string(),
    };

    let channel = |p: &str| -> Result<u8, ColorError> {
        let value = match p.strip_suffix('%') {
            Some(pct) => pct.parse::<f64>().map(|v| v * 2.55),
            None => p.parse::<f64>(),
        }
        .map_err(|_| invalid(p))?;
        if !(0.0..=255.0).contains(&value) {
            return Err(invalid(p));
        }
        Ok(value.round() as u8)
    };

    let alpha = |p: &str| -> Result<u8, ColorError> {
        let value = match p.strip_suffix('%') {
            Some(pct) => pct.parse::<f64>().map(|v| v / 100.0),
            None => p.parse::<f64>(),
        }
        .map_err(|_| invalid(p))?;
        if !(0.0..=1.0).contains(&value) {
            return Err(invalid(p));
        }
        Ok((value * 255.0).round() as u8)
    };

    let a = match parts.get(3) {
        Some(p) => alpha(p)?,
        None => 255,
    };
    Ok(Rgba::new(
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
        a,
    ))
}

fn named(name: &str) -> Option<Rgba> {
    let color = match name {
        "transparent" => Rgba::TRANSPARENT,
        "black" => Rgba::opaque(0, 0, 0),
        "white" => Rgba::opaque(255, 255, 255),
        "gray" | "grey" => Rgba::opaque(128, 128, 128),
        "red" => Rgba::opaque(255, 0, 0),
        "green" => Rgba::opaque(0, 128, 0),
        "blue" => Rgba::opaque(0, 0, 255),
        "yellow" => Rgba::opaque(255, 255, 0),
        "orange" => Rgba::opaque(255, 165, 0),
        "purple" => Rgba::opaque(128, 0, 128),
        _ => return None,
    };
    Some(color)
}
