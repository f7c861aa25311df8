use std::fmt::{self, Display};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{de::Visitor, Deserialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Colour {
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// `#RRGGBB`, as written into SVG attributes.
impl Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

pub const BACKGROUND: Colour = Colour::from_rgb(0x12, 0x12, 0x12);

/// Polygon colours, picked round-robin by group position.
pub const PALETTE: [Colour; 14] = [
    Colour::from_rgb(0x84, 0x5E, 0xC2),
    Colour::from_rgb(0xD6, 0x5D, 0xB1),
    Colour::from_rgb(0xFF, 0x6F, 0x91),
    Colour::from_rgb(0xFF, 0x96, 0x71),
    Colour::from_rgb(0xFF, 0xC7, 0x5F),
    Colour::from_rgb(0xF9, 0xF8, 0x71),
    Colour::from_rgb(0x00, 0x8F, 0x7A),
    Colour::from_rgb(0x00, 0xC9, 0xA7),
    Colour::from_rgb(0x00, 0x81, 0xCF),
    Colour::from_rgb(0x2C, 0x73, 0xD2),
    Colour::from_rgb(0xB3, 0x9C, 0xD0),
    Colour::from_rgb(0xC3, 0x4A, 0x36),
    Colour::from_rgb(0xF3, 0xC5, 0xFF),
    Colour::from_rgb(0x4F, 0xFB, 0xDF),
];

struct ColourVisitor;

static HASH_RGB_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#([0-9a-fA-F]{2})([0-9a-fA-F]{2})([0-9a-fA-F]{2})$").unwrap());

impl Visitor<'_> for ColourVisitor {
    type Value = Colour;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("A colour in the format #rrggbb")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        if let Some(((r, g), b)) = HASH_RGB_RE.captures(v).and_then(|captures| {
            let r = u8::from_str_radix(&captures[1], 16);
            let g = u8::from_str_radix(&captures[2], 16);
            let b = u8::from_str_radix(&captures[3], 16);
            r.ok().zip(g.ok()).zip(b.ok())
        }) {
            return Ok(Colour::from_rgb(r, g, b));
        }

        Err(serde::de::Error::invalid_value(
            serde::de::Unexpected::Str(v),
            &self,
        ))
    }
}

impl<'de> Deserialize<'de> for Colour {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_str(ColourVisitor)
    }
}
