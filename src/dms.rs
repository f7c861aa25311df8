//! Sexagesimal (degrees, minutes, seconds) coordinate tokens such as
//! `N005.15.44.694` or `W074.09.00`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static DIGIT_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").unwrap());

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub enum Hemisphere {
    North,
    South,
    East,
    West,
}

impl Hemisphere {
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'N' => Some(Self::North),
            'S' => Some(Self::South),
            'E' => Some(Self::East),
            'W' => Some(Self::West),
            _ => None,
        }
    }

    pub const fn letter(self) -> char {
        match self {
            Self::North => 'N',
            Self::South => 'S',
            Self::East => 'E',
            Self::West => 'W',
        }
    }

    pub const fn sign(self) -> f64 {
        match self {
            Self::North | Self::East => 1.0,
            Self::South | Self::West => -1.0,
        }
    }
}

/// A single parsed coordinate token. Components are unsigned, the sign comes
/// from the hemisphere.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct DegMinSec {
    /// `None` if the leading character is not a hemisphere letter, in which
    /// case the value is taken as positive.
    pub hemisphere: Option<Hemisphere>,
    pub degrees: f64,
    pub minutes: f64,
    pub seconds: f64,
}

impl DegMinSec {
    /// Reads the leading direction character, then the digit runs that follow
    /// it. A fourth run is the fractional part of the seconds.
    pub fn parse(token: &str) -> Option<Self> {
        let mut chars = token.chars();
        let hemisphere = Hemisphere::from_char(chars.next()?);
        let mut runs = DIGIT_RUN_RE
            .find_iter(chars.as_str())
            .map(|run| run.as_str());

        let degrees = runs.next()?.parse().ok()?;
        let minutes = runs.next()?.parse().ok()?;
        let whole_seconds = runs.next()?;
        let seconds = match runs.next() {
            Some(fraction) => format!("{whole_seconds}.{fraction}").parse().ok()?,
            None => whole_seconds.parse().ok()?,
        };

        Some(Self {
            hemisphere,
            degrees,
            minutes,
            seconds,
        })
    }

    pub fn to_decimal(&self) -> f64 {
        let decimal = self.degrees + self.minutes / 60.0 + self.seconds / 3600.0;
        self.hemisphere
            .map_or(decimal, |hemisphere| hemisphere.sign() * decimal)
    }
}

/// Signed decimal degrees of a coordinate token, `None` if it has fewer than
/// three digit runs.
pub fn dms_to_decimal(token: &str) -> Option<f64> {
    DegMinSec::parse(token).map(|dms| dms.to_decimal())
}

fn split_decimal(decimal: f64) -> (f64, u8, f64) {
    let abs = decimal.abs();
    let mut degrees = abs.trunc();
    let mut minutes = ((abs - degrees) * 60.0).trunc();
    let mut seconds = ((abs - degrees) * 3600.0 - minutes * 60.0).max(0.0);

    // would be printed as 60.000
    if seconds >= 59.9995 {
        seconds = 0.0;
        minutes += 1.0;
    }
    if minutes >= 60.0 {
        minutes = 0.0;
        degrees += 1.0;
    }

    (degrees, minutes as u8, seconds)
}

fn format_dms(decimal: f64, positive: Hemisphere, negative: Hemisphere) -> String {
    let hemisphere = if decimal < 0.0 { negative } else { positive };
    let (deg, min, sec) = split_decimal(decimal);
    format!("{}{deg:03.0}.{min:02}.{sec:06.3}", hemisphere.letter())
}

pub fn format_latitude(decimal: f64) -> String {
    format_dms(decimal, Hemisphere::North, Hemisphere::South)
}

pub fn format_longitude(decimal: f64) -> String {
    format_dms(decimal, Hemisphere::East, Hemisphere::West)
}
