//! Measurements and other structured style values
//!
//! Lengths end up in PostScript points (72 per inch) in the document model.

use super::types::InvalidValue;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

pub const POINTS_PER_INCH: f32 = 72.0;
pub const MILLIMETRES_PER_INCH: f32 = 25.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthUnit {
    Inch,
    Millimetre,
}

/// A non-negative length. `1in`, `25.4mm` and the bare `25.4` (millimetres) are accepted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length {
    pub value: f32,
    pub unit: LengthUnit,
}

impl Length {
    pub fn inches(value: f32) -> Self {
        Self {
            value,
            unit: LengthUnit::Inch,
        }
    }

    pub fn millimetres(value: f32) -> Self {
        Self {
            value,
            unit: LengthUnit::Millimetre,
        }
    }

    pub fn to_points(&self) -> f32 {
        match self.unit {
            LengthUnit::Inch => self.value * POINTS_PER_INCH,
            LengthUnit::Millimetre => self.value / MILLIMETRES_PER_INCH * POINTS_PER_INCH,
        }
    }
}

impl FromStr for Length {
    type Err = InvalidValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let (number, unit) = if let Some(number) = trimmed.strip_suffix("in") {
            (number, LengthUnit::Inch)
        } else if let Some(number) = trimmed.strip_suffix("mm") {
            (number, LengthUnit::Millimetre)
        } else {
            (trimmed, LengthUnit::Millimetre)
        };

        match number.trim().parse::<f32>() {
            Ok(amount) if amount.is_finite() && amount >= 0.0 => Ok(Length {
                value: amount,
                unit,
            }),
            _ => Err(InvalidValue::new("length (e.g. 1in or 25mm)", value)),
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            LengthUnit::Inch => write!(f, "{}in", self.value),
            LengthUnit::Millimetre => write!(f, "{}mm", self.value),
        }
    }
}

/// A relative image size written as `52%`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Percentage(pub u32);

impl FromStr for Percentage {
    type Err = InvalidValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let number = value.trim().strip_suffix('%').map(str::trim);
        match number.map(str::parse::<u32>) {
            Some(Ok(percent)) if percent >= 1 => Ok(Percentage(percent)),
            _ => Err(InvalidValue::new("size (a percentage such as 50%)", value)),
        }
    }
}

/// An RGB colour written as `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Colour {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Colour {
    pub const BLACK: Colour = Colour {
        red: 0,
        green: 0,
        blue: 0,
    };
}

impl FromStr for Colour {
    type Err = InvalidValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidValue::new("colour (#rrggbb)", value);
        let hex = value.trim().strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
        };
        Ok(Colour {
            red: channel(0..2)?,
            green: channel(2..4)?,
            blue: channel(4..6)?,
        })
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

impl Serialize for Colour {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Pages excluded from numeration: a single page or an inclusive span `first-last`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRange {
    pub first: u32,
    pub last: u32,
}

impl PageRange {
    pub fn pages(&self) -> impl Iterator<Item = u32> {
        self.first..=self.last
    }
}

impl FromStr for PageRange {
    type Err = InvalidValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidValue::new("page or page span (e.g. 3 or 5-12)", value);
        let page = |text: &str| match text.trim().parse::<u32>() {
            Ok(number) if number >= 1 => Ok(number),
            _ => Err(invalid()),
        };

        match value.split_once('-') {
            Some((first, last)) => {
                let (first, last) = (page(first)?, page(last)?);
                if first >= last {
                    return Err(invalid());
                }
                Ok(PageRange { first, last })
            }
            None => {
                let single = page(value)?;
                Ok(PageRange {
                    first: single,
                    last: single,
                })
            }
        }
    }
}

/// Physical page size in points
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageFormat {
    pub name: &'static str,
    pub width: f32,
    pub height: f32,
}

impl PageFormat {
    pub const LETTER: PageFormat = PageFormat {
        name: "letter",
        width: 612.0,
        height: 792.0,
    };

    pub const A4: PageFormat = PageFormat {
        name: "a4",
        width: 595.28,
        height: 841.89,
    };
}
