//! Colors and snow palettes.

use std::fmt;
use std::str::FromStr;

/// An opaque 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const GREEN: Rgb = Rgb::new(0, 255, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Format as `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Rgb::WHITE
    }
}

impl From<Rgb> for ratatui::style::Color {
    fn from(c: Rgb) -> Self {
        ratatui::style::Color::Rgb(c.r, c.g, c.b)
    }
}

/// Error returned when a color string cannot be understood.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColorError {
    input: String,
}

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized color: {:?}", self.input)
    }
}

impl std::error::Error for ParseColorError {}

impl FromStr for Rgb {
    type Err = ParseColorError;

    /// Accepts `#rgb`, `#rrggbb`, `rgb(r, g, b)` and a handful of names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError {
            input: s.to_string(),
        };
        let trimmed = s.trim().to_ascii_lowercase();

        if let Some(hex) = trimmed.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(err);
        }

        if let Some(inner) = trimmed
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let parts: Vec<u8> = inner
                .split(',')
                .map(|p| p.trim().parse::<u8>())
                .collect::<Result<_, _>>()
                .map_err(|_| err())?;
            return match parts.as_slice() {
                [r, g, b] => Ok(Rgb::new(*r, *g, *b)),
                _ => Err(err()),
            };
        }

        match trimmed.as_str() {
            "white" => Ok(Rgb::WHITE),
            "black" => Ok(Rgb::new(0, 0, 0)),
            "red" => Ok(Rgb::new(255, 0, 0)),
            "green" | "lime" => Ok(Rgb::GREEN),
            "blue" => Ok(Rgb::new(0, 0, 255)),
            "cyan" => Ok(Rgb::new(0, 255, 255)),
            "magenta" => Ok(Rgb::new(255, 0, 255)),
            "yellow" => Ok(Rgb::new(255, 255, 0)),
            "gray" | "grey" => Ok(Rgb::new(128, 128, 128)),
            _ => Err(err()),
        }
    }
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    let digit = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok();
    let pair = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();

    match hex.len() {
        3 => Some(Rgb::new(digit(0)? * 17, digit(1)? * 17, digit(2)? * 17)),
        6 => Some(Rgb::new(pair(0)?, pair(2)?, pair(4)?)),
        _ => None,
    }
}

/// Snow color presets the user can cycle through at runtime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SnowPalette {
    #[default]
    White,
    Ice,
    Frost,
    Lavender,
    Ash,
}

impl SnowPalette {
    /// Cycle to the next palette.
    pub fn next(&self) -> Self {
        match self {
            SnowPalette::White => SnowPalette::Ice,
            SnowPalette::Ice => SnowPalette::Frost,
            SnowPalette::Frost => SnowPalette::Lavender,
            SnowPalette::Lavender => SnowPalette::Ash,
            SnowPalette::Ash => SnowPalette::White,
        }
    }

    pub fn color(self) -> Rgb {
        match self {
            SnowPalette::White => Rgb::WHITE,
            SnowPalette::Ice => Rgb::new(200, 230, 255),
            SnowPalette::Frost => Rgb::new(30, 144, 255),
            SnowPalette::Lavender => Rgb::new(200, 180, 255),
            SnowPalette::Ash => Rgb::new(150, 150, 160),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SnowPalette::White => "white",
            SnowPalette::Ice => "ice",
            SnowPalette::Frost => "frost",
            SnowPalette::Lavender => "lavender",
            SnowPalette::Ash => "ash",
        }
    }

    /// Find the palette whose color matches exactly, if any.
    pub fn from_color(color: Rgb) -> Option<Self> {
        let mut palette = SnowPalette::White;
        loop {
            if palette.color() == color {
                return Some(palette);
            }
            palette = palette.next();
            if palette == SnowPalette::White {
                return None;
            }
        }
    }
}
