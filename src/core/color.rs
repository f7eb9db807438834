use std::fmt;
use std::str::FromStr;

use crate::error::{DigitizerError, DigitizerResult};

/// Colorblind-safe (Okabe-Ito) colors assigned to new datasets in order.
pub const DEFAULT_PALETTE: [&str; 6] = [
    "#0072B2", "#E69F00", "#009E73", "#CC79A7", "#F0E442", "#56B4E9",
];

/// 8-bit sRGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#RGB` or `#RRGGBB` (hex digits case-insensitive).
    pub fn from_hex(input: &str) -> DigitizerResult<Self> {
        let digits = input
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| DigitizerError::InvalidColor(format!("`{input}` must start with `#`")))?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(DigitizerError::InvalidColor(format!(
                "`{input}` contains non-hex digits"
            )));
        }

        match digits.len() {
            3 => {
                let mut channels = digits.chars().map(|c| {
                    // single hex digit, so the value fits in 0..=15
                    let v = c.to_digit(16).unwrap_or(0) as u8;
                    v * 16 + v
                });
                let r = channels.next().unwrap_or(0);
                let g = channels.next().unwrap_or(0);
                let b = channels.next().unwrap_or(0);
                Ok(Self::new(r, g, b))
            }
            6 => {
                let channel = |range: std::ops::Range<usize>| {
                    u8::from_str_radix(&digits[range], 16).map_err(|e| {
                        DigitizerError::InvalidColor(format!("`{input}`: {e}"))
                    })
                };
                Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
            }
            n => Err(DigitizerError::InvalidColor(format!(
                "`{input}` has {n} hex digits, expected 3 or 6"
            ))),
        }
    }

    /// Formats as upper-case `#RRGGBB`.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    #[must_use]
    fn unit_channels(self) -> [f64; 3] {
        [
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
        ]
    }

    /// Euclidean distance over unit-normalized channels, in `[0, sqrt(3)]`.
    #[must_use]
    pub fn euclidean_distance(self, other: Rgb) -> f64 {
        let [r1, g1, b1] = self.unit_channels();
        let [r2, g2, b2] = other.unit_channels();
        ((r1 - r2).powi(2) + (g1 - g2).powi(2) + (b1 - b2).powi(2)).sqrt()
    }

    /// Sum of absolute channel differences over unit-normalized channels, in `[0, 3]`.
    #[must_use]
    pub fn manhattan_distance(self, other: Rgb) -> f64 {
        let [r1, g1, b1] = self.unit_channels();
        let [r2, g2, b2] = other.unit_channels();
        (r1 - r2).abs() + (g1 - g2).abs() + (b1 - b2).abs()
    }

    /// Linear blend, `t` clamped to `[0, 1]` (0 yields `self`).
    #[must_use]
    pub fn blend(self, other: Rgb, t: f64) -> Rgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let mix = |a: u8, b: u8| (f64::from(a) * (1.0 - t) + f64::from(b) * t).round() as u8;
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// How the tracer scores a pixel against the target color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMetric {
    #[default]
    Euclidean,
    Manhattan,
}

impl ColorMetric {
    #[must_use]
    pub fn distance(self, a: Rgb, b: Rgb) -> f64 {
        match self {
            Self::Euclidean => a.euclidean_distance(b),
            Self::Manhattan => a.manhattan_distance(b),
        }
    }
}

/// A validated hex color that remembers the exact text it was parsed from.
///
/// Keeping the original spelling (`#abc`, `#0072b2`, ...) lets project files
/// round-trip without rewriting colors.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HexColor {
    text: String,
    rgb: Rgb,
}

impl HexColor {
    pub fn parse(input: &str) -> DigitizerResult<Self> {
        let rgb = Rgb::from_hex(input)?;
        Ok(Self {
            text: input.trim().to_owned(),
            rgb,
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn rgb(&self) -> Rgb {
        self.rgb
    }

    /// Upper-case `#RRGGBB` spelling of the same color.
    #[must_use]
    pub fn normalized(&self) -> String {
        self.rgb.to_hex()
    }
}

impl From<Rgb> for HexColor {
    fn from(rgb: Rgb) -> Self {
        Self {
            text: rgb.to_hex(),
            rgb,
        }
    }
}

impl FromStr for HexColor {
    type Err = DigitizerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Palette color for the `index`-th dataset, cycling after six entries.
#[must_use]
pub fn palette_color(index: usize) -> HexColor {
    let text = DEFAULT_PALETTE[index % DEFAULT_PALETTE.len()];
    HexColor::parse(text).unwrap_or_else(|_| HexColor::from(Rgb::BLACK))
}
