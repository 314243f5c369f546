//! Category colors: hex RGB values and the closed category → color map.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// An opaque RGB color, serialised as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const LIGHT_GREY: Self = Self::rgb(211, 211, 211);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` or `#RGB` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        if hex.len() == 6 {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Self { r, g, b })
        } else if hex.len() == 3 {
            let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?;
            Some(Self { r, g, b })
        } else {
            None
        }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Components scaled to `0.0..=1.0`, alpha fixed at 1.
    pub fn to_rgba(&self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            1.0,
        ]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value).ok_or_else(|| format!("invalid hex color {value:?}"))
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_hex()
    }
}

/// Closed mapping from category name to color, with an explicit optional
/// default. Lookups are case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryColorMap {
    colors: BTreeMap<String, Color>,
    default: Option<Color>,
}

impl CategoryColorMap {
    pub fn new(colors: BTreeMap<String, Color>) -> Self {
        Self {
            colors,
            default: None,
        }
    }

    pub fn with_default(mut self, color: Color) -> Self {
        self.default = Some(color);
        self
    }

    pub fn insert(&mut self, category: impl Into<String>, color: Color) {
        self.colors.insert(category.into(), color);
    }

    pub fn default_color(&self) -> Option<Color> {
        self.default
    }

    /// Mapped color, else the configured default, else `None`.
    pub fn resolve(&self, category: &str) -> Option<Color> {
        self.colors.get(category).copied().or(self.default)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// The palette the channel sheet has always shipped with.
    pub fn standard() -> Self {
        let mut map = Self::default();
        for (name, hex) in STANDARD_PALETTE {
            if let Some(c) = Color::from_hex(hex) {
                map.insert(*name, c);
            }
        }
        map
    }
}

pub(crate) const STANDARD_PALETTE: &[(&str, &str)] = &[
    ("Local", "#3366CC"),
    ("News", "#CC0000"),
    ("Sports", "#008800"),
    ("Kids", "#FF9900"),
    ("Faith", "#663399"),
    ("Shop", "#CC33CC"),
    ("Music", "#0099CC"),
    ("Intl", "#996600"),
    ("TV", "#000000"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!(Color::from_hex("#3366CC"), Some(Color::rgb(0x33, 0x66, 0xCC)));
        assert_eq!(Color::from_hex("f90"), Some(Color::rgb(0xFF, 0x99, 0x00)));
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex("#GG0000"), None);
    }

    #[test]
    fn hex_serde_uses_uppercase_string() {
        let json = serde_json::to_string(&Color::rgb(0xcc, 0, 0)).unwrap();
        assert_eq!(json, "\"#CC0000\"");
        let back: Color = serde_json::from_str("\"#cc0000\"").unwrap();
        assert_eq!(back, Color::rgb(0xcc, 0, 0));
        assert!(serde_json::from_str::<Color>("\"red\"").is_err());
    }

    #[test]
    fn resolve_falls_back_only_when_default_set() {
        let map = CategoryColorMap::standard();
        assert_eq!(map.resolve("News"), Color::from_hex("#CC0000"));
        assert_eq!(map.resolve("Opera"), None);
        assert_eq!(map.resolve("news"), None);

        let map = map.with_default(Color::BLACK);
        assert_eq!(map.resolve("Opera"), Some(Color::BLACK));
        assert_eq!(map.resolve("Kids"), Color::from_hex("#FF9900"));
    }

    #[test]
    fn standard_palette_is_complete() {
        let map = CategoryColorMap::standard();
        assert_eq!(map.len(), STANDARD_PALETTE.len());
        assert!(map.default_color().is_none());
    }
}
