//! Builtin PDF font faces and text measurement.
//!
//! The sheet only uses the 14 standard PDF fonts, so no font files are
//! embedded. Widths are estimated from average glyph advances per family,
//! which is accurate enough to keep short channel lines inside a column.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the standard PDF font faces, named as in PDF (`Helvetica-Bold`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FontFace {
    #[default]
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    TimesRoman,
    TimesBold,
    TimesItalic,
    TimesBoldItalic,
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Helvetica,
    Times,
    Courier,
}

impl FontFace {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
            Self::HelveticaOblique => "Helvetica-Oblique",
            Self::HelveticaBoldOblique => "Helvetica-BoldOblique",
            Self::TimesRoman => "Times-Roman",
            Self::TimesBold => "Times-Bold",
            Self::TimesItalic => "Times-Italic",
            Self::TimesBoldItalic => "Times-BoldItalic",
            Self::Courier => "Courier",
            Self::CourierBold => "Courier-Bold",
            Self::CourierOblique => "Courier-Oblique",
            Self::CourierBoldOblique => "Courier-BoldOblique",
        }
    }

    fn family(&self) -> Family {
        match self {
            Self::Helvetica
            | Self::HelveticaBold
            | Self::HelveticaOblique
            | Self::HelveticaBoldOblique => Family::Helvetica,
            Self::TimesRoman | Self::TimesBold | Self::TimesItalic | Self::TimesBoldItalic => {
                Family::Times
            }
            _ => Family::Courier,
        }
    }

    pub fn is_bold(&self) -> bool {
        matches!(
            self,
            Self::HelveticaBold
                | Self::HelveticaBoldOblique
                | Self::TimesBold
                | Self::TimesBoldItalic
                | Self::CourierBold
                | Self::CourierBoldOblique
        )
    }

    pub fn is_italic(&self) -> bool {
        matches!(
            self,
            Self::HelveticaOblique
                | Self::HelveticaBoldOblique
                | Self::TimesItalic
                | Self::TimesBoldItalic
                | Self::CourierOblique
                | Self::CourierBoldOblique
        )
    }

    /// The bold face of the same family and slant.
    pub fn bold(&self) -> Self {
        match (self.family(), self.is_italic()) {
            (Family::Helvetica, false) => Self::HelveticaBold,
            (Family::Helvetica, true) => Self::HelveticaBoldOblique,
            (Family::Times, false) => Self::TimesBold,
            (Family::Times, true) => Self::TimesBoldItalic,
            (Family::Courier, false) => Self::CourierBold,
            (Family::Courier, true) => Self::CourierBoldOblique,
        }
    }

    /// Average advance width as a fraction of the font size.
    fn average_advance(&self) -> f32 {
        match (self.family(), self.is_bold()) {
            (Family::Courier, _) => 0.6,
            (Family::Helvetica, false) => 0.5,
            (Family::Helvetica, true) => 0.55,
            (Family::Times, false) => 0.45,
            (Family::Times, true) => 0.5,
        }
    }
}

impl fmt::Display for FontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FontFace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let face = match s.trim() {
            "Helvetica" => Self::Helvetica,
            "Helvetica-Bold" => Self::HelveticaBold,
            "Helvetica-Oblique" => Self::HelveticaOblique,
            "Helvetica-BoldOblique" => Self::HelveticaBoldOblique,
            "Times-Roman" | "Times" => Self::TimesRoman,
            "Times-Bold" => Self::TimesBold,
            "Times-Italic" => Self::TimesItalic,
            "Times-BoldItalic" => Self::TimesBoldItalic,
            "Courier" => Self::Courier,
            "Courier-Bold" => Self::CourierBold,
            "Courier-Oblique" => Self::CourierOblique,
            "Courier-BoldOblique" => Self::CourierBoldOblique,
            other => return Err(format!("unknown builtin font {other:?}")),
        };
        Ok(face)
    }
}

impl TryFrom<String> for FontFace {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FontFace> for String {
    fn from(face: FontFace) -> Self {
        face.name().to_string()
    }
}

/// Estimated width of `text` in points.
pub fn measure_text_width(text: &str, face: FontFace, size: f32) -> f32 {
    text.chars().count() as f32 * size * face.average_advance()
}

/// Cut `text` so it fits `max_width`, ending it with `...` when shortened.
pub fn truncate_to_width(text: &str, face: FontFace, size: f32, max_width: f32) -> String {
    if measure_text_width(text, face, size) <= max_width {
        return text.to_string();
    }
    const ELLIPSIS: &str = "...";
    let budget = max_width - measure_text_width(ELLIPSIS, face, size);
    if budget <= 0.0 {
        return String::new();
    }
    let per_char = size * face.average_advance();
    let keep = (budget / per_char).floor() as usize;
    let mut out: String = text.chars().take(keep).collect();
    let trimmed_len = out.trim_end().len();
    out.truncate(trimmed_len);
    out.push_str(ELLIPSIS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heuristic_text_width() {
        let w = measure_text_width("Hello", FontFace::Helvetica, 16.0);
        // 5 chars × 16 × 0.5 = 40
        assert!((w - 40.0).abs() < 0.1);
        let w = measure_text_width("Hello", FontFace::Courier, 10.0);
        assert!((w - 30.0).abs() < 0.1);
    }

    #[test]
    fn parses_pdf_names() {
        assert_eq!("Helvetica-Bold".parse::<FontFace>(), Ok(FontFace::HelveticaBold));
        assert_eq!("Times".parse::<FontFace>(), Ok(FontFace::TimesRoman));
        assert!("Comic Sans".parse::<FontFace>().is_err());
        assert_eq!(FontFace::TimesItalic.bold(), FontFace::TimesBoldItalic);
        assert_eq!(FontFace::HelveticaBold.bold(), FontFace::HelveticaBold);
    }

    #[test]
    fn truncation_respects_width() {
        let text = "ESPN College Extra Alternate";
        let out = truncate_to_width(text, FontFace::Helvetica, 10.0, 60.0);
        assert!(out.ends_with("..."));
        assert!(measure_text_width(&out, FontFace::Helvetica, 10.0) <= 60.0);
        assert_eq!(truncate_to_width("CNN", FontFace::Helvetica, 10.0, 60.0), "CNN");
        assert_eq!(truncate_to_width("CNN", FontFace::Helvetica, 10.0, 5.0), "");
    }
}
