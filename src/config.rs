//! Per-export style configuration.
//!
//! A [`StyleConfig`] is built once for an export (usually deserialized from the
//! editor's JSON) and then only ever read. Nothing in the pipeline keeps style
//! state of its own.

use crate::error::ConfigError;
use crate::impose::FormatFamily;
use crate::layout::Margins;
use crate::pagesize::{self, PageOrientation, PageSize};
use crate::units::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Horizontal alignment of a line of text within the content box
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl FromStr for TextAlign {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "start" => Ok(TextAlign::Left),
            "center" | "centre" => Ok(TextAlign::Center),
            "right" | "end" => Ok(TextAlign::Right),
            "justify" | "justified" => Ok(TextAlign::Justify),
            other => Err(ConfigError::Invalid(format!("unknown alignment '{other}'"))),
        }
    }
}

/// The cut formats a Liedblatt can be printed in
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PageFormat {
    #[default]
    #[serde(rename = "a5")]
    A5,
    #[serde(rename = "dl")]
    Dl,
    #[serde(rename = "narrow-a4")]
    NarrowA4,
    #[serde(rename = "narrow-a3")]
    NarrowA3,
}

/// Size and margins of one logical page
#[derive(Debug, Clone, PartialEq)]
pub struct PageGeometry {
    pub width: Pt,
    pub height: Pt,
    pub margins: Margins,
}

impl PageGeometry {
    pub fn content_width(&self) -> Pt {
        self.width - self.margins.horizontal()
    }

    pub fn content_height(&self) -> Pt {
        self.height - self.margins.vertical()
    }

    pub fn size(&self) -> PageSize {
        (self.width, self.height)
    }
}

impl PageFormat {
    pub const ALL: [PageFormat; 4] = [
        PageFormat::A5,
        PageFormat::Dl,
        PageFormat::NarrowA4,
        PageFormat::NarrowA3,
    ];

    /// The key used in configuration files and output file names
    pub fn key(&self) -> &'static str {
        match self {
            PageFormat::A5 => "a5",
            PageFormat::Dl => "dl",
            PageFormat::NarrowA4 => "narrow-a4",
            PageFormat::NarrowA3 => "narrow-a3",
        }
    }

    pub fn page_size(&self) -> PageSize {
        match self {
            PageFormat::A5 => pagesize::A5,
            PageFormat::Dl => pagesize::DL,
            PageFormat::NarrowA4 => pagesize::NARROW_A4,
            PageFormat::NarrowA3 => pagesize::NARROW_A3,
        }
    }

    fn margin(&self) -> Mm {
        match self {
            PageFormat::A5 | PageFormat::NarrowA3 => Mm(15.0),
            PageFormat::Dl => Mm(8.0),
            PageFormat::NarrowA4 => Mm(10.0),
        }
    }

    pub fn geometry(&self) -> PageGeometry {
        let (width, height) = self.page_size();
        PageGeometry {
            width,
            height,
            margins: Margins::all(self.margin()),
        }
    }

    /// Physical sheet the logical pages are imposed onto
    pub fn sheet_size(&self) -> PageSize {
        match self {
            PageFormat::A5 | PageFormat::Dl => pagesize::A4.landscape(),
            PageFormat::NarrowA4 => pagesize::A4.portrait(),
            PageFormat::NarrowA3 => pagesize::A3.portrait(),
        }
    }

    pub fn family(&self) -> FormatFamily {
        match self {
            PageFormat::Dl => FormatFamily::ThreeUp,
            PageFormat::A5 | PageFormat::NarrowA4 | PageFormat::NarrowA3 => FormatFamily::TwoUp,
        }
    }
}

impl fmt::Display for PageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for PageFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        PageFormat::ALL
            .into_iter()
            .find(|format| format.key() == key)
            .ok_or_else(|| ConfigError::UnknownPageFormat(s.to_string()))
    }
}

fn default_font_family() -> String {
    "Open Sans".to_string()
}

fn default_font_size() -> Pt {
    BASE_FONT_SIZE
}

fn default_line_height() -> f32 {
    1.3
}

/// Style settings for one export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleConfig {
    #[serde(default = "default_font_family")]
    pub font_family: String,
    /// Body text size; every fixed spacing constant scales with it
    #[serde(default = "default_font_size", alias = "fontSize")]
    pub base_font_size: Pt,
    #[serde(default = "default_line_height", alias = "lineHeight")]
    pub line_height_multiplier: f32,
    #[serde(default, alias = "textAlign")]
    pub text_align_default: TextAlign,
    #[serde(default, alias = "format")]
    pub page_format: PageFormat,
    #[serde(default, alias = "logo")]
    pub logo_ref: Option<String>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        StyleConfig {
            font_family: default_font_family(),
            base_font_size: default_font_size(),
            line_height_multiplier: default_line_height(),
            text_align_default: TextAlign::default(),
            page_format: PageFormat::default(),
            logo_ref: None,
        }
    }
}

impl StyleConfig {
    pub fn from_json(json: &str) -> Result<StyleConfig, ConfigError> {
        let config: StyleConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<StyleConfig, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        StyleConfig::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_font_size.0 > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "base font size must be positive, got {}",
                self.base_font_size
            )));
        }
        if !(self.line_height_multiplier > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "line height multiplier must be positive, got {}",
                self.line_height_multiplier
            )));
        }
        if self.font_family.trim().is_empty() {
            return Err(ConfigError::Invalid("font family is empty".to_string()));
        }
        Ok(())
    }

    /// Height of one line of body text
    pub fn body_line_height(&self) -> Pt {
        self.base_font_size * self.line_height_multiplier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_keys_round_trip() {
        for format in PageFormat::ALL {
            assert_eq!(format.key().parse::<PageFormat>().unwrap(), format);
        }
        assert_eq!(" Narrow-A4 ".parse::<PageFormat>().unwrap(), PageFormat::NarrowA4);
    }

    #[test]
    fn unknown_format_is_rejected() {
        let err = "letter".parse::<PageFormat>().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownPageFormat(ref key) if key == "letter"));
    }

    #[test]
    fn dl_is_the_only_three_up_format() {
        assert_eq!(PageFormat::Dl.family(), FormatFamily::ThreeUp);
        assert_eq!(PageFormat::A5.family(), FormatFamily::TwoUp);
        assert_eq!(PageFormat::NarrowA4.family(), FormatFamily::TwoUp);
        assert_eq!(PageFormat::NarrowA3.family(), FormatFamily::TwoUp);
    }

    #[test]
    fn logical_pages_fit_their_sheets() {
        for format in PageFormat::ALL {
            let (w, h) = format.page_size();
            let (sw, sh) = format.sheet_size();
            let per_sheet = format.family().pages_per_sheet() as f32;
            assert!(w * per_sheet <= sw + Pt(3.0), "{format} is too wide");
            assert!(h <= sh + Pt(0.01), "{format} is too tall");
        }
    }

    #[test]
    fn config_parses_with_defaults() {
        let config = StyleConfig::from_json(r#"{"fontFamily": "Playfair Display", "pageFormat": "dl"}"#)
            .expect("valid config");
        assert_eq!(config.font_family, "Playfair Display");
        assert_eq!(config.page_format, PageFormat::Dl);
        assert_eq!(config.base_font_size, Pt(14.0));
        assert_eq!(config.text_align_default, TextAlign::Left);
        assert!(config.logo_ref.is_none());
    }

    #[test]
    fn config_rejects_nonsense_sizes() {
        assert!(StyleConfig::from_json(r#"{"baseFontSize": 0}"#).is_err());
        assert!(StyleConfig::from_json(r#"{"lineHeightMultiplier": -1}"#).is_err());
        assert!(StyleConfig::from_json(r#"{"pageFormat": "letter"}"#).is_err());
    }
}
