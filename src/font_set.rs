//! Resolution of the four style variants of a font family.
//!
//! A Liedblatt is set in one family. Its regular face is mandatory; bold,
//! italic and bold-italic are optional and fall back to the regular face when
//! they cannot be fetched, parsed, or measured with.

use crate::error::FontError;
use crate::fetch::{font_url, AssetFetcher};
use crate::font::{Font, TextMeasure};
use crate::units::Pt;

/// Families whose font files are named differently from their display name
const FILE_STEMS: &[(&str, &str)] = &[
    ("Playfair Display", "PlayfairDisplay"),
    ("Open Sans", "OpenSans"),
    ("Source Sans Pro", "SourceSansPro"),
    ("Libre Baskerville", "LibreBaskerville"),
    ("EB Garamond", "EBGaramond"),
];

const PROBE_TEXT: &str = "Liedblatt Ää Öö Üü ß 1234";
const PROBE_SIZE: Pt = Pt(12.0);

/// One of the four bold × italic combinations
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FontStyle {
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl FontStyle {
    pub const ALL: [FontStyle; 4] = [
        FontStyle::Regular,
        FontStyle::Bold,
        FontStyle::Italic,
        FontStyle::BoldItalic,
    ];

    pub fn from_flags(bold: bool, italic: bool) -> FontStyle {
        match (bold, italic) {
            (false, false) => FontStyle::Regular,
            (true, false) => FontStyle::Bold,
            (false, true) => FontStyle::Italic,
            (true, true) => FontStyle::BoldItalic,
        }
    }

    /// Suffix of the font file for this style
    pub fn file_suffix(&self) -> &'static str {
        match self {
            FontStyle::Regular => "Regular",
            FontStyle::Bold => "Bold",
            FontStyle::Italic => "Italic",
            FontStyle::BoldItalic => "BoldItalic",
        }
    }
}

/// The file stem used for a family's font files
pub fn file_stem(family: &str) -> String {
    let family = family.trim();
    FILE_STEMS
        .iter()
        .find(|(display, _)| display.eq_ignore_ascii_case(family))
        .map(|(_, stem)| stem.to_string())
        .unwrap_or_else(|| family.to_string())
}

/// The faces of one family. Missing styles are served by the regular face.
#[derive(Debug)]
pub struct FontSet<F> {
    pub regular: F,
    pub bold: Option<F>,
    pub italic: Option<F>,
    pub bold_italic: Option<F>,
}

impl<F> FontSet<F> {
    /// A set with only a regular face; every style falls back to it
    pub fn regular_only(regular: F) -> FontSet<F> {
        FontSet {
            regular,
            bold: None,
            italic: None,
            bold_italic: None,
        }
    }

    fn slot(&self, style: FontStyle) -> Option<&F> {
        match style {
            FontStyle::Regular => Some(&self.regular),
            FontStyle::Bold => self.bold.as_ref(),
            FontStyle::Italic => self.italic.as_ref(),
            FontStyle::BoldItalic => self.bold_italic.as_ref(),
        }
    }

    /// The face that draws `style`
    pub fn face(&self, style: FontStyle) -> &F {
        self.slot(style).unwrap_or(&self.regular)
    }

    /// The style whose face actually draws `style`
    pub fn resolved(&self, style: FontStyle) -> FontStyle {
        if self.slot(style).is_some() {
            style
        } else {
            FontStyle::Regular
        }
    }

    /// Styles that have a face of their own, regular first
    pub fn available(&self) -> impl Iterator<Item = FontStyle> + '_ {
        FontStyle::ALL
            .into_iter()
            .filter(move |style| self.slot(*style).is_some())
    }

    /// Consume the set, yielding every face that is present along with its style
    pub fn into_faces(self) -> Vec<(FontStyle, F)> {
        let mut faces = vec![(FontStyle::Regular, self.regular)];
        faces.extend(self.bold.map(|f| (FontStyle::Bold, f)));
        faces.extend(self.italic.map(|f| (FontStyle::Italic, f)));
        faces.extend(self.bold_italic.map(|f| (FontStyle::BoldItalic, f)));
        faces
    }
}

fn load_face<F, L>(
    fetcher: &dyn AssetFetcher,
    stem: &str,
    style: FontStyle,
    loader: &L,
) -> Result<F, FontError>
where
    F: TextMeasure,
    L: Fn(Vec<u8>) -> Result<F, FontError>,
{
    let url = font_url(stem, style.file_suffix());
    let bytes = fetcher.fetch(&url)?;
    let face = loader(bytes)?;

    let width = face.width_of_text(PROBE_TEXT, PROBE_SIZE)?;
    if !(width.0 > 0.0) {
        return Err(FontError::Unmeasurable(url));
    }
    Ok(face)
}

/// Resolve a family with a custom face loader
pub fn resolve_font_set_with<F, L>(
    fetcher: &dyn AssetFetcher,
    family: &str,
    loader: L,
) -> Result<FontSet<F>, FontError>
where
    F: TextMeasure,
    L: Fn(Vec<u8>) -> Result<F, FontError>,
{
    let stem = file_stem(family);

    let regular = load_face(fetcher, &stem, FontStyle::Regular, &loader).map_err(|source| {
        FontError::MissingRegular {
            family: family.to_string(),
            source: Box::new(source),
        }
    })?;

    let optional = |style: FontStyle| match load_face(fetcher, &stem, style, &loader) {
        Ok(face) => Some(face),
        Err(e) => {
            log::warn!(
                "{family} {} unavailable, falling back to regular: {e}",
                style.file_suffix()
            );
            None
        }
    };

    let set = FontSet {
        regular,
        bold: optional(FontStyle::Bold),
        italic: optional(FontStyle::Italic),
        bold_italic: optional(FontStyle::BoldItalic),
    };
    log::debug!(
        "resolved font family {family} with styles {:?}",
        set.available().collect::<Vec<_>>()
    );
    Ok(set)
}

/// Fetch, parse and validate the four faces of `family`
pub fn resolve_font_set(fetcher: &dyn AssetFetcher, family: &str) -> Result<FontSet<Font>, FontError> {
    resolve_font_set_with(fetcher, family, Font::load)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MemoryFetcher;

    /// Face stand-in: the byte content names the face, "broken" cannot measure
    #[derive(Debug, PartialEq)]
    struct Probe(String);

    impl TextMeasure for Probe {
        fn width_of_text(&self, text: &str, size: Pt) -> Result<Pt, FontError> {
            if self.0 == "broken" {
                Err(FontError::Unmeasurable(self.0.clone()))
            } else {
                Ok(size * 0.5 * text.chars().count() as f32)
            }
        }
    }

    fn load_probe(bytes: Vec<u8>) -> Result<Probe, FontError> {
        Ok(Probe(String::from_utf8(bytes).expect("utf8 probe")))
    }

    #[test]
    fn display_names_map_to_file_stems() {
        assert_eq!(file_stem("Playfair Display"), "PlayfairDisplay");
        assert_eq!(file_stem("open sans"), "OpenSans");
        assert_eq!(file_stem("Lato"), "Lato");
    }

    #[test]
    fn all_four_styles_resolve() {
        let fetcher = MemoryFetcher::new()
            .with("/ttf/Lato-Regular.ttf", b"regular".to_vec())
            .with("/ttf/Lato-Bold.ttf", b"bold".to_vec())
            .with("/ttf/Lato-Italic.ttf", b"italic".to_vec())
            .with("/ttf/Lato-BoldItalic.ttf", b"bold-italic".to_vec());

        let set = resolve_font_set_with(&fetcher, "Lato", load_probe).expect("resolves");
        assert_eq!(set.face(FontStyle::BoldItalic), &Probe("bold-italic".into()));
        assert_eq!(set.available().count(), 4);
    }

    #[test]
    fn missing_styles_fall_back_to_regular() {
        let fetcher = MemoryFetcher::new()
            .with("/ttf/PlayfairDisplay-Regular.ttf", b"regular".to_vec())
            .with("/ttf/PlayfairDisplay-Italic.ttf", b"broken".to_vec());

        let set = resolve_font_set_with(&fetcher, "Playfair Display", load_probe).expect("resolves");
        assert_eq!(set.face(FontStyle::Bold), &Probe("regular".into()));
        assert_eq!(set.face(FontStyle::Italic), &Probe("regular".into()));
        assert_eq!(set.resolved(FontStyle::BoldItalic), FontStyle::Regular);
        assert_eq!(set.available().collect::<Vec<_>>(), vec![FontStyle::Regular]);
    }

    #[test]
    fn missing_regular_face_is_fatal() {
        let fetcher = MemoryFetcher::new().with("/ttf/Lato-Bold.ttf", b"bold".to_vec());
        let err = resolve_font_set_with(&fetcher, "Lato", load_probe).unwrap_err();
        assert!(matches!(err, FontError::MissingRegular { ref family, .. } if family == "Lato"));
    }

    #[test]
    fn unmeasurable_regular_face_is_fatal() {
        let fetcher = MemoryFetcher::new().with("/ttf/Lato-Regular.ttf", b"broken".to_vec());
        assert!(resolve_font_set_with(&fetcher, "Lato", load_probe).is_err());
    }

    #[test]
    fn style_flags_pick_the_face() {
        assert_eq!(FontStyle::from_flags(false, false), FontStyle::Regular);
        assert_eq!(FontStyle::from_flags(true, true), FontStyle::BoldItalic);
        assert_eq!(FontStyle::from_flags(false, true).file_suffix(), "Italic");
    }
}
