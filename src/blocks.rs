//! The markup-free content model the flow layout consumes.

use crate::config::TextAlign;
use serde::{Deserialize, Serialize};

/// Separator icons with artwork of their own; anything else uses the default ornament
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconKind {
    Default,
    Star,
    Heart,
    Cross,
    Dove,
}

impl IconKind {
    pub fn from_name(name: &str) -> IconKind {
        match name.trim().to_ascii_lowercase().as_str() {
            "star" => IconKind::Star,
            "heart" => IconKind::Heart,
            "cross" => IconKind::Cross,
            "dove" => IconKind::Dove,
            _ => IconKind::Default,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            IconKind::Default => "default",
            IconKind::Star => "star",
            IconKind::Heart => "heart",
            IconKind::Cross => "cross",
            IconKind::Dove => "dove",
        }
    }

    pub fn is_named(&self) -> bool {
        !matches!(self, IconKind::Default)
    }
}

/// One typed unit of content with its style frozen at normalization time.
///
/// Text may contain `\n` for hard line breaks; every hard line wraps on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ContentBlock {
    Heading {
        level: u8,
        text: String,
    },
    Paragraph {
        text: String,
        bold: bool,
        italic: bool,
        underline: bool,
        alignment: Option<TextAlign>,
        indent_level: u8,
    },
    Strophe {
        text: String,
        index: Option<u32>,
    },
    Refrain {
        text: String,
    },
    CopyrightLine {
        text: String,
    },
    Image {
        source_ref: String,
    },
    Separator {
        icon_kind: IconKind,
    },
    PageBreakMarker,
}

impl ContentBlock {
    /// A paragraph with default styling
    pub fn paragraph<S: Into<String>>(text: S) -> ContentBlock {
        ContentBlock::Paragraph {
            text: text.into(),
            bold: false,
            italic: false,
            underline: false,
            alignment: None,
            indent_level: 0,
        }
    }
}

/// The blocks of one document object (a song, a liturgy text, a free text...)
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentObject {
    pub blocks: Vec<ContentBlock>,
}

impl ContentObject {
    pub fn new(blocks: Vec<ContentBlock>) -> ContentObject {
        ContentObject { blocks }
    }
}

/// Everything that goes onto the sheet, in reading order
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentStream {
    pub objects: Vec<ContentObject>,
}

impl ContentStream {
    pub fn block_count(&self) -> usize {
        self.objects.iter().map(|o| o.blocks.len()).sum()
    }

    pub fn blocks(&self) -> impl Iterator<Item = &ContentBlock> {
        self.objects.iter().flat_map(|o| o.blocks.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_icon_names_use_the_default_ornament() {
        assert_eq!(IconKind::from_name(" Star "), IconKind::Star);
        assert_eq!(IconKind::from_name("dove"), IconKind::Dove);
        assert_eq!(IconKind::from_name("lily"), IconKind::Default);
        assert!(!IconKind::Default.is_named());
        assert_eq!(IconKind::Cross.name(), "cross");
    }

    #[test]
    fn blocks_read_back_from_json() {
        let json = r#"[
            {"kind": "separator", "icon_kind": "heart"},
            {"kind": "pageBreakMarker"},
            {"kind": "strophe", "text": "Lobe den Herren", "index": 2}
        ]"#;
        let blocks: Vec<ContentBlock> = serde_json::from_str(json).unwrap();
        assert_eq!(
            blocks,
            vec![
                ContentBlock::Separator {
                    icon_kind: IconKind::Heart
                },
                ContentBlock::PageBreakMarker,
                ContentBlock::Strophe {
                    text: "Lobe den Herren".to_string(),
                    index: Some(2),
                },
            ]
        );
    }

    #[test]
    fn block_count_spans_objects() {
        let stream = ContentStream {
            objects: vec![
                ContentObject::new(vec![ContentBlock::paragraph("a"), ContentBlock::PageBreakMarker]),
                ContentObject::new(vec![ContentBlock::paragraph("b")]),
            ],
        };
        assert_eq!(stream.block_count(), 3);
        assert_eq!(stream.blocks().count(), 3);
    }
}
