//! Reduces the editor's element tree to a [`ContentStream`].
//!
//! The tree is the editor's document serialized as JSON: elements carry their
//! tag, classes, attributes, and the computed style the editor resolved for
//! them. Every child of the root is one document object. Style is read once,
//! here, and frozen into the produced blocks.

use crate::blocks::{ContentBlock, ContentObject, ContentStream, IconKind};
use crate::config::TextAlign;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Style the editor computed for an element
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComputedStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub align: Option<TextAlign>,
    pub indent: u8,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Element {
    pub tag: String,
    pub classes: Vec<String>,
    pub attrs: HashMap<String, String>,
    pub style: ComputedStyle,
    pub children: Vec<ContentNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentNode {
    Text { text: String },
    Element(Element),
}

impl ContentNode {
    pub fn text<S: Into<String>>(text: S) -> ContentNode {
        ContentNode::Text { text: text.into() }
    }

    pub fn element<S: Into<String>>(tag: S, children: Vec<ContentNode>) -> ContentNode {
        ContentNode::Element(Element {
            tag: tag.into(),
            children,
            ..Default::default()
        })
    }

    /// Add a class; no-op on text nodes
    pub fn class<S: Into<String>>(mut self, class: S) -> ContentNode {
        if let ContentNode::Element(el) = &mut self {
            el.classes.push(class.into());
        }
        self
    }

    /// Set an attribute; no-op on text nodes
    pub fn attr<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> ContentNode {
        if let ContentNode::Element(el) = &mut self {
            el.attrs.insert(key.into(), value.into());
        }
        self
    }

    /// Replace the computed style; no-op on text nodes
    pub fn styled(mut self, style: ComputedStyle) -> ContentNode {
        if let ContentNode::Element(el) = &mut self {
            el.style = style;
        }
        self
    }

    pub fn from_json(json: &str) -> Result<ContentNode, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Element {
    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c.eq_ignore_ascii_case(class))
    }

    fn tag(&self) -> String {
        self.tag.to_ascii_lowercase()
    }

    fn is_bold(&self) -> bool {
        self.style.bold || matches!(self.tag().as_str(), "b" | "strong")
    }

    fn is_italic(&self) -> bool {
        self.style.italic || matches!(self.tag().as_str(), "i" | "em")
    }

    fn is_underline(&self) -> bool {
        self.style.underline || self.tag() == "u"
    }
}

const BLOCK_TAGS: &[&str] = &[
    "p", "li", "blockquote", "pre", "div", "section", "article", "ul", "ol", "body", "main",
    "h1", "h2", "h3", "h4", "h5", "h6", "img", "hr", "figure",
];

const TEXT_BLOCK_TAGS: &[&str] = &["p", "li", "blockquote", "pre", "h4", "h5", "h6"];

fn strophe_marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(r"^\d+\.$").expect("strophe marker pattern is valid"))
}

/// One run of inline text with the style flags it inherited
#[derive(Debug)]
struct Run {
    text: String,
    bold: bool,
    italic: bool,
    underline: bool,
}

#[derive(Debug, Default, Clone, Copy)]
struct Inherited {
    bold: bool,
    italic: bool,
    underline: bool,
}

/// Normalize a whole document. Each child of the root becomes one object;
/// a root that is itself a block of text (a leaf, a text tag or nothing but
/// inline children) is treated as a single object.
pub fn normalize(root: &ContentNode) -> ContentStream {
    let children: Vec<&ContentNode> = match root {
        ContentNode::Element(el)
            if !is_leaf_block(el)
                && !TEXT_BLOCK_TAGS.contains(&el.tag().as_str())
                && holds_blocks(el) =>
        {
            el.children.iter().collect()
        }
        node => vec![node],
    };

    let objects: Vec<ContentObject> = children
        .into_iter()
        .map(|child| {
            let mut blocks = Vec::new();
            collect_blocks(child, &mut blocks);
            ContentObject::new(blocks)
        })
        .filter(|object| !object.blocks.is_empty())
        .collect();

    log::debug!(
        "normalized {} objects with {} blocks",
        objects.len(),
        objects.iter().map(|o| o.blocks.len()).sum::<usize>()
    );
    ContentStream { objects }
}

/// Elements that become exactly one block regardless of their children
fn is_leaf_block(el: &Element) -> bool {
    el.has_class("page-break")
        || el.attrs.contains_key("data-page-break")
        || el.has_class("separator")
        || el.has_class("icon")
        || el.attrs.contains_key("data-icon")
        || matches!(el.tag().as_str(), "img" | "h1" | "h2" | "h3")
        || el.has_class("strophe")
        || el.has_class("refrain")
        || el.has_class("copyright")
}

fn is_block(node: &ContentNode) -> bool {
    match node {
        ContentNode::Element(el) => BLOCK_TAGS.contains(&el.tag().as_str()) || is_leaf_block(el),
        ContentNode::Text { .. } => false,
    }
}

fn holds_blocks(el: &Element) -> bool {
    el.children.iter().any(is_block)
}

fn collect_blocks(node: &ContentNode, out: &mut Vec<ContentBlock>) {
    let el = match node {
        ContentNode::Text { text } => {
            if !text.trim().is_empty() {
                out.push(ContentBlock::paragraph(collapse_whitespace(text)));
            }
            return;
        }
        ContentNode::Element(el) => el,
    };
    let tag = el.tag();

    if el.has_class("page-break") || el.attrs.contains_key("data-page-break") {
        out.push(ContentBlock::PageBreakMarker);
        return;
    }

    if el.has_class("separator") || el.has_class("icon") || el.attrs.contains_key("data-icon") {
        let kind = el
            .attrs
            .get("data-icon")
            .map(|name| IconKind::from_name(name))
            .unwrap_or(IconKind::Default);
        out.push(ContentBlock::Separator { icon_kind: kind });
        return;
    }

    match tag.as_str() {
        "img" => {
            match el.attrs.get("src").filter(|src| !src.trim().is_empty()) {
                Some(src) => out.push(ContentBlock::Image {
                    source_ref: src.clone(),
                }),
                None => log::debug!("dropping image without a source"),
            }
            return;
        }
        "h1" | "h2" | "h3" => {
            let level = tag[1..].parse::<u8>().unwrap_or(1);
            let (text, _) = inline_text(el);
            out.push(ContentBlock::Heading { level, text });
            return;
        }
        "br" | "hr" => return,
        _ => {}
    }

    if el.has_class("strophe") {
        let (text, index) = inline_text(el);
        out.push(ContentBlock::Strophe { text, index });
        return;
    }
    if el.has_class("refrain") {
        let (text, _) = inline_text(el);
        out.push(ContentBlock::Refrain { text });
        return;
    }
    if el.has_class("copyright") {
        let (text, _) = inline_text(el);
        out.push(ContentBlock::CopyrightLine { text });
        return;
    }

    if TEXT_BLOCK_TAGS.contains(&tag.as_str()) || !holds_blocks(el) {
        if let Some(block) = paragraph(el) {
            out.push(block);
        }
        return;
    }

    // mixed containers: consecutive inline children are grouped into paragraphs
    let mut inline: Vec<ContentNode> = Vec::new();
    for child in el.children.iter() {
        if is_block(child) {
            flush_inline(el, &mut inline, out);
            collect_blocks(child, out);
        } else {
            inline.push(child.clone());
        }
    }
    flush_inline(el, &mut inline, out);
}

fn flush_inline(parent: &Element, inline: &mut Vec<ContentNode>, out: &mut Vec<ContentBlock>) {
    if inline.is_empty() {
        return;
    }
    let wrapper = Element {
        tag: "p".to_string(),
        classes: Vec::new(),
        attrs: HashMap::new(),
        style: parent.style.clone(),
        children: std::mem::take(inline),
    };
    if let Some(block) = paragraph(&wrapper) {
        out.push(block);
    }
}

/// Build a paragraph, or a strophe when it opens with a numbered marker
fn paragraph(el: &Element) -> Option<ContentBlock> {
    let mut runs = Vec::new();
    gather_runs(el, Inherited::default(), &mut runs);
    let index = take_strophe_marker(&mut runs);
    let text = join_runs(&runs);

    if let Some(index) = index {
        return Some(ContentBlock::Strophe {
            text,
            index: Some(index),
        });
    }

    let visible: Vec<&Run> = runs.iter().filter(|r| !r.text.trim().is_empty()).collect();
    if visible.is_empty() && el.children.is_empty() {
        return None;
    }
    let uniform = |flag: fn(&Run) -> bool| !visible.is_empty() && visible.iter().all(|r| flag(r));

    Some(ContentBlock::Paragraph {
        text,
        bold: el.style.bold || uniform(|r| r.bold),
        italic: el.style.italic || uniform(|r| r.italic),
        underline: el.style.underline || uniform(|r| r.underline),
        alignment: el.style.align,
        indent_level: el.style.indent,
    })
}

/// Text of an element plus the strophe number of a leading marker, if any
fn inline_text(el: &Element) -> (String, Option<u32>) {
    let mut runs = Vec::new();
    gather_runs(el, Inherited::default(), &mut runs);
    let index = take_strophe_marker(&mut runs);
    (join_runs(&runs), index)
}

fn gather_runs(el: &Element, inherited: Inherited, runs: &mut Vec<Run>) {
    let style = Inherited {
        bold: inherited.bold || el.is_bold(),
        italic: inherited.italic || el.is_italic(),
        underline: inherited.underline || el.is_underline(),
    };
    for child in el.children.iter() {
        match child {
            ContentNode::Text { text } => runs.push(Run {
                text: text.clone(),
                bold: style.bold,
                italic: style.italic,
                underline: style.underline,
            }),
            ContentNode::Element(child) if child.tag() == "br" => runs.push(Run {
                text: "\n".to_string(),
                bold: style.bold,
                italic: style.italic,
                underline: style.underline,
            }),
            ContentNode::Element(child) => gather_runs(child, style, runs),
        }
    }
}

/// Drop the first visible run when it is a bold `N.` marker, returning N
fn take_strophe_marker(runs: &mut Vec<Run>) -> Option<u32> {
    let first = runs.iter().position(|r| !r.text.trim().is_empty())?;
    let candidate = runs[first].text.trim();
    if !runs[first].bold || !strophe_marker().is_match(candidate) {
        return None;
    }
    let number = candidate.trim_end_matches('.').parse::<u32>().ok()?;
    runs.remove(first);
    Some(number)
}

fn join_runs(runs: &[Run]) -> String {
    let joined: String = runs.iter().map(|r| r.text.as_str()).collect();
    collapse_whitespace(&joined)
}

/// Collapse whitespace runs within each hard line and trim the lines
pub fn collapse_whitespace(text: &str) -> String {
    let lines: Vec<String> = text
        .replace("\r\n", "\n")
        .split('\n')
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect();

    // leading and trailing empty lines carry no content
    let start = lines.iter().position(|l| !l.is_empty()).unwrap_or(lines.len());
    let end = lines.iter().rposition(|l| !l.is_empty()).map(|i| i + 1).unwrap_or(start);
    lines[start..end].join("\n")
}
