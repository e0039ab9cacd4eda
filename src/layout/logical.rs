use crate::config::PageGeometry;
use crate::font_set::FontStyle;
use crate::image::Image;
use crate::rect::Rect;
use crate::units::Pt;

/// One drawing operation on a logical page, in the page's own coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Text drawn from its baseline origin
    Text {
        text: String,
        x: Pt,
        y: Pt,
        size: Pt,
        style: FontStyle,
    },
    /// An entry of [`PaginatedDocument::images`] drawn into `rect`
    Image { image: usize, rect: Rect },
    Line {
        start: (Pt, Pt),
        end: (Pt, Pt),
        thickness: Pt,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogicalPage {
    pub commands: Vec<DrawCommand>,
    /// Where the next element would start
    pub cursor_y: Pt,
}

impl LogicalPage {
    pub fn new(geometry: &PageGeometry) -> LogicalPage {
        LogicalPage {
            commands: Vec::new(),
            cursor_y: geometry.height - geometry.margins.top,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.commands.is_empty()
    }

    /// Text of every text command, in drawing order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// The laid out document: an ordered list of logical pages of one geometry,
/// plus the decoded images the pages refer to
#[derive(Debug)]
pub struct PaginatedDocument {
    pub geometry: PageGeometry,
    pub pages: Vec<LogicalPage>,
    pub images: Vec<Image>,
}

impl PaginatedDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Append an empty page
    pub fn push_blank_page(&mut self) {
        let page = LogicalPage::new(&self.geometry);
        self.pages.push(page);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PageFormat;

    #[test]
    fn new_pages_start_below_the_top_margin() {
        let geometry = PageFormat::Dl.geometry();
        let page = LogicalPage::new(&geometry);
        assert!(page.is_blank());
        assert_eq!(page.cursor_y, geometry.height - geometry.margins.top);
    }

    #[test]
    fn texts_skip_other_commands() {
        let geometry = PageFormat::A5.geometry();
        let mut page = LogicalPage::new(&geometry);
        page.commands.push(DrawCommand::Line {
            start: (Pt(0.0), Pt(0.0)),
            end: (Pt(10.0), Pt(0.0)),
            thickness: Pt(0.5),
        });
        page.commands.push(DrawCommand::Text {
            text: "Halleluja".to_string(),
            x: Pt(40.0),
            y: Pt(500.0),
            size: Pt(14.0),
            style: FontStyle::Regular,
        });
        assert_eq!(page.texts().collect::<Vec<_>>(), vec!["Halleluja"]);

        let mut document = PaginatedDocument {
            geometry,
            pages: vec![page],
            images: Vec::new(),
        };
        document.push_blank_page();
        assert_eq!(document.page_count(), 2);
        assert!(document.pages[1].is_blank());
    }
}
