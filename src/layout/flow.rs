//! The flow layout engine: turns a [`ContentStream`] into logical pages.
//!
//! Content flows top to bottom. A running cursor tracks where the next element
//! starts; whenever the next line, image or ornament would reach below the
//! bottom margin a new page is started first. Lines are never split across a
//! page boundary.

use super::logical::{DrawCommand, LogicalPage, PaginatedDocument};
use super::spacing::*;
use super::text::{justify_offsets, wrap_text, Line};
use crate::blocks::{ContentBlock, ContentStream, IconKind};
use crate::config::{PageGeometry, StyleConfig, TextAlign};
use crate::error::ExportError;
use crate::fetch::{icon_url, AssetFetcher};
use crate::font::TextMeasure;
use crate::font_set::{FontSet, FontStyle};
use crate::image::Image;
use crate::progress::{CancellationToken, NoProgress, ProgressObserver};
use crate::rect::Rect;
use crate::units::*;
use std::collections::HashMap;

/// Slack allowed when checking whether a line still fits above the bottom margin
const FIT_TOLERANCE: Pt = Pt(1e-3);

/// How one text block is set
#[derive(Debug, Clone)]
struct TextOptions {
    size: Pt,
    style: FontStyle,
    align: TextAlign,
    indent: Pt,
    underline: bool,
    /// Drawn bold at the start of the first line, left of the indent
    marker: Option<String>,
}

/// Lays out a [`ContentStream`] with one style and font set.
///
/// ```no_run
/// # use liedblatt::*;
/// # fn run(stream: &ContentStream, fonts: &FontSet<Font>, fetcher: &DirectoryFetcher) -> Result<(), ExportError> {
/// let style = StyleConfig::default();
/// let paginated = FlowLayout::new(&style, fonts, fetcher).run(stream)?;
/// println!("{} pages", paginated.page_count());
/// # Ok(())
/// # }
/// ```
pub struct FlowLayout<'a, F: TextMeasure> {
    style: &'a StyleConfig,
    fonts: &'a FontSet<F>,
    fetcher: &'a dyn AssetFetcher,
    geometry: PageGeometry,
    spacing: Spacing,
    progress: &'a dyn ProgressObserver,
    cancellation: Option<&'a CancellationToken>,

    pages: Vec<LogicalPage>,
    images: Vec<Image>,
    /// Every URL fetched this run, with the image it produced or `None` if it failed
    assets: HashMap<String, Option<usize>>,
    cursor_y: Pt,
    /// Set when an object ended too close to the bottom; the next draw opens a page
    break_pending: bool,
}

impl<'a, F: TextMeasure> FlowLayout<'a, F> {
    pub fn new(
        style: &'a StyleConfig,
        fonts: &'a FontSet<F>,
        fetcher: &'a dyn AssetFetcher,
    ) -> FlowLayout<'a, F> {
        FlowLayout {
            style,
            fonts,
            fetcher,
            geometry: style.page_format.geometry(),
            spacing: Spacing::for_font_size(style.base_font_size),
            progress: &NoProgress,
            cancellation: None,
            pages: Vec::new(),
            images: Vec::new(),
            assets: HashMap::new(),
            cursor_y: Pt::ZERO,
            break_pending: false,
        }
    }

    /// Lay out onto a custom page instead of the configured format's
    pub fn with_geometry(mut self, geometry: PageGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn with_progress(mut self, progress: &'a dyn ProgressObserver) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_cancellation(mut self, token: &'a CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Lay out every block of the stream, consuming the engine
    pub fn run(mut self, stream: &ContentStream) -> Result<PaginatedDocument, ExportError> {
        self.start_page();
        self.logo();

        let total = stream.block_count().max(1);
        let mut done = 0;
        self.progress.report(0, "layout");

        for object in stream.objects.iter() {
            for block in object.blocks.iter() {
                if let Some(token) = self.cancellation {
                    token.check()?;
                }
                self.block(block)?;
                done += 1;
                self.progress.report((done * 100 / total) as u8, "layout");
            }
            self.end_object();
        }

        log::debug!(
            "laid out {} blocks onto {} pages",
            stream.block_count(),
            self.pages.len()
        );

        if let Some(page) = self.pages.last_mut() {
            page.cursor_y = self.cursor_y;
        }
        Ok(PaginatedDocument {
            geometry: self.geometry,
            pages: self.pages,
            images: self.images,
        })
    }

    fn block(&mut self, block: &ContentBlock) -> Result<(), ExportError> {
        let base = self.style.base_font_size;
        let align = self.style.text_align_default;

        match block {
            ContentBlock::Separator { icon_kind } => self.separator(icon_kind),
            ContentBlock::PageBreakMarker => {
                self.break_pending = false;
                self.start_page();
            }
            ContentBlock::Image { source_ref } => self.image(source_ref),
            ContentBlock::Heading { level, text } => {
                let options = TextOptions {
                    size: heading_size(base, *level),
                    style: FontStyle::Bold,
                    align: TextAlign::Center,
                    indent: Pt::ZERO,
                    underline: false,
                    marker: None,
                };
                self.text(text, &options)?;
                self.cursor_y -= self.spacing.heading_margin(*level);
            }
            ContentBlock::Paragraph {
                text,
                bold,
                italic,
                underline,
                alignment,
                indent_level,
            } => {
                let options = TextOptions {
                    size: base,
                    style: FontStyle::from_flags(*bold, *italic),
                    align: alignment.unwrap_or(align),
                    indent: self.spacing.indent_step * *indent_level as f32,
                    underline: *underline,
                    marker: None,
                };
                self.text(text, &options)?;
            }
            ContentBlock::Strophe { text, index } => {
                let options = TextOptions {
                    size: base,
                    style: FontStyle::Regular,
                    align,
                    indent: self.spacing.strophe_column,
                    underline: false,
                    marker: index.map(|i| format!("{i}.")),
                };
                self.text(text, &options)?;
                self.cursor_y -= self.spacing.strophe_spacing;
            }
            ContentBlock::Refrain { text } => {
                let options = TextOptions {
                    size: base,
                    style: FontStyle::Italic,
                    align,
                    indent: self.spacing.strophe_column,
                    underline: false,
                    marker: None,
                };
                self.text(text, &options)?;
                self.cursor_y -= self.spacing.strophe_spacing;
            }
            ContentBlock::CopyrightLine { text } => {
                let options = TextOptions {
                    size: COPYRIGHT_FONT_SIZE,
                    style: FontStyle::Regular,
                    align,
                    indent: Pt::ZERO,
                    underline: false,
                    marker: None,
                };
                self.cursor_y -= self.spacing.copyright_margin_top;
                self.text(text, &options)?;
                self.cursor_y -= self.spacing.copyright_margin_bottom;
            }
        }
        Ok(())
    }

    fn top(&self) -> Pt {
        self.geometry.height - self.geometry.margins.top
    }

    fn bottom(&self) -> Pt {
        self.geometry.margins.bottom
    }

    fn start_page(&mut self) {
        if let Some(page) = self.pages.last_mut() {
            page.cursor_y = self.cursor_y;
        }
        self.pages.push(LogicalPage::new(&self.geometry));
        self.cursor_y = self.top();
    }

    fn page_is_fresh(&self) -> bool {
        self.cursor_y >= self.top() && self.pages.last().map_or(true, LogicalPage::is_blank)
    }

    /// Open the page a finished object deferred, then make sure `height` fits
    fn make_room(&mut self, height: Pt) {
        if self.break_pending {
            self.break_pending = false;
            self.start_page();
        }
        if self.cursor_y - height < self.bottom() - FIT_TOLERANCE && !self.page_is_fresh() {
            self.start_page();
        }
    }

    fn draw(&mut self, command: DrawCommand) {
        if let Some(page) = self.pages.last_mut() {
            page.commands.push(command);
        }
    }

    fn end_object(&mut self) {
        self.cursor_y -= self.spacing.object_spacing;
        if self.cursor_y - self.style.body_line_height() < self.bottom() - FIT_TOLERANCE {
            self.break_pending = true;
        }
    }

    fn text(&mut self, text: &str, options: &TextOptions) -> Result<(), ExportError> {
        let fonts = self.fonts;
        let face = fonts.face(options.style);
        let style = fonts.resolved(options.style);
        let max_width = self.geometry.content_width() - options.indent;
        let line_height = options.size * self.style.line_height_multiplier;
        let left = self.geometry.margins.left + options.indent;

        let lines = wrap_text(face, options.size, text, max_width)?;
        for (i, line) in lines.iter().enumerate() {
            self.make_room(line_height);
            let baseline = self.cursor_y - options.size;

            if i == 0 {
                if let Some(marker) = &options.marker {
                    self.draw(DrawCommand::Text {
                        text: marker.clone(),
                        x: self.geometry.margins.left,
                        y: baseline,
                        size: options.size,
                        style: self.fonts.resolved(FontStyle::Bold),
                    });
                }
            }

            self.line(line, left, baseline, max_width, style, options);
            self.cursor_y -= line_height;
        }
        Ok(())
    }

    fn line(
        &mut self,
        line: &Line,
        left: Pt,
        baseline: Pt,
        max_width: Pt,
        style: FontStyle,
        options: &TextOptions,
    ) {
        if line.is_empty() {
            return;
        }

        let justified =
            options.align == TextAlign::Justify && !line.ends_paragraph && line.words.len() > 1;
        let (x, drawn_width) = match options.align {
            _ if justified => (left, max_width),
            TextAlign::Center => (left + (max_width - line.width) / 2.0, line.width),
            TextAlign::Right => (left + max_width - line.width, line.width),
            TextAlign::Left | TextAlign::Justify => (left, line.width),
        };

        if justified {
            for (word, offset) in line.words.iter().zip(justify_offsets(line, max_width)) {
                self.draw(DrawCommand::Text {
                    text: word.text.clone(),
                    x: x + offset,
                    y: baseline,
                    size: options.size,
                    style,
                });
            }
        } else {
            self.draw(DrawCommand::Text {
                text: line.text(),
                x,
                y: baseline,
                size: options.size,
                style,
            });
        }

        if options.underline {
            let y = baseline - UNDERLINE_OFFSET;
            self.draw(DrawCommand::Line {
                start: (x, y),
                end: (x + drawn_width, y),
                thickness: UNDERLINE_THICKNESS,
            });
        }
    }

    /// Fetch and decode an image once per run; failures are remembered too
    fn load_image(&mut self, url: &str, what: &str) -> Option<usize> {
        if let Some(cached) = self.assets.get(url) {
            return *cached;
        }

        let loaded = match self.fetcher.fetch(url) {
            Ok(bytes) => Image::from_bytes(bytes).map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        let entry = match loaded {
            Ok(image) => {
                self.images.push(image);
                Some(self.images.len() - 1)
            }
            Err(e) => {
                log::warn!("skipping {what} '{url}': {e}");
                None
            }
        };
        self.assets.insert(url.to_string(), entry);
        entry
    }

    fn logo(&mut self) {
        let Some(logo_ref) = self.style.logo_ref.clone() else {
            return;
        };
        let Some(index) = self.load_image(&logo_ref, "logo") else {
            return;
        };

        let width = self.spacing.logo_width.min(self.geometry.content_width());
        let max_height = self.geometry.content_height() - self.spacing.logo_margin;
        let (width, height) = fit_below(width, self.images[index].aspect_ratio(), max_height);
        self.place_centered(index, width, height);
        self.cursor_y -= height + self.spacing.logo_margin;
    }

    fn separator(&mut self, kind: &IconKind) {
        let url = icon_url(kind.name());
        let Some(index) = self.load_image(&url, "separator icon") else {
            let gap = self.spacing.icon_size + self.spacing.icon_margin;
            self.make_room(gap);
            self.cursor_y -= gap;
            return;
        };

        let aspect = self.images[index].aspect_ratio();
        let (width, height) = if kind.is_named() {
            // fit into a square of the icon size
            let size = self.spacing.icon_size;
            if aspect > 1.0 {
                (size / aspect, size)
            } else {
                (size, size * aspect)
            }
        } else {
            let width = DEFAULT_ICON_WIDTH.min(self.geometry.content_width());
            let max_height = self.geometry.content_height() - self.spacing.icon_margin;
            fit_below(width, aspect, max_height)
        };

        self.make_room(height);
        self.place_centered(index, width, height);
        self.cursor_y -= height + self.spacing.icon_margin;
    }

    fn image(&mut self, source_ref: &str) {
        let margin_top = self.spacing.image_margin_top;
        let margin_bottom = self.spacing.image_margin_bottom;

        let Some(index) = self.load_image(source_ref, "image") else {
            self.make_room(margin_top + margin_bottom);
            self.cursor_y -= margin_top + margin_bottom;
            return;
        };

        // an image alone on a page must still fit below its top margin
        let max_height = self.geometry.content_height() - margin_top;
        let (width, height) = fit_below(
            self.geometry.content_width(),
            self.images[index].aspect_ratio(),
            max_height,
        );

        self.make_room(margin_top + height);
        self.cursor_y -= margin_top;
        self.place_centered(index, width, height);
        self.cursor_y -= height + margin_bottom;
    }

    /// Draw an image horizontally centered with its top edge at the cursor
    fn place_centered(&mut self, image: usize, width: Pt, height: Pt) {
        let x = self.geometry.margins.left + (self.geometry.content_width() - width) / 2.0;
        let rect = Rect::from_origin_size(x, self.cursor_y - height, width, height);
        self.draw(DrawCommand::Image { image, rect });
    }
}

/// Size an image `width` wide, shrinking it so its height stays within `max_height`
fn fit_below(width: Pt, aspect: f32, max_height: Pt) -> (Pt, Pt) {
    let height = width * aspect;
    if height > max_height {
        (max_height / aspect, max_height)
    } else {
        (width, height)
    }
}
