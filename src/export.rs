//! Output assembly: runs the whole pipeline and renders the PDF.
//!
//! Fonts are resolved first, then the content is normalized and laid out into
//! logical pages, padded to an even count, optionally imposed onto sheets, and
//! finally written with the PDF object layer.

use crate::blocks::ContentStream;
use crate::config::{PageFormat, StyleConfig};
use crate::document::Document;
use crate::error::ExportError;
use crate::fetch::AssetFetcher;
use crate::font::Font;
use crate::font_set::{resolve_font_set, FontSet};
use crate::form_xobject::{FormXObject, FormXObjectLayout};
use crate::image::Image;
use crate::impose::{imposition_scheme, pad_to_even, place_sheets};
use crate::info::Info;
use crate::layout::{DrawCommand, FlowLayout, LogicalPage, PaginatedDocument};
use crate::normalize::{normalize, ContentNode};
use crate::page::{ImageLayout, LineLayout, Page, PageContents, SpanFont, SpanLayout};
use crate::progress::{CancellationToken, NoProgress, ProgressObserver, ProgressRange};
use id_arena::Id;

/// A finished export
#[derive(Debug)]
pub struct ExportArtifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
    /// Logical pages, after padding
    pub page_count: usize,
    /// Pages of the written PDF
    pub sheet_count: usize,
}

/// File name an export is offered under
pub fn file_name(format: PageFormat, brochure: bool) -> String {
    if brochure {
        format!("liedblatt_brochure_{}.pdf", format.key())
    } else {
        format!("liedblatt_{}.pdf", format.key())
    }
}

/// Runs exports for one style configuration
pub struct Exporter<'a> {
    style: &'a StyleConfig,
    fetcher: &'a dyn AssetFetcher,
    progress: &'a dyn ProgressObserver,
    cancellation: Option<&'a CancellationToken>,
}

impl<'a> Exporter<'a> {
    pub fn new(style: &'a StyleConfig, fetcher: &'a dyn AssetFetcher) -> Exporter<'a> {
        Exporter {
            style,
            fetcher,
            progress: &NoProgress,
            cancellation: None,
        }
    }

    pub fn with_progress(mut self, progress: &'a dyn ProgressObserver) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_cancellation(mut self, token: &'a CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    fn check_cancelled(&self) -> Result<(), ExportError> {
        match self.cancellation {
            Some(token) => token.check(),
            None => Ok(()),
        }
    }

    /// Export a content tree
    pub fn export(&self, content: &ContentNode, brochure: bool) -> Result<ExportArtifact, ExportError> {
        self.check_cancelled()?;
        let stream = normalize(content);
        log::debug!(
            "normalized content into {} objects, {} blocks",
            stream.objects.len(),
            stream.block_count()
        );
        self.export_stream(&stream, brochure)
    }

    /// Export already normalized content
    pub fn export_stream(
        &self,
        stream: &ContentStream,
        brochure: bool,
    ) -> Result<ExportArtifact, ExportError> {
        self.style.validate()?;
        let format = self.style.page_format;

        self.check_cancelled()?;
        self.progress.report(0, "fonts");
        let fonts = resolve_font_set(self.fetcher, &self.style.font_family)?;

        self.check_cancelled()?;
        let layout_progress = ProgressRange {
            observer: self.progress,
            start: 10,
            end: 70,
        };
        let mut layout = FlowLayout::new(self.style, &fonts, self.fetcher).with_progress(&layout_progress);
        if let Some(token) = self.cancellation {
            layout = layout.with_cancellation(token);
        }
        let mut paginated = layout.run(stream)?;
        pad_to_even(&mut paginated);
        let page_count = paginated.page_count();

        self.check_cancelled()?;
        self.progress.report(70, if brochure { "imposition" } else { "rendering" });
        let mut document = Document::default();
        document.set_info(Info::for_export(format, brochure));

        let font_ids = embed_fonts(&mut document, fonts);
        if brochure {
            render_imposed(&mut document, paginated, &font_ids, format)?;
        } else {
            render_paginated(&mut document, paginated, &font_ids);
        }
        let sheet_count = document.page_count();

        self.check_cancelled()?;
        self.progress.report(85, "writing");
        let bytes = document.to_bytes()?;
        self.progress.report(100, "done");

        let file_name = file_name(format, brochure);
        log::info!(
            "exported {file_name}: {page_count} pages on {sheet_count} sheets, {} bytes",
            bytes.len()
        );
        Ok(ExportArtifact {
            file_name,
            bytes,
            page_count,
            sheet_count,
        })
    }
}

/// Add every available face to the document; missing styles map to the regular face
pub fn embed_fonts(document: &mut Document, fonts: FontSet<Font>) -> FontSet<Id<Font>> {
    let FontSet {
        regular,
        bold,
        italic,
        bold_italic,
    } = fonts;

    FontSet {
        regular: document.add_font(regular),
        bold: bold.map(|face| document.add_font(face)),
        italic: italic.map(|face| document.add_font(face)),
        bold_italic: bold_italic.map(|face| document.add_font(face)),
    }
}

fn embed_images(document: &mut Document, images: Vec<Image>) -> Vec<Id<Image>> {
    images
        .into_iter()
        .map(|image| document.add_image(image))
        .collect()
}

/// Translate the draw commands of a logical page into PDF page contents
fn page_contents(
    page: &LogicalPage,
    fonts: &FontSet<Id<Font>>,
    images: &[Id<Image>],
) -> Vec<PageContents> {
    page.commands
        .iter()
        .filter_map(|command| match command {
            DrawCommand::Text {
                text,
                x,
                y,
                size,
                style,
            } => Some(PageContents::Text(vec![SpanLayout {
                text: text.clone(),
                font: SpanFont {
                    id: *fonts.face(*style),
                    size: *size,
                },
                coords: (*x, *y),
            }])),
            DrawCommand::Image { image, rect } => images.get(*image).map(|id| {
                PageContents::Image(ImageLayout {
                    image_id: *id,
                    position: *rect,
                })
            }),
            DrawCommand::Line {
                start,
                end,
                thickness,
            } => Some(PageContents::Line(LineLayout {
                start: *start,
                end: *end,
                thickness: *thickness,
            })),
        })
        .collect()
}

/// One PDF page per logical page
pub fn render_paginated(
    document: &mut Document,
    paginated: PaginatedDocument,
    fonts: &FontSet<Id<Font>>,
) {
    let PaginatedDocument {
        geometry,
        pages,
        images,
    } = paginated;
    let image_ids = embed_images(document, images);

    for logical in pages.iter() {
        let mut page = Page::new(geometry.size(), Some(geometry.margins.clone()));
        page.contents = page_contents(logical, fonts, &image_ids);
        document.add_page(page);
    }
}

/// Logical pages become forms placed onto the sheets of the format's scheme
pub fn render_imposed(
    document: &mut Document,
    paginated: PaginatedDocument,
    fonts: &FontSet<Id<Font>>,
    format: PageFormat,
) -> Result<(), ExportError> {
    let PaginatedDocument {
        geometry,
        pages,
        images,
    } = paginated;
    let image_ids = embed_images(document, images);

    let forms: Vec<Id<FormXObject>> = pages
        .iter()
        .map(|logical| {
            let mut form = FormXObject::for_page(geometry.size());
            form.contents = page_contents(logical, fonts, &image_ids);
            document.add_form_xobject(form)
        })
        .collect();

    let sheets = imposition_scheme(pages.len(), format.family())?;
    for layout in place_sheets(&sheets, format.sheet_size(), geometry.size()) {
        let mut sheet = Page::new(layout.size, None);
        for placement in layout.placements {
            let xobj_id = *forms.get(placement.page).ok_or(ExportError::PageMissing)?;
            sheet.add_form_xobject(FormXObjectLayout {
                xobj_id,
                transform: placement.transform,
            });
        }
        document.add_page(sheet);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_carry_the_format() {
        assert_eq!(file_name(PageFormat::A5, false), "liedblatt_a5.pdf");
        assert_eq!(
            file_name(PageFormat::NarrowA4, true),
            "liedblatt_brochure_narrow-a4.pdf"
        );
        assert_eq!(file_name(PageFormat::Dl, true), "liedblatt_brochure_dl.pdf");
    }
}
