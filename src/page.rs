use crate::content::{render_contents, write_resources};
use crate::font::Font;
use crate::form_xobject::{FormXObject, FormXObjectLayout};
use crate::image::Image;
use crate::layout::Margins;
use crate::pagesize::PageSize;
use crate::rect::Rect;
use crate::refs::{ObjectReferences, RefType};
use crate::units::*;
use id_arena::{Arena, Id};
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use pdf_writer::{Filter, Finish, Pdf};

/// Which font a span is set in, and how big
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SpanFont {
    pub id: Id<Font>,
    pub size: Pt,
}

/// A run of text drawn from a baseline origin
#[derive(Clone, PartialEq, Debug)]
pub struct SpanLayout {
    pub text: String,
    pub font: SpanFont,
    pub coords: (Pt, Pt),
}

/// An image drawn into a rectangle
#[derive(Clone, PartialEq, Debug)]
pub struct ImageLayout {
    pub image_id: Id<Image>,
    pub position: Rect,
}

/// A straight stroked rule
#[derive(Clone, PartialEq, Debug)]
pub struct LineLayout {
    pub start: (Pt, Pt),
    pub end: (Pt, Pt),
    pub thickness: Pt,
}

#[derive(Debug)]
pub enum PageContents {
    Text(Vec<SpanLayout>),
    Image(ImageLayout),
    Line(LineLayout),
    FormXObject(FormXObjectLayout),
}

#[derive(Debug)]
pub struct Page {
    /// The size of the page
    pub media_box: Rect,
    /// Where content can live, i.e. within the margins
    pub content_box: Rect,
    /// Everything drawn on the page, in painting order
    pub contents: Vec<PageContents>,
}

impl Page {
    pub fn new(size: PageSize, margins: Option<Margins>) -> Page {
        let (width, height) = size;
        Page {
            media_box: Rect::from_origin_size(Pt::ZERO, Pt::ZERO, width, height),
            content_box: margins.unwrap_or_default().content_box(size),
            contents: Vec::default(),
        }
    }

    pub fn add_form_xobject(&mut self, layout: FormXObjectLayout) {
        self.contents.push(PageContents::FormXObject(layout));
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn write(
        &self,
        refs: &mut ObjectReferences,
        page_index: usize,
        fonts: &Arena<Font>,
        images: &Arena<Image>,
        form_xobjects: &Arena<FormXObject>,
        writer: &mut Pdf,
    ) -> Result<(), std::io::Error> {
        let rendered = render_contents(&self.contents, fonts)?;
        let compressed =
            compress_to_vec_zlib(&rendered, CompressionLevel::DefaultCompression as u8);

        let id = refs.get_or_gen(RefType::Page(page_index));
        let page_tree_id = refs.get_or_gen(RefType::PageTree);
        let content_id = refs.gen(RefType::ContentForPage(page_index));

        let mut page = writer.page(id);
        page.media_box(self.media_box.into());
        page.art_box(self.content_box.into());
        page.parent(page_tree_id);
        write_resources(page.resources(), refs, fonts, images, form_xobjects);
        page.contents(content_id);
        page.finish();

        writer
            .stream(content_id, compressed.as_slice())
            .filter(Filter::FlateDecode);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagesize;

    #[test]
    fn content_box_sits_inside_the_margins() {
        let page = Page::new(pagesize::A5, Some(Margins::all(Pt(20.0))));
        assert_eq!(page.media_box.width(), pagesize::A5.0);
        assert_eq!(page.content_box.x1, Pt(20.0));
        assert_eq!(page.content_box.y2, pagesize::A5.1 - Pt(20.0));
        assert_eq!(page.content_box.width(), pagesize::A5.0 - Pt(40.0));
    }

    #[test]
    fn no_margins_means_full_bleed() {
        let page = Page::new(pagesize::A4, None);
        assert_eq!(page.content_box, page.media_box);
    }
}
