//! Form XObjects for reusable PDF content with transformation support.
//!
//! Booklet output renders every logical page into one form, then places the
//! forms on physical sheets with a scale and translate transform. The form
//! keeps its own coordinate system with (0, 0) at the bottom-left, so a page
//! laid out for A5 draws the same no matter where it lands on the sheet.

use crate::content::{render_contents, write_resources};
use crate::font::Font;
use crate::image::Image;
use crate::page::PageContents;
use crate::pagesize::PageSize;
use crate::rect::Rect;
use crate::refs::{ObjectReferences, RefType};
use crate::transform::Transform;
use crate::units::*;
use id_arena::{Arena, Id};
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use pdf_writer::{Filter, Pdf};

/// A self-contained content container that can be placed on pages with a transform
#[derive(Debug)]
pub struct FormXObject {
    /// Bounding box of the form content
    pub bbox: Rect,
    /// Content to render (same types as Page)
    pub contents: Vec<PageContents>,
}

impl FormXObject {
    /// Create a new Form XObject with the given dimensions
    pub fn new(width: Pt, height: Pt) -> Self {
        FormXObject {
            bbox: Rect::from_origin_size(Pt::ZERO, Pt::ZERO, width, height),
            contents: Vec::new(),
        }
    }

    /// An empty form covering a whole logical page
    pub fn for_page(size: PageSize) -> Self {
        let (width, height) = size;
        FormXObject::new(width, height)
    }

    /// Write this form using the ref pre-generated for it, so forms and pages
    /// can reference each other regardless of write order
    pub(crate) fn write_with_ref(
        &self,
        refs: &mut ObjectReferences,
        xobj_index: usize,
        fonts: &Arena<Font>,
        images: &Arena<Image>,
        form_xobjects: &Arena<FormXObject>,
        writer: &mut Pdf,
    ) -> Result<(), std::io::Error> {
        let xobj_ref = refs.get_or_gen(RefType::FormXObject(xobj_index));

        let rendered = render_contents(&self.contents, fonts)?;
        let compressed =
            compress_to_vec_zlib(&rendered, CompressionLevel::DefaultCompression as u8);

        let mut xobj = writer.form_xobject(xobj_ref, &compressed);
        xobj.filter(Filter::FlateDecode);
        xobj.bbox(self.bbox.into());
        write_resources(xobj.resources(), refs, fonts, images, form_xobjects);

        Ok(())
    }
}

/// Where and how a Form XObject is drawn on a page
#[derive(Debug)]
pub struct FormXObjectLayout {
    pub xobj_id: Id<FormXObject>,
    /// Transformation matrix applied when rendering this placement
    pub transform: Transform,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagesize;

    #[test]
    fn page_forms_cover_the_whole_page() {
        let form = FormXObject::for_page(pagesize::DL);
        assert_eq!(form.bbox.x1, Pt::ZERO);
        assert_eq!(form.bbox.y1, Pt::ZERO);
        assert_eq!(form.bbox.width(), pagesize::DL.0);
        assert_eq!(form.bbox.height(), pagesize::DL.1);
        assert!(form.contents.is_empty());
    }

    #[test]
    fn empty_forms_write_a_flate_stream() {
        let fonts = Arena::new();
        let images = Arena::new();
        let mut forms: Arena<FormXObject> = Arena::new();
        forms.alloc(FormXObject::for_page(pagesize::A5));

        let mut refs = ObjectReferences::new();
        let mut pdf = Pdf::new();
        for (id, form) in forms.iter() {
            form.write_with_ref(&mut refs, id.index(), &fonts, &images, &forms, &mut pdf)
                .unwrap();
        }
        let bytes = pdf.finish();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Subtype /Form"));
        assert!(text.contains("/Filter /FlateDecode"));
        assert!(text.contains("/X0"));
    }
}
