use crate::{
    error::ExportError,
    font::Font,
    form_xobject::FormXObject,
    image::Image,
    info::Info,
    page::Page,
    refs::{ObjectReferences, RefType},
};
use id_arena::{Arena, Id};
use pdf_writer::{Finish, Pdf, Ref};
use std::io::Write;

#[derive(Default)]
/// A document is the main object that stores all the contents of the PDF
/// then renders it out with a call to [Document::write]
pub struct Document {
    pub info: Option<Info>,
    pub pages: Arena<Page>,
    pub page_order: Vec<Id<Page>>,
    pub fonts: Arena<Font>,
    pub images: Arena<Image>,
    pub form_xobjects: Arena<FormXObject>,
}

impl Document {
    /// Sets information about the document. If not provided, no information block will be
    /// written to the PDF
    pub fn set_info(&mut self, info: Info) {
        self.info = Some(info);
    }

    /// Add a page to the end of the document
    pub fn add_page(&mut self, page: Page) -> Id<Page> {
        let id = self.pages.alloc(page);
        self.page_order.push(id);
        id
    }

    pub fn page_count(&self) -> usize {
        self.page_order.len()
    }

    /// Add a font to the document. Fonts are shared by every page and form.
    pub fn add_font(&mut self, font: Font) -> Id<Font> {
        self.fonts.alloc(font)
    }

    /// Add an image to the document. Images are shared by every page and form.
    pub fn add_image(&mut self, image: Image) -> Id<Image> {
        self.images.alloc(image)
    }

    /// Add a Form XObject, to be placed on pages with a
    /// [`FormXObjectLayout`](crate::FormXObjectLayout)
    pub fn add_form_xobject(&mut self, form: FormXObject) -> Id<FormXObject> {
        self.form_xobjects.alloc(form)
    }

    /// Write the entire document to the writer. The whole document is rendered in
    /// memory first; object references are only resolved here.
    pub fn write<W: Write>(self, mut w: W) -> Result<(), ExportError> {
        let Document {
            info,
            pages,
            page_order,
            fonts,
            images,
            form_xobjects,
        } = self;

        let mut refs = ObjectReferences::new();

        let catalog_id = refs.gen(RefType::Catalog);
        let page_tree_id = refs.gen(RefType::PageTree);

        let mut writer = Pdf::new();
        if let Some(info) = info {
            info.write(&mut refs, &mut writer);
        }

        let page_refs: Vec<Ref> = (0..page_order.len())
            .map(|i| refs.gen(RefType::Page(i)))
            .collect();

        writer
            .pages(page_tree_id)
            .count(page_refs.len() as i32)
            .kids(page_refs);

        for (id, font) in fonts.iter() {
            font.write(&mut refs, id, &mut writer);
        }

        for (id, image) in images.iter() {
            image.write(&mut refs, id.index(), &mut writer);
        }

        // forms are written after every ref they could name exists
        for (id, _) in form_xobjects.iter() {
            refs.gen(RefType::FormXObject(id.index()));
        }

        for (id, xobj) in form_xobjects.iter() {
            xobj.write_with_ref(
                &mut refs,
                id.index(),
                &fonts,
                &images,
                &form_xobjects,
                &mut writer,
            )?;
        }

        for (page_index, id) in page_order.iter().enumerate() {
            let page = pages.get(*id).ok_or(ExportError::PageMissing)?;
            page.write(
                &mut refs,
                page_index,
                &fonts,
                &images,
                &form_xobjects,
                &mut writer,
            )?;
        }

        let mut catalog = writer.catalog(catalog_id);
        catalog.pages(page_tree_id);
        catalog.finish();

        w.write_all(writer.finish().as_slice()).map_err(Into::into)
    }

    /// Render the document into a byte buffer
    pub fn to_bytes(self) -> Result<Vec<u8>, ExportError> {
        let mut bytes = Vec::new();
        self.write(&mut bytes)?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::ImageLayout;
    use crate::pagesize::{self, PageOrientation};
    use crate::rect::Rect;
    use crate::units::Pt;
    use crate::{FormXObjectLayout, Transform};

    #[test]
    fn writes_pages_and_forms() {
        let mut doc = Document::default();
        let mut info = Info::new();
        info.title("Liedblatt");
        doc.set_info(info);

        let image = Image::from_bytes(crate::image::tests::png_bytes(8, 8)).unwrap();
        let image_id = doc.add_image(image);

        let mut form = FormXObject::new(pagesize::A5.0, pagesize::A5.1);
        form.contents.push(crate::page::PageContents::Image(ImageLayout {
            image_id,
            position: Rect::from_origin_size(Pt(10.0), Pt(10.0), Pt(50.0), Pt(50.0)),
        }));
        let form_id = doc.add_form_xobject(form);

        let mut sheet = Page::new(pagesize::A4.landscape(), None);
        sheet.add_form_xobject(FormXObjectLayout {
            xobj_id: form_id,
            transform: Transform::translate(Pt(421.0), Pt(0.0)),
        });
        doc.add_page(sheet);
        assert_eq!(doc.page_count(), 1);

        let bytes = doc.to_bytes().unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Type /Pages"));
        assert!(text.contains("/Subtype /Form"));
        assert!(text.contains("/SMask"));
    }
}
