//! Shared content rendering logic for pages and form XObjects.

use crate::font::Font;
use crate::form_xobject::FormXObject;
use crate::image::Image;
use crate::page::{LineLayout, PageContents, SpanFont, SpanLayout};
use crate::refs::{ObjectReferences, RefType};
use id_arena::Arena;
use pdf_writer::writers::Resources;
use pdf_writer::{Finish, Name};
use std::io::Write;

/// Renders page contents to a PDF content stream.
///
/// This is the shared implementation used by both `Page::write()` and
/// `FormXObject::write_with_ref()` to convert high-level content items into
/// low-level PDF operators.
#[allow(clippy::write_with_newline)]
pub(crate) fn render_contents(
    contents: &[PageContents],
    fonts: &Arena<Font>,
) -> Result<Vec<u8>, std::io::Error> {
    let mut content: Vec<u8> = Vec::default();

    for page_content in contents.iter() {
        match page_content {
            PageContents::Text(spans) => {
                render_text_spans(&mut content, spans, fonts)?;
            }
            PageContents::Image(image) => {
                write!(&mut content, "q\n")?;
                write!(
                    &mut content,
                    "{} 0 0 {} {} {} cm\n",
                    image.position.width().0,
                    image.position.height().0,
                    image.position.x1.0,
                    image.position.y1.0
                )?;
                write!(&mut content, "/I{} Do\n", image.image_id.index())?;
                write!(&mut content, "Q\n")?;
            }
            PageContents::Line(line) => {
                render_line(&mut content, line)?;
            }
            PageContents::FormXObject(layout) => {
                let [a, b, c, d, e, f] = layout.transform.to_array();
                write!(&mut content, "q\n")?;
                write!(&mut content, "{a} {b} {c} {d} {e} {f} cm\n")?;
                write!(&mut content, "/X{} Do\n", layout.xobj_id.index())?;
                write!(&mut content, "Q\n")?;
            }
        }
    }

    Ok(content)
}

#[allow(clippy::write_with_newline)]
fn render_text_spans(
    content: &mut Vec<u8>,
    spans: &[SpanLayout],
    fonts: &Arena<Font>,
) -> Result<(), std::io::Error> {
    let Some(first) = spans.first() else {
        return Ok(());
    };

    write!(content, "q\n")?;
    write!(content, "0 g\n")?;

    let mut current_font: SpanFont = first.font;
    write!(
        content,
        "/F{} {} Tf\n",
        current_font.id.index(),
        current_font.size.0
    )?;

    for span in spans.iter() {
        if span.font != current_font {
            current_font = span.font;
            write!(
                content,
                "/F{} {} Tf\n",
                current_font.id.index(),
                current_font.size.0
            )?;
        }

        let font = &fonts[current_font.id];
        let units_per_em = font.units_per_em().max(1) as f32;

        write!(content, "BT\n")?;
        write!(content, "{} {} Td\n", span.coords.0 .0, span.coords.1 .0)?;
        write!(content, "[<")?;
        for (gid, kern) in font.glyph_run(&span.text) {
            if kern != 0 {
                // TJ adjustments are subtracted from the advance, in thousandths of an em
                let adjustment = -(kern as f32) * 1000.0 / units_per_em;
                write!(content, "> {adjustment} <")?;
            }
            write!(content, "{gid:04x}")?;
        }
        write!(content, ">] TJ\n")?;
        write!(content, "ET\n")?;
    }

    write!(content, "Q\n")?;
    Ok(())
}

#[allow(clippy::write_with_newline)]
fn render_line(content: &mut Vec<u8>, line: &LineLayout) -> Result<(), std::io::Error> {
    write!(content, "q\n")?;
    write!(content, "0 G\n")?;
    write!(content, "{} w\n", line.thickness.0)?;
    write!(content, "{} {} m\n", line.start.0 .0, line.start.1 .0)?;
    write!(content, "{} {} l\n", line.end.0 .0, line.end.1 .0)?;
    write!(content, "S\n")?;
    write!(content, "Q\n")?;
    Ok(())
}

/// Register every font, image and form of the document under the names the
/// content streams use (`F{n}`, `I{n}`, `X{n}`)
pub(crate) fn write_resources(
    mut resources: Resources<'_>,
    refs: &ObjectReferences,
    fonts: &Arena<Font>,
    images: &Arena<Image>,
    form_xobjects: &Arena<FormXObject>,
) {
    let mut resource_fonts = resources.fonts();
    for (id, _) in fonts.iter() {
        if let Some(font_ref) = refs.get(RefType::Font(id.index())) {
            resource_fonts.pair(Name(format!("F{}", id.index()).as_bytes()), font_ref);
        }
    }
    resource_fonts.finish();

    let mut resource_xobjects = resources.x_objects();
    for (id, _) in images.iter() {
        if let Some(image_ref) = refs.get(RefType::Image(id.index())) {
            resource_xobjects.pair(Name(format!("I{}", id.index()).as_bytes()), image_ref);
        }
    }
    for (id, _) in form_xobjects.iter() {
        if let Some(xobj_ref) = refs.get(RefType::FormXObject(id.index())) {
            resource_xobjects.pair(Name(format!("X{}", id.index()).as_bytes()), xobj_ref);
        }
    }
    resource_xobjects.finish();
    resources.finish();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Pt;

    #[test]
    fn lines_are_stroked_rules() {
        let mut out = Vec::new();
        render_line(
            &mut out,
            &LineLayout {
                start: (Pt(10.0), Pt(20.0)),
                end: (Pt(110.0), Pt(20.0)),
                thickness: Pt(0.5),
            },
        )
        .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("0.5 w\n10 20 m\n110 20 l\nS\n"));
    }

    #[test]
    fn empty_contents_render_nothing() {
        let fonts: Arena<Font> = Arena::new();
        assert!(render_contents(&[], &fonts).unwrap().is_empty());
    }
}
