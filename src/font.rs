use crate::{
    error::FontError,
    refs::{ObjectReferences, RefType},
    Pt,
};
use id_arena::Id;
use owned_ttf_parser::{AsFaceRef, GlyphId, OwnedFace};
use pdf_writer::{
    types::{FontFlags, SystemInfo},
    Finish, Name, Pdf, Ref, Str,
};
use std::collections::HashMap;

/// Anything that can tell how wide a string is when set at a given size.
///
/// Layout only ever talks to fonts through this trait, which keeps the flow
/// engine independent of font files.
pub trait TextMeasure {
    fn width_of_text(&self, text: &str, size: Pt) -> Result<Pt, FontError>;
}

/// A parsed TrueType / OpenType font. Fonts are embedded in their entirety in the
/// generated PDF.
///
/// Widths are measured with pair kerning from the `kern` table applied, and text is
/// emitted with the same adjustments, so what layout measures is what gets drawn.
pub struct Font {
    pub face: OwnedFace,
    label: String,
}

impl std::fmt::Debug for Font {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Font").field("label", &self.label).finish()
    }
}

impl Font {
    /// Load a font from raw bytes, parsing the font and returning an error if the font
    /// could not be parsed
    pub fn load(bytes: Vec<u8>) -> Result<Font, FontError> {
        let face = OwnedFace::from_vec(bytes, 0)?;
        let mut font = Font {
            face,
            label: String::new(),
        };
        font.label = font.name().unwrap_or_else(|| "unnamed font".to_string());
        Ok(font)
    }

    /// The full name of the font, if it carries one
    pub fn name(&self) -> Option<String> {
        self.name_entry(owned_ttf_parser::name_id::FULL_NAME)
    }

    /// The family name of the font, if it carries one
    pub fn family(&self) -> Option<String> {
        self.name_entry(owned_ttf_parser::name_id::FAMILY)
    }

    fn name_entry(&self, name_id: u16) -> Option<String> {
        self.face
            .as_face_ref()
            .names()
            .into_iter()
            .find(|name| name.name_id == name_id && name.is_unicode())
            .and_then(|name| name.to_string())
    }

    fn scaling(&self, size: Pt) -> Pt {
        size / self.face.as_face_ref().units_per_em() as f32
    }

    pub fn glyph_id(&self, ch: char) -> Option<u16> {
        self.face.as_face_ref().glyph_index(ch).map(|i| i.0)
    }

    pub fn replacement_glyph_id(&self) -> Option<u16> {
        self.face.as_face_ref().glyph_index('\u{FFFD}').map(|i| i.0)
    }

    /// Glyph to draw for a character, falling back to the replacement character,
    /// then to '?', then to .notdef
    pub fn glyph_or_fallback(&self, ch: char) -> u16 {
        self.glyph_id(ch)
            .or_else(|| self.replacement_glyph_id())
            .or_else(|| self.glyph_id('?'))
            .unwrap_or(0)
    }

    /// Horizontal kerning between two glyphs in font units (negative pulls them together)
    pub fn kerning(&self, left: u16, right: u16) -> i16 {
        let Some(kern) = self.face.as_face_ref().tables().kern else {
            return 0;
        };
        kern.subtables
            .into_iter()
            .filter(|subtable| subtable.horizontal && !subtable.variable)
            .find_map(|subtable| subtable.glyphs_kerning(GlyphId(left), GlyphId(right)))
            .unwrap_or(0)
    }

    /// The glyphs of a string, each paired with the kerning (in font units) to apply
    /// between it and the previous glyph
    pub fn glyph_run(&self, text: &str) -> Vec<(u16, i16)> {
        let mut previous: Option<u16> = None;
        text.chars()
            .map(|ch| {
                let gid = self.glyph_or_fallback(ch);
                let kern = previous.map(|p| self.kerning(p, gid)).unwrap_or(0);
                previous = Some(gid);
                (gid, kern)
            })
            .collect()
    }

    pub fn units_per_em(&self) -> u16 {
        self.face.as_face_ref().units_per_em()
    }

    fn write_cid(&self, refs: &mut ObjectReferences, font_index: usize, writer: &mut Pdf) -> Ref {
        let font_descriptor_id = self.write_descriptor(refs, font_index, writer);

        let id = refs.gen(RefType::CidFont(font_index));

        let mut cid_font = writer.cid_font(id);
        cid_font.subtype(pdf_writer::types::CidFontType::Type2);
        cid_font.base_font(Name(format!("F{font_index}").as_bytes()));
        cid_font.system_info(SystemInfo {
            registry: Str(b"Adobe"),
            ordering: Str(b"Identity"),
            supplement: 0,
        });
        cid_font.font_descriptor(font_descriptor_id);

        let sizing = self.glyphs_sizing(&self.glyph_ids());
        let scaling = 1000.0 / self.units_per_em() as f32;

        // the most popular advance becomes the default width
        let mut widths_counts: HashMap<u16, usize> = HashMap::new();
        for (_, (width, _)) in sizing.values() {
            *widths_counts.entry(*width).or_insert(0) += 1;
        }
        let most_common_width = widths_counts
            .iter()
            .max_by_key(|entry| *entry.1)
            .map(|(width, _)| *width as f32 * scaling)
            .unwrap_or(1000.0);

        let mut id_widths: Vec<(u16, f32)> = sizing
            .iter()
            .map(|(&gid, &(_, (width, _)))| (gid, width as f32 * scaling))
            .collect();
        id_widths.sort_by_key(|(gid, _)| *gid);

        let mut widths = cid_font.widths();
        if let Some(&(first_gid, first_width)) = id_widths.first() {
            let mut start_gid = first_gid;
            let mut run: Vec<f32> = vec![first_width];
            for (gid, width) in id_widths.into_iter().skip(1) {
                if (gid - start_gid) as usize != run.len() {
                    widths.consecutive(start_gid, run.clone());
                    start_gid = gid;
                    run.clear();
                }
                run.push(width);
            }
            widths.consecutive(start_gid, run);
        }
        widths.finish();

        cid_font.default_width(most_common_width);
        cid_font.cid_to_gid_map_predefined(Name(b"Identity"));

        id
    }

    fn write_font_data(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        writer: &mut Pdf,
    ) -> Ref {
        let id = refs.gen(RefType::FontData(font_index));
        let data = self.face.as_slice();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(
            data,
            miniz_oxide::deflate::CompressionLevel::DefaultLevel as u8,
        );

        writer
            .stream(id, compressed.as_slice())
            .filter(pdf_writer::Filter::FlateDecode)
            .pair(Name(b"Length1"), data.len() as i32);

        id
    }

    fn write_descriptor(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        writer: &mut Pdf,
    ) -> Ref {
        let font_data_stream_id = self.write_font_data(refs, font_index, writer);

        let face = self.face.as_face_ref();
        let sizing = self.glyphs_sizing(&self.glyph_ids());
        let max_width = sizing.values().map(|&(_, (w, _))| w).max().unwrap_or_default();
        let max_height = sizing.values().map(|&(_, (_, h))| h).max().unwrap_or_default();
        let sum_width: usize = sizing.values().map(|&(_, (w, _))| w as usize).sum();
        let avg_width = if sizing.is_empty() {
            0.0
        } else {
            sum_width as f32 / sizing.len() as f32
        };

        let id = refs.gen(RefType::FontDescriptor(font_index));
        let base_name = format!("F{font_index}");
        let postscript_name = self.name().unwrap_or_else(|| base_name.clone());
        let family = self.family().unwrap_or(base_name);

        let mut descriptor = writer.font_descriptor(id);
        descriptor.name(Name(postscript_name.replace(' ', "").as_bytes()));
        descriptor.family(Str(family.as_bytes()));
        descriptor.weight(face.weight().to_number());

        let mut flags: FontFlags = FontFlags::NON_SYMBOLIC;
        if face.is_monospaced() {
            flags.set(FontFlags::FIXED_PITCH, true);
        }
        if face.is_italic() {
            flags.set(FontFlags::ITALIC, true);
        }
        descriptor.flags(flags);

        let scaling = 1000.0 / self.units_per_em() as f32;
        let bbox = face.global_bounding_box();
        descriptor.bbox(pdf_writer::Rect {
            x1: bbox.x_min as f32 * scaling,
            y1: bbox.y_min as f32 * scaling,
            x2: bbox.x_max as f32 * scaling,
            y2: (bbox.y_max as f32).max(max_height as f32) * scaling,
        });
        descriptor.italic_angle(face.italic_angle());
        descriptor.ascent(face.ascender() as f32 * scaling);
        descriptor.descent(face.descender() as f32 * scaling);
        descriptor.leading(face.line_gap() as f32 * scaling);
        descriptor.cap_height(
            face.capital_height()
                .map(|h| h as f32 * scaling)
                .unwrap_or(1000.0),
        );
        descriptor.x_height(
            face.x_height()
                .unwrap_or_else(|| face.capital_height().unwrap_or_default()) as f32
                * scaling,
        );
        descriptor.stem_v(80.0);
        descriptor.avg_width(avg_width * scaling);
        descriptor.max_width(max_width as f32 * scaling);
        descriptor.missing_width(max_width as f32 * scaling);

        descriptor.font_file2(font_data_stream_id);

        id
    }

    /// Every glyph reachable through a unicode cmap subtable, with one of its characters
    fn glyph_ids(&self) -> HashMap<u16, char> {
        let mut map: HashMap<u16, char> = HashMap::new();

        let Some(cmap) = self.face.as_face_ref().tables().cmap else {
            return map;
        };
        for subtable in cmap.subtables.into_iter().filter(|table| table.is_unicode()) {
            subtable.codepoints(|codepoint: u32| {
                if let Ok(ch) = char::try_from(codepoint) {
                    if let Some(index) = subtable.glyph_index(codepoint).filter(|index| index.0 > 0) {
                        map.entry(index.0).or_insert(ch);
                    }
                }
            });
        }

        map
    }

    fn glyphs_sizing(&self, ids: &HashMap<u16, char>) -> HashMap<u16, (char, (u16, i16))> {
        let face = self.face.as_face_ref();
        let mut sizing: HashMap<u16, (char, (u16, i16))> = HashMap::new();
        for (&id, &ch) in ids.iter() {
            let gid = GlyphId(id);
            if let Some(h_advance) = face.glyph_hor_advance(gid) {
                let height = face
                    .glyph_bounding_box(gid)
                    .map(|bbox| bbox.y_max - bbox.y_min)
                    .unwrap_or(1000);
                sizing.insert(id, (ch, (h_advance, height)));
            }
        }
        sizing
    }

    fn write_to_unicode(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        writer: &mut Pdf,
    ) -> Ref {
        let id = refs.gen(RefType::ToUnicode(font_index));

        let mut map = String::from(
            "/CIDInit /ProcSet findresource begin\n\
             12 dict begin\n\
             begincmap\n\
             /CIDSystemInfo\n\
             << /Registry (Adobe)\n\
             /Ordering (UCS) /Supplement 0 >> def\n\
             /CMapName /Adobe-Identity-UCS def\n\
             /CMapType 2 def\n\
             1 begincodespacerange\n\
             <0000> <FFFF>\n\
             endcodespacerange\n",
        );

        let mut ids: Vec<(u16, char)> = self.glyph_ids().into_iter().collect();
        ids.sort_by_key(|&(id, _)| id);

        // bfchar blocks hold at most 100 entries
        for block in ids.chunks(100) {
            map.push_str(&format!("{} beginbfchar\n", block.len()));
            for &(id, ch) in block {
                map.push_str(&format!("<{id:04x}> <"));
                let mut utf16 = [0u16; 2];
                for unit in ch.encode_utf16(&mut utf16) {
                    map.push_str(&format!("{unit:04x}"));
                }
                map.push_str(">\n");
            }
            map.push_str("endbfchar\n");
        }

        map.push_str("endcmap CMapName currentdict /CMap defineresource pop end end\n");

        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(
            map.as_bytes(),
            miniz_oxide::deflate::CompressionLevel::DefaultLevel as u8,
        );
        let mut stream = writer.stream(id, compressed.as_slice());
        stream.filter(pdf_writer::Filter::FlateDecode);

        id
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, id: Id<Font>, writer: &mut Pdf) {
        let font_index = id.index();
        let font_id = refs.gen(RefType::Font(font_index));
        let cid_font_id = self.write_cid(refs, font_index, writer);
        let to_unicode_id = self.write_to_unicode(refs, font_index, writer);

        let mut font = writer.type0_font(font_id);
        font.base_font(Name(format!("F{font_index}").as_bytes()));
        font.encoding_predefined(Name(b"Identity-H"));
        font.descendant_font(cid_font_id);
        font.to_unicode(to_unicode_id);
    }
}

impl TextMeasure for Font {
    /// Sum of glyph advances plus pair kerning. Characters missing from the font are
    /// measured as the glyph that will be drawn in their place.
    fn width_of_text(&self, text: &str, size: Pt) -> Result<Pt, FontError> {
        let face = self.face.as_face_ref();
        if face.tables().hmtx.is_none() || face.units_per_em() == 0 {
            return Err(FontError::Unmeasurable(self.label.clone()));
        }

        let scaling = self.scaling(size);
        Ok(self
            .glyph_run(text)
            .into_iter()
            .map(|(gid, kern)| {
                let advance = face.glyph_hor_advance(GlyphId(gid)).unwrap_or_default() as f32;
                scaling * (advance + kern as f32)
            })
            .sum())
    }
}
