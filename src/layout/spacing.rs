use crate::units::*;

/// Width the default separator ornament is drawn at
pub const DEFAULT_ICON_WIDTH: Pt = Pt(150.0);
/// Copyright lines are small print regardless of the body size
pub const COPYRIGHT_FONT_SIZE: Pt = Pt(8.0);
/// Distance between a baseline and its underline
pub const UNDERLINE_OFFSET: Pt = Pt(2.0);
pub const UNDERLINE_THICKNESS: Pt = Pt(0.5);
/// Heading sizes relative to the body size, for levels 1 to 3
pub const HEADING_SCALE: [f32; 3] = [1.6, 1.4, 1.2];

/// Vertical and horizontal spacing, proportional to the body font size.
///
/// The baseline values are tuned for 14pt text and scale linearly from there.
#[derive(Debug, Clone, PartialEq)]
pub struct Spacing {
    pub icon_size: Pt,
    pub icon_margin: Pt,
    pub object_spacing: Pt,
    pub strophe_spacing: Pt,
    pub image_margin_top: Pt,
    pub image_margin_bottom: Pt,
    pub heading_margins: [Pt; 3],
    pub copyright_margin_top: Pt,
    pub copyright_margin_bottom: Pt,
    pub indent_step: Pt,
    pub strophe_column: Pt,
    pub logo_width: Pt,
    pub logo_margin: Pt,
}

impl Spacing {
    pub fn for_font_size(size: Pt) -> Spacing {
        let s = |baseline: f32| scale(Pt(baseline), size);
        Spacing {
            icon_size: s(24.0),
            icon_margin: s(10.0),
            object_spacing: s(14.0),
            strophe_spacing: s(10.0),
            image_margin_top: s(8.0),
            image_margin_bottom: s(8.0),
            heading_margins: [s(12.0), s(10.0), s(8.0)],
            copyright_margin_top: s(4.0),
            copyright_margin_bottom: s(2.0),
            indent_step: s(20.0),
            strophe_column: s(20.0),
            logo_width: s(90.0),
            logo_margin: s(12.0),
        }
    }

    /// Space below a heading; levels outside 1..=3 are clamped
    pub fn heading_margin(&self, level: u8) -> Pt {
        self.heading_margins[heading_slot(level)]
    }
}

/// Font size of a heading at `level`, clamped to 1..=3
pub fn heading_size(base: Pt, level: u8) -> Pt {
    base * HEADING_SCALE[heading_slot(level)]
}

fn heading_slot(level: u8) -> usize {
    level.clamp(1, 3) as usize - 1
}
