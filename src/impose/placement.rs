use super::Sheet;
use crate::pagesize::PageSize;
use crate::rect::Rect;
use crate::transform::Transform;
use crate::units::*;

/// Where one logical page is drawn on a sheet
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Index of the logical page
    pub page: usize,
    /// The slot the page is centered in
    pub slot: Rect,
    pub scale: f32,
    /// Maps logical page coordinates onto the sheet
    pub transform: Transform,
}

/// All placements of one physical sheet
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    pub size: PageSize,
    pub placements: Vec<Placement>,
}

/// Split the sheet into equal-width full-height slots and fit each page into
/// its slot, scaled uniformly and centered. Blank slots get no placement.
pub fn place_sheet(sheet: &Sheet, sheet_size: PageSize, page_size: PageSize) -> SheetLayout {
    let (sheet_width, sheet_height) = sheet_size;
    let (page_width, page_height) = page_size;
    let area = Rect::from_origin_size(Pt::ZERO, Pt::ZERO, sheet_width, sheet_height);

    let placements = area
        .columns(sheet.slots.len())
        .into_iter()
        .zip(sheet.slots.iter())
        .filter_map(|(slot, page)| page.map(|page| (slot, page)))
        .map(|(slot, page)| {
            let scale = (slot.width() / page_width).min(slot.height() / page_height);
            let x = slot.x1 + (slot.width() - page_width * scale) / 2.0;
            let y = slot.y1 + (slot.height() - page_height * scale) / 2.0;
            Placement {
                page,
                slot,
                scale,
                transform: Transform::scale(scale, scale).with_translate(x, y),
            }
        })
        .collect();

    SheetLayout {
        size: sheet_size,
        placements,
    }
}

/// Lay out every sheet of a scheme
pub fn place_sheets(sheets: &[Sheet], sheet_size: PageSize, page_size: PageSize) -> Vec<SheetLayout> {
    sheets
        .iter()
        .map(|sheet| place_sheet(sheet, sheet_size, page_size))
        .collect()
}
