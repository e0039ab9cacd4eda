use super::FormatFamily;
use crate::error::ImpositionError;

/// Marks an empty slot in the signature tables
const BLANK: i8 = -1;

/// Two-up sheets for 1 to 8 pages, slots left to right
const TWO_UP: [&[[i8; 2]]; 8] = [
    &[[0, BLANK]],
    &[[0, 1]],
    &[[BLANK, 0], [2, 1]],
    &[[3, 0], [1, 2]],
    &[[BLANK, 0], [1, BLANK], [BLANK, 2], [3, 4]],
    &[[BLANK, 0], [1, BLANK], [5, 2], [3, 4]],
    &[[BLANK, 0], [1, 6], [5, 2], [3, 4]],
    &[[7, 0], [1, 6], [5, 2], [3, 4]],
];

/// Three-up sheets for 1 to 6 pages, slots left to right
const THREE_UP: [&[[i8; 3]]; 6] = [
    &[[0, BLANK, BLANK]],
    &[[0, 1, BLANK]],
    &[[0, 1, 2]],
    &[[BLANK, BLANK, 0], [1, 2, 3]],
    &[[4, BLANK, 0], [1, 2, 3]],
    &[[4, 5, 0], [1, 2, 3]],
];

/// One physical sheet side: the logical page index in each slot, or `None` for blank
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    pub slots: Vec<Option<usize>>,
}

impl Sheet {
    fn from_row(row: &[i8]) -> Sheet {
        Sheet {
            slots: row.iter().map(|&page| usize::try_from(page).ok()).collect(),
        }
    }

    /// The pages on this sheet, left to right
    pub fn pages(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots.iter().flatten().copied()
    }
}

/// Largest page count the signature tables cover for a family
pub fn table_bound(family: FormatFamily) -> usize {
    match family {
        FormatFamily::TwoUp => TWO_UP.len(),
        FormatFamily::ThreeUp => THREE_UP.len(),
    }
}

/// Assign `page_count` logical pages to sheet slots.
///
/// Counts covered by the signature tables get the folded booklet order.
/// Longer documents fall back to filling sheets sequentially, which prints
/// every page but does not fold into reading order.
pub fn imposition_scheme(
    page_count: usize,
    family: FormatFamily,
) -> Result<Vec<Sheet>, ImpositionError> {
    if page_count == 0 {
        return Err(ImpositionError::EmptyDocument);
    }

    let sheets = match family {
        FormatFamily::TwoUp if page_count <= TWO_UP.len() => TWO_UP[page_count - 1]
            .iter()
            .map(|row| Sheet::from_row(row))
            .collect(),
        FormatFamily::ThreeUp if page_count <= THREE_UP.len() => THREE_UP[page_count - 1]
            .iter()
            .map(|row| Sheet::from_row(row))
            .collect(),
        _ => {
            log::warn!(
                "{page_count} pages exceed the {family} signature tables ({} pages), filling sheets in page order",
                table_bound(family)
            );
            sequential(page_count, family.pages_per_sheet())
        }
    };

    Ok(sheets)
}

fn sequential(page_count: usize, per_sheet: usize) -> Vec<Sheet> {
    let sheet_count = (page_count + per_sheet - 1) / per_sheet;
    (0..sheet_count)
        .map(|sheet| Sheet {
            slots: (0..per_sheet)
                .map(|slot| sheet * per_sheet + slot)
                .map(|page| (page < page_count).then_some(page))
                .collect(),
        })
        .collect()
}
