//! Booklet imposition: which logical page lands in which slot of which sheet,
//! and where on the sheet that slot is.
//!
//! Logical pages are printed several to a physical sheet and the sheets are
//! cut and stacked (two-up for A5 and the narrow formats, three-up for DL).
//! The page order per sheet comes from fixed signature tables for short
//! documents; see [`imposition_scheme`].

mod placement;
mod scheme;

pub use placement::*;
pub use scheme::*;

use crate::error::ImpositionError;
use crate::layout::PaginatedDocument;
use std::fmt;
use std::str::FromStr;

/// How many logical pages share one sheet
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FormatFamily {
    TwoUp,
    ThreeUp,
}

impl FormatFamily {
    pub fn pages_per_sheet(&self) -> usize {
        match self {
            FormatFamily::TwoUp => 2,
            FormatFamily::ThreeUp => 3,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            FormatFamily::TwoUp => "two-up",
            FormatFamily::ThreeUp => "three-up",
        }
    }
}

impl fmt::Display for FormatFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FormatFamily {
    type Err = ImpositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "two-up" => Ok(FormatFamily::TwoUp),
            "three-up" => Ok(FormatFamily::ThreeUp),
            _ => Err(ImpositionError::UnknownFormatFamily(s.to_string())),
        }
    }
}

/// Append one blank page when the page count is odd. Returns whether a page was added.
pub fn pad_to_even(document: &mut PaginatedDocument) -> bool {
    if document.page_count() % 2 == 1 {
        document.push_blank_page();
        log::debug!("padded to {} pages", document.page_count());
        true
    } else {
        false
    }
}
