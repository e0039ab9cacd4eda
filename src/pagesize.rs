//! Paper sizes used by the song sheet formats.
//!
//! Sizes are given in portrait orientation (width ≤ height). Use
//! [`PageOrientation`] to turn a size into landscape.
//!
//! Besides the ISO A-series this module carries the cut formats a Liedblatt
//! is printed on: DL (a third of A4 landscape), narrow A4 (A4 cut lengthwise)
//! and narrow A3 (A3 cut lengthwise).

use crate::units::*;

/// Page dimensions as (width, height) in points.
pub type PageSize = (Pt, Pt);

pub const A3: PageSize = (Pt(297.0 * PT_PER_MM), Pt(420.0 * PT_PER_MM));
pub const A4: PageSize = (Pt(210.0 * PT_PER_MM), Pt(297.0 * PT_PER_MM));
pub const A5: PageSize = (Pt(148.0 * PT_PER_MM), Pt(210.0 * PT_PER_MM));
pub const DL: PageSize = (Pt(99.0 * PT_PER_MM), Pt(210.0 * PT_PER_MM));
pub const NARROW_A4: PageSize = (Pt(105.0 * PT_PER_MM), Pt(297.0 * PT_PER_MM));
pub const NARROW_A3: PageSize = (Pt(148.5 * PT_PER_MM), Pt(420.0 * PT_PER_MM));

/// Convert page sizes between portrait and landscape orientations.
pub trait PageOrientation {
    /// Returns the size in portrait orientation (width ≤ height).
    fn portrait(self) -> Self;
    /// Returns the size in landscape orientation (width ≥ height).
    fn landscape(self) -> Self;
}

impl PageOrientation for PageSize {
    fn portrait(self) -> Self {
        if self.0 <= self.1 {
            self
        } else {
            (self.1, self.0)
        }
    }

    fn landscape(self) -> PageSize {
        if self.0 >= self.1 {
            self
        } else {
            (self.1, self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landscape_swaps_portrait_sizes() {
        let (w, h) = A4.landscape();
        assert_eq!(w, A4.1);
        assert_eq!(h, A4.0);
        assert_eq!(A4.landscape().portrait(), A4);
    }

    #[test]
    fn two_a5_pages_fill_a4_landscape() {
        let sheet = A4.landscape();
        assert!((A5.0 * 2.0 - sheet.0).abs() < Pt(3.0));
        assert!((A5.1 - sheet.1).abs() < Pt(0.01));
    }
}
