//! Measurement units and the conversions used throughout layout.
//!
//! All layout happens in PDF points ([`Pt`]). Millimetres ([`Mm`]) and inches
//! ([`In`]) convert into points, and CSS pixels from the editor convert through
//! [`px_to_pt`].
//!
//! Fixed spacing constants are authored at a 14 pt base font size and run
//! through [`scale`] so that the rhythm of a sheet stays proportional when the
//! user picks a different body size.

use derive_more::{Add, AddAssign, Deref, DerefMut, Display, From, Into, Sub, SubAssign, Sum};
use serde::{Deserialize, Serialize};
use std::ops::{Div, Mul, Neg};

/// Points per millimetre.
pub const PT_PER_MM: f32 = 2.83465;

/// Points per CSS pixel (96 px per inch into 72 pt per inch).
pub const PT_PER_PX: f32 = 0.75;

/// The font size all fixed spacing constants are expressed at.
pub const BASE_FONT_SIZE: Pt = Pt(14.0);

/// A length in PDF points (1/72 inch).
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    Add,
    AddAssign,
    Sub,
    SubAssign,
    Sum,
    Deref,
    DerefMut,
    From,
    Into,
    Display,
    Serialize,
    Deserialize,
)]
#[display("{_0}pt")]
#[serde(transparent)]
pub struct Pt(pub f32);

/// A length in millimetres.
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd, From, Into, Display)]
#[display("{_0}mm")]
pub struct Mm(pub f32);

/// A length in inches.
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd, From, Into, Display)]
#[display("{_0}in")]
pub struct In(pub f32);

impl Pt {
    pub const ZERO: Pt = Pt(0.0);

    pub fn min(self, other: Pt) -> Pt {
        Pt(self.0.min(other.0))
    }

    pub fn max(self, other: Pt) -> Pt {
        Pt(self.0.max(other.0))
    }

    pub fn abs(self) -> Pt {
        Pt(self.0.abs())
    }
}

impl Mul<f32> for Pt {
    type Output = Pt;

    fn mul(self, rhs: f32) -> Pt {
        Pt(self.0 * rhs)
    }
}

impl Mul<Pt> for f32 {
    type Output = Pt;

    fn mul(self, rhs: Pt) -> Pt {
        Pt(self * rhs.0)
    }
}

impl Div<f32> for Pt {
    type Output = Pt;

    fn div(self, rhs: f32) -> Pt {
        Pt(self.0 / rhs)
    }
}

/// Dividing two lengths yields a unitless ratio.
impl Div<Pt> for Pt {
    type Output = f32;

    fn div(self, rhs: Pt) -> f32 {
        self.0 / rhs.0
    }
}

impl Neg for Pt {
    type Output = Pt;

    fn neg(self) -> Pt {
        Pt(-self.0)
    }
}

impl From<Mm> for Pt {
    fn from(mm: Mm) -> Pt {
        mm_to_pt(mm.0)
    }
}

impl From<In> for Pt {
    fn from(inches: In) -> Pt {
        Pt(inches.0 * 72.0)
    }
}

/// Convert millimetres to points.
pub fn mm_to_pt(mm: f32) -> Pt {
    Pt(mm * PT_PER_MM)
}

/// Convert CSS pixels to points.
pub fn px_to_pt(px: f32) -> Pt {
    Pt(px * PT_PER_PX)
}

/// Scale a constant authored at [`BASE_FONT_SIZE`] to the user's font size.
pub fn scale(constant: Pt, user_font_size: Pt) -> Pt {
    constant * (user_font_size.0 / BASE_FONT_SIZE.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millimetres_convert_to_points() {
        assert!((mm_to_pt(10.0).0 - 28.3465).abs() < 1e-4);
        let a4_width: Pt = Mm(210.0).into();
        assert!((a4_width.0 - 595.2765).abs() < 1e-3);
        let inch: Pt = In(1.0).into();
        assert_eq!(inch, Pt(72.0));
    }

    #[test]
    fn pixels_convert_to_points() {
        assert_eq!(px_to_pt(96.0), Pt(72.0));
        assert_eq!(px_to_pt(0.0), Pt::ZERO);
    }

    #[test]
    fn scale_is_identity_at_the_base_size() {
        assert_eq!(scale(Pt(24.0), BASE_FONT_SIZE), Pt(24.0));
        assert_eq!(scale(Pt(14.0), Pt(28.0)), Pt(28.0));
        assert!((scale(Pt(10.0), Pt(7.0)).0 - 5.0).abs() < 1e-6);
    }

    #[test]
    fn arithmetic_stays_in_points() {
        let total: Pt = [Pt(1.0), Pt(2.5), Pt(3.5)].into_iter().sum();
        assert_eq!(total, Pt(7.0));
        assert_eq!(Pt(10.0) / Pt(4.0), 2.5);
        assert_eq!(Pt(3.0) * 2.0, Pt(6.0));
        assert_eq!(-Pt(3.0), Pt(-3.0));
    }
}
