use crate::pagesize::PageSize;
use crate::rect::Rect;
use crate::units::Pt;

/// Margins of a logical page. The flow layout never places content outside
/// of them; the bottom margin is the pagination limit.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Margins {
    pub top: Pt,
    pub right: Pt,
    pub bottom: Pt,
    pub left: Pt,
}

impl Margins {
    /// The same margin on every side, as every cut format uses
    pub fn all<D: Into<Pt>>(value: D) -> Margins {
        let value: Pt = value.into();
        Margins {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Left plus right
    pub fn horizontal(&self) -> Pt {
        self.left + self.right
    }

    /// Top plus bottom
    pub fn vertical(&self) -> Pt {
        self.top + self.bottom
    }

    /// The area of a page of `size` that lies within the margins
    pub fn content_box(&self, size: PageSize) -> Rect {
        let (width, height) = size;
        Rect {
            x1: self.left,
            y1: self.bottom,
            x2: width - self.right,
            y2: height - self.top,
        }
    }
}
