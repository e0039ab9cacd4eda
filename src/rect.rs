use crate::units::*;

/// A rectangle, specified by two opposite corners.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rect {
    /// The x-coordinate of the lower-left corner.
    pub x1: Pt,
    /// The y-coordinate of the lower-left corner.
    pub y1: Pt,
    /// The x-coordinate of the upper-right corner.
    pub x2: Pt,
    /// The y-coordinate of the upper-right corner.
    pub y2: Pt,
}

impl Rect {
    /// Build a rectangle from its lower-left corner and its size
    pub fn from_origin_size(x: Pt, y: Pt, width: Pt, height: Pt) -> Rect {
        Rect {
            x1: x,
            y1: y,
            x2: x + width,
            y2: y + height,
        }
    }

    pub fn width(&self) -> Pt {
        self.x2 - self.x1
    }

    pub fn height(&self) -> Pt {
        self.y2 - self.y1
    }

    /// Split the rectangle into `count` equal-width columns spanning its full height,
    /// ordered left to right
    pub fn columns(&self, count: usize) -> Vec<Rect> {
        let width = self.width() / count as f32;
        (0..count)
            .map(|i| Rect::from_origin_size(self.x1 + width * i as f32, self.y1, width, self.height()))
            .collect()
    }
}

impl From<Rect> for pdf_writer::Rect {
    fn from(r: Rect) -> Self {
        pdf_writer::Rect {
            x1: r.x1.into(),
            y1: r.y1.into(),
            x2: r.x2.into(),
            y2: r.y2.into(),
        }
    }
}

impl From<&Rect> for pdf_writer::Rect {
    fn from(r: &Rect) -> Self {
        (*r).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_tile_the_rectangle() {
        let sheet = Rect::from_origin_size(Pt(0.0), Pt(0.0), Pt(300.0), Pt(200.0));
        let columns = sheet.columns(3);
        assert_eq!(columns.len(), 3);
        assert_eq!(columns[0].x1, Pt(0.0));
        assert_eq!(columns[1].x1, Pt(100.0));
        assert_eq!(columns[2].x2, Pt(300.0));
        assert!(columns.iter().all(|c| c.height() == Pt(200.0)));
    }
}
