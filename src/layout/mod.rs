//! Flow layout: wrapping, spacing and pagination of content blocks.
//!
//! [`FlowLayout`] consumes a [`ContentStream`](crate::ContentStream) and produces a
//! [`PaginatedDocument`] of logical pages holding plain draw commands. Nothing in
//! here touches PDF objects; fonts are only used through
//! [`TextMeasure`](crate::TextMeasure).
//!
//! # Example
//!
//! ```
//! use liedblatt::layout::wrap_text;
//! use liedblatt::{FontError, Pt, TextMeasure};
//!
//! struct Mono;
//! impl TextMeasure for Mono {
//!     fn width_of_text(&self, text: &str, size: Pt) -> Result<Pt, FontError> {
//!         Ok(size * 0.5 * text.chars().count() as f32)
//!     }
//! }
//!
//! let lines = wrap_text(&Mono, Pt(10.0), "Nun danket alle Gott", Pt(60.0)).unwrap();
//! let texts: Vec<String> = lines.iter().map(|l| l.text()).collect();
//! assert_eq!(texts, vec!["Nun danket", "alle Gott"]);
//! ```

mod flow;
mod logical;
mod margins;
mod spacing;
mod text;

pub use flow::*;
pub use logical::*;
pub use margins::*;
pub use spacing::*;
pub use text::*;
