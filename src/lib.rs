//! Flow layout and booklet imposition for church song sheets.
//!
//! A Liedblatt is assembled from songs, liturgy texts, images and ornaments.
//! This crate normalizes that content into typed blocks, flows the blocks onto
//! logical pages of one of the supported cut formats, and writes either a
//! plain paginated PDF or a brochure PDF in which the pages are imposed onto
//! physical sheets for folding and cutting.

mod blocks;
pub use blocks::*;

mod config;
pub use config::*;

mod content;

mod document;
pub use document::*;

mod error;
pub use error::*;

mod export;
pub use export::*;

mod fetch;
pub use fetch::*;

mod font;
pub use font::*;

mod font_set;
pub use font_set::*;

mod form_xobject;
pub use form_xobject::*;

mod image;
pub use self::image::*;

/// Booklet imposition schemes and sheet placement
pub mod impose;

mod info;
pub use info::*;

/// Text wrapping, spacing and pagination
pub mod layout;
pub use layout::{FlowLayout, PaginatedDocument};

mod normalize;
pub use normalize::*;

mod page;
pub use page::*;

/// Paper sizes of the supported formats
pub mod pagesize;

mod progress;
pub use progress::*;

mod rect;
pub use rect::*;

pub(crate) mod refs;

mod transform;
pub use transform::*;

mod units;
pub use units::*;

/// Re-export PDF-writer functionality
pub use pdf_writer;
