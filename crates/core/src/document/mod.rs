//! PDF Document module - object table and pages.
//!
//! - `catalog` - object lookup, stream decoding, catalog (PDFDocument)
//! - `page` - page tree walk with inherited attributes (PDFPage)

pub mod catalog;
pub mod page;

pub use catalog::PDFDocument;
pub use page::PDFPage;
