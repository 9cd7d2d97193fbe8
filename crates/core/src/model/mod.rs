//! PDF model types - objects, geometry and colors.
//!
//! - `objects` - PDF object types (PDFObject, PDFStream, PDFObjRef)
//! - `geometry` - Point, Size, Rect, AffineTransform
//! - `color` - DeviceColor and Rgba

pub mod color;
pub mod geometry;
pub mod objects;

pub use color::{DeviceColor, Rgba};
pub use geometry::{AffineTransform, Point, Rect, Size};
pub use objects::{PDFDict, PDFObjRef, PDFObject, PDFStream};
