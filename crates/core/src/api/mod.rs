//! High-level API: input files to images.
//!
//! # Example
//!
//! ```ignore
//! use vecgen_core::api::{ConvertOptions, generate_images};
//!
//! let images = generate_images(&["icon.pdf".into()], &ConvertOptions::default())?;
//! ```

pub mod convert;

pub use convert::{
    ConvertOptions, generate_images, images_from_bytes, images_from_file, page_route,
};
