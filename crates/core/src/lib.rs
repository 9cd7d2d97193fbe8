//! vecgen - CoreGraphics code generation from vector PDF images.

pub mod api;
pub mod codegen;
pub mod document;
pub mod error;
pub mod image;
pub mod interp;
pub mod model;
pub mod parser;
pub mod resources;
pub mod route;

pub use api::convert;
pub use image::{Image, ImageName};
pub use route::{DrawRoute, DrawStep};

pub use error::{GenError, Result};
