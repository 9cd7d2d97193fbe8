//! Objective-C CoreGraphics code generation.
//!
//! - `literal` - number, geometry and call formatting
//! - `objc` - drawing functions (ObjcGenerator)
//! - `header` - size constants and declarations (ObjcHeaderGenerator)
//! - `caller` - program rendering every image to PNG (ObjcCallerGenerator)

pub mod caller;
pub mod header;
pub mod literal;
pub mod objc;

pub use caller::ObjcCallerGenerator;
pub use header::ObjcHeaderGenerator;
pub use objc::ObjcGenerator;

use crate::error::Result;
use crate::image::Image;

/// First line of every generated file.
pub const GENERATED_MARKER: &str = "// Generated by vecgen";

/// Suffix counter for generated temporaries. One counter spans a whole
/// generation run so names never repeat across images.
#[derive(Debug, Default)]
pub struct UniqueIds {
    next: usize,
}

impl UniqueIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> usize {
        let id = self.next;
        self.next += 1;
        id
    }

    /// `base` followed by a fresh suffix.
    pub fn name(&mut self, base: &str) -> String {
        format!("{base}{}", self.next_id())
    }
}

/// Options shared by the header and drawing backends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Prepended to every generated identifier.
    pub prefix: String,
    /// Header the drawing file imports instead of CoreGraphics directly.
    pub header_import_path: Option<String>,
}

/// Options for the caller program.
#[derive(Debug, Clone, PartialEq)]
pub struct CallerConfig {
    pub prefix: String,
    /// Header declaring the drawing functions and size constants.
    pub header_import_path: String,
    pub scale: f64,
    pub allow_antialiasing: bool,
    /// Directory the PNGs are written to.
    pub output_dir: String,
}

impl Default for CallerConfig {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            header_import_path: String::new(),
            scale: 1.0,
            allow_antialiasing: false,
            output_dir: ".".to_string(),
        }
    }
}

/// A backend producing one source file for a list of images.
pub trait CodeGenerator {
    fn preamble(&self) -> String;

    fn generate_image(&self, image: &Image, ids: &mut UniqueIds) -> Result<String>;

    fn ending(&self) -> String;

    /// Marker, preamble, images separated by blank lines, then ending.
    fn generate_file(&self, images: &[Image], ids: &mut UniqueIds) -> Result<String> {
        let functions = images
            .iter()
            .map(|image| self.generate_image(image, ids))
            .collect::<Result<Vec<_>>>()?;
        Ok(format!(
            "{GENERATED_MARKER}\n\n{}\n{}\n\n{}\n",
            self.preamble(),
            functions.join("\n\n"),
            self.ending()
        ))
    }
}

/// `{prefix}Draw{Camel}ImageInContext`
pub fn function_name(prefix: &str, camel: &str) -> String {
    format!("{prefix}Draw{camel}ImageInContext")
}

/// `k{prefix}{Camel}ImageSize`
pub fn size_constant_name(prefix: &str, camel: &str) -> String {
    format!("k{prefix}{camel}ImageSize")
}
