//! Header backend: image size constants and drawing function declarations.

use super::literal::num;
use super::{CodeGenerator, UniqueIds, function_name, size_constant_name};
use crate::error::Result;
use crate::image::Image;

#[derive(Debug, Clone, Default)]
pub struct ObjcHeaderGenerator {
    prefix: String,
}

impl ObjcHeaderGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl CodeGenerator for ObjcHeaderGenerator {
    fn preamble(&self) -> String {
        "#import <CoreGraphics/CoreGraphics.h>\n".to_string()
    }

    fn generate_image(&self, image: &Image, _ids: &mut UniqueIds) -> Result<String> {
        let camel = &image.name.camel_case;
        let size = image.route.bounding_rect.size;
        Ok(format!(
            "static const CGSize {} = (CGSize){{.width = {}, .height = {}}};\nvoid {}(CGContextRef context);",
            size_constant_name(&self.prefix, camel),
            num(size.width),
            num(size.height),
            function_name(&self.prefix, camel)
        ))
    }

    fn ending(&self) -> String {
        String::new()
    }
}
