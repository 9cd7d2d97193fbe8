//! Caller backend: a `main` that renders every image to a PNG file.

use super::literal::{escape_string, num};
use super::{CallerConfig, CodeGenerator, UniqueIds, function_name, size_constant_name};
use crate::error::Result;
use crate::image::Image;

#[derive(Debug, Clone, Default)]
pub struct ObjcCallerGenerator {
    config: CallerConfig,
}

impl ObjcCallerGenerator {
    pub fn new(config: CallerConfig) -> Self {
        Self { config }
    }
}

impl CodeGenerator for ObjcCallerGenerator {
    fn preamble(&self) -> String {
        let antialiasing = if self.config.allow_antialiasing {
            "YES"
        } else {
            "NO"
        };
        format!(
            r#"#import <CoreGraphics/CoreGraphics.h>
#import <Foundation/Foundation.h>
#import <ImageIO/ImageIO.h>

#import "{header}"

typedef void (*DrawingFunction)(CGContextRef);
static const CGFloat kScale = {scale};

static int WriteImageToFile(DrawingFunction f,
                            CGSize s,
                            NSString* outputFilePath) {{
  CGSize contextSize =
  CGSizeApplyAffineTransform(s, CGAffineTransformMakeScale(kScale, kScale));
  CGColorSpaceRef colorSpace = CGColorSpaceCreateDeviceRGB();
  CGContextRef ctx =
    CGBitmapContextCreate(NULL, (size_t)contextSize.width, (size_t)contextSize.height, 8, 0,
                          colorSpace, kCGImageAlphaPremultipliedLast);
  CGContextSetAllowsAntialiasing(ctx, {antialiasing});
  CGContextScaleCTM(ctx, kScale, kScale);
  f(ctx);
  CGImageRef img = CGBitmapContextCreateImage(ctx);
  NSURL* url = [NSURL fileURLWithPath:outputFilePath];
  CGImageDestinationRef destination = CGImageDestinationCreateWithURL(
    (__bridge CFURLRef)url, kUTTypePNG, 1, nil);
  CGImageDestinationAddImage(destination, img, nil);
  BOOL t = CGImageDestinationFinalize(destination);

  CGColorSpaceRelease(colorSpace);
  CGContextRelease(ctx);
  CGImageRelease(img);
  CFRelease(destination);
  return t ? 0 : 1;
}}

int main(int __attribute__((unused)) argc, const char* __attribute__((unused)) argv[]) {{
  int retCode = 0;
"#,
            header = escape_string(&self.config.header_import_path),
            scale = num(self.config.scale),
        )
    }

    fn generate_image(&self, image: &Image, _ids: &mut UniqueIds) -> Result<String> {
        let prefix = &self.config.prefix;
        let camel = &image.name.camel_case;
        Ok(format!(
            "  retCode |= WriteImageToFile({},\n      {},\n      @\"{}/{}.png\");",
            function_name(prefix, camel),
            size_constant_name(prefix, camel),
            escape_string(&self.config.output_dir),
            image.name.snake_case
        ))
    }

    fn ending(&self) -> String {
        "  return retCode;\n}".to_string()
    }
}
