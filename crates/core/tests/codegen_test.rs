//! Objective-C backends over hand-built routes.

use indexmap::IndexMap;
use vecgen_core::codegen::{
    CallerConfig, CodeGenerator, GENERATED_MARKER, GeneratorConfig, ObjcCallerGenerator,
    ObjcGenerator, ObjcHeaderGenerator, UniqueIds,
};
use vecgen_core::error::GenError;
use vecgen_core::model::{Point, Rect, Rgba};
use vecgen_core::route::{
    DrawRoute, DrawStep, FillRule, Gradient, GradientOptions, SubrouteArena,
};
use vecgen_core::{Image, ImageName};

fn route(steps: Vec<DrawStep>) -> DrawRoute {
    DrawRoute {
        bounding_rect: Rect::new(0.0, 0.0, 10.0, 20.0),
        steps,
        ..Default::default()
    }
}

fn image(name: &str, route: DrawRoute) -> Image {
    Image::new(ImageName::new(name), route)
}

fn objc() -> ObjcGenerator {
    ObjcGenerator::new(GeneratorConfig {
        prefix: "VG".into(),
        header_import_path: None,
    })
}

fn red_triangle() -> DrawRoute {
    route(vec![
        DrawStep::MoveTo(Point::new(1.0, 2.0)),
        DrawStep::LineTo(Point::new(3.0, 4.5)),
        DrawStep::ClosePath,
        DrawStep::fill_with(Rgba::opaque(1.0, 0.0, 0.0), FillRule::Winding),
    ])
}

fn gradient_route(options: GradientOptions) -> DrawRoute {
    let gradient = Gradient::axial(
        vec![
            (0.0, Rgba::opaque(1.0, 1.0, 1.0)),
            (1.0, Rgba::new(0.0, 0.0, 0.0, 0.5)),
        ],
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
    )
    .with_options(options);
    let mut gradients = IndexMap::new();
    gradients.insert("Sh0".to_string(), gradient);
    DrawRoute {
        gradients,
        ..route(vec![DrawStep::PaintWithGradient {
            name: "Sh0".into(),
            start: None,
            end: None,
        }])
    }
}

fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

// ============================================================================
// Drawing functions
// ============================================================================

#[test]
fn test_drawing_function() {
    let code = objc()
        .generate_image(&image("arrow", red_triangle()), &mut UniqueIds::new())
        .unwrap();
    insta::assert_snapshot!(code, @r"
    void VGDrawArrowImageInContext(CGContextRef context) {
      CGColorSpaceRef rgbColorSpace = CGColorSpaceCreateDeviceRGB();
      CGContextMoveToPoint(context, (CGFloat)1, (CGFloat)2);
      CGContextAddLineToPoint(context, (CGFloat)3, (CGFloat)4.5);
      CGContextClosePath(context);
      CGColorRef color0 = CGColorCreate(rgbColorSpace, (CGFloat []){(CGFloat)1, (CGFloat)0, (CGFloat)0, (CGFloat)1});
      CGContextSetFillColorWithColor(context, color0);
      CGColorRelease(color0);
      CGContextFillPath(context);
      CGColorSpaceRelease(rgbColorSpace);
    }
    ");
}

#[test]
fn test_gradient_block() {
    let code = objc()
        .generate_image(
            &image("fade", gradient_route(GradientOptions::default())),
            &mut UniqueIds::new(),
        )
        .unwrap();
    insta::assert_snapshot!(code, @r"
    void VGDrawFadeImageInContext(CGContextRef context) {
      CGColorSpaceRef rgbColorSpace = CGColorSpaceCreateDeviceRGB();
      CGColorRef color0 = CGColorCreate(rgbColorSpace, (CGFloat []){(CGFloat)1, (CGFloat)1, (CGFloat)1, (CGFloat)1});
      CGColorRef color1 = CGColorCreate(rgbColorSpace, (CGFloat []){(CGFloat)0, (CGFloat)0, (CGFloat)0, (CGFloat)0.5});
      CFArrayRef colors2 = CFBridgingRetain(@[ (__bridge id)color0, (__bridge id)color1 ]);
      CGGradientRef gradient3 = CGGradientCreateWithColors(rgbColorSpace, colors2, (CGFloat []){(CGFloat)0, (CGFloat)1});
      CFRelease(colors2);
      CGColorRelease(color0);
      CGColorRelease(color1);
      CGGradientDrawingOptions gradientOptions4 = (CGGradientDrawingOptions)(0);
      CGContextDrawLinearGradient(context, gradient3, CGPointMake((CGFloat)0, (CGFloat)0), CGPointMake((CGFloat)10, (CGFloat)0), gradientOptions4);
      CGGradientRelease(gradient3);
      CGColorSpaceRelease(rgbColorSpace);
    }
    ");
}

#[test]
fn test_gradient_options_expression() {
    let code = objc()
        .generate_image(
            &image(
                "fade",
                gradient_route(GradientOptions {
                    draws_before_start: true,
                    draws_after_end: true,
                }),
            ),
            &mut UniqueIds::new(),
        )
        .unwrap();
    assert!(code.contains(
        "(CGGradientDrawingOptions)(kCGGradientDrawsBeforeStartLocation | kCGGradientDrawsAfterEndLocation);"
    ));
}

#[test]
fn test_single_option_flag() {
    let code = objc()
        .generate_image(
            &image(
                "fade",
                gradient_route(GradientOptions {
                    draws_before_start: true,
                    draws_after_end: false,
                }),
            ),
            &mut UniqueIds::new(),
        )
        .unwrap();
    assert!(code.contains("(CGGradientDrawingOptions)(kCGGradientDrawsBeforeStartLocation);"));
}

#[test]
fn test_releases_follow_creation() {
    let mut route = gradient_route(GradientOptions::default());
    route.steps.extend(red_triangle().steps);
    let code = objc()
        .generate_image(&image("mixed", route), &mut UniqueIds::new())
        .unwrap();

    let mut live: Vec<&str> = Vec::new();
    for line in code.lines() {
        if let Some(rest) = line.trim().strip_prefix("CGColorRef ") {
            live.push(rest.split(' ').next().unwrap());
        } else if let Some(rest) = line.trim().strip_prefix("CGColorRelease(") {
            let name = rest.trim_end_matches(");");
            let index = live.iter().position(|n| *n == name).unwrap();
            live.remove(index);
        }
    }
    assert!(live.is_empty(), "unreleased colors: {live:?}");
}

#[test]
fn test_stop_colors_released_before_drawing() {
    let code = objc()
        .generate_image(
            &image("fade", gradient_route(GradientOptions::default())),
            &mut UniqueIds::new(),
        )
        .unwrap();
    let position = |needle: &str| code.find(needle).unwrap();
    assert!(position("CFRelease(colors2);") < position("CGColorRelease(color0);"));
    assert!(position("CGColorRelease(color1);") < position("CGContextDrawLinearGradient"));
}

#[test]
fn test_generation_is_deterministic() {
    let images = [
        image("a", gradient_route(GradientOptions::default())),
        image("b", red_triangle()),
    ];
    let first = objc().generate_file(&images, &mut UniqueIds::new()).unwrap();
    let second = objc().generate_file(&images, &mut UniqueIds::new()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_every_created_object_released() {
    let mut steps = red_triangle().steps;
    steps.push(DrawStep::stroke_with(Rgba::BLACK));
    steps.push(DrawStep::AppendRoundedRect {
        rect: Rect::new(0.0, 0.0, 4.0, 4.0),
        rx: 1.0,
        ry: 1.0,
    });
    let mut route = gradient_route(GradientOptions::default());
    route.steps.extend(steps);

    let code = objc()
        .generate_image(&image("busy", route), &mut UniqueIds::new())
        .unwrap();
    assert_eq!(count(&code, "CGColorCreate("), count(&code, "CGColorRelease("));
    assert_eq!(count(&code, "CGColorCreate("), 4);
    assert_eq!(count(&code, "CGGradientCreateWithColors("), count(&code, "CGGradientRelease("));
    assert_eq!(count(&code, "CGPathCreateWithRoundedRect("), count(&code, "CGPathRelease("));
    assert_eq!(count(&code, "CGColorSpaceCreateDeviceRGB()"), 1);
    assert_eq!(count(&code, "CGColorSpaceRelease(rgbColorSpace)"), 1);
}

#[test]
fn test_ids_unique_across_images() {
    let images = [image("a", red_triangle()), image("b", red_triangle())];
    let file = objc().generate_file(&images, &mut UniqueIds::new()).unwrap();
    assert_eq!(count(&file, "CGColorRef color0 "), 1);
    assert_eq!(count(&file, "CGColorRef color1 "), 1);
    assert!(file.find("VGDrawAImageInContext") < file.find("VGDrawBImageInContext"));
}

#[test]
fn test_subroute_functions_precede_image() {
    let mut subroutes = SubrouteArena::new();
    subroutes
        .register("Fm0", route(vec![DrawStep::AppendRectangle(Rect::new(0.0, 0.0, 1.0, 1.0))]))
        .unwrap();
    let route = DrawRoute {
        subroutes,
        ..route(vec![DrawStep::saving_gstate([DrawStep::SubrouteWithName(
            "Fm0".into(),
        )])])
    };

    let code = objc()
        .generate_image(&image("icon", route), &mut UniqueIds::new())
        .unwrap();
    let helper = code
        .find("static void VGDrawIconSubrouteFm0(CGContextRef context) {")
        .unwrap();
    let main = code.find("void VGDrawIconImageInContext").unwrap();
    assert!(helper < main);
    assert!(code.contains(
        "  CGContextSaveGState(context);\n  VGDrawIconSubrouteFm0(context);\n  CGContextRestoreGState(context);"
    ));
    assert_eq!(count(&code, "CGColorSpaceCreateDeviceRGB()"), 2);
}

#[test]
fn test_undefined_references_rejected() {
    let missing_gradient = route(vec![DrawStep::PaintWithGradient {
        name: "Nope".into(),
        start: None,
        end: None,
    }]);
    let missing_subroute = route(vec![DrawStep::SubrouteWithName("Nope".into())]);
    for route in [missing_gradient, missing_subroute] {
        assert!(matches!(
            objc().generate_image(&image("x", route), &mut UniqueIds::new()),
            Err(GenError::MalformedRoute(_))
        ));
    }
}

#[test]
fn test_file_layout() {
    let generator = ObjcGenerator::new(GeneratorConfig {
        prefix: String::new(),
        header_import_path: Some("Images.h".into()),
    });
    let file = generator
        .generate_file(&[image("dot", route(vec![]))], &mut UniqueIds::new())
        .unwrap();
    assert!(file.starts_with(&format!(
        "{GENERATED_MARKER}\n\n#import \"Images.h\"\n\n#import <Foundation/Foundation.h>\n\nvoid DrawDotImageInContext(CGContextRef context) {{\n"
    )));
    assert!(file.ends_with("}\n\n\n"));
}

// ============================================================================
// Header and caller
// ============================================================================

#[test]
fn test_header_file() {
    let images = [image("arrow", red_triangle())];
    let file = ObjcHeaderGenerator::new("VG")
        .generate_file(&images, &mut UniqueIds::new())
        .unwrap();
    assert_eq!(
        file,
        "// Generated by vecgen\n\n\
         #import <CoreGraphics/CoreGraphics.h>\n\n\
         static const CGSize kVGArrowImageSize = (CGSize){.width = 10, .height = 20};\n\
         void VGDrawArrowImageInContext(CGContextRef context);\n\n\n"
    );
}

#[test]
fn test_caller_program() {
    let generator = ObjcCallerGenerator::new(CallerConfig {
        prefix: "VG".into(),
        header_import_path: "Images.h".into(),
        scale: 2.0,
        allow_antialiasing: true,
        output_dir: "out".into(),
    });
    let images = [image("arrow", red_triangle()), image("dot", route(vec![]))];
    let file = generator.generate_file(&images, &mut UniqueIds::new()).unwrap();

    assert!(file.contains("#import \"Images.h\""));
    assert!(file.contains("static const CGFloat kScale = 2;"));
    assert!(file.contains("CGContextSetAllowsAntialiasing(ctx, YES);"));
    assert!(file.contains(
        "  retCode |= WriteImageToFile(VGDrawArrowImageInContext,\n      kVGArrowImageSize,\n      @\"out/arrow.png\");"
    ));
    assert!(file.contains("@\"out/dot.png\");"));
    assert!(file.ends_with("  return retCode;\n}\n"));
}
