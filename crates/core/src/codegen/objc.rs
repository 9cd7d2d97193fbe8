//! Drawing backend: one CoreGraphics function per image.

use super::literal::{
    cg_point, cg_rect, cg_transform, cgfloat, cgfloat_array, context_call, escape_string,
    gradient_options, point_args,
};
use super::{CodeGenerator, GeneratorConfig, UniqueIds, function_name};
use crate::error::{GenError, Result};
use crate::image::Image;
use crate::model::color::Rgba;
use crate::model::geometry::Point;
use crate::route::{
    BlendMode, DrawRoute, DrawStep, DrawingMode, FillRule, Gradient, GradientKind, LineCap,
    LineJoin, SubrouteArena,
};
use indexmap::IndexMap;
use itertools::Itertools;
use tracing::debug;

const RGB_COLOR_SPACE: &str = "rgbColorSpace";

#[derive(Debug, Clone, Default)]
pub struct ObjcGenerator {
    config: GeneratorConfig,
}

/// Names and tables a function body is emitted against.
struct Scope<'a> {
    camel: &'a str,
    /// Gradients of the route being emitted.
    gradients: &'a IndexMap<String, Gradient>,
    /// Sub-routes of the image.
    subroutes: &'a SubrouteArena,
}

impl ObjcGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    fn subroute_function_name(&self, camel: &str, subroute: &str) -> String {
        format!("{}Draw{camel}Subroute{subroute}", self.config.prefix)
    }

    fn function(&self, signature: String, body: Vec<String>) -> String {
        let mut lines = Vec::with_capacity(body.len() + 4);
        lines.push(format!("{signature} {{"));
        lines.push(format!(
            "  CGColorSpaceRef {RGB_COLOR_SPACE} = CGColorSpaceCreateDeviceRGB();"
        ));
        lines.extend(body);
        lines.push(format!("  CGColorSpaceRelease({RGB_COLOR_SPACE});"));
        lines.push("}".to_string());
        lines.join("\n")
    }

    fn body(
        &self,
        route: &DrawRoute,
        scope: &Scope<'_>,
        ids: &mut UniqueIds,
    ) -> Result<Vec<String>> {
        let mut lines = Vec::new();
        for step in &route.steps {
            self.command(step, scope, ids, &mut lines)?;
        }
        Ok(lines)
    }

    fn command(
        &self,
        step: &DrawStep,
        scope: &Scope<'_>,
        ids: &mut UniqueIds,
        out: &mut Vec<String>,
    ) -> Result<()> {
        match step {
            DrawStep::SaveGState => out.push(context_call("SaveGState", None)),
            DrawStep::RestoreGState => out.push(context_call("RestoreGState", None)),

            DrawStep::MoveTo(p) => out.push(context_call("MoveToPoint", Some(&point_args(*p)))),
            DrawStep::LineTo(p) => out.push(context_call("AddLineToPoint", Some(&point_args(*p)))),
            DrawStep::CurveTo(c1, c2, end) => {
                let args = [c1, c2, end].into_iter().map(|p| point_args(*p)).join(", ");
                out.push(context_call("AddCurveToPoint", Some(&args)));
            }
            DrawStep::ClosePath => out.push(context_call("ClosePath", None)),
            DrawStep::AppendRectangle(rect) => {
                out.push(context_call("AddRect", Some(&cg_rect(*rect))))
            }
            DrawStep::AppendRoundedRect { rect, rx, ry } => {
                let path = ids.name("path");
                out.push(format!(
                    "  CGPathRef {path} = CGPathCreateWithRoundedRect({}, {}, {}, NULL);",
                    cg_rect(*rect),
                    cgfloat(*rx),
                    cgfloat(*ry)
                ));
                out.push(context_call("AddPath", Some(&path)));
                out.push(format!("  CGPathRelease({path});"));
            }
            DrawStep::AddEllipse(rect) => {
                out.push(context_call("AddEllipseInRect", Some(&cg_rect(*rect))))
            }
            DrawStep::Lines(points) => {
                let list = points.iter().map(|p| cg_point(*p)).join(", ");
                out.push(context_call(
                    "AddLines",
                    Some(&format!("(CGPoint []){{{list}}}, {}", points.len())),
                ));
            }

            DrawStep::Fill(FillRule::Winding) => out.push(context_call("FillPath", None)),
            DrawStep::Fill(FillRule::EvenOdd) => out.push(context_call("EOFillPath", None)),
            DrawStep::Stroke => out.push(context_call("StrokePath", None)),
            DrawStep::DrawPath(mode) => {
                let mode = match mode {
                    DrawingMode::Fill => "kCGPathFill",
                    DrawingMode::EoFill => "kCGPathEOFill",
                    DrawingMode::Stroke => "kCGPathStroke",
                    DrawingMode::FillStroke => "kCGPathFillStroke",
                    DrawingMode::EoFillStroke => "kCGPathEOFillStroke",
                };
                out.push(context_call("DrawPath", Some(mode)));
            }
            DrawStep::Clip(FillRule::Winding) => out.push(context_call("Clip", None)),
            DrawStep::Clip(FillRule::EvenOdd) => out.push(context_call("EOClip", None)),
            DrawStep::ClipToRect(rect) => {
                out.push(context_call("ClipToRect", Some(&cg_rect(*rect))))
            }
            DrawStep::ReplacePathWithStrokePath => {
                out.push(context_call("ReplacePathWithStrokedPath", None))
            }

            DrawStep::FillColor(color) => {
                self.with_color(*color, "SetFillColorWithColor", ids, out)
            }
            DrawStep::StrokeColor(color) => {
                self.with_color(*color, "SetStrokeColorWithColor", ids, out)
            }
            DrawStep::LineWidth(width) => {
                out.push(context_call("SetLineWidth", Some(&cgfloat(*width))))
            }
            DrawStep::Dash(dash) => {
                let args = if dash.lengths.is_empty() {
                    format!("{}, NULL, 0", cgfloat(dash.phase))
                } else {
                    format!(
                        "{}, {}, {}",
                        cgfloat(dash.phase),
                        cgfloat_array(dash.lengths.iter().copied()),
                        dash.lengths.len()
                    )
                };
                out.push(context_call("SetLineDash", Some(&args)));
            }
            DrawStep::Flatness(f) => out.push(context_call("SetFlatness", Some(&cgfloat(*f)))),
            DrawStep::MiterLimit(m) => out.push(context_call("SetMiterLimit", Some(&cgfloat(*m)))),
            DrawStep::LineJoin(join) => {
                let join = match join {
                    LineJoin::Miter => "kCGLineJoinMiter",
                    LineJoin::Round => "kCGLineJoinRound",
                    LineJoin::Bevel => "kCGLineJoinBevel",
                };
                out.push(context_call("SetLineJoin", Some(join)));
            }
            DrawStep::LineCap(cap) => {
                let cap = match cap {
                    LineCap::Butt => "kCGLineCapButt",
                    LineCap::Round => "kCGLineCapRound",
                    LineCap::Square => "kCGLineCapSquare",
                };
                out.push(context_call("SetLineCap", Some(cap)));
            }
            DrawStep::BlendMode(mode) => {
                out.push(context_call("SetBlendMode", Some(blend_mode_constant(*mode))))
            }
            DrawStep::GlobalAlpha(alpha) => {
                out.push(context_call("SetAlpha", Some(&cgfloat(*alpha))))
            }
            DrawStep::ColorRenderingIntent(_)
            | DrawStep::FillColorSpace
            | DrawStep::StrokeColorSpace
            | DrawStep::EndPath => {}

            DrawStep::ConcatCtm(t) => out.push(context_call("ConcatCTM", Some(&cg_transform(*t)))),

            DrawStep::PaintWithGradient { name, start, end } => {
                let gradient = scope.gradients.get(name).ok_or_else(|| {
                    GenError::MalformedRoute(format!("gradient {name} is not defined"))
                })?;
                self.draw_gradient(gradient, *start, *end, ids, out);
            }

            DrawStep::BeginTransparencyLayer => {
                out.push(context_call("BeginTransparencyLayer", Some("NULL")))
            }
            DrawStep::EndTransparencyLayer => out.push(context_call("EndTransparencyLayer", None)),

            DrawStep::SubrouteWithName(name) => {
                if !scope.subroutes.contains(name) {
                    return Err(GenError::MalformedRoute(format!(
                        "sub-route {name} is not defined"
                    )));
                }
                out.push(format!(
                    "  {}(context);",
                    self.subroute_function_name(scope.camel, name)
                ));
            }

            DrawStep::Composite(children) => {
                for child in children {
                    self.command(child, scope, ids, out)?;
                }
            }
        }
        Ok(())
    }

    /// `  CGColorRef colorN = CGColorCreate(...);`
    fn define_color(&self, color: Rgba, ids: &mut UniqueIds) -> (String, String) {
        let name = ids.name("color");
        let line = format!(
            "  CGColorRef {name} = CGColorCreate({RGB_COLOR_SPACE}, {});",
            cgfloat_array([color.red, color.green, color.blue, color.alpha])
        );
        (name, line)
    }

    fn with_color(&self, color: Rgba, call: &str, ids: &mut UniqueIds, out: &mut Vec<String>) {
        let (name, create) = self.define_color(color, ids);
        out.push(create);
        out.push(context_call(call, Some(&name)));
        out.push(format!("  CGColorRelease({name});"));
    }

    fn draw_gradient(
        &self,
        gradient: &Gradient,
        start: Option<Point>,
        end: Option<Point>,
        ids: &mut UniqueIds,
        out: &mut Vec<String>,
    ) {
        let colors: Vec<(String, String)> = gradient
            .stops
            .iter()
            .map(|(_, color)| self.define_color(*color, ids))
            .collect();
        out.extend(colors.iter().map(|(_, create)| create.clone()));

        let colors_array = ids.name("colors");
        let bridged = colors
            .iter()
            .map(|(name, _)| format!("(__bridge id){name}"))
            .join(", ");
        out.push(format!(
            "  CFArrayRef {colors_array} = CFBridgingRetain(@[ {bridged} ]);"
        ));

        let gradient_var = ids.name("gradient");
        out.push(format!(
            "  CGGradientRef {gradient_var} = CGGradientCreateWithColors({RGB_COLOR_SPACE}, {colors_array}, {});",
            cgfloat_array(gradient.stops.iter().map(|(location, _)| *location))
        ));
        out.push(format!("  CFRelease({colors_array});"));
        out.extend(colors.iter().map(|(name, _)| format!("  CGColorRelease({name});")));

        let options_var = ids.name("gradientOptions");
        out.push(format!(
            "  CGGradientDrawingOptions {options_var} = (CGGradientDrawingOptions)({});",
            gradient_options(gradient.options)
        ));

        let start = cg_point(start.unwrap_or(gradient.start_point));
        let end = cg_point(end.unwrap_or(gradient.end_point));
        out.push(match gradient.kind {
            GradientKind::Axial => format!(
                "  CGContextDrawLinearGradient(context, {gradient_var}, {start}, {end}, {options_var});"
            ),
            GradientKind::Radial {
                start_radius,
                end_radius,
            } => format!(
                "  CGContextDrawRadialGradient(context, {gradient_var}, {start}, {}, {end}, {}, {options_var});",
                cgfloat(start_radius),
                cgfloat(end_radius)
            ),
        });
        out.push(format!("  CGGradientRelease({gradient_var});"));
    }
}

fn blend_mode_constant(mode: BlendMode) -> &'static str {
    match mode {
        BlendMode::Normal => "kCGBlendModeNormal",
        BlendMode::Multiply => "kCGBlendModeMultiply",
        BlendMode::Screen => "kCGBlendModeScreen",
        BlendMode::Overlay => "kCGBlendModeOverlay",
        BlendMode::Darken => "kCGBlendModeDarken",
        BlendMode::Lighten => "kCGBlendModeLighten",
        BlendMode::ColorDodge => "kCGBlendModeColorDodge",
        BlendMode::ColorBurn => "kCGBlendModeColorBurn",
        BlendMode::HardLight => "kCGBlendModeHardLight",
        BlendMode::SoftLight => "kCGBlendModeSoftLight",
        BlendMode::Difference => "kCGBlendModeDifference",
        BlendMode::Exclusion => "kCGBlendModeExclusion",
        BlendMode::Hue => "kCGBlendModeHue",
        BlendMode::Saturation => "kCGBlendModeSaturation",
        BlendMode::Color => "kCGBlendModeColor",
        BlendMode::Luminosity => "kCGBlendModeLuminosity",
    }
}

impl CodeGenerator for ObjcGenerator {
    fn preamble(&self) -> String {
        let import = match &self.config.header_import_path {
            Some(path) => format!("#import \"{}\"", escape_string(path)),
            None => "#import <CoreGraphics/CoreGraphics.h>".to_string(),
        };
        format!("{import}\n\n#import <Foundation/Foundation.h>\n")
    }

    fn generate_image(&self, image: &Image, ids: &mut UniqueIds) -> Result<String> {
        let camel = image.name.camel_case.as_str();
        let route = &image.route;
        let mut functions = Vec::with_capacity(route.subroutes.len() + 1);

        for (name, subroute) in route.subroutes.iter() {
            let scope = Scope {
                camel,
                gradients: &subroute.gradients,
                subroutes: &route.subroutes,
            };
            let body = self.body(subroute, &scope, ids)?;
            functions.push(self.function(
                format!(
                    "static void {}(CGContextRef context)",
                    self.subroute_function_name(camel, name)
                ),
                body,
            ));
        }

        let scope = Scope {
            camel,
            gradients: &route.gradients,
            subroutes: &route.subroutes,
        };
        let body = self.body(route, &scope, ids)?;
        debug!(image = camel, lines = body.len(), "generated drawing function");
        functions.push(self.function(
            format!(
                "void {}(CGContextRef context)",
                function_name(&self.config.prefix, camel)
            ),
            body,
        ));
        Ok(functions.join("\n\n"))
    }

    fn ending(&self) -> String {
        String::new()
    }
}
