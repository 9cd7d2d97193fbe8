//! Objective-C literal and call formatting.

use crate::model::geometry::{AffineTransform, Point, Rect};
use crate::route::GradientOptions;
use itertools::Itertools;

/// Shortest representation that parses back to `value`.
pub fn num(value: f64) -> String {
    if value == 0.0 {
        // Avoid "-0".
        "0".to_string()
    } else {
        value.to_string()
    }
}

pub fn cgfloat(value: f64) -> String {
    format!("(CGFloat){}", num(value))
}

/// `(CGFloat)x, (CGFloat)y`
pub fn point_args(p: Point) -> String {
    format!("{}, {}", cgfloat(p.x), cgfloat(p.y))
}

pub fn cg_point(p: Point) -> String {
    format!("CGPointMake({})", point_args(p))
}

pub fn cg_rect(r: Rect) -> String {
    format!(
        "CGRectMake({}, {}, {}, {})",
        cgfloat(r.origin.x),
        cgfloat(r.origin.y),
        cgfloat(r.size.width),
        cgfloat(r.size.height)
    )
}

pub fn cg_transform(t: AffineTransform) -> String {
    format!(
        "CGAffineTransformMake({}, {}, {}, {}, {}, {})",
        num(t.a),
        num(t.b),
        num(t.c),
        num(t.d),
        num(t.tx),
        num(t.ty)
    )
}

/// `(CGFloat []){(CGFloat)a, (CGFloat)b}`
pub fn cgfloat_array(values: impl IntoIterator<Item = f64>) -> String {
    format!("(CGFloat []){{{}}}", values.into_iter().map(cgfloat).join(", "))
}

/// Bitwise OR of the set flags, or `0`.
pub fn gradient_options(options: GradientOptions) -> String {
    let mut flags = Vec::new();
    if options.draws_before_start {
        flags.push("kCGGradientDrawsBeforeStartLocation");
    }
    if options.draws_after_end {
        flags.push("kCGGradientDrawsAfterEndLocation");
    }
    if flags.is_empty() {
        "0".to_string()
    } else {
        flags.join(" | ")
    }
}

/// `  CGContext{name}(context, args);`
pub fn context_call(name: &str, args: Option<&str>) -> String {
    match args {
        Some(args) => format!("  CGContext{name}(context, {args});"),
        None => format!("  CGContext{name}(context);"),
    }
}

/// Contents of an Objective-C string literal, escaped.
pub fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out
}
