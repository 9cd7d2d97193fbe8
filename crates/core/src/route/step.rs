//! Drawing steps and the paint-state enums they carry.

use crate::error::{GenError, Result};
use crate::model::color::Rgba;
use crate::model::geometry::{AffineTransform, Point, Rect};
use smallvec::SmallVec;

/// Rule deciding which regions a path encloses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FillRule {
    Winding,
    EvenOdd,
}

/// How a combined paint operation consumes the current path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawingMode {
    Fill,
    EoFill,
    Stroke,
    FillStroke,
    EoFillStroke,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineJoin {
    Miter,
    Round,
    Bevel,
}

impl LineJoin {
    pub fn from_pdf(value: i64) -> Result<Self> {
        match value {
            0 => Ok(LineJoin::Miter),
            1 => Ok(LineJoin::Round),
            2 => Ok(LineJoin::Bevel),
            other => Err(GenError::DecodeError(format!("invalid line join {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineCap {
    Butt,
    Round,
    Square,
}

impl LineCap {
    pub fn from_pdf(value: i64) -> Result<Self> {
        match value {
            0 => Ok(LineCap::Butt),
            1 => Ok(LineCap::Round),
            2 => Ok(LineCap::Square),
            other => Err(GenError::DecodeError(format!("invalid line cap {other}"))),
        }
    }
}

/// Separable and non-separable blend modes shared by PDF and CoreGraphics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendMode {
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
}

impl BlendMode {
    pub fn from_pdf_name(name: &str) -> Result<Self> {
        Ok(match name {
            "Normal" | "Compatible" => BlendMode::Normal,
            "Multiply" => BlendMode::Multiply,
            "Screen" => BlendMode::Screen,
            "Overlay" => BlendMode::Overlay,
            "Darken" => BlendMode::Darken,
            "Lighten" => BlendMode::Lighten,
            "ColorDodge" => BlendMode::ColorDodge,
            "ColorBurn" => BlendMode::ColorBurn,
            "HardLight" => BlendMode::HardLight,
            "SoftLight" => BlendMode::SoftLight,
            "Difference" => BlendMode::Difference,
            "Exclusion" => BlendMode::Exclusion,
            "Hue" => BlendMode::Hue,
            "Saturation" => BlendMode::Saturation,
            "Color" => BlendMode::Color,
            "Luminosity" => BlendMode::Luminosity,
            other => return Err(GenError::NotImplemented(format!("blend mode {other}"))),
        })
    }
}

/// Dash lengths with their starting phase. Empty lengths mean a solid line.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashPattern {
    pub phase: f64,
    pub lengths: SmallVec<[f64; 4]>,
}

impl DashPattern {
    pub fn new(phase: f64, lengths: impl IntoIterator<Item = f64>) -> Self {
        Self {
            phase,
            lengths: lengths.into_iter().collect(),
        }
    }
}

/// One primitive drawing instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawStep {
    SaveGState,
    RestoreGState,

    MoveTo(Point),
    LineTo(Point),
    CurveTo(Point, Point, Point),
    ClosePath,
    AppendRectangle(Rect),
    AppendRoundedRect { rect: Rect, rx: f64, ry: f64 },
    AddEllipse(Rect),
    /// Polyline through the points, starting a new subpath at the first.
    Lines(Vec<Point>),

    Fill(FillRule),
    Stroke,
    DrawPath(DrawingMode),
    Clip(FillRule),
    ClipToRect(Rect),
    EndPath,
    ReplacePathWithStrokePath,

    FillColor(Rgba),
    StrokeColor(Rgba),
    LineWidth(f64),
    Dash(DashPattern),
    Flatness(f64),
    MiterLimit(f64),
    LineJoin(LineJoin),
    LineCap(LineCap),
    BlendMode(BlendMode),
    GlobalAlpha(f64),
    /// Recorded for fidelity; emits nothing.
    ColorRenderingIntent(String),
    /// Recorded for fidelity; emits nothing.
    FillColorSpace,
    /// Recorded for fidelity; emits nothing.
    StrokeColorSpace,

    ConcatCtm(AffineTransform),

    PaintWithGradient {
        name: String,
        start: Option<Point>,
        end: Option<Point>,
    },

    BeginTransparencyLayer,
    EndTransparencyLayer,

    SubrouteWithName(String),

    /// Children executed in order.
    Composite(Vec<DrawStep>),
}

impl DrawStep {
    /// Wrap steps in a save/restore bracket.
    pub fn saving_gstate(steps: impl IntoIterator<Item = DrawStep>) -> Self {
        let mut inner = vec![DrawStep::SaveGState];
        inner.extend(steps);
        inner.push(DrawStep::RestoreGState);
        DrawStep::Composite(inner)
    }

    /// Set the fill color then fill the current path.
    pub fn fill_with(color: Rgba, rule: FillRule) -> Self {
        DrawStep::Composite(vec![DrawStep::FillColor(color), DrawStep::Fill(rule)])
    }

    /// Set the stroke color then stroke the current path.
    pub fn stroke_with(color: Rgba) -> Self {
        DrawStep::Composite(vec![DrawStep::StrokeColor(color), DrawStep::Stroke])
    }

    /// Visit this step and, for composites, every nested child.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a DrawStep)) {
        f(self);
        if let DrawStep::Composite(children) = self {
            for child in children {
                child.walk(f);
            }
        }
    }
}
