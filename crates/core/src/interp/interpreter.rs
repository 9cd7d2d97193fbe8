//! Content stream interpreter producing draw routes.
//!
//! Colors are deferred: color operators only update the current device
//! color, and paint operators materialize it together with the current
//! alpha from `gs`.

use super::content::{ContentParser, ContentToken};
use super::operands::OperandStack;
use crate::error::{GenError, Result};
use crate::model::color::DeviceColor;
use crate::model::geometry::{Point, Rect};
use crate::parser::Operator;
use crate::resources::Resources;
use crate::route::{DrawRoute, DrawStep, FillRule, RouteBuilder, SubrouteArena};
use tracing::{debug, trace, warn};

/// Paint parameters saved by `q` and restored by `Q`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintState {
    pub fill_color: DeviceColor,
    pub stroke_color: DeviceColor,
    pub fill_alpha: f64,
    pub stroke_alpha: f64,
}

impl Default for PaintState {
    fn default() -> Self {
        Self {
            fill_color: DeviceColor::default(),
            stroke_color: DeviceColor::default(),
            fill_alpha: 1.0,
            stroke_alpha: 1.0,
        }
    }
}

/// Interprets one content stream against resolved resources.
pub struct PageInterpreter<'r> {
    pub(crate) resources: &'r Resources,
    pub(crate) builder: RouteBuilder,
    pub(crate) operands: OperandStack,
    pub(crate) state: PaintState,
    pub(crate) gstack: Vec<PaintState>,
    /// Construction steps of the current path, replayed when a pending
    /// clip follows a painting operator.
    pub(crate) path: Vec<DrawStep>,
    pub(crate) current_point: Option<Point>,
    pub(crate) subpath_start: Option<Point>,
    /// Clip requested by `W`/`W*`, applied at the next painting operator.
    pub(crate) pending_clip: Option<FillRule>,
    /// Whether the current color space is `/Pattern`.
    pub(crate) fill_pattern: bool,
    pub(crate) stroke_pattern: bool,
    /// Nesting depth of `BX`/`EX` compatibility sections.
    compat_depth: usize,
}

/// Interpret `content` into a route on the given canvas.
pub fn interpret(
    content: &[u8],
    resources: &Resources,
    bounding_rect: Rect,
    subroutes: SubrouteArena,
) -> Result<DrawRoute> {
    let mut interpreter = PageInterpreter::new(resources, bounding_rect);
    interpreter.execute(content)?;
    Ok(interpreter.finish(subroutes))
}

impl<'r> PageInterpreter<'r> {
    pub fn new(resources: &'r Resources, bounding_rect: Rect) -> Self {
        let mut builder = RouteBuilder::new(bounding_rect);
        builder.set_gradients(resources.gradients.clone());
        Self {
            resources,
            builder,
            operands: OperandStack::new(),
            state: PaintState::default(),
            gstack: Vec::new(),
            path: Vec::new(),
            current_point: None,
            subpath_start: None,
            pending_clip: None,
            fill_pattern: false,
            stroke_pattern: false,
            compat_depth: 0,
        }
    }

    /// Run every operator of `content`.
    pub fn execute(&mut self, content: &[u8]) -> Result<()> {
        for token in ContentParser::new(content) {
            match token? {
                ContentToken::Operand(operand) => self.operands.push(operand),
                ContentToken::Operator(op) => {
                    let text = op.text();
                    trace!(op = %text, operands = self.operands.len(), "operator");
                    self.operands.begin(&text);
                    self.dispatch_operator(&op)?;
                    self.operands.clear();
                }
            }
        }
        if !self.operands.is_empty() {
            warn!(count = self.operands.len(), "trailing operands without operator");
        }
        if !self.gstack.is_empty() {
            debug!(depth = self.gstack.len(), "content ends inside saved graphics state");
        }
        Ok(())
    }

    pub fn finish(mut self, subroutes: SubrouteArena) -> DrawRoute {
        self.builder.set_subroutes(subroutes);
        self.builder.finish()
    }

    pub fn state(&self) -> &PaintState {
        &self.state
    }

    pub(crate) fn push(&mut self, step: DrawStep) {
        self.builder.push(step);
    }

    /// Append a path construction step, remembering it for clip replay.
    pub(crate) fn push_path(&mut self, step: DrawStep) {
        self.path.push(step.clone());
        self.builder.push(step);
    }

    fn dispatch_operator(&mut self, op: &Operator) -> Result<()> {
        match op {
            // Graphics state operators
            Operator::SaveState => self.do_q(),
            Operator::RestoreState => self.do_Q()?,
            Operator::Concat => {
                let m = self.operands.pop_transform()?;
                self.do_cm(m);
            }
            Operator::LineWidth => {
                let w = self.operands.pop_number()?;
                self.do_w(w);
            }
            Operator::LineCap => {
                let cap = self.operands.pop_int()?;
                self.do_J(cap)?;
            }
            Operator::LineJoin => {
                let join = self.operands.pop_int()?;
                self.do_j(join)?;
            }
            Operator::MiterLimit => {
                let limit = self.operands.pop_number()?;
                self.do_M(limit);
            }
            Operator::Dash => {
                let phase = self.operands.pop_number()?;
                let lengths = self.operands.pop_number_array()?;
                self.do_d(lengths, phase);
            }
            Operator::RenderingIntent => {
                let intent = self.operands.pop_name()?;
                self.do_ri(intent);
            }
            Operator::Flatness => {
                let flatness = self.operands.pop_number()?;
                self.do_i(flatness);
            }
            Operator::ExtGState => {
                let name = self.operands.pop_name()?;
                self.do_gs(&name)?;
            }

            // Path construction
            Operator::MoveTo => {
                let p = self.operands.pop_point()?;
                self.do_m(p);
            }
            Operator::LineTo => {
                let p = self.operands.pop_point()?;
                self.do_l(p);
            }
            Operator::CurveTo => {
                let end = self.operands.pop_point()?;
                let c2 = self.operands.pop_point()?;
                let c1 = self.operands.pop_point()?;
                self.do_c(c1, c2, end);
            }
            Operator::CurveToV => {
                let end = self.operands.pop_point()?;
                let c2 = self.operands.pop_point()?;
                self.do_v(c2, end)?;
            }
            Operator::CurveToY => {
                let end = self.operands.pop_point()?;
                let c1 = self.operands.pop_point()?;
                self.do_y(c1, end);
            }
            Operator::ClosePath => self.do_h(),
            Operator::Rectangle => {
                let rect = self.operands.pop_rect()?;
                self.do_re(rect);
            }

            // Path painting
            Operator::Stroke => self.do_S(),
            Operator::CloseStroke => self.do_s(),
            Operator::Fill | Operator::FillCompat => self.do_f(FillRule::Winding),
            Operator::FillEvenOdd => self.do_f(FillRule::EvenOdd),
            Operator::FillStroke => self.do_B(FillRule::Winding, false),
            Operator::FillStrokeEvenOdd => self.do_B(FillRule::EvenOdd, false),
            Operator::CloseFillStroke => self.do_B(FillRule::Winding, true),
            Operator::CloseFillStrokeEvenOdd => self.do_B(FillRule::EvenOdd, true),
            Operator::EndPath => self.do_n(),
            Operator::Clip => self.do_W(FillRule::Winding),
            Operator::ClipEvenOdd => self.do_W(FillRule::EvenOdd),

            // Color
            Operator::StrokeSpace => {
                let name = self.operands.pop_name()?;
                self.do_CS(&name);
            }
            Operator::FillSpace => {
                let name = self.operands.pop_name()?;
                self.do_cs(&name);
            }
            Operator::StrokeColor | Operator::StrokeColorN => self.do_SCN()?,
            Operator::FillColor | Operator::FillColorN => self.do_scn()?,
            Operator::StrokeGray => {
                let gray = self.operands.pop_number()?;
                self.do_G(gray);
            }
            Operator::FillGray => {
                let gray = self.operands.pop_number()?;
                self.do_g(gray);
            }
            Operator::StrokeRgb => {
                let rgb = self.operands.pop_rgb()?;
                self.do_RG(&rgb)?;
            }
            Operator::FillRgb => {
                let rgb = self.operands.pop_rgb()?;
                self.do_rg(&rgb)?;
            }
            Operator::StrokeCmyk => {
                let cmyk = self.operands.pop_numbers(4)?;
                self.do_K(&cmyk)?;
            }
            Operator::FillCmyk => {
                let cmyk = self.operands.pop_numbers(4)?;
                self.do_k(&cmyk)?;
            }

            // Shading and XObjects
            Operator::Shade => {
                let name = self.operands.pop_name()?;
                self.do_sh(&name)?;
            }
            Operator::Invoke => {
                let name = self.operands.pop_name()?;
                self.do_Do(&name)?;
            }

            // Marked content carries no drawing.
            Operator::BeginMarked
            | Operator::BeginMarkedProps
            | Operator::EndMarked
            | Operator::MarkPoint
            | Operator::MarkPointProps => {}

            Operator::BeginCompat => self.compat_depth += 1,
            Operator::EndCompat => self.compat_depth = self.compat_depth.saturating_sub(1),

            Operator::BeginText | Operator::EndText => {
                return Err(GenError::NotImplemented(format!("text operator {op}")));
            }
            Operator::BeginImage | Operator::ImageData | Operator::EndImage => {
                return Err(GenError::NotImplemented("inline images".into()));
            }
            Operator::GlyphWidth | Operator::GlyphBox => {
                return Err(GenError::NotImplemented(format!("glyph metrics operator {op}")));
            }
            Operator::Other(_) if self.compat_depth > 0 => {
                debug!(op = %op, "skipping unknown operator in compatibility section");
            }
            other => {
                return Err(GenError::NotImplemented(format!("operator {other}")));
            }
        }
        Ok(())
    }
}
