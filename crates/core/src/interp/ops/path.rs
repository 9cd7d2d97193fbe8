//! Path construction and painting operators.
//!
//! Handles: m, l, c, v, y, h, re, S, s, f, F, f*, B, B*, b, b*, n, W, W*
//!
//! Painting operators consume the path. A clip set by `W`/`W*` takes
//! effect after the paint, so the path is replayed before clipping when
//! the paint is not `n`.

use crate::error::{GenError, Result};
use crate::interp::interpreter::PageInterpreter;
use crate::model::geometry::{Point, Rect};
use crate::route::{DrawStep, DrawingMode, FillRule};

#[allow(non_snake_case)]
impl PageInterpreter<'_> {
    // ========================================================================
    // Path Construction Operators
    // ========================================================================

    /// Begins a new subpath at the given point.
    ///
    /// PDF operator: `m`
    pub fn do_m(&mut self, p: Point) {
        self.push_path(DrawStep::MoveTo(p));
        self.current_point = Some(p);
        self.subpath_start = Some(p);
    }

    /// Appends a straight line segment from the current point.
    ///
    /// PDF operator: `l`
    pub fn do_l(&mut self, p: Point) {
        self.push_path(DrawStep::LineTo(p));
        self.current_point = Some(p);
    }

    /// Appends a cubic Bezier curve to `end` with control points `c1`, `c2`.
    ///
    /// PDF operator: `c`
    pub fn do_c(&mut self, c1: Point, c2: Point, end: Point) {
        self.push_path(DrawStep::CurveTo(c1, c2, end));
        self.current_point = Some(end);
    }

    /// Curve whose first control point is the current point.
    ///
    /// PDF operator: `v`
    pub fn do_v(&mut self, c2: Point, end: Point) -> Result<()> {
        let c1 = self.current_point.ok_or_else(|| GenError::MalformedOperands {
            op: "v".into(),
            msg: "no current point".into(),
        })?;
        self.do_c(c1, c2, end);
        Ok(())
    }

    /// Curve whose second control point is its end point.
    ///
    /// PDF operator: `y`
    pub fn do_y(&mut self, c1: Point, end: Point) {
        self.do_c(c1, end, end);
    }

    /// PDF operator: `h`
    pub fn do_h(&mut self) {
        self.push_path(DrawStep::ClosePath);
        self.current_point = self.subpath_start;
    }

    /// PDF operator: `re`
    pub fn do_re(&mut self, rect: Rect) {
        self.push_path(DrawStep::AppendRectangle(rect));
        self.current_point = Some(rect.origin);
        self.subpath_start = Some(rect.origin);
    }

    // ========================================================================
    // Path Painting Operators
    // ========================================================================

    /// PDF operator: `S`
    pub fn do_S(&mut self) {
        let color = self.stroke_rgba();
        self.paint(Some(DrawStep::stroke_with(color)));
    }

    /// PDF operator: `s`
    pub fn do_s(&mut self) {
        self.do_h();
        self.do_S();
    }

    /// PDF operators: `f`, `F`, `f*`
    pub fn do_f(&mut self, rule: FillRule) {
        let color = self.fill_rgba();
        self.paint(Some(DrawStep::fill_with(color, rule)));
    }

    /// Fills then strokes, closing the subpath first when `close` is set.
    ///
    /// PDF operators: `B`, `B*`, `b`, `b*`
    pub fn do_B(&mut self, rule: FillRule, close: bool) {
        if close {
            self.do_h();
        }
        let mode = match rule {
            FillRule::Winding => DrawingMode::FillStroke,
            FillRule::EvenOdd => DrawingMode::EoFillStroke,
        };
        let step = DrawStep::Composite(vec![
            DrawStep::FillColor(self.fill_rgba()),
            DrawStep::StrokeColor(self.stroke_rgba()),
            DrawStep::DrawPath(mode),
        ]);
        self.paint(Some(step));
    }

    /// Ends the path without painting.
    ///
    /// PDF operator: `n`
    pub fn do_n(&mut self) {
        self.paint(None);
    }

    /// PDF operators: `W`, `W*`
    pub fn do_W(&mut self, rule: FillRule) {
        self.pending_clip = Some(rule);
    }

    fn paint(&mut self, step: Option<DrawStep>) {
        let clip = self.pending_clip.take();
        match step {
            Some(step) => {
                self.push(step);
                if let Some(rule) = clip {
                    for replay in std::mem::take(&mut self.path) {
                        self.push(replay);
                    }
                    self.push(DrawStep::Clip(rule));
                }
            }
            None => {
                if let Some(rule) = clip {
                    self.push(DrawStep::Clip(rule));
                }
                self.push(DrawStep::EndPath);
            }
        }
        self.path.clear();
        self.current_point = None;
        self.subpath_start = None;
    }
}
