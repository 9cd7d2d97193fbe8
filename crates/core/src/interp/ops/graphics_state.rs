//! Graphics state operators.
//!
//! Handles: q, Q, cm, w, J, j, M, d, ri, i, gs
//!
//! - q/Q: Save/restore, emitted as steps and mirrored on the paint state
//! - cm: Concatenate transformation matrix
//! - w, J, j, M, d: Line styling (width, cap, join, miter limit, dash)
//! - ri, i: Rendering intent and flatness
//! - gs: Apply a named graphics state parameter dictionary

use crate::error::{GenError, Result};
use crate::interp::interpreter::PageInterpreter;
use crate::model::geometry::AffineTransform;
use crate::resources::ExtGStateCommand;
use crate::route::{DashPattern, DrawStep, LineCap, LineJoin};

#[allow(non_snake_case)]
impl PageInterpreter<'_> {
    /// Saves the graphics state.
    ///
    /// PDF operator: `q`
    pub fn do_q(&mut self) {
        self.gstack.push(self.state);
        self.push(DrawStep::SaveGState);
    }

    /// Restores the most recently saved graphics state.
    ///
    /// PDF operator: `Q`
    pub fn do_Q(&mut self) -> Result<()> {
        self.state = self.gstack.pop().ok_or(GenError::GraphicsStackUnderflow)?;
        self.push(DrawStep::RestoreGState);
        Ok(())
    }

    /// PDF operator: `cm`
    pub fn do_cm(&mut self, matrix: AffineTransform) {
        self.push(DrawStep::ConcatCtm(matrix));
    }

    /// PDF operator: `w`
    pub fn do_w(&mut self, width: f64) {
        self.push(DrawStep::LineWidth(width));
    }

    /// PDF operator: `J`
    pub fn do_J(&mut self, cap: i64) -> Result<()> {
        self.push(DrawStep::LineCap(LineCap::from_pdf(cap)?));
        Ok(())
    }

    /// PDF operator: `j`
    pub fn do_j(&mut self, join: i64) -> Result<()> {
        self.push(DrawStep::LineJoin(LineJoin::from_pdf(join)?));
        Ok(())
    }

    /// PDF operator: `M`
    pub fn do_M(&mut self, limit: f64) {
        self.push(DrawStep::MiterLimit(limit));
    }

    /// PDF operator: `d`
    pub fn do_d(&mut self, lengths: Vec<f64>, phase: f64) {
        self.push(DrawStep::Dash(DashPattern::new(phase, lengths)));
    }

    /// PDF operator: `ri`
    pub fn do_ri(&mut self, intent: String) {
        self.push(DrawStep::ColorRenderingIntent(intent));
    }

    /// PDF operator: `i`
    pub fn do_i(&mut self, flatness: f64) {
        self.push(DrawStep::Flatness(flatness));
    }

    /// Applies a graphics state parameter dictionary. Alphas only update
    /// the paint state; they reach the route with the next paint.
    ///
    /// PDF operator: `gs`
    pub fn do_gs(&mut self, name: &str) -> Result<()> {
        let resources = self.resources;
        let commands = resources
            .ext_gstates
            .get(name)
            .ok_or_else(|| GenError::UnknownResource {
                kind: "ExtGState",
                name: name.to_string(),
            })?;
        for command in commands {
            match command {
                ExtGStateCommand::StrokeAlpha(alpha) => self.state.stroke_alpha = *alpha,
                ExtGStateCommand::FillAlpha(alpha) => self.state.fill_alpha = *alpha,
                ExtGStateCommand::LineWidth(width) => self.push(DrawStep::LineWidth(*width)),
                ExtGStateCommand::LineCap(cap) => self.push(DrawStep::LineCap(*cap)),
                ExtGStateCommand::LineJoin(join) => self.push(DrawStep::LineJoin(*join)),
                ExtGStateCommand::MiterLimit(limit) => self.push(DrawStep::MiterLimit(*limit)),
                ExtGStateCommand::Dash(dash) => self.push(DrawStep::Dash(dash.clone())),
                ExtGStateCommand::BlendMode(mode) => self.push(DrawStep::BlendMode(*mode)),
                ExtGStateCommand::Unsupported(what) => {
                    return Err(GenError::NotImplemented(format!(
                        "{what} in ExtGState /{name}"
                    )));
                }
            }
        }
        Ok(())
    }
}
