//! Shading and XObject operators.
//!
//! Handles: sh, Do

use crate::error::{GenError, Result};
use crate::interp::interpreter::PageInterpreter;
use crate::resources::XObject;
use crate::route::DrawStep;

#[allow(non_snake_case)]
impl PageInterpreter<'_> {
    /// Paints a named shading over the current clip.
    ///
    /// PDF operator: `sh`
    pub fn do_sh(&mut self, name: &str) -> Result<()> {
        if let Some(what) = self.resources.unsupported_shadings.get(name) {
            return Err(GenError::NotImplemented(format!("{what} (/{name})")));
        }
        if !self.resources.gradients.contains_key(name) {
            return Err(GenError::UnknownResource {
                kind: "Shading",
                name: name.to_string(),
            });
        }
        self.push(DrawStep::PaintWithGradient {
            name: name.to_string(),
            start: None,
            end: None,
        });
        Ok(())
    }

    /// Draws a form XObject through its sub-route, under the form matrix
    /// and clipped to the form's bounding box.
    ///
    /// PDF operator: `Do`
    pub fn do_Do(&mut self, name: &str) -> Result<()> {
        let resources = self.resources;
        match resources.xobjects.get(name) {
            Some(XObject::Form(form)) => {
                self.push(DrawStep::saving_gstate([
                    DrawStep::ConcatCtm(form.matrix),
                    DrawStep::ClipToRect(form.bbox),
                    DrawStep::SubrouteWithName(form.subroute.clone()),
                ]));
                Ok(())
            }
            Some(XObject::Image) => Err(GenError::NotImplemented(format!("image XObject /{name}"))),
            Some(XObject::Recursive) => Err(GenError::CyclicSubroute(name.to_string())),
            None => Err(GenError::UnknownResource {
                kind: "XObject",
                name: name.to_string(),
            }),
        }
    }
}
