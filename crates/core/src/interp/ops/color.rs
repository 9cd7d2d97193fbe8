//! Color operators.
//!
//! Handles: CS, cs, SC, SCN, sc, scn, G, g, RG, rg, K, k
//!
//! Colors are interpreted by operand count (1 gray, 3 RGB, 4 CMYK) and
//! kept on the paint state until a painting operator uses them.

use crate::error::{GenError, Result};
use crate::interp::interpreter::PageInterpreter;
use crate::model::color::{DeviceColor, Rgba};
use crate::parser::Token;
use crate::route::DrawStep;

#[allow(non_snake_case)]
impl PageInterpreter<'_> {
    pub(crate) fn fill_rgba(&self) -> Rgba {
        self.state.fill_color.with_alpha(self.state.fill_alpha)
    }

    pub(crate) fn stroke_rgba(&self) -> Rgba {
        self.state.stroke_color.with_alpha(self.state.stroke_alpha)
    }

    /// Sets the stroking color space and resets the stroke color to black.
    ///
    /// PDF operator: `CS`
    pub fn do_CS(&mut self, name: &str) {
        self.stroke_pattern = name == "Pattern";
        self.state.stroke_color = DeviceColor::default();
        self.push(DrawStep::StrokeColorSpace);
    }

    /// Sets the non-stroking color space and resets the fill color to black.
    ///
    /// PDF operator: `cs`
    pub fn do_cs(&mut self, name: &str) {
        self.fill_pattern = name == "Pattern";
        self.state.fill_color = DeviceColor::default();
        self.push(DrawStep::FillColorSpace);
    }

    /// PDF operators: `SC`, `SCN`
    pub fn do_SCN(&mut self) -> Result<()> {
        let color = self.color_operands(self.stroke_pattern)?;
        self.state.stroke_color = color;
        Ok(())
    }

    /// PDF operators: `sc`, `scn`
    pub fn do_scn(&mut self) -> Result<()> {
        let color = self.color_operands(self.fill_pattern)?;
        self.state.fill_color = color;
        Ok(())
    }

    /// PDF operator: `G`
    pub fn do_G(&mut self, gray: f64) {
        self.stroke_pattern = false;
        self.state.stroke_color = DeviceColor::Gray(gray);
    }

    /// PDF operator: `g`
    pub fn do_g(&mut self, gray: f64) {
        self.fill_pattern = false;
        self.state.fill_color = DeviceColor::Gray(gray);
    }

    /// PDF operator: `RG`
    pub fn do_RG(&mut self, rgb: &[f64]) -> Result<()> {
        self.stroke_pattern = false;
        self.state.stroke_color = DeviceColor::from_components(rgb)?;
        Ok(())
    }

    /// PDF operator: `rg`
    pub fn do_rg(&mut self, rgb: &[f64]) -> Result<()> {
        self.fill_pattern = false;
        self.state.fill_color = DeviceColor::from_components(rgb)?;
        Ok(())
    }

    /// PDF operator: `K`
    pub fn do_K(&mut self, cmyk: &[f64]) -> Result<()> {
        self.stroke_pattern = false;
        self.state.stroke_color = DeviceColor::from_components(cmyk)?;
        Ok(())
    }

    /// PDF operator: `k`
    pub fn do_k(&mut self, cmyk: &[f64]) -> Result<()> {
        self.fill_pattern = false;
        self.state.fill_color = DeviceColor::from_components(cmyk)?;
        Ok(())
    }

    fn color_operands(&mut self, pattern_space: bool) -> Result<DeviceColor> {
        if pattern_space || matches!(self.operands.last(), Some(Token::Name(_))) {
            return Err(GenError::NotImplemented("pattern colors".into()));
        }
        let components = self.operands.drain_numbers()?;
        if components.is_empty() {
            return Err(self.operands.underflow());
        }
        DeviceColor::from_components(&components)
            .map_err(|_| self.operands.malformed(format!("{} color components", components.len())))
    }
}
