//! Gradient definitions referenced by name from a draw route.

use crate::model::color::Rgba;
use crate::model::geometry::Point;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GradientKind {
    Axial,
    Radial { start_radius: f64, end_radius: f64 },
}

/// Whether the gradient extends past its end points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GradientOptions {
    pub draws_before_start: bool,
    pub draws_after_end: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    pub kind: GradientKind,
    /// `(location, color)` pairs, locations in 0..=1. Never empty.
    pub stops: Vec<(f64, Rgba)>,
    pub start_point: Point,
    pub end_point: Point,
    pub options: GradientOptions,
}

impl Gradient {
    pub fn axial(stops: Vec<(f64, Rgba)>, start_point: Point, end_point: Point) -> Self {
        Self {
            kind: GradientKind::Axial,
            stops,
            start_point,
            end_point,
            options: GradientOptions::default(),
        }
    }

    pub fn with_options(mut self, options: GradientOptions) -> Self {
        self.options = options;
        self
    }
}
