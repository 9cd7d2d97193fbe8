//! Draw route: the resolution-independent image representation.
//!
//! - `step` - DrawStep and the paint-state enums
//! - `gradient` - named gradient definitions
//! - `subroute` - arena of named sub-routes
//! - `builder` - RouteBuilder used by the interpreter

pub mod builder;
pub mod gradient;
pub mod step;
pub mod subroute;

pub use builder::RouteBuilder;
pub use gradient::{Gradient, GradientKind, GradientOptions};
pub use step::{BlendMode, DashPattern, DrawStep, DrawingMode, FillRule, LineCap, LineJoin};
pub use subroute::{SubrouteArena, SubrouteId};

use crate::model::geometry::Rect;
use indexmap::IndexMap;

/// A complete vector image: canvas, ordered steps and named resources.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawRoute {
    /// Canvas all steps draw in, taken from the declared page box.
    pub bounding_rect: Rect,
    pub steps: Vec<DrawStep>,
    pub gradients: IndexMap<String, Gradient>,
    /// Sub-routes invoked by `SubrouteWithName`. Only the top-level route
    /// of an image owns entries.
    pub subroutes: SubrouteArena,
}

impl DrawRoute {
    pub fn gradient(&self, name: &str) -> Option<&Gradient> {
        self.gradients.get(name)
    }
}
