//! Incremental construction of a draw route.

use super::{DrawRoute, DrawStep, Gradient, SubrouteArena};
use crate::model::geometry::Rect;
use indexmap::IndexMap;
use tracing::debug;

/// Appends steps to a route under construction. `finish` hands out the
/// immutable route.
#[derive(Debug)]
pub struct RouteBuilder {
    route: DrawRoute,
}

impl RouteBuilder {
    pub fn new(bounding_rect: Rect) -> Self {
        Self {
            route: DrawRoute {
                bounding_rect,
                ..Default::default()
            },
        }
    }

    /// Append a step, returning its 0-based index.
    pub fn push(&mut self, step: DrawStep) -> usize {
        let index = self.route.steps.len();
        debug!(index, ?step, "append step");
        self.route.steps.push(step);
        index
    }

    pub fn len(&self) -> usize {
        self.route.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.route.steps.is_empty()
    }

    pub fn set_gradients(&mut self, gradients: IndexMap<String, Gradient>) {
        self.route.gradients = gradients;
    }

    pub fn set_subroutes(&mut self, subroutes: SubrouteArena) {
        self.route.subroutes = subroutes;
    }

    pub fn finish(self) -> DrawRoute {
        self.route
    }
}
