//! Flat arena of named sub-routes owned by a top-level route.
//!
//! Entries may only invoke entries registered before them, so the
//! invocation graph is acyclic by construction.

use super::{DrawRoute, DrawStep};
use crate::error::{GenError, Result};
use std::collections::HashMap;

/// Index of a registered sub-route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubrouteId(pub usize);

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubrouteArena {
    entries: Vec<(String, DrawRoute)>,
    by_name: HashMap<String, SubrouteId>,
}

impl SubrouteArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `route` under `name`.
    pub fn register(&mut self, name: impl Into<String>, route: DrawRoute) -> Result<SubrouteId> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(GenError::MalformedRoute(format!(
                "sub-route {name} registered twice"
            )));
        }
        if !route.subroutes.is_empty() {
            return Err(GenError::MalformedRoute(format!(
                "sub-route {name} carries its own sub-routes"
            )));
        }

        let mut missing = None;
        for step in &route.steps {
            step.walk(&mut |s| {
                if let DrawStep::SubrouteWithName(target) = s
                    && missing.is_none()
                    && !self.by_name.contains_key(target)
                {
                    missing = Some(target.clone());
                }
            });
        }
        if let Some(target) = missing {
            return Err(GenError::MalformedRoute(format!(
                "sub-route {name} invokes {target}, which is not registered before it"
            )));
        }

        let id = SubrouteId(self.entries.len());
        self.entries.push((name.clone(), route));
        self.by_name.insert(name, id);
        Ok(id)
    }

    pub fn id_of(&self, name: &str) -> Option<SubrouteId> {
        self.by_name.get(name).copied()
    }

    pub fn get(&self, id: SubrouteId) -> Option<&DrawRoute> {
        self.entries.get(id.0).map(|(_, route)| route)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&DrawRoute> {
        self.id_of(name).and_then(|id| self.get(id))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DrawRoute)> {
        self.entries.iter().map(|(name, route)| (name.as_str(), route))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
