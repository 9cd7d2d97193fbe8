//! Form XObjects, interpreted once each into named sub-routes.

use super::Resources;
use crate::document::PDFDocument;
use crate::document::page::parse_box;
use crate::error::{GenError, Result};
use crate::interp::interpret;
use crate::model::geometry::{AffineTransform, Rect};
use crate::model::objects::{PDFDict, PDFObject};
use crate::route::SubrouteArena;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// An XObject entry of a resource dictionary.
#[derive(Debug, Clone, PartialEq)]
pub enum XObject {
    Form(FormXObject),
    /// Image XObjects are recorded so that drawing one fails with a
    /// precise error.
    Image,
    /// A form listed in the resources of its own content, directly or
    /// through inherited resources. Only drawing it is an error.
    Recursive,
}

/// A form XObject already interpreted into the sub-route arena.
#[derive(Debug, Clone, PartialEq)]
pub struct FormXObject {
    /// Name of the sub-route holding the form's steps.
    pub subroute: String,
    pub matrix: AffineTransform,
    pub bbox: Rect,
}

/// Collects the sub-routes of one image. Forms are keyed by object id so a
/// form drawn several times, or listed under several names, is interpreted
/// once.
#[derive(Debug, Default)]
pub struct FormRegistry {
    arena: SubrouteArena,
    by_objid: HashMap<u32, FormXObject>,
    in_progress: HashSet<u32>,
}

impl FormRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interpret the form stream `obj` (registered under resource `name`),
    /// after every form it draws.
    pub fn register_form(
        &mut self,
        doc: &PDFDocument,
        name: &str,
        obj: &PDFObject,
        parent_resources: &PDFDict,
    ) -> Result<FormXObject> {
        let objid = match obj {
            PDFObject::Ref(r) => Some(r.objid),
            _ => None,
        };
        if let Some(id) = objid {
            if let Some(form) = self.by_objid.get(&id) {
                return Ok(form.clone());
            }
            if !self.in_progress.insert(id) {
                return Err(GenError::CyclicSubroute(name.to_string()));
            }
        }

        let result = self.interpret_form(doc, name, obj, parent_resources);
        if let Some(id) = objid {
            self.in_progress.remove(&id);
            if let Ok(form) = &result {
                self.by_objid.insert(id, form.clone());
            }
        }
        result
    }

    fn interpret_form(
        &mut self,
        doc: &PDFDocument,
        name: &str,
        obj: &PDFObject,
        parent_resources: &PDFDict,
    ) -> Result<FormXObject> {
        let obj = doc.resolve(obj)?;
        let stream = obj.as_stream()?;
        let bbox = doc
            .resolve_key(&stream.attrs, "BBox")?
            .ok_or_else(|| GenError::KeyError("BBox".into()))?;
        let bbox = parse_box(doc, &bbox)?;
        let matrix = match doc.resolve_key(&stream.attrs, "Matrix")? {
            None => AffineTransform::IDENTITY,
            Some(m) => match m.as_num_array()?[..] {
                [a, b, c, d, tx, ty] => AffineTransform::new(a, b, c, d, tx, ty),
                ref other => {
                    return Err(GenError::DecodeError(format!(
                        "form Matrix with {} numbers",
                        other.len()
                    )));
                }
            },
        };

        // Forms without their own resources use the drawing context's.
        let own_resources = doc.resolve_key(&stream.attrs, "Resources")?;
        let resource_dict = match &own_resources {
            Some(res) => res.as_dict()?,
            None => parent_resources,
        };
        let resources = Resources::resolve(doc, resource_dict, self)?;
        let content = doc.decode_stream(stream)?;
        let route = interpret(&content, &resources, bbox, SubrouteArena::new())?;

        let subroute = self.unique_name(name);
        debug!(name, subroute = %subroute, steps = route.steps.len(), "registered form");
        self.arena.register(subroute.clone(), route)?;
        Ok(FormXObject {
            subroute,
            matrix,
            bbox,
        })
    }

    /// Identifier-safe name, suffixed on collision.
    fn unique_name(&self, name: &str) -> String {
        let mut base: String = name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        if base.is_empty() {
            base.push_str("Form");
        }
        if !self.arena.contains(&base) {
            return base;
        }
        (2..)
            .map(|n| format!("{base}_{n}"))
            .find(|candidate| !self.arena.contains(candidate))
            .unwrap_or(base)
    }

    pub fn into_arena(self) -> SubrouteArena {
        self.arena
    }
}
