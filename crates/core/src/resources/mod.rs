//! Resource resolution: turns a page's resource dictionary into the
//! gradients, graphics-state commands and forms the interpreter draws with.
//!
//! - `function` - PDF function types 0, 2 and 3
//! - `shading` - axial and radial shadings to gradients
//! - `ext_gstate` - `gs` parameter dictionaries
//! - `xobject` - form XObjects and the per-image sub-route registry

pub mod ext_gstate;
pub mod function;
pub mod shading;
pub mod xobject;

pub use ext_gstate::ExtGStateCommand;
pub use xobject::{FormRegistry, FormXObject, XObject};

use crate::document::PDFDocument;
use crate::error::{GenError, Result};
use crate::model::objects::{PDFDict, PDFObject};
use crate::route::Gradient;
use indexmap::IndexMap;
use tracing::warn;

/// Resources available to one content stream, resolved up front.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resources {
    pub gradients: IndexMap<String, Gradient>,
    /// Shadings that exist but cannot be drawn, with the reason.
    pub unsupported_shadings: IndexMap<String, String>,
    pub ext_gstates: IndexMap<String, Vec<ExtGStateCommand>>,
    pub xobjects: IndexMap<String, XObject>,
}

impl Resources {
    /// Resolve `dict`. Forms it lists are interpreted and registered in
    /// `forms` before this returns.
    pub fn resolve(doc: &PDFDocument, dict: &PDFDict, forms: &mut FormRegistry) -> Result<Self> {
        let mut resources = Resources::default();

        for (name, obj) in sub_dict(doc, dict, "Shading")? {
            match shading::parse_shading(doc, &obj) {
                Ok(gradient) => {
                    resources.gradients.insert(name, gradient);
                }
                Err(GenError::NotImplemented(what)) => {
                    warn!(name = %name, what = %what, "shading cannot be drawn");
                    resources.unsupported_shadings.insert(name, what);
                }
                Err(e) => return Err(e),
            }
        }

        for (name, obj) in sub_dict(doc, dict, "ExtGState")? {
            let commands = ext_gstate::parse_ext_gstate(doc, &obj)?;
            resources.ext_gstates.insert(name, commands);
        }

        for (name, obj) in sub_dict(doc, dict, "XObject")? {
            let resolved = doc.resolve(&obj)?;
            let subtype = match resolved.as_dict()?.get("Subtype") {
                Some(s) => doc.resolve(s)?.as_name()?.to_string(),
                None => String::new(),
            };
            let xobject = match subtype.as_str() {
                "Form" => match forms.register_form(doc, &name, &obj, dict) {
                    Ok(form) => XObject::Form(form),
                    Err(GenError::CyclicSubroute(_)) => XObject::Recursive,
                    Err(e) => return Err(e),
                },
                "Image" => XObject::Image,
                other => {
                    warn!(name = %name, subtype = other, "ignoring xobject of unknown subtype");
                    continue;
                }
            };
            resources.xobjects.insert(name, xobject);
        }

        Ok(resources)
    }
}

/// Entries of `dict[key]`, unresolved, or nothing when the key is absent.
fn sub_dict(
    doc: &PDFDocument,
    dict: &PDFDict,
    key: &str,
) -> Result<Vec<(String, PDFObject)>> {
    match doc.resolve_key(dict, key)? {
        None => Ok(Vec::new()),
        Some(obj) => Ok(obj
            .as_dict()?
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()),
    }
}
