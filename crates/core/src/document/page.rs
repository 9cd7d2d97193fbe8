//! PDF Page - a leaf of the document's page tree.

use super::catalog::PDFDocument;
use crate::error::{GenError, Result};
use crate::model::geometry::Rect;
use crate::model::objects::{PDFDict, PDFObject};
use std::collections::HashSet;

/// Attributes a page inherits from its ancestors in the page tree.
const INHERITABLE_ATTRS: [&str; 2] = ["MediaBox", "Resources"];

/// A PDF page object.
#[derive(Debug, Clone)]
pub struct PDFPage {
    /// Page object ID, when the page is an indirect object
    pub pageid: Option<u32>,
    /// Media box, normalized to origin + size
    pub mediabox: Rect,
    /// Page resources (direct dictionary, values may still be references)
    pub resources: PDFDict,
    /// Concatenated, decoded content streams
    pub contents: Vec<u8>,
}

impl PDFPage {
    /// Collect every page of the document in page-tree order.
    pub fn create_pages(doc: &PDFDocument) -> Result<Vec<PDFPage>> {
        let root = doc
            .catalog()
            .get("Pages")
            .ok_or_else(|| GenError::KeyError("Pages".into()))?
            .clone();
        let mut pages = Vec::new();
        let mut visited = HashSet::new();
        Self::walk(doc, &root, &PDFDict::new(), &mut visited, &mut pages)?;
        Ok(pages)
    }

    fn walk(
        doc: &PDFDocument,
        node: &PDFObject,
        inherited: &PDFDict,
        visited: &mut HashSet<u32>,
        pages: &mut Vec<PDFPage>,
    ) -> Result<()> {
        let objid = match node {
            PDFObject::Ref(r) => {
                if !visited.insert(r.objid) {
                    return Err(GenError::SyntaxError(format!(
                        "page tree revisits object {}",
                        r.objid
                    )));
                }
                Some(r.objid)
            }
            _ => None,
        };
        let resolved = doc.resolve(node)?;
        let dict = resolved.as_dict()?;

        let mut attrs = inherited.clone();
        for key in INHERITABLE_ATTRS {
            if let Some(value) = dict.get(key) {
                attrs.insert(key.to_string(), value.clone());
            }
        }

        let is_tree_node = match dict.get("Type") {
            Some(PDFObject::Name(t)) => t == "Pages",
            _ => dict.contains_key("Kids"),
        };

        if is_tree_node {
            let kids = doc
                .resolve_key(dict, "Kids")?
                .ok_or_else(|| GenError::KeyError("Kids".into()))?;
            for kid in kids.as_array()? {
                Self::walk(doc, kid, &attrs, visited, pages)?;
            }
            return Ok(());
        }

        for (key, value) in dict {
            if !INHERITABLE_ATTRS.contains(&key.as_str()) {
                attrs.insert(key.clone(), value.clone());
            }
        }
        pages.push(Self::from_attrs(doc, objid, &attrs)?);
        Ok(())
    }

    fn from_attrs(doc: &PDFDocument, pageid: Option<u32>, attrs: &PDFDict) -> Result<Self> {
        let mediabox = doc
            .resolve_key(attrs, "MediaBox")?
            .ok_or_else(|| GenError::SyntaxError("MediaBox missing".into()))
            .and_then(|b| parse_box(doc, &b))?;

        let resources = match doc.resolve_key(attrs, "Resources")? {
            Some(obj) => obj.as_dict()?.clone(),
            None => PDFDict::new(),
        };

        let mut contents = Vec::new();
        match doc.resolve_key(attrs, "Contents")? {
            None | Some(PDFObject::Null) => {}
            Some(PDFObject::Array(parts)) => {
                for part in &parts {
                    let stream = doc.resolve(part)?;
                    contents.extend(doc.decode_stream(stream.as_stream()?)?);
                    // Keep tokens of adjacent streams apart.
                    contents.push(b'\n');
                }
            }
            Some(obj) => contents = doc.decode_stream(obj.as_stream()?)?,
        }

        Ok(Self {
            pageid,
            mediabox,
            resources,
            contents,
        })
    }
}

/// Parse a `[x0 y0 x1 y1]` box, resolving referenced coordinates.
pub fn parse_box(doc: &PDFDocument, obj: &PDFObject) -> Result<Rect> {
    let coords = obj
        .as_array()?
        .iter()
        .map(|v| doc.resolve(v).and_then(|v| v.as_num()))
        .collect::<Result<Vec<f64>>>()?;
    match coords[..] {
        [x0, y0, x1, y1] => Ok(Rect::from_corners(x0, y0, x1, y1)),
        _ => Err(GenError::SyntaxError(format!(
            "box must have 4 numbers, got {}",
            coords.len()
        ))),
    }
}
