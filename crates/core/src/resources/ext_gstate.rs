//! Graphics state parameter dictionaries (`/ExtGState`).

use crate::document::PDFDocument;
use crate::error::{GenError, Result};
use crate::model::objects::PDFObject;
use crate::route::{BlendMode, DashPattern, LineCap, LineJoin};

/// One parameter change applied by the `gs` operator.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtGStateCommand {
    /// `CA`
    StrokeAlpha(f64),
    /// `ca`
    FillAlpha(f64),
    /// `LW`
    LineWidth(f64),
    /// `LC`
    LineCap(LineCap),
    /// `LJ`
    LineJoin(LineJoin),
    /// `ML`
    MiterLimit(f64),
    /// `D`
    Dash(DashPattern),
    /// `BM`
    BlendMode(BlendMode),
    /// A parameter that changes rendering but has no drawing equivalent.
    /// Applying it fails.
    Unsupported(String),
}

/// Parse an ExtGState dictionary into commands, in a fixed order
/// independent of the dictionary's key order.
pub fn parse_ext_gstate(doc: &PDFDocument, obj: &PDFObject) -> Result<Vec<ExtGStateCommand>> {
    let obj = doc.resolve(obj)?;
    let dict = obj.as_dict()?;
    let num = |key: &str| -> Result<Option<f64>> {
        doc.resolve_key(dict, key)?.map(|v| v.as_num()).transpose()
    };

    let mut commands = Vec::new();
    if let Some(alpha) = num("CA")? {
        commands.push(ExtGStateCommand::StrokeAlpha(alpha));
    }
    if let Some(alpha) = num("ca")? {
        commands.push(ExtGStateCommand::FillAlpha(alpha));
    }
    if let Some(width) = num("LW")? {
        commands.push(ExtGStateCommand::LineWidth(width));
    }
    if let Some(cap) = doc.resolve_key(dict, "LC")? {
        commands.push(ExtGStateCommand::LineCap(LineCap::from_pdf(cap.as_int()?)?));
    }
    if let Some(join) = doc.resolve_key(dict, "LJ")? {
        commands.push(ExtGStateCommand::LineJoin(LineJoin::from_pdf(join.as_int()?)?));
    }
    if let Some(limit) = num("ML")? {
        commands.push(ExtGStateCommand::MiterLimit(limit));
    }
    if let Some(dash) = doc.resolve_key(dict, "D")? {
        commands.push(ExtGStateCommand::Dash(parse_dash(doc, &dash)?));
    }
    if let Some(mode) = doc.resolve_key(dict, "BM")? {
        commands.push(match parse_blend_mode(doc, &mode) {
            Ok(mode) => ExtGStateCommand::BlendMode(mode),
            Err(GenError::NotImplemented(what)) => ExtGStateCommand::Unsupported(what),
            Err(e) => return Err(e),
        });
    }
    match doc.resolve_key(dict, "SMask")? {
        None => {}
        Some(PDFObject::Name(name)) if name == "None" => {}
        Some(_) => commands.push(ExtGStateCommand::Unsupported("soft mask".into())),
    }
    Ok(commands)
}

/// `[[lengths...] phase]`
fn parse_dash(doc: &PDFDocument, obj: &PDFObject) -> Result<DashPattern> {
    match obj.as_array()? {
        [lengths, phase] => {
            let lengths = doc
                .resolve(lengths)?
                .as_array()?
                .iter()
                .map(|v| doc.resolve(v).and_then(|v| v.as_num()))
                .collect::<Result<Vec<_>>>()?;
            Ok(DashPattern::new(doc.resolve(phase)?.as_num()?, lengths))
        }
        other => Err(GenError::DecodeError(format!(
            "dash array with {} entries",
            other.len()
        ))),
    }
}

/// A name, or an array of names where the first supported one wins.
fn parse_blend_mode(doc: &PDFDocument, obj: &PDFObject) -> Result<BlendMode> {
    match obj {
        PDFObject::Name(name) => BlendMode::from_pdf_name(name),
        PDFObject::Array(names) => {
            let mut last_error = GenError::DecodeError("empty blend mode array".into());
            for name in names {
                match BlendMode::from_pdf_name(doc.resolve(name)?.as_name()?) {
                    Ok(mode) => return Ok(mode),
                    Err(e) => last_error = e,
                }
            }
            Err(last_error)
        }
        other => Err(GenError::TypeError {
            expected: "name",
            got: other.kind(),
        }),
    }
}
