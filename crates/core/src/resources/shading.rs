//! Axial and radial shadings converted to gradients.

use super::function::ShadingFunction;
use crate::document::PDFDocument;
use crate::error::{GenError, Result};
use crate::model::color::DeviceColor;
use crate::model::geometry::Point;
use crate::model::objects::{PDFDict, PDFObject};
use crate::route::{Gradient, GradientKind, GradientOptions};

/// Convert a shading dictionary (or stream) to a gradient.
///
/// Only types 2 (axial) and 3 (radial) are supported. Stops are taken at
/// every breakpoint of the shading function, so piecewise-linear functions
/// are reproduced exactly.
pub fn parse_shading(doc: &PDFDocument, obj: &PDFObject) -> Result<Gradient> {
    let obj = doc.resolve(obj)?;
    let dict = obj.as_dict()?;
    let shading_type = doc
        .resolve_key(dict, "ShadingType")?
        .ok_or_else(|| GenError::KeyError("ShadingType".into()))?
        .as_int()?;

    let coords = numbers(doc, dict, "Coords")?.ok_or_else(|| GenError::KeyError("Coords".into()))?;
    let (kind, start_point, end_point) = match (shading_type, &coords[..]) {
        (2, &[x0, y0, x1, y1]) => (GradientKind::Axial, Point::new(x0, y0), Point::new(x1, y1)),
        (3, &[x0, y0, r0, x1, y1, r1]) => (
            GradientKind::Radial {
                start_radius: r0,
                end_radius: r1,
            },
            Point::new(x0, y0),
            Point::new(x1, y1),
        ),
        (2 | 3, _) => {
            return Err(GenError::DecodeError(format!(
                "shading type {shading_type} with {} coordinates",
                coords.len()
            )));
        }
        (other, _) => return Err(GenError::NotImplemented(format!("shading type {other}"))),
    };

    let [t0, t1] = match numbers(doc, dict, "Domain")?.as_deref() {
        None => [0.0, 1.0],
        Some(&[t0, t1]) => [t0, t1],
        Some(other) => {
            return Err(GenError::DecodeError(format!(
                "shading Domain with {} numbers",
                other.len()
            )));
        }
    };

    let function = dict
        .get("Function")
        .ok_or_else(|| GenError::KeyError("Function".into()))?;
    let function = ShadingFunction::parse(doc, function)?;

    let mut positions: Vec<f64> = function
        .breakpoints()
        .into_iter()
        .filter(|t| (t0.min(t1)..=t0.max(t1)).contains(t))
        .collect();
    positions.extend([t0, t1]);
    positions.sort_by(f64::total_cmp);
    positions.dedup_by(|a, b| (*a - *b).abs() < 1e-9);
    if t1 < t0 {
        positions.reverse();
    }

    let stops = positions
        .into_iter()
        .map(|t| {
            let location = if t1 == t0 { 0.0 } else { (t - t0) / (t1 - t0) };
            let color = DeviceColor::from_components(&function.evaluate(t))?;
            Ok((location, color.with_alpha(1.0)))
        })
        .collect::<Result<Vec<_>>>()?;

    let options = match doc.resolve_key(dict, "Extend")? {
        None => GradientOptions::default(),
        Some(extend) => match extend.as_array()? {
            [before, after] => GradientOptions {
                draws_before_start: doc.resolve(before)?.as_bool()?,
                draws_after_end: doc.resolve(after)?.as_bool()?,
            },
            other => {
                return Err(GenError::DecodeError(format!(
                    "shading Extend with {} entries",
                    other.len()
                )));
            }
        },
    };

    Ok(Gradient {
        kind,
        stops,
        start_point,
        end_point,
        options,
    })
}

fn numbers(doc: &PDFDocument, dict: &PDFDict, key: &str) -> Result<Option<Vec<f64>>> {
    match doc.resolve_key(dict, key)? {
        None => Ok(None),
        Some(obj) => obj
            .as_array()?
            .iter()
            .map(|v| doc.resolve(v).and_then(|v| v.as_num()))
            .collect::<Result<Vec<_>>>()
            .map(Some),
    }
}
