//! Single-input PDF functions used by shadings (types 0, 2 and 3).

use crate::document::PDFDocument;
use crate::error::{GenError, Result};
use crate::model::objects::{PDFDict, PDFObject};

/// Sample positions used to approximate a non-linear exponential function.
const EXPONENTIAL_SAMPLES: usize = 16;

/// Sampled functions with more samples than this are rejected.
const MAX_SAMPLES: usize = 1 << 16;

/// Stitching functions nested deeper than this are rejected.
const MAX_NESTING: usize = 8;

#[derive(Debug, Clone, PartialEq)]
pub enum PdfFunction {
    /// Type 0: a table of samples, linearly interpolated.
    Sampled {
        domain: [f64; 2],
        encode: [f64; 2],
        decode: Vec<f64>,
        range: Vec<f64>,
        bits_per_sample: u32,
        /// `samples[i]` holds the outputs of sample `i`.
        samples: Vec<Vec<u32>>,
    },
    /// Type 2: `C0 + x^N * (C1 - C0)`.
    Exponential {
        domain: [f64; 2],
        c0: Vec<f64>,
        c1: Vec<f64>,
        n: f64,
    },
    /// Type 3: sub-functions over adjacent subdomains.
    Stitching {
        domain: [f64; 2],
        functions: Vec<PdfFunction>,
        bounds: Vec<f64>,
        encode: Vec<f64>,
    },
}

impl PdfFunction {
    pub fn parse(doc: &PDFDocument, obj: &PDFObject) -> Result<Self> {
        Self::parse_nested(doc, obj, 0)
    }

    fn parse_nested(doc: &PDFDocument, obj: &PDFObject, depth: usize) -> Result<Self> {
        if depth > MAX_NESTING {
            return Err(GenError::DecodeError("function nesting too deep".into()));
        }
        let obj = doc.resolve(obj)?;
        let dict = obj.as_dict()?;
        let domain = pair(&num_array(doc, dict, "Domain")?.ok_or_else(|| missing("Domain"))?)?;

        let function_type = doc
            .resolve_key(dict, "FunctionType")?
            .ok_or_else(|| missing("FunctionType"))?
            .as_int()?;

        match function_type {
            0 => {
                let stream = obj.as_stream()?;
                let data = doc.decode_stream(stream)?;
                let size = num_array(doc, dict, "Size")?.ok_or_else(|| missing("Size"))?;
                let [size] = size[..] else {
                    return Err(GenError::NotImplemented(format!(
                        "sampled function with {} inputs",
                        size.len()
                    )));
                };
                if !(1.0..=MAX_SAMPLES as f64).contains(&size) || size.fract() != 0.0 {
                    return Err(GenError::DecodeError(format!(
                        "sampled function Size {size} is not in 1..={MAX_SAMPLES}"
                    )));
                }
                let size = size as usize;
                let range = num_array(doc, dict, "Range")?.ok_or_else(|| missing("Range"))?;
                if range.is_empty() || range.len() % 2 != 0 {
                    return Err(GenError::DecodeError("function Range must hold pairs".into()));
                }
                let bits_per_sample = doc
                    .resolve_key(dict, "BitsPerSample")?
                    .ok_or_else(|| missing("BitsPerSample"))?
                    .as_int()? as u32;
                if !matches!(bits_per_sample, 1 | 2 | 4 | 8 | 12 | 16 | 24 | 32) {
                    return Err(GenError::DecodeError(format!(
                        "invalid BitsPerSample {bits_per_sample}"
                    )));
                }
                let encode = match num_array(doc, dict, "Encode")? {
                    Some(e) => pair(&e)?,
                    None => [0.0, (size - 1) as f64],
                };
                let decode = num_array(doc, dict, "Decode")?.unwrap_or_else(|| range.clone());
                if decode.len() != range.len() {
                    return Err(GenError::DecodeError(format!(
                        "function Decode has {} entries, Range has {}",
                        decode.len(),
                        range.len()
                    )));
                }
                let outputs = range.len() / 2;
                let samples = read_samples(&data, size, outputs, bits_per_sample)?;
                Ok(PdfFunction::Sampled {
                    domain,
                    encode,
                    decode,
                    range,
                    bits_per_sample,
                    samples,
                })
            }
            2 => {
                let c0 = num_array(doc, dict, "C0")?.unwrap_or_else(|| vec![0.0]);
                let c1 = num_array(doc, dict, "C1")?.unwrap_or_else(|| vec![1.0]);
                if c0.len() != c1.len() {
                    return Err(GenError::DecodeError("C0 and C1 lengths differ".into()));
                }
                let n = doc.resolve_key(dict, "N")?.ok_or_else(|| missing("N"))?.as_num()?;
                Ok(PdfFunction::Exponential { domain, c0, c1, n })
            }
            3 => {
                let functions = doc
                    .resolve_key(dict, "Functions")?
                    .ok_or_else(|| missing("Functions"))?
                    .as_array()?
                    .iter()
                    .map(|f| Self::parse_nested(doc, f, depth + 1))
                    .collect::<Result<Vec<_>>>()?;
                let bounds = num_array(doc, dict, "Bounds")?.unwrap_or_default();
                let encode = num_array(doc, dict, "Encode")?.ok_or_else(|| missing("Encode"))?;
                if functions.is_empty()
                    || bounds.len() + 1 != functions.len()
                    || encode.len() != 2 * functions.len()
                {
                    return Err(GenError::DecodeError(
                        "stitching function arrays have inconsistent lengths".into(),
                    ));
                }
                Ok(PdfFunction::Stitching {
                    domain,
                    functions,
                    bounds,
                    encode,
                })
            }
            other => Err(GenError::NotImplemented(format!("function type {other}"))),
        }
    }

    pub fn domain(&self) -> [f64; 2] {
        match self {
            PdfFunction::Sampled { domain, .. }
            | PdfFunction::Exponential { domain, .. }
            | PdfFunction::Stitching { domain, .. } => *domain,
        }
    }

    pub fn n_outputs(&self) -> usize {
        match self {
            PdfFunction::Sampled { range, .. } => range.len() / 2,
            PdfFunction::Exponential { c0, .. } => c0.len(),
            PdfFunction::Stitching { functions, .. } => {
                functions.first().map_or(0, PdfFunction::n_outputs)
            }
        }
    }

    pub fn evaluate(&self, x: f64) -> Vec<f64> {
        let [d0, d1] = self.domain();
        let x = x.clamp(d0.min(d1), d0.max(d1));
        match self {
            PdfFunction::Sampled {
                encode,
                decode,
                range,
                bits_per_sample,
                samples,
                ..
            } => {
                let last = (samples.len() - 1) as f64;
                let e = interpolate(x, d0, d1, encode[0], encode[1]).clamp(0.0, last);
                let lo = e.floor() as usize;
                let hi = e.ceil() as usize;
                let frac = e - lo as f64;
                let max_sample = ((1u64 << bits_per_sample) - 1) as f64;
                (0..range.len() / 2)
                    .map(|j| {
                        let s = samples[lo][j] as f64 * (1.0 - frac) + samples[hi][j] as f64 * frac;
                        let (dmin, dmax) = (decode[2 * j], decode[2 * j + 1]);
                        let (rmin, rmax) = (range[2 * j], range[2 * j + 1]);
                        interpolate(s, 0.0, max_sample, dmin, dmax)
                            .clamp(rmin.min(rmax), rmin.max(rmax))
                    })
                    .collect()
            }
            PdfFunction::Exponential { c0, c1, n, .. } => {
                let p = x.powf(*n);
                c0.iter().zip(c1).map(|(a, b)| a + p * (b - a)).collect()
            }
            PdfFunction::Stitching {
                functions,
                bounds,
                encode,
                ..
            } => {
                let i = bounds.iter().take_while(|&&b| x >= b).count();
                let (lo, hi) = self.subdomain(i);
                let t = interpolate(x, lo, hi, encode[2 * i], encode[2 * i + 1]);
                functions[i].evaluate(t)
            }
        }
    }

    /// Inputs at which the function changes slope, sorted and deduplicated.
    /// Evaluating there and interpolating linearly reproduces the function
    /// exactly for sampled, linear and stitched-linear functions.
    pub fn breakpoints(&self) -> Vec<f64> {
        let [d0, d1] = self.domain();
        let mut points = match self {
            PdfFunction::Sampled { encode, samples, .. } => {
                if encode[1] == encode[0] {
                    vec![d0, d1]
                } else {
                    (0..samples.len())
                        .map(|i| interpolate(i as f64, encode[0], encode[1], d0, d1))
                        .collect()
                }
            }
            PdfFunction::Exponential { n, .. } => {
                if *n == 1.0 {
                    vec![d0, d1]
                } else {
                    (0..=EXPONENTIAL_SAMPLES)
                        .map(|i| interpolate(i as f64, 0.0, EXPONENTIAL_SAMPLES as f64, d0, d1))
                        .collect()
                }
            }
            PdfFunction::Stitching {
                functions, encode, ..
            } => {
                let mut points = Vec::new();
                for (i, function) in functions.iter().enumerate() {
                    let (lo, hi) = self.subdomain(i);
                    let (e0, e1) = (encode[2 * i], encode[2 * i + 1]);
                    points.push(lo);
                    if e1 != e0 {
                        points.extend(
                            function
                                .breakpoints()
                                .into_iter()
                                .map(|t| interpolate(t, e0, e1, lo, hi)),
                        );
                    }
                    points.push(hi);
                }
                points
            }
        };
        let (lo, hi) = (d0.min(d1), d0.max(d1));
        points.retain(|p| (lo..=hi).contains(p));
        points.sort_by(f64::total_cmp);
        points.dedup_by(|a, b| (*a - *b).abs() < 1e-9);
        points
    }

    fn subdomain(&self, i: usize) -> (f64, f64) {
        match self {
            PdfFunction::Stitching { domain, bounds, .. } => {
                let lo = if i == 0 { domain[0] } else { bounds[i - 1] };
                let hi = bounds.get(i).copied().unwrap_or(domain[1]);
                (lo, hi)
            }
            _ => (self.domain()[0], self.domain()[1]),
        }
    }
}

/// One function, or one single-output function per color component.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadingFunction {
    parts: Vec<PdfFunction>,
}

impl ShadingFunction {
    pub fn parse(doc: &PDFDocument, obj: &PDFObject) -> Result<Self> {
        let parts = match doc.resolve(obj)? {
            PDFObject::Array(items) => items
                .iter()
                .map(|f| PdfFunction::parse(doc, f))
                .collect::<Result<Vec<_>>>()?,
            _ => vec![PdfFunction::parse(doc, obj)?],
        };
        if parts.len() > 1 && parts.iter().any(|f| f.n_outputs() != 1) {
            return Err(GenError::DecodeError(
                "function arrays must hold single-output functions".into(),
            ));
        }
        Ok(Self { parts })
    }

    pub fn evaluate(&self, t: f64) -> Vec<f64> {
        self.parts.iter().flat_map(|f| f.evaluate(t)).collect()
    }

    pub fn breakpoints(&self) -> Vec<f64> {
        let mut points: Vec<f64> = self.parts.iter().flat_map(PdfFunction::breakpoints).collect();
        points.sort_by(f64::total_cmp);
        points.dedup_by(|a, b| (*a - *b).abs() < 1e-9);
        points
    }
}

fn interpolate(x: f64, x0: f64, x1: f64, y0: f64, y1: f64) -> f64 {
    if x1 == x0 {
        y0
    } else {
        y0 + (x - x0) * (y1 - y0) / (x1 - x0)
    }
}

fn missing(key: &str) -> GenError {
    GenError::KeyError(key.to_string())
}

fn pair(values: &[f64]) -> Result<[f64; 2]> {
    match *values {
        [a, b, ..] => Ok([a, b]),
        _ => Err(GenError::DecodeError(format!(
            "expected a pair of numbers, got {}",
            values.len()
        ))),
    }
}

fn num_array(doc: &PDFDocument, dict: &PDFDict, key: &str) -> Result<Option<Vec<f64>>> {
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

/// Unpack big-endian samples of `bits` width.
fn read_samples(data: &[u8], count: usize, outputs: usize, bits: u32) -> Result<Vec<Vec<u32>>> {
    let needed = count
        .checked_mul(outputs)
        .and_then(|n| n.checked_mul(bits as usize))
        .map(|n| n.div_ceil(8))
        .ok_or_else(|| GenError::DecodeError("sampled function table is too large".into()))?;
    if data.len() < needed {
        return Err(GenError::DecodeError(format!(
            "sampled function needs {} bytes, stream has {}",
            needed,
            data.len()
        )));
    }
    let mut bit_pos = 0usize;
    let mut next = || {
        let mut value = 0u32;
        for _ in 0..bits {
            let byte = data[bit_pos / 8];
            let bit = (byte >> (7 - bit_pos % 8)) & 1;
            value = (value << 1) | u32::from(bit);
            bit_pos += 1;
        }
        value
    };
    Ok((0..count)
        .map(|_| (0..outputs).map(|_| next()).collect())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exp(domain: [f64; 2], c0: Vec<f64>, c1: Vec<f64>, n: f64) -> PdfFunction {
        PdfFunction::Exponential { domain, c0, c1, n }
    }

    #[test]
    fn test_exponential_linear() {
        let f = exp([0.0, 1.0], vec![1.0, 0.0, 0.0], vec![0.0, 0.0, 1.0], 1.0);
        assert_eq!(f.evaluate(0.5), vec![0.5, 0.0, 0.5]);
        assert_eq!(f.breakpoints(), vec![0.0, 1.0]);
    }

    #[test]
    fn test_exponential_nonlinear_is_sampled() {
        let f = exp([0.0, 1.0], vec![0.0], vec![1.0], 2.0);
        assert_eq!(f.evaluate(0.5), vec![0.25]);
        assert_eq!(f.breakpoints().len(), EXPONENTIAL_SAMPLES + 1);
    }

    #[test]
    fn test_stitching_breakpoints_and_eval() {
        let f = PdfFunction::Stitching {
            domain: [0.0, 1.0],
            functions: vec![
                exp([0.0, 1.0], vec![0.0], vec![1.0], 1.0),
                exp([0.0, 1.0], vec![1.0], vec![0.0], 1.0),
            ],
            bounds: vec![0.25],
            encode: vec![0.0, 1.0, 0.0, 1.0],
        };
        assert_eq!(f.breakpoints(), vec![0.0, 0.25, 1.0]);
        assert_eq!(f.evaluate(0.125), vec![0.5]);
        assert_eq!(f.evaluate(0.25), vec![1.0]);
        assert_eq!(f.evaluate(1.0), vec![0.0]);
    }

    #[test]
    fn test_sampled_interpolates() {
        let f = PdfFunction::Sampled {
            domain: [0.0, 1.0],
            encode: [0.0, 2.0],
            decode: vec![0.0, 1.0],
            range: vec![0.0, 1.0],
            bits_per_sample: 8,
            samples: read_samples(&[0, 255, 0], 3, 1, 8).unwrap(),
        };
        assert_eq!(f.evaluate(0.25), vec![0.5]);
        assert_eq!(f.evaluate(0.5), vec![1.0]);
        assert_eq!(f.breakpoints(), vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_read_samples_overflowing_table() {
        assert!(matches!(
            read_samples(&[0], usize::MAX, 3, 8),
            Err(GenError::DecodeError(_))
        ));
    }

    #[test]
    fn test_read_samples_sub_byte() {
        assert_eq!(
            read_samples(&[0b1011_0001], 2, 1, 4).unwrap(),
            vec![vec![0b1011], vec![0b0001]]
        );
        assert!(read_samples(&[0], 2, 1, 8).is_err());
    }
}
