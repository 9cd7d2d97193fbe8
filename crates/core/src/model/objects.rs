//! Parsed PDF values.

use crate::error::{GenError, Result};
use bytes::Bytes;
use indexmap::IndexMap;

/// Keys keep file order, which keeps resource walks deterministic.
pub type PDFDict = IndexMap<String, PDFObject>;

#[derive(Debug, Clone, PartialEq)]
pub enum PDFObject {
    Null,
    Bool(bool),
    Int(i64),
    Real(f64),
    Name(String),
    String(Vec<u8>),
    Array(Vec<Self>),
    Dict(PDFDict),
    Stream(Box<PDFStream>),
    Ref(PDFObjRef),
}

impl PDFObject {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Real(_) => "real",
            Self::Name(_) => "name",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Dict(_) => "dictionary",
            Self::Stream(_) => "stream",
            Self::Ref(_) => "reference",
        }
    }

    fn mismatch(&self, expected: &'static str) -> GenError {
        GenError::TypeError {
            expected,
            got: self.kind(),
        }
    }

    pub fn as_bool(&self) -> Result<bool> {
        match *self {
            Self::Bool(b) => Ok(b),
            _ => Err(self.mismatch("boolean")),
        }
    }

    /// Integral reals count as integers.
    pub fn as_int(&self) -> Result<i64> {
        match *self {
            Self::Int(n) => Ok(n),
            Self::Real(r) if r.fract() == 0.0 => Ok(r as i64),
            _ => Err(self.mismatch("integer")),
        }
    }

    pub fn as_num(&self) -> Result<f64> {
        match *self {
            Self::Int(n) => Ok(n as f64),
            Self::Real(r) => Ok(r),
            _ => Err(self.mismatch("number")),
        }
    }

    pub fn as_name(&self) -> Result<&str> {
        match self {
            Self::Name(name) => Ok(name),
            _ => Err(self.mismatch("name")),
        }
    }

    pub fn as_array(&self) -> Result<&[Self]> {
        match self {
            Self::Array(items) => Ok(items),
            _ => Err(self.mismatch("array")),
        }
    }

    pub fn as_num_array(&self) -> Result<Vec<f64>> {
        self.as_array()?.iter().map(Self::as_num).collect()
    }

    /// A stream answers with its attribute dictionary.
    pub fn as_dict(&self) -> Result<&PDFDict> {
        match self {
            Self::Dict(dict) => Ok(dict),
            Self::Stream(stream) => Ok(&stream.attrs),
            _ => Err(self.mismatch("dictionary")),
        }
    }

    pub fn as_stream(&self) -> Result<&PDFStream> {
        match self {
            Self::Stream(stream) => Ok(stream),
            _ => Err(self.mismatch("stream")),
        }
    }
}

/// `objid genno R`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PDFObjRef {
    pub objid: u32,
    pub genno: u32,
}

impl PDFObjRef {
    pub const fn new(objid: u32, genno: u32) -> Self {
        Self { objid, genno }
    }
}

/// Stream attributes plus the bytes between `stream` and `endstream`,
/// still filtered.
#[derive(Debug, Clone, PartialEq)]
pub struct PDFStream {
    pub attrs: PDFDict,
    raw: Bytes,
}

impl PDFStream {
    pub fn new(attrs: PDFDict, raw: impl Into<Bytes>) -> Self {
        Self {
            attrs,
            raw: raw.into(),
        }
    }

    pub fn raw_data(&self) -> &[u8] {
        &self.raw
    }

    pub fn get(&self, key: &str) -> Option<&PDFObject> {
        self.attrs.get(key)
    }
}
