//! PDF document: object table, stream decoding and the document catalog.
//!
//! Objects are located by scanning the file for `N G obj` headers rather
//! than trusting cross-reference tables, which keeps hand-edited and
//! incrementally-updated files readable. Later definitions of the same
//! object number win. Objects stored in compressed object streams are
//! indexed from each `ObjStm` header.

use crate::error::{GenError, Result};
use crate::model::objects::{PDFDict, PDFObject, PDFStream};
use crate::parser::pdf_parser::ObjectParser;
use bytes::Bytes;
use regex::bytes::Regex;
use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::sync::{Arc, LazyLock, Mutex, RwLock};

static OBJ_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s+(\d+)\s+obj\b").expect("valid object header pattern"));

/// Reference chains longer than this are treated as malformed.
const MAX_REF_DEPTH: usize = 32;

/// A parsed PDF document.
pub struct PDFDocument {
    data: Bytes,
    /// objid -> byte offset just past the `obj` keyword
    offsets: HashMap<u32, usize>,
    /// objid -> (object stream objid, index within stream)
    objstm_index: HashMap<u32, (u32, usize)>,
    cache: RwLock<HashMap<u32, Arc<PDFObject>>>,
    /// objids whose parse is on the stack
    parsing: Mutex<HashSet<u32>>,
    catalog: PDFDict,
}

impl std::fmt::Debug for PDFDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PDFDocument")
            .field("len", &self.data.len())
            .field("objects", &self.offsets.len())
            .field("compressed_objects", &self.objstm_index.len())
            .finish()
    }
}

impl PDFDocument {
    /// Parse a document from its raw bytes.
    pub fn new(data: impl Into<Bytes>) -> Result<Self> {
        let data = data.into();
        let mut offsets = HashMap::new();
        for cap in OBJ_HEADER.captures_iter(&data) {
            let Some(objid) = std::str::from_utf8(&cap[1])
                .ok()
                .and_then(|s| s.parse::<u32>().ok())
            else {
                continue;
            };
            if let Some(m) = cap.get(0) {
                offsets.insert(objid, m.end());
            }
        }
        if offsets.is_empty() {
            return Err(GenError::SyntaxError("no objects found".into()));
        }

        let mut doc = Self {
            data,
            offsets,
            objstm_index: HashMap::new(),
            cache: RwLock::new(HashMap::new()),
            parsing: Mutex::new(HashSet::new()),
            catalog: PDFDict::new(),
        };
        doc.objstm_index = doc.build_objstm_index();
        doc.catalog = doc.find_catalog()?;
        Ok(doc)
    }

    /// Get document catalog.
    pub const fn catalog(&self) -> &PDFDict {
        &self.catalog
    }

    /// Number of objects known to the document.
    pub fn object_count(&self) -> usize {
        self.offsets.len() + self.objstm_index.len()
    }

    /// Fetch an object by number.
    pub fn getobj(&self, objid: u32) -> Result<Arc<PDFObject>> {
        if let Ok(cache) = self.cache.read()
            && let Some(obj) = cache.get(&objid)
        {
            return Ok(Arc::clone(obj));
        }

        if let Ok(mut parsing) = self.parsing.lock()
            && !parsing.insert(objid)
        {
            return Err(GenError::SyntaxError(format!(
                "reference cycle through object {objid}"
            )));
        }
        let parsed = if let Some(&offset) = self.offsets.get(&objid) {
            self.parse_object_at(offset)
        } else if let Some(&(stream_objid, index)) = self.objstm_index.get(&objid) {
            self.parse_object_from_stream(stream_objid, index)
        } else {
            Err(GenError::ObjectNotFound(objid))
        };
        if let Ok(mut parsing) = self.parsing.lock() {
            parsing.remove(&objid);
        }

        let obj = Arc::new(parsed?);
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(objid, Arc::clone(&obj));
        }
        Ok(obj)
    }

    /// Follow indirect references until a direct object is reached.
    pub fn resolve(&self, obj: &PDFObject) -> Result<PDFObject> {
        let mut current = obj.clone();
        for _ in 0..MAX_REF_DEPTH {
            match current {
                PDFObject::Ref(r) => current = self.getobj(r.objid)?.as_ref().clone(),
                other => return Ok(other),
            }
        }
        Err(GenError::SyntaxError("reference chain too deep".into()))
    }

    /// Resolve `dict[key]`, treating an absent key as `None`.
    pub fn resolve_key(&self, dict: &PDFDict, key: &str) -> Result<Option<PDFObject>> {
        dict.get(key).map(|v| self.resolve(v)).transpose()
    }

    /// Decode a stream's data, applying its filters.
    pub fn decode_stream(&self, stream: &PDFStream) -> Result<Vec<u8>> {
        let filters = match self.resolve_key(&stream.attrs, "Filter")? {
            None | Some(PDFObject::Null) => Vec::new(),
            Some(PDFObject::Name(name)) => vec![name],
            Some(PDFObject::Array(arr)) => arr
                .iter()
                .map(|f| self.resolve(f).and_then(|f| f.as_name().map(str::to_owned)))
                .collect::<Result<Vec<_>>>()?,
            Some(other) => {
                return Err(GenError::TypeError {
                    expected: "name",
                    got: other.kind(),
                });
            }
        };

        if let Some(parms) = self.resolve_key(&stream.attrs, "DecodeParms")?
            && let Ok(parms) = parms.as_dict()
            && parms.get("Predictor").and_then(|p| p.as_int().ok()).unwrap_or(1) > 1
        {
            return Err(GenError::DecodeError("stream predictors are not supported".into()));
        }

        let mut output = stream.raw_data().to_vec();
        for filter in filters {
            output = match filter.as_str() {
                "FlateDecode" | "Fl" => {
                    let mut decoder = flate2::read::ZlibDecoder::new(&output[..]);
                    let mut decompressed = Vec::new();
                    decoder
                        .read_to_end(&mut decompressed)
                        .map_err(|e| GenError::DecodeError(format!("FlateDecode: {e}")))?;
                    decompressed
                }
                other => {
                    return Err(GenError::DecodeError(format!("unsupported filter {other}")));
                }
            };
        }
        Ok(output)
    }

    /// Locate the catalog via the trailer, an XRef stream, or a scan for
    /// `/Type /Catalog`.
    fn find_catalog(&self) -> Result<PDFDict> {
        let root = self
            .find_trailer()
            .and_then(|t| t.get("Root").cloned())
            .or_else(|| self.find_xref_stream_root());

        if let Some(root) = root {
            return Ok(self.resolve(&root)?.as_dict()?.clone());
        }

        let mut ids: Vec<u32> = self
            .offsets
            .keys()
            .chain(self.objstm_index.keys())
            .copied()
            .collect();
        ids.sort_unstable();
        for objid in ids {
            if let Ok(obj) = self.getobj(objid)
                && let Ok(dict) = obj.as_dict()
                && matches!(dict.get("Type"), Some(PDFObject::Name(n)) if n == "Catalog")
            {
                return Ok(dict.clone());
            }
        }
        Err(GenError::SyntaxError("document catalog not found".into()))
    }

    /// Parse the last `trailer` dictionary in the file.
    fn find_trailer(&self) -> Option<PDFDict> {
        let needle = b"trailer";
        let data = self.data.as_ref();
        let pos = data
            .windows(needle.len())
            .rposition(|w| w == needle)?;
        let mut parser = ObjectParser::new(&data[pos + needle.len()..]);
        match parser.read_object() {
            Ok(PDFObject::Dict(dict)) => Some(dict),
            _ => None,
        }
    }

    fn find_xref_stream_root(&self) -> Option<PDFObject> {
        let mut offsets: Vec<usize> = self.offsets.values().copied().collect();
        offsets.sort_unstable_by(|a, b| b.cmp(a));
        offsets.into_iter().find_map(|offset| {
            let obj = self.parse_object_at(offset).ok()?;
            let stream = obj.as_stream().ok()?;
            match stream.get("Type") {
                Some(PDFObject::Name(n)) if n == "XRef" => stream.get("Root").cloned(),
                _ => None,
            }
        })
    }

    fn build_objstm_index(&self) -> HashMap<u32, (u32, usize)> {
        let mut index = HashMap::new();
        let mut ids: Vec<(u32, usize)> = self.offsets.iter().map(|(&id, &off)| (id, off)).collect();
        ids.sort_unstable();
        for (stream_objid, offset) in ids {
            let Ok(obj) = self.parse_object_at(offset) else {
                continue;
            };
            let Ok(stream) = obj.as_stream() else {
                continue;
            };
            if !matches!(stream.get("Type"), Some(PDFObject::Name(n)) if n == "ObjStm") {
                continue;
            }
            let Ok((header, _)) = self.objstm_header(stream) else {
                continue;
            };
            for (i, (objid, _)) in header.into_iter().enumerate() {
                if !self.offsets.contains_key(&objid) {
                    index.entry(objid).or_insert((stream_objid, i));
                }
            }
        }
        index
    }

    /// Decode an object stream, returning its `(objid, offset)` header and data.
    fn objstm_header(&self, stream: &PDFStream) -> Result<(Vec<(u32, usize)>, Vec<u8>)> {
        let data = self.decode_stream(stream)?;
        let n = non_negative(
            stream
                .get("N")
                .ok_or_else(|| GenError::SyntaxError("missing N in ObjStm".into()))?
                .as_int()?,
            "ObjStm N",
        )?;
        let first = non_negative(
            stream
                .get("First")
                .ok_or_else(|| GenError::SyntaxError("missing First in ObjStm".into()))?
                .as_int()?,
            "ObjStm First",
        )?;
        if first > data.len() {
            return Err(GenError::SyntaxError(format!(
                "ObjStm First {} exceeds data length {}",
                first,
                data.len()
            )));
        }

        let mut header_parser = ObjectParser::new(&data[..first]);
        let mut header = Vec::new();
        for _ in 0..n {
            let objid = u32::try_from(header_parser.read_object()?.as_int()?)
                .map_err(|_| GenError::SyntaxError("ObjStm object number out of range".into()))?;
            let offset = non_negative(header_parser.read_object()?.as_int()?, "ObjStm offset")?;
            let offset = first
                .checked_add(offset)
                .ok_or_else(|| GenError::SyntaxError("ObjStm offset out of range".into()))?;
            header.push((objid, offset));
        }
        Ok((header, data))
    }

    fn parse_object_from_stream(&self, stream_objid: u32, index: usize) -> Result<PDFObject> {
        let stream_obj = self.getobj(stream_objid)?;
        let (header, data) = self.objstm_header(stream_obj.as_stream()?)?;
        let &(_, offset) = header.get(index).ok_or_else(|| {
            GenError::SyntaxError(format!("index {} >= N {}", index, header.len()))
        })?;
        let slice = data
            .get(offset..)
            .ok_or_else(|| GenError::SyntaxError(format!("ObjStm offset {offset} out of range")))?;
        ObjectParser::new(slice).read_object()
    }

    /// Parse the object body starting just past its `obj` keyword.
    fn parse_object_at(&self, offset: usize) -> Result<PDFObject> {
        let body = self.data.get(offset..).ok_or_else(|| {
            GenError::SyntaxError(format!(
                "object offset {} exceeds file size {}",
                offset,
                self.data.len()
            ))
        })?;
        let mut parser = ObjectParser::new(body);
        let obj = parser.read_object()?;

        let PDFObject::Dict(dict) = obj else {
            return Ok(obj);
        };

        let remaining = parser.remaining();
        let ws = remaining
            .iter()
            .take_while(|b| matches!(b, b' ' | b'\t' | b'\r' | b'\n'))
            .count();
        if !remaining[ws..].starts_with(b"stream") {
            return Ok(PDFObject::Dict(dict));
        }

        let mut pos = ws + b"stream".len();
        if remaining.get(pos) == Some(&b'\r') {
            pos += 1;
        }
        if remaining.get(pos) == Some(&b'\n') {
            pos += 1;
        }
        let start = offset + (body.len() - remaining.len()) + pos;

        // An unusable Length falls back to scanning for `endstream`.
        let declared = match dict.get("Length") {
            Some(PDFObject::Int(n)) => usize::try_from(*n).ok(),
            Some(r @ PDFObject::Ref(_)) => self
                .resolve(r)
                .ok()
                .and_then(|l| l.as_int().ok())
                .and_then(|n| usize::try_from(n).ok()),
            _ => None,
        };
        let end = match declared.and_then(|len| start.checked_add(len)) {
            Some(end) if end <= self.data.len() => end,
            _ => {
                let tail = &self.data[start..];
                start + find_endstream(tail).unwrap_or(tail.len())
            }
        };

        Ok(PDFObject::Stream(Box::new(PDFStream::new(
            dict,
            self.data.slice(start..end),
        ))))
    }
}

fn non_negative(n: i64, what: &str) -> Result<usize> {
    usize::try_from(n).map_err(|_| GenError::SyntaxError(format!("{what} {n} is negative")))
}

/// Offset of `endstream` with preceding end-of-line markers trimmed.
fn find_endstream(data: &[u8]) -> Option<usize> {
    let needle = b"endstream";
    let pos = data.windows(needle.len()).position(|w| w == needle)?;
    let mut end = pos;
    while end > 0 && matches!(data[end - 1], b'\r' | b'\n') {
        end -= 1;
    }
    Some(end)
}
