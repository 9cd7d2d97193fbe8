//! Byte-level tokenizer shared by the object parser and the
//! content-stream interpreter.

use crate::error::{GenError, Result};
use indexmap::IndexMap;
use std::borrow::Cow;
use std::fmt;

/// Declares the operator table once and derives lookup in both directions.
macro_rules! operators {
    ($($(#[$meta:meta])* $variant:ident = $text:literal,)+) => {
        /// An operator word. Words outside the table are kept verbatim.
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum Operator {
            $($(#[$meta])* $variant,)+
            Other(Vec<u8>),
        }

        impl Operator {
            pub fn from_bytes(word: &[u8]) -> Self {
                match word {
                    $($text => Self::$variant,)+
                    _ => Self::Other(word.to_vec()),
                }
            }

            pub fn as_bytes(&self) -> &[u8] {
                match self {
                    $(Self::$variant => $text,)+
                    Self::Other(word) => word,
                }
            }
        }
    };
}

operators! {
    /// `R`, closing an indirect reference in object syntax.
    Reference = b"R",

    SaveState = b"q",
    RestoreState = b"Q",
    Concat = b"cm",
    LineWidth = b"w",
    LineCap = b"J",
    LineJoin = b"j",
    MiterLimit = b"M",
    Dash = b"d",
    RenderingIntent = b"ri",
    Flatness = b"i",
    ExtGState = b"gs",

    MoveTo = b"m",
    LineTo = b"l",
    CurveTo = b"c",
    /// Curve whose first control point is the current point.
    CurveToV = b"v",
    /// Curve whose second control point is the end point.
    CurveToY = b"y",
    ClosePath = b"h",
    Rectangle = b"re",

    Stroke = b"S",
    CloseStroke = b"s",
    Fill = b"f",
    /// Obsolete spelling of `f`.
    FillCompat = b"F",
    FillEvenOdd = b"f*",
    FillStroke = b"B",
    FillStrokeEvenOdd = b"B*",
    CloseFillStroke = b"b",
    CloseFillStrokeEvenOdd = b"b*",
    EndPath = b"n",
    Clip = b"W",
    ClipEvenOdd = b"W*",

    StrokeSpace = b"CS",
    FillSpace = b"cs",
    StrokeColor = b"SC",
    StrokeColorN = b"SCN",
    FillColor = b"sc",
    FillColorN = b"scn",
    StrokeGray = b"G",
    FillGray = b"g",
    StrokeRgb = b"RG",
    FillRgb = b"rg",
    StrokeCmyk = b"K",
    FillCmyk = b"k",

    Shade = b"sh",
    Invoke = b"Do",

    BeginText = b"BT",
    EndText = b"ET",
    BeginImage = b"BI",
    ImageData = b"ID",
    EndImage = b"EI",
    GlyphWidth = b"d0",
    GlyphBox = b"d1",

    MarkPoint = b"MP",
    MarkPointProps = b"DP",
    BeginMarked = b"BMC",
    BeginMarkedProps = b"BDC",
    EndMarked = b"EMC",

    BeginCompat = b"BX",
    EndCompat = b"EX",
}

impl Operator {
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bracket {
    /// `[` and `]`
    Array,
    /// `<<` and `>>`
    Dict,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Int(i64),
    Real(f64),
    Bool(bool),
    Null,
    /// `/Name`, with `#xx` escapes decoded.
    Name(String),
    /// Literal or hex string bytes.
    Str(Vec<u8>),
    Open(Bracket),
    Close(Bracket),
    Op(Operator),
    /// Grouped by the content parser; the lexer never yields these.
    Array(Vec<Token>),
    Dict(IndexMap<String, Token>),
}

impl Token {
    pub const fn describe(&self) -> &'static str {
        match self {
            Token::Int(_) => "integer",
            Token::Real(_) => "real",
            Token::Bool(_) => "boolean",
            Token::Null => "null",
            Token::Name(_) => "name",
            Token::Str(_) => "string",
            Token::Open(_) | Token::Close(_) => "bracket",
            Token::Op(_) => "operator",
            Token::Array(_) => "array",
            Token::Dict(_) => "dictionary",
        }
    }
}

fn is_white(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n' | 0x00 | 0x0c)
}

fn is_delim(b: u8) -> bool {
    matches!(b, b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%')
}

fn is_regular(b: u8) -> bool {
    !is_white(b) && !is_delim(b)
}

fn hex_digit(b: u8) -> Option<u8> {
    (b as char).to_digit(16).map(|d| d as u8)
}

fn unterminated(pos: usize) -> GenError {
    GenError::TokenError {
        pos,
        msg: "unterminated string".into(),
    }
}

/// Names are decoded byte-per-char so any byte survives a round trip.
pub(crate) fn latin1(bytes: &[u8]) -> String {
    bytes.iter().copied().map(char::from).collect()
}

/// Yields `(offset, token)` pairs over a borrowed buffer.
#[derive(Clone)]
pub struct Lexer<'a> {
    src: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a [u8]) -> Self {
        Self { src, pos: 0 }
    }

    /// Offset just past the last token returned.
    pub fn tell(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> &'a [u8] {
        self.src.get(self.pos..).unwrap_or_default()
    }

    fn byte(&self, ahead: usize) -> Option<u8> {
        self.src.get(self.pos + ahead).copied()
    }

    /// Consume bytes while `keep` holds and return them.
    fn take_while(&mut self, mut keep: impl FnMut(u8) -> bool) -> &'a [u8] {
        let start = self.pos;
        let len = self.src[start..].iter().take_while(|&&b| keep(b)).count();
        self.pos += len;
        &self.src[start..self.pos]
    }

    fn skip_blank(&mut self) {
        loop {
            self.take_while(is_white);
            if self.byte(0) != Some(b'%') {
                return;
            }
            self.take_while(|b| b != b'\r' && b != b'\n');
        }
    }

    pub fn next_token(&mut self) -> Option<Result<(usize, Token)>> {
        self.skip_blank();
        let start = self.pos;
        let first = self.byte(0)?;
        let token = match (first, self.byte(1)) {
            (b'/', _) => {
                self.pos += 1;
                Ok(self.name())
            }
            (b'(', _) => {
                self.pos += 1;
                self.literal_string(start)
            }
            (b'<', Some(b'<')) => {
                self.pos += 2;
                Ok(Token::Open(Bracket::Dict))
            }
            (b'<', _) => {
                self.pos += 1;
                self.hex_string(start)
            }
            (b'>', Some(b'>')) => {
                self.pos += 2;
                Ok(Token::Close(Bracket::Dict))
            }
            (b'[', _) => {
                self.pos += 1;
                Ok(Token::Open(Bracket::Array))
            }
            (b']', _) => {
                self.pos += 1;
                Ok(Token::Close(Bracket::Array))
            }
            (b'0'..=b'9', _) => self.number(start),
            (b'+' | b'-', Some(b'0'..=b'9' | b'.')) | (b'.', Some(b'0'..=b'9')) => {
                self.number(start)
            }
            (b, _) if is_delim(b) => {
                // Stray `)`, `>`, `{` or `}`: one byte, kept for diagnostics.
                self.pos += 1;
                Ok(Token::Op(Operator::Other(vec![b])))
            }
            _ => Ok(self.word()),
        };
        Some(token.map(|t| (start, t)))
    }

    fn name(&mut self) -> Token {
        let raw = self.take_while(is_regular);
        let mut decoded = Vec::with_capacity(raw.len());
        let mut i = 0;
        while i < raw.len() {
            if raw[i] == b'#' {
                let escaped = raw
                    .get(i + 1..i + 3)
                    .and_then(|pair| Some(hex_digit(pair[0])? << 4 | hex_digit(pair[1])?));
                if let Some(byte) = escaped {
                    decoded.push(byte);
                    i += 3;
                } else {
                    // A malformed escape drops the `#`.
                    i += 1;
                }
                continue;
            }
            decoded.push(raw[i]);
            i += 1;
        }
        Token::Name(latin1(&decoded))
    }

    fn number(&mut self, start: usize) -> Result<Token> {
        if matches!(self.byte(0), Some(b'+' | b'-')) {
            self.pos += 1;
        }
        let mut seen_dot = false;
        self.take_while(|b| {
            let dot = b == b'.' && !seen_dot;
            seen_dot |= dot;
            dot || b.is_ascii_digit()
        });
        let src = self.src;
        let raw = &src[start..self.pos];
        let bad = || GenError::TokenError {
            pos: start,
            msg: format!("malformed number {:?}", latin1(raw)),
        };
        let text = std::str::from_utf8(raw).map_err(|_| bad())?;
        if seen_dot {
            text.parse().map(Token::Real).map_err(|_| bad())
        } else {
            text.parse().map(Token::Int).map_err(|_| bad())
        }
    }

    fn literal_string(&mut self, start: usize) -> Result<Token> {
        let mut out = Vec::new();
        let mut depth = 0usize;
        loop {
            let b = self.byte(0).ok_or_else(|| unterminated(start))?;
            self.pos += 1;
            match b {
                b'(' => depth += 1,
                b')' if depth == 0 => return Ok(Token::Str(out)),
                b')' => depth -= 1,
                b'\\' => {
                    self.escape(start, &mut out)?;
                    continue;
                }
                _ => {}
            }
            out.push(b);
        }
    }

    fn escape(&mut self, start: usize, out: &mut Vec<u8>) -> Result<()> {
        let b = self.byte(0).ok_or_else(|| unterminated(start))?;
        self.pos += 1;
        match b {
            b'n' => out.push(b'\n'),
            b'r' => out.push(b'\r'),
            b't' => out.push(b'\t'),
            b'b' => out.push(0x08),
            b'f' => out.push(0x0c),
            // Line continuation.
            b'\n' => {}
            b'\r' => {
                if self.byte(0) == Some(b'\n') {
                    self.pos += 1;
                }
            }
            b'0'..=b'7' => {
                let mut value = u32::from(b - b'0');
                for _ in 0..2 {
                    match self.byte(0) {
                        Some(d @ b'0'..=b'7') => {
                            value = value * 8 + u32::from(d - b'0');
                            self.pos += 1;
                        }
                        _ => break,
                    }
                }
                out.push(value as u8);
            }
            other => out.push(other),
        }
        Ok(())
    }

    fn hex_string(&mut self, start: usize) -> Result<Token> {
        let body = self.take_while(|b| b != b'>');
        if self.byte(0).is_none() {
            return Err(unterminated(start));
        }
        self.pos += 1;

        let mut digits = Vec::with_capacity(body.len());
        for (i, &b) in body.iter().enumerate() {
            if is_white(b) {
                continue;
            }
            digits.push(hex_digit(b).ok_or_else(|| GenError::TokenError {
                pos: start + 1 + i,
                msg: format!("invalid hex digit {:?}", b as char),
            })?);
        }
        // An odd digit count behaves as if a trailing 0 followed.
        let bytes = digits
            .chunks(2)
            .map(|pair| pair[0] << 4 | pair.get(1).copied().unwrap_or(0))
            .collect();
        Ok(Token::Str(bytes))
    }

    fn word(&mut self) -> Token {
        match self.take_while(is_regular) {
            b"true" => Token::Bool(true),
            b"false" => Token::Bool(false),
            b"null" => Token::Null,
            word => Token::Op(Operator::from_bytes(word)),
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<(usize, Token)>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(src: &[u8]) -> Vec<Token> {
        Lexer::new(src)
            .map(|r| r.map(|(_, t)| t))
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_operator_table_lookup() {
        assert_eq!(Operator::from_bytes(b"re"), Operator::Rectangle);
        assert_eq!(Operator::from_bytes(b"f*"), Operator::FillEvenOdd);
        assert_eq!(Operator::from_bytes(b"q"), Operator::SaveState);
        assert_eq!(Operator::from_bytes(b"Q"), Operator::RestoreState);
        assert_eq!(Operator::from_bytes(b"Tj"), Operator::Other(b"Tj".to_vec()));
        assert_eq!(Operator::ClipEvenOdd.to_string(), "W*");
        assert_eq!(Operator::Invoke.as_bytes(), b"Do");
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            lex(b"1 -2 .5 -.25 3. +4"),
            vec![
                Token::Int(1),
                Token::Int(-2),
                Token::Real(0.5),
                Token::Real(-0.25),
                Token::Real(3.0),
                Token::Int(4),
            ]
        );
    }

    #[test]
    fn test_number_followed_by_operator() {
        assert_eq!(
            lex(b"10.5re"),
            vec![Token::Real(10.5), Token::Op(Operator::Rectangle)]
        );
    }

    #[test]
    fn test_names_decode_escapes() {
        assert_eq!(
            lex(b"/A#20B /Grad# /Fm0/Fm1"),
            vec![
                Token::Name("A B".into()),
                Token::Name("Grad".into()),
                Token::Name("Fm0".into()),
                Token::Name("Fm1".into()),
            ]
        );
    }

    #[test]
    fn test_strings_and_comments() {
        assert_eq!(
            lex(b"(a\\(b\\)c (nested)) % comment\n<48 65 6> (\\101\\n)"),
            vec![
                Token::Str(b"a(b)c (nested)".to_vec()),
                Token::Str(vec![0x48, 0x65, 0x60]),
                Token::Str(b"A\n".to_vec()),
            ]
        );
    }

    #[test]
    fn test_brackets_and_words() {
        assert_eq!(
            lex(b"<< >> [ ] true null 2 0 R"),
            vec![
                Token::Open(Bracket::Dict),
                Token::Close(Bracket::Dict),
                Token::Open(Bracket::Array),
                Token::Close(Bracket::Array),
                Token::Bool(true),
                Token::Null,
                Token::Int(2),
                Token::Int(0),
                Token::Op(Operator::Reference),
            ]
        );
    }

    #[test]
    fn test_unterminated_string_reports_start() {
        let result: Result<Vec<_>> = Lexer::new(b"1 (open").collect();
        assert!(matches!(result, Err(GenError::TokenError { pos: 2, .. })));
    }

    #[test]
    fn test_bad_hex_digit() {
        let result: Result<Vec<_>> = Lexer::new(b"<4G>").collect();
        assert!(matches!(result, Err(GenError::TokenError { pos: 2, .. })));
    }
}
