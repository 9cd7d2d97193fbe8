//! Object syntax on top of the lexer: numbers, names, strings, arrays,
//! dictionaries and `objid genno R` references.

use crate::error::{GenError, Result};
use crate::model::objects::{PDFDict, PDFObjRef, PDFObject};
use crate::parser::lexer::{Bracket, Lexer, Operator, Token};

pub struct ObjectParser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> ObjectParser<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            lexer: Lexer::new(data),
        }
    }

    /// Offset just past the last object read.
    pub fn tell(&self) -> usize {
        self.lexer.tell()
    }

    pub fn remaining(&self) -> &'a [u8] {
        self.lexer.remaining()
    }

    fn token(&mut self) -> Result<(usize, Token)> {
        self.lexer.next_token().unwrap_or(Err(GenError::UnexpectedEof))
    }

    pub fn read_object(&mut self) -> Result<PDFObject> {
        let (pos, token) = self.token()?;
        self.object_from(pos, token)
    }

    fn object_from(&mut self, pos: usize, token: Token) -> Result<PDFObject> {
        Ok(match token {
            Token::Int(n) => match self.reference_tail(n) {
                Some(objref) => PDFObject::Ref(objref),
                None => PDFObject::Int(n),
            },
            Token::Real(n) => PDFObject::Real(n),
            Token::Bool(b) => PDFObject::Bool(b),
            Token::Null => PDFObject::Null,
            Token::Name(name) => PDFObject::Name(name),
            Token::Str(bytes) => PDFObject::String(bytes),
            Token::Open(Bracket::Array) => self.array()?,
            Token::Open(Bracket::Dict) => self.dict()?,
            other => {
                return Err(GenError::TokenError {
                    pos,
                    msg: format!("unexpected {} in object syntax", other.describe()),
                });
            }
        })
    }

    /// After an integer, consume `genno R` if it follows and rewind otherwise.
    fn reference_tail(&mut self, objid: i64) -> Option<PDFObjRef> {
        let mut ahead = self.lexer.clone();
        let genno = match ahead.next_token()? {
            Ok((_, Token::Int(genno))) => genno,
            _ => return None,
        };
        match ahead.next_token()? {
            Ok((_, Token::Op(Operator::Reference))) => {
                self.lexer = ahead;
                Some(PDFObjRef::new(
                    u32::try_from(objid).ok()?,
                    u32::try_from(genno).ok()?,
                ))
            }
            _ => None,
        }
    }

    fn array(&mut self) -> Result<PDFObject> {
        let mut items = Vec::new();
        loop {
            match self.token()? {
                (_, Token::Close(Bracket::Array)) => return Ok(PDFObject::Array(items)),
                (pos, token) => items.push(self.object_from(pos, token)?),
            }
        }
    }

    fn dict(&mut self) -> Result<PDFObject> {
        let mut dict = PDFDict::new();
        loop {
            let key = match self.token()? {
                (_, Token::Close(Bracket::Dict)) => return Ok(PDFObject::Dict(dict)),
                (_, Token::Name(key)) => key,
                (pos, other) => {
                    return Err(GenError::TokenError {
                        pos,
                        msg: format!("dictionary key must be a name, got {}", other.describe()),
                    });
                }
            };
            let value = self.read_object()?;
            dict.insert(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_inside_dict() {
        let mut parser = ObjectParser::new(b"<< /Type /Page /Parent 2 0 R /Box [0 0 10.5 20] >>");
        let obj = parser.read_object().unwrap();
        let dict = obj.as_dict().unwrap();
        assert_eq!(dict.get("Type"), Some(&PDFObject::Name("Page".into())));
        assert_eq!(dict.get("Parent"), Some(&PDFObject::Ref(PDFObjRef::new(2, 0))));
        assert_eq!(
            dict.get("Box").unwrap().as_num_array().unwrap(),
            vec![0.0, 0.0, 10.5, 20.0]
        );
        let keys: Vec<&str> = dict.keys().map(String::as_str).collect();
        assert_eq!(keys, ["Type", "Parent", "Box"]);
    }

    #[test]
    fn test_integers_without_r_stay_integers() {
        let mut parser = ObjectParser::new(b"[1 2 3] 4 5");
        assert_eq!(parser.read_object().unwrap().as_num_array().unwrap(), vec![1.0, 2.0, 3.0]);
        assert_eq!(parser.read_object().unwrap(), PDFObject::Int(4));
        assert_eq!(parser.read_object().unwrap(), PDFObject::Int(5));
        assert!(matches!(parser.read_object(), Err(GenError::UnexpectedEof)));
    }

    #[test]
    fn test_stray_operator_is_an_error() {
        let mut parser = ObjectParser::new(b"endobj");
        assert!(matches!(
            parser.read_object(),
            Err(GenError::TokenError { pos: 0, .. })
        ));
    }

    #[test]
    fn test_remaining_after_dict() {
        let mut parser = ObjectParser::new(b"<< /Length 3 >>\nstream\nabc");
        parser.read_object().unwrap();
        assert_eq!(parser.remaining(), b"\nstream\nabc");
    }
}
