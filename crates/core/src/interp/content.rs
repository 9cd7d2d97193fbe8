//! Content stream tokenizer: groups array and dictionary tokens into
//! single operands and yields operators as they appear.

use crate::error::{GenError, Result};
use crate::parser::{Bracket, Lexer, Operator, Token};
use indexmap::IndexMap;

/// Token types produced by ContentParser.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentToken {
    /// An operand (number, string, name, array, dict)
    Operand(Token),
    /// An operator
    Operator(Operator),
}

/// Open `[` or `<<` awaiting its closing token.
#[derive(Debug)]
enum Context {
    Array(usize, Vec<Token>),
    Dict(usize, Vec<Token>),
}

pub struct ContentParser<'a> {
    lexer: Lexer<'a>,
    context_stack: Vec<Context>,
    failed: bool,
}

impl<'a> ContentParser<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            lexer: Lexer::new(data),
            context_stack: Vec::new(),
            failed: false,
        }
    }

    /// Byte offset of the next token.
    pub fn tell(&self) -> usize {
        self.lexer.tell()
    }

    fn next_token(&mut self) -> Option<Result<ContentToken>> {
        loop {
            let (pos, token) = match self.lexer.next_token()? {
                Ok(t) => t,
                Err(e) => return Some(Err(e)),
            };

            let token = match token {
                Token::Open(Bracket::Array) => {
                    self.context_stack.push(Context::Array(pos, Vec::new()));
                    continue;
                }
                Token::Open(Bracket::Dict) => {
                    self.context_stack.push(Context::Dict(pos, Vec::new()));
                    continue;
                }
                Token::Close(Bracket::Array) => match self.context_stack.pop() {
                    Some(Context::Array(_, items)) => Token::Array(items),
                    _ => return Some(Err(unbalanced(pos, "]"))),
                },
                Token::Close(Bracket::Dict) => match self.context_stack.pop() {
                    Some(Context::Dict(dict_pos, items)) => match build_dict(dict_pos, items) {
                        Ok(dict) => Token::Dict(dict),
                        Err(e) => return Some(Err(e)),
                    },
                    _ => return Some(Err(unbalanced(pos, ">>"))),
                },
                Token::Op(op) => {
                    if !self.context_stack.is_empty() {
                        return Some(Err(GenError::TokenError {
                            pos,
                            msg: format!("operator {op} inside an array or dictionary"),
                        }));
                    }
                    return Some(Ok(ContentToken::Operator(op)));
                }
                other => other,
            };

            match self.context_stack.last_mut() {
                Some(Context::Array(_, items) | Context::Dict(_, items)) => items.push(token),
                None => return Some(Ok(ContentToken::Operand(token))),
            }
        }
    }
}

impl Iterator for ContentParser<'_> {
    type Item = Result<ContentToken>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let item = match self.next_token() {
            None => match self.context_stack.last() {
                Some(Context::Array(pos, _) | Context::Dict(pos, _)) => {
                    Some(Err(GenError::TokenError {
                        pos: *pos,
                        msg: "unterminated array or dictionary".into(),
                    }))
                }
                None => None,
            },
            item => item,
        };
        if matches!(item, Some(Err(_))) {
            self.failed = true;
        }
        item
    }
}

fn unbalanced(pos: usize, token: &str) -> GenError {
    GenError::TokenError {
        pos,
        msg: format!("unbalanced {token}"),
    }
}

fn build_dict(pos: usize, items: Vec<Token>) -> Result<IndexMap<String, Token>> {
    if items.len() % 2 != 0 {
        return Err(GenError::TokenError {
            pos,
            msg: "dictionary with odd number of entries".into(),
        });
    }
    let mut dict = IndexMap::with_capacity(items.len() / 2);
    let mut iter = items.into_iter();
    while let (Some(key), Some(value)) = (iter.next(), iter.next()) {
        match key {
            Token::Name(name) => {
                dict.insert(name, value);
            }
            other => {
                return Err(GenError::TokenError {
                    pos,
                    msg: format!("dictionary key must be a name, got {}", other.describe()),
                });
            }
        }
    }
    Ok(dict)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(data: &[u8]) -> Vec<ContentToken> {
        ContentParser::new(data).collect::<Result<_>>().unwrap()
    }

    #[test]
    fn test_operands_then_operator() {
        assert_eq!(
            tokens(b"1 0 0 rg"),
            vec![
                ContentToken::Operand(Token::Int(1)),
                ContentToken::Operand(Token::Int(0)),
                ContentToken::Operand(Token::Int(0)),
                ContentToken::Operator(Operator::FillRgb),
            ]
        );
    }

    #[test]
    fn test_arrays_and_dicts_are_single_operands() {
        let toks = tokens(b"[3 [1]] 0 d /Span <</MCID 0>> BDC");
        assert_eq!(
            toks[0],
            ContentToken::Operand(Token::Array(vec![
                Token::Int(3),
                Token::Array(vec![Token::Int(1)])
            ]))
        );
        assert_eq!(toks[2], ContentToken::Operator(Operator::Dash));
        match &toks[4] {
            ContentToken::Operand(Token::Dict(d)) => assert_eq!(d["MCID"], Token::Int(0)),
            other => panic!("expected dict, got {other:?}"),
        }
        assert_eq!(toks[5], ContentToken::Operator(Operator::BeginMarkedProps));
    }

    #[test]
    fn test_unbalanced_input_fails_once() {
        let mut parser = ContentParser::new(b"1 ] 2 m");
        assert!(matches!(parser.next(), Some(Ok(_))));
        assert!(matches!(parser.next(), Some(Err(GenError::TokenError { .. }))));
        assert!(parser.next().is_none());

        let results: Vec<_> = ContentParser::new(b"[1 2").collect();
        assert!(results.last().unwrap().is_err());
    }
}
