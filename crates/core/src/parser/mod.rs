//! Tokenizer and object-syntax parser.

pub mod lexer;
pub mod pdf_parser;

pub use lexer::{Bracket, Lexer, Operator, Token};
pub use pdf_parser::ObjectParser;
