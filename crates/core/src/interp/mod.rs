//! Content stream interpretation into draw routes.
//!
//! - `content`: tokenizer grouping arrays and dictionaries into operands
//! - `operands`: typed operand stack
//! - `interpreter`: page interpreter and operator dispatch
//! - `ops`: operator implementations by category

pub mod content;
pub mod interpreter;
pub mod operands;
pub mod ops;

pub use content::{ContentParser, ContentToken};
pub use interpreter::{PageInterpreter, PaintState, interpret};
pub use operands::OperandStack;
