//! Typed pops from the operand stack.
//!
//! Operands are popped last-pushed first, so multi-value pops read their
//! values in reverse (`re` pops height, width, y, x).

use crate::error::{GenError, Result};
use crate::model::geometry::{AffineTransform, Point, Rect, Size};
use crate::parser::Token;

#[derive(Debug, Default)]
pub struct OperandStack {
    items: Vec<Token>,
    /// Operator currently consuming operands, for error messages.
    op: String,
}

impl OperandStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, token: Token) {
        self.items.push(token);
    }

    /// Start serving `op`.
    pub fn begin(&mut self, op: &str) {
        self.op.clear();
        self.op.push_str(op);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn underflow(&self) -> GenError {
        GenError::StackUnderflow {
            op: self.op.clone(),
        }
    }

    pub(crate) fn malformed(&self, msg: impl Into<String>) -> GenError {
        GenError::MalformedOperands {
            op: self.op.clone(),
            msg: msg.into(),
        }
    }

    /// Most recently pushed operand.
    pub fn last(&self) -> Option<&Token> {
        self.items.last()
    }

    pub fn pop(&mut self) -> Result<Token> {
        self.items.pop().ok_or_else(|| self.underflow())
    }

    /// Pop a number, or `None` when the stack is empty.
    pub fn try_pop_number(&mut self) -> Result<Option<f64>> {
        match self.items.pop() {
            None => Ok(None),
            Some(Token::Int(n)) => Ok(Some(n as f64)),
            Some(Token::Real(n)) => Ok(Some(n)),
            Some(other) => {
                Err(self.malformed(format!("expected number, got {}", other.describe())))
            }
        }
    }

    pub fn pop_number(&mut self) -> Result<f64> {
        self.try_pop_number()?.ok_or_else(|| self.underflow())
    }

    pub fn pop_int(&mut self) -> Result<i64> {
        match self.pop()? {
            Token::Int(n) => Ok(n),
            Token::Real(n) if n.fract() == 0.0 => Ok(n as i64),
            other => Err(self.malformed(format!("expected integer, got {}", other.describe()))),
        }
    }

    pub fn pop_name(&mut self) -> Result<String> {
        match self.pop()? {
            Token::Name(name) => Ok(name),
            other => Err(self.malformed(format!("expected name, got {}", other.describe()))),
        }
    }

    /// Pop a point (y, then x). `None` when the stack is empty; a lone
    /// coordinate is malformed.
    pub fn try_pop_point(&mut self) -> Result<Option<Point>> {
        let Some(y) = self.try_pop_number()? else {
            return Ok(None);
        };
        let x = self
            .try_pop_number()?
            .ok_or_else(|| self.malformed("point is missing its x coordinate"))?;
        Ok(Some(Point::new(x, y)))
    }

    pub fn pop_point(&mut self) -> Result<Point> {
        self.try_pop_point()?.ok_or_else(|| self.underflow())
    }

    /// Pop `w h`.
    pub fn pop_size(&mut self) -> Result<Size> {
        let height = self.pop_number()?;
        let width = self.pop_number()?;
        Ok(Size::new(width, height))
    }

    /// Pop `r g b`.
    pub fn pop_rgb(&mut self) -> Result<[f64; 3]> {
        let b = self.pop_number()?;
        let g = self.pop_number()?;
        let r = self.pop_number()?;
        Ok([r, g, b])
    }

    /// Pop `x y w h`.
    pub fn pop_rect(&mut self) -> Result<Rect> {
        let height = self.pop_number()?;
        let width = self.pop_number()?;
        let y = self.pop_number()?;
        let x = self.pop_number()?;
        Ok(Rect::new(x, y, width, height))
    }

    /// Pop `a b c d e f`.
    pub fn pop_transform(&mut self) -> Result<AffineTransform> {
        let ty = self.pop_number()?;
        let tx = self.pop_number()?;
        let d = self.pop_number()?;
        let c = self.pop_number()?;
        let b = self.pop_number()?;
        let a = self.pop_number()?;
        Ok(AffineTransform::new(a, b, c, d, tx, ty))
    }

    /// Pop `n` numbers, returned in push order.
    pub fn pop_numbers(&mut self, n: usize) -> Result<Vec<f64>> {
        let mut values = (0..n)
            .map(|_| self.pop_number())
            .collect::<Result<Vec<_>>>()?;
        values.reverse();
        Ok(values)
    }

    pub fn pop_number_array(&mut self) -> Result<Vec<f64>> {
        match self.pop()? {
            Token::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Token::Int(n) => Ok(n as f64),
                    Token::Real(n) => Ok(n),
                    other => Err(self.malformed(format!(
                        "expected number in array, got {}",
                        other.describe()
                    ))),
                })
                .collect(),
            other => Err(self.malformed(format!("expected array, got {}", other.describe()))),
        }
    }

    /// Remaining operands, in push order. Color operators with a variable
    /// operand count use this.
    pub fn drain(&mut self) -> Vec<Token> {
        std::mem::take(&mut self.items)
    }

    /// Remaining operands as numbers, in push order.
    pub fn drain_numbers(&mut self) -> Result<Vec<f64>> {
        self.drain()
            .into_iter()
            .map(|item| match item {
                Token::Int(n) => Ok(n as f64),
                Token::Real(n) => Ok(n),
                other => Err(self.malformed(format!("expected number, got {}", other.describe()))),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack(tokens: Vec<Token>) -> OperandStack {
        let mut stack = OperandStack::new();
        stack.begin("test");
        for t in tokens {
            stack.push(t);
        }
        stack
    }

    #[test]
    fn test_rect_pops_in_reverse() {
        let mut s = stack(vec![
            Token::Int(1),
            Token::Int(2),
            Token::Int(3),
            Token::Real(4.5),
        ]);
        assert_eq!(s.pop_rect().unwrap(), Rect::new(1.0, 2.0, 3.0, 4.5));
        assert!(s.is_empty());
    }

    #[test]
    fn test_underflow_names_operator() {
        let mut s = stack(vec![Token::Int(1)]);
        s.begin("re");
        match s.pop_rect() {
            Err(GenError::StackUnderflow { op }) => assert_eq!(op, "re"),
            other => panic!("expected underflow, got {other:?}"),
        }
    }

    #[test]
    fn test_try_pop_point() {
        let mut s = stack(vec![]);
        assert_eq!(s.try_pop_point().unwrap(), None);

        let mut s = stack(vec![Token::Int(5)]);
        assert!(matches!(
            s.try_pop_point(),
            Err(GenError::MalformedOperands { .. })
        ));

        let mut s = stack(vec![Token::Int(1), Token::Int(2)]);
        assert_eq!(s.try_pop_point().unwrap(), Some(Point::new(1.0, 2.0)));
    }

    #[test]
    fn test_wrong_type_is_malformed() {
        let mut s = stack(vec![Token::Name("X".into())]);
        assert!(matches!(
            s.pop_number(),
            Err(GenError::MalformedOperands { .. })
        ));
    }

    #[test]
    fn test_pop_numbers_keeps_push_order() {
        let mut s = stack(vec![Token::Int(1), Token::Int(2), Token::Int(3)]);
        assert_eq!(s.pop_numbers(2).unwrap(), vec![2.0, 3.0]);
        assert_eq!(s.drain_numbers().unwrap(), vec![1.0]);
    }

    #[test]
    fn test_size_and_rgb() {
        let mut s = stack(vec![
            Token::Real(0.25),
            Token::Int(1),
            Token::Int(0),
            Token::Int(30),
            Token::Int(40),
        ]);
        assert_eq!(s.pop_size().unwrap(), Size::new(30.0, 40.0));
        assert_eq!(s.pop_rgb().unwrap(), [0.25, 1.0, 0.0]);
    }
}
