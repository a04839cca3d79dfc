//! Bounded operand stack.

use am4_syntax::error::{error, ErrorKind, Result};

pub struct Stack {
    items: Vec<i32>,
    capacity: usize,
}

impl Stack {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    /// `op` names the instruction for the error message.
    pub fn push(&mut self, value: i32, op: &str) -> Result<()> {
        if self.items.len() >= self.capacity {
            return error(
                ErrorKind::StackOverflow,
                format!("stack overflow in {} (capacity {}, value {})", op, self.capacity, value),
            );
        }
        self.items.push(value);
        Ok(())
    }

    pub fn pop(&mut self, op: &str) -> Result<i32> {
        match self.items.pop() {
            Some(v) => Ok(v),
            None => error(ErrorKind::StackUnderflow, format!("stack underflow in {}", op)),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifo_order() {
        let mut s = Stack::new(4);
        s.push(1, "push").unwrap();
        s.push(2, "push").unwrap();
        assert_eq!(s.pop("add").unwrap(), 2);
        assert_eq!(s.pop("add").unwrap(), 1);
        assert!(s.is_empty());
    }

    #[test]
    fn bounds_are_fatal() {
        let mut s = Stack::new(1);
        s.push(1, "push").unwrap();
        let err = s.push(2, "push").unwrap_err();
        assert_eq!(err.kind, ErrorKind::StackOverflow);
        assert_eq!(s.len(), 1);

        let mut s = Stack::new(1);
        let err = s.pop("lneg").unwrap_err();
        assert_eq!(err.kind, ErrorKind::StackUnderflow);
        assert_eq!(err.msg, "stack underflow in lneg");
    }
}
