//! Scratch stack for expression types.
//!
//! Lowering pushes the type of every expression it evaluates and pops the
//! operand types it consumes, so after a complete statement the stack is
//! empty again.

use qlang_core::DataType;

#[derive(Debug, Default)]
pub struct InferStack {
    items: Vec<DataType>,
}

impl InferStack {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, ty: DataType) {
        self.items.push(ty);
    }

    #[inline]
    pub fn pop(&mut self) -> Option<DataType> {
        self.items.pop()
    }

    /// Remove the top `n` entries, returning them bottom-first.
    pub fn pop_n(&mut self, n: usize) -> Vec<DataType> {
        let at = self.items.len().saturating_sub(n);
        self.items.split_off(at)
    }

    #[inline]
    pub fn peek(&self) -> Option<&DataType> {
        self.items.last()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pop_n_returns_in_push_order() {
        let mut stack = InferStack::new();
        let a = DataType::named("int");
        let b = DataType::named("string");
        stack.push(a);
        stack.push(b);
        stack.push(a);
        assert_eq!(stack.pop_n(2), vec![b, a]);
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.peek(), Some(&a));
    }

    #[test]
    fn pop_n_saturates() {
        let mut stack = InferStack::new();
        stack.push(DataType::VOID);
        assert_eq!(stack.pop_n(5).len(), 1);
        assert!(stack.is_empty());
        assert_eq!(stack.pop(), None);
    }
}
