//! Value stack for the Duet VM
//!
//! The stack holds the VM's working set of object references and is
//! the GC root set: at collection time, every object reachable from a
//! stack slot survives. The stack holds handles only; ownership of
//! the objects lives in the heap.
//!
//! The stack is bounded. Overflow and underflow are hard errors, not
//! diagnostics: silently dropping a root would corrupt the mark
//! phase's correctness guarantee.

use crate::value::ObjectRef;
use crate::{VmError, VmResult};

/// Default maximum stack size (in slots)
pub const DEFAULT_STACK_CAPACITY: usize = 256;

/// Bounded stack of object references, used as the GC root set
pub struct Stack {
    slots: Vec<ObjectRef>,
    capacity: usize,
}

impl Stack {
    /// Create a new stack with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_STACK_CAPACITY)
    }

    /// Create a stack bounded to `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    /// Push a reference onto the stack.
    ///
    /// # Errors
    ///
    /// Returns `VmError::StackOverflow` if the stack is at its bound.
    #[inline]
    pub fn push(&mut self, value: ObjectRef) -> VmResult<()> {
        if self.slots.len() == self.capacity {
            return Err(VmError::StackOverflow);
        }
        self.slots.push(value);
        Ok(())
    }

    /// Pop and return the top reference.
    ///
    /// # Errors
    ///
    /// Returns `VmError::StackUnderflow` if the stack is empty.
    #[inline]
    pub fn pop(&mut self) -> VmResult<ObjectRef> {
        self.slots.pop().ok_or(VmError::StackUnderflow)
    }

    /// Peek at the top reference without popping.
    ///
    /// # Errors
    ///
    /// Returns `VmError::StackUnderflow` if the stack is empty.
    #[inline]
    pub fn peek(&self) -> VmResult<ObjectRef> {
        self.peek_n(0)
    }

    /// Peek at the reference `n` slots from the top (0 = top).
    ///
    /// # Errors
    ///
    /// Returns `VmError::StackUnderflow` if fewer than `n + 1` slots
    /// are occupied.
    #[inline]
    pub fn peek_n(&self, n: usize) -> VmResult<ObjectRef> {
        if self.slots.len() <= n {
            return Err(VmError::StackUnderflow);
        }
        Ok(self.slots[self.slots.len() - 1 - n])
    }

    /// Current stack depth.
    #[inline]
    pub fn depth(&self) -> usize {
        self.slots.len()
    }

    /// Check if the stack is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Maximum number of slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every root. Used during VM teardown so the final
    /// collection reclaims the whole heap.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Iterate over the current roots, bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = ObjectRef> + '_ {
        self.slots.iter().copied()
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop() {
        let mut stack = Stack::new();
        stack.push(ObjectRef(3)).unwrap();
        stack.push(ObjectRef(5)).unwrap();

        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.pop().unwrap(), ObjectRef(5));
        assert_eq!(stack.pop().unwrap(), ObjectRef(3));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_underflow() {
        let mut stack = Stack::new();
        assert!(matches!(stack.pop(), Err(VmError::StackUnderflow)));
        assert!(matches!(stack.peek(), Err(VmError::StackUnderflow)));
    }

    #[test]
    fn test_overflow_at_bound() {
        let mut stack = Stack::with_capacity(2);
        stack.push(ObjectRef(0)).unwrap();
        stack.push(ObjectRef(1)).unwrap();

        assert!(matches!(
            stack.push(ObjectRef(2)),
            Err(VmError::StackOverflow)
        ));
        // The failed push must not have clobbered anything.
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.peek().unwrap(), ObjectRef(1));
    }

    #[test]
    fn test_peek_n() {
        let mut stack = Stack::new();
        stack.push(ObjectRef(10)).unwrap();
        stack.push(ObjectRef(11)).unwrap();

        assert_eq!(stack.peek_n(0).unwrap(), ObjectRef(11));
        assert_eq!(stack.peek_n(1).unwrap(), ObjectRef(10));
        assert!(matches!(stack.peek_n(2), Err(VmError::StackUnderflow)));
    }

    #[test]
    fn test_iter_bottom_to_top() {
        let mut stack = Stack::new();
        for i in 0..4 {
            stack.push(ObjectRef(i)).unwrap();
        }

        let order: Vec<usize> = stack.iter().map(|r| r.index()).collect();
        assert_eq!(order, vec![0, 1, 2, 3]);
    }
}
