//! Virtual machine facade
//!
//! `Vm` owns the value stack, the object heap, and the collector, and
//! is the sole mutation path for all three. A `Vm` is plain
//! single-threaded state with no interior locking; independent
//! instances are fully isolated from one another.

use crate::gc::{CollectionReport, Collector, GcStats, Heap};
use crate::stack::Stack;
use crate::value::{Object, ObjectRef};
use crate::{VmError, VmResult};

/// Construction options for a [`Vm`].
#[derive(Debug, Clone, Copy)]
pub struct VmOptions {
    /// Value stack bound, in slots.
    pub stack_capacity: usize,

    /// Live-object count that triggers the first collection (and the
    /// reset point after a cycle that empties the heap).
    pub initial_threshold: usize,

    /// Hard cap on live objects (0 = unlimited). Reaching it makes
    /// allocation fail with `VmError::OutOfMemory`.
    pub max_objects: usize,
}

impl Default for VmOptions {
    fn default() -> Self {
        Self {
            stack_capacity: crate::stack::DEFAULT_STACK_CAPACITY,
            initial_threshold: crate::gc::INITIAL_THRESHOLD,
            max_objects: 0,
        }
    }
}

/// The Duet virtual machine.
pub struct Vm {
    stack: Stack,
    heap: Heap,
    collector: Collector,
}

impl Vm {
    /// Create a VM with default options.
    pub fn new() -> Self {
        Self::with_options(VmOptions::default())
    }

    /// Create a VM with explicit options.
    pub fn with_options(options: VmOptions) -> Self {
        Self {
            stack: Stack::with_capacity(options.stack_capacity),
            heap: Heap::with_max_objects(options.max_objects),
            collector: Collector::with_initial_threshold(options.initial_threshold),
        }
    }

    /// Allocate an object, running a collection first if the live
    /// count has reached the trigger threshold.
    fn alloc(&mut self, object: Object) -> VmResult<ObjectRef> {
        if self.collector.should_collect(self.heap.len()) {
            self.collector.collect(&mut self.heap, &self.stack);
        }
        self.heap.alloc(object)
    }

    /// Allocate an integer object and push it.
    pub fn push_int(&mut self, value: i64) -> VmResult<ObjectRef> {
        let obj = self.alloc(Object::Int(value))?;
        self.stack.push(obj)?;
        Ok(obj)
    }

    /// Pop the top two references and push a pair wrapping them.
    ///
    /// The first pop becomes the tail and the second the head, so the
    /// reference pushed first ends up as the pair's head.
    pub fn push_pair(&mut self) -> VmResult<ObjectRef> {
        // Read the operands without popping: they must still be on
        // the stack if the allocation triggers a collection, or the
        // mark phase would not see them as roots.
        let tail = self.stack.peek_n(0)?;
        let head = self.stack.peek_n(1)?;

        let pair = self.alloc(Object::Pair { head, tail })?;
        self.stack.pop()?;
        self.stack.pop()?;
        self.stack.push(pair)?;
        Ok(pair)
    }

    /// Push an existing reference, re-rooting it.
    ///
    /// # Errors
    ///
    /// Returns `VmError::InvalidReference` for a stale handle and
    /// `VmError::StackOverflow` if the stack is at its bound.
    pub fn push(&mut self, value: ObjectRef) -> VmResult<()> {
        self.heap.get(value)?;
        self.stack.push(value)
    }

    /// Pop and return the top reference.
    pub fn pop(&mut self) -> VmResult<ObjectRef> {
        self.stack.pop()
    }

    /// Read an integer object's value.
    pub fn int_value(&self, value: ObjectRef) -> VmResult<i64> {
        match self.heap.get(value)? {
            Object::Int(v) => Ok(*v),
            Object::Pair { .. } => Err(VmError::TypeError("expected an int".into())),
        }
    }

    /// Read a pair's components as `(head, tail)`.
    pub fn pair_parts(&self, value: ObjectRef) -> VmResult<(ObjectRef, ObjectRef)> {
        match self.heap.get(value)? {
            Object::Pair { head, tail } => Ok((*head, *tail)),
            Object::Int(_) => Err(VmError::TypeError("expected a pair".into())),
        }
    }

    /// Re-point a pair's head.
    pub fn set_head(&mut self, pair: ObjectRef, value: ObjectRef) -> VmResult<()> {
        self.heap.get(value)?;
        match self.heap.get_mut(pair)? {
            Object::Pair { head, .. } => {
                *head = value;
                Ok(())
            }
            Object::Int(_) => Err(VmError::TypeError("expected a pair".into())),
        }
    }

    /// Re-point a pair's tail.
    pub fn set_tail(&mut self, pair: ObjectRef, value: ObjectRef) -> VmResult<()> {
        self.heap.get(value)?;
        match self.heap.get_mut(pair)? {
            Object::Pair { tail, .. } => {
                *tail = value;
                Ok(())
            }
            Object::Int(_) => Err(VmError::TypeError("expected a pair".into())),
        }
    }

    /// Run a collection cycle now.
    pub fn collect(&mut self) -> CollectionReport {
        self.collector.collect(&mut self.heap, &self.stack)
    }

    /// Number of live objects.
    pub fn live_objects(&self) -> usize {
        self.heap.len()
    }

    /// Live-object count at which the next allocation collects first.
    pub fn gc_threshold(&self) -> usize {
        self.collector.threshold()
    }

    /// Aggregate collector statistics.
    pub fn gc_stats(&self) -> &GcStats {
        self.collector.stats()
    }

    /// Current value stack depth.
    pub fn stack_depth(&self) -> usize {
        self.stack.depth()
    }

    /// Iterate over live objects in heap registration order.
    pub fn iter_objects(&self) -> impl Iterator<Item = (ObjectRef, &Object)> + '_ {
        self.heap.iter()
    }
}

impl Default for Vm {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Vm {
    /// Teardown drops every root and runs one final cycle, so every
    /// remaining object is reclaimed through the normal sweep path
    /// rather than an unconditional free-everything pass.
    fn drop(&mut self) {
        self.stack.clear();
        self.collector.collect(&mut self.heap, &self.stack);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_int_roots_the_object() {
        let mut vm = Vm::new();
        let a = vm.push_int(42).unwrap();

        assert_eq!(vm.stack_depth(), 1);
        assert_eq!(vm.live_objects(), 1);
        assert_eq!(vm.int_value(a).unwrap(), 42);
    }

    #[test]
    fn test_push_pair_operand_order() {
        let mut vm = Vm::new();
        let first = vm.push_int(1).unwrap();
        let second = vm.push_int(2).unwrap();

        let pair = vm.push_pair().unwrap();
        let (head, tail) = vm.pair_parts(pair).unwrap();

        // First-pushed operand becomes the head.
        assert_eq!(head, first);
        assert_eq!(tail, second);
        assert_eq!(vm.stack_depth(), 1);
    }

    #[test]
    fn test_push_pair_requires_two_operands() {
        let mut vm = Vm::new();
        vm.push_int(1).unwrap();
        assert!(matches!(vm.push_pair(), Err(VmError::StackUnderflow)));
    }

    #[test]
    fn test_pair_operands_survive_triggered_collection() {
        // Force a collection between operand pushes and the pair
        // allocation itself: threshold 1 collects before every
        // allocation once anything is live.
        let mut vm = Vm::with_options(VmOptions {
            initial_threshold: 1,
            ..VmOptions::default()
        });

        let a = vm.push_int(1).unwrap();
        let b = vm.push_int(2).unwrap();
        let pair = vm.push_pair().unwrap();

        let (head, tail) = vm.pair_parts(pair).unwrap();
        assert_eq!(head, a);
        assert_eq!(tail, b);
        assert_eq!(vm.int_value(head).unwrap(), 1);
        assert_eq!(vm.int_value(tail).unwrap(), 2);
    }

    #[test]
    fn test_set_tail_type_checks() {
        let mut vm = Vm::new();
        let a = vm.push_int(1).unwrap();
        vm.push_int(2).unwrap();
        let pair = vm.push_pair().unwrap();

        assert!(matches!(vm.set_tail(a, pair), Err(VmError::TypeError(_))));
        vm.set_tail(pair, a).unwrap();
        assert_eq!(vm.pair_parts(pair).unwrap().1, a);
    }

    #[test]
    fn test_stale_handle_after_collection() {
        let mut vm = Vm::new();
        let a = vm.push_int(1).unwrap();
        vm.pop().unwrap();
        vm.collect();

        assert!(matches!(vm.int_value(a), Err(VmError::InvalidReference)));
        assert!(matches!(vm.push(a), Err(VmError::InvalidReference)));
    }

    #[test]
    fn test_out_of_memory_is_distinct() {
        let mut vm = Vm::with_options(VmOptions {
            max_objects: 2,
            ..VmOptions::default()
        });

        vm.push_int(1).unwrap();
        vm.push_int(2).unwrap();
        assert!(matches!(vm.push_int(3), Err(VmError::OutOfMemory)));
    }

    #[test]
    fn test_stack_overflow_is_hard_error() {
        let mut vm = Vm::with_options(VmOptions {
            stack_capacity: 2,
            ..VmOptions::default()
        });

        vm.push_int(1).unwrap();
        vm.push_int(2).unwrap();
        assert!(matches!(vm.push_int(3), Err(VmError::StackOverflow)));
    }

    #[test]
    fn test_teardown_reclaims_cycles() {
        let mut vm = Vm::new();
        vm.push_int(1).unwrap();
        vm.push_int(2).unwrap();
        let a = vm.push_pair().unwrap();
        vm.push_int(3).unwrap();
        vm.push_int(4).unwrap();
        let b = vm.push_pair().unwrap();
        vm.set_tail(a, b).unwrap();
        vm.set_tail(b, a).unwrap();

        // Drop must terminate and sweep the cyclic graph.
        drop(vm);
    }
}
