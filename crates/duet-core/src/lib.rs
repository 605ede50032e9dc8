//! Duet VM Core Runtime
//!
//! This crate implements the runtime for Duet, a tiny dynamically
//! typed language with exactly two value kinds: integers and pairs.
//! It provides:
//! - The object model (`value` module)
//! - A bounded value stack acting as the GC root set (`stack` module)
//! - The object heap and mark-sweep collector (`gc` module)
//! - The VM facade tying them together (`vm` module)
//!
//! Memory is reclaimed by tracing: a collection cycle marks every
//! object reachable from the stack through pair references, then
//! sweeps the heap, freeing everything unmarked. The trigger adapts
//! to working-set size by doubling from the post-sweep live count.
//!
//! # Example
//!
//! ```
//! use duet_core::Vm;
//!
//! let mut vm = Vm::new();
//! vm.push_int(1).unwrap();
//! vm.push_int(2).unwrap();
//! let pair = vm.push_pair().unwrap();
//!
//! let report = vm.collect();
//! assert_eq!(report.live, 3);
//! assert!(vm.pair_parts(pair).is_ok());
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod gc;
pub mod stack;
pub mod value;
pub mod vm;

pub use gc::{CollectionReport, Collector, GcStats, Heap, INITIAL_THRESHOLD};
pub use stack::{Stack, DEFAULT_STACK_CAPACITY};
pub use value::{Object, ObjectKind, ObjectRef};
pub use vm::{Vm, VmOptions};

/// VM execution errors
#[derive(Debug, thiserror::Error)]
pub enum VmError {
    /// Push onto a root stack already at its bound
    #[error("Stack overflow")]
    StackOverflow,

    /// Pop from an empty root stack
    #[error("Stack underflow")]
    StackUnderflow,

    /// Allocation refused: the configured live-object cap is reached
    #[error("Out of memory")]
    OutOfMemory,

    /// Operation applied to the wrong kind of object
    #[error("Type error: {0}")]
    TypeError(String),

    /// Handle whose heap slot is no longer occupied
    #[error("Invalid object reference")]
    InvalidReference,
}

/// VM execution result
pub type VmResult<T> = Result<T, VmError>;
