//! Garbage collection system
//!
//! Mark-and-sweep tracing collection for the Duet heap.
//!
//! # Architecture
//!
//! - **GcHeader**: per-object mark metadata
//! - **Heap**: slab registry owning every allocated object
//! - **Collector**: mark/sweep algorithm and the adaptive trigger
//!
//! Reachability is computed solely through pair head/tail references,
//! starting from the value stack. The heap's slot order exists only
//! so sweep can enumerate every allocation; it is never treated as a
//! reachability edge, which is what lets unreachable cycles be
//! reclaimed.

mod collector;
mod header;
mod heap;

pub use collector::{CollectionReport, Collector, GcStats, INITIAL_THRESHOLD};
pub use header::GcHeader;
pub use heap::Heap;
