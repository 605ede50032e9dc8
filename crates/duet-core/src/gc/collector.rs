//! Mark-sweep garbage collector
//!
//! A collection cycle marks every object reachable from the value
//! stack, then sweeps the heap in slot order, freeing everything
//! unmarked. The trigger threshold is recomputed after each cycle by
//! doubling the surviving live count, so collection frequency adapts
//! to working-set size instead of being fixed.

use super::heap::Heap;
use crate::stack::Stack;
use crate::value::{Object, ObjectRef};
use std::fmt;
use std::time::{Duration, Instant};

/// Live-object count at which a fresh (or fully reclaimed) heap
/// triggers its next collection.
pub const INITIAL_THRESHOLD: usize = 8;

/// Aggregate collector statistics
#[derive(Debug, Clone, Default)]
pub struct GcStats {
    /// Total number of collections
    pub collections: usize,

    /// Total objects freed
    pub objects_freed: usize,

    /// Total pause time
    pub total_pause_time: Duration,

    /// Last collection duration
    pub last_pause_time: Duration,
}

/// Outcome of a single collection cycle.
///
/// This is the "N collected, M remaining" diagnostic as a value the
/// caller can report; its `Display` renders exactly that line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionReport {
    /// Objects reclaimed by the sweep
    pub collected: usize,

    /// Objects surviving the cycle
    pub live: usize,
}

impl fmt::Display for CollectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "collected {} objects, {} remaining", self.collected, self.live)
    }
}

/// Mark-sweep collector and its trigger policy.
///
/// The collector holds no heap state of its own: it operates on the
/// heap and root stack handed to it, so independent VM instances
/// never share collector state.
pub struct Collector {
    threshold: usize,
    initial_threshold: usize,
    stats: GcStats,
}

impl Collector {
    /// Create a collector with the default initial threshold.
    pub fn new() -> Self {
        Self::with_initial_threshold(INITIAL_THRESHOLD)
    }

    /// Create a collector whose first trigger (and post-cycle reset
    /// on an empty heap) happens at `threshold` live objects.
    pub fn with_initial_threshold(threshold: usize) -> Self {
        // A zero threshold would trigger before every allocation.
        let threshold = threshold.max(1);
        Self {
            threshold,
            initial_threshold: threshold,
            stats: GcStats::default(),
        }
    }

    /// Live-object count at which the next allocation collects first.
    #[inline]
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Aggregate statistics over all cycles so far.
    pub fn stats(&self) -> &GcStats {
        &self.stats
    }

    /// Whether an allocation should run a collection first.
    ///
    /// Allocations are counted one at a time, so equality is exact:
    /// the trigger fires when the live count has reached the
    /// threshold and never earlier.
    #[inline]
    pub fn should_collect(&self, live: usize) -> bool {
        live == self.threshold
    }

    /// Run a full collection cycle: mark from the stack's roots,
    /// sweep the heap, recompute the trigger threshold from the
    /// survivors.
    pub fn collect(&mut self, heap: &mut Heap, roots: &Stack) -> CollectionReport {
        let start = Instant::now();
        let before = heap.len();

        Self::mark(heap, roots);
        Self::sweep(heap);

        let live = heap.len();
        self.threshold = if live == 0 {
            self.initial_threshold
        } else {
            live * 2
        };

        let report = CollectionReport {
            collected: before - live,
            live,
        };

        let pause = start.elapsed();
        self.stats.collections += 1;
        self.stats.objects_freed += report.collected;
        self.stats.last_pause_time = pause;
        self.stats.total_pause_time += pause;

        report
    }

    /// Mark phase: flood fill from every stack slot.
    ///
    /// Uses an explicit work list rather than recursion so deep pair
    /// chains cannot exhaust the call stack. The already-marked check
    /// turns the traversal into a visited-set flood fill: shared
    /// sub-graphs are visited once and cycles terminate.
    fn mark(heap: &mut Heap, roots: &Stack) {
        let mut pending: Vec<ObjectRef> = roots.iter().collect();

        while let Some(value) = pending.pop() {
            if !heap.set_mark(value.index()) {
                continue;
            }
            if let Some(Object::Pair { head, tail }) = heap.object_at(value.index()) {
                pending.push(head);
                pending.push(tail);
            }
        }
    }

    /// Sweep phase: one linear pass over the slab in slot order.
    ///
    /// Unmarked slots are freed; marked slots are unmarked and kept,
    /// so every survivor leaves the cycle with a clear mark bit.
    fn sweep(heap: &mut Heap) {
        for index in 0..heap.slot_count() {
            match heap.is_marked(index) {
                Some(false) => heap.free(index),
                Some(true) => heap.clear_mark(index),
                None => {}
            }
        }
    }
}

impl Default for Collector {
    fn default() -> Self {
        Self::new()
    }
}
