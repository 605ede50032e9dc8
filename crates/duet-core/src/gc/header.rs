//! GC object header
//!
//! Every heap slot carries a header with the metadata the collector
//! needs. For Duet that is a single mark bit.

/// Per-object GC metadata.
///
/// The mark bit is transient per-cycle state: set during the mark
/// phase, cleared for every survivor by the end of sweep. Between
/// collections it is always false.
#[derive(Debug, Clone, Copy, Default)]
pub struct GcHeader {
    marked: bool,
}

impl GcHeader {
    /// Create a header for a freshly allocated (unmarked) object.
    pub fn new() -> Self {
        Self { marked: false }
    }

    /// Check if this object is marked
    #[inline]
    pub fn is_marked(&self) -> bool {
        self.marked
    }

    /// Mark this object as reachable
    #[inline]
    pub fn mark(&mut self) {
        self.marked = true;
    }

    /// Unmark this object (for the next GC cycle)
    #[inline]
    pub fn unmark(&mut self) {
        self.marked = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_mark_unmark() {
        let mut header = GcHeader::new();
        assert!(!header.is_marked());

        header.mark();
        assert!(header.is_marked());

        header.unmark();
        assert!(!header.is_marked());
    }
}
