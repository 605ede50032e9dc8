//! Heap registry for GC-managed objects
//!
//! The heap owns every allocated object. Storage is a slab: a vector
//! of slots with a free list, where a slot index is the object's
//! [`ObjectRef`] handle. Ascending slot order stands in for the
//! registration order of a linked registry — sweep walks slots in
//! index order, so the relative order of survivors is stable across
//! collections.

use super::header::GcHeader;
use crate::value::{Object, ObjectRef};
use crate::{VmError, VmResult};

/// An occupied heap slot: mark metadata plus the object itself.
#[derive(Debug)]
struct Slot {
    header: GcHeader,
    object: Object,
}

/// Object heap: slab of slots plus a free list.
///
/// Objects are created by [`alloc`](Heap::alloc) and destroyed only
/// by the collector's sweep; nothing is ever moved.
pub struct Heap {
    slots: Vec<Option<Slot>>,
    free_list: Vec<usize>,

    /// Number of occupied slots. Always equals the count an
    /// enumeration of the slab would find.
    live: usize,

    /// Hard cap on live objects (0 = unlimited).
    max_objects: usize,
}

impl Heap {
    /// Create an empty, uncapped heap.
    pub fn new() -> Self {
        Self::with_max_objects(0)
    }

    /// Create a heap refusing to hold more than `max_objects` live
    /// objects (0 = unlimited).
    pub fn with_max_objects(max_objects: usize) -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            live: 0,
            max_objects,
        }
    }

    /// Number of live objects.
    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    /// Check if the heap holds no objects.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Configured live-object cap (0 = unlimited).
    #[inline]
    pub fn max_objects(&self) -> usize {
        self.max_objects
    }

    /// Allocate an object, unmarked, and return its handle.
    ///
    /// # Errors
    ///
    /// Returns `VmError::OutOfMemory` if the configured cap is
    /// already reached.
    pub fn alloc(&mut self, object: Object) -> VmResult<ObjectRef> {
        if self.max_objects != 0 && self.live == self.max_objects {
            return Err(VmError::OutOfMemory);
        }

        let slot = Slot {
            header: GcHeader::new(),
            object,
        };
        let index = match self.free_list.pop() {
            Some(index) => {
                self.slots[index] = Some(slot);
                index
            }
            None => {
                self.slots.push(Some(slot));
                self.slots.len() - 1
            }
        };

        self.live += 1;
        Ok(ObjectRef(index))
    }

    /// Look up an object by handle.
    ///
    /// # Errors
    ///
    /// Returns `VmError::InvalidReference` if the slot is vacant.
    pub fn get(&self, value: ObjectRef) -> VmResult<&Object> {
        self.slots
            .get(value.0)
            .and_then(|slot| slot.as_ref())
            .map(|slot| &slot.object)
            .ok_or(VmError::InvalidReference)
    }

    /// Look up an object mutably by handle.
    ///
    /// # Errors
    ///
    /// Returns `VmError::InvalidReference` if the slot is vacant.
    pub fn get_mut(&mut self, value: ObjectRef) -> VmResult<&mut Object> {
        self.slots
            .get_mut(value.0)
            .and_then(|slot| slot.as_mut())
            .map(|slot| &mut slot.object)
            .ok_or(VmError::InvalidReference)
    }

    /// Iterate over live objects in slot (registration) order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectRef, &Object)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|s| (ObjectRef(index), &s.object)))
    }

    /// Total number of slots the sweep pass must visit.
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Mark the object at `index`. Returns true if it was newly
    /// marked, false if already marked or the slot is vacant.
    pub(crate) fn set_mark(&mut self, index: usize) -> bool {
        match self.slots.get_mut(index).and_then(|slot| slot.as_mut()) {
            Some(slot) if !slot.header.is_marked() => {
                slot.header.mark();
                true
            }
            _ => false,
        }
    }

    /// Mark state of the slot at `index`; None if vacant.
    pub(crate) fn is_marked(&self, index: usize) -> Option<bool> {
        self.slots
            .get(index)
            .and_then(|slot| slot.as_ref())
            .map(|slot| slot.header.is_marked())
    }

    /// Clear the mark of the (occupied) slot at `index`.
    pub(crate) fn clear_mark(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index).and_then(|slot| slot.as_mut()) {
            slot.header.unmark();
        }
    }

    /// Release the object at `index`, returning its slot to the free
    /// list. Called by the collector's sweep only.
    pub(crate) fn free(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index) {
            if slot.take().is_some() {
                self.free_list.push(index);
                self.live -= 1;
            }
        }
    }

    /// Read the object at `index` if the slot is occupied.
    pub(crate) fn object_at(&self, index: usize) -> Option<Object> {
        self.slots
            .get(index)
            .and_then(|slot| slot.as_ref())
            .map(|slot| slot.object)
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}
