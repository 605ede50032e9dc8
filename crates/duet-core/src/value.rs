//! Object model for the Duet VM
//!
//! Duet values are heap objects of exactly two kinds: integers and
//! pairs. A pair holds references to two other objects, which is
//! enough to build arbitrary graph shapes, including cycles.

/// Handle to a heap-allocated object.
///
/// A reference is a slot index into the VM heap. Handles carry no
/// ownership; the heap owns every object. A handle held across a
/// collection that reclaims its object becomes stale: operations on
/// it report [`VmError::InvalidReference`](crate::VmError) while the
/// slot is vacant. Slots are not versioned, so a stale handle whose
/// slot has since been reused will observe the new occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectRef(pub(crate) usize);

impl ObjectRef {
    /// Heap slot index of this reference.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Kind tag of a heap object. Fixed at allocation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// Scalar integer
    Int,
    /// Pair of object references
    Pair,
}

/// A heap-allocated Duet value.
///
/// The kind never changes after allocation; a pair's fields may be
/// re-pointed through [`Vm::set_head`](crate::Vm::set_head) and
/// [`Vm::set_tail`](crate::Vm::set_tail).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Object {
    /// Scalar integer
    Int(i64),

    /// Pair of references to two other objects
    Pair {
        /// First component
        head: ObjectRef,
        /// Second component
        tail: ObjectRef,
    },
}

impl Object {
    /// Kind tag for this object.
    #[inline]
    pub fn kind(&self) -> ObjectKind {
        match self {
            Object::Int(_) => ObjectKind::Int,
            Object::Pair { .. } => ObjectKind::Pair,
        }
    }
}
