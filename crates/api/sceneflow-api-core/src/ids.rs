//! Identifiers and a simple allocator for core entities.

use serde::{Deserialize, Serialize};

/// A placeable visual object (register-, unit- or memory-like).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

/// One registered schedulable action. Minted by the flow graph in
/// registration order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct ActionId(pub u32);

/// A data element moved between objects, including minted duplicates.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct ElementId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct SectionId(pub u32);

/// Monotonic allocator for ObjectId, ElementId and SectionId.
/// Dense indices improve cache locality; IDs are opaque externally.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_object: u32,
    next_element: u32,
    next_section: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_object(&mut self) -> ObjectId {
        let id = ObjectId(self.next_object);
        self.next_object = self.next_object.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_element(&mut self) -> ElementId {
        let id = ElementId(self.next_element);
        self.next_element = self.next_element.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_section(&mut self) -> SectionId {
        let id = SectionId(self.next_section);
        self.next_section = self.next_section.wrapping_add(1);
        id
    }
}
