use crate::ids::ObjectId;
use serde::{Deserialize, Serialize};

/// Structural key identifying a previously read sub-object.
///
/// Two reads with identical signatures and no intervening write into the
/// container refer to the same element and may share one visual. The
/// signature is matched field-wise; there is no partial or overlapping match.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ElemSignature {
    /// Container object the element was read from.
    pub container: ObjectId,
    /// Element index within the container.
    pub index: u32,
    /// Sub-index for multi-lane containers (0 for flat ones).
    pub lane: u32,
    /// Bit offset of the LSB inside the indexed slot.
    pub bit_offset: u32,
    /// Bit width of the element.
    pub bit_width: u32,
}

impl ElemSignature {
    pub fn new(container: ObjectId, index: u32, lane: u32, bit_offset: u32, bit_width: u32) -> Self {
        Self {
            container,
            index,
            lane,
            bit_offset,
            bit_width,
        }
    }
}
