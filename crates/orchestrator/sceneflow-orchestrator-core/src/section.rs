//! Section records handed to the rendering collaborator.

use sceneflow_api_core::{ObjectId, Placement, SectionId};
use sceneflow_schedule_core::Batch;
use serde::{Deserialize, Serialize};

/// Final coordinates of one object within a section, in integer cells.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacedObject {
    pub object: ObjectId,
    pub placement: Placement,
}

/// One closed section: the ordered batches to play, the placement table the
/// descriptors refer to, and the objects that survive into the next section.
///
/// Placements are listed in declaration order; `grid_width`/`grid_height`
/// give the cell grid the coordinates are expressed in, after any growth.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    pub batches: Vec<Batch>,
    pub placements: Vec<PlacedObject>,
    pub retained: Vec<ObjectId>,
    pub grid_width: usize,
    pub grid_height: usize,
}

impl Section {
    pub fn placement_of(&self, object: ObjectId) -> Option<Placement> {
        self.placements
            .iter()
            .find(|p| p.object == object)
            .map(|p| p.placement)
    }

    pub fn action_count(&self) -> usize {
        self.batches.iter().map(Batch::len).sum()
    }
}

/// The full output of a run: every closed section in order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionSchedule {
    pub sections: Vec<Section>,
}

impl SectionSchedule {
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
