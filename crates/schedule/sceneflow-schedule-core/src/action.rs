use sceneflow_api_core::{ActionId, ElementId, Key};
use serde::{Deserialize, Serialize};

/// One registered action inside the flow graph.
///
/// `index` is the registration index within the current section; edges only
/// ever point from later to earlier indices, which is what keeps the graph
/// acyclic by construction.
#[derive(Debug, Clone)]
pub struct ActionRecord {
    pub id: ActionId,
    pub index: usize,
    pub consumed: Vec<Key>,
    pub produced: Vec<Key>,
    pub serialization: Option<Key>,
    /// Elements retired from the scene once this action has played.
    pub finalize_after: Vec<ElementId>,
}

/// Opaque action descriptor handed to the rendering collaborator.
/// Coordinates for the involved objects come from the section's placement
/// table, not from the descriptor itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    pub id: ActionId,
    pub consumed: Vec<Key>,
    pub produced: Vec<Key>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub finalize_after: Vec<ElementId>,
}

impl From<&ActionRecord> for ActionDescriptor {
    fn from(rec: &ActionRecord) -> Self {
        ActionDescriptor {
            id: rec.id,
            consumed: rec.consumed.clone(),
            produced: rec.produced.clone(),
            finalize_after: rec.finalize_after.clone(),
        }
    }
}
