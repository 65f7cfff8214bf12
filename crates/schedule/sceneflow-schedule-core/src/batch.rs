use crate::action::ActionDescriptor;
use sceneflow_api_core::ActionId;
use serde::{Deserialize, Serialize};

/// A set of actions with no dependency edges among them, eligible to play
/// together. Created only during drain; immutable once created. Actions are
/// reported in original registration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    pub actions: Vec<ActionDescriptor>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn contains(&self, id: ActionId) -> bool {
        self.actions.iter().any(|a| a.id == id)
    }

    pub fn action_ids(&self) -> impl Iterator<Item = ActionId> + '_ {
        self.actions.iter().map(|a| a.id)
    }
}
