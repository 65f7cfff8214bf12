use crate::ids::{ElementId, ObjectId};
use serde::{Deserialize, Serialize};

/// Dependency key declared by an action. Objects and elements live in
/// separate id spaces but share one key space in the flow graph: a read
/// consumes an object key and produces an element key.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Key {
    Object(ObjectId),
    Element(ElementId),
}

impl From<ObjectId> for Key {
    fn from(id: ObjectId) -> Self {
        Key::Object(id)
    }
}

impl From<ElementId> for Key {
    fn from(id: ElementId) -> Self {
        Key::Element(id)
    }
}

impl Key {
    pub fn as_element(&self) -> Option<ElementId> {
        match self {
            Key::Element(id) => Some(*id),
            Key::Object(_) => None,
        }
    }

    pub fn as_object(&self) -> Option<ObjectId> {
        match self {
            Key::Object(id) => Some(*id),
            Key::Element(_) => None,
        }
    }
}
