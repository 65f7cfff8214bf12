//! Error types shared by the sceneflow core crates.

use crate::category::ObjectCategory;
use crate::ids::{ElementId, ObjectId};
use crate::key::Key;
use serde::{Deserialize, Serialize};

/// Fatal, non-retryable errors raised while building a section.
///
/// All of these abort the in-progress section; none are swallowed or retried
/// automatically, since masking them risks producing a visually incorrect but
/// "successful" schedule. A signature cache miss is not an error and never
/// appears here.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum CoreError {
    /// `align_with` target belongs to a different category.
    #[error("cannot align {category:?} object with {target:?} of category {target_category:?}")]
    InvalidAlignment {
        target: ObjectId,
        target_category: ObjectCategory,
        category: ObjectCategory,
    },

    /// Grid growth hit its iteration cap without finding a valid rectangle.
    /// Indicates a modeling bug, not a recoverable condition.
    #[error("no placement found for {width}x{height} cells after {attempts} growth attempts")]
    PlacementExhausted {
        width: usize,
        height: usize,
        attempts: usize,
    },

    /// Drain could not make progress though unbatched actions remain.
    /// Unreachable while edges only point to earlier-registered actions.
    #[error("dependency drain stalled with {remaining} actions unbatched")]
    DependencyCycle { remaining: usize },

    /// An action consumes a key with no registered producer and no
    /// external-object exemption.
    #[error("consumed key {key:?} has no producer and is not external")]
    UnknownObjectReference { key: Key },

    /// A key was produced a second time within one section.
    #[error("key {key:?} already has a producer in this section")]
    DuplicateProducer { key: Key },

    /// An element id was never registered with the tracker.
    #[error("element {element:?} is not tracked")]
    UnknownElement { element: ElementId },
}

pub type CoreResult<T> = Result<T, CoreError>;
