//! sceneflow API core (renderer-agnostic)
//!
//! Shared vocabulary of the sceneflow crates: identifier newtypes and their
//! allocator, object categories, element signatures, cell-space placement
//! records and the common error type. The scheduling and layout crates both
//! build on these so hosts only need one set of types at the boundary.

pub mod category;
pub mod error;
pub mod ids;
pub mod key;
pub mod placement;
pub mod signature;

pub use category::ObjectCategory;
pub use error::{CoreError, CoreResult};
pub use ids::{ActionId, ElementId, IdAllocator, ObjectId, SectionId};
pub use key::Key;
pub use placement::Placement;
pub use signature::ElemSignature;
