use serde::{Deserialize, Serialize};

/// Class of a placed object. The layout allocator never lets two categories
/// share a row range, so the category drives both the row-compatibility check
/// and the renderer's choice of visual primitive.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectCategory {
    /// Shallow, wide objects laid out along rows (registers, vectors).
    Row,
    /// Taller block objects (function units).
    Block,
    /// Large multi-row objects (memory panels).
    Bulk,
}
