/// OffView Core Library - mesh model and renderer state
///
/// This library holds everything the viewer decides before a pixel is
/// drawn: the mesh and its face-merge pass, the NOFF loader, the arcball
/// and accumulated orientation, and the renderer that feeds a backend.

pub mod arcball;
pub mod error;
pub mod geometry;
pub mod noff;
pub mod optimize;
pub mod projection;
pub mod render;
pub mod transform;

// Re-export commonly used types
pub use error::{LoadError, MeshError, RenderError};
pub use geometry::{Color, Face, Mesh, PrimitiveKind, Vertex};
pub use optimize::{FaceMerger, MergeStats};
pub use projection::Camera;
pub use render::{Backend, DrawStrategy, Renderer};
pub use transform::{Axis, OrientationState, Transform};
