/// Error types for mesh construction, rendering and loading.
use thiserror::Error;

/// Errors raised by the mesh data model.
#[derive(Debug, Error)]
pub enum MeshError {
    /// Pre-sizing a store failed.
    #[error("failed to reserve space for {requested} {what}")]
    Allocation {
        /// Which store was being sized.
        what: &'static str,
        /// Number of elements requested.
        requested: usize,
    },

    /// Indexed read past the filled part of a store.
    #[error("index {index} out of range for {len} elements")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of filled elements.
        len: usize,
    },

    /// A vertex normal of zero length cannot be normalized.
    #[error("vertex {index} has a zero-length normal")]
    DegenerateNormal {
        /// Index of the offending vertex.
        index: usize,
    },
}

/// Result type for mesh operations.
pub type MeshResult<T> = Result<T, MeshError>;

/// Errors raised while preparing or drawing a frame.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A face references a vertex past the end of the vertex store.
    #[error("face {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        /// Face holding the bad index.
        face: usize,
        /// The vertex index it references.
        index: u32,
        /// Number of filled vertices.
        vertex_count: usize,
    },

    #[error(transparent)]
    Mesh(#[from] MeshError),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors raised by the NOFF loader.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read mesh file: {0}")]
    Io(#[from] std::io::Error),

    /// The leading token was not `NOFF`.
    #[error("expected NOFF header, found {found:?}")]
    NotNoff {
        /// The token actually found.
        found: String,
    },

    /// A record could not be parsed.
    #[error("parse error: {message}")]
    Parse {
        /// What failed and where.
        message: String,
    },

    #[error(transparent)]
    Mesh(#[from] MeshError),
}

/// Result type for loading.
pub type LoadResult<T> = Result<T, LoadError>;
