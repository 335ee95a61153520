use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while loading, generating or transforming a mesh.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("cannot read mesh file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unrecognized mesh header tag '{0}'")]
    UnknownHeader(String),
    #[error("mesh declares {vertices} vertices and {faces} faces; both must be positive")]
    InvalidCount { vertices: i64, faces: i64 },
    #[error("unexpected end of input while reading {what}")]
    MissingToken { what: &'static str },
    #[error("invalid {what}: '{token}'")]
    InvalidNumber { what: &'static str, token: String },
    #[error("face {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        face: usize,
        index: u32,
        vertex_count: usize,
    },
    #[error("bounding box has no extent (largest side {0}); cannot scale to a length")]
    DegenerateBounds(f32),
    #[error(
        "sphere tessellation {longitude}x{latitude} out of range: needs at least 4x2 divisions and at most u32::MAX vertices"
    )]
    InvalidTessellation { longitude: u32, latitude: u32 },
}

impl MeshError {
    /// File-level failures empty the mesh; format failures keep what was there.
    pub fn is_io(&self) -> bool {
        matches!(self, MeshError::Io { .. })
    }
}

pub type MeshResult<T> = Result<T, MeshError>;
