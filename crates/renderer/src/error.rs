use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cannot read shader source {path}: {source}")]
    ShaderSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("shader program build failed: {0}")]
    ShaderBuild(String),
    #[error("texture upload failed: {0}")]
    Texture(String),
    #[error("coloring needs per-vertex {0}, but the mesh has none")]
    MissingAttribute(&'static str),
}
