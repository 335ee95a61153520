//! Renderer: GPU mirrors of triangle meshes and the state used to draw them.
//!
//! All GPU access goes through an injected [`GraphicsContext`]; the OpenGL
//! backend is `glow::Context`. Meshes and render state share the context
//! through an `Rc`, so everything here lives on the context's thread.

pub mod buffers;
pub mod error;
pub mod gl;
pub mod gpu;
pub mod mesh;
pub mod shader;
pub mod state;
pub mod texture;

#[cfg(test)]
mod testing;

pub use buffers::MeshBuffers;
pub use error::RenderError;
pub use gpu::{BufferTarget, BufferUsage, GraphicsContext, Primitive, TextureWrap};
pub use mesh::{BumpMaps, Coloring, GpuMesh};
pub use state::{RenderState, UniformSet};
