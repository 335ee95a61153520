//! Graphics capability injected into meshes and render state.
//!
//! Everything that touches the GPU goes through [`GraphicsContext`]; the
//! renderer never looks up a "current" context on its own. Implementations
//! must only be used on the thread that owns the context.

use std::fmt::Debug;
use std::hash::Hash;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// Vertex attribute data.
    Array,
    /// Triangle or line indices.
    ElementArray,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BufferUsage {
    StaticDraw,
    DynamicDraw,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Primitive {
    Triangles,
    Lines,
}

/// Texture edge handling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextureWrap {
    #[default]
    ClampToEdge,
    Repeat,
}

/// The subset of OpenGL 3.3 core the renderer needs.
///
/// Handles are plain copyable ids; ownership is tracked by whoever created
/// them (see [`crate::buffers::MeshBuffers`]).
pub trait GraphicsContext {
    type Buffer: Copy + Debug + PartialEq;
    type VertexArray: Copy + Debug + PartialEq;
    type Program: Copy + Debug + Eq + Hash;
    type Texture: Copy + Debug + PartialEq;
    type UniformLocation: Clone + Debug;

    // buffers
    fn create_buffer(&self) -> Result<Self::Buffer, String>;
    fn bind_buffer(&self, target: BufferTarget, buffer: Option<Self::Buffer>);
    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: BufferUsage);
    fn buffer_sub_data(&self, target: BufferTarget, offset: usize, data: &[u8]);
    /// Size in bytes of the buffer bound to `target`, as reported by the driver.
    fn bound_buffer_size(&self, target: BufferTarget) -> usize;
    fn delete_buffer(&self, buffer: Self::Buffer);

    // vertex arrays
    fn create_vertex_array(&self) -> Result<Self::VertexArray, String>;
    fn bind_vertex_array(&self, vao: Option<Self::VertexArray>);
    fn delete_vertex_array(&self, vao: Self::VertexArray);
    /// Tightly packed float attribute at `location` sourced from the bound array buffer.
    fn vertex_attrib_pointer(&self, location: u32, components: i32);
    fn enable_vertex_attrib_array(&self, location: u32);
    fn disable_vertex_attrib_array(&self, location: u32);
    /// Constant value used while the attribute array at `location` is disabled.
    fn vertex_attrib_3f(&self, location: u32, value: [f32; 3]);

    // drawing
    /// Draws `count` `u32` indices from the bound element buffer.
    fn draw_elements(&self, mode: Primitive, count: usize);
    fn draw_arrays(&self, mode: Primitive, first: usize, count: usize);

    // programs
    fn create_program(&self, vertex_src: &str, fragment_src: &str) -> Result<Self::Program, String>;
    fn delete_program(&self, program: Self::Program);
    fn use_program(&self, program: Option<Self::Program>);
    fn uniform_location(&self, program: Self::Program, name: &str) -> Option<Self::UniformLocation>;
    fn uniform_matrix4(&self, location: Option<&Self::UniformLocation>, value: &[f32; 16]);
    fn uniform_matrix3(&self, location: Option<&Self::UniformLocation>, value: &[f32; 9]);
    fn uniform_3f(&self, location: Option<&Self::UniformLocation>, value: [f32; 3]);
    fn uniform_1i(&self, location: Option<&Self::UniformLocation>, value: i32);
    fn uniform_1u(&self, location: Option<&Self::UniformLocation>, value: u32);

    // textures
    fn create_texture_rgba8(
        &self,
        width: u32,
        height: u32,
        pixels: &[u8],
        wrap: TextureWrap,
    ) -> Result<Self::Texture, String>;
    fn delete_texture(&self, texture: Self::Texture);
    /// Binds a 2D texture to texture unit `unit`.
    fn bind_texture_unit(&self, unit: u32, texture: Option<Self::Texture>);
}
