//! GPU buffers mirroring a [`MeshData`].
//!
//! [`MeshBuffers`] does not hold the context; every call takes it explicitly
//! so the owner (normally [`crate::GpuMesh`]) decides when buffers live and die.

use asset::MeshData;
use corelib::Vec3f;

use crate::gpu::{BufferTarget, BufferUsage, GraphicsContext};
use crate::shader::{
    COLOR_LOCATION, NORMAL_LOCATION, POSITION_LOCATION, TANGENT_LOCATION, TEXCOORD_LOCATION,
};

/// Corners of the unit cube centered at the origin.
pub const BOX_CORNERS: [Vec3f; 8] = [
    Vec3f::new(-0.5, -0.5, 0.5),
    Vec3f::new(0.5, -0.5, 0.5),
    Vec3f::new(0.5, 0.5, 0.5),
    Vec3f::new(-0.5, 0.5, 0.5),
    Vec3f::new(-0.5, -0.5, -0.5),
    Vec3f::new(0.5, -0.5, -0.5),
    Vec3f::new(0.5, 0.5, -0.5),
    Vec3f::new(-0.5, 0.5, -0.5),
];

/// Twelve cube edges as line-list indices into [`BOX_CORNERS`].
pub const BOX_LINE_INDICES: [u32; 24] = [
    0, 1, 1, 2, 2, 3, 3, 0, // front
    4, 5, 5, 6, 6, 7, 7, 4, // back
    0, 4, 1, 5, 2, 6, 3, 7, // sides
];

/// Length of the debug segment drawn along each vertex normal.
pub const NORMAL_LINE_LENGTH: f32 = 0.1;

/// Line list `v, v + 0.1 n` for every vertex.
pub fn normal_lines(mesh: &MeshData) -> Vec<Vec3f> {
    mesh.vertices()
        .iter()
        .zip(mesh.normals())
        .flat_map(|(&v, &n)| [v, v + n * NORMAL_LINE_LENGTH])
        .collect()
}

/// Creates a buffer, uploads `data` and checks the size the driver reports.
///
/// On a mismatch the buffer is deleted and `None` returned.
pub fn create_buffer<G: GraphicsContext>(
    gl: &G,
    target: BufferTarget,
    data: &[u8],
    usage: BufferUsage,
) -> Option<G::Buffer> {
    let buffer = match gl.create_buffer() {
        Ok(buffer) => buffer,
        Err(e) => {
            log::error!("Failed to create buffer: {e}");
            return None;
        }
    };
    gl.bind_buffer(target, Some(buffer));
    gl.buffer_data(target, data, usage);
    let size = gl.bound_buffer_size(target);
    if size != data.len() {
        log::error!(
            "Buffer size mismatch for {:?}: requested {} bytes, allocated {}",
            target,
            data.len(),
            size
        );
        gl.bind_buffer(target, None);
        gl.delete_buffer(buffer);
        return None;
    }
    Some(buffer)
}

fn create_vertex_array<G: GraphicsContext>(gl: &G) -> Option<G::VertexArray> {
    gl.create_vertex_array()
        .inspect_err(|e| log::error!("Failed to create vertex array: {e}"))
        .ok()
}

/// Uploads a float attribute into the bound vertex array and enables it.
fn attribute<G: GraphicsContext>(
    gl: &G,
    location: u32,
    components: i32,
    data: &[u8],
    usage: BufferUsage,
) -> Option<G::Buffer> {
    let buffer = create_buffer(gl, BufferTarget::Array, data, usage)?;
    gl.vertex_attrib_pointer(location, components);
    gl.enable_vertex_attrib_array(location);
    Some(buffer)
}

/// Handles for every uploaded mesh array plus the debug geometry.
///
/// `None` means "absent". After [`MeshBuffers::release_all`] every handle is
/// `None`, which makes a second release a no-op.
#[derive(Debug)]
pub struct MeshBuffers<G: GraphicsContext> {
    vao: Option<G::VertexArray>,
    vertices: Option<G::Buffer>,
    normals: Option<G::Buffer>,
    indices: Option<G::Buffer>,
    colors: Option<G::Buffer>,
    tex_coords: Option<G::Buffer>,
    tangents: Option<G::Buffer>,

    bounds_vao: Option<G::VertexArray>,
    bounds_vertices: Option<G::Buffer>,
    bounds_indices: Option<G::Buffer>,

    normals_vao: Option<G::VertexArray>,
    normal_lines: Option<G::Buffer>,

    vertex_count: usize,
    index_count: usize,
}

impl<G: GraphicsContext> Default for MeshBuffers<G> {
    fn default() -> Self {
        Self {
            vao: None,
            vertices: None,
            normals: None,
            indices: None,
            colors: None,
            tex_coords: None,
            tangents: None,
            bounds_vao: None,
            bounds_vertices: None,
            bounds_indices: None,
            normals_vao: None,
            normal_lines: None,
            vertex_count: 0,
            index_count: 0,
        }
    }
}

impl<G: GraphicsContext> MeshBuffers<G> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every buffer with fresh ones built from `mesh`.
    ///
    /// Colours, texture coordinates and tangents are only uploaded when
    /// their arrays have one entry per vertex. An empty mesh leaves
    /// everything released.
    pub fn upload_all(&mut self, gl: &G, mesh: &MeshData) {
        self.release_all(gl);
        if mesh.is_empty() {
            return;
        }

        self.vao = create_vertex_array(gl);
        if self.vao.is_none() {
            return;
        }
        gl.bind_vertex_array(self.vao);
        self.vertices = attribute(
            gl,
            POSITION_LOCATION,
            3,
            bytemuck::cast_slice(mesh.vertices()),
            BufferUsage::StaticDraw,
        );
        if mesh.has_normals() {
            self.normals = attribute(
                gl,
                NORMAL_LOCATION,
                3,
                bytemuck::cast_slice(mesh.normals()),
                BufferUsage::DynamicDraw,
            );
        }
        if mesh.has_colors() {
            self.colors = attribute(
                gl,
                COLOR_LOCATION,
                3,
                bytemuck::cast_slice(mesh.colors()),
                BufferUsage::StaticDraw,
            );
        }
        if mesh.has_tex_coords() {
            self.tex_coords = attribute(
                gl,
                TEXCOORD_LOCATION,
                2,
                bytemuck::cast_slice(mesh.tex_coords()),
                BufferUsage::StaticDraw,
            );
        }
        if mesh.has_tangents() {
            self.tangents = attribute(
                gl,
                TANGENT_LOCATION,
                3,
                bytemuck::cast_slice(mesh.tangents()),
                BufferUsage::StaticDraw,
            );
        }
        // element binding is recorded in the vertex array, so it stays bound until unbinding the VAO
        self.indices = create_buffer(
            gl,
            BufferTarget::ElementArray,
            bytemuck::cast_slice(mesh.triangles()),
            BufferUsage::StaticDraw,
        );
        gl.bind_vertex_array(None);
        gl.bind_buffer(BufferTarget::Array, None);

        self.vertex_count = mesh.num_vertices();
        self.index_count = 3 * mesh.num_triangles();

        self.upload_bounds(gl);
        if mesh.has_normals() {
            self.upload_normal_lines(gl, mesh);
        }
        log::debug!(
            "Uploaded mesh buffers: {} vertices, {} indices",
            self.vertex_count,
            self.index_count
        );
    }

    fn upload_bounds(&mut self, gl: &G) {
        self.bounds_vao = create_vertex_array(gl);
        if self.bounds_vao.is_none() {
            return;
        }
        gl.bind_vertex_array(self.bounds_vao);
        self.bounds_vertices = attribute(
            gl,
            POSITION_LOCATION,
            3,
            bytemuck::cast_slice(&BOX_CORNERS),
            BufferUsage::StaticDraw,
        );
        self.bounds_indices = create_buffer(
            gl,
            BufferTarget::ElementArray,
            bytemuck::cast_slice(&BOX_LINE_INDICES),
            BufferUsage::StaticDraw,
        );
        gl.bind_vertex_array(None);
        gl.bind_buffer(BufferTarget::Array, None);
    }

    fn upload_normal_lines(&mut self, gl: &G, mesh: &MeshData) {
        self.normals_vao = create_vertex_array(gl);
        if self.normals_vao.is_none() {
            return;
        }
        gl.bind_vertex_array(self.normals_vao);
        self.normal_lines = attribute(
            gl,
            POSITION_LOCATION,
            3,
            bytemuck::cast_slice(&normal_lines(mesh)),
            BufferUsage::DynamicDraw,
        );
        gl.bind_vertex_array(None);
        gl.bind_buffer(BufferTarget::Array, None);
    }

    /// Overwrites the normal and normal-line buffers in place.
    ///
    /// Returns `false` when there is nothing to overwrite or the normal
    /// count no longer matches what was uploaded; the caller then has to
    /// re-upload everything.
    pub fn update_normals(&mut self, gl: &G, mesh: &MeshData) -> bool {
        let Some(normals) = self.normals else {
            return false;
        };
        if mesh.normals().len() != self.vertex_count || mesh.num_vertices() != self.vertex_count {
            return false;
        }
        gl.bind_buffer(BufferTarget::Array, Some(normals));
        gl.buffer_sub_data(BufferTarget::Array, 0, bytemuck::cast_slice(mesh.normals()));
        if let Some(lines) = self.normal_lines {
            gl.bind_buffer(BufferTarget::Array, Some(lines));
            gl.buffer_sub_data(BufferTarget::Array, 0, bytemuck::cast_slice(&normal_lines(mesh)));
        }
        gl.bind_buffer(BufferTarget::Array, None);
        true
    }

    /// Deletes every live handle and resets it to `None`.
    pub fn release_all(&mut self, gl: &G) {
        for vao in [
            self.vao.take(),
            self.bounds_vao.take(),
            self.normals_vao.take(),
        ]
        .into_iter()
        .flatten()
        {
            gl.delete_vertex_array(vao);
        }
        for buffer in [
            self.vertices.take(),
            self.normals.take(),
            self.indices.take(),
            self.colors.take(),
            self.tex_coords.take(),
            self.tangents.take(),
            self.bounds_vertices.take(),
            self.bounds_indices.take(),
            self.normal_lines.take(),
        ]
        .into_iter()
        .flatten()
        {
            gl.delete_buffer(buffer);
        }
        self.vertex_count = 0;
        self.index_count = 0;
    }

    /// True when no handle is live.
    pub fn is_released(&self) -> bool {
        self.vao.is_none()
            && self.bounds_vao.is_none()
            && self.normals_vao.is_none()
            && [
                self.vertices,
                self.normals,
                self.indices,
                self.colors,
                self.tex_coords,
                self.tangents,
                self.bounds_vertices,
                self.bounds_indices,
                self.normal_lines,
            ]
            .iter()
            .all(Option::is_none)
    }

    /// The triangle set can be drawn: vertex array, positions and indices exist.
    pub fn is_drawable(&self) -> bool {
        self.vao.is_some() && self.vertices.is_some() && self.indices.is_some()
    }

    pub fn vao(&self) -> Option<G::VertexArray> {
        self.vao
    }

    pub fn vertices(&self) -> Option<G::Buffer> {
        self.vertices
    }

    pub fn normals(&self) -> Option<G::Buffer> {
        self.normals
    }

    pub fn indices(&self) -> Option<G::Buffer> {
        self.indices
    }

    pub fn colors(&self) -> Option<G::Buffer> {
        self.colors
    }

    pub fn tex_coords(&self) -> Option<G::Buffer> {
        self.tex_coords
    }

    pub fn tangents(&self) -> Option<G::Buffer> {
        self.tangents
    }

    /// Vertex array for the unit-cube wireframe, when uploaded.
    pub fn bounds_vao(&self) -> Option<G::VertexArray> {
        self.bounds_vao.filter(|_| self.bounds_indices.is_some())
    }

    /// Vertex array for the normal lines, when uploaded.
    pub fn normals_vao(&self) -> Option<G::VertexArray> {
        self.normals_vao.filter(|_| self.normal_lines.is_some())
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn index_count(&self) -> usize {
        self.index_count
    }
}
