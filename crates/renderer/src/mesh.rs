//! A [`MeshData`] together with the GPU buffers mirroring it.

use std::fmt;
use std::path::Path;
use std::rc::Rc;

use asset::{MeshData, MeshResult, NormalWeighting, SphereParams};
use corelib::Vec3f;

use crate::buffers::{BOX_LINE_INDICES, MeshBuffers};
use crate::error::RenderError;
use crate::gpu::{GraphicsContext, Primitive};
use crate::shader::COLOR_LOCATION;
use crate::state::RenderState;

const DEBUG_COLOR: [f32; 3] = [1.0, 1.0, 1.0];

/// Texture units used by bump mapping.
pub const DIFFUSE_UNIT: u32 = 0;
pub const NORMAL_UNIT: u32 = 1;
pub const DISPLACEMENT_UNIT: u32 = 3;

/// Textures and switches for the bump-mapping shader.
#[derive(Clone, Debug, PartialEq)]
pub struct BumpMaps<T> {
    /// Vertex colour used as the base colour.
    pub base_color: Vec3f,
    pub diffuse: T,
    pub normal: T,
    pub displacement: Option<T>,
    pub use_diffuse: bool,
    pub use_normal: bool,
    pub use_displacement: bool,
}

impl<T> BumpMaps<T> {
    pub fn new(diffuse: T, normal: T) -> Self {
        Self {
            base_color: Vec3f::splat(1.0),
            diffuse,
            normal,
            displacement: None,
            use_diffuse: true,
            use_normal: true,
            use_displacement: false,
        }
    }

    pub fn with_displacement(mut self, displacement: T) -> Self {
        self.displacement = Some(displacement);
        self.use_displacement = true;
        self
    }

    pub fn toggle_diffuse(&mut self) {
        self.use_diffuse = !self.use_diffuse;
    }

    pub fn toggle_normal(&mut self) {
        self.use_normal = !self.use_normal;
    }

    pub fn toggle_displacement(&mut self) {
        self.use_displacement = !self.use_displacement;
    }
}

/// How triangles get their colour.
#[derive(Clone, Debug, PartialEq)]
pub enum Coloring<T> {
    /// One colour for every vertex.
    Static(Vec3f),
    /// The mesh's per-vertex colour array.
    ColorArray,
    /// A diffuse texture sampled with the mesh's texture coordinates.
    Texture(T),
    BumpMapping(BumpMaps<T>),
}

impl<T> Default for Coloring<T> {
    fn default() -> Self {
        Coloring::Static(Vec3f::splat(1.0))
    }
}

impl<T> Coloring<T> {
    pub fn name(&self) -> &'static str {
        match self {
            Coloring::Static(_) => "a static color",
            Coloring::ColorArray => "a color array",
            Coloring::Texture(_) => "a texture",
            Coloring::BumpMapping(_) => "a bump map",
        }
    }
}

/// Triangle mesh that keeps its GPU buffers in step with its geometry.
///
/// Every mutation is mirrored into the buffers: a normal flip overwrites the
/// normal buffer in place, anything that moves vertices re-uploads all of
/// them. Textures referenced by the coloring are borrowed, not owned. The
/// buffers are released when the mesh is cleared or dropped; moving a
/// `GpuMesh` moves the handles with it.
pub struct GpuMesh<G: GraphicsContext> {
    gl: Rc<G>,
    data: MeshData,
    buffers: MeshBuffers<G>,
    coloring: Coloring<G::Texture>,
    show_bounds: bool,
    show_normals: bool,
}

impl<G: GraphicsContext> GpuMesh<G> {
    pub fn new(gl: Rc<G>) -> Self {
        Self {
            gl,
            data: MeshData::new(),
            buffers: MeshBuffers::new(),
            coloring: Coloring::default(),
            show_bounds: false,
            show_normals: false,
        }
    }

    /// Takes ownership of `data` and uploads it.
    pub fn from_data(gl: Rc<G>, data: MeshData) -> Self {
        let mut mesh = Self::new(gl);
        mesh.data = data;
        mesh.upload();
        mesh
    }

    pub fn data(&self) -> &MeshData {
        &self.data
    }

    pub fn buffers(&self) -> &MeshBuffers<G> {
        &self.buffers
    }

    /// Empties the mesh, releases its buffers and resets drawing options.
    pub fn clear(&mut self) {
        self.data.clear();
        self.buffers.release_all(&self.gl);
        self.coloring = Coloring::default();
        self.show_bounds = false;
        self.show_normals = false;
    }

    fn upload(&mut self) {
        self.buffers.upload_all(&self.gl, &self.data);
    }

    /// Mirrors the outcome of a load: success uploads the new data, a file
    /// error releases (the data is already empty), a format error keeps
    /// the old buffers because the old data is still there.
    fn after_load(&mut self, result: MeshResult<()>) -> MeshResult<()> {
        match &result {
            Ok(()) => self.upload(),
            Err(e) if e.is_io() => self.buffers.release_all(&self.gl),
            Err(_) => {}
        }
        result
    }

    // === loading and generation ===

    pub fn load(&mut self, path: impl AsRef<Path>, lsa_offset: Vec3f) -> MeshResult<()> {
        let result = self.data.load(path, lsa_offset);
        self.after_load(result)
    }

    pub fn load_off(&mut self, path: impl AsRef<Path>) -> MeshResult<()> {
        let result = self.data.load_off(path);
        self.after_load(result)
    }

    pub fn load_lsa(&mut self, path: impl AsRef<Path>, offset: Vec3f) -> MeshResult<()> {
        let result = self.data.load_lsa(path, offset);
        self.after_load(result)
    }

    /// Loads an `OFF` file and fits it to `mid` and `length`; uploads once.
    pub fn load_off_fitted(&mut self, path: impl AsRef<Path>, mid: Vec3f, length: f32) -> MeshResult<()> {
        if let Err(e) = self.data.load_off(path) {
            return self.after_load(Err(e));
        }
        self.data.translate_to_center(mid);
        let scaled = self.data.scale_to_length(length).map(drop);
        self.upload();
        scaled
    }

    pub fn generate_sphere(&mut self, params: SphereParams) -> MeshResult<()> {
        let result = self.data.generate_sphere(params);
        self.after_load(result)
    }

    pub fn generate_flat_patch(&mut self) {
        self.data.generate_flat_patch();
        self.upload();
    }

    // === mutation ===

    /// Attaches per-vertex colours and re-uploads.
    pub fn set_colors(&mut self, colors: Vec<Vec3f>) {
        self.data.set_colors(colors);
        self.upload();
    }

    pub fn compute_normals_with(&mut self, weighting: NormalWeighting) {
        self.data.compute_normals_with(weighting);
        self.sync_normals();
    }

    pub fn flip_normals(&mut self) {
        self.data.flip_normals();
        self.sync_normals();
    }

    fn sync_normals(&mut self) {
        if !self.buffers.update_normals(&self.gl, &self.data) {
            self.upload();
        }
    }

    pub fn translate_to_center(&mut self, mid: Vec3f) {
        self.data.translate_to_center(mid);
        self.upload();
    }

    /// Scales so the largest side equals `length`; see [`MeshData::scale_to_length`].
    pub fn scale_to_length(&mut self, length: f32) -> MeshResult<f32> {
        let scale = self.data.scale_to_length(length)?;
        self.upload();
        Ok(scale)
    }

    // === drawing options ===

    pub fn coloring(&self) -> &Coloring<G::Texture> {
        &self.coloring
    }

    /// Selects the coloring, checking the mesh has the attributes it reads.
    pub fn set_coloring(&mut self, coloring: Coloring<G::Texture>) -> Result<(), RenderError> {
        match &coloring {
            Coloring::Static(_) => {}
            Coloring::ColorArray if !self.data.has_colors() => {
                return Err(RenderError::MissingAttribute("colors"));
            }
            Coloring::Texture(_) | Coloring::BumpMapping(_) if !self.data.has_tex_coords() => {
                return Err(RenderError::MissingAttribute("texture coordinates"));
            }
            Coloring::BumpMapping(_) if !self.data.has_tangents() => {
                return Err(RenderError::MissingAttribute("tangents"));
            }
            _ => {}
        }
        self.coloring = coloring;
        Ok(())
    }

    pub fn set_static_color(&mut self, color: Vec3f) {
        self.coloring = Coloring::Static(color);
    }

    pub fn show_bounds(&self) -> bool {
        self.show_bounds
    }

    pub fn set_show_bounds(&mut self, on: bool) {
        self.show_bounds = on;
    }

    pub fn show_normals(&self) -> bool {
        self.show_normals
    }

    pub fn set_show_normals(&mut self, on: bool) {
        self.show_normals = on;
    }

    // === drawing ===

    /// Buffers the current coloring reads are all present.
    fn coloring_ready(&self) -> bool {
        match &self.coloring {
            Coloring::Static(_) => true,
            Coloring::ColorArray => self.buffers.colors().is_some(),
            Coloring::Texture(_) => self.buffers.tex_coords().is_some(),
            Coloring::BumpMapping(_) => {
                self.buffers.tex_coords().is_some() && self.buffers.tangents().is_some()
            }
        }
    }

    /// Draws the mesh and its enabled debug geometry.
    ///
    /// Returns the number of triangles drawn, 0 when a needed buffer is
    /// missing. Debug geometry is drawn with the standard program, after
    /// which the previously active program is restored.
    pub fn draw(&self, state: &mut RenderState<G>) -> usize {
        if !self.buffers.is_drawable() || !self.coloring_ready() {
            log::debug!("Skipping draw of mesh without usable buffers");
            return 0;
        }
        if self.show_bounds || self.show_normals {
            let former = state.current_program();
            state.switch_to_standard_program();
            if self.show_bounds {
                self.draw_bounds(state);
            }
            if self.show_normals {
                self.draw_normals(state);
            }
            state.set_current_program(former);
        }
        self.draw_triangles(state);
        self.data.num_triangles()
    }

    fn draw_bounds(&self, state: &mut RenderState<G>) {
        let Some(vao) = self.buffers.bounds_vao() else {
            return;
        };
        let bounds = *self.data.bounds();
        let gl = &self.gl;
        gl.bind_vertex_array(Some(vao));
        state.push_model_view();
        state.model_view_mut().translate(bounds.mid.into());
        state.model_view_mut().scale(bounds.size.into());
        gl.uniform_matrix4(
            state.model_view_uniform(),
            &state.current_model_view().to_cols_array(),
        );
        gl.vertex_attrib_3f(COLOR_LOCATION, DEBUG_COLOR);
        gl.draw_elements(Primitive::Lines, BOX_LINE_INDICES.len());
        state.pop_model_view();
        gl.bind_vertex_array(None);
    }

    fn draw_normals(&self, state: &mut RenderState<G>) {
        let Some(vao) = self.buffers.normals_vao() else {
            return;
        };
        let gl = &self.gl;
        gl.bind_vertex_array(Some(vao));
        gl.uniform_matrix4(
            state.model_view_uniform(),
            &state.current_model_view().to_cols_array(),
        );
        gl.vertex_attrib_3f(COLOR_LOCATION, DEBUG_COLOR);
        gl.draw_arrays(Primitive::Lines, 0, 2 * self.buffers.vertex_count());
        gl.bind_vertex_array(None);
    }

    fn draw_triangles(&self, state: &mut RenderState<G>) {
        let gl = &self.gl;
        gl.bind_vertex_array(self.buffers.vao());
        state.upload_model_view();
        match &self.coloring {
            Coloring::Static(color) => {
                gl.uniform_1u(state.use_texture_uniform(), 0);
                gl.disable_vertex_attrib_array(COLOR_LOCATION);
                gl.vertex_attrib_3f(COLOR_LOCATION, color.to_array());
            }
            Coloring::ColorArray => {
                gl.uniform_1u(state.use_texture_uniform(), 0);
                gl.enable_vertex_attrib_array(COLOR_LOCATION);
            }
            Coloring::Texture(texture) => {
                gl.uniform_1u(state.use_texture_uniform(), 1);
                gl.bind_texture_unit(DIFFUSE_UNIT, Some(*texture));
                gl.uniform_1i(state.texture_uniform(), DIFFUSE_UNIT as i32);
            }
            Coloring::BumpMapping(maps) => {
                gl.disable_vertex_attrib_array(COLOR_LOCATION);
                gl.vertex_attrib_3f(COLOR_LOCATION, maps.base_color.to_array());

                let use_displacement = maps.use_displacement && maps.displacement.is_some();
                gl.uniform_1u(state.uniform_location("useDiffuse").as_ref(), maps.use_diffuse as u32);
                gl.uniform_1u(state.uniform_location("useNormal").as_ref(), maps.use_normal as u32);
                gl.uniform_1u(
                    state.uniform_location("useDisplacement").as_ref(),
                    use_displacement as u32,
                );

                let units = [
                    ("diffuseTexture", DIFFUSE_UNIT, Some(maps.diffuse)),
                    ("normalTexture", NORMAL_UNIT, Some(maps.normal)),
                    ("displacementTexture", DISPLACEMENT_UNIT, maps.displacement),
                ];
                for (name, unit, texture) in units {
                    gl.uniform_1i(state.uniform_location(name).as_ref(), unit as i32);
                    gl.bind_texture_unit(unit, texture);
                }
            }
        }
        gl.draw_elements(Primitive::Triangles, self.buffers.index_count());
        gl.bind_vertex_array(None);
    }
}

impl<G: GraphicsContext> Drop for GpuMesh<G> {
    fn drop(&mut self) {
        self.buffers.release_all(&self.gl);
    }
}

impl<G: GraphicsContext> fmt::Display for GpuMesh<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.data)?;
        writeln!(
            f,
            "  VAO: {:?}, VBOs: f={:?}, v={:?}, n={:?}, c={:?}, t={:?}",
            self.buffers.vao(),
            self.buffers.indices(),
            self.buffers.vertices(),
            self.buffers.normals(),
            self.buffers.colors(),
            self.buffers.tex_coords()
        )?;
        writeln!(f, "coloring using: {}", self.coloring.name())
    }
}
