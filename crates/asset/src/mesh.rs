//! CPU-side triangle mesh: positions, per-vertex attributes and bounds.

use std::f32::consts::FRAC_1_PI;
use std::fmt;
use std::path::Path;

use bytemuck::{Pod, Zeroable};
use corelib::{BoundingBox, Vec3f, cross};

use crate::error::{MeshError, MeshResult};

/// Three indices into the vertex array.
pub type Triangle = [u32; 3];

/// Texture coordinate, `u` and `v` in `[0, 1]`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct TexCoord {
    pub u: f32,
    pub v: f32,
}

impl TexCoord {
    pub const fn new(u: f32, v: f32) -> Self {
        Self { u, v }
    }
}

/// How face normals are weighted when accumulated into vertex normals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NormalWeighting {
    /// Un-normalized cross products; larger faces count more.
    #[default]
    Area,
    /// Unit face normals weighted by the corner angle at each vertex.
    Angle,
}

/// Indexed triangle mesh with parallel per-vertex attribute arrays.
///
/// `colors`, `tex_coords` and `tangents` only count as present when their
/// length equals the vertex count. The bounding box is recomputed whenever
/// positions are loaded, generated or transformed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub(crate) vertices: Vec<Vec3f>,
    pub(crate) normals: Vec<Vec3f>,
    pub(crate) triangles: Vec<Triangle>,
    pub(crate) colors: Vec<Vec3f>,
    pub(crate) tex_coords: Vec<TexCoord>,
    pub(crate) tangents: Vec<Vec3f>,
    pub(crate) bounds: BoundingBox,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a mesh from raw positions and triangles. Normals are left empty.
    pub fn from_triangles(vertices: Vec<Vec3f>, triangles: Vec<Triangle>) -> MeshResult<Self> {
        for (face, tri) in triangles.iter().enumerate() {
            if let Some(&index) = tri.iter().find(|&&i| i as usize >= vertices.len()) {
                return Err(MeshError::IndexOutOfRange {
                    face,
                    index,
                    vertex_count: vertices.len(),
                });
            }
        }
        let bounds = BoundingBox::from_points(&vertices);
        Ok(Self {
            vertices,
            triangles,
            bounds,
            ..Self::default()
        })
    }

    /// Drops all arrays and resets the bounds to [`BoundingBox::EMPTY`].
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    // =================
    // === LOAD MESH ===
    // =================

    /// Replaces the mesh with the contents of an `OFF`/`NOFF` file.
    ///
    /// An unreadable file leaves the mesh empty; a malformed one leaves it
    /// as it was before the call.
    pub fn load_off(&mut self, path: impl AsRef<Path>) -> MeshResult<()> {
        let loaded = crate::off::load_off_from_path(path);
        self.replace_with(loaded)
    }

    /// Replaces the mesh with the contents of an `LSA` file, shifted by `offset`.
    pub fn load_lsa(&mut self, path: impl AsRef<Path>, offset: Vec3f) -> MeshResult<()> {
        let loaded = crate::lsa::load_lsa_from_path(path, offset);
        self.replace_with(loaded)
    }

    /// Replaces the mesh with any supported format, chosen by header tag.
    pub fn load(&mut self, path: impl AsRef<Path>, lsa_offset: Vec3f) -> MeshResult<()> {
        let loaded = crate::load_mesh_from_path(path, lsa_offset);
        self.replace_with(loaded)
    }

    /// Loads an `OFF` file, centers it on `mid` and scales its largest side to `length`.
    pub fn load_off_fitted(
        &mut self,
        path: impl AsRef<Path>,
        mid: Vec3f,
        length: f32,
    ) -> MeshResult<()> {
        self.load_off(path)?;
        self.translate_to_center(mid);
        self.scale_to_length(length)?;
        Ok(())
    }

    pub(crate) fn replace_with(&mut self, loaded: MeshResult<MeshData>) -> MeshResult<()> {
        match loaded {
            Ok(mesh) => {
                *self = mesh;
                Ok(())
            }
            Err(err) => {
                if err.is_io() {
                    self.clear();
                }
                log::warn!("Mesh load failed: {err}");
                Err(err)
            }
        }
    }

    /// Derived state every loader fills in once positions and faces are read.
    pub(crate) fn finish_load(&mut self) {
        self.recompute_bounds();
        if self.normals.len() != self.vertices.len() {
            self.compute_normals();
        }
        self.compute_tex_coords_sphere_mapping();
    }

    // ================
    // === RAW DATA ===
    // ================

    pub fn vertices(&self) -> &[Vec3f] {
        &self.vertices
    }

    pub fn normals(&self) -> &[Vec3f] {
        &self.normals
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn colors(&self) -> &[Vec3f] {
        &self.colors
    }

    pub fn tex_coords(&self) -> &[TexCoord] {
        &self.tex_coords
    }

    pub fn tangents(&self) -> &[Vec3f] {
        &self.tangents
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    fn is_per_vertex(&self, len: usize) -> bool {
        len > 0 && len == self.vertices.len()
    }

    pub fn has_normals(&self) -> bool {
        self.is_per_vertex(self.normals.len())
    }

    pub fn has_colors(&self) -> bool {
        self.is_per_vertex(self.colors.len())
    }

    pub fn has_tex_coords(&self) -> bool {
        self.is_per_vertex(self.tex_coords.len())
    }

    pub fn has_tangents(&self) -> bool {
        self.is_per_vertex(self.tangents.len())
    }

    /// Attaches per-vertex colours (r, g, b in `[0, 1]`).
    pub fn set_colors(&mut self, colors: Vec<Vec3f>) {
        if colors.len() != self.vertices.len() {
            log::warn!(
                "Color array has {} entries for {} vertices; it will be ignored",
                colors.len(),
                self.vertices.len()
            );
        }
        self.colors = colors;
    }

    // ===============
    // === NORMALS ===
    // ===============

    /// Area-weighted vertex normals.
    pub fn compute_normals(&mut self) {
        self.compute_normals_with(NormalWeighting::Area);
    }

    /// Recomputes every vertex normal from the faces around it.
    ///
    /// Vertices that belong to no triangle keep a zero normal.
    pub fn compute_normals_with(&mut self, weighting: NormalWeighting) {
        let mut normals = vec![Vec3f::zero(); self.vertices.len()];
        for tri in &self.triangles {
            let [i0, i1, i2] = tri.map(|i| i as usize);
            let (p0, p1, p2) = (self.vertices[i0], self.vertices[i1], self.vertices[i2]);
            let face = cross(p1 - p0, p2 - p0);
            match weighting {
                NormalWeighting::Area => {
                    normals[i0] += face;
                    normals[i1] += face;
                    normals[i2] += face;
                }
                NormalWeighting::Angle => {
                    let mut unit = face;
                    if !unit.normalize() {
                        continue;
                    }
                    normals[i0] += unit * corner_angle(p1 - p0, p2 - p0);
                    normals[i1] += unit * corner_angle(p2 - p1, p0 - p1);
                    normals[i2] += unit * corner_angle(p0 - p2, p1 - p2);
                }
            }
        }
        for n in &mut normals {
            n.normalize();
        }
        self.normals = normals;
    }

    pub fn flip_normals(&mut self) {
        for n in &mut self.normals {
            *n = -*n;
        }
    }

    // ==================
    // === TRANSFORMS ===
    // ==================

    pub fn recompute_bounds(&mut self) {
        self.bounds = BoundingBox::from_points(&self.vertices);
    }

    /// Moves every vertex so the bounding-box midpoint lands on `mid`.
    pub fn translate_to_center(&mut self, mid: Vec3f) {
        let offset = mid - self.bounds.mid;
        for v in &mut self.vertices {
            *v += offset;
        }
        self.bounds.translate(offset);
    }

    /// Scales about the origin so the largest bounding-box side equals `length`.
    ///
    /// Returns the applied factor. A box with no positive finite extent is
    /// rejected and the mesh is left untouched.
    pub fn scale_to_length(&mut self, length: f32) -> MeshResult<f32> {
        let extent = self.bounds.largest_extent();
        if !(extent > 0.0 && extent.is_finite()) {
            return Err(MeshError::DegenerateBounds(extent));
        }
        let scale = length / extent;
        for v in &mut self.vertices {
            *v *= scale;
        }
        self.bounds.scale(scale);
        Ok(scale)
    }

    /// Texture coordinates by central projection onto a sphere around the bounds midpoint.
    pub fn compute_tex_coords_sphere_mapping(&mut self) {
        let mid = self.bounds.mid;
        self.tex_coords = self
            .vertices
            .iter()
            .map(|&p| {
                let d = p - mid;
                let len = d.length();
                if len < Vec3f::EPSILON {
                    return TexCoord::new(0.5, 0.5);
                }
                let u = 0.5 * FRAC_1_PI * d.x.atan2(d.z) + 0.5;
                let v = FRAC_1_PI * (d.y / len).clamp(-1.0, 1.0).asin() + 0.5;
                TexCoord::new(u, v)
            })
            .collect();
    }

    pub fn stats(&self) -> MeshStats {
        MeshStats {
            triangles: self.triangles.len(),
            vertices: self.vertices.len(),
            normals: self.normals.len(),
            colors: self.colors.len(),
            tex_coords: self.tex_coords.len(),
            tangents: self.tangents.len(),
            bounds: self.bounds,
        }
    }
}

/// Angle between two edge vectors leaving the same corner, 0 for degenerate edges.
fn corner_angle(a: Vec3f, b: Vec3f) -> f32 {
    let (mut a, mut b) = (a, b);
    if !a.normalize() || !b.normalize() {
        return 0.0;
    }
    (a * b).clamp(-1.0, 1.0).acos()
}

/// Array sizes and bounds of a mesh, for logging.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshStats {
    pub triangles: usize,
    pub vertices: usize,
    pub normals: usize,
    pub colors: usize,
    pub tex_coords: usize,
    pub tangents: usize,
    pub bounds: BoundingBox,
}

impl fmt::Display for MeshStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "nr. triangles: {}", self.triangles)?;
        writeln!(f, "nr. vertices:  {}", self.vertices)?;
        writeln!(f, "nr. normals:   {}", self.normals)?;
        writeln!(f, "nr. colors:    {}", self.colors)?;
        writeln!(f, "nr. texCoords: {}", self.tex_coords)?;
        writeln!(f, "nr. tangents:  {}", self.tangents)?;
        if self.bounds.is_empty() {
            write!(f, "BB: empty")
        } else {
            writeln!(f, "BB: ({}) - ({})", self.bounds.min, self.bounds.max)?;
            writeln!(f, "  BBMid: ({})", self.bounds.mid)?;
            write!(f, "  BBSize: ({})", self.bounds.size)
        }
    }
}

impl fmt::Display for MeshData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.stats().fmt(f)
    }
}
