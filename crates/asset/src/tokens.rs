//! Whitespace tokenizer shared by the text mesh formats.

use corelib::Vec3f;

use crate::error::{MeshError, MeshResult};
use crate::mesh::Triangle;

/// Upper bound for up-front allocations driven by header counts.
const MAX_PREALLOC: usize = 1 << 20;

pub(crate) struct Tokens<'a> {
    inner: std::str::SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        Self {
            inner: src.split_whitespace(),
        }
    }

    pub(crate) fn next_str(&mut self, what: &'static str) -> MeshResult<&'a str> {
        self.inner.next().ok_or(MeshError::MissingToken { what })
    }

    pub(crate) fn next_f32(&mut self, what: &'static str) -> MeshResult<f32> {
        let token = self.next_str(what)?;
        token.parse::<f32>().map_err(|_| MeshError::InvalidNumber {
            what,
            token: token.to_owned(),
        })
    }

    pub(crate) fn next_i64(&mut self, what: &'static str) -> MeshResult<i64> {
        let token = self.next_str(what)?;
        token.parse::<i64>().map_err(|_| MeshError::InvalidNumber {
            what,
            token: token.to_owned(),
        })
    }

    pub(crate) fn next_u32(&mut self, what: &'static str) -> MeshResult<u32> {
        let token = self.next_str(what)?;
        token.parse::<u32>().map_err(|_| MeshError::InvalidNumber {
            what,
            token: token.to_owned(),
        })
    }

    pub(crate) fn next_vec3(&mut self, what: &'static str) -> MeshResult<Vec3f> {
        Ok(Vec3f::new(
            self.next_f32(what)?,
            self.next_f32(what)?,
            self.next_f32(what)?,
        ))
    }
}

/// Vertex and face counts from a header; the edge count is read and dropped.
pub(crate) fn read_counts(tokens: &mut Tokens<'_>) -> MeshResult<(usize, usize)> {
    let vertices = tokens.next_i64("vertex count")?;
    let faces = tokens.next_i64("face count")?;
    let _edges = tokens.next_i64("edge count")?;
    if vertices <= 0 || faces <= 0 {
        return Err(MeshError::InvalidCount { vertices, faces });
    }
    Ok((vertices as usize, faces as usize))
}

pub(crate) fn with_capacity<T>(declared: usize) -> Vec<T> {
    Vec::with_capacity(declared.min(MAX_PREALLOC))
}

/// Reads `count` face records of the form `n i j k`.
///
/// `n` is expected to be 3 but is not enforced; records that say otherwise
/// are still read as one triangle.
pub(crate) fn read_faces(
    tokens: &mut Tokens<'_>,
    count: usize,
    vertex_count: usize,
) -> MeshResult<Vec<Triangle>> {
    let mut triangles = with_capacity(count);
    let mut odd_records = 0usize;
    for face in 0..count {
        if tokens.next_i64("face index count")? != 3 {
            odd_records += 1;
        }
        let mut tri = [0u32; 3];
        for slot in &mut tri {
            let index = tokens.next_u32("face vertex index")?;
            if index as usize >= vertex_count {
                return Err(MeshError::IndexOutOfRange {
                    face,
                    index,
                    vertex_count,
                });
            }
            *slot = index;
        }
        triangles.push(tri);
    }
    if odd_records > 0 {
        log::warn!(
            "{odd_records} face record(s) declare a vertex count other than 3; read as triangles"
        );
    }
    Ok(triangles)
}
