//! Vertex-coordinate mesh files.
//!
//! ```text
//! OFF                      NOFF
//! nv nf ne                 nv nf ne
//! x y z        (nv times)  x y z nx ny nz   (nv times)
//! 3 i j k      (nf times)  3 i j k          (nf times)
//! ```

use std::{
    fs::File,
    io::{self, Read},
    path::Path,
};

use crate::error::{MeshError, MeshResult};
use crate::mesh::MeshData;
use crate::tokens::{Tokens, read_counts, read_faces, with_capacity};

/// Load an `OFF`/`NOFF` mesh from a file path.
pub fn load_off_from_path(path: impl AsRef<Path>) -> MeshResult<MeshData> {
    let path = path.as_ref();
    let src = read_to_string(path)?;
    let mesh = parse_off(&src)?;
    log::info!(
        "Loaded {}: {} vertices, {} triangles",
        path.display(),
        mesh.num_vertices(),
        mesh.num_triangles()
    );
    Ok(mesh)
}

/// Load an `OFF`/`NOFF` mesh from any reader.
pub fn load_off_from_reader<R: Read>(mut reader: R) -> MeshResult<MeshData> {
    let mut src = String::new();
    reader
        .read_to_string(&mut src)
        .map_err(|source| MeshError::Io {
            path: "<reader>".into(),
            source,
        })?;
    parse_off(&src)
}

/// Convenience helper to parse an `OFF`/`NOFF` string literal.
pub fn load_off_from_str(contents: &str) -> MeshResult<MeshData> {
    parse_off(contents)
}

pub(crate) fn read_to_string(path: &Path) -> MeshResult<String> {
    let mut file = File::open(path).map_err(|source| io_error(path, source))?;
    let mut src = String::new();
    file.read_to_string(&mut src)
        .map_err(|source| io_error(path, source))?;
    Ok(src)
}

fn io_error(path: &Path, source: io::Error) -> MeshError {
    MeshError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn parse_off(src: &str) -> MeshResult<MeshData> {
    let mut tokens = Tokens::new(src);
    let tag = tokens.next_str("header tag")?;
    let with_normals = if tag.starts_with("NOFF") {
        true
    } else if tag.starts_with("OFF") {
        false
    } else {
        return Err(MeshError::UnknownHeader(tag.to_owned()));
    };

    let (nv, nf) = read_counts(&mut tokens)?;

    let mut mesh = MeshData::new();
    mesh.vertices = with_capacity(nv);
    if with_normals {
        mesh.normals = with_capacity(nv);
    }
    for _ in 0..nv {
        mesh.vertices.push(tokens.next_vec3("vertex position")?);
        if with_normals {
            mesh.normals.push(tokens.next_vec3("vertex normal")?);
        }
    }
    mesh.triangles = read_faces(&mut tokens, nf, nv)?;
    mesh.finish_load();
    Ok(mesh)
}
