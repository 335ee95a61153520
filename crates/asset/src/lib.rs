//! Asset loading: triangle meshes from text formats, procedural meshes and textures.
//!
//! Supported mesh formats:
//! - `OFF` / `NOFF`: Cartesian positions, optionally with inline normals.
//! - `LSA`: per-vertex angles plus a baseline, triangulated into positions.

pub mod error;
pub mod generate;
pub mod lsa;
pub mod mesh;
pub mod off;
pub mod texture;
mod tokens;

use std::path::Path;

use corelib::Vec3f;

pub use error::{MeshError, MeshResult};
pub use generate::SphereParams;
pub use mesh::{MeshData, MeshStats, NormalWeighting, TexCoord, Triangle};
pub use texture::{TextureData, TextureFormat};

/// Load a mesh, picking the parser from the header tag.
///
/// `lsa_offset` is only applied to `LSA` files.
pub fn load_mesh_from_path(path: impl AsRef<Path>, lsa_offset: Vec3f) -> MeshResult<MeshData> {
    let path = path.as_ref();
    let src = off::read_to_string(path)?;
    let tag = src.split_whitespace().next().unwrap_or_default();
    let mesh = if tag.starts_with("LSA") {
        lsa::load_lsa_from_str(&src, lsa_offset)?
    } else {
        off::load_off_from_str(&src)?
    };
    log::info!(
        "Loaded {}: {} vertices, {} triangles",
        path.display(),
        mesh.num_vertices(),
        mesh.num_triangles()
    );
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("asset-{}-{}", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn lsa_tag_picks_the_lsa_parser_and_applies_the_offset() {
        let path = write_temp(
            "scan.lsa",
            "LSA\n3 1 0 2.0\n45 45 0\n30 60 0\n45 45 45\n3 0 1 2\n",
        );
        let mesh = load_mesh_from_path(&path, Vec3f::new(0.0, 0.0, -5.0));
        std::fs::remove_file(&path).unwrap();

        let mesh = mesh.unwrap();
        assert_eq!(mesh.num_vertices(), 3);
        assert_eq!(mesh.num_triangles(), 1);
        assert!((mesh.vertices()[0] - Vec3f::new(1.0, 0.0, -4.0)).length() < 1e-4);
        assert!(mesh.has_normals());
    }

    #[test]
    fn off_tag_ignores_the_offset() {
        let path = write_temp("tri.off", "OFF\n3 1 0\n0 0 0\n1 0 0\n0 1 0\n3 0 1 2\n");
        let mesh = load_mesh_from_path(&path, Vec3f::new(0.0, 0.0, -5.0));
        std::fs::remove_file(&path).unwrap();

        let mesh = mesh.unwrap();
        assert_eq!(mesh.vertices()[1], Vec3f::new(1.0, 0.0, 0.0));
        assert_eq!(mesh.bounds().min, Vec3f::zero());
    }
}
