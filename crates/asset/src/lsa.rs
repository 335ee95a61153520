//! Angular (laser-scanner / stereo) mesh files.
//!
//! ```text
//! LSA
//! nv nf ne baseline
//! alpha beta gamma   (nv times, degrees)
//! 3 i j k            (nf times)
//! ```
//!
//! Two viewpoints sit on the x axis, at `x = 0` and `x = baseline`, both
//! looking down +z. `alpha` and `beta` are the horizontal angles at which
//! each viewpoint sees the point (measured from +z, towards the other
//! viewpoint) and `gamma` is the elevation seen from the first one.

use std::path::Path;

use corelib::Vec3f;

use crate::error::{MeshError, MeshResult};
use crate::mesh::MeshData;
use crate::off::read_to_string;
use crate::tokens::{Tokens, read_faces, with_capacity};

/// Load an `LSA` mesh from a file path; every vertex is shifted by `offset`.
pub fn load_lsa_from_path(path: impl AsRef<Path>, offset: Vec3f) -> MeshResult<MeshData> {
    let path = path.as_ref();
    let src = read_to_string(path)?;
    let mesh = parse_lsa(&src, offset)?;
    log::info!(
        "Loaded {}: {} vertices, {} triangles",
        path.display(),
        mesh.num_vertices(),
        mesh.num_triangles()
    );
    Ok(mesh)
}

/// Convenience helper to parse an `LSA` string literal.
pub fn load_lsa_from_str(contents: &str, offset: Vec3f) -> MeshResult<MeshData> {
    parse_lsa(contents, offset)
}

/// Cartesian position of a point seen under `alpha`/`beta`/`gamma` (degrees).
pub fn triangulate(alpha: f32, beta: f32, gamma: f32, baseline: f32) -> Vec3f {
    let (alpha, beta, gamma) = (alpha.to_radians(), beta.to_radians(), gamma.to_radians());
    let z = baseline / (alpha.tan() + beta.tan());
    let x = z * alpha.tan();
    // distance in the xz-plane is z / cos(alpha)
    let y = z * gamma.tan() / alpha.cos();
    Vec3f::new(x, y, z)
}

fn parse_lsa(src: &str, offset: Vec3f) -> MeshResult<MeshData> {
    let mut tokens = Tokens::new(src);
    let tag = tokens.next_str("header tag")?;
    if !tag.starts_with("LSA") {
        return Err(MeshError::UnknownHeader(tag.to_owned()));
    }

    let vertices = tokens.next_i64("vertex count")?;
    let faces = tokens.next_i64("face count")?;
    let _edges = tokens.next_i64("edge count")?;
    let baseline = tokens.next_f32("baseline distance")?;
    if vertices <= 0 || faces <= 0 {
        return Err(MeshError::InvalidCount { vertices, faces });
    }
    let (nv, nf) = (vertices as usize, faces as usize);

    let mut mesh = MeshData::new();
    mesh.vertices = with_capacity(nv);
    for _ in 0..nv {
        let alpha = tokens.next_f32("alpha angle")?;
        let beta = tokens.next_f32("beta angle")?;
        let gamma = tokens.next_f32("gamma angle")?;
        mesh.vertices
            .push(triangulate(alpha, beta, gamma, baseline) + offset);
    }
    mesh.triangles = read_faces(&mut tokens, nf, nv)?;
    mesh.finish_load();
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3f, b: Vec3f) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn symmetric_angles_meet_on_the_midline() {
        // 45 degrees from both ends of a baseline of 2 meet at (1, 0, 1)
        let p = triangulate(45.0, 45.0, 0.0, 2.0);
        assert!(close(p, Vec3f::new(1.0, 0.0, 1.0)));
    }

    #[test]
    fn elevation_lifts_the_point() {
        let p = triangulate(45.0, 45.0, 45.0, 2.0);
        // horizontal distance from the first viewpoint is sqrt(2)
        assert!(close(p, Vec3f::new(1.0, 2f32.sqrt(), 1.0)));
    }

    #[test]
    fn parse_applies_offset_and_computes_normals() {
        let src = "LSA\n3 1 0 2.0\n\
                   45 45 0\n\
                   30 60 0\n\
                   45 45 45\n\
                   3 0 1 2\n";
        let offset = Vec3f::new(0.0, 0.0, -5.0);
        let mesh = load_lsa_from_str(src, offset).unwrap();
        assert_eq!(mesh.num_vertices(), 3);
        assert!(close(mesh.vertices()[0], Vec3f::new(1.0, 0.0, -4.0)));
        assert_eq!(mesh.normals().len(), 3);
    }

    #[test]
    fn wrong_tag_and_counts_are_rejected() {
        assert!(matches!(
            load_lsa_from_str("OFF 3 1 0 1.0", Vec3f::zero()),
            Err(MeshError::UnknownHeader(_))
        ));
        assert!(matches!(
            load_lsa_from_str("LSA 3 0 0 1.0", Vec3f::zero()),
            Err(MeshError::InvalidCount { .. })
        ));
    }

    #[test]
    fn missing_file_clears_existing_mesh() {
        let src = "LSA 3 1 0 2\n45 45 0\n30 60 0\n45 45 45\n3 0 1 2";
        let mut mesh = load_lsa_from_str(src, Vec3f::zero()).unwrap();
        assert!(mesh.load_lsa("/no/such/file.lsa", Vec3f::zero()).is_err());
        assert!(mesh.is_empty());
    }
}
