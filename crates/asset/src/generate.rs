//! Procedural meshes.

use std::f32::consts::PI;

use corelib::{BoundingBox, Vec3f, cross};

use crate::error::{MeshError, MeshResult};
use crate::mesh::{MeshData, TexCoord};

/// Tessellation of a latitude/longitude sphere.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SphereParams {
    /// Faces per ring, at least 4.
    pub longitude_divisions: u32,
    /// Number of rings, at least 2.
    pub latitude_divisions: u32,
}

impl Default for SphereParams {
    fn default() -> Self {
        Self {
            longitude_divisions: 200,
            latitude_divisions: 100,
        }
    }
}

impl MeshData {
    /// Replaces the mesh with a unit sphere around the origin.
    ///
    /// Normals equal positions; texture coordinates and tangents are filled in.
    pub fn generate_sphere(&mut self, params: SphereParams) -> MeshResult<()> {
        let SphereParams {
            longitude_divisions: longdiv,
            latitude_divisions: latdiv,
        } = params;
        let invalid = MeshError::InvalidTessellation {
            longitude: longdiv,
            latitude: latdiv,
        };
        if longdiv < 4 || latdiv < 2 {
            return Err(invalid);
        }
        // Indices are u32, so every vertex must be addressable by one.
        let vertex_count = (u64::from(longdiv) + 1) * (u64::from(latdiv) + 1);
        if vertex_count > u64::from(u32::MAX) {
            return Err(invalid);
        }
        let (Ok(count), Ok(triangle_count)) = (
            usize::try_from(vertex_count),
            usize::try_from(2 * u64::from(longdiv) * u64::from(latdiv)),
        ) else {
            return Err(invalid);
        };

        self.clear();
        self.vertices.reserve(count);
        self.normals.reserve(count);
        self.tex_coords.reserve(count);
        self.tangents.reserve(count);

        for latitude in 0..=latdiv {
            let v = latitude as f32 / latdiv as f32;
            let lat_angle = v * PI;
            let extent = lat_angle.sin();
            let y = -lat_angle.cos();

            for longitude in 0..=longdiv {
                let u = longitude as f32 / longdiv as f32;
                let long_angle = u * 2.0 * PI;
                let pos = Vec3f::new(long_angle.cos() * extent, y, long_angle.sin() * extent);

                self.vertices.push(pos);
                self.normals.push(pos);
                self.tex_coords.push(TexCoord::new(2.0 - 2.0 * u, v));
                self.tangents.push(cross(Vec3f::new(0.0, 1.0, 0.0), pos));
            }
        }

        self.triangles.reserve(triangle_count);
        for latitude in 0..latdiv {
            let bottom = latitude * (longdiv + 1);
            let top = (latitude + 1) * (longdiv + 1);
            for longitude in 0..longdiv {
                let bottom_current = bottom + longitude;
                let bottom_next = bottom_current + 1;
                let top_current = top + longitude;
                let top_next = top_current + 1;
                self.triangles.push([bottom_current, bottom_next, top_next]);
                self.triangles.push([top_next, top_current, bottom_current]);
            }
        }

        self.bounds = BoundingBox::from_min_max(Vec3f::splat(-1.0), Vec3f::splat(1.0));
        Ok(())
    }

    /// Replaces the mesh with a flat 10x10 quad on the y = 0 plane.
    pub fn generate_flat_patch(&mut self) {
        self.clear();
        self.vertices = vec![
            Vec3f::new(0.0, 0.0, 0.0),
            Vec3f::new(0.0, 0.0, 10.0),
            Vec3f::new(10.0, 0.0, 10.0),
            Vec3f::new(10.0, 0.0, 0.0),
        ];
        self.triangles = vec![[0, 1, 2], [0, 2, 3]];
        self.compute_normals();
        self.recompute_bounds();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_vertices_lie_on_unit_sphere() {
        let mut mesh = MeshData::new();
        mesh.generate_sphere(SphereParams {
            longitude_divisions: 8,
            latitude_divisions: 4,
        })
        .unwrap();
        assert_eq!(mesh.num_vertices(), 9 * 5);
        assert_eq!(mesh.num_triangles(), 2 * 8 * 4);
        assert!(mesh.has_normals() && mesh.has_tex_coords() && mesh.has_tangents());
        for (p, n) in mesh.vertices().iter().zip(mesh.normals()) {
            assert!((p.length() - 1.0).abs() < 1e-5);
            assert_eq!(p, n);
        }
        let max = mesh.num_vertices() as u32;
        assert!(mesh.triangles().iter().flatten().all(|&i| i < max));
        assert_eq!(mesh.bounds().min, Vec3f::splat(-1.0));
        assert_eq!(mesh.bounds().max, Vec3f::splat(1.0));
        assert_eq!(mesh.bounds().size, Vec3f::splat(2.0));
        assert_eq!(mesh.bounds().mid, Vec3f::zero());
    }

    #[test]
    fn sphere_rejects_too_coarse_tessellation() {
        let mut mesh = MeshData::new();
        let err = mesh
            .generate_sphere(SphereParams {
                longitude_divisions: 3,
                latitude_divisions: 2,
            })
            .unwrap_err();
        assert!(matches!(err, MeshError::InvalidTessellation { longitude: 3, .. }));
    }

    #[test]
    fn sphere_rejects_more_vertices_than_indices_can_address() {
        let mut mesh = MeshData::new();
        mesh.generate_flat_patch();
        for (longitude, latitude) in [(u32::MAX, 2), (65_536, 65_536), (4, u32::MAX)] {
            let err = mesh
                .generate_sphere(SphereParams {
                    longitude_divisions: longitude,
                    latitude_divisions: latitude,
                })
                .unwrap_err();
            assert!(matches!(
                err,
                MeshError::InvalidTessellation { longitude: l, latitude: t } if l == longitude && t == latitude
            ));
        }
        // rejected before anything was cleared
        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_triangles(), 2);
    }

    #[test]
    fn generating_replaces_previous_content() {
        let mut mesh = MeshData::new();
        mesh.generate_sphere(SphereParams::default()).unwrap();
        mesh.generate_flat_patch();
        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_triangles(), 2);
        assert!(mesh.tangents().is_empty());
    }

    #[test]
    fn flat_patch_faces_up() {
        let mut mesh = MeshData::new();
        mesh.generate_flat_patch();
        for n in mesh.normals() {
            assert!((*n - Vec3f::new(0.0, 1.0, 0.0)).length() < 1e-6);
        }
        assert_eq!(mesh.bounds().size, Vec3f::new(10.0, 0.0, 10.0));
        assert_eq!(mesh.bounds().mid, Vec3f::new(5.0, 0.0, 5.0));
    }
}
