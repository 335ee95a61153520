//! Core math: the mesh vector type, bounding boxes and transform stacks.
//! Matrix types come from glam, re-exported here along with the crate itself
//! for callers that need glam's own vector type.

pub use glam::{self, Mat3, Mat4, Vec4, vec3};

pub mod bounds;
pub mod stack;
pub mod vector;

pub use bounds::BoundingBox;
pub use stack::MatrixStack;
pub use vector::{Cross, Vec3d, Vec3f, cross};
