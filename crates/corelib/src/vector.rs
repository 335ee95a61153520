//! Three-component vector for positions, normals, colours and tangents.
//!
//! Storage is a plain `#[repr(C)]` struct so vertex arrays cast to bytes;
//! the arithmetic itself is glam's.

use std::fmt;
use std::ops::{
    Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign,
};

/// Types with a right-handed cross product, for the free [`cross`].
pub trait Cross: Copy {
    fn cross(self, other: Self) -> Self;
}

/// Right-handed cross product: `cross(a, b) == -cross(b, a)`.
#[inline]
pub fn cross<V: Cross>(a: V, b: V) -> V {
    a.cross(b)
}

macro_rules! vec3_type {
    ($(#[$meta:meta])* $name:ident, $t:ty, $glam:ty, $mat:ty) => {
        $(#[$meta])*
        #[repr(C)]
        #[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
        pub struct $name {
            pub x: $t,
            pub y: $t,
            pub z: $t,
        }

        impl $name {
            /// Lengths below this count as zero when normalizing.
            pub const EPSILON: $t = 1e-5;

            #[inline]
            pub const fn new(x: $t, y: $t, z: $t) -> Self {
                Self { x, y, z }
            }

            #[inline]
            pub const fn splat(v: $t) -> Self {
                Self { x: v, y: v, z: v }
            }

            #[inline]
            pub const fn zero() -> Self {
                Self::splat(0.0)
            }

            #[inline]
            pub fn to_glam(self) -> $glam {
                <$glam>::new(self.x, self.y, self.z)
            }

            #[inline]
            pub fn from_glam(v: $glam) -> Self {
                Self::new(v.x, v.y, v.z)
            }

            #[inline]
            pub fn dot(self, other: Self) -> $t {
                self.to_glam().dot(other.to_glam())
            }

            /// Right-handed cross product, see also [`cross`].
            #[inline]
            pub fn cross(self, other: Self) -> Self {
                Self::from_glam(self.to_glam().cross(other.to_glam()))
            }

            #[inline]
            pub fn length(self) -> $t {
                self.to_glam().length()
            }

            /// Squared length; cheaper than `length` for comparisons.
            #[inline]
            pub fn length_squared(self) -> $t {
                self.to_glam().length_squared()
            }

            #[inline]
            pub fn distance(self, other: Self) -> $t {
                self.to_glam().distance(other.to_glam())
            }

            /// Scales to unit length in place.
            ///
            /// Returns `false` and leaves the vector untouched when its length
            /// is below [`Self::EPSILON`].
            pub fn normalize(&mut self) -> bool {
                let len = self.length();
                if len.abs() < Self::EPSILON {
                    return false;
                }
                *self = Self::from_glam(self.to_glam() / len);
                true
            }

            /// Unit-length copy, or `self` unchanged when the length is below [`Self::EPSILON`].
            pub fn normalized(mut self) -> Self {
                self.normalize();
                self
            }

            /// Rotates around the x axis by `degrees`.
            pub fn rotate_x(&mut self, degrees: $t) {
                self.rotate(<$mat>::from_rotation_x(degrees.to_radians()));
            }

            /// Rotates around the y axis by `degrees`.
            pub fn rotate_y(&mut self, degrees: $t) {
                self.rotate(<$mat>::from_rotation_y(degrees.to_radians()));
            }

            /// Rotates around the z axis by `degrees`.
            pub fn rotate_z(&mut self, degrees: $t) {
                self.rotate(<$mat>::from_rotation_z(degrees.to_radians()));
            }

            #[inline]
            fn rotate(&mut self, m: $mat) {
                *self = Self::from_glam(m * self.to_glam());
            }

            /// Component-wise minimum.
            #[inline]
            pub fn min(self, other: Self) -> Self {
                Self::from_glam(self.to_glam().min(other.to_glam()))
            }

            /// Component-wise maximum.
            #[inline]
            pub fn max(self, other: Self) -> Self {
                Self::from_glam(self.to_glam().max(other.to_glam()))
            }

            /// Largest of the three components.
            #[inline]
            pub fn max_element(self) -> $t {
                self.to_glam().max_element()
            }

            #[inline]
            pub fn to_array(self) -> [$t; 3] {
                [self.x, self.y, self.z]
            }
        }

        impl Cross for $name {
            #[inline]
            fn cross(self, other: Self) -> Self {
                $name::cross(self, other)
            }
        }

        impl Add for $name {
            type Output = Self;
            #[inline]
            fn add(self, rhs: Self) -> Self {
                Self::from_glam(self.to_glam() + rhs.to_glam())
            }
        }

        impl AddAssign for $name {
            #[inline]
            fn add_assign(&mut self, rhs: Self) {
                *self = *self + rhs;
            }
        }

        impl Sub for $name {
            type Output = Self;
            #[inline]
            fn sub(self, rhs: Self) -> Self {
                Self::from_glam(self.to_glam() - rhs.to_glam())
            }
        }

        impl SubAssign for $name {
            #[inline]
            fn sub_assign(&mut self, rhs: Self) {
                *self = *self - rhs;
            }
        }

        impl Neg for $name {
            type Output = Self;
            #[inline]
            fn neg(self) -> Self {
                Self::from_glam(-self.to_glam())
            }
        }

        /// `a * b` between two vectors is the dot product.
        impl Mul for $name {
            type Output = $t;
            #[inline]
            fn mul(self, rhs: Self) -> $t {
                self.dot(rhs)
            }
        }

        impl Mul<$t> for $name {
            type Output = Self;
            #[inline]
            fn mul(self, rhs: $t) -> Self {
                Self::from_glam(self.to_glam() * rhs)
            }
        }

        impl Mul<$name> for $t {
            type Output = $name;
            #[inline]
            fn mul(self, rhs: $name) -> $name {
                rhs * self
            }
        }

        impl MulAssign<$t> for $name {
            #[inline]
            fn mul_assign(&mut self, rhs: $t) {
                *self = *self * rhs;
            }
        }

        impl Div<$t> for $name {
            type Output = Self;
            #[inline]
            fn div(self, rhs: $t) -> Self {
                Self::from_glam(self.to_glam() / rhs)
            }
        }

        impl DivAssign<$t> for $name {
            #[inline]
            fn div_assign(&mut self, rhs: $t) {
                *self = *self / rhs;
            }
        }

        impl Index<usize> for $name {
            type Output = $t;
            fn index(&self, i: usize) -> &$t {
                match i {
                    0 => &self.x,
                    1 => &self.y,
                    2 => &self.z,
                    _ => panic!("Vec3 index out of range: {i}"),
                }
            }
        }

        impl IndexMut<usize> for $name {
            fn index_mut(&mut self, i: usize) -> &mut $t {
                match i {
                    0 => &mut self.x,
                    1 => &mut self.y,
                    2 => &mut self.z,
                    _ => panic!("Vec3 index out of range: {i}"),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{} {} {}", self.x, self.y, self.z)
            }
        }

        impl From<[$t; 3]> for $name {
            #[inline]
            fn from([x, y, z]: [$t; 3]) -> Self {
                Self { x, y, z }
            }
        }

        impl From<$name> for $glam {
            #[inline]
            fn from(v: $name) -> Self {
                v.to_glam()
            }
        }

        impl From<$glam> for $name {
            #[inline]
            fn from(v: $glam) -> Self {
                Self::from_glam(v)
            }
        }
    };
}

vec3_type!(
    /// Single-precision vector, the layout meshes store and upload.
    Vec3f, f32, glam::Vec3, glam::Mat3
);
vec3_type!(
    /// Double-precision vector for offline computations.
    Vec3d, f64, glam::DVec3, glam::DMat3
);

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3f, b: Vec3f) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn cross_is_anti_commutative() {
        let samples = [
            Vec3f::new(1.0, 0.0, 0.0),
            Vec3f::new(0.0, 2.0, -1.0),
            Vec3f::new(3.5, -1.25, 0.75),
            Vec3f::new(-2.0, 4.0, 8.0),
        ];
        for &a in &samples {
            assert_eq!(cross(a, a), Vec3f::zero());
            for &b in &samples {
                assert_eq!(cross(a, b), -cross(b, a));
            }
        }
    }

    #[test]
    fn cross_follows_right_hand_rule() {
        let x = Vec3f::new(1.0, 0.0, 0.0);
        let y = Vec3f::new(0.0, 1.0, 0.0);
        assert_eq!(cross(x, y), Vec3f::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn dot_operator_yields_scalar() {
        let a = Vec3f::new(1.0, 2.0, 3.0);
        let b = Vec3f::new(4.0, -5.0, 6.0);
        assert_eq!(a * b, 12.0);
        assert_eq!(a.length_squared(), 14.0);
        assert!((Vec3f::zero().distance(Vec3f::new(3.0, 4.0, 0.0)) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn normalize_refuses_near_zero_vectors() {
        let mut tiny = Vec3f::new(1e-7, 0.0, 0.0);
        assert!(!tiny.normalize());
        assert_eq!(tiny, Vec3f::new(1e-7, 0.0, 0.0));
        assert_eq!(tiny.normalized(), tiny);

        let mut v = Vec3f::new(0.0, 3.0, 4.0);
        assert!(v.normalize());
        assert!((v.length() - 1.0).abs() < 1e-6);
        assert!(approx(Vec3f::new(0.0, 3.0, 4.0).normalized(), v));
    }

    #[test]
    fn rotations_use_degrees() {
        let mut v = Vec3f::new(1.0, 0.0, 0.0);
        v.rotate_z(90.0);
        assert!(approx(v, Vec3f::new(0.0, 1.0, 0.0)));

        let mut v = Vec3f::new(0.0, 1.0, 0.0);
        v.rotate_x(90.0);
        assert!(approx(v, Vec3f::new(0.0, 0.0, 1.0)));

        let mut v = Vec3f::new(0.0, 0.0, 1.0);
        v.rotate_y(90.0);
        assert!(approx(v, Vec3f::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn scalar_ops_and_double_precision() {
        let v = Vec3d::new(2.0, 4.0, 6.0);
        assert_eq!(v * 0.5, Vec3d::new(1.0, 2.0, 3.0));
        assert_eq!(0.5_f64 * v, v / 2.0);
        assert_eq!(v.max_element(), 6.0);
        assert_eq!(v[1], 4.0);
    }

    #[test]
    fn vertex_arrays_cast_to_bytes() {
        let points = [Vec3f::new(1.0, 2.0, 3.0), Vec3f::new(4.0, 5.0, 6.0)];
        let bytes: &[u8] = bytemuck::cast_slice(&points);
        assert_eq!(bytes.len(), 2 * 3 * std::mem::size_of::<f32>());
        let floats: &[f32] = bytemuck::cast_slice(&points);
        assert_eq!(floats, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn glam_round_trip_keeps_components() {
        let v = Vec3f::new(0.25, -1.0, 8.0);
        let g: crate::glam::Vec3 = v.into();
        assert_eq!(g, crate::glam::Vec3::new(0.25, -1.0, 8.0));
        assert_eq!(Vec3f::from(g), v);
        assert_eq!(cross(Vec3d::new(1.0, 0.0, 0.0), Vec3d::new(0.0, 1.0, 0.0)), Vec3d::new(0.0, 0.0, 1.0));
    }
}
