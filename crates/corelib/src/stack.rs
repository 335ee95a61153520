use glam::Vec3;

use crate::{Mat3, Mat4};

/// Push/pop stack of 4x4 transforms. Never empty: the bottom entry starts as identity.
#[derive(Clone, Debug)]
pub struct MatrixStack {
    stack: Vec<Mat4>,
}

impl MatrixStack {
    pub fn new() -> Self {
        Self {
            stack: vec![Mat4::IDENTITY],
        }
    }

    /// Duplicates the top entry.
    pub fn push(&mut self) {
        let top = *self.top();
        self.stack.push(top);
    }

    /// Discards the top entry; popping the last entry resets it to identity instead.
    pub fn pop(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        } else {
            self.load_identity();
        }
    }

    pub fn load_identity(&mut self) {
        *self.top_mut() = Mat4::IDENTITY;
    }

    #[inline]
    pub fn top(&self) -> &Mat4 {
        // invariant: never empty
        &self.stack[self.stack.len() - 1]
    }

    #[inline]
    pub fn top_mut(&mut self) -> &mut Mat4 {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Post-multiplies the top entry by `m`.
    pub fn multiply(&mut self, m: Mat4) {
        let top = self.top_mut();
        *top *= m;
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.multiply(Mat4::from_translation(offset));
    }

    pub fn scale(&mut self, factors: Vec3) {
        self.multiply(Mat4::from_scale(factors));
    }

    /// Inverse-transpose of the top entry's upper 3x3; identity when singular.
    pub fn normal_matrix(&self) -> Mat3 {
        let m = Mat3::from_mat4(*self.top());
        if m.determinant().abs() <= f32::EPSILON {
            return Mat3::IDENTITY;
        }
        m.inverse().transpose()
    }
}

impl Default for MatrixStack {
    fn default() -> Self {
        Self::new()
    }
}
