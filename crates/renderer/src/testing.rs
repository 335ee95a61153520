//! Recording [`GraphicsContext`] used by the unit tests.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use crate::gpu::{BufferTarget, BufferUsage, GraphicsContext, Primitive, TextureWrap};

#[derive(Clone, Debug, PartialEq)]
pub enum Uniform {
    Mat4([f32; 16]),
    Mat3([f32; 9]),
    Vec3([f32; 3]),
    Int(i32),
    Uint(u32),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    CreateBuffer(u32),
    BindBuffer { target: BufferTarget, buffer: Option<u32> },
    BufferData { target: BufferTarget, len: usize },
    BufferSubData { target: BufferTarget, offset: usize, len: usize },
    DeleteBuffer(u32),
    CreateVertexArray(u32),
    BindVertexArray(Option<u32>),
    DeleteVertexArray(u32),
    AttribPointer { location: u32, components: i32 },
    EnableAttrib(u32),
    DisableAttrib(u32),
    Attrib3f { location: u32, value: [f32; 3] },
    DrawElements { mode: Primitive, count: usize },
    DrawArrays { mode: Primitive, first: usize, count: usize },
    CreateProgram(u32),
    DeleteProgram(u32),
    UseProgram(Option<u32>),
    UniformLocation { program: u32, name: String },
    Uniform { name: Option<String>, value: Uniform },
    CreateTexture { id: u32, width: u32, height: u32 },
    DeleteTexture(u32),
    BindTexture { unit: u32, texture: Option<u32> },
}

/// Hands out fresh ids, records every call and panics on a double delete.
#[derive(Default)]
pub struct RecordingContext {
    next_id: Cell<u32>,
    calls: RefCell<Vec<Call>>,
    live: RefCell<HashSet<u32>>,
    sizes: RefCell<HashMap<u32, usize>>,
    bound: RefCell<HashMap<BufferTarget, u32>>,
    short_buffers: Cell<bool>,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// When set, every buffer reports one byte less than was uploaded.
    pub fn under_report_sizes(&self, on: bool) {
        self.short_buffers.set(on);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Number of buffers, vertex arrays, programs and textures not yet deleted.
    pub fn live_handles(&self) -> usize {
        self.live.borrow().len()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn fresh(&self) -> u32 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        self.live.borrow_mut().insert(id);
        id
    }

    fn release(&self, id: u32, kind: &str) {
        assert!(self.live.borrow_mut().remove(&id), "{kind} {id} deleted twice or never created");
    }
}

impl GraphicsContext for RecordingContext {
    type Buffer = u32;
    type VertexArray = u32;
    type Program = u32;
    type Texture = u32;
    type UniformLocation = String;

    fn create_buffer(&self) -> Result<u32, String> {
        let id = self.fresh();
        self.record(Call::CreateBuffer(id));
        Ok(id)
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<u32>) {
        match buffer {
            Some(id) => self.bound.borrow_mut().insert(target, id),
            None => self.bound.borrow_mut().remove(&target),
        };
        self.record(Call::BindBuffer { target, buffer });
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8], _usage: BufferUsage) {
        if let Some(&id) = self.bound.borrow().get(&target) {
            self.sizes.borrow_mut().insert(id, data.len());
        }
        self.record(Call::BufferData { target, len: data.len() });
    }

    fn buffer_sub_data(&self, target: BufferTarget, offset: usize, data: &[u8]) {
        self.record(Call::BufferSubData { target, offset, len: data.len() });
    }

    fn bound_buffer_size(&self, target: BufferTarget) -> usize {
        let size = self
            .bound
            .borrow()
            .get(&target)
            .and_then(|id| self.sizes.borrow().get(id).copied())
            .unwrap_or(0);
        if self.short_buffers.get() { size.saturating_sub(1) } else { size }
    }

    fn delete_buffer(&self, buffer: u32) {
        self.release(buffer, "buffer");
        self.record(Call::DeleteBuffer(buffer));
    }

    fn create_vertex_array(&self) -> Result<u32, String> {
        let id = self.fresh();
        self.record(Call::CreateVertexArray(id));
        Ok(id)
    }

    fn bind_vertex_array(&self, vao: Option<u32>) {
        self.record(Call::BindVertexArray(vao));
    }

    fn delete_vertex_array(&self, vao: u32) {
        self.release(vao, "vertex array");
        self.record(Call::DeleteVertexArray(vao));
    }

    fn vertex_attrib_pointer(&self, location: u32, components: i32) {
        self.record(Call::AttribPointer { location, components });
    }

    fn enable_vertex_attrib_array(&self, location: u32) {
        self.record(Call::EnableAttrib(location));
    }

    fn disable_vertex_attrib_array(&self, location: u32) {
        self.record(Call::DisableAttrib(location));
    }

    fn vertex_attrib_3f(&self, location: u32, value: [f32; 3]) {
        self.record(Call::Attrib3f { location, value });
    }

    fn draw_elements(&self, mode: Primitive, count: usize) {
        self.record(Call::DrawElements { mode, count });
    }

    fn draw_arrays(&self, mode: Primitive, first: usize, count: usize) {
        self.record(Call::DrawArrays { mode, first, count });
    }

    fn create_program(&self, vertex_src: &str, fragment_src: &str) -> Result<u32, String> {
        if vertex_src.is_empty() || fragment_src.is_empty() {
            return Err("empty shader source".to_string());
        }
        let id = self.fresh();
        self.record(Call::CreateProgram(id));
        Ok(id)
    }

    fn delete_program(&self, program: u32) {
        self.release(program, "program");
        self.record(Call::DeleteProgram(program));
    }

    fn use_program(&self, program: Option<u32>) {
        self.record(Call::UseProgram(program));
    }

    fn uniform_location(&self, program: u32, name: &str) -> Option<String> {
        self.record(Call::UniformLocation { program, name: name.to_string() });
        Some(name.to_string())
    }

    fn uniform_matrix4(&self, location: Option<&String>, value: &[f32; 16]) {
        self.record(Call::Uniform { name: location.cloned(), value: Uniform::Mat4(*value) });
    }

    fn uniform_matrix3(&self, location: Option<&String>, value: &[f32; 9]) {
        self.record(Call::Uniform { name: location.cloned(), value: Uniform::Mat3(*value) });
    }

    fn uniform_3f(&self, location: Option<&String>, value: [f32; 3]) {
        self.record(Call::Uniform { name: location.cloned(), value: Uniform::Vec3(value) });
    }

    fn uniform_1i(&self, location: Option<&String>, value: i32) {
        self.record(Call::Uniform { name: location.cloned(), value: Uniform::Int(value) });
    }

    fn uniform_1u(&self, location: Option<&String>, value: u32) {
        self.record(Call::Uniform { name: location.cloned(), value: Uniform::Uint(value) });
    }

    fn create_texture_rgba8(
        &self,
        width: u32,
        height: u32,
        pixels: &[u8],
        _wrap: TextureWrap,
    ) -> Result<u32, String> {
        if pixels.len() != (width * height * 4) as usize {
            return Err("pixel buffer size mismatch".to_string());
        }
        let id = self.fresh();
        self.record(Call::CreateTexture { id, width, height });
        Ok(id)
    }

    fn delete_texture(&self, texture: u32) {
        self.release(texture, "texture");
        self.record(Call::DeleteTexture(texture));
    }

    fn bind_texture_unit(&self, unit: u32, texture: Option<u32>) {
        self.record(Call::BindTexture { unit, texture });
    }
}
