//! OpenGL backend for [`GraphicsContext`] built on `glow`.

use glow::HasContext;

use crate::gpu::{BufferTarget, BufferUsage, GraphicsContext, Primitive, TextureWrap};

fn target(t: BufferTarget) -> u32 {
    match t {
        BufferTarget::Array => glow::ARRAY_BUFFER,
        BufferTarget::ElementArray => glow::ELEMENT_ARRAY_BUFFER,
    }
}

fn usage(u: BufferUsage) -> u32 {
    match u {
        BufferUsage::StaticDraw => glow::STATIC_DRAW,
        BufferUsage::DynamicDraw => glow::DYNAMIC_DRAW,
    }
}

fn mode(p: Primitive) -> u32 {
    match p {
        Primitive::Triangles => glow::TRIANGLES,
        Primitive::Lines => glow::LINES,
    }
}

fn compile_shader(gl: &glow::Context, kind: u32, source: &str) -> Result<glow::Shader, String> {
    unsafe {
        let shader = gl.create_shader(kind)?;
        gl.shader_source(shader, source);
        gl.compile_shader(shader);
        if !gl.get_shader_compile_status(shader) {
            let log = gl.get_shader_info_log(shader);
            gl.delete_shader(shader);
            return Err(format!("shader compile error: {log}"));
        }
        Ok(shader)
    }
}

// SAFETY (all methods): the caller owns the context and only calls from the
// thread it is current on; handles passed in were created by this context.
impl GraphicsContext for glow::Context {
    type Buffer = glow::Buffer;
    type VertexArray = glow::VertexArray;
    type Program = glow::Program;
    type Texture = glow::Texture;
    type UniformLocation = glow::UniformLocation;

    fn create_buffer(&self) -> Result<Self::Buffer, String> {
        unsafe { HasContext::create_buffer(self) }
    }

    fn bind_buffer(&self, t: BufferTarget, buffer: Option<Self::Buffer>) {
        unsafe { HasContext::bind_buffer(self, target(t), buffer) }
    }

    fn buffer_data(&self, t: BufferTarget, data: &[u8], u: BufferUsage) {
        unsafe { self.buffer_data_u8_slice(target(t), data, usage(u)) }
    }

    fn buffer_sub_data(&self, t: BufferTarget, offset: usize, data: &[u8]) {
        unsafe { self.buffer_sub_data_u8_slice(target(t), offset as i32, data) }
    }

    fn bound_buffer_size(&self, t: BufferTarget) -> usize {
        let size = unsafe { self.get_buffer_parameter_i32(target(t), glow::BUFFER_SIZE) };
        size.max(0) as usize
    }

    fn delete_buffer(&self, buffer: Self::Buffer) {
        unsafe { HasContext::delete_buffer(self, buffer) }
    }

    fn create_vertex_array(&self) -> Result<Self::VertexArray, String> {
        unsafe { HasContext::create_vertex_array(self) }
    }

    fn bind_vertex_array(&self, vao: Option<Self::VertexArray>) {
        unsafe { HasContext::bind_vertex_array(self, vao) }
    }

    fn delete_vertex_array(&self, vao: Self::VertexArray) {
        unsafe { HasContext::delete_vertex_array(self, vao) }
    }

    fn vertex_attrib_pointer(&self, location: u32, components: i32) {
        unsafe { self.vertex_attrib_pointer_f32(location, components, glow::FLOAT, false, 0, 0) }
    }

    fn enable_vertex_attrib_array(&self, location: u32) {
        unsafe { HasContext::enable_vertex_attrib_array(self, location) }
    }

    fn disable_vertex_attrib_array(&self, location: u32) {
        unsafe { HasContext::disable_vertex_attrib_array(self, location) }
    }

    fn vertex_attrib_3f(&self, location: u32, [x, y, z]: [f32; 3]) {
        unsafe { self.vertex_attrib_3_f32(location, x, y, z) }
    }

    fn draw_elements(&self, p: Primitive, count: usize) {
        unsafe { HasContext::draw_elements(self, mode(p), count as i32, glow::UNSIGNED_INT, 0) }
    }

    fn draw_arrays(&self, p: Primitive, first: usize, count: usize) {
        unsafe { HasContext::draw_arrays(self, mode(p), first as i32, count as i32) }
    }

    fn create_program(&self, vertex_src: &str, fragment_src: &str) -> Result<Self::Program, String> {
        let vs = compile_shader(self, glow::VERTEX_SHADER, vertex_src)?;
        let fs = match compile_shader(self, glow::FRAGMENT_SHADER, fragment_src) {
            Ok(fs) => fs,
            Err(e) => {
                unsafe { self.delete_shader(vs) };
                return Err(e);
            }
        };
        unsafe {
            let program = HasContext::create_program(self)?;
            self.attach_shader(program, vs);
            self.attach_shader(program, fs);
            self.link_program(program);
            self.detach_shader(program, vs);
            self.detach_shader(program, fs);
            self.delete_shader(vs);
            self.delete_shader(fs);
            if !self.get_program_link_status(program) {
                let log = self.get_program_info_log(program);
                HasContext::delete_program(self, program);
                return Err(format!("program link error: {log}"));
            }
            Ok(program)
        }
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe { HasContext::delete_program(self, program) }
    }

    fn use_program(&self, program: Option<Self::Program>) {
        unsafe { HasContext::use_program(self, program) }
    }

    fn uniform_location(&self, program: Self::Program, name: &str) -> Option<Self::UniformLocation> {
        unsafe { self.get_uniform_location(program, name) }
    }

    fn uniform_matrix4(&self, location: Option<&Self::UniformLocation>, value: &[f32; 16]) {
        unsafe { self.uniform_matrix_4_f32_slice(location, false, value) }
    }

    fn uniform_matrix3(&self, location: Option<&Self::UniformLocation>, value: &[f32; 9]) {
        unsafe { self.uniform_matrix_3_f32_slice(location, false, value) }
    }

    fn uniform_3f(&self, location: Option<&Self::UniformLocation>, [x, y, z]: [f32; 3]) {
        unsafe { self.uniform_3_f32(location, x, y, z) }
    }

    fn uniform_1i(&self, location: Option<&Self::UniformLocation>, value: i32) {
        unsafe { self.uniform_1_i32(location, value) }
    }

    fn uniform_1u(&self, location: Option<&Self::UniformLocation>, value: u32) {
        unsafe { self.uniform_1_u32(location, value) }
    }

    fn create_texture_rgba8(
        &self,
        width: u32,
        height: u32,
        pixels: &[u8],
        wrap: TextureWrap,
    ) -> Result<Self::Texture, String> {
        let wrap = match wrap {
            TextureWrap::ClampToEdge => glow::CLAMP_TO_EDGE,
            TextureWrap::Repeat => glow::REPEAT,
        } as i32;
        unsafe {
            let texture = self.create_texture()?;
            self.bind_texture(glow::TEXTURE_2D, Some(texture));
            self.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA8 as i32,
                width as i32,
                height as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(pixels)),
            );
            self.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::LINEAR_MIPMAP_LINEAR as i32);
            self.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
            self.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, wrap);
            self.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, wrap);
            self.generate_mipmap(glow::TEXTURE_2D);
            self.bind_texture(glow::TEXTURE_2D, None);
            Ok(texture)
        }
    }

    fn delete_texture(&self, texture: Self::Texture) {
        unsafe { HasContext::delete_texture(self, texture) }
    }

    fn bind_texture_unit(&self, unit: u32, texture: Option<Self::Texture>) {
        unsafe {
            self.active_texture(glow::TEXTURE0 + unit);
            self.bind_texture(glow::TEXTURE_2D, texture);
        }
    }
}
