//! Transform stacks, active program bookkeeping and light propagation.

use std::collections::HashMap;
use std::rc::Rc;

use corelib::{Mat3, Mat4, MatrixStack, Vec3f};

use crate::gpu::GraphicsContext;

/// Uniform locations every mesh program is expected to declare.
///
/// Missing uniforms resolve to `None`; uploads to them are ignored by GL.
pub struct UniformSet<G: GraphicsContext> {
    pub model_view: Option<G::UniformLocation>,
    pub projection: Option<G::UniformLocation>,
    pub normal_matrix: Option<G::UniformLocation>,
    pub light_position: Option<G::UniformLocation>,
    pub camera_position: Option<G::UniformLocation>,
    pub texture: Option<G::UniformLocation>,
    pub normal_map: Option<G::UniformLocation>,
    pub use_texture: Option<G::UniformLocation>,
}

impl<G: GraphicsContext> UniformSet<G> {
    pub fn resolve(gl: &G, program: G::Program) -> Self {
        Self {
            model_view: gl.uniform_location(program, "modelView"),
            projection: gl.uniform_location(program, "projection"),
            normal_matrix: gl.uniform_location(program, "normalMatrix"),
            light_position: gl.uniform_location(program, "lightPosition"),
            camera_position: gl.uniform_location(program, "cameraPosition"),
            texture: gl.uniform_location(program, "diffuseTexture"),
            normal_map: gl.uniform_location(program, "normalMap"),
            use_texture: gl.uniform_location(program, "useTexture"),
        }
    }
}

/// Per-frame drawing context passed to every draw call.
///
/// Uniform locations are looked up once per program, the first time it
/// becomes active, and reused afterwards.
pub struct RenderState<G: GraphicsContext> {
    gl: Rc<G>,
    model_view: MatrixStack,
    projection: MatrixStack,
    light_pos: Vec3f,
    active_program: Option<G::Program>,
    standard_program: Option<G::Program>,
    uniforms: HashMap<G::Program, UniformSet<G>>,
    named: HashMap<(G::Program, String), Option<G::UniformLocation>>,
}

impl<G: GraphicsContext> RenderState<G> {
    pub fn new(gl: Rc<G>) -> Self {
        Self {
            gl,
            model_view: MatrixStack::new(),
            projection: MatrixStack::new(),
            light_pos: Vec3f::zero(),
            active_program: None,
            standard_program: None,
            uniforms: HashMap::new(),
            named: HashMap::new(),
        }
    }

    pub fn gl(&self) -> &Rc<G> {
        &self.gl
    }

    // === matrices ===

    pub fn model_view(&self) -> &MatrixStack {
        &self.model_view
    }

    pub fn model_view_mut(&mut self) -> &mut MatrixStack {
        &mut self.model_view
    }

    pub fn projection(&self) -> &MatrixStack {
        &self.projection
    }

    pub fn projection_mut(&mut self) -> &mut MatrixStack {
        &mut self.projection
    }

    pub fn push_model_view(&mut self) {
        self.model_view.push();
    }

    pub fn pop_model_view(&mut self) {
        self.model_view.pop();
    }

    pub fn push_projection(&mut self) {
        self.projection.push();
    }

    pub fn pop_projection(&mut self) {
        self.projection.pop();
    }

    pub fn load_identity_model_view(&mut self) {
        self.model_view.load_identity();
    }

    pub fn load_identity_projection(&mut self) {
        self.projection.load_identity();
    }

    pub fn current_model_view(&self) -> &Mat4 {
        self.model_view.top()
    }

    pub fn current_projection(&self) -> &Mat4 {
        self.projection.top()
    }

    /// Inverse transpose of the upper 3x3 of the current model-view matrix.
    pub fn normal_matrix(&self) -> Mat3 {
        self.model_view.normal_matrix()
    }

    // === programs ===

    pub fn current_program(&self) -> Option<G::Program> {
        self.active_program
    }

    pub fn standard_program(&self) -> Option<G::Program> {
        self.standard_program
    }

    /// Makes `program` active, resolving its uniforms on first use.
    pub fn set_current_program(&mut self, program: Option<G::Program>) {
        self.gl.use_program(program);
        self.active_program = program;
        if let Some(program) = program {
            let gl = &self.gl;
            self.uniforms
                .entry(program)
                .or_insert_with(|| UniformSet::resolve(gl.as_ref(), program));
        }
    }

    /// Registers the program used for debug geometry and makes it active.
    pub fn set_standard_program(&mut self, program: G::Program) {
        self.standard_program = Some(program);
        self.set_current_program(Some(program));
    }

    pub fn switch_to_standard_program(&mut self) {
        self.set_current_program(self.standard_program);
    }

    /// Forgets cached locations for `program`, e.g. after it was deleted.
    pub fn forget_program(&mut self, program: G::Program) {
        self.uniforms.remove(&program);
        self.named.retain(|(p, _), _| *p != program);
        if self.standard_program == Some(program) {
            self.standard_program = None;
        }
        if self.active_program == Some(program) {
            self.active_program = None;
        }
    }

    /// Uniform set of the active program.
    pub fn uniforms(&self) -> Option<&UniformSet<G>> {
        self.active_program.and_then(|p| self.uniforms.get(&p))
    }

    pub fn model_view_uniform(&self) -> Option<&G::UniformLocation> {
        self.uniforms().and_then(|u| u.model_view.as_ref())
    }

    pub fn projection_uniform(&self) -> Option<&G::UniformLocation> {
        self.uniforms().and_then(|u| u.projection.as_ref())
    }

    pub fn normal_matrix_uniform(&self) -> Option<&G::UniformLocation> {
        self.uniforms().and_then(|u| u.normal_matrix.as_ref())
    }

    pub fn light_position_uniform(&self) -> Option<&G::UniformLocation> {
        self.uniforms().and_then(|u| u.light_position.as_ref())
    }

    pub fn camera_position_uniform(&self) -> Option<&G::UniformLocation> {
        self.uniforms().and_then(|u| u.camera_position.as_ref())
    }

    pub fn texture_uniform(&self) -> Option<&G::UniformLocation> {
        self.uniforms().and_then(|u| u.texture.as_ref())
    }

    pub fn normal_map_uniform(&self) -> Option<&G::UniformLocation> {
        self.uniforms().and_then(|u| u.normal_map.as_ref())
    }

    pub fn use_texture_uniform(&self) -> Option<&G::UniformLocation> {
        self.uniforms().and_then(|u| u.use_texture.as_ref())
    }

    /// Location of any other uniform of the active program, cached by name.
    pub fn uniform_location(&mut self, name: &str) -> Option<G::UniformLocation> {
        let program = self.active_program?;
        let key = (program, name.to_string());
        if let Some(location) = self.named.get(&key) {
            return location.clone();
        }
        let location = self.gl.uniform_location(program, name);
        self.named.insert(key, location.clone());
        location
    }

    // === uploads ===

    pub fn light_pos(&self) -> Vec3f {
        self.light_pos
    }

    pub fn set_light_pos(&mut self, pos: Vec3f) {
        self.light_pos = pos;
    }

    /// Uploads the light position transformed into eye space by the current model-view.
    pub fn set_light_uniform(&self) {
        let eye = self.model_view.top().project_point3(self.light_pos.into());
        self.gl
            .uniform_3f(self.light_position_uniform(), eye.to_array());
    }

    pub fn set_camera_uniform(&self, camera: Vec3f) {
        self.gl
            .uniform_3f(self.camera_position_uniform(), camera.to_array());
    }

    pub fn upload_projection(&self) {
        self.gl.uniform_matrix4(
            self.projection_uniform(),
            &self.projection.top().to_cols_array(),
        );
    }

    /// Uploads the current model-view and the normal matrix derived from it.
    pub fn upload_model_view(&self) {
        self.gl.uniform_matrix4(
            self.model_view_uniform(),
            &self.model_view.top().to_cols_array(),
        );
        self.gl.uniform_matrix3(
            self.normal_matrix_uniform(),
            &self.normal_matrix().to_cols_array(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, RecordingContext, Uniform};
    use corelib::vec3;

    fn state() -> (Rc<RecordingContext>, RenderState<RecordingContext>) {
        let gl = Rc::new(RecordingContext::new());
        let state = RenderState::new(gl.clone());
        (gl, state)
    }

    fn lookups(gl: &RecordingContext) -> usize {
        gl.count(|c| matches!(c, Call::UniformLocation { .. }))
    }

    #[test]
    fn uniforms_are_resolved_once_per_program() {
        let (gl, mut state) = state();
        state.set_standard_program(1);
        assert_eq!(lookups(&gl), 8);
        assert_eq!(state.model_view_uniform().map(String::as_str), Some("modelView"));

        state.set_current_program(Some(2));
        assert_eq!(lookups(&gl), 16);
        assert_eq!(state.current_program(), Some(2));

        state.switch_to_standard_program();
        state.set_current_program(Some(2));
        state.switch_to_standard_program();
        assert_eq!(lookups(&gl), 16);
        assert_eq!(state.current_program(), Some(1));
        assert_eq!(gl.calls().last(), Some(&Call::UseProgram(Some(1))));
    }

    #[test]
    fn no_program_means_no_uniforms() {
        let (_gl, mut state) = state();
        assert!(state.uniforms().is_none());
        assert!(state.model_view_uniform().is_none());
        assert!(state.uniform_location("useDiffuse").is_none());
    }

    #[test]
    fn named_uniforms_are_cached() {
        let (gl, mut state) = state();
        state.set_current_program(Some(7));
        let before = lookups(&gl);
        assert_eq!(state.uniform_location("useDiffuse").as_deref(), Some("useDiffuse"));
        assert_eq!(state.uniform_location("useDiffuse").as_deref(), Some("useDiffuse"));
        assert_eq!(lookups(&gl), before + 1);

        state.forget_program(7);
        assert!(state.current_program().is_none());
    }

    #[test]
    fn stacks_never_run_empty() {
        let (_gl, mut state) = state();
        state.model_view_mut().translate(vec3(1.0, 0.0, 0.0));
        state.push_model_view();
        state.model_view_mut().scale(vec3(2.0, 2.0, 2.0));
        state.pop_model_view();
        assert_eq!(*state.current_model_view(), Mat4::from_translation(vec3(1.0, 0.0, 0.0)));

        state.pop_model_view();
        state.pop_model_view();
        assert_eq!(*state.current_model_view(), Mat4::IDENTITY);
        assert_eq!(state.model_view().depth(), 1);

        state.push_projection();
        state.load_identity_projection();
        state.pop_projection();
        assert_eq!(*state.current_projection(), Mat4::IDENTITY);
    }

    #[test]
    fn light_is_transformed_into_eye_space() {
        let (gl, mut state) = state();
        state.set_current_program(Some(3));
        state.set_light_pos(Vec3f::new(1.0, 1.0, 1.0));
        state.model_view_mut().translate(vec3(0.0, 0.0, -5.0));
        state.set_light_uniform();
        assert_eq!(
            gl.calls().last(),
            Some(&Call::Uniform {
                name: Some("lightPosition".into()),
                value: Uniform::Vec3([1.0, 1.0, -4.0]),
            })
        );
    }

    #[test]
    fn model_view_upload_includes_normal_matrix() {
        let (gl, mut state) = state();
        state.set_current_program(Some(3));
        state.upload_model_view();
        state.upload_projection();
        let names: Vec<_> = gl
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Uniform { name, .. } => name,
                _ => None,
            })
            .collect();
        assert_eq!(names, ["modelView", "normalMatrix", "projection"]);
    }
}
