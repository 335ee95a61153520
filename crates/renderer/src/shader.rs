//! Fixed vertex attribute locations and shader program loading.

use std::path::Path;

use crate::error::RenderError;
use crate::gpu::GraphicsContext;

pub const POSITION_LOCATION: u32 = 0;
pub const NORMAL_LOCATION: u32 = 1;
pub const COLOR_LOCATION: u32 = 2;
pub const TEXCOORD_LOCATION: u32 = 3;
pub const TANGENT_LOCATION: u32 = 4;

/// Compile and link a program from in-memory GLSL sources.
pub fn build_program<G: GraphicsContext>(
    gl: &G,
    vertex_src: &str,
    fragment_src: &str,
) -> Result<G::Program, RenderError> {
    gl.create_program(vertex_src, fragment_src)
        .map_err(RenderError::ShaderBuild)
}

/// Read a vertex and fragment shader from disk and link them.
pub fn load_program<G: GraphicsContext>(
    gl: &G,
    vertex_path: impl AsRef<Path>,
    fragment_path: impl AsRef<Path>,
) -> Result<G::Program, RenderError> {
    let read = |path: &Path| {
        std::fs::read_to_string(path).map_err(|source| RenderError::ShaderSource {
            path: path.to_path_buf(),
            source,
        })
    };
    let (vertex_path, fragment_path) = (vertex_path.as_ref(), fragment_path.as_ref());
    let vertex_src = read(vertex_path)?;
    let fragment_src = read(fragment_path)?;
    let program = build_program(gl, &vertex_src, &fragment_src).inspect_err(|e| {
        log::error!("Linking {:?} + {:?} failed: {e}", vertex_path, fragment_path);
    })?;
    log::info!("Built shader program from {:?} and {:?}", vertex_path, fragment_path);
    Ok(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingContext;

    #[test]
    fn missing_shader_file_is_reported() {
        let gl = RecordingContext::new();
        let err = load_program(&gl, "/nonexistent/a.vert", "/nonexistent/a.frag").unwrap_err();
        assert!(matches!(err, RenderError::ShaderSource { .. }));
    }

    #[test]
    fn compile_failure_is_surfaced() {
        let gl = RecordingContext::new();
        assert!(build_program(&gl, "void main() {}", "void main() {}").is_ok());
        let err = build_program(&gl, "", "void main() {}").unwrap_err();
        assert!(matches!(err, RenderError::ShaderBuild(_)));
    }
}
