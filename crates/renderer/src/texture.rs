//! Texture upload from decoded image data.

use std::path::Path;

use anyhow::Context;
use asset::{TextureData, TextureFormat};

use crate::error::RenderError;
use crate::gpu::{GraphicsContext, TextureWrap};

/// Upload `data` as a mipmapped, linearly filtered 2D texture.
pub fn upload_texture<G: GraphicsContext>(
    gl: &G,
    data: &TextureData,
    wrap: TextureWrap,
) -> Result<G::Texture, RenderError> {
    if !data.is_valid() {
        return Err(RenderError::Texture(format!(
            "{}x{} image with {} bytes",
            data.width,
            data.height,
            data.data.len()
        )));
    }
    match data.format {
        TextureFormat::Rgba8 => gl
            .create_texture_rgba8(data.width, data.height, &data.data, wrap)
            .map_err(RenderError::Texture),
    }
}

/// Decode an image file and upload it.
pub fn load_texture<G: GraphicsContext>(
    gl: &G,
    path: impl AsRef<Path>,
    wrap: TextureWrap,
) -> anyhow::Result<G::Texture> {
    let path = path.as_ref();
    let data = TextureData::load(path)?;
    let texture = upload_texture(gl, &data, wrap)
        .with_context(|| format!("Failed to upload texture {:?}", path))?;
    Ok(texture)
}
