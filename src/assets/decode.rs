use anyhow::Context;

use crate::assets::PreparedImage;
use crate::foundation::core::premul_channel;
use crate::foundation::error::{OgError, OgResult};

/// Decode an encoded raster (JPEG, PNG, WebP, ...) into a premultiplied [`PreparedImage`].
pub fn decode_image(bytes: &[u8]) -> OgResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes)
        .context("decode image from memory")
        .map_err(OgError::asset_from)?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(OgError::asset("decoded image has zero size"));
    }

    let pixels = rgba
        .pixels()
        .map(|p| {
            let [r, g, b, a] = p.0;
            vello_cpu::peniko::color::PremulRgba8 {
                r: premul_channel(r, a),
                g: premul_channel(g, a),
                b: premul_channel(b, a),
                a,
            }
        })
        .collect();
    PreparedImage::from_pixels(width, height, pixels)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
