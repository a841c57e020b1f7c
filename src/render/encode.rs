use std::io::Cursor;

use anyhow::Context;

use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::{OgError, OgResult};
use crate::render::compose::CardFrame;

/// Flatten `frame` over the opaque `matte` and encode it as an RGB PNG.
pub fn encode_png(frame: &CardFrame, matte: Rgba8) -> OgResult<Vec<u8>> {
    let canvas = Canvas {
        width: frame.width,
        height: frame.height,
    };
    if frame.data.len() != canvas.byte_len() {
        return Err(OgError::render("card frame byte length mismatch"));
    }

    let img = flatten_over_matte(frame, matte)?;
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode card as png")?;
    Ok(buf)
}

/// Premultiplied source-over onto `matte`; the alpha channel is dropped.
fn flatten_over_matte(frame: &CardFrame, matte: Rgba8) -> OgResult<image::RgbImage> {
    let matte = [matte.r, matte.g, matte.b].map(u32::from);
    let mut rgb = Vec::with_capacity(frame.data.len() / 4 * 3);
    for px in frame.data.chunks_exact(4) {
        let uncovered = 255 - u32::from(px[3]);
        for (c, m) in px[..3].iter().zip(matte) {
            let v = u32::from(*c) + (m * uncovered + 127) / 255;
            rgb.push(v.min(255) as u8);
        }
    }
    image::RgbImage::from_raw(frame.width, frame.height, rgb)
        .ok_or_else(|| OgError::render("card frame does not fit its dimensions"))
}

#[cfg(test)]
#[path = "../../tests/unit/render/encode.rs"]
mod tests;
