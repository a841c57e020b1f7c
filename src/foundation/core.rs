use crate::foundation::error::{OgError, OgResult};

pub use kurbo::{Point, Rect};

/// Pixel dimensions of a render target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    /// Social-preview card size used by Open Graph consumers.
    pub const CARD: Canvas = Canvas {
        width: 1200,
        height: 630,
    };

    /// Dimensions as `u16`, the surface size type of the CPU rasterizer.
    pub fn to_u16(self) -> OgResult<(u16, u16)> {
        let w: u16 = self
            .width
            .try_into()
            .map_err(|_| OgError::validation("canvas width exceeds u16"))?;
        let h: u16 = self
            .height
            .try_into()
            .map_err(|_| OgError::validation("canvas height exceeds u16"))?;
        if w == 0 || h == 0 {
            return Err(OgError::validation("canvas dimensions must be > 0"));
        }
        Ok((w, h))
    }

    /// Length of a tightly packed RGBA8 buffer of this size.
    pub fn byte_len(self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

/// Straight-alpha RGBA8 color, serialized as `[r, g, b, a]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(from = "[u8; 4]", into = "[u8; 4]")]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Color with alpha given as a CSS-style fraction in `0.0..=1.0`.
    pub fn with_alpha_f32(r: u8, g: u8, b: u8, alpha: f32) -> Self {
        let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::new(r, g, b, a)
    }
}

impl From<[u8; 4]> for Rgba8 {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
}

impl From<Rgba8> for [u8; 4] {
    fn from(c: Rgba8) -> Self {
        [c.r, c.g, c.b, c.a]
    }
}

/// `c * a / 255`, rounded; premultiplies one straight-alpha channel.
pub(crate) fn premul_channel(c: u8, a: u8) -> u8 {
    let c = u16::from(c);
    let a = u16::from(a);
    (((c * a) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
