//! Shared, read-only resources: the background raster and the font files.
//!
//! Everything here is loaded once before any card is rendered and never mutated afterwards,
//! so [`SharedAssets`] can be cloned into every worker.

pub mod decode;

use std::{path::Path, sync::Arc};

use anyhow::Context;

use crate::foundation::error::{OgError, OgResult};

/// A raster ready to be painted: premultiplied pixels in a `vello_cpu` pixmap, built once and
/// shared by every card drawn over it.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    pixmap: Arc<vello_cpu::Pixmap>,
}

impl PreparedImage {
    /// Wrap premultiplied RGBA8 bytes, row-major and tightly packed.
    pub fn from_premul_rgba8(width: u32, height: u32, rgba8_premul: &[u8]) -> OgResult<Self> {
        let expected = width as usize * height as usize * 4;
        if rgba8_premul.len() != expected {
            return Err(OgError::asset(format!(
                "{width}x{height} image needs {expected} bytes, got {}",
                rgba8_premul.len()
            )));
        }
        let pixels = rgba8_premul
            .chunks_exact(4)
            .map(|px| vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            })
            .collect();
        Self::from_pixels(width, height, pixels)
    }

    pub(crate) fn from_pixels(
        width: u32,
        height: u32,
        pixels: Vec<vello_cpu::peniko::color::PremulRgba8>,
    ) -> OgResult<Self> {
        let (Ok(w), Ok(h)) = (u16::try_from(width), u16::try_from(height)) else {
            return Err(OgError::asset(format!(
                "{width}x{height} image exceeds 65535 pixels per side"
            )));
        };
        if w == 0 || h == 0 {
            return Err(OgError::asset("image has zero size"));
        }
        let translucent = pixels.iter().any(|p| p.a != 255);
        Ok(Self {
            pixmap: Arc::new(vello_cpu::Pixmap::from_parts_with_opacity(
                pixels,
                w,
                h,
                translucent,
            )),
        })
    }

    pub fn width(&self) -> u32 {
        u32::from(self.pixmap.width())
    }

    pub fn height(&self) -> u32 {
        u32::from(self.pixmap.height())
    }

    pub fn rgba8_premul(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    /// The shared pixmap, for use as an image paint.
    pub fn pixmap(&self) -> &Arc<vello_cpu::Pixmap> {
        &self.pixmap
    }
}

/// One font file as loaded from disk.
#[derive(Clone, Debug)]
pub struct FontFile {
    /// Where the bytes came from (a path, or a caller-supplied label).
    pub source: String,
    /// The file bytes. Cloning shares them; every shaping context registers this same blob.
    pub blob: parley::fontique::Blob<u8>,
    /// Family names registered from this file.
    pub families: Vec<String>,
}

/// Font files every text run is shaped from.
#[derive(Clone, Debug)]
pub struct FontSet {
    files: Vec<FontFile>,
}

impl FontSet {
    /// Build from in-memory font files (TTF/OTF/TTC). Each file must yield at least one family.
    pub fn from_bytes(files: Vec<(String, Vec<u8>)>) -> OgResult<Self> {
        if files.is_empty() {
            return Err(OgError::asset("at least one font file is required"));
        }

        let mut font_ctx = parley::FontContext::default();
        let mut out = Vec::with_capacity(files.len());
        for (source, bytes) in files {
            let blob = parley::fontique::Blob::from(bytes);
            let registered = font_ctx.collection.register_fonts(blob.clone(), None);
            let families: Vec<String> = registered
                .iter()
                .filter_map(|(id, _)| font_ctx.collection.family_name(*id).map(str::to_string))
                .collect();
            if families.is_empty() {
                return Err(OgError::asset(format!(
                    "no font families registered from '{source}'"
                )));
            }
            out.push(FontFile {
                source,
                blob,
                families,
            });
        }

        Ok(Self { files: out })
    }

    pub fn load<P: AsRef<Path>>(paths: &[P]) -> OgResult<Self> {
        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            let path = path.as_ref();
            let bytes = read_bytes(path, "font")?;
            files.push((path.display().to_string(), bytes));
        }
        Self::from_bytes(files)
    }

    pub fn files(&self) -> impl Iterator<Item = &parley::fontique::Blob<u8>> {
        self.files.iter().map(|f| &f.blob)
    }

    pub fn entries(&self) -> &[FontFile] {
        &self.files
    }

    /// First family of the first file; the family used when a style names none.
    pub fn primary_family(&self) -> Option<&str> {
        self.files
            .first()
            .and_then(|f| f.families.first())
            .map(String::as_str)
    }
}

/// Read-only handles shared by every card render.
#[derive(Clone, Debug)]
pub struct SharedAssets {
    pub background: Arc<PreparedImage>,
    pub fonts: Arc<FontSet>,
}

impl SharedAssets {
    pub fn new(background: PreparedImage, fonts: FontSet) -> Self {
        Self {
            background: Arc::new(background),
            fonts: Arc::new(fonts),
        }
    }

    /// Load the background image and font files. Any failure is an [`OgError::Asset`].
    #[tracing::instrument(skip_all, fields(background = %background.as_ref().display()))]
    pub fn load<P: AsRef<Path>>(background: impl AsRef<Path>, fonts: &[P]) -> OgResult<Self> {
        let background = background.as_ref();
        let bytes = read_bytes(background, "background image")?;
        let image = decode::decode_image(&bytes).map_err(|e| match e {
            OgError::Asset(msg) => {
                OgError::asset(format!("background '{}': {msg}", background.display()))
            }
            other => other,
        })?;
        let fonts = FontSet::load(fonts)?;

        tracing::info!(
            width = image.width(),
            height = image.height(),
            font_files = fonts.entries().len(),
            family = fonts.primary_family().unwrap_or("unknown"),
            "loaded shared assets"
        );

        Ok(Self::new(image, fonts))
    }
}

fn read_bytes(path: &Path, what: &str) -> OgResult<Vec<u8>> {
    std::fs::read(path)
        .with_context(|| format!("read {what} from '{}'", path.display()))
        .map_err(OgError::asset_from)
}

#[cfg(test)]
#[path = "../tests/unit/assets/store.rs"]
mod tests;
