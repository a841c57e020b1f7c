use std::{borrow::Cow, collections::HashMap};

use crate::assets::FontSet;
use crate::foundation::core::{Point, Rgba8};
use crate::foundation::error::{OgError, OgResult};

/// Font identity a width is measured under.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FontSpec {
    /// Family name; `None` selects the first family registered from the font files.
    pub family: Option<String>,
    pub size_px: f32,
    pub weight: f32,
}

impl FontSpec {
    pub fn new(family: Option<String>, size_px: f32, weight: f32) -> Self {
        Self {
            family,
            size_px,
            weight,
        }
    }

    pub fn validate(&self) -> OgResult<()> {
        if !self.size_px.is_finite() || self.size_px <= 0.0 {
            return Err(OgError::validation("font size_px must be finite and > 0"));
        }
        if !self.weight.is_finite() || !(1.0..=1000.0).contains(&self.weight) {
            return Err(OgError::validation("font weight must be within 1..=1000"));
        }
        if let Some(f) = &self.family
            && f.trim().is_empty()
        {
            return Err(OgError::validation("font family must be non-empty when set"));
        }
        Ok(())
    }
}

/// Oracle returning the advance width of a text run in pixels.
///
/// Must be deterministic for fixed `(text, font)` within one font context.
pub trait WidthMeasurer {
    fn measure(&mut self, text: &str, font: &FontSpec) -> OgResult<f32>;
}

/// A [`WidthMeasurer`] that can also rasterize what it measures.
pub trait TextPainter: WidthMeasurer {
    /// Fill `text` with its left edge at `baseline.x` and its alphabetic baseline at
    /// `baseline.y`.
    fn fill_text(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &str,
        font: &FontSpec,
        color: Rgba8,
        baseline: Point,
    ) -> OgResult<()>;
}

/// Parley-shaped text with glyphs painted through `vello_cpu`.
///
/// Holds mutable shaping caches, so each worker owns its own instance; the font bytes are
/// shared through [`FontSet`].
pub struct ParleyText {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Rgba8>,
    default_family: String,
    paint_fonts: HashMap<(u64, u32), vello_cpu::peniko::FontData>,
}

impl ParleyText {
    /// Register every face of `fonts` with fresh Parley contexts.
    ///
    /// The font blobs are shared with `fonts`, not copied.
    pub fn new(fonts: &FontSet) -> OgResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let mut paint_fonts = HashMap::new();
        let mut default_family = None;

        for blob in fonts.files() {
            let blob_id = blob.id();
            let families = font_ctx.collection.register_fonts(blob.clone(), None);
            for (family_id, faces) in &families {
                if default_family.is_none() {
                    default_family = font_ctx
                        .collection
                        .family_name(*family_id)
                        .map(str::to_string);
                }
                for face in faces {
                    let index = face.index();
                    paint_fonts.entry((blob_id, index)).or_insert_with(|| {
                        vello_cpu::peniko::FontData::new(blob.clone(), index)
                    });
                }
            }
        }

        let default_family = default_family
            .ok_or_else(|| OgError::asset("no font families registered from font bytes"))?;

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            default_family,
            paint_fonts,
        })
    }

    /// Family used when a [`FontSpec`] does not name one.
    pub fn default_family(&self) -> &str {
        &self.default_family
    }

    fn layout(
        &mut self,
        text: &str,
        font: &FontSpec,
        brush: Rgba8,
    ) -> OgResult<parley::Layout<Rgba8>> {
        font.validate()?;
        let family = match &font.family {
            Some(name) => {
                if self.font_ctx.collection.family_by_name(name).is_none() {
                    return Err(OgError::render(format!("unknown font family '{name}'")));
                }
                name.clone()
            }
            None => self.default_family.clone(),
        };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(font.size_px));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(font.weight),
        ));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<Rgba8> = builder.build(text);
        layout.break_all_lines(None);

        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                if run.glyphs().any(|g| g.id == 0) {
                    return Err(OgError::render(format!(
                        "font has no glyph for part of '{text}'"
                    )));
                }
            }
        }

        Ok(layout)
    }

    fn paint_font(&self, blob_id: u64, index: u32) -> OgResult<vello_cpu::peniko::FontData> {
        self.paint_fonts
            .get(&(blob_id, index))
            .cloned()
            .ok_or_else(|| OgError::render("shaped run uses a font that was not registered"))
    }
}

impl WidthMeasurer for ParleyText {
    fn measure(&mut self, text: &str, font: &FontSpec) -> OgResult<f32> {
        if text.is_empty() {
            return Ok(0.0);
        }
        let layout = self.layout(text, font, Rgba8::default())?;
        // Chunks keep their trailing spaces; the advance must include them.
        Ok(layout.full_width())
    }
}

impl TextPainter for ParleyText {
    fn fill_text(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &str,
        font: &FontSpec,
        color: Rgba8,
        baseline: Point,
    ) -> OgResult<()> {
        if text.is_empty() {
            return Ok(());
        }
        let layout = self.layout(text, font, color)?;
        let Some(first_baseline) = layout.lines().next().map(|l| l.metrics().baseline) else {
            return Ok(());
        };

        ctx.set_transform(vello_cpu::kurbo::Affine::translate((
            baseline.x,
            baseline.y - f64::from(first_baseline),
        )));

        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };

                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));

                let run_font = run.run().font();
                let paint_font = self.paint_font(run_font.data.id(), run_font.index)?;
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&paint_font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }

        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/measure.rs"]
mod tests;
