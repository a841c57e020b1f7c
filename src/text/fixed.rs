use std::collections::HashMap;

use crate::foundation::core::{Point, Rgba8};
use crate::foundation::error::{OgError, OgResult};
use crate::text::measure::{FontSpec, TextPainter, WidthMeasurer};

/// Font-free text oracle for tests and debugging.
///
/// Every char advances by `advance_em * size_px` unless overridden; painting fills one solid
/// box per text run spanning `[x, x + width] x [baseline - size_px, baseline]`.
#[derive(Clone, Debug)]
pub struct FixedAdvanceText {
    advance_em: f32,
    overrides: HashMap<char, f32>,
    calls: usize,
}

impl FixedAdvanceText {
    /// Uniform advance of `advance_em` em per char.
    pub fn new(advance_em: f32) -> Self {
        Self {
            advance_em,
            overrides: HashMap::new(),
            calls: 0,
        }
    }

    /// Give `c` an absolute advance of `px` pixels regardless of font size.
    pub fn with_char_width(mut self, c: char, px: f32) -> Self {
        self.overrides.insert(c, px);
        self
    }

    /// Number of [`WidthMeasurer::measure`] calls served so far.
    pub fn measure_calls(&self) -> usize {
        self.calls
    }

    fn width_of(&self, text: &str, font: &FontSpec) -> f32 {
        text.chars()
            .map(|c| {
                self.overrides
                    .get(&c)
                    .copied()
                    .unwrap_or(self.advance_em * font.size_px)
            })
            .sum()
    }
}

impl WidthMeasurer for FixedAdvanceText {
    fn measure(&mut self, text: &str, font: &FontSpec) -> OgResult<f32> {
        font.validate()?;
        self.calls += 1;
        if text.contains('\u{FFFD}') {
            return Err(OgError::render(format!(
                "font has no glyph for part of '{text}'"
            )));
        }
        Ok(self.width_of(text, font))
    }
}

impl TextPainter for FixedAdvanceText {
    fn fill_text(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &str,
        font: &FontSpec,
        color: Rgba8,
        baseline: Point,
    ) -> OgResult<()> {
        let w = f64::from(self.measure(text, font)?);
        if w <= 0.0 {
            return Ok(());
        }
        let top = baseline.y - f64::from(font.size_px);
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            baseline.x,
            top,
            baseline.x + w,
            baseline.y,
        ));
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/fixed.rs"]
mod tests;
