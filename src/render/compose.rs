use std::sync::Arc;

use crate::assets::PreparedImage;
use crate::foundation::core::{Canvas, Point, Rect, Rgba8};
use crate::foundation::error::OgResult;
use crate::style::{CardStyle, PanelStyle};
use crate::text::measure::TextPainter;
use crate::text::wrap::LayoutResult;

/// Per-record text drawn onto the card.
#[derive(Clone, Copy, Debug)]
pub struct CardText<'a> {
    /// Already formatted, e.g. `2023/01/05`.
    pub date: &'a str,
    pub title: &'a LayoutResult,
    pub site_name: &'a str,
}

/// A finished card in premultiplied RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardFrame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl CardFrame {
    /// Premultiplied RGBA of pixel `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Draw one card. The draw order is significant; later steps cover earlier ones:
///
/// 1. background, scaled to the canvas width
/// 2. light panel
/// 3. date
/// 4. title lines
/// 5. bottom bar
/// 6. site name, right-aligned to `canvas.width - margin_right`
///
/// Nothing outlives the call; the same inputs always yield the same pixels.
pub fn compose_card(
    background: &PreparedImage,
    style: &CardStyle,
    text: &CardText<'_>,
    painter: &mut dyn TextPainter,
) -> OgResult<CardFrame> {
    let (w, h) = style.canvas.to_u16()?;
    let mut ctx = vello_cpu::RenderContext::new(w, h);

    draw_background(&mut ctx, background, style.canvas);
    fill_panel(&mut ctx, &style.light_panel);

    let [date_x, date_y] = style.date.position;
    painter.fill_text(
        &mut ctx,
        text.date,
        &style.date_font(),
        style.date.text.color,
        Point::new(date_x, date_y),
    )?;

    let title_font = style.title_font();
    for line in text.title.lines() {
        for placed in line.chunks() {
            painter.fill_text(
                &mut ctx,
                placed.chunk.text(),
                &title_font,
                style.title.text.color,
                Point::new(placed.x, line.y()),
            )?;
        }
    }

    fill_panel(&mut ctx, &style.bottom_bar);

    let site_font = style.site_name_font();
    let measured = painter.measure(text.site_name, &site_font)?;
    let site_x = style.site_name_right_edge() - f64::from(measured);
    painter.fill_text(
        &mut ctx,
        text.site_name,
        &site_font,
        style.site_name.text.color,
        Point::new(site_x, style.site_name.baseline_y),
    )?;

    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);

    Ok(CardFrame {
        width: style.canvas.width,
        height: style.canvas.height,
        data: pixmap.data_as_u8_slice().to_vec(),
    })
}

fn draw_background(
    ctx: &mut vello_cpu::RenderContext,
    background: &PreparedImage,
    canvas: Canvas,
) {
    let width = f64::from(background.width());
    let height = f64::from(background.height());

    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_transform(vello_cpu::kurbo::Affine::scale(f64::from(canvas.width) / width));
    ctx.set_paint(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::clone(background.pixmap())),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    });
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, width, height));
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
}

fn fill_panel(ctx: &mut vello_cpu::RenderContext, panel: &PanelStyle) {
    fill_rect(ctx, panel.to_rect(), panel.color);
}

fn fill_rect(ctx: &mut vello_cpu::RenderContext, rect: Rect, color: Rgba8) {
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
        color.r, color.g, color.b, color.a,
    ));
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        rect.x0, rect.y0, rect.x1, rect.y1,
    ));
}

#[cfg(test)]
#[path = "../../tests/unit/render/compose.rs"]
mod tests;
