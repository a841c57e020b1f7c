//! Card style: every color, size and coordinate the compositor draws with.
//!
//! Defaults reproduce the blog card this crate was built for; a JSON file can override any
//! subset of fields.

use std::path::Path;

use anyhow::Context;

use crate::foundation::core::{Canvas, Point, Rect, Rgba8};
use crate::foundation::error::{OgError, OgResult};
use crate::text::measure::FontSpec;
use crate::text::wrap::WrapParams;

const TEXT_COLUMN_X: f64 = (1200.0 - 630.0) / 2.0 + 50.0;
const INK: Rgba8 = Rgba8::opaque(0x0A, 0x0A, 0x0A);

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextStyle {
    pub size_px: f32,
    pub weight: f32,
    pub color: Rgba8,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size_px: 24.0,
            weight: 400.0,
            color: INK,
        }
    }
}

/// Filled rectangle drawn over whatever is beneath it.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PanelStyle {
    /// `[x0, y0, x1, y1]` in canvas pixels.
    pub rect: [f64; 4],
    pub color: Rgba8,
}

impl PanelStyle {
    pub fn to_rect(&self) -> Rect {
        let [x0, y0, x1, y1] = self.rect;
        Rect::new(x0, y0, x1, y1)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DateStyle {
    pub text: TextStyle,
    /// Left edge and baseline.
    pub position: [f64; 2],
}

impl Default for DateStyle {
    fn default() -> Self {
        Self {
            text: TextStyle::default(),
            position: [TEXT_COLUMN_X, 280.0],
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TitleStyle {
    pub text: TextStyle,
    pub max_width: f64,
    pub line_height: f64,
    /// Left edge and baseline of the first line.
    pub origin: [f64; 2],
}

impl Default for TitleStyle {
    fn default() -> Self {
        Self {
            text: TextStyle {
                size_px: 32.0,
                ..TextStyle::default()
            },
            max_width: 630.0 - 100.0,
            line_height: 40.0,
            origin: [TEXT_COLUMN_X, 330.0],
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteNameStyle {
    pub label: String,
    pub text: TextStyle,
    pub baseline_y: f64,
    /// Distance from the canvas right edge to the label's right edge.
    pub margin_right: f64,
}

impl Default for SiteNameStyle {
    fn default() -> Self {
        Self {
            label: "makenowjust-labs/blog".to_string(),
            text: TextStyle {
                color: Rgba8::opaque(0xDF, 0xDF, 0xDF),
                ..TextStyle::default()
            },
            baseline_y: 564.0,
            margin_right: 1200.0 - (TEXT_COLUMN_X + 570.0 - 50.0),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CardStyle {
    pub canvas: Canvas,
    /// Family to shape every run with; defaults to the first family in the font files.
    pub font_family: Option<String>,
    pub light_panel: PanelStyle,
    pub date: DateStyle,
    pub title: TitleStyle,
    pub bottom_bar: PanelStyle,
    pub site_name: SiteNameStyle,
    /// Opaque color the rendered card is flattened over before encoding.
    pub matte: Rgba8,
}

impl Default for CardStyle {
    fn default() -> Self {
        Self {
            canvas: Canvas::CARD,
            font_family: None,
            light_panel: PanelStyle {
                rect: [0.0, 40.0, 1200.0, 590.0],
                color: Rgba8::with_alpha_f32(255, 255, 255, 0.6),
            },
            date: DateStyle::default(),
            title: TitleStyle::default(),
            bottom_bar: PanelStyle {
                rect: [0.0, 540.0, 1200.0, 570.0],
                color: Rgba8::with_alpha_f32(0, 0, 0, 0.5),
            },
            site_name: SiteNameStyle::default(),
            matte: Rgba8::opaque(0, 0, 0),
        }
    }
}

impl CardStyle {
    pub fn from_json_str(s: &str) -> OgResult<Self> {
        let style: Self = serde_json::from_str(s)
            .map_err(|e| OgError::validation(format!("invalid card style JSON: {e}")))?;
        style.validate()?;
        Ok(style)
    }

    pub fn from_path(path: impl AsRef<Path>) -> OgResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read card style '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    pub fn validate(&self) -> OgResult<()> {
        if self.canvas != Canvas::CARD {
            return Err(OgError::validation(format!(
                "card canvas must be {}x{}, got {}x{}",
                Canvas::CARD.width,
                Canvas::CARD.height,
                self.canvas.width,
                self.canvas.height
            )));
        }
        if self.matte.a != 255 {
            return Err(OgError::validation("matte color must be opaque"));
        }
        self.date_font().validate()?;
        self.title_font().validate()?;
        self.site_name_font().validate()?;
        self.wrap_params().validate()?;
        for (name, panel) in [("light_panel", &self.light_panel), ("bottom_bar", &self.bottom_bar)]
        {
            let [x0, y0, x1, y1] = panel.rect;
            if ![x0, y0, x1, y1].iter().all(|v| v.is_finite()) || x1 < x0 || y1 < y0 {
                return Err(OgError::validation(format!(
                    "{name}.rect must be finite with x0 <= x1 and y0 <= y1"
                )));
            }
        }
        let coords = [
            self.date.position[0],
            self.date.position[1],
            self.site_name.baseline_y,
            self.site_name.margin_right,
        ];
        if !coords.iter().all(|v| v.is_finite()) {
            return Err(OgError::validation("text positions must be finite"));
        }
        Ok(())
    }

    fn font(&self, text: &TextStyle) -> FontSpec {
        FontSpec::new(self.font_family.clone(), text.size_px, text.weight)
    }

    pub fn date_font(&self) -> FontSpec {
        self.font(&self.date.text)
    }

    pub fn title_font(&self) -> FontSpec {
        self.font(&self.title.text)
    }

    pub fn site_name_font(&self) -> FontSpec {
        self.font(&self.site_name.text)
    }

    pub fn wrap_params(&self) -> WrapParams {
        WrapParams {
            max_width: self.title.max_width,
            line_height: self.title.line_height,
            origin: Point::new(self.title.origin[0], self.title.origin[1]),
        }
    }

    /// x-coordinate the site name's right edge is aligned to.
    pub fn site_name_right_edge(&self) -> f64 {
        f64::from(self.canvas.width) - self.site_name.margin_right
    }
}

#[cfg(test)]
#[path = "../tests/unit/style/style.rs"]
mod tests;
