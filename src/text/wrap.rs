use crate::foundation::core::{Point, Rect};
use crate::foundation::error::{OgError, OgResult};
use crate::text::measure::{FontSpec, WidthMeasurer};
use crate::text::segment::TextChunk;

/// Geometry the greedy wrapper packs chunks into.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WrapParams {
    /// Maximum line width `W`, measured from `origin.x`.
    pub max_width: f64,
    /// Baseline-to-baseline distance `H`.
    pub line_height: f64,
    /// Left edge and baseline of the first line.
    pub origin: Point,
}

impl WrapParams {
    pub fn validate(&self) -> OgResult<()> {
        if !self.max_width.is_finite() || self.max_width < 0.0 {
            return Err(OgError::validation("wrap max_width must be finite and >= 0"));
        }
        if !self.line_height.is_finite() || self.line_height <= 0.0 {
            return Err(OgError::validation(
                "wrap line_height must be finite and > 0",
            ));
        }
        if !self.origin.x.is_finite() || !self.origin.y.is_finite() {
            return Err(OgError::validation("wrap origin must be finite"));
        }
        Ok(())
    }
}

/// A chunk with its absolute left edge.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedChunk {
    pub chunk: TextChunk,
    pub x: f64,
    pub width: f64,
}

/// One wrapped line. Built only by [`wrap_chunks`]; read-only afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    chunks: Vec<PlacedChunk>,
    y: f64,
    width: f64,
}

impl Line {
    pub fn chunks(&self) -> &[PlacedChunk] {
        &self.chunks
    }

    /// Baseline y-coordinate.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Sum of the widths of this line's chunks.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// A line holding exactly one chunk wider than `max_width`.
    pub fn is_overflow(&self, max_width: f64) -> bool {
        self.chunks.len() == 1 && self.width > max_width
    }

    pub fn text(&self) -> String {
        self.chunks.iter().map(|c| c.chunk.text()).collect()
    }
}

struct LineBuilder {
    chunks: Vec<PlacedChunk>,
    y: f64,
    width: f64,
}

impl LineBuilder {
    fn new(y: f64) -> Self {
        Self {
            chunks: Vec::new(),
            y,
            width: 0.0,
        }
    }

    fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    fn push(&mut self, chunk: TextChunk, x: f64, width: f64) {
        self.chunks.push(PlacedChunk { chunk, x, width });
        self.width += width;
    }

    fn freeze(self) -> Line {
        Line {
            chunks: self.chunks,
            y: self.y,
            width: self.width,
        }
    }
}

/// Wrapped title: lines top to bottom plus their union bounding box.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutResult {
    lines: Vec<Line>,
    bounds: Rect,
}

impl LayoutResult {
    pub fn empty(origin: Point) -> Self {
        Self {
            lines: Vec::new(),
            bounds: Rect::from_points(origin, origin),
        }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Union of the line bands `[x0, x0 + width] x [y - line_height, y]`.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn text(&self) -> String {
        self.lines.iter().map(Line::text).collect()
    }
}

/// Greedy single-pass wrap: a chunk goes on the current line unless the line already holds
/// something and the chunk would push it past `origin.x + max_width`.
///
/// A chunk wider than `max_width` on its own still gets a line to itself.
pub fn wrap_chunks(
    chunks: &[TextChunk],
    params: &WrapParams,
    font: &FontSpec,
    measurer: &mut dyn WidthMeasurer,
) -> OgResult<LayoutResult> {
    params.validate()?;

    let x0 = params.origin.x;
    let limit = x0 + params.max_width;
    let line_y = |n: usize| params.origin.y + n as f64 * params.line_height;

    let mut lines = Vec::new();
    let mut current = LineBuilder::new(line_y(0));
    let mut x = x0;

    for chunk in chunks {
        let m = f64::from(chunk.width(font, measurer)?);
        if !current.is_empty() && x + m > limit {
            let done = std::mem::replace(&mut current, LineBuilder::new(line_y(lines.len() + 1)));
            lines.push(done.freeze());
            x = x0;
        }
        current.push(chunk.clone(), x, m);
        x += m;
    }
    if !current.is_empty() {
        lines.push(current.freeze());
    }

    if lines.is_empty() {
        return Ok(LayoutResult::empty(params.origin));
    }

    let widest = lines.iter().map(Line::width).fold(0.0_f64, f64::max);
    let last_y = lines.last().map(Line::y).unwrap_or(params.origin.y);
    let bounds = Rect::new(
        x0,
        params.origin.y - params.line_height,
        x0 + widest,
        last_y,
    );

    tracing::debug!(
        chunks = chunks.len(),
        lines = lines.len(),
        widest,
        "wrapped title"
    );

    Ok(LayoutResult { lines, bounds })
}

#[cfg(test)]
#[path = "../../tests/unit/text/wrap.rs"]
mod tests;
