//! One record in, one encoded card out.

use crate::assets::PreparedImage;
use crate::foundation::error::{OgError, OgResult, RecordError, Stage};
use crate::record::Record;
use crate::render::{CardText, compose_card, encode_png};
use crate::style::CardStyle;
use crate::text::measure::TextPainter;
use crate::text::segment::Segmenter;
use crate::text::wrap::{LayoutResult, wrap_chunks};

/// Everything a card needs besides the record and a painter. Shared read-only across workers.
#[derive(Clone, Copy)]
pub struct CardRenderer<'a> {
    pub background: &'a PreparedImage,
    pub style: &'a CardStyle,
    pub segmenter: &'a dyn Segmenter,
}

impl<'a> CardRenderer<'a> {
    pub fn new(
        background: &'a PreparedImage,
        style: &'a CardStyle,
        segmenter: &'a dyn Segmenter,
    ) -> OgResult<Self> {
        style.validate()?;
        Ok(Self {
            background,
            style,
            segmenter,
        })
    }

    /// Segment and wrap `title` in the title font.
    pub fn layout_title(
        &self,
        title: &str,
        painter: &mut dyn TextPainter,
    ) -> OgResult<LayoutResult> {
        let chunks = self.segmenter.segment(title);
        wrap_chunks(
            &chunks,
            &self.style.wrap_params(),
            &self.style.title_font(),
            painter,
        )
    }

    /// PNG bytes for `record`. Failures carry the record id and the stage that failed.
    #[tracing::instrument(skip(self, record, painter), fields(id = %record.id))]
    pub fn render_record(
        &self,
        record: &Record,
        painter: &mut dyn TextPainter,
    ) -> Result<Vec<u8>, RecordError> {
        let fail = |stage: Stage| move |e: OgError| RecordError::new(record.id.clone(), stage, e);

        let date = record.card_date().map_err(fail(Stage::Input))?;
        let title = self
            .layout_title(&record.title, painter)
            .map_err(fail(Stage::Layout))?;
        tracing::debug!(lines = title.lines().len(), "title laid out");

        let text = CardText {
            date: &date,
            title: &title,
            site_name: &self.style.site_name.label,
        };
        let frame = compose_card(self.background, self.style, &text, painter)
            .map_err(fail(Stage::Render))?;
        encode_png(&frame, self.style.matte).map_err(fail(Stage::Encode))
    }
}

impl std::fmt::Debug for CardRenderer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardRenderer")
            .field(
                "background",
                &(self.background.width(), self.background.height()),
            )
            .field("style", self.style)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../tests/unit/pipeline/pipeline.rs"]
mod tests;
