//! ogcard renders social-preview cards: a fixed 1200x630 PNG per post, carrying a date, a
//! wrapped title and a site name over a background image.
//!
//! The pipeline for one record:
//!
//! - split the title into unbreakable [`TextChunk`]s with a [`Segmenter`]
//! - place chunks greedily into lines no wider than the title column ([`wrap_chunks`])
//! - draw everything onto the canvas in a fixed order ([`compose_card`])
//! - flatten and encode to PNG ([`encode_png`])
//!
//! [`BatchDriver`] runs that pipeline over many records on a rayon pool.
#![forbid(unsafe_code)]

pub mod assets;
pub mod batch;
mod foundation;
pub mod pipeline;
pub mod record;
pub mod render;
pub mod style;
pub mod text;

pub use crate::assets::{FontSet, PreparedImage, SharedAssets};
pub use crate::batch::{BatchDriver, BatchReport};
pub use crate::foundation::core::{Canvas, Point, Rect, Rgba8};
pub use crate::foundation::error::{OgError, OgResult, RecordError, Stage};
pub use crate::pipeline::CardRenderer;
pub use crate::record::{
    Record, RecordSource, discover_posts, format_card_date, load_manifest, parse_front_matter,
    reject_unusable_ids,
};
pub use crate::render::{CardFrame, CardText, compose_card, encode_png};
pub use crate::style::CardStyle;
pub use crate::text::budoux::{BudouxModel, BudouxSegmenter};
pub use crate::text::fixed::FixedAdvanceText;
pub use crate::text::measure::{FontSpec, ParleyText, TextPainter, WidthMeasurer};
pub use crate::text::segment::{ScriptRunSegmenter, Segmenter, TextChunk};
pub use crate::text::wrap::{LayoutResult, Line, PlacedChunk, WrapParams, wrap_chunks};

#[cfg(test)]
#[path = "../tests/unit/support.rs"]
pub(crate) mod test_support;
