//! Card compositing and PNG encoding on the `vello_cpu` rasterizer.

pub mod compose;
pub mod encode;

pub use compose::{CardFrame, CardText, compose_card};
pub use encode::encode_png;
