//! Title text: segmentation into atomic chunks, width measurement, and greedy wrapping.

pub mod budoux;
pub mod fixed;
pub mod measure;
pub mod segment;
pub mod wrap;
