//! Turning extracted data files into clean, time-indexed series.

pub mod compose;
pub mod error;
pub mod parser;
pub mod stitch;
