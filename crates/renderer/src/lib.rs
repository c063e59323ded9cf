//! Tile rendering for TOE visualization.
//!
//! Turns a per-tile bin set into a colorized RGBA raster and encodes it
//! as a deterministic PNG.

pub mod png;
pub mod raster;

pub use raster::{rasterize, render_tile};
