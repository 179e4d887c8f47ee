//! skypatch: zero-padded window extraction for 2-D image grids
//!
//! Given a grid and a rectangle in grid coordinates, produce a buffer of
//! exactly the requested size. Cells the grid covers are copied, the rest are
//! zero. Requests may start at negative indices or run past the grid edges,
//! which makes the extractor suitable for sampling patches around arbitrary
//! points and for cutting display tiles.

pub mod types;
pub mod core;

#[cfg(feature = "python")]
mod python;

// Re-export main types and functions for easier access
pub use types::{Overlap, RangeAxis, WindowError, WindowRequest, WindowResult};

pub use crate::core::{
    extract_window, extract_window_bands, extract_window_for, extract_window_into,
    PatchSampler, PatchSamplerParams,
};
