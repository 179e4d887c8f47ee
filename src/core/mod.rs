//! Core window extraction modules

pub mod window;
pub mod patch;

// Re-export main types
pub use window::{extract_window, extract_window_for, extract_window_into, extract_window_bands};
pub use patch::{PatchSampler, PatchSamplerParams};
