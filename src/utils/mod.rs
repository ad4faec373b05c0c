//! Utility functions for uvd

pub mod duration;
pub mod filename;
pub mod mime;

pub use duration::*;
pub use filename::*;
pub use mime::*;
