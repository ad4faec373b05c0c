//! Core functionality for uvd

pub mod fetcher;
pub mod orchestrator;
pub mod progress;
pub mod request;
pub mod session;
pub mod video_info;

pub use fetcher::*;
pub use orchestrator::*;
pub use progress::*;
pub use request::*;
pub use session::*;
pub use video_info::*;
