//! State module for tracking warmup progress
//!
//! # Components
//!
//! - `CrawlState`: Outcome of a single warmed URL (successful or failed)
//! - `WarmerState`: Lifecycle of the coordinator (idle, accumulating, ready, executed)

mod crawl_state;
mod warmer_state;

// Re-export main types
pub use crawl_state::CrawlState;
pub use warmer_state::WarmerState;
