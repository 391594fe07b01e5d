//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `EntryState`: Tracks a frontier entry from queued to its terminal outcome

mod entry_state;

pub use entry_state::EntryState;
