//! State module for in-process bookkeeping
//!
//! The bot keeps no persistent state. The only mutable state shared between
//! requests is the duplicate-delivery guard.

mod dedup;

pub use dedup::DedupGuard;
