//! roastgram Core - Domain model for multi-agent profile review
//!
//! This crate provides the foundational primitives:
//! - Profile handle extraction from reference URLs
//! - The profile snapshot consumed by reviewer agents
//! - Review focus areas

pub mod handle;
pub mod snapshot;
pub mod focus;

pub use handle::*;
pub use snapshot::*;
pub use focus::*;

/// Default number of recent posts pulled into a snapshot
pub const DEFAULT_POST_COUNT: usize = 3;
