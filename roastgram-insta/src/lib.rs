//! roastgram Instagram Layer
//!
//! Provides networking against Instagram's public web endpoints:
//! - HTTP client construction with UA rotation
//! - The `ProfileSource` capability trait and its Instagram implementation
//! - A lazy, cursor-paged post stream
//! - The paced, bounded-retry profile fetch routine

pub mod client;
pub mod source;
pub mod instagram;
pub mod fetch;

pub use client::*;
pub use source::*;
pub use instagram::*;
pub use fetch::*;
