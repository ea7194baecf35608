//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! CMS call (client init, find, findGlobal):
//!     → timeouts.rs (race against the configured deadline)
//!     → Raced::Completed(value) | Raced::TimedOut
//!     → with_fallback: TimedOut becomes the caller's default
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every CMS call has a deadline
//! - A timeout is a value, never an error, except during client init
//! - No retries: a slow CMS degrades to empty content, not to slower pages

pub mod timeouts;

pub use timeouts::{Raced, Racer, TimeoutPolicy, DEFAULT_TIMEOUT_MS};
