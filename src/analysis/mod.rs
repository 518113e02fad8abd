//! Report normalization and derivation.
//!
//! Locates known sub-agent outputs in the orchestrator result and derives
//! the threat level from them.

pub mod extractor;
pub mod threat;

pub use extractor::*;
pub use threat::*;
