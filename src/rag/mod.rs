//! Retrieval-augmented generation helpers.
//!
//! The turn itself is sequenced by [`crate::orchestrator::Pipeline`]; this module
//! holds the pure pieces between retrieval and generation.

pub mod context;

pub use context::{assemble_context, excerpt};
