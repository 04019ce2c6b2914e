//! Orchestration for SapScout: summarizer gateway, JSON persistence,
//! the single-table pipeline, and the batch loop.

pub mod batch;
pub mod persist;
pub mod pipeline;
pub mod summarize;
