//! CLI library components for the ICU quality metrics engine.

pub mod logging;
pub mod pipeline;
