//! Outbound adapters.
//!
//! # Modules
//!
//! - [`llm`]: Anthropic and OpenAI expert clients
//! - [`polymarket`]: REST market discovery and order books
//! - [`paper`]: in-memory paper trader
//! - [`metrics`]: tracing-backed metrics sink

pub mod llm;
pub mod metrics;
pub mod paper;
pub mod polymarket;
