//! Pythia - LLM-ensemble forecasting and trading for binary prediction
//! markets.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── domain/       # Pure value types (forecasts, signals, limits)
//! ├── port/         # Trait contracts for external collaborators
//! ├── application/  # Forecaster, policy engine, workflow orchestrator
//! ├── adapter/      # LLM clients, Polymarket REST, paper trader
//! └── config        # TOML configuration and logging setup
//! ```
//!
//! The pipeline: discovery selects a market shortlist, the forecaster
//! fans out to LLM experts and combines their estimates, signals are
//! derived from the model-versus-market edge, the policy engine admits
//! or rejects each order, and execution dispatches to the paper trader
//! or a live client.

pub mod adapter;
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;
