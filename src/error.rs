//! Crate-wide error types.
//!
//! Errors fall into three groups: transient upstream failures (HTTP, LLM
//! transports), typed forecaster failures ([`ForecastError`]), and policy
//! verdicts ([`Violation`]). Policy verdicts are ordinary values for the
//! policy engine's callers; they only become errors when a caller chooses
//! to propagate one.

use thiserror::Error;

use crate::application::policy::Violation;

#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Forecast(#[from] ForecastError),

    #[error(transparent)]
    Policy(#[from] Violation),

    #[error("execution error: {0}")]
    Execution(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failures raised by the ensemble forecaster.
#[derive(Error, Debug)]
pub enum ForecastError {
    /// The named expert is not present in the registry.
    #[error("expert {name} is not configured")]
    ExpertNotConfigured { name: String },

    /// The registry is empty; no forecast can be produced.
    #[error("no experts configured")]
    NoExpertsConfigured,

    /// The expert's transport call failed.
    #[error("expert {expert} call failed")]
    Upstream {
        expert: String,
        #[source]
        source: Box<Error>,
    },

    /// The expert responded but no forecast could be extracted.
    #[error("unparseable expert response: {reason}")]
    Parse { reason: String },

    /// Every expert in the fallback chain failed.
    #[error("all experts failed, last error: {last}")]
    AllExpertsFailed { last: String },
}
