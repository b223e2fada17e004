//! Tribunal-Gateway: Validator Fleet Access
//!
//! One trait, [`ValidatorGateway`], covering the two calls the escalation
//! engine makes against the model fleet: producing a candidate output and
//! fanning out an evaluation round at a redundancy level.
//!
//! Implementations:
//! - [`HttpValidatorGateway`]: JSON-over-HTTP fleet client
//! - [`fakes::ScriptedGateway`]: scripted fake for tests

mod error;
pub mod fakes;
pub mod gateway_traits;
pub mod http;

pub use error::GatewayError;
pub use fakes::{FailingGateway, ScriptedGateway, SlowGateway};
pub use gateway_traits::{GatewayResult, ValidatorGateway};
pub use http::{GatewayConfig, HttpValidatorGateway};

/// Result type for tribunal-gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;
