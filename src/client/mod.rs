//! Backends that run a competitor analysis.
//!
//! [`OrchestratorClient`] calls the remote multi-agent workflow over HTTP;
//! [`ReplayBackend`] reads a previously saved orchestrator response.

pub mod orchestrator;
pub mod replay;

pub use orchestrator::{OrchestratorClient, OrchestratorConfig};
pub use replay::ReplayBackend;
