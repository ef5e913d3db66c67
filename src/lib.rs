//! writeflow - streaming client for a multi-stage writing service
//!
//! Submits a generation request, follows the service's progress stream
//! stage by stage, and resolves to the final result.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod error;
pub mod generation;
pub mod models;
pub mod prelude;
pub mod snapshot;
pub mod sse;
pub mod state;
pub mod traits;
