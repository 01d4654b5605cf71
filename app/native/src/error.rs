//! Error types for Dashgrid.
//!
//! Each subsystem has its own error enum; this module folds them into one
//! type for the CLI and for hosts that want a single serializable error.

use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;
use crate::drag::DragError;
use crate::grid::LayoutError;
use crate::store::ActorError;

/// Errors that can occur during application execution.
///
/// Serializes as `{ "kind": ..., "message": ... }` so hosts can forward it
/// as structured data.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "kind", content = "message")]
pub enum DashgridError {
    /// Invalid command arguments.
    #[error("{0}")]
    InvalidArguments(String),
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// Layout invariant violated.
    #[error("Layout error: {0}")]
    LayoutError(String),
    /// Drag gesture rejected.
    #[error("Drag error: {0}")]
    DragError(String),
    /// Layout actor unreachable.
    #[error("Actor error: {0}")]
    ActorError(String),
    /// IO error.
    #[error("IO error: {0}")]
    IoError(String),
    /// Generic command error.
    #[error("{0}")]
    CommandError(String),
}

impl From<std::io::Error> for DashgridError {
    fn from(err: std::io::Error) -> Self { Self::IoError(err.to_string()) }
}

impl From<serde_json::Error> for DashgridError {
    fn from(err: serde_json::Error) -> Self { Self::CommandError(err.to_string()) }
}

impl From<ConfigError> for DashgridError {
    fn from(err: ConfigError) -> Self { Self::ConfigError(err.to_string()) }
}

impl From<LayoutError> for DashgridError {
    fn from(err: LayoutError) -> Self { Self::LayoutError(err.to_string()) }
}

impl From<DragError> for DashgridError {
    fn from(err: DragError) -> Self {
        match err {
            DragError::ActorUnavailable(actor) => actor.into(),
            other => Self::DragError(other.to_string()),
        }
    }
}

impl From<ActorError> for DashgridError {
    fn from(err: ActorError) -> Self { Self::ActorError(err.to_string()) }
}

impl From<String> for DashgridError {
    fn from(msg: String) -> Self { Self::CommandError(msg) }
}

impl From<&str> for DashgridError {
    fn from(msg: &str) -> Self { Self::CommandError(msg.to_string()) }
}
