//! Shared error types for the services crate.

use thiserror::Error;

use storage::SledInitError;

/// Errors emitted while bootstrapping the service layer.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LmsInitError {
    #[error(transparent)]
    Sled(#[from] SledInitError),
}
