//! Error type shared by sessions, screens and page objects.

use std::time::Duration;

use thiserror::Error;

use crate::config::ConfigError;
use crate::wire::WireError;

/// Message carried by every [`DriverError::Initialization`].
pub const INITIALIZATION_FAILED: &str =
    "Failed to initialize driver. Please check the desired capabilities";

/// Errors raised by tapline operations.
#[derive(Error, Debug)]
pub enum DriverError {
    /// A session could not be created. Wraps whatever went wrong while
    /// reading configuration, building capabilities or negotiating the
    /// session with the server.
    #[error("{message}")]
    Initialization {
        message: String,
        #[source]
        source: Box<DriverError>,
    },

    /// A wire command failed.
    #[error(transparent)]
    Wire(#[from] WireError),

    /// Configuration could not be read.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// No element matched a locator.
    #[error("no element found for {0}")]
    NoSuchElement(String),

    /// The operation is not available on the connected platform.
    #[error("{operation} is not supported on {platform}")]
    Unsupported {
        operation: &'static str,
        platform: String,
    },

    /// An explicit wait ran out of time.
    #[error("timed out after {timeout:?} waiting for {condition}")]
    WaitTimeout {
        condition: String,
        timeout: Duration,
    },

    /// A caller-supplied argument was rejected.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No session is bound to the execution context.
    #[error("no session bound to this context")]
    NoSession,
}

impl DriverError {
    /// Wraps `cause` as the uniform initialization failure.
    pub fn initialization(cause: impl Into<DriverError>) -> Self {
        DriverError::Initialization {
            message: INITIALIZATION_FAILED.to_string(),
            source: Box::new(cause.into()),
        }
    }

    /// Returns true if this error means an element lookup found nothing.
    pub fn is_no_such_element(&self) -> bool {
        match self {
            DriverError::NoSuchElement(_) => true,
            DriverError::Wire(wire) => wire.is_no_such_element(),
            _ => false,
        }
    }
}
