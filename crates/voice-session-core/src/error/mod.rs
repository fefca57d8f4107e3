use crate::SessionState;

use error_location::ErrorLocation;
use thiserror::Error;

/// Voice session errors with source location tracking.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Requested transition is not in the transition table.
    ///
    /// This is a caller bug: the state machine is left unchanged.
    #[error("Invalid transition from {from} to {to} {location}")]
    InvalidTransition {
        /// State the machine was in when the transition was requested.
        from: SessionState,
        /// State that was requested.
        to: SessionState,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// An adapter signal arrived that no longer matches the session state.
    #[error("Adapter signal dropped: {reason} {location}")]
    AdapterSignalDropped {
        /// Why the signal could not be applied.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Best-effort interrupt signal could not be delivered to the transport.
    #[error("Interrupt send failed: {reason} {location}")]
    InterruptTransportFailure {
        /// Description of the transport failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Captured audio could not be handed to the transport.
    #[error("Transport error: {reason} {location}")]
    TransportFailure {
        /// Description of the transport failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`SessionError`].
pub type Result<T> = std::result::Result<T, SessionError>;
