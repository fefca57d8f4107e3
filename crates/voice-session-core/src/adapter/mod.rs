//! Boundary contracts for the external collaborators.
//!
//! Every method is fire-and-forget from the session's point of view: an
//! adapter reports completion later by publishing a [`Signal`](crate::Signal)
//! on the bus, never through a return value the coordinator waits on.

mod capture;
mod playback;
mod transport;

pub use {
    capture::CaptureAdapter,
    playback::PlaybackAdapter,
    transport::{InterruptSignal, TransportAdapter},
};
