//! Stand-ins for the browser and backend collaborators.
//!
//! Each adapter reports completion by publishing on the session bus after a
//! configured delay, the way the real capture, transport and playback
//! pipelines would.

mod capture;
mod playback;
mod transport;

pub(crate) use {
    capture::SimulatedCapture, playback::SimulatedPlayback, transport::SimulatedTransport,
};
