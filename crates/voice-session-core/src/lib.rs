//! Voice Session Core Library
//!
//! State machine, control projection and coordination for a real-time voice
//! chat session. Capture, transport and playback are adapters behind traits;
//! every component talks to the others through a typed [`SignalBus`].
//!
//! # Example
//!
//! ```no_run
//! use voice_session_core::{
//!     CaptureAdapter, CoordinatorConfig, CoreResult, AudioHandle, InterruptSignal,
//!     PlaybackAdapter, SessionContext, SessionCoordinator, Signal, TransportAdapter, UserIntent,
//! };
//!
//! struct Mic;
//! impl CaptureAdapter for Mic {
//!     fn start_recording(&mut self, _turn: u64) -> bool { true }
//!     fn stop_recording(&mut self) {}
//!     fn cancel_recording(&mut self) {}
//! }
//!
//! struct Net;
//! impl TransportAdapter for Net {
//!     fn submit_audio(&mut self, _turn: u64, _audio: AudioHandle) -> CoreResult<()> { Ok(()) }
//!     fn send_interrupt(&mut self, _signal: InterruptSignal) -> CoreResult<()> { Ok(()) }
//! }
//!
//! struct Speaker;
//! impl PlaybackAdapter for Speaker {
//!     fn play(&mut self, _turn: u64, _audio: AudioHandle) {}
//!     fn stop_playback(&mut self) {}
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let context = SessionContext::new(uuid::Uuid::new_v4());
//!     let mut coordinator = SessionCoordinator::new(
//!         context.clone(),
//!         Box::new(Mic),
//!         Box::new(Net),
//!         Box::new(Speaker),
//!         CoordinatorConfig::default(),
//!     );
//!
//!     context.bus().publish(Signal::Intent(UserIntent::Start));
//!     coordinator.pump();
//!
//!     println!("State: {}", coordinator.machine().current());
//! }
//! ```

mod adapter;
mod bus;
mod error;
mod session;

pub use {
    adapter::{CaptureAdapter, InterruptSignal, PlaybackAdapter, TransportAdapter},
    bus::{AudioHandle, Signal, SignalBus, StreamResult, SubscriberId, Subscription, UserIntent},
    error::{Result as CoreResult, SessionError},
    session::*,
};
