/// Microphone capture.
///
/// Publishes [`Signal::AudioCaptured`](crate::Signal::AudioCaptured) tagged
/// with the turn it was started for once a stopped capture has been encoded.
pub trait CaptureAdapter: Send {
    /// Begin capturing for `turn`. Returns `true` iff capture actually started.
    fn start_recording(&mut self, turn: u64) -> bool;

    /// Stop capturing. The captured audio arrives later as a signal.
    fn stop_recording(&mut self);

    /// Abandon the current capture. No audio is reported for it.
    fn cancel_recording(&mut self);
}
