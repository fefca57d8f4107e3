use crate::AudioHandle;

/// Speech playback.
///
/// Publishes [`Signal::PlaybackFinished`](crate::Signal::PlaybackFinished)
/// tagged with the turn being played when audio finishes naturally. May
/// report it more than once.
pub trait PlaybackAdapter: Send {
    /// Start playing `audio`, the answer for `turn`.
    fn play(&mut self, turn: u64, audio: AudioHandle);

    /// Stop immediately. Must not report "finished" for the stopped audio.
    fn stop_playback(&mut self);
}
