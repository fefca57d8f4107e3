use crate::{Signal, StateChangeEvent, Subscription};

use tokio::{
    sync::watch,
    task::JoinHandle,
};
use tracing::debug;

/// One-way sink for state changes, e.g. a shared UI store.
///
/// Nothing written here is ever read back into the session.
pub trait StateMirror: Send + 'static {
    /// Record a committed transition.
    fn mirror(&mut self, event: &StateChangeEvent);
}

/// Mirror holding the latest event in a `watch` channel.
pub struct WatchStateMirror {
    tx: watch::Sender<Option<StateChangeEvent>>,
}

impl WatchStateMirror {
    /// Create the mirror and a receiver for other surfaces.
    pub fn new() -> (Self, watch::Receiver<Option<StateChangeEvent>>) {
        let (tx, rx) = watch::channel(None);
        (Self { tx }, rx)
    }
}

impl StateMirror for WatchStateMirror {
    fn mirror(&mut self, event: &StateChangeEvent) {
        self.tx.send_replace(Some(*event));
    }
}

/// Pump `StateChanged` signals from `subscription` into `mirror` until
/// shutdown or until the bus goes away. Returns the mirror.
pub fn spawn_state_mirror<M: StateMirror>(
    mut subscription: Subscription,
    mut mirror: M,
    mut shutdown_rx: watch::Receiver<bool>,
) -> JoinHandle<M> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => break,
                signal = subscription.recv() => match signal {
                    Some(Signal::StateChanged(event)) => mirror.mirror(&event),
                    Some(_) => {}
                    None => break,
                },
            }
        }

        debug!("State mirror stopped");
        mirror
    })
}
