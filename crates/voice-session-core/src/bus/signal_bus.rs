use crate::Signal;

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::mpsc;
use tracing::{debug, error, trace};

/// Identifies one subscriber on a [`SignalBus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

#[derive(Default)]
struct Subscribers {
    next_id: u64,
    senders: Vec<(SubscriberId, mpsc::UnboundedSender<Signal>)>,
}

/// Typed publish/subscribe bus.
///
/// Each subscriber owns an unbounded queue, so `publish` never blocks and
/// every subscriber sees signals in exactly the order they were published.
/// Delivery goes to the subscribers registered when `publish` is called;
/// a subscriber added afterwards does not see that signal.
///
/// Cloning yields another handle to the same bus.
#[derive(Clone, Default)]
pub struct SignalBus {
    subscribers: Arc<Mutex<Subscribers>>,
}

/// Receiving end of a bus subscription.
pub struct Subscription {
    id: SubscriberId,
    rx: mpsc::UnboundedReceiver<Signal>,
}

impl SignalBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber.
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut subs = self.lock();
        let id = SubscriberId(subs.next_id);
        subs.next_id += 1;
        subs.senders.push((id, tx));

        debug!(subscriber = id.0, "Subscriber added");

        Subscription { id, rx }
    }

    /// Remove a subscriber. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: SubscriberId) {
        let mut subs = self.lock();
        let before = subs.senders.len();
        subs.senders.retain(|(sid, _)| *sid != id);

        if subs.senders.len() != before {
            debug!(subscriber = id.0, "Subscriber removed");
        }
    }

    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.lock().senders.len()
    }

    /// Deliver `signal` to every current subscriber.
    ///
    /// Returns how many subscribers received it. Subscribers whose receiver
    /// was dropped are pruned.
    pub fn publish(&self, signal: Signal) -> usize {
        let snapshot: Vec<_> = self.lock().senders.clone();

        let mut delivered = 0;
        let mut closed = Vec::new();

        for (id, tx) in snapshot {
            if tx.send(signal.clone()).is_ok() {
                delivered += 1;
            } else {
                closed.push(id);
            }
        }

        if !closed.is_empty() {
            self.lock().senders.retain(|(id, _)| !closed.contains(id));
            debug!(pruned = closed.len(), "Pruned closed subscribers");
        }

        trace!(delivered, ?signal, "Signal published");

        delivered
    }

    // The subscriber list stays valid even if a holder panicked.
    fn lock(&self) -> MutexGuard<'_, Subscribers> {
        self.subscribers.lock().unwrap_or_else(|e| {
            error!("Subscriber list lock poisoned, recovering: {}", e);
            e.into_inner()
        })
    }
}

impl Subscription {
    /// Id to pass to [`SignalBus::unsubscribe`].
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Wait for the next signal. Returns `None` once unsubscribed and drained.
    pub async fn recv(&mut self) -> Option<Signal> {
        self.rx.recv().await
    }

    /// Take the next queued signal without waiting.
    pub fn try_recv(&mut self) -> Option<Signal> {
        self.rx.try_recv().ok()
    }

    /// Take every queued signal without waiting.
    pub fn drain(&mut self) -> Vec<Signal> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}
