mod signal;
mod signal_bus;

pub use {
    signal::{AudioHandle, Signal, StreamResult, UserIntent},
    signal_bus::{SignalBus, SubscriberId, Subscription},
};
