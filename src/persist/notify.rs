//! Change broadcasting for persisted values.

use serde_json::Value;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

/// Payload delivered to subscribers after a successful write.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    /// The store key that changed.
    pub key: String,
    /// The newly written value, or `None` when the entry was removed.
    pub value: Option<Value>,
}

/// Broadcast hub posting one [`ChangeEvent`] per successful write.
///
/// A notifier is scoped to the wrappers it is explicitly attached to; there
/// is no process-wide channel namespace. Cloning shares the subscriber
/// list, so one notifier can serve several wrappers and be observed from
/// one place.
#[derive(Debug, Clone, Default)]
pub struct ChangeNotifier {
    subscribers: Arc<Mutex<Vec<Sender<ChangeEvent>>>>,
}

impl ChangeNotifier {
    pub fn new() -> ChangeNotifier {
        ChangeNotifier::default()
    }

    /// Register a listener. Dropped receivers are pruned on the next post.
    pub fn subscribe(&self) -> Receiver<ChangeEvent> {
        let (sender, receiver) = mpsc::channel();
        self.subscribers
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(sender);
        receiver
    }

    pub(crate) fn post(&self, key: &str, value: Option<Value>) {
        let event = ChangeEvent {
            key: key.to_owned(),
            value,
        };
        let mut subscribers = self.subscribers.lock().unwrap_or_else(|p| p.into_inner());
        subscribers.retain(|sender| sender.send(event.clone()).is_ok());
    }
}
