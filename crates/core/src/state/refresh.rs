use tokio::sync::watch;
use tracing::debug;

/// Counter-based "something changed, re-fetch everything" signal.
///
/// Every successful mutating action bumps the counter once. Subscribers
/// react to the value changing, never to its magnitude. There is no
/// payload and no topic filtering: every subscriber re-fetches.
#[derive(Debug, Clone)]
pub struct RefreshBroadcaster {
    sender: watch::Sender<u64>,
}

impl RefreshBroadcaster {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(0);
        Self { sender }
    }

    /// Increment the counter and wake every subscriber.
    pub fn trigger_refresh(&self) {
        self.sender.send_modify(|count| *count = count.wrapping_add(1));
        debug!(count = *self.sender.borrow(), "Refresh triggered");
    }

    /// Current counter value.
    #[must_use]
    pub fn current(&self) -> u64 {
        *self.sender.borrow()
    }

    /// A receiver that marks the current value as already seen.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.sender.subscribe()
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for RefreshBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}
