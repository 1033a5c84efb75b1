use alloy::primitives::Address;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};

type AccountsSender = UnboundedSender<Vec<Address>>;

#[derive(Debug, Default)]
struct ListenerTable {
    next_id: u64,
    senders: HashMap<u64, AccountsSender>,
}

/// Registry of account-change listeners held by a wallet provider.
#[derive(Debug, Clone, Default)]
pub struct AccountListeners {
    table: Arc<Mutex<ListenerTable>>,
}

impl AccountListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> AccountSubscription {
        let (sender, receiver) = mpsc::unbounded_channel();
        let id = {
            let mut table = self.table.lock();
            let id = table.next_id;
            table.next_id += 1;
            table.senders.insert(id, sender);
            id
        };

        tracing::debug!("Registered account listener {}", id);
        AccountSubscription {
            id,
            table: Arc::downgrade(&self.table),
            receiver,
        }
    }

    /// Deliver an `accountsChanged` notification to every live listener.
    pub fn notify(&self, accounts: &[Address]) {
        let mut table = self.table.lock();
        table
            .senders
            .retain(|_, sender| sender.send(accounts.to_vec()).is_ok());
    }

    pub fn len(&self) -> usize {
        self.table.lock().senders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A registered account-change listener.
///
/// Dropping it unregisters the listener from the provider.
#[derive(Debug)]
pub struct AccountSubscription {
    id: u64,
    table: Weak<Mutex<ListenerTable>>,
    receiver: UnboundedReceiver<Vec<Address>>,
}

impl AccountSubscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Next queued notification, if any, without waiting.
    pub fn try_next(&mut self) -> Option<Vec<Address>> {
        match self.receiver.try_recv() {
            Ok(accounts) => Some(accounts),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Wait for the next notification. `None` once the provider is gone.
    pub async fn next(&mut self) -> Option<Vec<Address>> {
        self.receiver.recv().await
    }
}

impl Drop for AccountSubscription {
    fn drop(&mut self) {
        if let Some(table) = self.table.upgrade() {
            table.lock().senders.remove(&self.id);
            tracing::debug!("Released account listener {}", self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn test_notify_reaches_subscribers() {
        let listeners = AccountListeners::new();
        let mut first = listeners.subscribe();
        let mut second = listeners.subscribe();
        assert_ne!(first.id(), second.id());

        let account = address!("0x2222222222222222222222222222222222222222");
        listeners.notify(&[account]);

        assert_eq!(first.try_next(), Some(vec![account]));
        assert_eq!(second.try_next(), Some(vec![account]));
        assert_eq!(first.try_next(), None);
    }

    #[test]
    fn test_drop_unregisters() {
        let listeners = AccountListeners::new();
        let subscription = listeners.subscribe();
        assert_eq!(listeners.len(), 1);

        drop(subscription);
        assert!(listeners.is_empty());

        // notifying with no listeners is a no-op
        listeners.notify(&[]);
    }

    #[tokio::test]
    async fn test_next_waits_for_notification() {
        let listeners = AccountListeners::new();
        let mut subscription = listeners.subscribe();

        let notifier = listeners.clone();
        tokio::spawn(async move {
            notifier.notify(&[]);
        });

        assert_eq!(subscription.next().await, Some(vec![]));
    }
}
