//! Shared locker value service: persistence plus live update fan-out.

use crate::number::LockerNumber;
use lockwatch_storage::{LockerRecord, Storage};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::warn;

const UPDATE_BUFFER: usize = 256;

/// A confirmed change to the shared locker number.
#[derive(Debug, Clone)]
pub struct LockerUpdate {
    pub number: LockerNumber,
}

/// Wraps the locker store with normalization and a broadcast update bus.
///
/// Read and write absorb storage failures: the countdown page keeps rendering
/// a previously-valid value rather than surfacing a transport error.
#[derive(Clone)]
pub struct LockerService {
    storage: Arc<Storage>,
    updates: broadcast::Sender<LockerUpdate>,
}

impl LockerService {
    pub fn new(storage: Arc<Storage>) -> Self {
        let (updates, _receiver) = broadcast::channel(UPDATE_BUFFER);
        Self { storage, updates }
    }

    /// Current number, materializing the default if the record is absent.
    ///
    /// Never fails outward: storage errors and invalid stored values both
    /// degrade to the default.
    pub fn read(&self) -> LockerNumber {
        let default = LockerRecord {
            number: LockerNumber::default().as_str().to_string(),
        };

        match self.storage.locker.get_or_init(&default) {
            Ok(record) => match LockerNumber::parse(&record.number) {
                Ok(number) => number,
                Err(_) => {
                    warn!(
                        "Stored locker number {:?} is not digit-only, using default",
                        record.number
                    );
                    LockerNumber::default()
                }
            },
            Err(e) => {
                warn!("Failed to read locker record: {}", e);
                LockerNumber::default()
            }
        }
    }

    /// Write a validated number. Publishes to subscribers on success.
    ///
    /// Returns `false` on storage failure; no retry is attempted.
    pub fn write(&self, number: &LockerNumber) -> bool {
        let record = LockerRecord {
            number: number.as_str().to_string(),
        };

        match self.storage.locker.put(&record) {
            Ok(()) => {
                let _ = self.updates.send(LockerUpdate {
                    number: number.clone(),
                });
                true
            }
            Err(e) => {
                warn!("Failed to write locker record: {}", e);
                false
            }
        }
    }

    /// Register a listener.
    ///
    /// The current value is captured at registration time and available
    /// immediately via [`LockerSubscription::current`]; every subsequent
    /// confirmed write, including this client's own, arrives through
    /// [`LockerSubscription::recv`].
    pub fn subscribe(&self) -> LockerSubscription {
        let receiver = self.updates.subscribe();
        LockerSubscription {
            current: self.read(),
            receiver: Some(receiver),
        }
    }
}

/// Live subscription to locker updates.
pub struct LockerSubscription {
    current: LockerNumber,
    receiver: Option<broadcast::Receiver<LockerUpdate>>,
}

impl LockerSubscription {
    /// Value captured at registration time.
    pub fn current(&self) -> &LockerNumber {
        &self.current
    }

    /// Next pushed update, or `None` once detached or the service is gone.
    ///
    /// A lagged receiver skips ahead to the oldest retained update instead of
    /// failing.
    pub async fn recv(&mut self) -> Option<LockerUpdate> {
        let receiver = self.receiver.as_mut()?;
        loop {
            match receiver.recv().await {
                Ok(update) => return Some(update),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Locker subscription lagged, skipped {} updates", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => {
                    self.receiver = None;
                    return None;
                }
            }
        }
    }

    /// Detach from the bus. Calling this more than once is a no-op.
    pub fn unsubscribe(&mut self) {
        self.receiver = None;
    }
}
