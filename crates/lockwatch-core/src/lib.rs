//! Lockwatch core - domain logic for the shared locker countdown service.
//!
//! The pieces here are deliberately small: a validated locker number, a
//! service that syncs it between the store and live subscribers, a countdown
//! state machine with a per-viewer presenter, and the admin gate that guards
//! updates behind a credential check.

pub mod auth;
pub mod countdown;
pub mod error;
pub mod gate;
pub mod number;
pub mod service;

pub use auth::{CredentialVerifier, StaticSecretVerifier};
pub use countdown::{Countdown, CountdownPresenter, CountdownSnapshot, TimeLeft};
pub use error::InvalidLockerNumber;
pub use gate::{AdminGate, GateState};
pub use number::{DEFAULT_LOCKER_NUMBER, LockerNumber};
pub use service::{LockerService, LockerSubscription, LockerUpdate};

use anyhow::Result;
use lockwatch_storage::Storage;
use std::sync::Arc;
use tracing::{info, warn};

/// Core application state shared between the HTTP handlers and the viewer
/// streams.
pub struct AppCore {
    pub storage: Arc<Storage>,
    pub locker: LockerService,
    pub verifier: Arc<dyn CredentialVerifier>,
}

impl AppCore {
    pub fn new(db_path: &str, admin_secret: Option<&str>) -> Result<Self> {
        let storage = Arc::new(Storage::new(db_path)?);
        let locker = LockerService::new(storage.clone());

        // Materialize the default record up front so the first viewer render
        // never depends on write availability.
        let current = locker.read();
        info!("Current locker number: {}", current);

        let verifier: Arc<dyn CredentialVerifier> = match admin_secret {
            Some(secret) if !secret.trim().is_empty() => {
                Arc::new(StaticSecretVerifier::new(secret))
            }
            _ => {
                warn!("No admin secret configured; locker updates are disabled");
                Arc::new(StaticSecretVerifier::disabled())
            }
        };

        Ok(Self {
            storage,
            locker,
            verifier,
        })
    }
}
