//! Lockwatch storage - persistence layer for the shared locker record.
//!
//! This crate provides the persistence layer for Lockwatch, using redb as the
//! embedded database. It follows a simple key-value design with one table per
//! entity type; the only entity today is the locker record.

pub mod locker;

use anyhow::Result;
use redb::Database;
use std::sync::Arc;

pub use locker::{LockerRecord, LockerStorage};

/// Central storage manager that initializes all storage subsystems
pub struct Storage {
    db: Arc<Database>,
    pub locker: LockerStorage,
}

impl Storage {
    /// Create a new storage instance at the given path.
    ///
    /// This will create the database file if it doesn't exist and initialize
    /// all required tables.
    pub fn new(path: &str) -> Result<Self> {
        let db = Arc::new(Database::create(path)?);

        let locker = LockerStorage::new(db.clone())?;

        Ok(Self { db, locker })
    }

    /// Get a reference to the underlying database
    pub fn get_db(&self) -> Arc<Database> {
        self.db.clone()
    }
}
