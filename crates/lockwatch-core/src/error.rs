use thiserror::Error;

/// Rejected locker number input.
///
/// Locker numbers are digit-only identifiers; anything else must never reach
/// the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("locker number must contain only digits")]
pub struct InvalidLockerNumber;
