//! Error taxonomy for the control core
//!
//! Everything here is returned to the caller (typically the API layer) as
//! a structured result; nothing in this crate panics on bad input or
//! crashes the control loop.

use crate::store::StorageError;

/// Errors reported by profile, heater, and runner operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Phase has a non-positive or non-finite duration
    InvalidPhase,
    /// Profile has no phases
    InvalidProfile,
    /// No profile with the requested name
    UnknownProfile,
    /// Operation is not legal in the current runner state
    InvalidTransition,
    /// Target temperature outside the configured limits
    OutOfRange,
    /// Persistence failure; in-memory state is still applied
    Storage(StorageError),
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        Error::Storage(err)
    }
}
