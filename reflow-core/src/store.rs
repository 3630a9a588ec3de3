//! Profile persistence abstraction
//!
//! The core does not assume a storage medium. Backends implement
//! [`ProfileStore`] over plain [`ProfileRecord`]s; the records are
//! serde-derived so a backend can store them as postcard binary (flash)
//! or JSON files (host), and they round-trip losslessly either way.
//! Storage failures are never fatal on the control path: the in-memory
//! profile set is the source of truth during a session.

use heapless::{String, Vec};

use crate::error::Error;
use crate::profile::{bounded_name, Phase, Profile, MAX_NAME_LEN, MAX_PHASES};

/// Maximum profiles held by a store / the runner
pub const MAX_PROFILES: usize = 8;

/// Maximum length of a sanitized storage key
pub const MAX_KEY_LEN: usize = 32;

/// Buffer size sufficient for any postcard-encoded [`ProfileRecord`]
pub const RECORD_BUF_LEN: usize = 512;

/// Persistence failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Backend could not be read
    ReadFailed,
    /// Record could not be written
    WriteFailed,
    /// Record could not be deleted
    DeleteFailed,
    /// Stored bytes did not decode to a record
    Corrupted,
    /// Store is at capacity
    Full,
}

/// Persisted phase fields, exactly as specified by the record format
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhaseRecord {
    pub name: String<MAX_NAME_LEN>,
    pub start_temp: f32,
    pub end_temp: f32,
    pub duration_minutes: f32,
}

/// Persisted profile record: `{name, phases: [...]}`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProfileRecord {
    pub name: String<MAX_NAME_LEN>,
    pub phases: Vec<PhaseRecord, MAX_PHASES>,
}

impl From<&Profile> for ProfileRecord {
    fn from(profile: &Profile) -> Self {
        let mut phases = Vec::new();
        for phase in profile.phases() {
            let _ = phases.push(PhaseRecord {
                name: phase.name.clone(),
                start_temp: phase.start_temp,
                end_temp: phase.end_temp,
                duration_minutes: phase.duration_minutes,
            });
        }
        Self {
            name: bounded_name(profile.name()),
            phases,
        }
    }
}

impl ProfileRecord {
    /// Reconstruct a profile through the normal validated constructors
    ///
    /// A stored record that fails validation (hand-edited file, version
    /// skew) is rejected, not patched up.
    pub fn to_profile(&self) -> Result<Profile, Error> {
        let mut phases = Vec::new();
        for record in &self.phases {
            let phase = Phase::new(
                &record.name,
                record.start_temp,
                record.end_temp,
                record.duration_minutes,
            )?;
            phases.push(phase).map_err(|_| Error::InvalidProfile)?;
        }
        Profile::new(&self.name, phases)
    }

    /// Encode as postcard binary into `buf`, returning the used slice
    #[cfg(feature = "serde")]
    pub fn to_postcard<'a>(&self, buf: &'a mut [u8]) -> Result<&'a [u8], StorageError> {
        postcard::to_slice(self, buf)
            .map(|used| &*used)
            .map_err(|_| StorageError::WriteFailed)
    }

    /// Decode a postcard-encoded record
    #[cfg(feature = "serde")]
    pub fn from_postcard(bytes: &[u8]) -> Result<Self, StorageError> {
        postcard::from_bytes(bytes).map_err(|_| StorageError::Corrupted)
    }
}

/// Storage backend for profile records
///
/// Keys are derived deterministically from profile names via
/// [`storage_key`]; `delete` takes the raw profile name and the backend
/// applies the same derivation.
pub trait ProfileStore {
    /// Load every stored record
    fn load_all(&mut self) -> Result<Vec<ProfileRecord, MAX_PROFILES>, StorageError>;

    /// Persist one record, replacing any record with the same name
    fn save(&mut self, record: &ProfileRecord) -> Result<(), StorageError>;

    /// Remove the record for `name`; removing a missing record is not an
    /// error
    fn delete(&mut self, name: &str) -> Result<(), StorageError>;
}

/// A store that persists nothing
///
/// For tests and volatile setups where profiles live only in memory.
#[derive(Debug, Default)]
pub struct NullStore;

impl ProfileStore for NullStore {
    fn load_all(&mut self) -> Result<Vec<ProfileRecord, MAX_PROFILES>, StorageError> {
        Ok(Vec::new())
    }

    fn save(&mut self, _record: &ProfileRecord) -> Result<(), StorageError> {
        Ok(())
    }

    fn delete(&mut self, _name: &str) -> Result<(), StorageError> {
        Ok(())
    }
}

/// Derive a filesystem-safe storage key from a profile name
///
/// Lower-cased, spaces and `/` replaced by underscores, truncated to
/// [`MAX_KEY_LEN`]. Deterministic so save and delete always agree.
pub fn storage_key(name: &str) -> String<MAX_KEY_LEN> {
    let mut key = String::new();
    for ch in name.chars() {
        let mapped = match ch {
            ' ' | '/' => '_',
            c => c.to_ascii_lowercase(),
        };
        if key.push(mapped).is_err() {
            break;
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::example_profiles;

    #[test]
    fn storage_key_sanitization() {
        assert_eq!(storage_key("Lead-free Reflow").as_str(), "lead-free_reflow");
        assert_eq!(storage_key("a/b c").as_str(), "a_b_c");
        assert_eq!(
            storage_key("An Extremely Long Profile Name Indeed").as_str(),
            "an_extremely_long_profile_name_i"
        );
    }

    #[test]
    fn record_preserves_fields() {
        let profiles = example_profiles();
        let profile = &profiles[0];
        let record = ProfileRecord::from(profile);

        assert_eq!(record.name.as_str(), profile.name());
        assert_eq!(record.phases.len(), profile.phases().len());
        for (rec, phase) in record.phases.iter().zip(profile.phases()) {
            assert_eq!(rec.name, phase.name);
            assert_eq!(rec.start_temp, phase.start_temp);
            assert_eq!(rec.end_temp, phase.end_temp);
            assert_eq!(rec.duration_minutes, phase.duration_minutes);
        }
    }

    #[test]
    fn record_reconstructs_via_validation() {
        let profiles = example_profiles();
        let record = ProfileRecord::from(&profiles[1]);
        let rebuilt = record.to_profile().unwrap();

        assert_eq!(rebuilt, profiles[1]);
    }

    #[test]
    fn invalid_record_rejected() {
        let mut record = ProfileRecord::from(&example_profiles()[1]);
        record.phases[0].duration_minutes = 0.0;
        assert_eq!(record.to_profile(), Err(Error::InvalidPhase));

        record.phases.clear();
        assert_eq!(record.to_profile(), Err(Error::InvalidProfile));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn postcard_round_trip() {
        let profiles = example_profiles();
        let record = ProfileRecord::from(&profiles[0]);

        let mut buf = [0u8; RECORD_BUF_LEN];
        let bytes = record.to_postcard(&mut buf).unwrap();
        let decoded = ProfileRecord::from_postcard(bytes).unwrap();

        assert_eq!(decoded, record);
        assert_eq!(decoded.to_profile().unwrap(), profiles[0]);
    }
}
