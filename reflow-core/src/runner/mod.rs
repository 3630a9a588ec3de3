//! Profile runner
//!
//! Owns the set of known profiles and the single active selection, and
//! tracks the run lifecycle: idle → selected → running, with automatic
//! return to selected on completion.

pub mod manager;
pub mod samples;
pub mod status;

pub use manager::{PhaseSpec, ProfileRunner};
pub use samples::{Sample, SampleBuffer, MIN_SAMPLE_SPACING_MIN, SAMPLE_CAPACITY};
pub use status::RunnerStatus;
