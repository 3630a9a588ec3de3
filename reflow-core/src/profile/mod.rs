//! Temperature profiles
//!
//! A profile is an ordered sequence of phases, each a linear temperature
//! ramp or hold with a duration. Profiles are immutable once constructed
//! and validated at the boundary.

pub mod examples;
pub mod graph;
pub mod phase;
#[allow(clippy::module_inception)]
pub mod profile;

pub use examples::example_profiles;
pub use graph::{graph_points, GraphPoint, MAX_GRAPH_POINTS};
pub use phase::Phase;
pub use profile::{ContinuityGap, PhaseTarget, Profile, CONTINUITY_TOLERANCE_C, MAX_PHASES};

/// Maximum length of phase and profile names
pub const MAX_NAME_LEN: usize = 32;

/// Copy `name` into a bounded string, truncating at a character boundary
/// if it is too long.
pub(crate) fn bounded_name(name: &str) -> heapless::String<MAX_NAME_LEN> {
    let mut out = heapless::String::new();
    for ch in name.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}
