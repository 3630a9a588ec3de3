//! Built-in example profiles
//!
//! Used to seed an empty profile store on first boot and as realistic
//! fixtures in tests.

use heapless::Vec;

use super::phase::Phase;
use super::profile::Profile;

/// Phase spec: (name, start °C, end °C, duration minutes)
type Spec = (&'static str, f32, f32, f32);

const LEAD_FREE: &[Spec] = &[
    ("Preheat", 25.0, 150.0, 4.0),
    ("Soak", 150.0, 180.0, 2.0),
    ("Reflow", 180.0, 245.0, 1.5),
    ("Peak", 245.0, 245.0, 0.5),
    ("Cooling", 245.0, 100.0, 2.4), // ~60°C/min cooling
];

const TEST: &[Spec] = &[
    ("Warm up", 25.0, 50.0, 2.0),
    ("Hold", 50.0, 50.0, 1.0),
    ("Cool down", 50.0, 25.0, 2.0),
];

fn build(name: &str, specs: &[Spec]) -> Option<Profile> {
    let mut phases = Vec::new();
    for &(phase_name, start, end, duration) in specs {
        let phase = Phase::new(phase_name, start, end, duration).ok()?;
        phases.push(phase).ok()?;
    }
    Profile::new(name, phases).ok()
}

/// The built-in example profiles
///
/// A realistic lead-free reflow curve and a short low-temperature profile
/// for exercising the oven without solder.
pub fn example_profiles() -> Vec<Profile, 2> {
    let mut out = Vec::new();
    if let Some(profile) = build("Lead-free Reflow", LEAD_FREE) {
        let _ = out.push(profile);
    }
    if let Some(profile) = build("Test Profile", TEST) {
        let _ = out.push(profile);
    }
    out
}
