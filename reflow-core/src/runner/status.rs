//! Runner status surface
//!
//! The snapshot consumed by the API layer and the display. Every field
//! is a pure function of the runner state at the queried instant.

use heapless::String;

use crate::profile::MAX_NAME_LEN;

/// Execution status plus UI affordance flags
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunnerStatus {
    /// Selected profile, running or not
    pub active_profile_name: Option<String<MAX_NAME_LEN>>,
    pub is_running: bool,

    /// Current phase name while running; a "Stopped" placeholder while
    /// selected but not running
    pub current_phase: Option<String<MAX_NAME_LEN>>,
    pub current_phase_index: usize,
    pub total_phases: usize,
    /// Target temperature while running
    pub target_temp: Option<f32>,
    pub elapsed_minutes: f32,
    pub total_minutes: f32,
    /// 0-100, saturating at 100 once past the total duration
    pub progress_percent: f32,

    // UI affordances, each derivable from the state above but published
    // explicitly so thin clients don't re-encode the state machine
    pub can_select: bool,
    pub can_create: bool,
    pub can_run: bool,
    pub can_stop: bool,
    pub can_clear: bool,
    pub show_graph: bool,
    pub show_clear_button: bool,
}

impl RunnerStatus {
    /// Status of an idle runner (no active profile)
    pub(crate) fn idle() -> Self {
        Self {
            active_profile_name: None,
            is_running: false,
            current_phase: None,
            current_phase_index: 0,
            total_phases: 0,
            target_temp: None,
            elapsed_minutes: 0.0,
            total_minutes: 0.0,
            progress_percent: 0.0,
            can_select: true,
            can_create: true,
            can_run: false,
            can_stop: false,
            can_clear: false,
            show_graph: false,
            show_clear_button: false,
        }
    }
}
