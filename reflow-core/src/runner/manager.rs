//! Profile runner state machine
//!
//! Three observable states:
//!
//! - idle: no active profile
//! - selected: a profile is chosen but not executing
//! - running: elapsed time advances and targets are produced
//!
//! A running profile that reaches its total duration auto-stops back to
//! selected (never silently to idle) so the finished run can still be
//! inspected and graphed.

use heapless::{String, Vec};

use super::samples::SampleBuffer;
use super::status::RunnerStatus;
use crate::error::Error;
use crate::profile::{
    bounded_name, example_profiles, graph_points, GraphPoint, Phase, Profile, MAX_GRAPH_POINTS,
    MAX_NAME_LEN, MAX_PHASES,
};
use crate::store::{ProfileRecord, ProfileStore, StorageError};

/// Input for building one phase of a new profile
#[derive(Debug, Clone, Copy)]
pub struct PhaseSpec<'a> {
    pub name: &'a str,
    pub start_temp: f32,
    pub end_temp: f32,
    pub duration_minutes: f32,
}

/// Profile store owner and run-state tracker
///
/// All time is injected as monotonic milliseconds; the runner never reads
/// a clock itself.
pub struct ProfileRunner<S> {
    store: S,
    profiles: Vec<Profile, { crate::store::MAX_PROFILES }>,
    active_profile: Option<String<MAX_NAME_LEN>>,
    is_running: bool,
    start_time_ms: Option<u64>,
    elapsed_minutes: f32,
    samples: SampleBuffer,
}

impl<S: ProfileStore> ProfileRunner<S> {
    /// Create a runner backed by `store`
    ///
    /// Loads every stored record (individually fallible; a corrupt record
    /// is skipped, not fatal) and seeds the example profiles when the
    /// store turns out empty.
    pub fn new(store: S) -> Self {
        let mut runner = Self {
            store,
            profiles: Vec::new(),
            active_profile: None,
            is_running: false,
            start_time_ms: None,
            elapsed_minutes: 0.0,
            samples: SampleBuffer::new(),
        };
        runner.load_profiles();
        if runner.profiles.is_empty() {
            runner.seed_examples();
        }
        runner
    }

    fn load_profiles(&mut self) {
        match self.store.load_all() {
            Ok(records) => {
                self.profiles.clear();
                for record in &records {
                    match record.to_profile() {
                        Ok(profile) => {
                            warn_continuity_gaps(&profile);
                            let _ = self.profiles.push(profile);
                        }
                        Err(_e) => {
                            warn!(
                                "skipping invalid stored profile '{}'",
                                record.name.as_str()
                            );
                        }
                    }
                }
                info!("loaded {} profiles", self.profiles.len());
            }
            Err(_e) => {
                warn!("profile store unreadable, starting with no profiles");
            }
        }
    }

    fn seed_examples(&mut self) {
        for profile in example_profiles() {
            if let Err(_e) = self.store.save(&ProfileRecord::from(&profile)) {
                warn!("could not persist example profile '{}'", profile.name());
            }
            let _ = self.profiles.push(profile);
        }
        info!("seeded {} example profiles", self.profiles.len());
    }

    fn find(&self, name: &str) -> Option<usize> {
        self.profiles.iter().position(|p| p.name() == name)
    }

    fn active_index(&self) -> Option<usize> {
        let name = self.active_profile.as_ref()?;
        self.find(name)
    }

    fn clear_run_state(&mut self) {
        self.active_profile = None;
        self.is_running = false;
        self.start_time_ms = None;
        self.elapsed_minutes = 0.0;
        self.samples.clear();
    }

    // --- queries ---------------------------------------------------------

    /// Names of all known profiles
    pub fn profile_names(&self) -> impl Iterator<Item = &str> {
        self.profiles.iter().map(|p| p.name())
    }

    /// Look up a profile by name
    pub fn profile(&self, name: &str) -> Option<&Profile> {
        self.find(name).map(|i| &self.profiles[i])
    }

    /// Name of the currently selected profile, if any
    pub fn active_profile_name(&self) -> Option<&str> {
        self.active_profile.as_deref()
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    /// Elapsed run time as of the last `tick`
    pub fn elapsed_minutes(&self) -> f32 {
        self.elapsed_minutes
    }

    /// Collected temperature series of the current (or last) run
    pub fn temperature_series(&self) -> &SampleBuffer {
        &self.samples
    }

    // --- UI affordances --------------------------------------------------

    pub fn can_select(&self) -> bool {
        self.active_profile.is_none()
    }

    pub fn can_create(&self) -> bool {
        self.active_profile.is_none()
    }

    pub fn can_run(&self) -> bool {
        self.active_profile.is_some() && !self.is_running
    }

    pub fn can_stop(&self) -> bool {
        self.active_profile.is_some() && self.is_running
    }

    pub fn can_clear(&self) -> bool {
        self.active_profile.is_some() && !self.is_running
    }

    pub fn show_graph(&self) -> bool {
        self.active_profile.is_some()
    }

    pub fn show_clear_button(&self) -> bool {
        self.can_clear()
    }

    // --- state transitions -----------------------------------------------

    /// Select a profile, making it active but not running
    ///
    /// Legal whenever nothing is running; re-selecting while selected
    /// resets the run state. Clears previously collected samples.
    pub fn activate(&mut self, name: &str) -> Result<(), Error> {
        if self.is_running {
            return Err(Error::InvalidTransition);
        }
        if self.find(name).is_none() {
            return Err(Error::UnknownProfile);
        }

        self.samples.clear();
        self.active_profile = Some(bounded_name(name));
        self.is_running = false;
        self.start_time_ms = None;
        self.elapsed_minutes = 0.0;

        info!("activated profile '{}'", name);
        Ok(())
    }

    /// Clear the active profile and all run state
    ///
    /// Must not be called while running; stop first.
    pub fn deactivate(&mut self) -> Result<(), Error> {
        if self.is_running {
            return Err(Error::InvalidTransition);
        }

        info!("deactivated profile");
        self.clear_run_state();
        Ok(())
    }

    /// Start executing the active profile at `now_ms`
    pub fn start(&mut self, now_ms: u64) -> Result<(), Error> {
        if self.active_profile.is_none() || self.is_running {
            return Err(Error::InvalidTransition);
        }

        self.is_running = true;
        self.start_time_ms = Some(now_ms);
        self.elapsed_minutes = 0.0;
        self.samples.clear();

        info!("started profile '{}'", self.active_profile_name().unwrap_or(""));
        Ok(())
    }

    /// Stop the running profile, keeping it selected
    ///
    /// Elapsed time and collected samples are preserved for inspection.
    pub fn stop(&mut self) -> Result<(), Error> {
        if !self.is_running {
            return Err(Error::InvalidTransition);
        }

        self.is_running = false;
        info!("stopped profile '{}'", self.active_profile_name().unwrap_or(""));
        Ok(())
    }

    /// Advance the run and return the current target temperature
    ///
    /// No-op unless running. Auto-stops (running → selected) when the
    /// profile completes and returns no target so the heater disarms.
    pub fn tick(&mut self, now_ms: u64) -> Option<f32> {
        if !self.is_running {
            return None;
        }
        let start = self.start_time_ms?;

        let Some(index) = self.active_index() else {
            // The active profile disappeared from the store mid-run
            warn!("active profile missing, stopping run");
            self.is_running = false;
            return None;
        };

        self.elapsed_minutes = minutes_between(start, now_ms);

        let profile = &self.profiles[index];
        if profile.is_complete(self.elapsed_minutes) {
            info!(
                "profile '{}' completed after {} min",
                profile.name(),
                self.elapsed_minutes
            );
            self.is_running = false;
            return None;
        }

        Some(profile.phase_and_target(self.elapsed_minutes).target_temp)
    }

    /// Record a temperature sample at `now_ms`
    ///
    /// Collection requires an active profile with a start time; the
    /// running flag does not matter, so a stopped-but-selected run keeps
    /// its series inspectable while further readings continue to land on
    /// its timeline.
    pub fn record_sample(&mut self, temperature: f32, now_ms: u64) {
        if self.active_profile.is_none() {
            return;
        }
        let Some(start) = self.start_time_ms else {
            return;
        };

        let elapsed = minutes_between(start, now_ms);
        self.samples.record(elapsed, temperature);
    }

    /// Drop the collected temperature series
    pub fn clear_samples(&mut self) {
        self.samples.clear();
    }

    // --- profile CRUD ----------------------------------------------------

    /// Build, index, and persist a new profile from phase specs
    ///
    /// Replaces an existing profile with the same name. A persistence
    /// failure is reported but the in-memory profile set keeps the new
    /// profile (it is the source of truth for the session).
    pub fn create(&mut self, name: &str, phases: &[PhaseSpec<'_>]) -> Result<(), Error> {
        let mut built: Vec<Phase, MAX_PHASES> = Vec::new();
        for spec in phases {
            let phase = Phase::new(
                spec.name,
                spec.start_temp,
                spec.end_temp,
                spec.duration_minutes,
            )?;
            built.push(phase).map_err(|_| Error::InvalidProfile)?;
        }
        let profile = Profile::new(name, built)?;
        warn_continuity_gaps(&profile);

        let record = ProfileRecord::from(&profile);
        match self.find(profile.name()) {
            Some(index) => self.profiles[index] = profile,
            None => self
                .profiles
                .push(profile)
                .map_err(|_| Error::Storage(StorageError::Full))?,
        }
        info!("created profile '{}'", name);

        self.store.save(&record).map_err(Error::Storage)
    }

    /// Remove a profile from the store
    ///
    /// Deleting the active profile stops any run and forces the runner
    /// back to idle. A persistence failure is reported but the in-memory
    /// removal stands.
    pub fn delete(&mut self, name: &str) -> Result<(), Error> {
        let index = self.find(name).ok_or(Error::UnknownProfile)?;

        if self.active_profile.as_deref() == Some(name) {
            if self.is_running {
                info!("stopping run before deleting active profile");
            }
            self.clear_run_state();
        }

        self.profiles.remove(index);
        info!("deleted profile '{}'", name);

        self.store.delete(name).map_err(Error::Storage)
    }

    // --- projections -----------------------------------------------------

    /// Representative graph points for a stored profile
    pub fn graph_data(&self, name: &str) -> Result<Vec<GraphPoint, MAX_GRAPH_POINTS>, Error> {
        let index = self.find(name).ok_or(Error::UnknownProfile)?;
        Ok(graph_points(&self.profiles[index]))
    }

    /// Full status snapshot at `now_ms`
    pub fn status(&self, now_ms: u64) -> RunnerStatus {
        let Some(index) = self.active_index() else {
            return RunnerStatus::idle();
        };
        let profile = &self.profiles[index];

        let elapsed = if self.is_running {
            self.start_time_ms
                .map(|start| minutes_between(start, now_ms))
                .unwrap_or(self.elapsed_minutes)
        } else {
            self.elapsed_minutes
        };

        let (phase_name, phase_index, target_temp) = if self.is_running {
            let target = profile.phase_and_target(elapsed);
            (
                profile.phase_name(target.phase_index).unwrap_or(""),
                target.phase_index,
                Some(target.target_temp),
            )
        } else {
            ("Stopped", 0, None)
        };

        let total = profile.total_duration();
        let progress_percent = if total > 0.0 {
            ((elapsed / total) * 100.0).min(100.0)
        } else {
            0.0
        };

        RunnerStatus {
            active_profile_name: self.active_profile.clone(),
            is_running: self.is_running,
            current_phase: Some(bounded_name(phase_name)),
            current_phase_index: phase_index,
            total_phases: profile.phases().len(),
            target_temp,
            elapsed_minutes: elapsed,
            total_minutes: total,
            progress_percent,
            can_select: self.can_select(),
            can_create: self.can_create(),
            can_run: self.can_run(),
            can_stop: self.can_stop(),
            can_clear: self.can_clear(),
            show_graph: self.show_graph(),
            show_clear_button: self.show_clear_button(),
        }
    }
}

fn warn_continuity_gaps(profile: &Profile) {
    for gap in profile.continuity_gaps() {
        warn!(
            "profile '{}': phase {} ends at {}°C but the next starts at {}°C",
            profile.name(),
            gap.phase_index,
            gap.end_temp,
            gap.next_start_temp
        );
    }
}

fn minutes_between(start_ms: u64, now_ms: u64) -> f32 {
    now_ms.saturating_sub(start_ms) as f32 / 60_000.0
}
