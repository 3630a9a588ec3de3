//! Interactive emulator session
//!
//! Wires the full control loop to the simulated oven and exposes the
//! controller's operations as REPL commands. Time is simulated: it only
//! advances through `step` and `run`, so sessions are deterministic and
//! a 10-minute reflow run takes milliseconds.

use std::path::PathBuf;

use reflow_core::control::{ControlLoop, LoopStatus, LOOP_PERIOD_MS};
use reflow_core::heater::Heater;
use reflow_core::runner::{PhaseSpec, ProfileRunner};
use reflow_core::traits::SensorError;

use crate::plant::PlantHandle;
use crate::store::JsonDirStore;

pub const HELP_TOPICS: &[(&str, &str)] = &[
    ("status", "status                         - controller and oven state"),
    ("profiles", "profiles                       - list stored profiles"),
    ("activate", "activate <name>                - select a profile"),
    ("deactivate", "deactivate                     - clear the selection"),
    ("start", "start                          - run the selected profile"),
    ("stop", "stop                           - stop the current run"),
    ("clear", "clear                          - drop collected samples"),
    (
        "create",
        "create <name> <n:start:end:min>... - build and store a profile",
    ),
    ("delete", "delete <name>                  - remove a stored profile"),
    ("graph", "graph <name>                   - profile graph points"),
    ("temps", "temps                          - collected temperature samples"),
    ("step", "step [n]                       - advance n control ticks (default 1)"),
    ("run", "run <seconds>                  - advance simulated time"),
    ("fault", "fault [open|clear]             - inject or clear a sensor fault"),
    ("hysteresis", "hysteresis <celsius>           - set the heater band"),
    ("help", "help [topic]                   - show help for a command"),
];

pub struct Session {
    ctrl: ControlLoop<PlantHandle, PlantHandle, JsonDirStore>,
    plant: PlantHandle,
    now_ms: u64,
}

impl Session {
    pub fn new(profile_dir: PathBuf) -> Self {
        let plant = PlantHandle::new();
        let runner = ProfileRunner::new(JsonDirStore::new(profile_dir));
        let ctrl = ControlLoop::new(plant.clone(), plant.clone(), Heater::default(), runner);

        Self {
            ctrl,
            plant,
            now_ms: 0,
        }
    }

    pub fn handle_command(&mut self, line: &str) -> Vec<String> {
        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            return Vec::new();
        };
        let args: Vec<&str> = parts.collect();

        match command.to_ascii_lowercase().as_str() {
            "help" => self.handle_help(args.first().copied()),
            "status" => self.handle_status(),
            "profiles" => self.handle_profiles(),
            "activate" => self.handle_activate(&args),
            "deactivate" => report(self.ctrl.runner_mut().deactivate()),
            "start" => {
                let now = self.now_ms;
                report(self.ctrl.runner_mut().start(now))
            }
            "stop" => report(self.ctrl.runner_mut().stop()),
            "clear" => {
                self.ctrl.runner_mut().clear_samples();
                vec!["OK samples cleared".to_string()]
            }
            "create" => self.handle_create(&args),
            "delete" => self.handle_delete(&args),
            "graph" => self.handle_graph(&args),
            "temps" => self.handle_temps(),
            "step" => self.handle_step(&args),
            "run" => self.handle_run(&args),
            "fault" => self.handle_fault(&args),
            "hysteresis" => self.handle_hysteresis(&args),
            other => vec![format!("ERR unknown command `{other}` (try `help`)")],
        }
    }

    fn handle_help(&self, topic: Option<&str>) -> Vec<String> {
        match topic {
            Some(target) if !target.is_empty() => {
                if let Some((_, detail)) = HELP_TOPICS
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(target))
                {
                    vec![(*detail).to_string()]
                } else {
                    vec![format!("No help available for `{target}`.")]
                }
            }
            _ => {
                let mut lines = vec!["Available commands:".to_string()];
                for (_, detail) in HELP_TOPICS {
                    lines.push(format!("  {detail}"));
                }
                lines
            }
        }
    }

    fn handle_status(&self) -> Vec<String> {
        let status = self.ctrl.runner().status(self.now_ms);
        let heater = self.ctrl.heater().status();

        let mut lines = Vec::new();
        match status.active_profile_name.as_deref() {
            Some(name) if status.is_running => {
                lines.push(format!("profile: {name} (running)"));
                lines.push(format!(
                    "phase: {} ({}/{})",
                    status.current_phase.as_deref().unwrap_or("?"),
                    status.current_phase_index + 1,
                    status.total_phases
                ));
                lines.push(format!(
                    "elapsed: {:.2}/{:.2} min ({:.0}%)",
                    status.elapsed_minutes, status.total_minutes, status.progress_percent
                ));
            }
            Some(name) => {
                lines.push(format!("profile: {name} (stopped)"));
                lines.push(format!(
                    "elapsed: {:.2}/{:.2} min",
                    status.elapsed_minutes, status.total_minutes
                ));
            }
            None => lines.push("profile: (none)".to_string()),
        }

        match heater.target_temp {
            Some(target) => lines.push(format!(
                "heater: {} target={target:.1}°C band={:.1}°C",
                if heater.is_on { "ON" } else { "off" },
                heater.hysteresis
            )),
            None => lines.push(format!(
                "heater: {} (no target) band={:.1}°C",
                if heater.is_on { "ON" } else { "off" },
                heater.hysteresis
            )),
        }
        lines.push(format!("oven: {:.2}°C", self.plant.temperature()));
        lines.push(format!("clock: +{} ms", self.now_ms));
        lines
    }

    fn handle_profiles(&self) -> Vec<String> {
        let runner = self.ctrl.runner();
        let active = runner.active_profile_name().map(str::to_string);
        let mut lines = Vec::new();

        for name in runner.profile_names() {
            let marker = if active.as_deref() == Some(name) {
                "*"
            } else {
                " "
            };
            if let Some(profile) = runner.profile(name) {
                lines.push(format!(
                    "{marker} {name} ({} phases, {:.1} min)",
                    profile.phases().len(),
                    profile.total_duration()
                ));
            }
        }

        if lines.is_empty() {
            lines.push("(no profiles)".to_string());
        }
        lines
    }

    fn handle_activate(&mut self, args: &[&str]) -> Vec<String> {
        let name = args.join(" ");
        if name.is_empty() {
            return vec!["ERR usage: activate <name>".to_string()];
        }
        match self.ctrl.runner_mut().activate(&name) {
            Ok(()) => vec![format!("OK activated `{name}`")],
            Err(err) => vec![format!("ERR {err:?}")],
        }
    }

    fn handle_create(&mut self, args: &[&str]) -> Vec<String> {
        let Some((name, phase_args)) = args.split_first() else {
            return vec!["ERR usage: create <name> <phase:start:end:minutes>...".to_string()];
        };
        if phase_args.is_empty() {
            return vec!["ERR a profile needs at least one phase".to_string()];
        }

        let mut phases = Vec::new();
        for arg in phase_args {
            match parse_phase(arg) {
                Ok(phase) => phases.push(phase),
                Err(err) => return vec![format!("ERR {err}")],
            }
        }

        let specs: Vec<PhaseSpec<'_>> = phases
            .iter()
            .map(|p| PhaseSpec {
                name: &p.0,
                start_temp: p.1,
                end_temp: p.2,
                duration_minutes: p.3,
            })
            .collect();

        match self.ctrl.runner_mut().create(name, &specs) {
            Ok(()) => vec![format!("OK created `{name}`")],
            Err(err) => vec![format!("ERR {err:?}")],
        }
    }

    fn handle_delete(&mut self, args: &[&str]) -> Vec<String> {
        let name = args.join(" ");
        if name.is_empty() {
            return vec!["ERR usage: delete <name>".to_string()];
        }
        match self.ctrl.runner_mut().delete(&name) {
            Ok(()) => vec![format!("OK deleted `{name}`")],
            Err(err) => vec![format!("ERR {err:?}")],
        }
    }

    fn handle_graph(&self, args: &[&str]) -> Vec<String> {
        let name = args.join(" ");
        if name.is_empty() {
            return vec!["ERR usage: graph <name>".to_string()];
        }
        match self.ctrl.runner().graph_data(&name) {
            Ok(points) => points
                .iter()
                .map(|p| {
                    format!(
                        "{:>6.2} min  {:>6.1}°C  (phase {})",
                        p.time_minutes, p.temperature, p.phase_index
                    )
                })
                .collect(),
            Err(err) => vec![format!("ERR {err:?}")],
        }
    }

    fn handle_temps(&self) -> Vec<String> {
        let series = self.ctrl.runner().temperature_series();
        if series.is_empty() {
            return vec!["(no samples)".to_string()];
        }
        series
            .iter()
            .map(|s| format!("{:>6.2} min  {:>6.2}°C", s.time_minutes, s.temperature))
            .collect()
    }

    fn handle_step(&mut self, args: &[&str]) -> Vec<String> {
        let ticks = match args.first() {
            Some(value) => match value.parse::<u64>() {
                Ok(n) if n > 0 => n,
                _ => return vec!["ERR usage: step [n]".to_string()],
            },
            None => 1,
        };
        let status = self.advance(ticks);
        vec![describe_tick(self.now_ms, &status)]
    }

    fn handle_run(&mut self, args: &[&str]) -> Vec<String> {
        let seconds = match args.first().map(|v| v.parse::<u64>()) {
            Some(Ok(n)) if n > 0 => n,
            _ => return vec!["ERR usage: run <seconds>".to_string()],
        };
        let ticks = (seconds * 1000).div_ceil(LOOP_PERIOD_MS);
        let status = self.advance(ticks);
        vec![describe_tick(self.now_ms, &status)]
    }

    fn handle_fault(&mut self, args: &[&str]) -> Vec<String> {
        match args.first().copied() {
            None | Some("open") => {
                self.plant.set_fault(Some(SensorError::OpenCircuit));
                vec!["OK sensor fault injected (open circuit)".to_string()]
            }
            Some("clear") => {
                self.plant.set_fault(None);
                vec!["OK sensor fault cleared".to_string()]
            }
            Some(other) => vec![format!("ERR unknown fault `{other}` (open|clear)")],
        }
    }

    fn handle_hysteresis(&mut self, args: &[&str]) -> Vec<String> {
        match args.first().map(|v| v.parse::<f32>()) {
            Some(Ok(value)) => {
                self.ctrl.heater_mut().set_hysteresis(value);
                vec![format!(
                    "OK hysteresis = {:.1}°C",
                    self.ctrl.heater().status().hysteresis
                )]
            }
            _ => vec!["ERR usage: hysteresis <celsius>".to_string()],
        }
    }

    fn advance(&mut self, ticks: u64) -> LoopStatus {
        let mut status = self.ctrl.step(self.now_ms);
        for _ in 0..ticks {
            self.now_ms += LOOP_PERIOD_MS;
            self.plant.step(LOOP_PERIOD_MS as f32 / 60_000.0);
            status = self.ctrl.step(self.now_ms);
        }
        status
    }
}

fn report(result: Result<(), reflow_core::Error>) -> Vec<String> {
    match result {
        Ok(()) => vec!["OK".to_string()],
        Err(err) => vec![format!("ERR {err:?}")],
    }
}

fn describe_tick(now_ms: u64, status: &LoopStatus) -> String {
    let temp = status
        .temperature
        .map(|t| format!("{t:.2}°C"))
        .unwrap_or_else(|| "--".to_string());
    let target = status
        .target_temp
        .map(|t| format!("{t:.1}°C"))
        .unwrap_or_else(|| "--".to_string());
    let fault = status
        .fault
        .map(|f| format!(" fault={f:?}"))
        .unwrap_or_default();
    format!(
        "[+{now_ms} ms] temp={temp} target={target} heater={}{fault}",
        if status.heater_on { "ON" } else { "off" }
    )
}

/// Parse `name:start:end:minutes` into phase fields
fn parse_phase(arg: &str) -> Result<(String, f32, f32, f32), String> {
    let parts: Vec<&str> = arg.split(':').collect();
    if parts.len() != 4 {
        return Err(format!("bad phase `{arg}`, expected name:start:end:minutes"));
    }
    let start = parts[1]
        .parse::<f32>()
        .map_err(|_| format!("bad start temperature in `{arg}`"))?;
    let end = parts[2]
        .parse::<f32>()
        .map_err(|_| format!("bad end temperature in `{arg}`"))?;
    let minutes = parts[3]
        .parse::<f32>()
        .map_err(|_| format!("bad duration in `{arg}`"))?;
    Ok((parts[0].to_string(), start, end, minutes))
}
