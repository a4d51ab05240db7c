use std::collections::VecDeque;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::config::SimConfig;
use crate::physics::{SimulationMode, Source, Universe, WaveTrain, VISUAL_C};

/// Lifecycle of the emission. Pause is orthogonal and lives on its own flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmissionPhase {
    /// No wave emitted yet.
    Idle,
    /// Emission window open, wave train growing.
    Emitting,
    /// Window elapsed; the truncated train is still in flight.
    Settled,
}

/// Live parameter values mirrored from the control panel each tick.
/// Sliders are range-clamped by the widgets, so no validation happens here.
#[derive(Debug, Clone, Copy)]
pub struct Controls {
    pub hubble: f64,
    pub radial_velocity: f64,
    pub transverse_velocity: f64,
    pub initial_distance: f64,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            hubble: 70.0,
            radial_velocity: 0.0,
            transverse_velocity: 0.0,
            initial_distance: 500.0,
        }
    }
}

#[derive(Serialize)]
struct MeasurementRow {
    time: f64,
    wavelength_nm: f64,
    redshift: f64,
}

/// The fixed-timestep simulation state, free of any windowing concern so
/// the state machine and physics can be exercised headless.
pub struct Simulation {
    pub universe: Universe,
    pub source: Source,
    pub wave: Option<WaveTrain>,
    pub phase: EmissionPhase,
    pub mode: SimulationMode,
    pub paused: bool,
    pub controls: Controls,
    config: SimConfig,
    wavelength_history: VecDeque<(f64, f64)>,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Self {
        let controls = Controls::default();
        let mut sim = Self {
            universe: Universe::new(controls.hubble),
            source: Source::new(controls.initial_distance),
            wave: None,
            phase: EmissionPhase::Idle,
            mode: SimulationMode::Cosmological,
            paused: false,
            controls,
            config,
            wavelength_history: VecDeque::with_capacity(config.graph_history),
        };
        sim.seed_history();
        sim
    }

    /// A few rest-wavelength points so the graph is never empty.
    fn seed_history(&mut self) {
        self.wavelength_history.clear();
        for i in 0..5 {
            self.wavelength_history
                .push_back((i as f64 * 0.01, self.config.rest_wavelength_nm));
        }
    }

    fn apply_controls(&mut self) {
        self.universe.hubble = self.controls.hubble;
        self.source.radial_velocity = self.controls.radial_velocity;
        self.source.transverse_velocity = self.controls.transverse_velocity;
        self.source.comoving_x = self.controls.initial_distance;
    }

    /// Visual propagation speed, world units per second. Scaled with the
    /// initial distance so the train crosses the viewport in seconds
    /// regardless of the slider.
    pub fn wave_speed(&self) -> f64 {
        self.controls.initial_distance / 15.0
    }

    pub fn set_mode(&mut self, mode: SimulationMode) {
        if self.mode != mode {
            self.mode = mode;
            self.reset();
        }
    }

    /// Back to Idle from any state, clearing history buffers.
    pub fn reset(&mut self) {
        self.universe.reset();
        self.wave = None;
        self.phase = EmissionPhase::Idle;
        self.source = Source::new(self.controls.initial_distance);
        self.paused = false;
        self.apply_controls();
        self.seed_history();
    }

    /// Valid from Idle or Settled; ignored mid-emission.
    pub fn start_emission(&mut self) {
        if self.phase == EmissionPhase::Emitting {
            return;
        }
        self.reset();
        self.source.emission_start = self.universe.time;
        self.wave = Some(WaveTrain::new(
            self.config.rest_wavelength_nm,
            self.universe.time,
            self.config.emission_duration,
            self.mode,
        ));
        self.phase = EmissionPhase::Emitting;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// One physics tick: ingest panel values, advance the universe, roll
    /// the emission phase forward and record the observer measurement.
    pub fn update(&mut self, dt: f64, controls: Controls) {
        if self.paused {
            return;
        }
        self.controls = controls;
        self.apply_controls();

        self.universe.update(dt, self.mode);

        if self.phase == EmissionPhase::Emitting {
            if let Some(wave) = &self.wave {
                if wave.emission_ended(self.universe.time) {
                    self.phase = EmissionPhase::Settled;
                }
            }
        }

        let wl = match &self.wave {
            Some(wave) => wave.observed_now(&self.universe, &self.source),
            None => self.config.rest_wavelength_nm,
        };
        if self.wavelength_history.len() == self.config.graph_history {
            self.wavelength_history.pop_front();
        }
        self.wavelength_history.push_back((self.universe.time, wl));
    }

    pub fn source_position(&self) -> (f64, f64) {
        let a = if self.mode.expands() {
            self.universe.scale_factor
        } else {
            1.0
        };
        self.source.physical_position(a, self.universe.time, self.mode)
    }

    pub fn distance(&self) -> f64 {
        let (x, y) = self.source_position();
        (x * x + y * y).sqrt()
    }

    pub fn recession_beta_now(&self) -> f64 {
        self.source
            .recession_beta(&self.universe, self.universe.time, self.mode)
    }

    /// Sign convention flipped for the readout: positive = closing in.
    pub fn closing_velocity(&self) -> f64 {
        -self.recession_beta_now() * VISUAL_C
    }

    pub fn observed_wavelength(&self) -> f64 {
        self.wavelength_history
            .back()
            .map_or(self.config.rest_wavelength_nm, |&(_, wl)| wl)
    }

    pub fn total_redshift(&self) -> f64 {
        self.observed_wavelength() / self.config.rest_wavelength_nm - 1.0
    }

    pub fn rest_wavelength(&self) -> f64 {
        self.config.rest_wavelength_nm
    }

    pub fn wavelength_history(&self) -> &VecDeque<(f64, f64)> {
        &self.wavelength_history
    }

    pub fn emission_label(&self) -> &'static str {
        match self.phase {
            EmissionPhase::Idle => "OFF",
            EmissionPhase::Emitting => "ON",
            EmissionPhase::Settled => "ENDED",
        }
    }

    /// Write the recorded observer measurements as CSV.
    pub fn export_history_csv(&self, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        for &(time, wavelength_nm) in &self.wavelength_history {
            writer.serialize(MeasurementRow {
                time,
                wavelength_nm,
                redshift: wavelength_nm / self.config.rest_wavelength_nm - 1.0,
            })?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::camera::Camera;
    use macroquad::math::Vec2;

    const DT: f64 = 1.0 / 60.0;

    fn sim() -> Simulation {
        Simulation::new(SimConfig::default())
    }

    fn advance(sim: &mut Simulation, seconds: f64, controls: Controls) {
        let steps = (seconds / DT).round() as usize;
        for _ in 0..steps {
            sim.update(DT, controls);
        }
    }

    #[test]
    fn start_emission_moves_idle_to_emitting() {
        let mut s = sim();
        assert_eq!(s.phase, EmissionPhase::Idle);
        s.start_emission();
        assert_eq!(s.phase, EmissionPhase::Emitting);
        assert!(s.wave.is_some());
    }

    #[test]
    fn start_is_ignored_while_emitting() {
        let mut s = sim();
        s.start_emission();
        advance(&mut s, 2.0, Controls::default());
        let time_before = s.universe.time;
        s.start_emission();
        // a restart would have reset the clock
        assert_eq!(s.universe.time, time_before);
        assert_eq!(s.phase, EmissionPhase::Emitting);
    }

    #[test]
    fn window_elapse_settles_and_allows_restart() {
        let mut s = sim();
        s.start_emission();
        advance(&mut s, SimConfig::default().emission_duration + 1.0, Controls::default());
        assert_eq!(s.phase, EmissionPhase::Settled);
        s.start_emission();
        assert_eq!(s.phase, EmissionPhase::Emitting);
        assert_eq!(s.universe.time, 0.0);
    }

    #[test]
    fn mode_change_forces_reset() {
        let mut s = sim();
        s.start_emission();
        advance(&mut s, 1.0, Controls::default());
        s.set_mode(SimulationMode::Doppler);
        assert_eq!(s.phase, EmissionPhase::Idle);
        assert!(s.wave.is_none());
        assert_eq!(s.universe.time, 0.0);
        // same mode again is a no-op
        let t = s.universe.time;
        s.set_mode(SimulationMode::Doppler);
        assert_eq!(s.universe.time, t);
    }

    #[test]
    fn pause_freezes_time_without_touching_phase() {
        let mut s = sim();
        s.start_emission();
        advance(&mut s, 1.0, Controls::default());
        let t = s.universe.time;
        s.toggle_pause();
        advance(&mut s, 1.0, Controls::default());
        assert_eq!(s.universe.time, t);
        assert_eq!(s.phase, EmissionPhase::Emitting);
        s.toggle_pause();
        advance(&mut s, 0.5, Controls::default());
        assert!(s.universe.time > t);
    }

    #[test]
    fn doppler_recession_scenario_redshifts_and_frames() {
        let mut s = sim();
        s.set_mode(SimulationMode::Doppler);
        let controls = Controls {
            hubble: 0.0,
            radial_velocity: 5000.0,
            ..Controls::default()
        };
        s.update(DT, controls);
        s.start_emission();
        advance(&mut s, 1.0, controls);

        // the observer measurement is redshifted
        assert!(s.observed_wavelength() > s.rest_wavelength());
        assert!(s.total_redshift() > 0.0);

        // the first visible sample along the ray is redshifted too
        let wave = s.wave.as_ref().expect("emission started");
        let sample = wave
            .sample(&s.universe, &s.source, 1.0, s.universe.time, s.wave_speed())
            .expect("sample near the observer is inside the window");
        assert!(sample.wavelength > s.rest_wavelength());

        // camera frames observer and source with its center between them
        let (gx, gy) = s.source_position();
        let mut cam = Camera::new(980.0, 450.0);
        for _ in 0..200 {
            cam.update(&[Vec2::ZERO, Vec2::new(gx as f32, gy as f32)]);
        }
        assert!(cam.center.x > 0.0 && (cam.center.x as f64) < gx);
    }

    #[test]
    fn history_tracks_rest_wavelength_before_emission() {
        let mut s = sim();
        advance(&mut s, 0.5, Controls::default());
        assert_eq!(s.observed_wavelength(), s.rest_wavelength());
        assert_eq!(s.total_redshift(), 0.0);
    }

    #[test]
    fn csv_export_writes_one_row_per_sample() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("history.csv");
        let mut s = sim();
        s.start_emission();
        advance(&mut s, 0.5, Controls::default());
        s.export_history_csv(&path).expect("export");
        let text = std::fs::read_to_string(&path).expect("read back");
        let rows = text.lines().count();
        assert_eq!(rows, s.wavelength_history().len() + 1); // header
        assert!(text.starts_with("time,wavelength_nm,redshift"));
    }
}
