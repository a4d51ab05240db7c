use super::source::Source;
use super::universe::Universe;
use super::SimulationMode;

/// Relativistic Doppler factor sqrt((1+beta)/(1-beta)); beta positive when
/// receding, so factors for beta and -beta are reciprocal.
pub fn doppler_factor(beta: f64) -> f64 {
    ((1.0 + beta) / (1.0 - beta)).sqrt()
}

/// One sampled point of the visible wave train.
#[derive(Debug, Clone, Copy)]
pub struct WaveSample {
    /// World distance from the observer along the line of sight.
    pub r: f64,
    /// Wavelength seen at this point right now, nm.
    pub wavelength: f64,
}

/// Emission window plus the retarded-time redshift evaluation along the
/// line of sight. The wave is a pure function of (distance, now) and the
/// recorded universe history; nothing is accumulated per tick, so the
/// result does not depend on frame rate.
pub struct WaveTrain {
    pub rest_wavelength: f64,
    pub emission_start: f64,
    pub emission_duration: f64,
    pub mode: SimulationMode,
}

impl WaveTrain {
    pub fn new(
        rest_wavelength: f64,
        emission_start: f64,
        emission_duration: f64,
        mode: SimulationMode,
    ) -> Self {
        Self {
            rest_wavelength,
            emission_start,
            emission_duration,
            mode,
        }
    }

    pub fn window_contains(&self, t_emit: f64) -> bool {
        t_emit >= self.emission_start && t_emit <= self.emission_start + self.emission_duration
    }

    pub fn emission_ended(&self, now: f64) -> bool {
        now > self.emission_start + self.emission_duration
    }

    /// Wavelength visible right now at world distance r from the observer,
    /// or None when the light passing through r was emitted outside the
    /// window (not yet emitted, already over, or before t = 0).
    ///
    /// 1. retarded emission time: t_emit = now - r / wave_speed
    /// 2. Doppler from the source velocity *at t_emit*
    /// 3. cosmological stretch a(now) / a(t_emit), skipped in Doppler mode
    pub fn sample(
        &self,
        universe: &Universe,
        source: &Source,
        r: f64,
        now: f64,
        wave_speed: f64,
    ) -> Option<WaveSample> {
        let t_emit = now - r / wave_speed.max(1e-6);
        if t_emit < 0.0 || !self.window_contains(t_emit) {
            return None;
        }

        let beta = source.recession_beta(universe, t_emit, self.mode);
        let emitted = self.rest_wavelength * doppler_factor(beta);

        let stretch = if self.mode.expands() {
            universe.scale_factor / universe.scale_at(t_emit).max(1e-9)
        } else {
            1.0
        };

        Some(WaveSample {
            r,
            wavelength: emitted * stretch,
        })
    }

    /// Wavelength the observer measures right now: Doppler at the current
    /// instant times the stretch accumulated since emission started. Feeds
    /// the live graph and the status readout.
    pub fn observed_now(&self, universe: &Universe, source: &Source) -> f64 {
        let beta = source.recession_beta(universe, universe.time, self.mode);
        let mut wl = self.rest_wavelength * doppler_factor(beta);
        if self.mode.expands() {
            let a_start = universe.scale_at(self.emission_start).max(1e-9);
            wl *= universe.scale_factor / a_start;
        }
        wl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn still_universe() -> Universe {
        Universe::new(0.0)
    }

    #[test]
    fn doppler_factors_are_reciprocal() {
        for beta in [0.1, 0.3, 0.5, 0.77, 0.9499] {
            let product = doppler_factor(beta) * doppler_factor(-beta);
            assert!((product - 1.0).abs() < 1e-12, "beta={beta}");
        }
    }

    #[test]
    fn zero_beta_leaves_rest_wavelength() {
        assert_eq!(doppler_factor(0.0), 1.0);
        let u = still_universe();
        let src = Source::new(500.0);
        let wave = WaveTrain::new(656.0, 0.0, 25.0, SimulationMode::Doppler);
        let s = wave
            .sample(&u, &src, 0.0, 0.0, 10.0)
            .expect("t_emit = 0 is inside the window");
        assert_eq!(s.wavelength, 656.0);
    }

    #[test]
    fn recession_at_tenth_of_c_shifts_h_alpha() {
        let expected = 656.0 * (1.1_f64 / 0.9).sqrt();
        assert!((656.0 * doppler_factor(0.1) - expected).abs() < 1e-9);
        assert!((expected - 724.96).abs() < 0.01);
    }

    #[test]
    fn samples_outside_emission_window_are_not_drawn() {
        let mut u = still_universe();
        let src = Source::new(500.0);
        let wave = WaveTrain::new(656.0, 0.0, 3.0, SimulationMode::Doppler);
        for _ in 0..600 {
            u.update(0.01, SimulationMode::Doppler);
        }
        // now = 6.0: a point whose retarded time lands at 3.5 is past the
        // window, one at 2.5 is inside it
        let wave_speed = 10.0;
        let r_late = (6.0 - 3.5) * wave_speed;
        assert!(wave.sample(&u, &src, r_late, 6.0, wave_speed).is_none());
        let r_ok = (6.0 - 2.5) * wave_speed;
        assert!(wave.sample(&u, &src, r_ok, 6.0, wave_speed).is_some());
    }

    #[test]
    fn negative_retarded_time_means_not_yet_emitted() {
        let u = still_universe();
        let src = Source::new(500.0);
        let wave = WaveTrain::new(656.0, 0.0, 25.0, SimulationMode::Doppler);
        // now = 1, r so far away the light would predate t = 0
        assert!(wave.sample(&u, &src, 500.0, 1.0, 10.0).is_none());
    }

    #[test]
    fn cosmological_stretch_uses_scale_at_emission() {
        let mut u = Universe::new(100.0);
        let src = Source::new(500.0);
        for _ in 0..200 {
            u.update(0.05, SimulationMode::Cosmological);
        }
        let wave = WaveTrain::new(656.0, 0.0, 25.0, SimulationMode::Cosmological);
        let now = u.time;
        let wave_speed = 50.0;
        // a sample emitted early in the window is stretched by nearly the
        // whole expansion, one emitted just now by almost nothing
        let early = wave
            .sample(&u, &src, (now - 0.1) * wave_speed, now, wave_speed)
            .expect("inside window");
        let late = wave
            .sample(&u, &src, 0.5 * wave_speed, now, wave_speed)
            .expect("inside window");
        assert!(early.wavelength > late.wavelength);
        assert!(early.wavelength > 656.0);
    }

    #[test]
    fn doppler_mode_skips_stretch_entirely() {
        let mut u = Universe::new(150.0);
        for _ in 0..100 {
            u.update(0.05, SimulationMode::Doppler);
        }
        let src = Source::new(500.0);
        let wave = WaveTrain::new(656.0, 0.0, 25.0, SimulationMode::Doppler);
        let s = wave
            .sample(&u, &src, 1.0, u.time, 10.0)
            .expect("inside window");
        assert_eq!(s.wavelength, 656.0);
    }
}
