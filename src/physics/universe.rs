use std::collections::VecDeque;

use super::{SimulationMode, K_EXPANSION};

/// Ring-buffer capacity for the (time, scale factor) history.
pub const HISTORY_CAP: usize = 6000;

/// Simulated time and the cosmological scale factor a(t), advanced under a
/// linear expansion law and recorded so past values can be looked up for
/// retarded-time redshift calculations.
pub struct Universe {
    pub time: f64,
    pub scale_factor: f64,
    pub hubble: f64,
    history: VecDeque<(f64, f64)>,
}

impl Universe {
    pub fn new(hubble: f64) -> Self {
        let mut history = VecDeque::with_capacity(HISTORY_CAP);
        history.push_back((0.0, 1.0));
        Self {
            time: 0.0,
            scale_factor: 1.0,
            hubble,
            history,
        }
    }

    /// Advance time and, outside pure Doppler mode, the scale factor.
    pub fn update(&mut self, dt: f64, mode: SimulationMode) {
        self.time += dt;
        if mode.expands() {
            self.scale_factor *= 1.0 + self.hubble * K_EXPANSION * dt;
        }
        if self.history.len() == HISTORY_CAP {
            self.history.pop_front();
        }
        self.history.push_back((self.time, self.scale_factor));
    }

    pub fn reset(&mut self) {
        self.time = 0.0;
        self.scale_factor = 1.0;
        self.history.clear();
        self.history.push_back((0.0, 1.0));
    }

    /// Scale factor at a past instant, linearly interpolated between the two
    /// bracketing history samples. Samples are dense but not uniformly
    /// spaced. Queries outside the recorded range clamp to the boundary.
    pub fn scale_at(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 1.0;
        }
        let idx = self.history.partition_point(|&(ht, _)| ht <= t);
        if idx == 0 {
            return self.history.front().map_or(1.0, |&(_, a)| a);
        }
        if idx == self.history.len() {
            return self.history.back().map_or(1.0, |&(_, a)| a);
        }
        let (t0, a0) = self.history[idx - 1];
        let (t1, a1) = self.history[idx];
        if t1 - t0 <= f64::EPSILON {
            return a1;
        }
        let u = (t - t0) / (t1 - t0);
        a0 + (a1 - a0) * u
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_at_interpolates_irregular_steps() {
        let mut u = Universe::new(70.0);
        // uneven dt on purpose
        for dt in [0.013, 0.051, 0.002, 0.2, 0.017] {
            u.update(dt, SimulationMode::Cosmological);
        }
        // exact sample points round-trip
        let t_mid = 0.013 + 0.051;
        let a_mid = u.scale_at(t_mid);
        // between two recorded samples the value must lie between them
        let t_between = t_mid + 0.001;
        let a_between = u.scale_at(t_between);
        assert!(a_between >= a_mid);
        assert!(a_between <= u.scale_factor);
    }

    #[test]
    fn scale_at_is_monotonic_under_expansion() {
        let mut u = Universe::new(120.0);
        for _ in 0..500 {
            u.update(1.0 / 60.0, SimulationMode::Mixed);
        }
        let mut prev = 0.0;
        let mut t = 0.0;
        while t < u.time {
            let a = u.scale_at(t);
            assert!(a >= prev, "a(t) decreased at t={t}");
            prev = a;
            t += 0.037;
        }
    }

    #[test]
    fn doppler_mode_freezes_scale_factor() {
        let mut u = Universe::new(150.0);
        for _ in 0..100 {
            u.update(0.016, SimulationMode::Doppler);
        }
        assert_eq!(u.scale_factor, 1.0);
        assert_eq!(u.scale_at(u.time * 0.5), 1.0);
        assert_eq!(u.scale_at(u.time), 1.0);
    }

    #[test]
    fn queries_clamp_to_recorded_range() {
        let mut u = Universe::new(70.0);
        for _ in 0..10 {
            u.update(0.1, SimulationMode::Cosmological);
        }
        assert_eq!(u.scale_at(-5.0), 1.0);
        assert_eq!(u.scale_at(0.0), 1.0);
        assert_eq!(u.scale_at(u.time + 100.0), u.scale_factor);
    }

    #[test]
    fn history_stays_bounded() {
        let mut u = Universe::new(70.0);
        for _ in 0..(HISTORY_CAP + 500) {
            u.update(0.01, SimulationMode::Cosmological);
        }
        assert_eq!(u.history_len(), HISTORY_CAP);
        // earliest retained sample now clamps queries before it
        let early = u.scale_at(0.001);
        assert!(early > 1.0);
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut u = Universe::new(70.0);
        for _ in 0..50 {
            u.update(0.016, SimulationMode::Mixed);
        }
        u.reset();
        assert_eq!(u.time, 0.0);
        assert_eq!(u.scale_factor, 1.0);
        assert_eq!(u.history_len(), 1);
    }
}
