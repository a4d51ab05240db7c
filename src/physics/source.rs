use super::universe::Universe;
use super::{SimulationMode, BETA_LIMIT, K_PECULIAR, VISUAL_C};

/// A galaxy at a comoving position with a peculiar velocity, decomposed
/// into radial and transverse components. The observer sits at the origin.
pub struct Source {
    pub comoving_x: f64,
    pub comoving_y: f64,
    /// km/s, positive away from the observer.
    pub radial_velocity: f64,
    /// km/s, positive counterclockwise around the observer.
    pub transverse_velocity: f64,
    pub emission_start: f64,
}

impl Source {
    pub fn new(initial_distance: f64) -> Self {
        Self {
            comoving_x: initial_distance,
            comoving_y: 0.0,
            radial_velocity: 0.0,
            transverse_velocity: 0.0,
            emission_start: 0.0,
        }
    }

    /// Radial/transverse unit frame at a position. Falls back to the
    /// coordinate axes when the point coincides with the observer.
    fn frame(px: f64, py: f64) -> ((f64, f64), (f64, f64)) {
        let dist = (px * px + py * py).sqrt();
        if dist > 1e-9 {
            let ur = (px / dist, py / dist);
            (ur, (-ur.1, ur.0))
        } else {
            ((1.0, 0.0), (0.0, 1.0))
        }
    }

    /// Physical position: comoving position scaled by a, plus (in modes
    /// with peculiar motion) a displacement accumulated linearly since
    /// emission start. The drift frame is taken at the expansion-only
    /// position, not the drifted one, so the frame cannot feed back on
    /// itself.
    pub fn physical_position(
        &self,
        scale_factor: f64,
        time: f64,
        mode: SimulationMode,
    ) -> (f64, f64) {
        let px = self.comoving_x * scale_factor;
        let py = self.comoving_y * scale_factor;
        if !mode.has_peculiar_motion() {
            return (px, py);
        }

        let ((urx, ury), (utx, uty)) = Self::frame(px, py);
        let dt = time - self.emission_start;
        let disp_r = self.radial_velocity * dt * K_PECULIAR;
        let disp_t = self.transverse_velocity * dt * K_PECULIAR;
        (
            px + urx * disp_r + utx * disp_t,
            py + ury * disp_r + uty * disp_t,
        )
    }

    /// Peculiar-velocity vector in world axes at the current (drifted)
    /// position. Zero in pure Cosmological mode.
    pub fn velocity_vector(&self, scale_factor: f64, time: f64, mode: SimulationMode) -> (f64, f64) {
        if !mode.has_peculiar_motion() {
            return (0.0, 0.0);
        }
        let (x, y) = self.physical_position(scale_factor, time, mode);
        let ((urx, ury), (utx, uty)) = Self::frame(x, y);
        (
            self.radial_velocity * urx + self.transverse_velocity * utx,
            self.radial_velocity * ury + self.transverse_velocity * uty,
        )
    }

    /// Line-of-sight recession fraction beta(t) = v_rec / c, positive when
    /// receding, clamped so the Doppler factor stays finite.
    pub fn recession_beta(&self, universe: &Universe, t: f64, mode: SimulationMode) -> f64 {
        let a = if mode.expands() { universe.scale_at(t) } else { 1.0 };
        let (sx, sy) = self.physical_position(a, t, mode);
        let d = (sx * sx + sy * sy).sqrt();
        if d <= 1e-9 {
            return 0.0;
        }
        // unit vector source -> observer
        let (losx, losy) = (-sx / d, -sy / d);
        let (vx, vy) = self.velocity_vector(a, t, mode);
        let v_toward = vx * losx + vy * losy;
        let beta = -v_toward / VISUAL_C;
        beta.clamp(-BETA_LIMIT, BETA_LIMIT)
    }
}
