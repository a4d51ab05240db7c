//! Shift formulas for the three animations.

pub const C_KM_S: f64 = 299_792.458;

/// Relativistic Doppler wavelength ratio for a line-of-sight velocity in
/// km/s, positive when receding.
pub fn doppler_factor(velocity_km_s: f64) -> f64 {
    let beta = (velocity_km_s / C_KM_S).clamp(-0.999, 0.999);
    ((1.0 + beta) / (1.0 - beta)).sqrt()
}

/// Cosmological redshift z = a_obs / a_emit - 1.
pub fn cosmological_redshift(a_emit: f64, a_obs: f64) -> f64 {
    if a_emit <= 0.0 {
        return 0.0;
    }
    a_obs / a_emit - 1.0
}

/// Gravitational redshift z = (1 - rs/r)^(-1/2) - 1 outside a mass with
/// Schwarzschild radius rs; divergent at and inside rs.
pub fn gravitational_redshift(r: f64, rs: f64) -> f64 {
    if r <= rs {
        f64::INFINITY
    } else {
        1.0 / (1.0 - rs / r).sqrt() - 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doppler_identity_and_reciprocity() {
        assert_eq!(doppler_factor(0.0), 1.0);
        let v = 60_000.0;
        let product = doppler_factor(v) * doppler_factor(-v);
        assert!((product - 1.0).abs() < 1e-12);
        assert!(doppler_factor(v) > 1.0);
        assert!(doppler_factor(-v) < 1.0);
    }

    #[test]
    fn doppler_clamps_past_light_speed() {
        assert!(doppler_factor(1e7).is_finite());
    }

    #[test]
    fn cosmological_shift_follows_scale_ratio() {
        assert!((cosmological_redshift(0.5, 1.0) - 1.0).abs() < 1e-12);
        assert_eq!(cosmological_redshift(1.0, 1.0), 0.0);
        assert_eq!(cosmological_redshift(0.0, 1.0), 0.0);
    }

    #[test]
    fn gravitational_shift_vanishes_far_away_and_diverges_at_rs() {
        assert!(gravitational_redshift(1e12, 60.0) < 1e-10);
        assert!(gravitational_redshift(60.0, 60.0).is_infinite());
        assert!(gravitational_redshift(30.0, 60.0).is_infinite());
        let near = gravitational_redshift(61.0, 60.0);
        let far = gravitational_redshift(600.0, 60.0);
        assert!(near > far && far > 0.0);
    }
}
