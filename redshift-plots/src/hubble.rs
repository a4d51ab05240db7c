//! Supernova Hubble diagram: luminosity distances from standard-candle
//! fluxes, a flat-universe distance model, and a chi-squared scan for the
//! best-fit matter density.

use std::path::Path;

use anyhow::{ensure, Context, Result};
use plotters::prelude::*;
use rayon::prelude::*;
use serde::Deserialize;

pub const C_KM_S: f64 = 299_792.458;
pub const H0_KM_S_MPC: f64 = 70.0;
pub const MPC_TO_CM: f64 = 3.08567758e24;
/// Standard-candle SN Ia luminosity, erg/s.
pub const SN_LUMINOSITY: f64 = 1e43;

/// Simpson-rule panels for the comoving-distance integral.
const INTEGRAL_STEPS: usize = 200;

#[derive(Debug, Deserialize)]
pub struct SupernovaRow {
    pub z: f64,
    #[serde(rename = "flux (erg/s/cm2)")]
    pub flux: f64,
    #[serde(rename = "err_flux(erg/s/cm2)")]
    pub flux_err: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct Measurement {
    pub z: f64,
    pub dl_mpc: f64,
    pub dl_err_mpc: f64,
}

pub fn load_catalog(path: &Path) -> Result<Vec<SupernovaRow>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("reading supernova catalog {}", path.display()))?;
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record.context("bad catalog row")?);
    }
    ensure!(!rows.is_empty(), "supernova catalog is empty");
    Ok(rows)
}

/// Inverse-square luminosity distance with the flux error propagated:
/// dD/D = f_err / (2 f).
pub fn to_measurements(rows: &[SupernovaRow]) -> Vec<Measurement> {
    rows.iter()
        .map(|row| {
            let dl_cm = (SN_LUMINOSITY / (4.0 * std::f64::consts::PI * row.flux)).sqrt();
            let dl_mpc = dl_cm / MPC_TO_CM;
            Measurement {
                z: row.z,
                dl_mpc,
                dl_err_mpc: 0.5 * dl_mpc * row.flux_err / row.flux,
            }
        })
        .collect()
}

/// Dimensionless Hubble rate E(z) for a flat universe.
fn expansion_rate(z: f64, omega_m: f64) -> f64 {
    (omega_m * (1.0 + z).powi(3) + (1.0 - omega_m)).sqrt()
}

/// Simpson integration of dz' / E(z') over [0, z].
pub fn comoving_integral(z: f64, omega_m: f64) -> f64 {
    if z <= 0.0 {
        return 0.0;
    }
    let n = INTEGRAL_STEPS; // even
    let h = z / n as f64;
    let f = |zp: f64| 1.0 / expansion_rate(zp, omega_m);
    let mut sum = f(0.0) + f(z);
    for i in 1..n {
        let weight = if i % 2 == 0 { 2.0 } else { 4.0 };
        sum += weight * f(i as f64 * h);
    }
    sum * h / 3.0
}

pub fn luminosity_distance_mpc(z: f64, omega_m: f64) -> f64 {
    (C_KM_S / H0_KM_S_MPC) * (1.0 + z) * comoving_integral(z, omega_m)
}

pub fn chi_squared(measurements: &[Measurement], omega_m: f64) -> f64 {
    measurements
        .iter()
        .map(|m| {
            let model = luminosity_distance_mpc(m.z, omega_m);
            ((m.dl_mpc - model) / m.dl_err_mpc).powi(2)
        })
        .sum()
}

/// Scan Omega_m over [0, 1] in steps of 0.01 and return the minimum along
/// with its chi-squared.
pub fn best_fit_omega(measurements: &[Measurement]) -> (f64, f64) {
    (0..=100)
        .into_par_iter()
        .map(|i| {
            let omega_m = i as f64 / 100.0;
            (omega_m, chi_squared(measurements, omega_m))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .expect("non-empty Omega_m grid")
}

pub fn hubble_diagram_plot(
    measurements: &[Measurement],
    omega_best: f64,
    out: &Path,
) -> Result<()> {
    let max_z = measurements.iter().map(|m| m.z).fold(0.0, f64::max).max(2.2);
    let max_dl = measurements
        .iter()
        .map(|m| m.dl_mpc + m.dl_err_mpc)
        .fold(0.0, f64::max)
        .max(luminosity_distance_mpc(max_z, omega_best));

    let root = BitMapBackend::new(out, (1000, 600)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Hubble Diagram Fit", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0..max_z * 1.05, 0.0..max_dl * 1.1)?;
    chart
        .configure_mesh()
        .x_desc("Redshift (z)")
        .y_desc("Luminosity Distance (Mpc)")
        .draw()?;

    chart
        .draw_series(measurements.iter().map(|m| {
            ErrorBar::new_vertical(
                m.z,
                m.dl_mpc - m.dl_err_mpc,
                m.dl_mpc,
                m.dl_mpc + m.dl_err_mpc,
                BLACK.filled(),
                6,
            )
        }))?
        .label("SN Ia measurements")
        .legend(|(x, y)| Circle::new((x + 9, y), 3, BLACK.filled()));

    let curve: Vec<(f64, f64)> = (0..=100)
        .map(|i| {
            let z = i as f64 / 100.0 * max_z;
            (z, luminosity_distance_mpc(z, omega_best))
        })
        .collect();
    chart
        .draw_series(LineSeries::new(curve, RED.stroke_width(2)))?
        .label(format!("Best fit, Omega_m = {omega_best:.2}"))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], RED.stroke_width(2)));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .border_style(BLACK)
        .background_style(WHITE.mix(0.85))
        .draw()?;
    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn einstein_de_sitter_distance_matches_closed_form() {
        // Omega_m = 1: D_C = 2 (c/H0) (1 - 1/sqrt(1+z))
        for z in [0.1, 0.5, 1.0, 2.0] {
            let numeric = comoving_integral(z, 1.0);
            let exact = 2.0 * (1.0 - 1.0 / (1.0 + z).sqrt());
            assert!(
                (numeric - exact).abs() < 1e-6,
                "z={z}: {numeric} vs {exact}"
            );
        }
    }

    #[test]
    fn luminosity_distance_grows_with_redshift() {
        let mut prev = 0.0;
        for i in 1..20 {
            let z = i as f64 * 0.1;
            let dl = luminosity_distance_mpc(z, 0.3);
            assert!(dl > prev);
            prev = dl;
        }
    }

    #[test]
    fn chi_squared_scan_recovers_generating_omega() {
        let omega_true = 0.30;
        let measurements: Vec<Measurement> = (1..=12)
            .map(|i| {
                let z = i as f64 * 0.15;
                Measurement {
                    z,
                    dl_mpc: luminosity_distance_mpc(z, omega_true),
                    dl_err_mpc: 50.0,
                }
            })
            .collect();
        let (best, chi2) = best_fit_omega(&measurements);
        assert!((best - omega_true).abs() < 1e-9);
        assert!(chi2 < 1e-12);
    }

    #[test]
    fn flux_to_distance_inverts_the_square_law() {
        // a supernova placed at exactly 100 Mpc
        let dl_cm = 100.0 * MPC_TO_CM;
        let flux = SN_LUMINOSITY / (4.0 * std::f64::consts::PI * dl_cm * dl_cm);
        let rows = [SupernovaRow {
            z: 0.023,
            flux,
            flux_err: 0.1 * flux,
        }];
        let m = to_measurements(&rows);
        assert!((m[0].dl_mpc - 100.0).abs() < 1e-6);
        assert!((m[0].dl_err_mpc - 5.0).abs() < 1e-6);
    }

    #[test]
    fn catalog_parses_the_course_header() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("sn_data.csv");
        let mut f = std::fs::File::create(&path).expect("create");
        writeln!(f, "z,flux (erg/s/cm2),err_flux(erg/s/cm2)").expect("write");
        writeln!(f, "0.5,1.2e-14,3.0e-16").expect("write");
        writeln!(f, "1.0,3.1e-15,2.0e-16").expect("write");
        drop(f);
        let rows = load_catalog(&path).expect("load");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].z, 0.5);
        assert_eq!(rows[1].flux, 3.1e-15);
    }

    #[test]
    fn empty_catalog_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("empty.csv");
        std::fs::write(&path, "z,flux (erg/s/cm2),err_flux(erg/s/cm2)\n").expect("write");
        assert!(load_catalog(&path).is_err());
    }
}
