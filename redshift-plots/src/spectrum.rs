//! Galaxy-spectrum plots: the rest spectrum redshifted to a range of z,
//! a quasar sightline with a Lyman-alpha forest imprinted, and a high-z
//! Gunn-Peterson trough.

use std::path::Path;

use anyhow::{ensure, Context, Result};
use plotters::prelude::*;

/// Lyman-alpha rest wavelength, Angstrom.
pub const LYMAN_ALPHA_A: f64 = 1216.0;

const PLOT_SIZE: (u32, u32) = (1000, 600);

pub struct Spectrum {
    pub wavelength: Vec<f64>,
    pub flux: Vec<f64>,
}

impl Spectrum {
    /// Two whitespace-separated columns: rest wavelength [A], flux.
    /// Blank lines and `#` comments are skipped.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading spectrum {}", path.display()))?;
        let mut wavelength = Vec::new();
        let mut flux = Vec::new();
        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut cols = line.split_whitespace();
            let parse = |field: Option<&str>| -> Result<f64> {
                field
                    .with_context(|| format!("line {}: missing column", lineno + 1))?
                    .parse::<f64>()
                    .with_context(|| format!("line {}: bad number", lineno + 1))
            };
            wavelength.push(parse(cols.next())?);
            flux.push(parse(cols.next())?);
        }
        ensure!(wavelength.len() >= 2, "spectrum needs at least two samples");
        Ok(Self { wavelength, flux })
    }

    pub fn max_flux(&self) -> f64 {
        self.flux.iter().cloned().fold(0.0, f64::max)
    }
}

pub fn gaussian(x: f64, mu: f64, sigma: f64) -> f64 {
    (-0.5 * ((x - mu) / sigma).powi(2)).exp()
}

/// The rest spectrum redrawn at several redshifts, observed wavelength
/// lambda * (1 + z).
pub fn redshift_series_plot(spectrum: &Spectrum, out: &Path) -> Result<()> {
    let redshifts = [0.0, 0.5, 1.0, 2.0];
    let colors = [BLUE, GREEN, RGBColor(255, 140, 0), RED];

    let max_wl = spectrum
        .wavelength
        .iter()
        .cloned()
        .fold(0.0, f64::max)
        * (1.0 + redshifts[redshifts.len() - 1]);
    let min_wl = spectrum.wavelength.iter().cloned().fold(f64::INFINITY, f64::min);

    let root = BitMapBackend::new(out, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Galaxy Spectrum vs Redshift", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(min_wl..max_wl * 1.02, 0.0..spectrum.max_flux() * 1.1)?;
    chart
        .configure_mesh()
        .x_desc("Observed Wavelength [Angstrom]")
        .y_desc("Flux")
        .draw()?;

    for (&z, color) in redshifts.iter().zip(colors) {
        let series = spectrum
            .wavelength
            .iter()
            .zip(&spectrum.flux)
            .map(move |(&w, &f)| (w * (1.0 + z), f));
        chart
            .draw_series(LineSeries::new(series, color.stroke_width(2)))?
            .label(format!("z = {z}"))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], color.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.85))
        .draw()?;
    root.present()?;
    Ok(())
}

/// Flux after imprinting the absorption troughs of foreground clouds onto
/// the redshifted spectrum.
pub fn forest_flux(spectrum: &Spectrum, z_source: f64, clouds_z: &[f64], sigma: f64) -> Vec<(f64, f64)> {
    spectrum
        .wavelength
        .iter()
        .zip(&spectrum.flux)
        .map(|(&w, &f)| {
            let obs = w * (1.0 + z_source);
            let mut flux = f;
            for &zc in clouds_z {
                let center = LYMAN_ALPHA_A * (1.0 + zc);
                flux *= 1.0 - gaussian(obs, center, sigma);
            }
            (obs, flux)
        })
        .collect()
}

pub fn lyman_alpha_forest_plot(spectrum: &Spectrum, out: &Path) -> Result<()> {
    let z_quasar = 3.0;
    let clouds_z = [2.8, 2.5, 2.2, 2.0, 1.5, 1.2, 1.0];
    let data = forest_flux(spectrum, z_quasar, &clouds_z, 30.0);

    let min_wl = data.iter().map(|&(w, _)| w).fold(f64::INFINITY, f64::min);
    let max_wl = data.iter().map(|&(w, _)| w).fold(0.0, f64::max);

    let root = BitMapBackend::new(out, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Quasar Spectrum (z = {z_quasar}) with Lyman-alpha Forest"),
            ("sans-serif", 24),
        )
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(min_wl..max_wl * 1.02, 0.0..spectrum.max_flux() * 1.1)?;
    chart
        .configure_mesh()
        .x_desc("Observed Wavelength [Angstrom]")
        .y_desc("Flux")
        .draw()?;
    chart.draw_series(LineSeries::new(
        data,
        RGBColor(128, 0, 128).stroke_width(2),
    ))?;
    root.present()?;
    Ok(())
}

/// Spectrum at very high z with all flux blueward of the redshifted
/// Lyman-alpha line removed by the neutral intergalactic medium.
pub fn gunn_peterson_plot(spectrum: &Spectrum, out: &Path) -> Result<()> {
    let z_high = 8.0;
    let cutoff = LYMAN_ALPHA_A * (1.0 + z_high);
    let data: Vec<(f64, f64)> = spectrum
        .wavelength
        .iter()
        .zip(&spectrum.flux)
        .map(|(&w, &f)| {
            let obs = w * (1.0 + z_high);
            (obs, if obs < cutoff { 0.0 } else { f })
        })
        .collect();

    let min_wl = data.iter().map(|&(w, _)| w).fold(f64::INFINITY, f64::min);
    let max_wl = data.iter().map(|&(w, _)| w).fold(0.0, f64::max);
    let max_flux = spectrum.max_flux() * 1.1;

    let root = BitMapBackend::new(out, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("High-z Galaxy (z = {z_high}) - Gunn-Peterson Trough"),
            ("sans-serif", 24),
        )
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(min_wl..max_wl * 1.02, 0.0..max_flux)?;
    chart
        .configure_mesh()
        .x_desc("Observed Wavelength [Angstrom]")
        .y_desc("Flux")
        .draw()?;
    chart.draw_series(LineSeries::new(data, RGBColor(139, 0, 0).stroke_width(2)))?;

    // dashed cutoff marker
    let dashes = 40;
    let step = max_flux / dashes as f64;
    chart.draw_series((0..dashes).step_by(2).map(|k| {
        PathElement::new(
            vec![(cutoff, k as f64 * step), (cutoff, (k + 1) as f64 * step)],
            BLACK.stroke_width(1),
        )
    }))?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn toy_spectrum() -> Spectrum {
        let wavelength: Vec<f64> = (0..200).map(|i| 900.0 + 5.0 * i as f64).collect();
        let flux = wavelength
            .iter()
            .map(|&w| 1.0 + gaussian(w, 1400.0, 60.0))
            .collect();
        Spectrum { wavelength, flux }
    }

    #[test]
    fn gaussian_peaks_at_center_and_decays() {
        assert_eq!(gaussian(100.0, 100.0, 30.0), 1.0);
        assert!(gaussian(130.0, 100.0, 30.0) < 1.0);
        assert!(gaussian(400.0, 100.0, 30.0) < 1e-8);
    }

    #[test]
    fn load_skips_comments_and_blank_lines() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("galaxy_spectrum.txt");
        let mut f = std::fs::File::create(&path).expect("create");
        writeln!(f, "# rest wavelength [A]  flux").expect("write");
        writeln!(f, "1200.0 1.5").expect("write");
        writeln!(f).expect("write");
        writeln!(f, "1210.0 2.5").expect("write");
        drop(f);
        let spec = Spectrum::load(&path).expect("load");
        assert_eq!(spec.wavelength, vec![1200.0, 1210.0]);
        assert_eq!(spec.flux, vec![1.5, 2.5]);
    }

    #[test]
    fn load_rejects_malformed_rows() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.txt");
        std::fs::write(&path, "1200.0 not-a-number\n").expect("write");
        assert!(Spectrum::load(&path).is_err());
    }

    #[test]
    fn forest_absorbs_at_cloud_wavelengths() {
        let spec = toy_spectrum();
        let clouds = [2.0];
        let data = forest_flux(&spec, 3.0, &clouds, 30.0);
        let center = LYMAN_ALPHA_A * 3.0; // (1 + z_cloud) with z_cloud = 2
        // the sample closest to the trough center is nearly fully absorbed
        let (_, trough_flux) = data
            .iter()
            .cloned()
            .min_by(|a, b| (a.0 - center).abs().total_cmp(&(b.0 - center).abs()))
            .expect("non-empty");
        let plain = spec
            .wavelength
            .iter()
            .zip(&spec.flux)
            .map(|(&w, &f)| (w * 4.0, f))
            .min_by(|a, b| (a.0 - center).abs().total_cmp(&(b.0 - center).abs()))
            .expect("non-empty")
            .1;
        assert!(trough_flux < 0.05 * plain);
        // far from any cloud the flux is untouched
        let (_, far) = data.last().cloned().expect("non-empty");
        let far_plain = spec.flux.last().cloned().expect("non-empty");
        assert!((far - far_plain).abs() / far_plain < 1e-6);
    }
}
