//! Batch plot generator for the redshift course material.
//!
//! Loads `galaxy_spectrum.txt` and `sn_data.csv` from the input directory
//! and writes PNG plots to the output directory. A missing input file only
//! skips the plots that need it.
//!
//! Usage:
//! ```
//! cargo run --release -p redshift-plots -- -i data -o plots
//! ```

mod hubble;
mod spectrum;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::{error, info};

use spectrum::Spectrum;

#[derive(Parser)]
#[command(name = "redshift-plots")]
#[command(about = "Spectrum and supernova plots for the redshift course")]
#[command(version)]
struct Args {
    /// Directory containing galaxy_spectrum.txt and sn_data.csv
    #[arg(short, long, default_value = "data")]
    input_dir: PathBuf,

    /// Directory where PNG plots are written
    #[arg(short, long, default_value = "plots")]
    out_dir: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    std::fs::create_dir_all(&args.out_dir)?;

    let spectrum_path = args.input_dir.join("galaxy_spectrum.txt");
    match Spectrum::load(&spectrum_path) {
        Ok(galaxy) => {
            let out = args.out_dir.join("spectrum_redshift_series.png");
            spectrum::redshift_series_plot(&galaxy, &out)?;
            info!("wrote {}", out.display());

            let out = args.out_dir.join("lyman_alpha_forest.png");
            spectrum::lyman_alpha_forest_plot(&galaxy, &out)?;
            info!("wrote {}", out.display());

            let out = args.out_dir.join("gunn_peterson_trough.png");
            spectrum::gunn_peterson_plot(&galaxy, &out)?;
            info!("wrote {}", out.display());
        }
        Err(err) => error!("skipping spectrum plots: {err:#}"),
    }

    let catalog_path = args.input_dir.join("sn_data.csv");
    match hubble::load_catalog(&catalog_path) {
        Ok(rows) => {
            let measurements = hubble::to_measurements(&rows);
            let (omega_best, chi2) = hubble::best_fit_omega(&measurements);
            info!(
                "best fit Omega_m = {omega_best:.2} (chi^2 = {chi2:.1}, {} supernovae)",
                measurements.len()
            );
            let out = args.out_dir.join("hubble_diagram_fit.png");
            hubble::hubble_diagram_plot(&measurements, omega_best, &out)?;
            info!("wrote {}", out.display());
        }
        Err(err) => error!("skipping Hubble diagram: {err:#}"),
    }

    Ok(())
}
