//! Looping GIF generator for the three redshift mechanisms.
//!
//! Usage:
//! ```
//! cargo run --release -p redshift-gifs -- --animation all
//! cargo run --release -p redshift-gifs -- --animation doppler --fps 30 --seconds 4
//! ```

mod animations;
mod color;
mod config;
mod physics;
mod scene;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::info;

use config::AnimationConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Animation {
    Doppler,
    Cosmological,
    Gravitational,
    All,
}

#[derive(Parser)]
#[command(name = "redshift-gifs")]
#[command(about = "Looping GIF animations of Doppler, cosmological and gravitational redshift")]
#[command(version)]
struct Args {
    /// Which animation to render
    #[arg(short, long, value_enum, default_value = "all")]
    animation: Animation,

    /// Frames per second
    #[arg(long, default_value_t = 25)]
    fps: u32,

    /// Seconds per loop
    #[arg(long, default_value_t = 5.0)]
    seconds: f64,

    /// Output frame width in pixels (height is 9/16 of it)
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Directory the GIFs are written to
    #[arg(short, long, default_value = "output")]
    out_dir: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    std::fs::create_dir_all(&args.out_dir)?;

    let cfg = AnimationConfig {
        width: args.width,
        height: args.width * 9 / 16,
        fps: args.fps,
        seconds: args.seconds,
        ..AnimationConfig::default()
    };

    let jobs: &[(Animation, &str, fn(&AnimationConfig, &std::path::Path) -> Result<()>)] = &[
        (Animation::Doppler, "doppler.gif", animations::render_doppler),
        (
            Animation::Cosmological,
            "cosmological.gif",
            animations::render_cosmological,
        ),
        (
            Animation::Gravitational,
            "gravitational.gif",
            animations::render_gravitational,
        ),
    ];

    for (kind, filename, render) in jobs {
        if args.animation != Animation::All && args.animation != *kind {
            continue;
        }
        let path = args.out_dir.join(filename);
        render(&cfg, &path)?;
        info!(
            "wrote {} ({} frames @ {} fps)",
            path.display(),
            cfg.frame_count(),
            cfg.fps
        );
    }

    Ok(())
}
