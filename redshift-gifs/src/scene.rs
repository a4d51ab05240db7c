//! Frame furniture shared by the animations: seeded starfield, glow
//! strokes and text labels, all drawn in pixel space.

use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::AnimationConfig;

pub type Frame<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

pub struct Star {
    pub x: f64,
    pub y: i32,
    pub radius: i32,
    pub shade: u8,
}

/// Star positions are seeded so every run renders the same backdrop.
pub fn starfield(cfg: &AnimationConfig) -> Vec<Star> {
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    (0..cfg.star_count)
        .map(|_| Star {
            x: rng.gen_range(0.0..cfg.width as f64),
            y: rng.gen_range(0..cfg.height as i32),
            radius: match rng.gen_range(0..7) {
                0..=3 => 1,
                4..=5 => 2,
                _ => 3,
            },
            shade: rng.gen_range(40..180),
        })
        .collect()
}

/// Stars drift horizontally with a parallax factor and wrap at the edge.
pub fn draw_stars(frame: &Frame, stars: &[Star], parallax: f64, offset_x: f64, width: u32) -> Result<()> {
    for star in stars {
        let px = ((star.x + offset_x * parallax).rem_euclid(width as f64)) as i32;
        let color = RGBColor(star.shade, star.shade, star.shade.saturating_add(20));
        frame.draw(&Circle::new((px, star.y), star.radius, color.filled()))?;
    }
    Ok(())
}

/// A polyline stroked several times at widening widths and falling alpha,
/// then once solid on top.
pub fn glow_polyline(
    frame: &Frame,
    points: &[(i32, i32)],
    color: RGBColor,
    width: u32,
    passes: u32,
) -> Result<()> {
    if points.len() < 2 {
        return Ok(());
    }
    for pass in (1..=passes).rev() {
        let alpha = 0.25 / pass as f64;
        frame.draw(&PathElement::new(
            points.to_vec(),
            color.mix(alpha).stroke_width(width + 3 * pass),
        ))?;
    }
    frame.draw(&PathElement::new(points.to_vec(), color.stroke_width(width)))?;
    Ok(())
}

pub fn glow_circle(
    frame: &Frame,
    center: (i32, i32),
    radius: i32,
    color: RGBColor,
    passes: u32,
) -> Result<()> {
    for pass in (1..=passes).rev() {
        let alpha = 0.3 / pass as f64;
        frame.draw(&Circle::new(
            center,
            radius + 4 * pass as i32,
            color.mix(alpha).filled(),
        ))?;
    }
    frame.draw(&Circle::new(center, radius, color.filled()))?;
    Ok(())
}

pub fn title(frame: &Frame, text: &str, width: u32) -> Result<()> {
    let x = width as i32 / 2 - 6 * text.len() as i32;
    frame.draw(&Text::new(
        text.to_owned(),
        (x, 25),
        ("sans-serif", 28).into_font().color(&WHITE),
    ))?;
    Ok(())
}

pub fn label(frame: &Frame, text: &str, pos: (i32, i32), color: RGBColor) -> Result<()> {
    frame.draw(&Text::new(
        text.to_owned(),
        pos,
        ("sans-serif", 17).into_font().color(&color),
    ))?;
    Ok(())
}

pub fn watermark(frame: &Frame, text: &str, height: u32) -> Result<()> {
    label(
        frame,
        text,
        (20, height as i32 - 30),
        RGBColor(180, 180, 180),
    )
}
