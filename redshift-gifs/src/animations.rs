//! The three looping animations. Each renders its frames straight into a
//! GIF through the plotters bitmap backend; `present()` closes a frame.

use std::f64::consts::TAU;
use std::path::Path;

use anyhow::Result;
use plotters::prelude::*;

use crate::color::{wavelength_color, wavelength_to_rgb};
use crate::config::AnimationConfig;
use crate::physics::{cosmological_redshift, doppler_factor, gravitational_redshift};
use crate::scene::{draw_stars, glow_circle, glow_polyline, label, starfield, title, watermark};

const BG: RGBColor = RGBColor(0, 0, 0);
const ARROW: RGBColor = RGBColor(255, 200, 100);
const OBSERVER: RGBColor = RGBColor(0, 255, 150);
const DIM_TEXT: RGBColor = RGBColor(150, 150, 200);

/// A source gliding past a fixed observer, wavefronts compressed ahead of
/// it and stretched behind.
pub fn render_doppler(cfg: &AnimationConfig, out: &Path) -> Result<()> {
    let velocity = 60_000.0; // km/s, 0.2c so the shift is plainly visible
    let rest_nm = 500.0;
    let wave_speed = 400.0; // px/s, visual
    let (w, h) = (cfg.width as f64, cfg.height as f64);
    let stars = starfield(cfg);

    let wl_ahead = rest_nm * doppler_factor(-velocity);
    let wl_behind = rest_nm * doppler_factor(velocity);

    let root =
        BitMapBackend::gif(out, (cfg.width, cfg.height), cfg.frame_delay_ms())?.into_drawing_area();

    for frame_num in 0..cfg.frame_count() {
        let t = frame_num as f64 / cfg.fps as f64;
        root.fill(&BG)?;
        draw_stars(&root, &stars, 0.3, t * 20.0, cfg.width)?;

        let source_x = (w * 0.2 + (t / cfg.seconds) * w * 0.6).rem_euclid(w * 0.8) + w * 0.1;
        let source_y = h / 2.0;

        // concentric wavefronts, squashed toward the direction of motion
        let num_waves = 12;
        let phase = t * wave_speed;
        for i in 0..num_waves {
            let base_radius = (phase + i as f64 * 80.0).rem_euclid(w * 0.8);
            if base_radius < 10.0 {
                continue;
            }
            let fade = (1.0 - base_radius / (w * 0.8)).max(0.2);

            let segments = 120;
            let mut prev: Option<((i32, i32), RGBColor)> = None;
            for j in 0..=segments {
                let angle = j as f64 / segments as f64 * TAU;
                let ahead = angle.cos(); // > 0 in the direction of motion
                let r = base_radius * (1.0 - ahead * 0.25);
                let wl = if ahead > 0.0 {
                    rest_nm + ahead * (wl_ahead - rest_nm)
                } else {
                    rest_nm - ahead * (wl_behind - rest_nm)
                };
                let x = (source_x + r * angle.cos()) as i32;
                // flattened for a 2.5D look
                let y = (source_y + r * angle.sin() * 0.5) as i32;
                let (cr, cg, cb) = wavelength_to_rgb(wl);
                let color = RGBColor(
                    (cr as f64 * fade) as u8,
                    (cg as f64 * fade) as u8,
                    (cb as f64 * fade) as u8,
                );
                if let Some((p, pc)) = prev {
                    root.draw(&PathElement::new(vec![p, (x, y)], pc.stroke_width(2)))?;
                }
                prev = Some(((x, y), color));
            }
        }

        glow_circle(
            &root,
            (source_x as i32, source_y as i32),
            12,
            wavelength_color(rest_nm),
            cfg.glow_passes,
        )?;

        // velocity arrow
        let (ax0, ax1) = (source_x as i32 + 18, source_x as i32 + 70);
        let ay = source_y as i32;
        root.draw(&PathElement::new(
            vec![(ax0, ay), (ax1, ay)],
            ARROW.stroke_width(3),
        ))?;
        root.draw(&Polygon::new(
            vec![(ax1 + 8, ay), (ax1 - 4, ay - 6), (ax1 - 4, ay + 6)],
            ARROW.filled(),
        ))?;

        // observer
        let (ox, oy) = ((w * 0.15) as i32, (h / 2.0) as i32);
        root.draw(&Circle::new((ox, oy), 12, OBSERVER.filled()))?;
        root.draw(&Circle::new((ox, oy), 12, WHITE.stroke_width(1)))?;

        title(&root, "Doppler Redshift", cfg.width)?;
        label(
            &root,
            &format!("{wl_behind:.0} nm  <- redshifted"),
            (source_x as i32 - 190, source_y as i32 - 50),
            wavelength_color(wl_behind),
        )?;
        label(
            &root,
            &format!("blueshifted ->  {wl_ahead:.0} nm"),
            (source_x as i32 + 60, source_y as i32 - 50),
            wavelength_color(wl_ahead),
        )?;
        watermark(&root, "Doppler", cfg.height)?;

        root.present()?;
    }
    Ok(())
}

/// A comoving grid inflating while an in-flight wave stretches with it.
pub fn render_cosmological(cfg: &AnimationConfig, out: &Path) -> Result<()> {
    let rest_nm = 480.0;
    let max_scale = 2.0;
    let grid_spacing = 100.0;
    let (w, h) = (cfg.width as f64, cfg.height as f64);
    let (cx, cy) = (w / 2.0, h / 2.0);
    let stars = starfield(cfg);

    let root =
        BitMapBackend::gif(out, (cfg.width, cfg.height), cfg.frame_delay_ms())?.into_drawing_area();

    for frame_num in 0..cfg.frame_count() {
        let t = frame_num as f64 / cfg.fps as f64;
        root.fill(&BG)?;
        draw_stars(&root, &stars, 0.1, 0.0, cfg.width)?;

        // breathing scale factor so the loop closes seamlessly
        let progress = t / cfg.seconds;
        let scale = 1.0 + (max_scale - 1.0) * (1.0 - (progress * TAU).cos()) / 2.0;

        // expanding grid, fading away from the center
        let spacing = grid_spacing * scale;
        let max_lines = 20;
        for i in -max_lines..=max_lines {
            let fade = (1.0 - (i as f64).abs() / max_lines as f64).max(0.1);
            let shade = RGBColor(
                (40.0 * fade) as u8,
                (40.0 * fade) as u8,
                (80.0 * fade) as u8,
            );
            let x = cx + i as f64 * spacing;
            if (0.0..=w).contains(&x) {
                root.draw(&PathElement::new(
                    vec![(x as i32, 0), (x as i32, h as i32)],
                    shade.stroke_width(1),
                ))?;
            }
            let y = cy + i as f64 * spacing;
            if (0.0..=h).contains(&y) {
                root.draw(&PathElement::new(
                    vec![(0, y as i32), (w as i32, y as i32)],
                    shade.stroke_width(1),
                ))?;
            }
        }
        // galaxies riding the grid intersections
        for i in -5i32..=5 {
            for j in -3i32..=3 {
                let gx = cx + i as f64 * spacing;
                let gy = cy + j as f64 * spacing;
                if gx > 50.0 && gx < w - 50.0 && gy > 50.0 && gy < h - 50.0 {
                    root.draw(&Circle::new(
                        (gx as i32, gy as i32),
                        3,
                        RGBColor(100, 100, 150).filled(),
                    ))?;
                }
            }
        }

        // the traveling wave packet, stretched by the expansion
        let photon_x = w * 0.1 + progress * w * 0.8;
        let photon_y = h * 0.35;
        let wl_observed = rest_nm * scale;
        let color = wavelength_color(wl_observed);
        let packet_len = 300.0;
        let visual_wavelength = 40.0 * scale;
        let amplitude = 30.0;

        let points: Vec<(i32, i32)> = (0..100)
            .map(|i| {
                let frac = i as f64 / 99.0;
                let x = photon_x - packet_len * (1.0 - frac);
                let phase = (x - photon_x) / visual_wavelength * TAU;
                let envelope = (-((frac - 0.5).powi(2)) * 8.0).exp();
                let y = photon_y + amplitude * (phase + t * 10.0).sin() * envelope;
                (x as i32, y as i32)
            })
            .collect();
        glow_polyline(&root, &points, color, 3, cfg.glow_passes)?;
        glow_circle(
            &root,
            (photon_x as i32, photon_y as i32),
            7,
            color,
            cfg.glow_passes,
        )?;
        label(
            &root,
            &format!("lambda = {wl_observed:.0} nm"),
            (photon_x as i32 - 40, photon_y as i32 + 55),
            color,
        )?;

        // scale-factor box
        let (bx, by) = (w as i32 - 230, 70);
        root.draw(&Rectangle::new(
            [(bx, by), (bx + 200, by + 70)],
            RGBColor(100, 100, 200).stroke_width(2),
        ))?;
        label(&root, "Scale Factor", (bx + 18, by + 14), DIM_TEXT)?;
        label(
            &root,
            &format!("a(t) = {scale:.3}"),
            (bx + 18, by + 42),
            RGBColor(200, 200, 255),
        )?;

        let z = cosmological_redshift(1.0, scale);
        label(
            &root,
            &format!("lambda_obs = lambda_emit x a(t)    1 + z = a_obs / a_emit    z = {z:.3}"),
            (40, h as i32 - 60),
            DIM_TEXT,
        )?;

        title(&root, "Cosmological Redshift", cfg.width)?;
        watermark(&root, "Cosmological", cfg.height)?;
        root.present()?;
    }
    Ok(())
}

/// A wave climbing out of a potential well, reddening as it goes.
pub fn render_gravitational(cfg: &AnimationConfig, out: &Path) -> Result<()> {
    let rest_nm = 450.0;
    let rs = 60.0; // visual Schwarzschild radius, px
    let (w, h) = (cfg.width as f64, cfg.height as f64);
    let cx = w / 2.0;
    let base_y = h * 0.75;
    let well_depth = h * 0.4;
    let stars = starfield(cfg);

    let root =
        BitMapBackend::gif(out, (cfg.width, cfg.height), cfg.frame_delay_ms())?.into_drawing_area();

    for frame_num in 0..cfg.frame_count() {
        let t = frame_num as f64 / cfg.fps as f64;
        root.fill(&BG)?;
        draw_stars(&root, &stars, 0.2, 0.0, cfg.width)?;

        // the potential curve U(r) = -GM/r, drawn as a well
        let well_width = w * 0.7;
        let curve: Vec<(i32, i32)> = (0..200)
            .map(|i| {
                let x = cx - well_width / 2.0 + i as f64 / 199.0 * well_width;
                let r = (x - cx).abs() + 50.0;
                let y = (base_y - well_depth * 100.0 / r).clamp(h * 0.2, base_y);
                (x as i32, y as i32)
            })
            .collect();
        glow_polyline(&root, &curve, RGBColor(100, 60, 150), 2, cfg.glow_passes)?;

        // the central mass
        let (mx, my) = (cx as i32, (base_y - 30.0) as i32);
        for ring in (1..=4).rev() {
            root.draw(&Circle::new(
                (mx, my),
                8 + ring * 8,
                RGBColor(80, 40, 120).mix(0.25 / ring as f64).filled(),
            ))?;
        }
        root.draw(&Circle::new((mx, my), 15, RGBColor(20, 10, 40).filled()))?;
        root.draw(&Circle::new(
            (mx, my),
            15,
            RGBColor(150, 100, 200).stroke_width(2),
        ))?;
        label(&root, "M", (mx - 5, my + 25), RGBColor(150, 100, 200))?;

        // photon climbing out, eased so the loop reads naturally
        let progress = (t / cfg.seconds).rem_euclid(1.0);
        let eased = 1.0 - (1.0 - progress).powi(2);
        let r_min = 80.0;
        let r_max = w * 0.35;
        let r = r_min + eased * (r_max - r_min);

        let photon_x = cx + r;
        let photon_y = base_y - well_depth * 100.0 / r - 20.0;

        let z = gravitational_redshift(r, rs);
        let wavelength = rest_nm * (1.0 + z);
        let color = wavelength_color(wavelength);

        // wave packet pointed up and out of the well
        let (dir_x, dir_y) = (0.8, -0.6);
        let (perp_x, perp_y) = (-dir_y, dir_x);
        let packet_len = 150.0;
        let visual_wl = 25.0 * (1.0 + z * 2.0);
        let amplitude = 15.0;
        let points: Vec<(i32, i32)> = (0..60)
            .map(|i| {
                let frac = i as f64 / 59.0;
                let along = packet_len * (frac - 0.5);
                let phase = along / visual_wl * TAU + t * 15.0;
                let envelope = (-((frac - 0.5).powi(2)) * 10.0).exp();
                let osc = amplitude * phase.sin() * envelope;
                (
                    (photon_x + dir_x * along + perp_x * osc) as i32,
                    (photon_y + dir_y * along + perp_y * osc) as i32,
                )
            })
            .collect();
        glow_polyline(&root, &points, color, 3, cfg.glow_passes)?;

        let head = (
            (photon_x + dir_x * packet_len * 0.4) as i32,
            (photon_y + dir_y * packet_len * 0.4) as i32,
        );
        glow_circle(&root, head, 6, color, cfg.glow_passes)?;
        label(
            &root,
            &format!("lambda = {wavelength:.0} nm"),
            (head.0 + 20, head.1 - 28),
            color,
        )?;
        label(
            &root,
            &format!("z = {z:.4}"),
            (head.0 + 20, head.1 - 8),
            RGBColor(200, 200, 200),
        )?;

        title(&root, "Gravitational Redshift", cfg.width)?;
        label(
            &root,
            "U(r) = -GM/r",
            (90, (h * 0.4) as i32),
            RGBColor(150, 100, 200),
        )?;
        label(
            &root,
            "z = 1/sqrt(1 - rs/r) - 1",
            (40, h as i32 - 60),
            DIM_TEXT,
        )?;
        watermark(&root, "Gravitational", cfg.height)?;
        root.present()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Doppler geometry used by the ring renderer: ahead of the source the
    /// radius shrinks and the color slides blueward, behind it redward.
    #[test]
    fn wavefronts_are_asymmetric_around_the_source() {
        let rest = 500.0;
        let v = 60_000.0;
        let wl_ahead = rest * doppler_factor(-v);
        let wl_behind = rest * doppler_factor(v);
        assert!(wl_ahead < rest && rest < wl_behind);

        let base = 100.0;
        let r_ahead = base * (1.0 - 1.0 * 0.25); // cos = 1
        let r_behind = base * (1.0 - (-1.0) * 0.25); // cos = -1
        assert!(r_ahead < base && base < r_behind);
    }

    #[test]
    fn breathing_scale_factor_closes_the_loop() {
        let cfg = AnimationConfig::default();
        let scale_at = |t: f64| {
            let progress = t / cfg.seconds;
            1.0 + (2.0 - 1.0) * (1.0 - (progress * TAU).cos()) / 2.0
        };
        assert!((scale_at(0.0) - 1.0).abs() < 1e-12);
        assert!((scale_at(cfg.seconds) - 1.0).abs() < 1e-9);
        assert!((scale_at(cfg.seconds / 2.0) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn climbing_photon_only_reddens() {
        let rest = 450.0;
        let rs = 60.0;
        let mut prev_wl = f64::INFINITY;
        for step in 0..50 {
            let r = 80.0 + step as f64 * 5.0;
            let wl = rest * (1.0 + gravitational_redshift(r, rs));
            assert!(wl <= prev_wl);
            assert!(wl >= rest);
            prev_wl = wl;
        }
    }

    #[test]
    fn gif_backend_writes_frames() {
        // exercise the drawing stack (stars, glow strokes, frame advance)
        // without text, which needs a system font
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = AnimationConfig {
            width: 120,
            height: 80,
            fps: 5,
            seconds: 0.6,
            star_count: 20,
            ..AnimationConfig::default()
        };
        let path = dir.path().join("frames.gif");
        {
            let root = BitMapBackend::gif(&path, (cfg.width, cfg.height), cfg.frame_delay_ms())
                .expect("gif backend")
                .into_drawing_area();
            let stars = starfield(&cfg);
            for frame in 0..cfg.frame_count() {
                root.fill(&BG).expect("fill");
                draw_stars(&root, &stars, 0.3, frame as f64 * 4.0, cfg.width).expect("stars");
                glow_polyline(
                    &root,
                    &[(5, 40), (60, 20), (115, 40)],
                    wavelength_color(500.0 + frame as f64 * 40.0),
                    2,
                    cfg.glow_passes,
                )
                .expect("stroke");
                glow_circle(&root, (60, 40), 6, wavelength_color(656.0), cfg.glow_passes)
                    .expect("glyph");
                root.present().expect("frame");
            }
        }
        let bytes = std::fs::read(&path).expect("read");
        assert!(bytes.starts_with(b"GIF8"));
        assert!(bytes.len() > 100);
    }
}
