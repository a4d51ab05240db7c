pub mod camera;

use macroquad::prelude::*;

use crate::color::wavelength_to_color;
use crate::config::{SimConfig, Theme};
use crate::sim::Simulation;

use camera::Camera;

/// Fraction of the window given to the visualization; the rest is panel.
pub const VIZ_FRACTION: f32 = 0.70;

struct Star {
    pos: Vec2,
    depth: f32,
    brightness: f32,
    radius: f32,
}

pub struct Renderer {
    pub camera: Camera,
    config: SimConfig,
    theme: Theme,
    stars: Vec<Star>,
}

impl Renderer {
    pub fn new(config: SimConfig, theme: Theme) -> Self {
        rand::srand(2);
        let stars = (0..config.star_count)
            .map(|_| Star {
                pos: Vec2::new(
                    rand::gen_range(-7000.0, 7000.0),
                    rand::gen_range(-7000.0, 7000.0),
                ),
                depth: rand::gen_range(0.15, 1.0),
                brightness: rand::gen_range(0.25, 1.0),
                radius: rand::gen_range(1.0, 2.5),
            })
            .collect();
        let camera = Camera::new(screen_width() * VIZ_FRACTION, screen_height() * 0.5);
        Self {
            camera,
            config,
            theme,
            stars,
        }
    }

    fn priority_points(sim: &Simulation) -> [Vec2; 2] {
        let (gx, gy) = sim.source_position();
        [Vec2::ZERO, Vec2::new(gx as f32, gy as f32)]
    }

    /// Re-seed the camera on the current scene (reset / mode change).
    pub fn snap_camera(&mut self, sim: &Simulation) {
        self.camera
            .set_viewport(screen_width() * VIZ_FRACTION, screen_height() * 0.5);
        self.camera.snap_to(&Self::priority_points(sim));
    }

    pub fn draw(&mut self, sim: &Simulation) {
        let viz_w = screen_width() * VIZ_FRACTION;
        let top_h = screen_height() * 0.5;

        self.camera.set_viewport(viz_w, top_h);
        self.camera.update(&Self::priority_points(sim));

        clear_background(self.theme.bg);
        self.draw_stars(viz_w, top_h);
        self.draw_grid(viz_w, top_h);
        self.draw_wave(sim, viz_w, top_h);
        self.draw_objects(sim);

        draw_text(
            &format!("Wave Propagation - {}", sim.mode.label().to_uppercase()),
            15.0,
            28.0,
            24.0,
            self.theme.text_primary,
        );
        draw_text(
            &format!("a(t) = {:.3}   t = {:.1}s", sim.universe.scale_factor, sim.universe.time),
            15.0,
            52.0,
            18.0,
            self.theme.text_secondary,
        );
        if sim.paused {
            draw_text("PAUSED", viz_w - 130.0, 28.0, 26.0, self.theme.paused);
        }

        draw_line(0.0, top_h, viz_w, top_h, 2.0, self.theme.grid);
        self.draw_graph(sim, viz_w, top_h);
        // panel divider; the egui window sits to the right of this line
        draw_line(viz_w, 0.0, viz_w, screen_height(), 2.0, self.theme.grid);
    }

    fn draw_stars(&self, viz_w: f32, top_h: f32) {
        for star in &self.stars {
            let p = self.camera.project_parallax(star.pos, star.depth);
            if p.x >= 0.0 && p.x < viz_w && p.y >= 0.0 && p.y < top_h {
                let c = (80.0 + 175.0 * star.brightness) as u8;
                draw_circle(p.x, p.y, star.radius, Color::from_rgba(c, c, c, 255));
            }
        }
    }

    fn draw_grid(&self, viz_w: f32, top_h: f32) {
        const SPACING: f32 = 100.0;
        let mut x = 0.0;
        while x < viz_w {
            draw_line(x, 0.0, x, top_h, 1.0, self.theme.grid);
            x += SPACING;
        }
        let mut y = 0.0;
        while y < top_h {
            draw_line(0.0, y, viz_w, y, 1.0, self.theme.grid);
            y += SPACING;
        }
    }

    /// The traveling sine along the line of sight. Samples outside the
    /// emission window break the polyline, so the train has moving ends.
    fn draw_wave(&self, sim: &Simulation, viz_w: f32, top_h: f32) {
        let Some(wave) = &sim.wave else {
            return;
        };
        let now = sim.universe.time;
        let (sx, sy) = sim.source_position();
        let d = (sx * sx + sy * sy).sqrt();
        if d < 1e-6 {
            return;
        }
        let (ux, uy) = (sx / d, sy / d);
        let (nx, ny) = (-uy, ux);

        let amp_world = self.config.wave_amplitude_px as f64 / self.camera.zoom.max(1e-6) as f64;
        let wave_speed = sim.wave_speed();
        let travel = wave_speed * now;

        let samples = self.config.ray_samples;
        let mut prev: Option<(Vec2, Color)> = None;
        for i in 0..samples {
            let r = i as f64 / (samples - 1) as f64 * d;
            let Some(s) = wave.sample(&sim.universe, &sim.source, r, now, wave_speed) else {
                prev = None;
                continue;
            };

            let period = (self.config.wavelength_world_scale * s.wavelength)
                .max(self.config.min_world_period);
            let phase = std::f64::consts::TAU * ((r - travel) / period);
            let off = amp_world * phase.sin();

            let world = Vec2::new((ux * r + nx * off) as f32, (uy * r + ny * off) as f32);
            let p = self.camera.project(world);
            let color = wavelength_to_color(s.wavelength);

            if let Some((q, qcolor)) = prev {
                let margin = 50.0;
                let on_screen = |v: Vec2| {
                    v.x > -margin && v.x < viz_w + margin && v.y > -margin && v.y < top_h + margin
                };
                if on_screen(p) || on_screen(q) {
                    draw_line(q.x, q.y, p.x, p.y, self.config.wave_thickness, qcolor);
                }
            }
            prev = Some((p, color));
        }
    }

    fn draw_objects(&self, sim: &Simulation) {
        // observer
        let o = self.camera.project(Vec2::ZERO);
        draw_circle(o.x, o.y, 15.0, self.theme.observer);
        draw_circle(o.x, o.y, 11.0, self.theme.bg);
        draw_circle(o.x, o.y, 6.0, self.theme.observer);
        draw_text("Observer", o.x - 30.0, o.y + 32.0, 16.0, self.theme.observer);

        // galaxy
        let (gx, gy) = sim.source_position();
        let g = self.camera.project(Vec2::new(gx as f32, gy as f32));
        draw_circle(g.x, g.y, 18.0, self.theme.galaxy);
        draw_circle(g.x, g.y, 12.0, self.theme.galaxy_core);
        draw_circle(g.x, g.y, 6.0, WHITE);
        draw_text("Galaxy", g.x - 22.0, g.y + 36.0, 16.0, self.theme.galaxy);

        // velocity arrow
        if sim.mode.has_peculiar_motion() {
            let a = if sim.mode.expands() {
                sim.universe.scale_factor
            } else {
                1.0
            };
            let (vx, vy) = sim
                .source
                .velocity_vector(a, sim.universe.time, sim.mode);
            let mag = (vx * vx + vy * vy).sqrt();
            if mag > 100.0 {
                let scale = 60.0 / 5000.0;
                let end = Vec2::new(g.x + (vx * scale) as f32, g.y + (vy * scale) as f32);
                draw_line(g.x, g.y, end.x, end.y, 3.0, self.theme.velocity_arrow);
                let angle = (end.y - g.y).atan2(end.x - g.x);
                let size = 10.0;
                let p1 = end;
                let p2 = Vec2::new(
                    end.x - size * (angle - 0.5).cos(),
                    end.y - size * (angle - 0.5).sin(),
                );
                let p3 = Vec2::new(
                    end.x - size * (angle + 0.5).cos(),
                    end.y - size * (angle + 0.5).sin(),
                );
                draw_triangle(p1, p2, p3, self.theme.velocity_arrow);
            }
        }
    }

    /// Wavelength-vs-time graph in the bottom half of the viz area.
    fn draw_graph(&self, sim: &Simulation, viz_w: f32, top_h: f32) {
        let pad = 55.0;
        let gx0 = pad;
        let gy0 = top_h + pad;
        let gw = viz_w - 2.0 * pad;
        let gh = top_h - 2.0 * pad;

        draw_rectangle(0.0, top_h + 1.0, viz_w, top_h, self.theme.bg);
        draw_line(gx0, gy0 + gh, gx0 + gw, gy0 + gh, 2.0, self.theme.text_secondary);
        draw_line(gx0, gy0, gx0, gy0 + gh, 2.0, self.theme.text_secondary);
        draw_text("Time", gx0 + gw / 2.0, gy0 + gh + 30.0, 15.0, self.theme.text_secondary);
        draw_text("Wavelength (nm)", gx0 - 40.0, gy0 - 15.0, 15.0, self.theme.text_secondary);

        for k in 1..6 {
            let y = gy0 + k as f32 * gh / 6.0;
            draw_line(gx0, y, gx0 + gw, y, 1.0, self.theme.graph_grid);
        }
        for k in 1..8 {
            let x = gx0 + k as f32 * gw / 8.0;
            draw_line(x, gy0, x, gy0 + gh, 1.0, self.theme.graph_grid);
        }

        let rest = sim.rest_wavelength();
        let history = sim.wavelength_history();
        if history.len() < 2 {
            let y = gy0 + gh / 2.0;
            draw_line(gx0, y, gx0 + gw, y, 1.0, self.theme.rest_line);
            draw_text("Rest", gx0 + gw - 50.0, y - 8.0, 15.0, self.theme.rest_line);
            return;
        }

        let (mut min_t, mut max_t) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut min_wl, mut max_wl) = (f64::INFINITY, f64::NEG_INFINITY);
        for &(t, wl) in history {
            min_t = min_t.min(t);
            max_t = max_t.max(t);
            min_wl = min_wl.min(wl);
            max_wl = max_wl.max(wl);
        }
        if max_t <= min_t {
            max_t = min_t + 1.0;
        }
        min_wl = min_wl.min(rest - 80.0);
        max_wl = max_wl.max(rest + 260.0);

        let to_screen = |t: f64, wl: f64| {
            Vec2::new(
                gx0 + ((t - min_t) / (max_t - min_t)) as f32 * gw,
                gy0 + gh - ((wl - min_wl) / (max_wl - min_wl)) as f32 * gh,
            )
        };

        let mut prev: Option<(Vec2, f64)> = None;
        for &(t, wl) in history {
            let p = to_screen(t, wl);
            if let Some((q, qwl)) = prev {
                draw_line(q.x, q.y, p.x, p.y, 2.0, wavelength_to_color(qwl));
            }
            prev = Some((p, wl));
        }

        let rest_y = to_screen(min_t, rest).y;
        if rest_y >= gy0 && rest_y <= gy0 + gh {
            draw_line(gx0, rest_y, gx0 + gw, rest_y, 1.0, self.theme.rest_line);
            draw_text(
                &format!("Rest ({rest:.0}nm)"),
                gx0 + gw - 120.0,
                rest_y - 8.0,
                15.0,
                self.theme.rest_line,
            );
        }

        if let Some(&(t, wl)) = history.back() {
            let p = to_screen(t, wl);
            draw_circle(p.x, p.y, 4.0, wavelength_to_color(wl));
        }
    }
}
