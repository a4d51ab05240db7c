mod color;
mod config;
mod physics;
mod rendering;
mod sim;
mod ui;

use std::path::Path;

use log::{error, info};
use macroquad::prelude::*;

use config::{SimConfig, Theme};
use physics::SimulationMode;
use rendering::Renderer;
use sim::{Controls, Simulation};

const EXPORT_PATH: &str = "wavelength_history.csv";

fn window_conf() -> Conf {
    Conf {
        window_title: "Redshift Simulation".to_owned(),
        window_width: 1400,
        window_height: 900,
        high_dpi: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();

    let config = SimConfig::default();
    let mut sim = Simulation::new(config);
    let mut controls = Controls::default();
    let mut renderer = Renderer::new(config, Theme::default());
    renderer.snap_camera(&sim);

    loop {
        let dt = get_frame_time() as f64;

        let mut actions = ui::UiActions::default();

        if is_key_pressed(KeyCode::Key1) {
            actions.set_mode = Some(SimulationMode::Cosmological);
        }
        if is_key_pressed(KeyCode::Key2) {
            actions.set_mode = Some(SimulationMode::Doppler);
        }
        if is_key_pressed(KeyCode::Key3) {
            actions.set_mode = Some(SimulationMode::Mixed);
        }
        if is_key_pressed(KeyCode::Space) {
            actions.toggle_pause = true;
        }
        if is_key_pressed(KeyCode::R) {
            actions.reset = true;
        }
        if is_key_pressed(KeyCode::C) {
            actions.export_csv = true;
        }

        sim.update(dt, controls);
        renderer.draw(&sim);

        egui_macroquad::ui(|ctx| {
            let panel = ui::control_panel(ctx, &sim, &mut controls);
            if panel.set_mode.is_some() {
                actions.set_mode = panel.set_mode;
            }
            actions.start_emission |= panel.start_emission;
            actions.toggle_pause |= panel.toggle_pause;
            actions.reset |= panel.reset;
            actions.export_csv |= panel.export_csv;
        });

        if let Some(mode) = actions.set_mode {
            sim.set_mode(mode);
            renderer.snap_camera(&sim);
        }
        if actions.reset {
            sim.reset();
            renderer.snap_camera(&sim);
        }
        if actions.start_emission {
            sim.start_emission();
        }
        if actions.toggle_pause {
            sim.toggle_pause();
        }
        if actions.export_csv {
            match sim.export_history_csv(Path::new(EXPORT_PATH)) {
                Ok(()) => info!("wavelength history written to {EXPORT_PATH}"),
                Err(err) => error!("csv export failed: {err:#}"),
            }
        }

        egui_macroquad::draw();
        next_frame().await;
    }
}
