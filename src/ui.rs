use egui_macroquad::egui;

use crate::color::wavelength_to_rgb;
use crate::physics::SimulationMode;
use crate::sim::{Controls, Simulation};

/// What the panel asked for this frame. Collected by the closure and
/// applied by the main loop once egui is done with its pass.
#[derive(Default)]
pub struct UiActions {
    pub set_mode: Option<SimulationMode>,
    pub start_emission: bool,
    pub toggle_pause: bool,
    pub reset: bool,
    pub export_csv: bool,
}

pub fn control_panel(
    ctx: &egui::Context,
    sim: &Simulation,
    controls: &mut Controls,
) -> UiActions {
    let mut actions = UiActions::default();

    egui::Window::new("Controls")
        .anchor(egui::Align2::RIGHT_TOP, [-10.0, 10.0])
        .default_width(330.0)
        .resizable(false)
        .show(ctx, |ui| {
            ui.label("Simulation Mode");
            ui.horizontal(|ui| {
                for mode in [
                    SimulationMode::Cosmological,
                    SimulationMode::Doppler,
                    SimulationMode::Mixed,
                ] {
                    if ui
                        .selectable_label(sim.mode == mode, mode.label())
                        .clicked()
                        && sim.mode != mode
                    {
                        actions.set_mode = Some(mode);
                    }
                }
            });
            ui.separator();

            ui.add(egui::Slider::new(&mut controls.hubble, 0.0..=150.0).text("Hubble (H0)"));
            ui.add(
                egui::Slider::new(&mut controls.radial_velocity, -8000.0..=8000.0)
                    .text("Radial Vel (km/s)"),
            );
            ui.add(
                egui::Slider::new(&mut controls.transverse_velocity, -8000.0..=8000.0)
                    .text("Transverse Vel (km/s)"),
            );
            ui.add(
                egui::Slider::new(&mut controls.initial_distance, 200.0..=1000.0)
                    .text("Initial Dist"),
            );
            ui.separator();

            if ui.button("START EMISSION").clicked() {
                actions.start_emission = true;
            }
            ui.horizontal(|ui| {
                let pause_label = if sim.paused { "RESUME" } else { "PAUSE" };
                if ui.button(pause_label).clicked() {
                    actions.toggle_pause = true;
                }
                if ui.button("RESET").clicked() {
                    actions.reset = true;
                }
                if ui.button("Export CSV").clicked() {
                    actions.export_csv = true;
                }
            });
            ui.separator();

            ui.label("Status");
            ui.label(format!("Distance: {:.0} units", sim.distance()));
            ui.label(format!(
                "LOS Vel (closing): {:.0} km/s",
                sim.closing_velocity()
            ));
            let wl = sim.observed_wavelength();
            let (r, g, b) = wavelength_to_rgb(wl);
            ui.label(
                egui::RichText::new(format!("Observed WL: {wl:.1} nm"))
                    .color(egui::Color32::from_rgb(r, g, b)),
            );
            ui.label(format!("Total Redshift (z): {:.4}", sim.total_redshift()));
            ui.label(format!("Emission: {}", sim.emission_label()));
            ui.separator();
            ui.small("Keys: 1/2/3 mode, Space pause, R reset, C export");
        });

    actions
}
