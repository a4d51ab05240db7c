use macroquad::color::Color;

/// Fixed tuning for the simulation core. Built once in `main` and handed to
/// the loop and renderer at construction; nothing mutates it afterwards.
#[derive(Debug, Clone, Copy)]
pub struct SimConfig {
    /// Rest wavelength of the emitted line, nm (H-alpha).
    pub rest_wavelength_nm: f64,
    /// Length of the emission window, simulated seconds.
    pub emission_duration: f64,
    /// Samples taken along the line of sight each frame.
    pub ray_samples: usize,
    /// nm -> world-distance period of the drawn sine.
    pub wavelength_world_scale: f64,
    /// Floor on the drawn period so strong blueshifts stay resolvable.
    pub min_world_period: f64,
    /// Screen-space wave amplitude, px (constant, amplitude carries no physics).
    pub wave_amplitude_px: f32,
    pub wave_thickness: f32,
    /// Wavelength-graph history length, samples.
    pub graph_history: usize,
    /// Backdrop star count.
    pub star_count: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            rest_wavelength_nm: 656.0,
            emission_duration: 25.0,
            ray_samples: 420,
            wavelength_world_scale: 0.075,
            min_world_period: 2.0,
            wave_amplitude_px: 18.0,
            wave_thickness: 3.0,
            graph_history: 900,
            star_count: 900,
        }
    }
}

/// Display palette, sci-fi dark theme.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub bg: Color,
    pub grid: Color,
    pub graph_grid: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub observer: Color,
    pub galaxy: Color,
    pub galaxy_core: Color,
    pub velocity_arrow: Color,
    pub rest_line: Color,
    pub paused: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            bg: Color::from_rgba(10, 10, 20, 255),
            grid: Color::from_rgba(35, 35, 55, 255),
            graph_grid: Color::from_rgba(40, 40, 60, 255),
            text_primary: Color::from_rgba(220, 220, 240, 255),
            text_secondary: Color::from_rgba(150, 150, 180, 255),
            observer: Color::from_rgba(0, 255, 100, 255),
            galaxy: Color::from_rgba(64, 156, 255, 255),
            galaxy_core: Color::from_rgba(100, 150, 255, 255),
            velocity_arrow: Color::from_rgba(255, 128, 0, 255),
            rest_line: Color::from_rgba(0, 255, 100, 255),
            paused: Color::from_rgba(255, 220, 120, 255),
        }
    }
}
