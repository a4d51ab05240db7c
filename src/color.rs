//! Wavelength to display color. Visible band maps to the usual hue ramp;
//! ultraviolet collapses to indigo and infrared to a deep red that keeps
//! fading the further past the band edge the wavelength falls.

use macroquad::color::Color;

pub fn wavelength_to_rgb(wl: f64) -> (u8, u8, u8) {
    if wl < 380.0 {
        return (75, 0, 130);
    }
    if wl > 750.0 {
        let factor = (1.0 - (wl - 750.0) / 800.0).max(0.4);
        return ((180.0 * factor) as u8, 0, 0);
    }

    if wl < 440.0 {
        let t = (wl - 380.0) / 60.0;
        (((1.0 - t) * 100.0) as u8, 0, 255)
    } else if wl < 490.0 {
        let t = (wl - 440.0) / 50.0;
        (0, (t * 255.0) as u8, 255)
    } else if wl < 510.0 {
        let t = (wl - 490.0) / 20.0;
        (0, 255, ((1.0 - t) * 255.0) as u8)
    } else if wl < 580.0 {
        let t = (wl - 510.0) / 70.0;
        ((t * 255.0) as u8, 255, 0)
    } else if wl < 645.0 {
        let t = (wl - 580.0) / 65.0;
        (255, ((1.0 - t) * 255.0) as u8, 0)
    } else {
        (255, 0, 0)
    }
}

pub fn wavelength_to_color(wl: f64) -> Color {
    let (r, g, b) = wavelength_to_rgb(wl);
    Color::from_rgba(r, g, b, 255)
}
