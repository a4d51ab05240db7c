//! Extended-range wavelength to color. Wider than the visible band so
//! strongly shifted light still reads on screen: extreme UV renders as a
//! pale cyan-white, the near infrared as darkening false-color red.

use plotters::style::RGBColor;

pub fn wavelength_to_rgb(wl: f64) -> (u8, u8, u8) {
    if wl < 300.0 {
        return (150, 200, 255);
    }
    if wl < 380.0 {
        let t = (wl - 300.0) / 80.0;
        return ((150.0 - 75.0 * t) as u8, (200.0 - 200.0 * t) as u8, 255);
    }
    if wl < 440.0 {
        let t = (wl - 380.0) / 60.0;
        return ((138.0 * (1.0 - t)) as u8, 0, 255);
    }
    if wl < 490.0 {
        let t = (wl - 440.0) / 50.0;
        return (0, (255.0 * t) as u8, 255);
    }
    if wl < 510.0 {
        let t = (wl - 490.0) / 20.0;
        return (0, 255, (255.0 * (1.0 - t)) as u8);
    }
    if wl < 580.0 {
        let t = (wl - 510.0) / 70.0;
        return ((255.0 * t) as u8, 255, 0);
    }
    if wl < 645.0 {
        let t = (wl - 580.0) / 65.0;
        return (255, (255.0 * (1.0 - t)) as u8, 0);
    }
    if wl < 780.0 {
        return (255, 0, 0);
    }
    if wl < 1200.0 {
        let t = (wl - 780.0) / 420.0;
        let factor = (1.0 - t * 0.6).max(0.3);
        return ((255.0 * factor) as u8, 0, 0);
    }
    (100, 0, 0)
}

pub fn wavelength_color(wl: f64) -> RGBColor {
    let (r, g, b) = wavelength_to_rgb(wl);
    RGBColor(r, g, b)
}
