use rand::Rng;

use crate::*;

/// Power-law draw over `min..=max`: `min + trunc(r^exponent * (max - min))`.
///
/// `r` is expected in `[0, 1)`; large exponents push almost every draw towards `min`.
pub fn weighted_random(min: u32, max: u32, exponent: f32, r: f64) -> u32 {
    let span = f64::from(max.saturating_sub(min));
    let offset = r.clamp(0.0, 1.0).powf(f64::from(exponent)) * span;
    min.saturating_add(offset as u32)
}

/// Display text for a prize value, snapped to the amounts printed on tickets.
pub fn prize_label(value: u32) -> String {
    match value {
        0..=1 => "$1".into(),
        2 => "$2".into(),
        3..=5 => "$5".into(),
        v if v < 1000 => {
            // f64::round rounds half away from zero
            let tens = (f64::from(v) / 10.0).round() as u64;
            format!("${}", tens * 10)
        }
        v => format!("${}k", (f64::from(v) / 1000.0).round() as u64),
    }
}

/// Draws one prize label using `config`.
pub fn draw_prize<R: Rng + ?Sized>(config: &PrizeConfig, rng: &mut R) -> String {
    let r: f64 = rng.random();
    prize_label(weighted_random(config.min, config.max, config.exponent, r))
}
