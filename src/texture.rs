//! Textures/colors

use crate::{Color, Point};

pub type Texture = Box<dyn Textured>;

/// Color that varies over a surface
pub trait Textured: Send + Sync {
    /// Color at surface coordinates `(u, v)`, each in `[0, 1]`, of the hit
    /// point `p` given in world space
    fn value(&self, u: f64, v: f64, p: &Point) -> Color;
}

/// A single color everywhere
#[derive(Debug, Clone)]
pub struct SolidColor {
    color_value: Color,
}
impl SolidColor {
    pub fn new(color: Color) -> Self {
        Self { color_value: color }
    }
}
impl Textured for SolidColor {
    fn value(&self, _u: f64, _v: f64, _p: &Point) -> Color {
        self.color_value
    }
}

/// Checker Texture
///
/// Alternates between two textures in 3-D space, so it wraps any surface
/// without needing (u, v) coordinates.
pub struct Checker {
    odd: Texture,
    even: Texture,
    frequency: f64,
}
impl Checker {
    pub const DEFAULT_FREQUENCY: f64 = 10.0;

    pub fn new(even: Texture, odd: Texture, frequency: f64) -> Self {
        Self {
            odd,
            even,
            frequency,
        }
    }

    pub fn from_solid_colors(c1: Color, c2: Color, frequency: f64) -> Self {
        Self::new(
            Box::new(SolidColor::new(c1)),
            Box::new(SolidColor::new(c2)),
            frequency,
        )
    }
}
impl Textured for Checker {
    fn value(&self, u: f64, v: f64, p: &Point) -> Color {
        let f = self.frequency;
        let sines = (f * p[0]).sin() * (f * p[1]).sin() * (f * p[2]).sin();
        if sines < 0.0 {
            self.odd.value(u, v, p)
        } else {
            self.even.value(u, v, p)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn solid_color_ignores_coordinates() {
        let t = SolidColor::new(Color::new(0.1, 0.2, 0.3));
        assert_eq!(t.value(0.0, 0.0, &Point::zeros()), Color::new(0.1, 0.2, 0.3));
        assert_eq!(
            t.value(0.9, 0.4, &Point::new(5.0, -2.0, 1.0)),
            Color::new(0.1, 0.2, 0.3)
        );
    }

    #[test]
    fn checker_alternates() {
        let white = Color::new(1.0, 1.0, 1.0);
        let black = Color::zeros();
        let t = Checker::from_solid_colors(white, black, 1.0);

        let q = PI / 2.0;
        assert_eq!(t.value(0.0, 0.0, &Point::new(q, q, q)), white);
        assert_eq!(t.value(0.0, 0.0, &Point::new(-q, q, q)), black);
    }
}
