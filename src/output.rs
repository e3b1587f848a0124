//! Writing rendered images: plain-text P3 or PNG

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::{Rgb, RgbImage};

use crate::error::Result;
use crate::interval::Interval;
use crate::renderer::Image;
use crate::Color;

/// Approximate gamma 2.0
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// scale the color to between 0 and 255
fn scale_color(val: f64) -> u8 {
    let intensity = Interval::new(0.0, 0.999);
    (256.0 * intensity.clamp(val)) as u8
}

/// Gamma-correct, clamp and quantize one pixel
pub fn get_pixel(color: &Color) -> Rgb<u8> {
    Rgb([
        scale_color(linear_to_gamma(color[0])),
        scale_color(linear_to_gamma(color[1])),
        scale_color(linear_to_gamma(color[2])),
    ])
}

/// Write `image` as plain-text P3: header, then one `r g b` line per pixel
pub fn write_ppm<W: Write>(image: &Image, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "P3")?;
    writeln!(out, "{} {}", image.width(), image.height())?;
    writeln!(out, "255")?;
    for color in image.pixels() {
        let Rgb([r, g, b]) = get_pixel(color);
        writeln!(out, "{r} {g} {b}")?;
    }
    out.flush()
}

pub fn to_rgb_image(image: &Image) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        get_pixel(&image.get(x, y))
    })
}

/// Save to `path`; `.png` is encoded as PNG, anything else as P3 text
pub fn save(image: &Image, path: &Path) -> Result<()> {
    let is_png = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("png"));
    if is_png {
        to_rgb_image(image).save(path)?;
    } else {
        let mut out = BufWriter::new(File::create(path)?);
        write_ppm(image, &mut out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gamma_and_clamp() {
        assert_eq!(get_pixel(&Color::new(1.0, 1.0, 1.0)), Rgb([255, 255, 255]));
        assert_eq!(get_pixel(&Color::new(4.0, 0.0, -1.0)), Rgb([255, 0, 0]));
        // sqrt(0.25) = 0.5 -> 128
        assert_eq!(get_pixel(&Color::new(0.25, 0.25, 0.25)), Rgb([128, 128, 128]));
        assert_eq!(get_pixel(&Color::new(f64::NAN, 0.0, 0.0)), Rgb([0, 0, 0]));
    }

    #[test]
    fn ppm_layout() {
        let mut image = Image::new(2, 1);
        image.set(1, 0, Color::new(1.0, 0.25, 0.0));
        let mut out = Vec::new();
        write_ppm(&image, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "P3\n2 1\n255\n0 0 0\n255 128 0\n");
    }

    #[test]
    fn rgb_image_matches_ppm_pixels() {
        let mut image = Image::new(3, 2);
        image.set(2, 1, Color::new(0.25, 1.0, 0.0));
        let rgb = to_rgb_image(&image);
        assert_eq!(rgb.dimensions(), (3, 2));
        assert_eq!(*rgb.get_pixel(2, 1), Rgb([128, 255, 0]));
        assert_eq!(*rgb.get_pixel(0, 0), Rgb([0, 0, 0]));
    }
}
