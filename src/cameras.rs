//! Cameras and configs for cameras
use crate::error::{Error, Result};
use crate::{utils, Color, Point, Ray, Vec3};
use rand::{Rng, RngCore};

/// Everything needed to frame and sample an image
#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    /// Ratio of image width over height
    pub aspect_ratio: f64,
    /// Rendered image width in pixels
    pub image_width: u32,
    /// Rays sent into each pixel
    pub samples_per_pixel: u32,
    /// Maximum number of ray bounces
    pub max_depth: u32,
    /// Radiance of rays that escape the scene
    pub background: Color,
    /// Vertical field of view, degrees
    pub vfov: f64,
    pub look_from: Point,
    pub look_at: Point,
    pub vup: Vec3,
    /// Variation angle of rays through each pixel, degrees
    pub defocus_angle: f64,
    /// Distance from `look_from` to the plane of perfect focus
    pub focus_dist: f64,
}
impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: 1.0,
            image_width: 100,
            samples_per_pixel: 50,
            max_depth: 10,
            background: Color::zeros(),
            vfov: 90.0,
            look_from: Point::new(0.0, 0.0, -1.0),
            look_at: Point::zeros(),
            vup: Vec3::new(0.0, 1.0, 0.0),
            defocus_angle: 0.0,
            focus_dist: 10.0,
        }
    }
}
/// Largest image, in pixels, a camera will agree to render
pub const MAX_PIXELS: f64 = (1u64 << 28) as f64;

impl CameraConfig {
    /// Rows implied by the width and aspect ratio, at least one
    fn image_height(&self) -> f64 {
        (self.image_width as f64 / self.aspect_ratio).floor().max(1.0)
    }

    fn validate(&self) -> Result<()> {
        let fail = |msg: String| Err(Error::InvalidCamera(msg));
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return fail(format!("aspect ratio must be positive, got {}", self.aspect_ratio));
        }
        if self.image_width == 0 {
            return fail("image width must be at least 1".into());
        }
        let height = self.image_height();
        if height * self.image_width as f64 > MAX_PIXELS {
            return fail(format!(
                "image of {} x {height} pixels exceeds the limit of {MAX_PIXELS} pixels",
                self.image_width
            ));
        }
        if self.samples_per_pixel == 0 {
            return fail("samples per pixel must be at least 1".into());
        }
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return fail(format!("vertical fov must be within (0, 180), got {}", self.vfov));
        }
        if !(self.focus_dist.is_finite() && self.focus_dist > 0.0) {
            return fail(format!("focus distance must be positive, got {}", self.focus_dist));
        }
        if !(self.defocus_angle >= 0.0 && self.defocus_angle < 180.0) {
            return fail(format!(
                "defocus angle must be within [0, 180), got {}",
                self.defocus_angle
            ));
        }
        let view = self.look_from - self.look_at;
        if utils::near_zero(&view) {
            return fail("look_from and look_at must differ".into());
        }
        if utils::near_zero(&self.vup.cross(&view)) {
            return fail("vup must not be parallel to the view direction".into());
        }
        Ok(())
    }
}

/// Camera and related tasks
///
/// Holds the configuration plus the pixel grid and lens basis derived from it.
#[derive(Debug, Clone)]
pub struct Camera {
    config: CameraConfig,
    image_height: u32,
    center: Point,
    pixel00_loc: Point,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
}
impl Camera {
    pub fn new(config: CameraConfig) -> Result<Self> {
        config.validate()?;

        let image_width = config.image_width;
        let image_height = config.image_height() as u32;

        let center = config.look_from;

        // Establish the viewport
        let theta = config.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * config.focus_dist;
        let viewport_width = viewport_height * (image_width as f64 / image_height as f64);

        // Calculate the viewing vectors
        let w = (config.look_from - config.look_at).normalize();
        let u = config.vup.cross(&w).normalize();
        let v = w.cross(&u);

        // Rows run top to bottom, so the vertical edge points down
        let viewport_u = viewport_width * u;
        let viewport_v = -viewport_height * v;

        let pixel_delta_u = viewport_u / image_width as f64;
        let pixel_delta_v = viewport_v / image_height as f64;

        let viewport_upper_left =
            center - config.focus_dist * w - viewport_u / 2.0 - viewport_v / 2.0;
        let pixel00_loc = viewport_upper_left + 0.5 * (pixel_delta_u + pixel_delta_v);

        let defocus_radius = config.focus_dist * (config.defocus_angle / 2.0).to_radians().tan();

        Ok(Self {
            image_height,
            center,
            pixel00_loc,
            pixel_delta_u,
            pixel_delta_v,
            u,
            v,
            w,
            defocus_disk_u: defocus_radius * u,
            defocus_disk_v: defocus_radius * v,
            config,
        })
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn image_width(&self) -> u32 {
        self.config.image_width
    }

    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    pub fn samples_per_pixel(&self) -> u32 {
        self.config.samples_per_pixel
    }

    pub fn max_depth(&self) -> u32 {
        self.config.max_depth
    }

    pub fn background(&self) -> Color {
        self.config.background
    }

    pub fn center(&self) -> Point {
        self.center
    }

    /// Orthonormal camera frame `(u, v, w)`; `w` points away from the view
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }

    /// Sample ray through pixel `(i, j)`, jittered within the pixel and
    /// starting on the defocus disk when the lens has an aperture
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let pixel_center =
            self.pixel00_loc + i as f64 * self.pixel_delta_u + j as f64 * self.pixel_delta_v;
        let pixel_sample = pixel_center + self.pixel_sample_square(rng);

        let origin = if self.config.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        Ray::new(origin, pixel_sample - origin)
    }

    /// Random offset within the footprint of one pixel
    fn pixel_sample_square(&self, rng: &mut dyn RngCore) -> Vec3 {
        let px = rng.gen::<f64>() - 0.5;
        let py = rng.gen::<f64>() - 0.5;
        px * self.pixel_delta_u + py * self.pixel_delta_v
    }

    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Point {
        let p = utils::random_in_unit_disk(rng);
        self.center + p[0] * self.defocus_disk_u + p[1] * self.defocus_disk_v
    }
}
