//! Ray Tracing Library
//!
//! A tiled, multi-threaded Monte-Carlo path tracer for static scenes built from
//! spheres, quads and boxes.

use nalgebra::Vector3;

pub mod aabb;
pub mod bvh;
pub mod cameras;
pub mod cli;
pub mod error;
pub mod integrator;
pub mod interval;
pub mod materials;
pub mod objects;
pub mod output;
pub mod renderer;
pub mod scene;
pub mod texture;
pub mod utils;

pub use error::{Error, Result};

pub type Vec3 = Vector3<f64>;
pub type Point = Vec3;
pub type Color = Vec3;

/// Prelude
pub mod prelude {
    pub use crate::bvh::BvhNode;
    pub use crate::cameras::{Camera, CameraConfig};
    pub use crate::interval::Interval;
    pub use crate::materials::{Dielectric, DiffuseLight, Lambertian, Material, Metal};
    pub use crate::objects::{make_box, Hittable, HittableList, HittableObj, Quad, Sphere};
    pub use crate::renderer::{render, Image, RenderOptions};
    pub use crate::scene::Scene;
    pub use crate::{Color, Point, Ray, Vec3};
}

/// The ray in ray tracing
#[derive(Debug, Clone)]
pub struct Ray {
    pub orig: Point,
    pub dir: Vec3,
}
impl Ray {
    pub fn new(orig: Point, dir: Vec3) -> Self {
        Self { orig, dir }
    }

    /// Point along the ray at parameter `t`
    pub fn at(&self, t: f64) -> Point {
        self.orig + t * self.dir
    }
}
