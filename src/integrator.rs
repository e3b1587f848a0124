//! Recursive radiance estimation along a single light path

use crate::interval::Interval;
use crate::objects::Hittable;
use crate::{Color, Ray};
use rand::RngCore;

/// Smallest `t` accepted for a hit, to keep a ray from re-hitting its own origin
pub const T_MIN: f64 = 0.001;

/// Paths whose attenuation falls below this squared magnitude stop bouncing
pub const ATTENUATION_CUTOFF: f64 = 0.001;

/// Estimate the light arriving back along `ray`
///
/// One scattered ray per bounce. Rays that escape return `background`; after
/// `depth` bounces no more light is gathered.
pub fn radiance(
    ray: &Ray,
    depth: u32,
    world: &dyn Hittable,
    background: &Color,
    rng: &mut dyn RngCore,
) -> Color {
    if depth == 0 {
        return Color::zeros();
    }

    let hr = match world.try_hit(ray, Interval::new(T_MIN, f64::INFINITY)) {
        Some(hr) => hr,
        None => return *background,
    };

    let emission = hr.material.emitted(hr.u, hr.v, &hr.p);

    let sr = match hr.material.try_scatter(ray, &hr, rng) {
        Some(sr) => sr,
        None => return emission,
    };

    // Near-black paths contribute almost nothing; cut them short
    if sr.attenuation.norm_squared() < ATTENUATION_CUTOFF {
        return emission;
    }

    emission
        + sr
            .attenuation
            .component_mul(&radiance(&sr.scattered, depth - 1, world, background, rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::{DiffuseLight, Lambertian, Material, Metal};
    use crate::objects::{HittableList, HittableObj, Sphere};
    use crate::{Point, Vec3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn single(material: Material) -> HittableList {
        vec![Box::new(Sphere::new(Point::zeros(), 1.0, material)) as HittableObj]
            .into_iter()
            .collect()
    }

    fn toward_origin() -> Ray {
        Ray::new(Point::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0))
    }

    #[test]
    fn zero_depth_is_black() {
        let world = HittableList::new();
        let mut rng = StdRng::seed_from_u64(0);
        let bg = Color::new(1.0, 1.0, 1.0);
        assert_eq!(radiance(&toward_origin(), 0, &world, &bg, &mut rng), Color::zeros());
    }

    #[test]
    fn escaping_ray_sees_background() {
        let world = HittableList::new();
        let mut rng = StdRng::seed_from_u64(0);
        let bg = Color::new(0.5, 0.7, 1.0);
        assert_eq!(radiance(&toward_origin(), 5, &world, &bg, &mut rng), bg);
    }

    #[test]
    fn light_returns_its_emission() {
        let emit = Color::new(3.0, 2.0, 1.0);
        let world = single(Arc::new(DiffuseLight::new(emit)));
        let mut rng = StdRng::seed_from_u64(0);
        let out = radiance(&toward_origin(), 5, &world, &Color::zeros(), &mut rng);
        assert_eq!(out, emit);
    }

    #[test]
    fn last_bounce_gathers_nothing() {
        let world = single(Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5))));
        let mut rng = StdRng::seed_from_u64(0);
        let bg = Color::new(1.0, 1.0, 1.0);
        let out = radiance(&toward_origin(), 1, &world, &bg, &mut rng);
        assert_eq!(out, Color::zeros());
    }

    #[test]
    fn mirror_attenuates_background() {
        let albedo = Color::new(0.8, 0.6, 0.4);
        let world = single(Arc::new(Metal::new(albedo, 0.0)));
        let mut rng = StdRng::seed_from_u64(0);
        let bg = Color::new(1.0, 1.0, 1.0);
        // Straight back off the sphere, then out to the sky
        let out = radiance(&toward_origin(), 2, &world, &bg, &mut rng);
        assert!((out - albedo).norm() < 1e-12);
    }

    #[test]
    fn dark_surfaces_stop_the_path() {
        let world = single(Arc::new(Lambertian::new(Color::new(0.01, 0.01, 0.01))));
        let mut rng = StdRng::seed_from_u64(0);
        let bg = Color::new(1.0, 1.0, 1.0);
        let out = radiance(&toward_origin(), 50, &world, &bg, &mut rng);
        assert_eq!(out, Color::zeros());
    }
}
