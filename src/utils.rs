//! Utils

use crate::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Vectors as they appear in scene files: `[x, y, z]`
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct SerdeVector(pub [f64; 3]);
impl From<[f64; 3]> for SerdeVector {
    fn from(v: [f64; 3]) -> Self {
        Self(v)
    }
}
impl From<SerdeVector> for [f64; 3] {
    fn from(v: SerdeVector) -> Self {
        v.0
    }
}
impl From<SerdeVector> for Vec3 {
    fn from(v: SerdeVector) -> Self {
        Vec3::new(v.0[0], v.0[1], v.0[2])
    }
}
impl From<Vec3> for SerdeVector {
    fn from(v: Vec3) -> Self {
        Self([v[0], v[1], v[2]])
    }
}

/// Generate a random vector with every component in `[min, max)`
pub fn gen_random<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> Vec3 {
    Vec3::new(
        rng.gen_range(min..max),
        rng.gen_range(min..max),
        rng.gen_range(min..max),
    )
}

/// Compute a random vector inside the unit sphere
///
/// Randomly generate vectors. If the norm is < 1, it is inside the unit sphere.
pub fn random_in_unit_sphere<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    loop {
        let p = gen_random(rng, -1.0, 1.0);
        if p.norm_squared() < 1.0 {
            return p;
        }
    }
}

/// A random direction of length one
pub fn random_unit_vector<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    loop {
        let p = gen_random(rng, -1.0, 1.0);
        let len_sq = p.norm_squared();
        // Reject tiny vectors so the normalization stays finite
        if 1e-160 < len_sq && len_sq <= 1.0 {
            return p / len_sq.sqrt();
        }
    }
}

/// Generate a random vector inside a unit disk in the xy plane
/// This simulates defocus blur
pub fn random_in_unit_disk<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    loop {
        let p = Vec3::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0), 0.0);
        if p.norm_squared() < 1.0 {
            return p;
        }
    }
}

/// True if every component is close to zero
pub fn near_zero(v: &Vec3) -> bool {
    const S: f64 = 1e-8;
    v[0].abs() < S && v[1].abs() < S && v[2].abs() < S
}

/// Mirror `v` about the normal `n`
pub fn reflect(v: &Vec3, n: &Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract the unit vector `uv` through a surface with normal `n` (Snell's law)
pub fn refract(uv: &Vec3, n: &Vec3, etai_over_etat: f64) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.norm_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}
