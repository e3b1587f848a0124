//! Implementation of materials

use std::sync::Arc;

use crate::{
    error::{Error, Result},
    objects::HitRecord,
    texture::{Checker, SolidColor, Texture},
    utils::{self, SerdeVector},
    Color, Point, Ray,
};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// Shared, immutable handle to a material
pub type Material = Arc<dyn Scatterable>;

/// Material
pub trait Scatterable: Send + Sync {
    fn try_scatter(
        &self,
        ray_in: &Ray,
        hit_record: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult>;

    /// Light given off at a surface point
    fn emitted(&self, _u: f64, _v: f64, _p: &Point) -> Color {
        Color::zeros()
    }
}

/// Scatter Result
#[derive(Debug)]
pub struct ScatterResult {
    /// Attenuation Color
    pub attenuation: Color,
    /// Resulting Scattered Ray
    pub scattered: Ray,
}

/// Config for materials
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaterialConfig {
    Lambertian(LambertianConfig),
    Metal(MetalConfig),
    Dielectric(DielectricConfig),
    DiffuseLight(DiffuseLightConfig),
}

/// Optional checker pattern; the material's `color` is used for the even cells
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckerConfig {
    pub odd: SerdeVector,
    #[serde(default = "default_frequency")]
    pub frequency: f64,
}

fn default_frequency() -> f64 {
    Checker::DEFAULT_FREQUENCY
}

fn texture_from(color: SerdeVector, checker: Option<&CheckerConfig>) -> Texture {
    match checker {
        Some(checker) => Box::new(Checker::from_solid_colors(
            color.into(),
            checker.odd.into(),
            checker.frequency,
        )),
        None => Box::new(SolidColor::new(color.into())),
    }
}

/// Generator from config
pub struct Generator;
impl Generator {
    /// Build the material called `name`, rejecting out-of-range parameters
    pub fn from_config(name: &str, config: &MaterialConfig) -> Result<Material> {
        let invalid = |reason: String| Error::InvalidMaterial {
            name: name.to_owned(),
            reason,
        };
        let material: Material = match config {
            MaterialConfig::Lambertian(c) => Arc::new(Lambertian::from_config(c)),
            MaterialConfig::Metal(c) => {
                if !(0.0..=1.0).contains(&c.fuzziness) {
                    return Err(invalid(format!(
                        "fuzziness must be within [0, 1], got {}",
                        c.fuzziness
                    )));
                }
                Arc::new(Metal::from_config(c))
            }
            MaterialConfig::Dielectric(c) => {
                if !(c.index_of_refraction > 0.0 && c.index_of_refraction.is_finite()) {
                    return Err(invalid(format!(
                        "index_of_refraction must be positive, got {}",
                        c.index_of_refraction
                    )));
                }
                Arc::new(Dielectric::from_config(c))
            }
            MaterialConfig::DiffuseLight(c) => Arc::new(DiffuseLight::from_config(c)),
        };
        Ok(material)
    }
}

/// Lambertian Scatterer
pub struct Lambertian {
    albedo: Texture,
}
impl Lambertian {
    pub fn new(albedo: Color) -> Self {
        Self {
            albedo: Box::new(SolidColor::new(albedo)),
        }
    }

    pub fn from_texture(texture: Texture) -> Self {
        Self { albedo: texture }
    }

    pub fn from_config(config: &LambertianConfig) -> Self {
        Self::from_texture(texture_from(config.color, config.checker.as_ref()))
    }
}
impl Scatterable for Lambertian {
    fn try_scatter(
        &self,
        _ray_in: &Ray,
        hit_record: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let mut scatter_direction = hit_record.normal + utils::random_unit_vector(rng);

        // Protect against the normal and the random vector being exact opposites
        if utils::near_zero(&scatter_direction) {
            scatter_direction = hit_record.normal;
        }
        let scattered = Ray::new(hit_record.p, scatter_direction);
        let attenuation = self.albedo.value(hit_record.u, hit_record.v, &hit_record.p);
        Some(ScatterResult {
            attenuation,
            scattered,
        })
    }
}

/// Lambertian Config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LambertianConfig {
    pub color: SerdeVector,
    #[serde(default)]
    pub checker: Option<CheckerConfig>,
}

/// Metal Scatterer
#[derive(Debug, Clone)]
pub struct Metal {
    albedo: Color,
    fuzz: f64,
}
impl Metal {
    /// `fuzz` is clamped to `[0, 1]`
    pub fn new(albedo: Color, fuzz: f64) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    pub fn from_config(config: &MetalConfig) -> Self {
        Self::new(config.color.into(), config.fuzziness)
    }
}
impl Scatterable for Metal {
    fn try_scatter(
        &self,
        ray_in: &Ray,
        hit_record: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let reflected = utils::reflect(&ray_in.dir.normalize(), &hit_record.normal);
        let scattered = Ray::new(
            hit_record.p,
            reflected + self.fuzz * utils::random_in_unit_sphere(rng),
        );
        if scattered.dir.dot(&hit_record.normal) > 0.0 {
            Some(ScatterResult {
                attenuation: self.albedo,
                scattered,
            })
        } else {
            None
        }
    }
}

/// Metal Config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetalConfig {
    pub color: SerdeVector,
    #[serde(default)]
    pub fuzziness: f64,
}

/// A Dielectric is a refractive material, such as glass
#[derive(Debug, Clone)]
pub struct Dielectric {
    ir: f64,
}
impl Dielectric {
    pub fn new(ir: f64) -> Self {
        Self { ir }
    }

    pub fn from_config(config: &DielectricConfig) -> Self {
        Self::new(config.index_of_refraction)
    }

    /// Schlick's approximation for reflectance
    pub fn reflectance(cosine: f64, ref_idx: f64) -> f64 {
        let r0 = ((1.0 - ref_idx) / (1.0 + ref_idx)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}
impl Scatterable for Dielectric {
    fn try_scatter(
        &self,
        ray_in: &Ray,
        hit_record: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let attenuation = Color::new(1.0, 1.0, 1.0);
        let refraction_ratio = if hit_record.front_face {
            1.0 / self.ir
        } else {
            self.ir
        };

        let unit_direction = ray_in.dir.normalize();
        let cos_theta = (-unit_direction).dot(&hit_record.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        let cannot_refract = refraction_ratio * sin_theta > 1.0;

        let direction = if cannot_refract
            || Self::reflectance(cos_theta, refraction_ratio) > rng.gen::<f64>()
        {
            utils::reflect(&unit_direction, &hit_record.normal)
        } else {
            utils::refract(&unit_direction, &hit_record.normal, refraction_ratio)
        };

        Some(ScatterResult {
            attenuation,
            scattered: Ray::new(hit_record.p, direction),
        })
    }
}

/// Dielectric Config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DielectricConfig {
    pub index_of_refraction: f64,
}

/// Emissive surface; absorbs everything that hits it
pub struct DiffuseLight {
    emit: Texture,
}
impl DiffuseLight {
    pub fn new(color: Color) -> Self {
        Self {
            emit: Box::new(SolidColor::new(color)),
        }
    }

    pub fn from_texture(texture: Texture) -> Self {
        Self { emit: texture }
    }

    pub fn from_config(config: &DiffuseLightConfig) -> Self {
        Self::from_texture(texture_from(config.color, config.checker.as_ref()))
    }
}
impl Scatterable for DiffuseLight {
    fn try_scatter(
        &self,
        _ray_in: &Ray,
        _hit_record: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        None
    }

    fn emitted(&self, u: f64, v: f64, p: &Point) -> Color {
        self.emit.value(u, v, p)
    }
}

/// Diffuse Light Config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffuseLightConfig {
    pub color: SerdeVector,
    #[serde(default)]
    pub checker: Option<CheckerConfig>,
}
