//! Scene documents and the world built from them

use std::collections::BTreeMap;
use std::path::Path;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::bvh::BvhNode;
use crate::cameras::CameraConfig;
use crate::error::{Error, Result};
use crate::materials::{Generator, Material, MaterialConfig};
use crate::objects::{make_box, Hittable, HittableList, HittableObj, Quad, Sphere};
use crate::utils::SerdeVector;

/// Image section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    pub aspect_ratio: f64,
    pub image_width: u32,
    pub samples_per_pixel: u32,
    pub max_depth: u32,
    pub background: SerdeVector,
}

/// Camera section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    pub vfov: f64,
    pub look_from: SerdeVector,
    pub look_at: SerdeVector,
    pub vup: SerdeVector,
}

/// Depth of field section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepthOfFieldConfig {
    pub defocus_angle: f64,
    pub focus_dist: f64,
}
impl Default for DepthOfFieldConfig {
    fn default() -> Self {
        Self {
            defocus_angle: 0.0,
            focus_dist: 10.0,
        }
    }
}

/// Sphere config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SphereConfig {
    pub center: SerdeVector,
    pub radius: f64,
    pub material: String,
}

/// Quad config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuadConfig {
    #[serde(rename = "Q")]
    pub q: SerdeVector,
    pub u: SerdeVector,
    pub v: SerdeVector,
    pub material: String,
}

/// Box config, given by two opposite corners
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoxConfig {
    pub a: SerdeVector,
    pub b: SerdeVector,
    pub material: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "parameters", rename_all = "snake_case")]
pub enum ObjectConfig {
    Sphere(SphereConfig),
    Quad(QuadConfig),
    Box(BoxConfig),
}
impl ObjectConfig {
    fn material(&self) -> &str {
        match self {
            ObjectConfig::Sphere(c) => &c.material,
            ObjectConfig::Quad(c) => &c.material,
            ObjectConfig::Box(c) => &c.material,
        }
    }
}

/// The whole scene file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    pub image: ImageConfig,
    pub camera: ViewConfig,
    #[serde(default)]
    pub depth_of_field: DepthOfFieldConfig,
    #[serde(default)]
    pub materials: BTreeMap<String, MaterialConfig>,
    #[serde(default)]
    pub objects: Vec<ObjectConfig>,
}
impl SceneConfig {
    /// Flatten the image, camera and depth-of-field sections
    pub fn camera_config(&self) -> CameraConfig {
        CameraConfig {
            aspect_ratio: self.image.aspect_ratio,
            image_width: self.image.image_width,
            samples_per_pixel: self.image.samples_per_pixel,
            max_depth: self.image.max_depth,
            background: self.image.background.into(),
            vfov: self.camera.vfov,
            look_from: self.camera.look_from.into(),
            look_at: self.camera.look_at.into(),
            vup: self.camera.vup.into(),
            defocus_angle: self.depth_of_field.defocus_angle,
            focus_dist: self.depth_of_field.focus_dist,
        }
    }
}

/// A loaded scene: camera settings plus the geometry to render
pub struct Scene {
    pub camera: CameraConfig,
    world: HittableObj,
    object_count: usize,
}
impl Scene {
    /// Read and build a scene file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::SceneRead {
            path: path.to_path_buf(),
            source,
        })?;
        let scene = Self::from_yaml(&text)?;
        info!(
            "Loaded scene {} with {} objects",
            path.display(),
            scene.object_count
        );
        Ok(scene)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: SceneConfig = serde_yaml::from_str(text)?;
        Self::from_config(&config)
    }

    /// Build every material, then every object, then the hierarchy over them
    pub fn from_config(config: &SceneConfig) -> Result<Self> {
        let mut materials: BTreeMap<&str, Material> = BTreeMap::new();
        for (name, material_config) in &config.materials {
            debug!("Material {name}: {material_config:?}");
            materials.insert(name.as_str(), Generator::from_config(name, material_config)?);
        }

        let mut list = HittableList::new();
        for (index, object) in config.objects.iter().enumerate() {
            let name = object.material();
            let material = materials
                .get(name)
                .cloned()
                .ok_or_else(|| Error::UnknownMaterial {
                    name: name.to_owned(),
                    index,
                })?;
            debug!("Object {index}: {object:?}");
            list.add(build_object(index, object, material)?);
        }

        let object_count = list.len();
        let world: HittableObj = match BvhNode::new(list) {
            Some(bvh) => Box::new(bvh),
            None => {
                warn!("Scene has no objects; the image will show only the background");
                Box::new(HittableList::new())
            }
        };

        Ok(Self {
            camera: config.camera_config(),
            world,
            object_count,
        })
    }

    pub fn world(&self) -> &dyn Hittable {
        self.world.as_ref()
    }

    /// Number of top-level objects (a box counts once)
    pub fn object_count(&self) -> usize {
        self.object_count
    }
}

fn build_object(index: usize, object: &ObjectConfig, material: Material) -> Result<HittableObj> {
    let obj: HittableObj = match object {
        ObjectConfig::Sphere(c) => {
            if !(c.radius >= 0.0 && c.radius.is_finite()) {
                return Err(Error::InvalidObject {
                    index,
                    reason: format!("sphere radius must be non-negative, got {}", c.radius),
                });
            }
            Box::new(Sphere::new(c.center.into(), c.radius, material))
        }
        ObjectConfig::Quad(c) => {
            let quad = Quad::new(c.q.into(), c.u.into(), c.v.into(), material);
            if quad.is_degenerate() {
                warn!("Object {index} is a zero-area quad and will never be hit");
            }
            Box::new(quad)
        }
        ObjectConfig::Box(c) => Box::new(make_box(c.a.into(), c.b.into(), material)),
    };
    Ok(obj)
}
