//! Objects
use std::f64::consts::PI;

use crate::{
    aabb::Aabb,
    interval::Interval,
    materials::{Material, Scatterable},
    utils, Point, Ray, Vec3,
};

pub type HittableObj = Box<dyn Hittable>;

/// Anything a ray can intersect
pub trait Hittable: Send + Sync {
    /// Nearest intersection with `t` strictly inside `ray_t`, if any
    fn try_hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>>;

    fn bounding_box(&self) -> Aabb;
}

/// Represents a hit
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Point,
    /// Unit normal, always facing against the incoming ray
    pub normal: Vec3,
    /// Ray parameter of the intersection
    pub t: f64,
    /// Whether the ray struck the outside of the surface
    pub front_face: bool,
    /// Material of the object that was hit
    pub material: &'a dyn Scatterable,
    /// U,V surface coordinates
    pub u: f64,
    /// U,V surface coordinates
    pub v: f64,
}
impl<'a> HitRecord<'a> {
    /// `outward_normal` is assumed to have unit length
    pub fn new(
        p: Point,
        t: f64,
        ray: &Ray,
        outward_normal: &Vec3,
        material: &'a dyn Scatterable,
        u: f64,
        v: f64,
    ) -> Self {
        let front_face = ray.dir.dot(outward_normal) < 0.0;
        let normal = if front_face {
            *outward_normal
        } else {
            -outward_normal
        };
        Self {
            p,
            normal,
            t,
            front_face,
            material,
            u,
            v,
        }
    }
}

/// An ordered collection of objects, scanned linearly
#[derive(Default)]
pub struct HittableList {
    objects: Vec<HittableObj>,
    bbox: Aabb,
}
impl HittableList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, obj: HittableObj) {
        self.bbox = self.bbox.surrounding(&obj.bounding_box());
        self.objects.push(obj)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn into_objects(self) -> Vec<HittableObj> {
        self.objects
    }
}
impl FromIterator<HittableObj> for HittableList {
    fn from_iter<I: IntoIterator<Item = HittableObj>>(iter: I) -> Self {
        let mut list = Self::new();
        for obj in iter {
            list.add(obj);
        }
        list
    }
}
impl Hittable for HittableList {
    fn try_hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let mut closest_so_far = ray_t.max;
        let mut hr_final = None;

        for obj in &self.objects {
            if let Some(hr) = obj.try_hit(ray, Interval::new(ray_t.min, closest_so_far)) {
                closest_so_far = hr.t;
                hr_final = Some(hr)
            }
        }
        hr_final
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

pub struct Sphere {
    center: Point,
    radius: f64,
    material: Material,
    bbox: Aabb,
}
impl Sphere {
    /// Negative radii are clamped to zero
    pub fn new(center: Point, radius: f64, material: Material) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::new(radius, radius, radius);
        Self {
            center,
            radius,
            material,
            bbox: Aabb::from_points(center - rvec, center + rvec),
        }
    }

    pub fn get_uv(p: &Point) -> (f64, f64) {
        // p: a given point on the sphere of radius one, centered at the origin.
        // u: returned value [0,1] of angle around the Y axis from X=-1.
        // v: returned value [0,1] of angle from Y=-1 to Y=+1.
        //     <1 0 0> yields <0.50 0.50>       <-1  0  0> yields <0.00 0.50>
        //     <0 1 0> yields <0.50 1.00>       < 0 -1  0> yields <0.50 0.00>
        //     <0 0 1> yields <0.25 0.50>       < 0  0 -1> yields <0.75 0.50>

        let theta = (-p[1]).clamp(-1.0, 1.0).acos();
        let phi = (-p[2]).atan2(p[0]) + PI;

        (phi / (2.0 * PI), theta / PI)
    }
}
impl Hittable for Sphere {
    fn try_hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        if utils::near_zero(&ray.dir) || self.radius <= 0.0 {
            return None;
        }
        let oc = ray.orig - self.center;
        let a = ray.dir.norm_squared();
        let half_b = oc.dot(&ray.dir);
        let c = oc.norm_squared() - self.radius * self.radius;
        let discriminant = half_b * half_b - a * c;
        if discriminant <= 0.0 {
            return None;
        }

        // Find the nearest root that lies in the acceptable range
        let sqrtd = discriminant.sqrt();
        let mut root = (-half_b - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (-half_b + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }
        let p = ray.at(root);
        let outward_normal = (p - self.center) / self.radius;
        let (u, v) = Self::get_uv(&outward_normal);
        Some(HitRecord::new(
            p,
            root,
            ray,
            &outward_normal,
            self.material.as_ref(),
            u,
            v,
        ))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// Planar parallelogram with corner `q` and edges `u`, `v`
pub struct Quad {
    q: Point,
    u: Vec3,
    v: Vec3,
    // n / (n . n), projects plane points onto (alpha, beta)
    w: Vec3,
    normal: Vec3,
    d: f64,
    material: Material,
    bbox: Aabb,
}
impl Quad {
    pub fn new(q: Point, u: Vec3, v: Vec3, material: Material) -> Self {
        let n = u.cross(&v);
        let n_sq = n.norm_squared();
        // Zero-area quads keep zero vectors here and never report a hit
        let (normal, w) = if n_sq > 0.0 {
            (n / n_sq.sqrt(), n / n_sq)
        } else {
            (Vec3::zeros(), Vec3::zeros())
        };
        let d = normal.dot(&q);

        let diagonal1 = Aabb::from_points(q, q + u + v);
        let diagonal2 = Aabb::from_points(q + u, q + v);

        Self {
            q,
            u,
            v,
            w,
            normal,
            d,
            material,
            bbox: diagonal1.surrounding(&diagonal2).padded(),
        }
    }

    pub fn is_degenerate(&self) -> bool {
        utils::near_zero(&self.normal)
    }
}
impl Hittable for Quad {
    fn try_hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        if self.is_degenerate() {
            return None;
        }
        let denom = self.normal.dot(&ray.dir);

        // Parallel to the plane
        if denom.abs() < 1e-8 {
            return None;
        }

        let t = (self.d - self.normal.dot(&ray.orig)) / denom;
        if !ray_t.surrounds(t) {
            return None;
        }

        let p = ray.at(t);
        let planar = p - self.q;
        let alpha = self.w.dot(&planar.cross(&self.v));
        let beta = self.w.dot(&self.u.cross(&planar));

        let unit = Interval::new(0.0, 1.0);
        if !unit.contains(alpha) || !unit.contains(beta) {
            return None;
        }

        Some(HitRecord::new(
            p,
            t,
            ray,
            &self.normal,
            self.material.as_ref(),
            alpha,
            beta,
        ))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// The six quads enclosing the box with opposite corners `a` and `b`
pub fn make_box(a: Point, b: Point, material: Material) -> HittableList {
    let min = Point::new(a[0].min(b[0]), a[1].min(b[1]), a[2].min(b[2]));
    let max = Point::new(a[0].max(b[0]), a[1].max(b[1]), a[2].max(b[2]));

    let dx = Vec3::new(max[0] - min[0], 0.0, 0.0);
    let dy = Vec3::new(0.0, max[1] - min[1], 0.0);
    let dz = Vec3::new(0.0, 0.0, max[2] - min[2]);

    let faces = [
        // front
        (Point::new(min[0], min[1], max[2]), dx, dy),
        // right
        (Point::new(max[0], min[1], max[2]), -dz, dy),
        // back
        (Point::new(max[0], min[1], min[2]), -dx, dy),
        // left
        (Point::new(min[0], min[1], min[2]), dz, dy),
        // top
        (Point::new(min[0], max[1], max[2]), dx, -dz),
        // bottom
        (Point::new(min[0], min[1], min[2]), dx, dz),
    ];

    faces
        .into_iter()
        .map(|(q, u, v)| Box::new(Quad::new(q, u, v, material.clone())) as HittableObj)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::Lambertian;
    use crate::Color;
    use std::sync::Arc;

    fn gray() -> Material {
        Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5)))
    }

    fn forward() -> Interval {
        Interval::new(0.001, f64::INFINITY)
    }

    #[test]
    fn sphere_returns_nearest_root() {
        let sphere = Sphere::new(Point::zeros(), 1.0, gray());
        let ray = Ray::new(Point::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));

        let hr = sphere.try_hit(&ray, forward()).unwrap();
        assert!((hr.t - 4.0).abs() < 1e-12);
        assert!((hr.p - Point::new(0.0, 0.0, 1.0)).norm() < 1e-12);
        assert!((hr.normal - Vec3::new(0.0, 0.0, 1.0)).norm() < 1e-12);
        assert!(hr.front_face);
    }

    #[test]
    fn sphere_falls_back_to_far_root_from_inside() {
        let sphere = Sphere::new(Point::zeros(), 1.0, gray());
        let ray = Ray::new(Point::zeros(), Vec3::new(1.0, 0.0, 0.0));

        let hr = sphere.try_hit(&ray, forward()).unwrap();
        assert!((hr.t - 1.0).abs() < 1e-12);
        assert!(!hr.front_face);
        // Normal flipped to face the ray
        assert!((hr.normal - Vec3::new(-1.0, 0.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn sphere_misses() {
        let sphere = Sphere::new(Point::zeros(), 1.0, gray());
        let beside = Ray::new(Point::new(2.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let behind = Ray::new(Point::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 1.0));
        let degenerate = Ray::new(Point::new(0.0, 0.0, 5.0), Vec3::zeros());

        assert!(sphere.try_hit(&beside, forward()).is_none());
        assert!(sphere.try_hit(&behind, forward()).is_none());
        assert!(sphere.try_hit(&degenerate, forward()).is_none());
        // Hit exists but beyond the range
        let toward = Ray::new(Point::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(sphere.try_hit(&toward, Interval::new(0.001, 3.0)).is_none());
    }

    #[test]
    fn sphere_uv_mapping() {
        let (u, v) = Sphere::get_uv(&Point::new(1.0, 0.0, 0.0));
        assert!((u - 0.5).abs() < 1e-12 && (v - 0.5).abs() < 1e-12);
        let (u, v) = Sphere::get_uv(&Point::new(0.0, 0.0, 1.0));
        assert!((u - 0.25).abs() < 1e-12 && (v - 0.5).abs() < 1e-12);
        let (_, v) = Sphere::get_uv(&Point::new(0.0, 1.0, 0.0));
        assert!((v - 1.0).abs() < 1e-12);
    }

    #[test]
    fn quad_hit_inside_and_outside() {
        let quad = Quad::new(
            Point::new(-1.0, -1.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
            gray(),
        );
        let center = Ray::new(Point::new(0.0, 0.0, 3.0), Vec3::new(0.0, 0.0, -1.0));
        let hr = quad.try_hit(&center, forward()).unwrap();
        assert!((hr.t - 3.0).abs() < 1e-12);
        assert!((hr.u - 0.5).abs() < 1e-12 && (hr.v - 0.5).abs() < 1e-12);
        assert!(hr.front_face);

        let outside = Ray::new(Point::new(1.5, 0.0, 3.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(quad.try_hit(&outside, forward()).is_none());

        let parallel = Ray::new(Point::new(0.0, 0.0, 3.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(quad.try_hit(&parallel, forward()).is_none());
    }

    #[test]
    fn zero_area_quad_never_hits() {
        let quad = Quad::new(
            Point::zeros(),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            gray(),
        );
        assert!(quad.is_degenerate());
        let ray = Ray::new(Point::new(0.5, 0.0, 1.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(quad.try_hit(&ray, forward()).is_none());
        let bbox = quad.bounding_box();
        assert!(bbox.y.size() > 0.0 && bbox.z.size() > 0.0);
    }

    #[test]
    fn list_keeps_closest_hit() {
        let list: HittableList = vec![
            Box::new(Sphere::new(Point::new(0.0, 0.0, -10.0), 1.0, gray())) as HittableObj,
            Box::new(Sphere::new(Point::new(0.0, 0.0, -4.0), 1.0, gray())),
            Box::new(Sphere::new(Point::new(0.0, 0.0, -7.0), 1.0, gray())),
        ]
        .into_iter()
        .collect();

        let ray = Ray::new(Point::zeros(), Vec3::new(0.0, 0.0, -1.0));
        let hr = list.try_hit(&ray, forward()).unwrap();
        assert!((hr.t - 3.0).abs() < 1e-12);

        let bbox = list.bounding_box();
        assert!(bbox.z.contains(-11.0) && bbox.z.contains(-3.0));
    }

    #[test]
    fn empty_list_misses() {
        let list = HittableList::new();
        let ray = Ray::new(Point::zeros(), Vec3::new(0.0, 0.0, -1.0));
        assert!(list.try_hit(&ray, forward()).is_none());
        assert_eq!(list.bounding_box(), Aabb::EMPTY);
    }

    #[test]
    fn box_has_six_faces_and_hits_front() {
        let cube = make_box(
            Point::new(1.0, 1.0, 1.0),
            Point::new(-1.0, -1.0, -1.0),
            gray(),
        );
        assert_eq!(cube.len(), 6);

        let ray = Ray::new(Point::new(0.2, 0.3, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let hr = cube.try_hit(&ray, forward()).unwrap();
        assert!((hr.t - 4.0).abs() < 1e-12);
        assert!((hr.normal - Vec3::new(0.0, 0.0, 1.0)).norm() < 1e-12);

        let side = Ray::new(Point::new(-5.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        let hr = cube.try_hit(&side, forward()).unwrap();
        assert!((hr.t - 4.0).abs() < 1e-12);
        assert!((hr.normal - Vec3::new(-1.0, 0.0, 0.0)).norm() < 1e-12);
    }
}
