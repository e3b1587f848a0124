//! Bounding Volume Hierarchies
//!
//! For optimizing computations

use crate::aabb::Aabb;
use crate::interval::Interval;
use crate::objects::{HitRecord, Hittable, HittableList, HittableObj};
use crate::Ray;

/// Bounding Volume Hierarchy
///
/// Tree structure. Each node owns its children; leaves hold one object.
pub struct BvhNode {
    left: HittableObj,
    // Going to make right an Option, so single-object leaves need no clone
    right: Option<HittableObj>,
    bbox: Aabb,
}
impl BvhNode {
    /// Build a tree over every object in the list. `None` if the list is empty.
    pub fn new(list: HittableList) -> Option<Self> {
        Self::split_tree(list.into_objects())
    }

    /// Split the tree
    ///
    /// Choose the longest axis of the set's bounds, sort the primitives by
    /// their box centroid along it, put half in each subtree
    fn split_tree(mut objects: Vec<HittableObj>) -> Option<Self> {
        let axis = objects
            .iter()
            .fold(Aabb::EMPTY, |acc, obj| acc.surrounding(&obj.bounding_box()))
            .longest_axis();

        objects.sort_by(|a, b| {
            a.bounding_box()
                .centroid(axis)
                .total_cmp(&b.bounding_box().centroid(axis))
        });

        let (left, right): (HittableObj, Option<HittableObj>) = match objects.len() {
            0 => return None,
            1 => (objects.pop()?, None),
            2 => {
                let right = objects.pop()?;
                let left = objects.pop()?;
                (left, Some(right))
            }
            n => {
                let right_objects = objects.split_off(n / 2);
                let left = Self::split_tree(objects)?;
                let right = Self::split_tree(right_objects)?;
                (Box::new(left), Some(Box::new(right)))
            }
        };

        let bbox = match &right {
            Some(right) => left.bounding_box().surrounding(&right.bounding_box()),
            None => left.bounding_box(),
        }
        .padded();

        Some(Self { left, right, bbox })
    }
}
impl Hittable for BvhNode {
    fn try_hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        if !self.bbox.hit(ray, ray_t) {
            return None;
        }
        let left = self.left.try_hit(ray, ray_t);
        // Anything on the right must beat the left hit
        let t_max = left.as_ref().map_or(ray_t.max, |hr| hr.t);
        let right = self
            .right
            .as_ref()
            .and_then(|right| right.try_hit(ray, Interval::new(ray_t.min, t_max)));
        right.or(left)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::{Lambertian, Material};
    use crate::objects::{make_box, Quad, Sphere};
    use crate::{utils, Color, Point, Vec3};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::sync::Arc;

    fn random_scene(rng: &mut StdRng, count: usize) -> Vec<HittableObj> {
        let material: Material = Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5)));
        (0..count)
            .map(|i| -> HittableObj {
                let center = utils::gen_random(rng, -10.0, 10.0);
                if i % 4 == 3 {
                    let u = utils::gen_random(rng, -2.0, 2.0);
                    let v = utils::gen_random(rng, -2.0, 2.0);
                    Box::new(Quad::new(center, u, v, material.clone()))
                } else {
                    Box::new(Sphere::new(center, rng.gen_range(0.2..1.5), material.clone()))
                }
            })
            .collect()
    }

    fn check_bounds(node: &BvhNode) {
        let expected = match &node.right {
            Some(right) => node.left.bounding_box().surrounding(&right.bounding_box()),
            None => node.left.bounding_box(),
        }
        .padded();
        assert_eq!(node.bbox, expected);
    }

    #[test]
    fn empty_list_builds_nothing() {
        assert!(BvhNode::new(HittableList::new()).is_none());
    }

    #[test]
    fn node_bounds_are_padded_union_of_children() {
        let mut rng = StdRng::seed_from_u64(21);
        for count in [1, 2, 3, 7, 16, 33] {
            let list: HittableList = random_scene(&mut rng, count).into_iter().collect();
            let union = list.bounding_box();
            let bvh = BvhNode::new(list).unwrap();
            check_bounds(&bvh);
            assert_eq!(bvh.bounding_box(), union.padded());
        }
    }

    #[test]
    fn single_object_is_a_leaf() {
        let material: Material = Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5)));
        let list: HittableList = vec![
            Box::new(Sphere::new(Point::zeros(), 1.0, material)) as HittableObj,
        ]
        .into_iter()
        .collect();
        let bvh = BvhNode::new(list).unwrap();
        assert!(bvh.right.is_none());
        check_bounds(&bvh);
    }

    fn scene_with_box(seed: u64) -> Vec<HittableObj> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut objects = random_scene(&mut rng, 60);
        objects.push(Box::new(make_box(
            Point::new(-1.0, -1.0, -1.0),
            Point::new(1.0, 2.0, 0.5),
            Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5))),
        )));
        objects
    }

    #[test]
    fn traversal_matches_linear_scan() {
        let bvh = BvhNode::new(scene_with_box(1234).into_iter().collect()).unwrap();
        let linear: HittableList = scene_with_box(1234).into_iter().collect();

        let mut rng = StdRng::seed_from_u64(99);
        let range = Interval::new(0.001, f64::INFINITY);
        let mut hits = 0;
        for _ in 0..2000 {
            let orig = utils::gen_random(&mut rng, -15.0, 15.0);
            let dir = utils::random_unit_vector(&mut rng);
            let ray = Ray::new(orig, dir);

            match (bvh.try_hit(&ray, range), linear.try_hit(&ray, range)) {
                (None, None) => {}
                (Some(a), Some(b)) => {
                    hits += 1;
                    assert!((a.t - b.t).abs() < 1e-9, "t {} vs {}", a.t, b.t);
                    assert!((a.normal - b.normal).norm() < 1e-9);
                    assert_eq!(a.front_face, b.front_face);
                }
                (a, b) => panic!(
                    "bvh hit: {}, linear hit: {} for {:?}",
                    a.is_some(),
                    b.is_some(),
                    ray
                ),
            }
        }
        assert!(hits > 100, "only {hits} rays hit anything");
    }

    #[test]
    fn flat_scene_still_hits() {
        let material: Material = Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5)));
        // Every quad lies in z = 0, so the whole tree is flat along z
        let list: HittableList = (0..5)
            .map(|i| -> HittableObj {
                Box::new(Quad::new(
                    Point::new(i as f64 * 2.0, 0.0, 0.0),
                    Vec3::new(1.0, 0.0, 0.0),
                    Vec3::new(0.0, 1.0, 0.0),
                    material.clone(),
                ))
            })
            .collect();
        let bvh = BvhNode::new(list).unwrap();
        let ray = Ray::new(Point::new(4.5, 0.5, 2.0), Vec3::new(0.0, 0.0, -1.0));
        let hr = bvh.try_hit(&ray, Interval::new(0.001, f64::INFINITY)).unwrap();
        assert!((hr.t - 2.0).abs() < 1e-12);
    }
}
