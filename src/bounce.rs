//! Bounce continuation engine
//!
//! Each call to [`step`] consumes a [`Job`] (the ray plus the world) and
//! yields a [`Bounce`]: either a miss, which ends the path, or a hit carrying
//! this bounce's color and the refracted continuation job. [`trace`] drives
//! `step` for a bounded number of iterations and sums the colors.
//!
//! Sphere selection is the first hit in scan order, not the nearest one.

use crate::intersect::{intersect, Intersection, Ray};
use crate::math::{normalize_or_zero, refract, Point3, Vec3};
use crate::scene::{Sphere, World};
use crate::shade::shade;
use crate::REFRACTIVE_INDEX;

/// Color of a ray that leaves the scene
pub fn background() -> Vec3 {
    Vec3::zeros()
}

/// State carried from one bounce to the next
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Job<'w> {
    pub ray: Ray,
    pub world: &'w World,
}

impl<'w> Job<'w> {
    pub fn new(ray: Ray, world: &'w World) -> Self {
        Self { ray, world }
    }
}

/// Outcome of a single bounce
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bounce<'w> {
    /// Nothing was hit. `job` is the unchanged input.
    Miss { job: Job<'w>, color: Vec3 },
    /// `sphere` (index into the world) was hit at `point`; `job` continues
    /// along the refracted direction.
    Hit {
        job: Job<'w>,
        color: Vec3,
        sphere: usize,
        point: Point3,
    },
}

impl<'w> Bounce<'w> {
    pub fn is_done(&self) -> bool {
        matches!(self, Bounce::Miss { .. })
    }

    pub fn color(&self) -> Vec3 {
        match self {
            Bounce::Miss { color, .. } | Bounce::Hit { color, .. } => *color,
        }
    }

    pub fn job(&self) -> &Job<'w> {
        match self {
            Bounce::Miss { job, .. } | Bounce::Hit { job, .. } => job,
        }
    }
}

/// Continue `ray` through the surface of `sphere` at `hit`.
///
/// Entering rays use `1/eta` against the outward normal, exiting rays use
/// `eta` against the inward normal. A total internal reflection leaves a zero
/// direction, which the next intersection test treats as a miss.
pub fn refract_through(ray: &Ray, hit: &Intersection, sphere: &Sphere) -> Ray {
    let normal = sphere.normal_at(&hit.point);
    let incident = normalize_or_zero(&ray.direction);

    let direction = if incident.dot(&normal) < 0.0 {
        refract(&incident, &normal, 1.0 / REFRACTIVE_INDEX)
    } else {
        refract(&incident, &-normal, REFRACTIVE_INDEX)
    };

    Ray::new(hit.point, direction)
}

/// Run one bounce.
pub fn step(job: Job<'_>) -> Bounce<'_> {
    let world = job.world;

    let first_hit = world
        .spheres()
        .iter()
        .enumerate()
        .find_map(|(index, sphere)| intersect(&job.ray, sphere).map(|hit| (index, sphere, hit)));

    let Some((index, sphere, hit)) = first_hit else {
        return Bounce::Miss { job, color: background() };
    };

    let color = shade(&job.ray, &hit, sphere, world.sun());
    let next = Job::new(refract_through(&job.ray, &hit, sphere), world);

    Bounce::Hit {
        job: next,
        color,
        sphere: index,
        point: hit.point,
    }
}

/// Iterator over the bounces of one path. Ends after the first miss or once
/// the bounce budget is spent.
#[derive(Debug, Clone)]
pub struct Path<'w> {
    job: Option<Job<'w>>,
    remaining: u32,
}

impl<'w> Path<'w> {
    pub fn new(ray: Ray, world: &'w World, max_bounces: u32) -> Self {
        Self {
            job: Some(Job::new(ray, world)),
            remaining: max_bounces,
        }
    }
}

impl<'w> Iterator for Path<'w> {
    type Item = Bounce<'w>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let job = self.job.take()?;
        self.remaining -= 1;

        let bounce = step(job);
        if let Bounce::Hit { job: next, .. } = bounce {
            self.job = Some(next);
        }
        Some(bounce)
    }
}

/// Accumulated color along `ray`: background plus the sum of every bounce.
pub fn trace(ray: Ray, world: &World, max_bounces: u32) -> Vec3 {
    Path::new(ray, world, max_bounces).fold(background(), |acc, bounce| acc + bounce.color())
}

/// Every bounce of the path, for inspection.
pub fn trace_path(ray: Ray, world: &World, max_bounces: u32) -> Vec<Bounce<'_>> {
    Path::new(ray, world, max_bounces).collect()
}
