//! Asteroid field state and core simulation types
//!
//! The field is the only state the per-frame step touches. It is moved into
//! [`super::advance`] and a new field comes back, so a hit applied between two
//! frames is never lost or applied twice.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::spawn::create_asteroid;
use crate::consts::*;

/// Usable simulation area in world units (centered on the origin)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub width: f32,
    pub height: f32,
}

impl Region {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Half extents past which a drifting asteroid wraps to the opposite edge
    #[inline]
    pub fn wrap_bounds(&self) -> (f32, f32) {
        (
            self.width / 2.0 + WRAP_MARGIN,
            self.height / 2.0 + WRAP_MARGIN,
        )
    }

    /// Central area reserved for foreground text and buttons
    pub fn exclusion_zone(&self) -> ExclusionZone {
        ExclusionZone {
            half_width: self.width * EXCLUSION_HALF_WIDTH,
            half_height: self.height * EXCLUSION_HALF_HEIGHT,
        }
    }
}

impl Default for Region {
    fn default() -> Self {
        Self::new(INITIAL_REGION_WIDTH, INITIAL_REGION_HEIGHT)
    }
}

/// Axis-aligned rectangle around the origin that spawns must avoid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExclusionZone {
    pub half_width: f32,
    pub half_height: f32,
}

impl ExclusionZone {
    /// Strictly inside the rectangle (the edges themselves are allowed)
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x.abs() < self.half_width && y.abs() < self.half_height
    }
}

/// Lifecycle of a single asteroid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AsteroidPhase {
    /// Moving and spinning normally, can be hit
    Drifting,
    /// Playing the destruction animation, progress in [0, 1)
    Exploding { progress: f32 },
}

/// A decorative asteroid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asteroid {
    /// Slot id, kept across respawns
    pub id: u32,
    pub position: Vec3,
    /// Drift per frame (z is always 0)
    pub velocity: Vec3,
    /// Euler angles (radians)
    pub rotation: Vec3,
    /// Euler angle change per frame
    pub rotation_speed: Vec3,
    pub scale: f32,
    pub phase: AsteroidPhase,
    /// Seed for the explosion debris pattern of this incarnation
    pub seed: u64,
}

impl Asteroid {
    #[inline]
    pub fn is_drifting(&self) -> bool {
        matches!(self.phase, AsteroidPhase::Drifting)
    }

    /// Explosion progress, or `None` while drifting
    pub fn explosion_progress(&self) -> Option<f32> {
        match self.phase {
            AsteroidPhase::Drifting => None,
            AsteroidPhase::Exploding { progress } => Some(progress),
        }
    }
}

/// The asteroid population plus the RNG used for respawns
#[derive(Debug, Clone)]
pub struct AsteroidField {
    pub region: Region,
    /// Sorted by id, fixed length
    pub asteroids: Vec<Asteroid>,
    pub(crate) rng: Pcg32,
}

impl Default for AsteroidField {
    /// Empty field, used as a placeholder while the real one is being stepped
    fn default() -> Self {
        Self {
            region: Region::default(),
            asteroids: Vec::new(),
            rng: Pcg32::seed_from_u64(0),
        }
    }
}

impl AsteroidField {
    /// Seed a population of `count` asteroids with ids `0..count`
    pub fn new(seed: u64, count: u32, region: Region) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let asteroids = (0..count)
            .map(|id| create_asteroid(id, region, &mut rng))
            .collect();
        Self {
            region,
            asteroids,
            rng,
        }
    }

    /// Field with the default population over the default region
    pub fn with_seed(seed: u64) -> Self {
        Self::new(seed, ASTEROID_COUNT, Region::default())
    }

    pub fn len(&self) -> usize {
        self.asteroids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.asteroids.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&Asteroid> {
        self.asteroids.iter().find(|a| a.id == id)
    }

    /// Ids in iteration order
    pub fn ids(&self) -> Vec<u32> {
        self.asteroids.iter().map(|a| a.id).collect()
    }

    /// Update the region used for wrapping and future respawns.
    /// Existing asteroids keep their positions and wrap in on the next step.
    pub fn resize(&mut self, region: Region) {
        if region.width > 0.0 && region.height > 0.0 {
            self.region = region;
        } else {
            log::warn!(
                "Ignoring degenerate region {}x{}",
                region.width,
                region.height
            );
        }
    }

    pub fn exploding_count(&self) -> usize {
        self.asteroids.iter().filter(|a| !a.is_drifting()).count()
    }
}
