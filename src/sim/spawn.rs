//! Asteroid factory
//!
//! Spawns land in one of four edge bands so the center of the screen stays
//! clear for the foreground text. The band is picked independently of every
//! other asteroid.

use glam::Vec3;
use rand::Rng;
use std::f32::consts::TAU;

use super::state::{Asteroid, AsteroidPhase, Region};
use crate::consts::*;

/// Which edge band a spawn was drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnEdge {
    Left,
    Right,
    Top,
    Bottom,
}

/// Random value in [-0.5, 0.5)
#[inline]
fn centered<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.random::<f32>() - 0.5
}

/// Pick a position inside one of the edge bands of `region`
pub fn spawn_position<R: Rng + ?Sized>(region: Region, rng: &mut R) -> (SpawnEdge, f32, f32) {
    let zone = region.exclusion_zone();
    let (w, h) = (region.width, region.height);

    if rng.random_bool(0.5) {
        // Left or right band, anywhere in the middle 75% vertically
        let offset = zone.half_width + rng.random::<f32>() * w * SPAWN_BAND_WIDTH;
        let y = centered(rng) * h * SPAWN_SPREAD;
        if rng.random_bool(0.5) {
            (SpawnEdge::Left, -offset, y)
        } else {
            (SpawnEdge::Right, offset, y)
        }
    } else {
        let offset = zone.half_height + rng.random::<f32>() * h * SPAWN_BAND_HEIGHT;
        let x = centered(rng) * w * SPAWN_SPREAD;
        if rng.random_bool(0.5) {
            (SpawnEdge::Top, x, offset)
        } else {
            (SpawnEdge::Bottom, x, -offset)
        }
    }
}

/// Create a fresh drifting asteroid for slot `id`
pub fn create_asteroid<R: Rng + ?Sized>(id: u32, region: Region, rng: &mut R) -> Asteroid {
    let (_, x, y) = spawn_position(region, rng);
    let z = ASTEROID_Z_NEAR - rng.random::<f32>() * ASTEROID_Z_DEPTH;

    Asteroid {
        id,
        position: Vec3::new(x, y, z),
        velocity: Vec3::new(
            centered(rng) * ASTEROID_MAX_DRIFT * 2.0,
            centered(rng) * ASTEROID_MAX_DRIFT * 2.0,
            0.0,
        ),
        rotation: Vec3::new(
            rng.random::<f32>() * TAU,
            rng.random::<f32>() * TAU,
            rng.random::<f32>() * TAU,
        ),
        rotation_speed: Vec3::new(
            centered(rng) * ASTEROID_MAX_SPIN * 2.0,
            centered(rng) * ASTEROID_MAX_SPIN * 2.0,
            centered(rng) * ASTEROID_MAX_SPIN * 2.0,
        ),
        scale: ASTEROID_MIN_SCALE + rng.random::<f32>() * ASTEROID_SCALE_RANGE,
        phase: AsteroidPhase::Drifting,
        seed: rng.random(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_new_asteroid_is_drifting() {
        let mut rng = Pcg32::seed_from_u64(7);
        let a = create_asteroid(3, Region::default(), &mut rng);
        assert_eq!(a.id, 3);
        assert_eq!(a.phase, AsteroidPhase::Drifting);
        assert_eq!(a.velocity.z, 0.0);
        assert!(a.scale >= ASTEROID_MIN_SCALE && a.scale < ASTEROID_MIN_SCALE + ASTEROID_SCALE_RANGE);
        assert!(a.position.z <= ASTEROID_Z_NEAR && a.position.z > ASTEROID_Z_NEAR - ASTEROID_Z_DEPTH);
    }

    #[test]
    fn test_all_edges_are_used() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut seen = [false; 4];
        for _ in 0..200 {
            let (edge, _, _) = spawn_position(Region::default(), &mut rng);
            seen[edge as usize] = true;
        }
        assert!(seen.iter().all(|s| *s), "edges seen: {:?}", seen);
    }

    proptest! {
        #[test]
        fn spawn_never_lands_in_center(
            seed in any::<u64>(),
            width in 1.0f32..40.0,
            height in 1.0f32..40.0,
        ) {
            let region = Region::new(width, height);
            let zone = region.exclusion_zone();
            let mut rng = Pcg32::seed_from_u64(seed);
            for id in 0..32 {
                let a = create_asteroid(id, region, &mut rng);
                prop_assert!(
                    !zone.contains(a.position.x, a.position.y),
                    "({}, {}) inside {:?}", a.position.x, a.position.y, zone
                );
            }
        }

        #[test]
        fn drift_stays_small(seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let a = create_asteroid(0, Region::default(), &mut rng);
            prop_assert!(a.velocity.x.abs() <= ASTEROID_MAX_DRIFT);
            prop_assert!(a.velocity.y.abs() <= ASTEROID_MAX_DRIFT);
            prop_assert!(a.rotation_speed.abs().max_element() <= ASTEROID_MAX_SPIN);
        }
    }
}
