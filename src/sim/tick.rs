//! Per-frame asteroid step and pointer hits
//!
//! Both functions take the field by value and hand back the next one.

use super::spawn::create_asteroid;
use super::state::{Asteroid, AsteroidField, AsteroidPhase, Region};
use crate::consts::*;
use crate::wrap_axis;

/// Result of a hit on an asteroid id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Asteroid was drifting and is now exploding
    Destroyed,
    /// Asteroid is mid-explosion, nothing changed
    AlreadyExploding,
    /// No asteroid with that id
    Unknown,
}

impl HitOutcome {
    #[inline]
    pub fn destroyed(self) -> bool {
        self == HitOutcome::Destroyed
    }
}

/// Advance every asteroid by one frame
pub fn advance(field: AsteroidField) -> AsteroidField {
    let AsteroidField {
        region,
        asteroids,
        mut rng,
    } = field;

    let asteroids = asteroids
        .into_iter()
        .map(|asteroid| match asteroid.phase {
            AsteroidPhase::Exploding { progress } => {
                let progress = progress + EXPLOSION_STEP;
                if progress >= 1.0 {
                    log::trace!("Asteroid {} respawned", asteroid.id);
                    create_asteroid(asteroid.id, region, &mut rng)
                } else {
                    Asteroid {
                        phase: AsteroidPhase::Exploding { progress },
                        ..asteroid
                    }
                }
            }
            AsteroidPhase::Drifting => drift(asteroid, region),
        })
        .collect();

    AsteroidField {
        region,
        asteroids,
        rng,
    }
}

/// Position and rotation integration for a drifting asteroid
fn drift(asteroid: Asteroid, region: Region) -> Asteroid {
    let (hw, hh) = region.wrap_bounds();
    let mut position = asteroid.position + asteroid.velocity;
    position.x = wrap_axis(position.x, hw);
    position.y = wrap_axis(position.y, hh);

    Asteroid {
        position,
        rotation: asteroid.rotation + asteroid.rotation_speed,
        ..asteroid
    }
}

/// Start the destruction animation of asteroid `id`.
///
/// Only a drifting asteroid can be destroyed, so repeated or late clicks on
/// the same asteroid count once per explosion.
pub fn destroy(field: AsteroidField, id: u32) -> (AsteroidField, HitOutcome) {
    let mut outcome = HitOutcome::Unknown;
    let AsteroidField {
        region,
        asteroids,
        rng,
    } = field;

    let asteroids = asteroids
        .into_iter()
        .map(|asteroid| {
            if asteroid.id != id {
                return asteroid;
            }
            match asteroid.phase {
                AsteroidPhase::Drifting => {
                    outcome = HitOutcome::Destroyed;
                    Asteroid {
                        phase: AsteroidPhase::Exploding { progress: 0.0 },
                        ..asteroid
                    }
                }
                AsteroidPhase::Exploding { .. } => {
                    outcome = HitOutcome::AlreadyExploding;
                    asteroid
                }
            }
        })
        .collect();

    (
        AsteroidField {
            region,
            asteroids,
            rng,
        },
        outcome,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use proptest::prelude::*;

    fn single(position: Vec3, velocity: Vec3) -> AsteroidField {
        let mut field = AsteroidField::new(1, 1, Region::new(10.0, 6.0));
        field.asteroids[0].position = position;
        field.asteroids[0].velocity = velocity;
        field
    }

    #[test]
    fn test_drift_moves_and_spins() {
        let mut field = single(Vec3::new(4.0, 2.0, -2.0), Vec3::new(0.001, -0.001, 0.0));
        let spin = field.asteroids[0].rotation_speed;
        let rot = field.asteroids[0].rotation;
        field = advance(field);
        let a = &field.asteroids[0];
        assert!((a.position.x - 4.001).abs() < 1e-5);
        assert!((a.position.y - 1.999).abs() < 1e-5);
        assert_eq!(a.position.z, -2.0);
        assert!((a.rotation - (rot + spin)).length() < 1e-6);
    }

    #[test]
    fn test_wraps_to_opposite_edge() {
        // hw = 5.5, hh = 3.5
        let field = advance(single(Vec3::new(5.499, 0.0, -2.0), Vec3::new(0.002, 0.0, 0.0)));
        assert_eq!(field.asteroids[0].position.x, -5.5);

        let field = advance(single(Vec3::new(0.0, -3.499, -2.0), Vec3::new(0.0, -0.002, 0.0)));
        assert_eq!(field.asteroids[0].position.y, 3.5);
    }

    #[test]
    fn test_destroy_then_respawn() {
        let field = AsteroidField::with_seed(42);
        let before = field.asteroids[2].clone();

        let (mut field, outcome) = destroy(field, 2);
        assert_eq!(outcome, HitOutcome::Destroyed);
        assert_eq!(field.asteroids[2].explosion_progress(), Some(0.0));

        // Exploding asteroids do not drift
        let frozen = field.asteroids[2].position;
        field = advance(field);
        assert_eq!(field.asteroids[2].position, frozen);

        let mut frames = 1;
        while !field.asteroids[2].is_drifting() {
            field = advance(field);
            frames += 1;
            assert!(frames < 60, "explosion should finish within a second");
        }
        let after = &field.asteroids[2];
        assert_eq!(after.id, 2);
        assert_ne!(after.seed, before.seed);
        assert!(after.explosion_progress().is_none());
    }

    #[test]
    fn test_double_hit_counts_once() {
        let field = AsteroidField::with_seed(5);
        let (field, first) = destroy(field, 0);
        let (field, second) = destroy(field, 0);
        assert_eq!(first, HitOutcome::Destroyed);
        assert_eq!(second, HitOutcome::AlreadyExploding);
        assert_eq!(field.exploding_count(), 1);
    }

    #[test]
    fn test_unknown_id_is_ignored() {
        let field = AsteroidField::with_seed(5);
        let snapshot = field.asteroids.clone();
        let (field, outcome) = destroy(field, 999);
        assert_eq!(outcome, HitOutcome::Unknown);
        assert_eq!(field.asteroids, snapshot);
    }

    #[test]
    fn test_determinism() {
        let mut a = AsteroidField::with_seed(99999);
        let mut b = AsteroidField::with_seed(99999);
        for frame in 0..200 {
            if frame == 10 {
                a = destroy(a, 4).0;
                b = destroy(b, 4).0;
            }
            a = advance(a);
            b = advance(b);
        }
        assert_eq!(a.asteroids, b.asteroids);
    }

    proptest! {
        #[test]
        fn population_is_constant(seed in any::<u64>(), frames in 0usize..400, hits in prop::collection::vec(0u32..12, 0..20)) {
            let mut field = AsteroidField::with_seed(seed);
            let ids = field.ids();
            for frame in 0..frames {
                if let Some(id) = hits.get(frame) {
                    field = destroy(field, *id).0;
                }
                field = advance(field);
            }
            prop_assert_eq!(field.ids(), ids);
        }

        #[test]
        fn explosion_progress_increases(seed in any::<u64>(), id in 0u32..10) {
            let (mut field, _) = destroy(AsteroidField::with_seed(seed), id);
            let mut last = field.get(id).and_then(|a| a.explosion_progress()).unwrap();
            loop {
                field = advance(field);
                let a = field.get(id).unwrap();
                match a.explosion_progress() {
                    Some(p) => {
                        prop_assert!(p > last);
                        last = p;
                    }
                    None => {
                        prop_assert!(a.is_drifting());
                        break;
                    }
                }
            }
        }
    }
}
