//! Deterministic simulation module
//!
//! Asteroid and decoration state lives here. This module must stay pure:
//! - One step per rendered frame, no wall-clock reads
//! - Seeded RNG only
//! - Stable iteration order (by asteroid id)
//! - No rendering or platform dependencies

pub mod decor;
pub mod spawn;
pub mod state;
pub mod tick;

pub use decor::{Comet, Decor, Satellite, ShootingStar, StarField};
pub use spawn::{SpawnEdge, create_asteroid, spawn_position};
pub use state::{Asteroid, AsteroidField, AsteroidPhase, ExclusionZone, Region};
pub use tick::{HitOutcome, advance, destroy};
