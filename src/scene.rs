//! The 3D backdrop: asteroid field plus decorations
//!
//! The scene listens for [`Signal::SessionActive`] and only simulates and
//! exposes asteroids while a game is active. Destroying an asteroid is
//! announced on the bus; the scene never talks to the session directly.

use crate::events::{EventBus, Signal, Subscription, Topic};
use crate::sim::{AsteroidField, Decor, HitOutcome, Region, advance, destroy};

/// Pointer cursor shown over the backdrop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    /// Over a destroyable asteroid
    Crosshair,
}

impl Cursor {
    pub fn as_css(&self) -> &'static str {
        match self {
            Cursor::Default => "default",
            Cursor::Crosshair => "crosshair",
        }
    }
}

#[derive(Debug)]
pub struct Scene {
    field: AsteroidField,
    decor: Decor,
    bus: EventBus,
    session: Subscription,
    active: bool,
    hovered: Option<u32>,
}

impl Scene {
    pub fn new(bus: EventBus, field: AsteroidField, decor: Decor) -> Self {
        let session = bus.subscribe(Topic::Session);
        Self {
            field,
            decor,
            bus,
            session,
            active: false,
            hovered: None,
        }
    }

    pub fn field(&self) -> &AsteroidField {
        &self.field
    }

    pub fn decor(&self) -> &Decor {
        &self.decor
    }

    pub fn decor_mut(&mut self) -> &mut Decor {
        &mut self.decor
    }

    /// A game is running, asteroids are live
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn hovered(&self) -> Option<u32> {
        self.hovered
    }

    /// Apply pending session signals. Returns true if the active flag changed.
    pub fn sync(&mut self) -> bool {
        let was_active = self.active;
        for signal in self.session.drain() {
            if let Signal::SessionActive(active) = signal {
                self.active = active;
            }
        }
        if !self.active {
            self.hovered = None;
        }
        if was_active != self.active {
            log::debug!("Asteroids {}", if self.active { "shown" } else { "hidden" });
        }
        was_active != self.active
    }

    /// One rendered frame. Decorations always move; asteroids only while active.
    pub fn advance(&mut self, now_secs: f64, star_opacity: f32) {
        self.sync();
        self.decor.advance(now_secs, star_opacity);
        if self.active {
            let field = std::mem::take(&mut self.field);
            self.field = advance(field);
        }
    }

    /// Pointer click on asteroid `id`
    pub fn hit(&mut self, id: u32) -> HitOutcome {
        self.sync();
        if !self.active {
            log::debug!("Ignoring click on asteroid {} while hidden", id);
            return HitOutcome::Unknown;
        }

        let field = std::mem::take(&mut self.field);
        let (field, outcome) = destroy(field, id);
        self.field = field;

        if outcome.destroyed() {
            if self.hovered == Some(id) {
                self.hovered = None;
            }
            self.bus.publish(Signal::AsteroidDestroyed { id });
        }
        outcome
    }

    /// Pointer moved over `id` (or nothing). Only drifting asteroids of an
    /// active game can be hovered.
    pub fn hover(&mut self, id: Option<u32>) -> Cursor {
        self.sync();
        self.hovered = id.filter(|id| {
            self.active && self.field.get(*id).is_some_and(|a| a.is_drifting())
        });
        if self.hovered.is_some() {
            Cursor::Crosshair
        } else {
            Cursor::Default
        }
    }

    pub fn resize(&mut self, region: Region) {
        self.field.resize(region);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::StarField;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn scene(bus: &EventBus) -> Scene {
        let mut rng = Pcg32::seed_from_u64(3);
        let decor = Decor::new(StarField::new(10, true, &mut rng));
        Scene::new(bus.clone(), AsteroidField::with_seed(3), decor)
    }

    #[test]
    fn test_inactive_scene_is_frozen() {
        let bus = EventBus::new();
        let mut scene = scene(&bus);
        let before = scene.field().asteroids.clone();
        for i in 0..10 {
            scene.advance(i as f64 / 60.0, 0.8);
        }
        assert_eq!(scene.field().asteroids, before);
        assert_eq!(scene.hit(0), HitOutcome::Unknown);
        assert_eq!(scene.hover(Some(0)), Cursor::Default);
    }

    #[test]
    fn test_active_scene_moves_and_publishes_hits() {
        let bus = EventBus::new();
        let hits = bus.subscribe(Topic::Destroyed);
        let mut scene = scene(&bus);
        bus.publish(Signal::SessionActive(true));

        let before = scene.field().asteroids[0].position;
        scene.advance(0.0, 0.8);
        assert!(scene.is_active());
        assert_ne!(scene.field().asteroids[0].position, before);

        assert_eq!(scene.hover(Some(2)), Cursor::Crosshair);
        assert_eq!(scene.hit(2), HitOutcome::Destroyed);
        assert_eq!(scene.hovered(), None);
        assert_eq!(scene.hit(2), HitOutcome::AlreadyExploding);
        assert_eq!(hits.drain(), vec![Signal::AsteroidDestroyed { id: 2 }]);
    }

    #[test]
    fn test_exploding_asteroid_not_hoverable() {
        let bus = EventBus::new();
        let mut scene = scene(&bus);
        bus.publish(Signal::SessionActive(true));
        scene.hit(4);
        assert_eq!(scene.hover(Some(4)), Cursor::Default);
        assert_eq!(scene.hover(Some(99)), Cursor::Default);
    }

    #[test]
    fn test_deactivation_clears_hover() {
        let bus = EventBus::new();
        let mut scene = scene(&bus);
        bus.publish(Signal::SessionActive(true));
        scene.hover(Some(1));
        bus.publish(Signal::SessionActive(false));
        assert!(scene.sync());
        assert_eq!(scene.hovered(), None);
        assert!(!scene.is_active());
    }
}
