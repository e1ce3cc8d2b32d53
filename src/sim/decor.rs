//! Background decorations
//!
//! These animate whether or not a game is running. Frame-driven pieces
//! (starfield, comet) step once per rendered frame; time-driven pieces
//! (shooting stars, satellite) are positioned from wall-clock seconds.

use glam::{Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Twinkling background stars
#[derive(Debug, Clone)]
pub struct StarField {
    pub stars: Vec<Vec3>,
    /// Slow roll around the view axis (radians)
    pub rotation: f32,
    pub opacity: f32,
    twinkle: bool,
}

impl StarField {
    pub fn new<R: Rng + ?Sized>(count: usize, twinkle: bool, rng: &mut R) -> Self {
        let stars = (0..count)
            .map(|_| {
                Vec3::new(
                    (rng.random::<f32>() - 0.5) * STAR_SPREAD,
                    (rng.random::<f32>() - 0.5) * STAR_SPREAD,
                    STAR_Z_NEAR - rng.random::<f32>() * STAR_Z_DEPTH,
                )
            })
            .collect();
        Self {
            stars,
            rotation: 0.0,
            opacity: STAR_BASE_OPACITY_DARK,
            twinkle,
        }
    }

    /// Update rotation and opacity for elapsed scene time
    pub fn update(&mut self, elapsed_secs: f32, base_opacity: f32) {
        self.rotation = elapsed_secs * STAR_ROLL_SPEED;
        self.opacity = if self.twinkle {
            base_opacity + (elapsed_secs * STAR_TWINKLE_RATE).sin() * STAR_TWINKLE_DEPTH
        } else {
            base_opacity
        };
    }
}

/// A comet crossing the view diagonally
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Comet {
    pub progress: f32,
    /// Progress per frame
    pub speed: f32,
    pub active: bool,
}

impl Comet {
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            progress: 0.0,
            speed: COMET_MIN_SPEED + rng.random::<f32>() * COMET_SPEED_RANGE,
            active: true,
        }
    }

    pub fn step(&mut self) {
        if !self.active {
            return;
        }
        let progress = self.progress + self.speed;
        if progress >= 1.0 {
            self.active = false;
        } else {
            self.progress = progress;
        }
    }

    /// World position at a given point along the path
    pub fn position_at(progress: f32) -> Vec3 {
        COMET_START.lerp(COMET_END, progress.clamp(0.0, 1.0))
    }

    pub fn head(&self) -> Vec3 {
        Self::position_at(self.progress)
    }

    /// Tail points, nearest first
    pub fn tail(&self) -> impl Iterator<Item = Vec3> + '_ {
        COMET_TAIL_OFFSETS
            .iter()
            .map(|offset| Self::position_at((self.progress - offset).max(0.0)))
    }
}

/// A meteor streaking across the page (screen percent coordinates)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShootingStar {
    pub id: u64,
    /// Start in percent of the viewport
    pub start: Vec2,
    /// Travel direction in degrees (200-250, down and to the left)
    pub angle_deg: f32,
    pub duration_secs: f32,
    /// Head size in pixels
    pub size: f32,
    pub born_at: f64,
}

impl ShootingStar {
    pub fn spawn<R: Rng + ?Sized>(id: u64, now_secs: f64, rng: &mut R) -> Self {
        let x = if rng.random_bool(0.5) {
            rng.random::<f32>() * 100.0
        } else {
            80.0 + rng.random::<f32>() * 20.0
        };
        let y = if rng.random_bool(0.5) {
            rng.random::<f32>() * 30.0
        } else {
            rng.random::<f32>() * 50.0
        };
        Self {
            id,
            start: Vec2::new(x, y),
            angle_deg: 200.0 + rng.random::<f32>() * 50.0,
            duration_secs: 0.8 + rng.random::<f32>() * 0.6,
            size: 2.0 + rng.random::<f32>() * 2.0,
            born_at: now_secs,
        }
    }

    /// End point in screen percent (y grows downward)
    pub fn end(&self) -> Vec2 {
        let rad = self.angle_deg.to_radians();
        Vec2::new(
            self.start.x + rad.cos() * SHOOTING_STAR_TRAVEL,
            self.start.y - rad.sin() * SHOOTING_STAR_TRAVEL,
        )
    }

    /// Linear progress along the streak, clamped to [0, 1]
    pub fn progress(&self, now_secs: f64) -> f32 {
        (((now_secs - self.born_at) as f32) / self.duration_secs).clamp(0.0, 1.0)
    }

    /// Fade in over the first 10%, hold, fade out after 70%
    pub fn opacity(&self, now_secs: f64) -> f32 {
        let t = self.progress(now_secs);
        if t < 0.1 {
            t / 0.1
        } else if t < 0.7 {
            1.0
        } else {
            (1.0 - t) / 0.3
        }
    }

    pub fn position(&self, now_secs: f64) -> Vec2 {
        self.start.lerp(self.end(), self.progress(now_secs))
    }

    pub fn expired(&self, now_secs: f64) -> bool {
        now_secs - self.born_at >= (self.duration_secs + SHOOTING_STAR_LINGER) as f64
    }
}

/// A satellite drifting across the top of the page
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Satellite {
    pub shown_at: f64,
}

impl Satellite {
    pub fn progress(&self, now_secs: f64) -> f32 {
        (((now_secs - self.shown_at) as f32) / SATELLITE_PASS_SECS).clamp(0.0, 1.0)
    }

    /// Position in screen percent
    pub fn position(&self, now_secs: f64) -> Vec2 {
        SATELLITE_START.lerp(SATELLITE_END, self.progress(now_secs))
    }
}

/// Everything drawn behind the asteroids
#[derive(Debug, Clone)]
pub struct Decor {
    pub stars: StarField,
    pub comet: Option<Comet>,
    pub shooting_stars: Vec<ShootingStar>,
    pub satellite: Option<Satellite>,
    next_star_id: u64,
}

impl Decor {
    pub fn new(stars: StarField) -> Self {
        Self {
            stars,
            comet: None,
            shooting_stars: Vec::new(),
            satellite: None,
            next_star_id: 1,
        }
    }

    /// Per-frame step
    pub fn advance(&mut self, now_secs: f64, star_opacity: f32) {
        self.stars.update(now_secs as f32, star_opacity);
        if let Some(comet) = self.comet.as_mut() {
            comet.step();
        }
        if self.comet.is_some_and(|c| !c.active) {
            self.comet = None;
        }
        self.shooting_stars.retain(|s| !s.expired(now_secs));
    }

    /// Replace the current comet with a fresh one
    pub fn launch_comet<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.comet = Some(Comet::spawn(rng));
    }

    /// Add a shooting star, keeping only the most recent few
    pub fn launch_shooting_star<R: Rng + ?Sized>(&mut self, now_secs: f64, rng: &mut R) {
        let id = self.next_star_id;
        self.next_star_id += 1;
        if self.shooting_stars.len() >= MAX_SHOOTING_STARS {
            let excess = self.shooting_stars.len() + 1 - MAX_SHOOTING_STARS;
            self.shooting_stars.drain(..excess);
        }
        self.shooting_stars
            .push(ShootingStar::spawn(id, now_secs, rng));
    }

    pub fn show_satellite(&mut self, now_secs: f64) {
        self.satellite = Some(Satellite { shown_at: now_secs });
    }

    pub fn hide_satellite(&mut self) {
        self.satellite = None;
    }
}
