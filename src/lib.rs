//! Asteroid Hunter - space backdrop with a timed asteroid-clicking mini-game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (asteroid field, decorations)
//! - `scene`: Asteroid field + decorations gated by the session signal
//! - `events`: Typed publish/subscribe between the scene and the game session
//! - `session`: Countdown, score and best-score state machine
//! - `driver`: Frame loop glue, timers and scheduling
//! - `renderer`: Camera, picking and draw list generation
//! - `cosmic`, `moon`: Date-based toasts and the moon phase badge
//! - `platform`: Browser/native platform abstraction
//! - `persistence`: Key/value storage (LocalStorage on web)

pub mod best_score;
pub mod cosmic;
pub mod driver;
pub mod events;
pub mod moon;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod scene;
pub mod session;
pub mod settings;
pub mod sim;

pub use best_score::BestScore;
pub use driver::Driver;
pub use events::{EventBus, Signal, Subscription, Topic};
pub use session::{GameSession, SessionOutcome, SessionPhase};
pub use settings::{QualityPreset, Settings, Theme};

/// Game configuration constants
pub mod consts {
    use glam::{Vec2, Vec3};

    /// Asteroids in the field
    pub const ASTEROID_COUNT: u32 = 10;

    /// Region used to seed the field before the first viewport measurement
    pub const INITIAL_REGION_WIDTH: f32 = 10.0;
    pub const INITIAL_REGION_HEIGHT: f32 = 6.0;
    /// Distance past the visible edge before an asteroid wraps around
    pub const WRAP_MARGIN: f32 = 0.5;

    /// Central no-spawn rectangle, as a fraction of region width/height
    pub const EXCLUSION_HALF_WIDTH: f32 = 0.3;
    pub const EXCLUSION_HALF_HEIGHT: f32 = 0.25;
    /// Depth of the left/right spawn bands (fraction of width)
    pub const SPAWN_BAND_WIDTH: f32 = 0.15;
    /// Depth of the top/bottom spawn bands (fraction of height)
    pub const SPAWN_BAND_HEIGHT: f32 = 0.25;
    /// Spread along a band (fraction of the region side)
    pub const SPAWN_SPREAD: f32 = 0.75;

    /// Asteroid depth band
    pub const ASTEROID_Z_NEAR: f32 = -1.5;
    pub const ASTEROID_Z_DEPTH: f32 = 1.5;
    /// Max drift per axis, world units per frame
    pub const ASTEROID_MAX_DRIFT: f32 = 0.002;
    /// Max spin per axis, radians per frame
    pub const ASTEROID_MAX_SPIN: f32 = 0.004;
    pub const ASTEROID_MIN_SCALE: f32 = 0.15;
    pub const ASTEROID_SCALE_RANGE: f32 = 0.12;
    /// Scale bump while the pointer is over an asteroid
    pub const HOVER_SCALE: f32 = 1.2;

    /// Explosion progress per frame (~29 frames, under half a second at 60 Hz)
    pub const EXPLOSION_STEP: f32 = 0.035;

    /// Length of one game
    pub const GAME_DURATION_SECS: u32 = 30;
    pub const COUNTDOWN_PERIOD_MS: f64 = 1000.0;
    /// Seconds left at which the timer readout turns urgent
    pub const LOW_TIME_SECS: u32 = 10;

    /// Stars
    pub const STAR_SPREAD: f32 = 18.0;
    pub const STAR_Z_NEAR: f32 = -5.0;
    pub const STAR_Z_DEPTH: f32 = 4.0;
    pub const STAR_ROLL_SPEED: f32 = 0.001;
    pub const STAR_TWINKLE_RATE: f32 = 1.5;
    pub const STAR_TWINKLE_DEPTH: f32 = 0.1;
    pub const STAR_BASE_OPACITY_DARK: f32 = 0.8;
    pub const STAR_BASE_OPACITY_LIGHT: f32 = 0.3;

    /// Comet path and timing
    pub const COMET_MIN_SPEED: f32 = 0.004;
    pub const COMET_SPEED_RANGE: f32 = 0.003;
    pub const COMET_START: Vec3 = Vec3::new(-7.0, 4.0, -4.0);
    pub const COMET_END: Vec3 = Vec3::new(7.0, -4.0, -4.0);
    pub const COMET_TAIL_OFFSETS: [f32; 8] = [0.02, 0.04, 0.07, 0.11, 0.16, 0.22, 0.29, 0.37];
    pub const COMET_FIRST_DELAY_MS: f64 = 2000.0;
    pub const COMET_MIN_PERIOD_MS: f64 = 8000.0;
    pub const COMET_PERIOD_JITTER_MS: f64 = 4000.0;

    /// Shooting stars (screen percent)
    pub const SHOOTING_STAR_TRAVEL: f32 = 150.0;
    pub const SHOOTING_STAR_LINGER: f32 = 0.5;
    pub const MAX_SHOOTING_STARS: usize = 5;
    pub const SHOOTING_STAR_FIRST_DELAY_MS: f64 = 2000.0;
    pub const SHOOTING_STAR_MIN_GAP_MS: f64 = 3000.0;
    pub const SHOOTING_STAR_GAP_JITTER_MS: f64 = 5000.0;

    /// Satellite flyby (screen percent)
    pub const SATELLITE_START: Vec2 = Vec2::new(-5.0, 15.0);
    pub const SATELLITE_END: Vec2 = Vec2::new(105.0, 25.0);
    pub const SATELLITE_PASS_SECS: f32 = 8.0;
    pub const SATELLITE_FIRST_DELAY_MS: f64 = 5000.0;
    pub const SATELLITE_PERIOD_MS: f64 = 30000.0;

    /// Perspective camera looking down -z
    pub const CAMERA_Z: f32 = 5.0;
    pub const CAMERA_FOV_Y_DEG: f32 = 60.0;
}

/// Wrap a coordinate that left `[-half, half]` to the opposite edge
#[inline]
pub fn wrap_axis(value: f32, half: f32) -> f32 {
    if value > half {
        -half
    } else if value < -half {
        half
    } else {
        value
    }
}

/// Milliseconds to seconds
#[inline]
pub fn ms_to_secs(ms: f64) -> f64 {
    ms / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_axis() {
        assert_eq!(wrap_axis(0.0, 1.0), 0.0);
        assert_eq!(wrap_axis(1.0, 1.0), 1.0);
        assert_eq!(wrap_axis(1.01, 1.0), -1.0);
        assert_eq!(wrap_axis(-1.01, 1.0), 1.0);
    }
}
