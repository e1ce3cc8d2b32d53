//! Frame loop glue
//!
//! The driver owns the scene, the session and every timer. The platform loop
//! calls [`Driver::frame`] once per animation frame and forwards pointer and
//! visibility events. Everything runs on the one UI thread; timers are
//! virtual and only fire from `frame` (or `start`), in deadline order.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::cosmic::{self, CosmicEvent, FACT_ROLL_PERIOD_MS, NotificationFeed};
use crate::events::EventBus;
use crate::moon::{CalendarDate, MoonPhase, moon_phase};
use crate::ms_to_secs;
use crate::persistence::KeyValueStore;
use crate::platform::{TimerId, TimerQueue};
use crate::scene::{Cursor, Scene};
use crate::session::{GameSession, SessionOutcome};
use crate::settings::{Settings, Theme};
use crate::sim::{AsteroidField, Decor, HitOutcome, Region, StarField};

/// What a timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Timer {
    Countdown,
    Comet,
    ShootingStar,
    Satellite,
    SatelliteHide,
    /// Index into the initial notice queue
    InitialNotice(usize),
    FactRoll,
    DismissNotice(u64),
}

pub struct Driver {
    scene: Scene,
    session: GameSession,
    timers: TimerQueue<Timer>,
    countdown: Option<TimerId>,
    feed: NotificationFeed,
    initial_notices: Vec<Option<CosmicEvent>>,
    settings: Settings,
    moon: MoonPhase,
    rng: Pcg32,
    started_at: f64,
    visible: bool,
}

impl std::fmt::Debug for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver")
            .field("session", &self.session)
            .field("active", &self.scene.is_active())
            .field("timers", &self.timers.len())
            .field("notices", &self.feed.len())
            .field("visible", &self.visible)
            .finish()
    }
}

impl Driver {
    /// Build the backdrop and schedule its decorations. `now_ms` is the
    /// platform clock at construction, `today` picks the date-based toasts.
    pub fn new(
        settings: Settings,
        store: Box<dyn KeyValueStore>,
        seed: u64,
        now_ms: f64,
        today: CalendarDate,
    ) -> Self {
        let bus = EventBus::new();
        let mut rng = Pcg32::seed_from_u64(seed.wrapping_add(1));

        let stars = StarField::new(
            settings.quality.star_count(),
            settings.effective_twinkle(),
            &mut rng,
        );
        let scene = Scene::new(bus.clone(), AsteroidField::with_seed(seed), Decor::new(stars));
        let session = GameSession::new(bus, store);
        let moon = moon_phase(today);
        log::info!(
            "Backdrop ready (seed {}, {} quality, {})",
            seed,
            settings.quality.as_str(),
            moon.name()
        );

        let mut driver = Self {
            scene,
            session,
            timers: TimerQueue::new(now_ms),
            countdown: None,
            feed: NotificationFeed::new(),
            initial_notices: Vec::new(),
            settings,
            moon,
            rng,
            started_at: now_ms,
            visible: true,
        };
        driver.schedule_decorations(today);
        driver
    }

    fn schedule_decorations(&mut self, today: CalendarDate) {
        let comet_period =
            COMET_MIN_PERIOD_MS + self.rng.random::<f64>() * COMET_PERIOD_JITTER_MS;
        self.timers.set_timeout(COMET_FIRST_DELAY_MS, Timer::Comet);
        self.timers.set_interval(comet_period, Timer::Comet);

        if self.settings.effective_shooting_stars() {
            self.timers
                .set_timeout(SHOOTING_STAR_FIRST_DELAY_MS, Timer::ShootingStar);
        }

        // Runs in either theme; each pass checks the theme when it fires
        if self.settings.satellite {
            self.timers
                .set_timeout(SATELLITE_FIRST_DELAY_MS, Timer::Satellite);
            self.timers
                .set_interval(SATELLITE_PERIOD_MS, Timer::Satellite);
        }

        if self.settings.notifications {
            for (index, scheduled) in cosmic::initial_schedule(today).into_iter().enumerate() {
                self.initial_notices.push(scheduled.event);
                self.timers
                    .set_timeout(scheduled.delay_ms as f64, Timer::InitialNotice(index));
            }
            self.timers.set_interval(FACT_ROLL_PERIOD_MS, Timer::FactRoll);
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn feed(&self) -> &NotificationFeed {
        &self.feed
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn moon_phase(&self) -> MoonPhase {
        self.moon
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Seconds of backdrop time at the timer clock. Time-driven decorations
    /// are positioned against this.
    pub fn scene_secs(&self) -> f64 {
        ms_to_secs(self.timers.now() - self.started_at)
    }

    /// One animation frame. Returns the outcome if a game ended this frame.
    pub fn frame(&mut self, now_ms: f64) -> Option<SessionOutcome> {
        if self.timers.is_paused() {
            return None;
        }
        let outcome = self.run_timers(now_ms);
        let secs = self.scene_secs();
        let opacity = self.settings.theme.star_opacity();
        self.scene.advance(secs, opacity);
        outcome
    }

    fn run_timers(&mut self, now_ms: f64) -> Option<SessionOutcome> {
        let mut outcome = None;
        for (id, timer) in self.timers.advance(now_ms) {
            match timer {
                Timer::Countdown => {
                    if let Some(result) = self.session.tick_second() {
                        self.timers.clear(id);
                        self.countdown = None;
                        outcome = Some(result);
                    }
                }
                Timer::Comet => self.scene.decor_mut().launch_comet(&mut self.rng),
                Timer::ShootingStar => {
                    let secs = self.scene_secs();
                    self.scene
                        .decor_mut()
                        .launch_shooting_star(secs, &mut self.rng);
                    let gap = SHOOTING_STAR_MIN_GAP_MS
                        + self.rng.random::<f64>() * SHOOTING_STAR_GAP_JITTER_MS;
                    self.timers.set_timeout(gap, Timer::ShootingStar);
                }
                Timer::Satellite => {
                    if self.settings.effective_satellite() {
                        let secs = self.scene_secs();
                        self.scene.decor_mut().show_satellite(secs);
                        self.timers.set_timeout(
                            f64::from(SATELLITE_PASS_SECS) * 1000.0,
                            Timer::SatelliteHide,
                        );
                    }
                }
                Timer::SatelliteHide => self.scene.decor_mut().hide_satellite(),
                Timer::InitialNotice(index) => {
                    let event = self
                        .initial_notices
                        .get_mut(index)
                        .and_then(Option::take)
                        .unwrap_or_else(|| cosmic::random_fact(&mut self.rng));
                    let shown = self.feed.push(event);
                    self.schedule_dismiss(shown);
                }
                Timer::FactRoll => {
                    if let Some(shown) = self.feed.roll_fact(&mut self.rng) {
                        self.schedule_dismiss(shown);
                    }
                }
                Timer::DismissNotice(notice) => {
                    self.feed.dismiss(notice);
                }
            }
        }
        outcome
    }

    fn schedule_dismiss(&mut self, (notice, display_ms): (u64, f64)) {
        self.timers
            .set_timeout(display_ms, Timer::DismissNotice(notice));
    }

    /// Start (or restart) a game. Any running countdown is replaced.
    pub fn start(&mut self, now_ms: f64) {
        self.run_timers(now_ms);
        if let Some(old) = self.countdown.take() {
            self.timers.clear(old);
        }
        self.session.start();
        self.countdown = Some(
            self.timers
                .set_interval(COUNTDOWN_PERIOD_MS, Timer::Countdown),
        );
        self.scene.sync();
    }

    /// Close the results panel
    pub fn dismiss(&mut self) {
        self.session.dismiss();
        self.scene.sync();
    }

    /// Close a toast early
    pub fn dismiss_notice(&mut self, id: u64) -> bool {
        self.feed.dismiss(id)
    }

    /// Pointer click resolved to an asteroid id. The hit is scored before
    /// this returns, so a countdown tick later in the frame already sees it.
    pub fn pointer_down(&mut self, id: u32) -> HitOutcome {
        let outcome = self.scene.hit(id);
        self.session.pump();
        outcome
    }

    pub fn pointer_move(&mut self, id: Option<u32>) -> Cursor {
        self.scene.hover(id)
    }

    /// Page visibility changed
    pub fn set_visible(&mut self, visible: bool, now_ms: f64) {
        if self.visible == visible {
            return;
        }
        self.visible = visible;
        if !self.settings.pause_when_hidden {
            return;
        }
        if visible {
            self.timers.resume(now_ms);
            log::info!("Resumed");
        } else {
            self.timers.pause(now_ms);
            log::info!("Paused while hidden");
        }
    }

    pub fn resize(&mut self, region: Region) {
        self.scene.resize(region);
    }

    /// Switch theme. The satellite only flies against a dark sky.
    pub fn set_theme(&mut self, theme: Theme) {
        self.settings.theme = theme;
        if !self.settings.effective_satellite() {
            self.scene.decor_mut().hide_satellite();
        }
    }

    /// Flip between dark and light, returning the new theme
    pub fn toggle_theme(&mut self) -> Theme {
        let theme = match self.settings.theme {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        };
        self.set_theme(theme);
        log::info!("Theme switched to {:?}", theme);
        theme
    }
}

impl Drop for Driver {
    fn drop(&mut self) {
        let cleared = self.timers.clear_all();
        log::debug!("Driver dropped, {} timers cleared", cleared);
    }
}
