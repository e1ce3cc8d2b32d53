//! Timed game session
//!
//! ```text
//!   Idle --start--> Running --tick x30--> Ended --dismiss--> Idle
//!                    ^  |                   |
//!                    +--+ start (reset)     +--start--> Running
//! ```
//!
//! The session never sees asteroids. It learns about destroyed ones from the
//! bus and tells the scene whether it is active over the same bus.

use crate::best_score::BestScore;
use crate::consts::{GAME_DURATION_SECS, LOW_TIME_SECS};
use crate::events::{EventBus, Signal, Subscription, Topic};
use crate::persistence::KeyValueStore;

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Nothing running, start button shown
    Idle,
    /// Countdown running, hits score
    Running,
    /// Countdown hit zero, results shown
    Ended,
}

/// Result of a finished game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOutcome {
    pub score: u32,
    pub best: u32,
    /// The game beat the previous best
    pub new_best: bool,
}

/// Countdown, score and best score
pub struct GameSession {
    phase: SessionPhase,
    time_remaining: u32,
    score: u32,
    best: BestScore,
    last_outcome: Option<SessionOutcome>,
    store: Box<dyn KeyValueStore>,
    bus: EventBus,
    destroyed: Subscription,
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("phase", &self.phase)
            .field("time_remaining", &self.time_remaining)
            .field("score", &self.score)
            .field("best", &self.best)
            .finish()
    }
}

impl GameSession {
    /// Create an idle session, loading the best score from `store`
    pub fn new(bus: EventBus, store: Box<dyn KeyValueStore>) -> Self {
        let best = BestScore::load(store.as_ref());
        let destroyed = bus.subscribe(Topic::Destroyed);
        Self {
            phase: SessionPhase::Idle,
            time_remaining: GAME_DURATION_SECS,
            score: 0,
            best,
            last_outcome: None,
            store,
            bus,
            destroyed,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best_score(&self) -> u32 {
        self.best.value()
    }

    /// Outcome of the most recent finished game
    pub fn last_outcome(&self) -> Option<SessionOutcome> {
        self.last_outcome
    }

    /// Fraction of the countdown left, for the progress bar
    pub fn time_fraction(&self) -> f32 {
        self.time_remaining as f32 / GAME_DURATION_SECS as f32
    }

    /// Running with little time left
    pub fn is_low_on_time(&self) -> bool {
        self.is_running() && self.time_remaining <= LOW_TIME_SECS
    }

    /// Begin a game from any phase. Starting while running resets the
    /// counters and keeps running.
    pub fn start(&mut self) {
        // Hits from before the start belong to no game
        self.destroyed.drain();
        if self.phase == SessionPhase::Running {
            log::info!("Restarting game");
        } else {
            log::info!("Game started");
        }
        self.phase = SessionPhase::Running;
        self.time_remaining = GAME_DURATION_SECS;
        self.score = 0;
        self.last_outcome = None;
        self.bus.publish(Signal::SessionActive(true));
    }

    /// Count pending destroyed signals. Returns how many were scored.
    pub fn pump(&mut self) -> u32 {
        let hits = self
            .destroyed
            .drain()
            .into_iter()
            .filter(|s| matches!(s, Signal::AsteroidDestroyed { .. }))
            .count() as u32;
        if hits == 0 {
            return 0;
        }
        if self.phase != SessionPhase::Running {
            log::debug!("Ignoring {} hits outside a game", hits);
            return 0;
        }
        self.score += hits;
        log::debug!("Score {}", self.score);
        hits
    }

    /// One second of countdown. Returns the outcome when the game ends.
    pub fn tick_second(&mut self) -> Option<SessionOutcome> {
        if self.phase != SessionPhase::Running {
            return None;
        }
        // Hits that landed before this tick still count
        self.pump();

        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining > 0 {
            return None;
        }
        Some(self.finish())
    }

    fn finish(&mut self) -> SessionOutcome {
        self.phase = SessionPhase::Ended;
        let new_best = self.best.record(self.score);
        if new_best {
            if let Err(e) = self.best.save(self.store.as_mut()) {
                log::warn!("Could not persist best score: {}", e);
            }
        }
        let outcome = SessionOutcome {
            score: self.score,
            best: self.best.value(),
            new_best,
        };
        log::info!(
            "Game over: {} destroyed (best {}{})",
            outcome.score,
            outcome.best,
            if new_best { ", new best" } else { "" }
        );
        self.last_outcome = Some(outcome);
        self.bus.publish(Signal::SessionActive(false));
        outcome
    }

    /// Close the results. Only meaningful once a game has ended.
    pub fn dismiss(&mut self) {
        if self.phase != SessionPhase::Ended {
            return;
        }
        self.phase = SessionPhase::Idle;
        self.bus.publish(Signal::SessionActive(false));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, UnavailableStore};

    fn session_with_best(best: Option<&str>) -> (EventBus, GameSession, Subscription) {
        let bus = EventBus::new();
        let watcher = bus.subscribe(Topic::Session);
        let store = match best {
            Some(v) => MemoryStore::with(BestScore::STORAGE_KEY, v),
            None => MemoryStore::new(),
        };
        let session = GameSession::new(bus.clone(), Box::new(store));
        (bus, session, watcher)
    }

    fn hit(bus: &EventBus, id: u32) {
        bus.publish(Signal::AsteroidDestroyed { id });
    }

    fn run_out(session: &mut GameSession) -> Option<SessionOutcome> {
        while session.is_running() {
            if let Some(outcome) = session.tick_second() {
                return Some(outcome);
            }
        }
        None
    }

    #[test]
    fn test_starts_idle_with_loaded_best() {
        let (_bus, session, _watcher) = session_with_best(Some("9"));
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert_eq!(session.best_score(), 9);
        assert_eq!(session.time_remaining(), GAME_DURATION_SECS);
    }

    #[test]
    fn test_start_publishes_active() {
        let (_bus, mut session, watcher) = session_with_best(None);
        session.start();
        assert_eq!(session.phase(), SessionPhase::Running);
        assert_eq!(watcher.drain(), vec![Signal::SessionActive(true)]);
    }

    #[test]
    fn test_idle_countdown_does_nothing() {
        let (_bus, mut session, _watcher) = session_with_best(None);
        assert_eq!(session.tick_second(), None);
        assert_eq!(session.time_remaining(), GAME_DURATION_SECS);
    }

    #[test]
    fn test_full_game_without_hits() {
        let (_bus, mut session, watcher) = session_with_best(Some("4"));
        session.start();
        for _ in 0..GAME_DURATION_SECS - 1 {
            assert_eq!(session.tick_second(), None);
        }
        assert_eq!(session.phase(), SessionPhase::Running);
        let outcome = session.tick_second().unwrap();
        assert_eq!(session.phase(), SessionPhase::Ended);
        assert_eq!(session.score(), 0);
        assert_eq!(session.time_remaining(), 0);
        assert_eq!(
            outcome,
            SessionOutcome {
                score: 0,
                best: 4,
                new_best: false
            }
        );
        assert_eq!(
            watcher.drain(),
            vec![Signal::SessionActive(true), Signal::SessionActive(false)]
        );
        // Ended sessions stay ended
        assert_eq!(session.tick_second(), None);
    }

    #[test]
    fn test_low_on_time_in_last_ten_seconds() {
        let (_bus, mut session, _watcher) = session_with_best(None);
        assert!(!session.is_low_on_time());
        session.start();
        for _ in 0..GAME_DURATION_SECS - LOW_TIME_SECS - 1 {
            session.tick_second();
        }
        assert_eq!(session.time_remaining(), LOW_TIME_SECS + 1);
        assert!(!session.is_low_on_time());
        session.tick_second();
        assert!(session.is_low_on_time());
        run_out(&mut session);
        assert!(!session.is_low_on_time());
    }

    #[test]
    fn test_hits_between_ticks_count() {
        let (bus, mut session, _watcher) = session_with_best(Some("1"));
        session.start();
        session.tick_second(); // 29
        hit(&bus, 0);
        hit(&bus, 1);
        session.tick_second(); // 28
        hit(&bus, 2);
        let outcome = run_out(&mut session);
        assert_eq!(session.phase(), SessionPhase::Ended);
        assert_eq!(session.score(), 3);
        assert_eq!(
            outcome,
            Some(SessionOutcome {
                score: 3,
                best: 3,
                new_best: true
            })
        );
    }

    #[test]
    fn test_hits_outside_game_are_ignored() {
        let (bus, mut session, _watcher) = session_with_best(None);
        hit(&bus, 0);
        assert_eq!(session.pump(), 0);
        session.start();
        assert_eq!(session.score(), 0);
        run_out(&mut session);
        hit(&bus, 1);
        assert_eq!(session.pump(), 0);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_best_score_keeps_max_across_games() {
        let (bus, mut session, _watcher) = session_with_best(None);
        for (score, expected) in [(5, 5), (3, 5), (7, 7)] {
            session.start();
            for id in 0..score {
                hit(&bus, id);
            }
            let outcome = run_out(&mut session).unwrap();
            assert_eq!(outcome.score, score);
            assert_eq!(session.best_score(), expected);
        }
    }

    #[test]
    fn test_best_score_persisted() {
        let bus = EventBus::new();
        let mut session = GameSession::new(bus.clone(), Box::new(MemoryStore::new()));
        session.start();
        hit(&bus, 0);
        hit(&bus, 1);
        run_out(&mut session);
        assert_eq!(
            session.store.get(BestScore::STORAGE_KEY).unwrap().as_deref(),
            Some("2")
        );
    }

    #[test]
    fn test_storage_failure_does_not_block_play() {
        let bus = EventBus::new();
        let mut session = GameSession::new(bus.clone(), Box::new(UnavailableStore));
        assert_eq!(session.best_score(), 0);
        session.start();
        hit(&bus, 0);
        let outcome = run_out(&mut session).unwrap();
        assert_eq!(outcome.best, 1);
    }

    #[test]
    fn test_restart_while_running_resets() {
        let (bus, mut session, watcher) = session_with_best(None);
        session.start();
        hit(&bus, 0);
        session.tick_second();
        session.tick_second();
        assert_eq!(session.score(), 1);

        session.start();
        assert_eq!(session.phase(), SessionPhase::Running);
        assert_eq!(session.time_remaining(), GAME_DURATION_SECS);
        assert_eq!(session.score(), 0);
        assert_eq!(
            watcher.drain(),
            vec![Signal::SessionActive(true), Signal::SessionActive(true)]
        );
    }

    #[test]
    fn test_play_again_from_ended() {
        let (_bus, mut session, _watcher) = session_with_best(None);
        session.start();
        run_out(&mut session);
        session.start();
        assert_eq!(session.phase(), SessionPhase::Running);
        assert_eq!(session.last_outcome(), None);
    }

    #[test]
    fn test_dismiss() {
        let (_bus, mut session, watcher) = session_with_best(None);
        session.dismiss();
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert_eq!(watcher.pending(), 0);

        session.start();
        session.dismiss();
        assert_eq!(session.phase(), SessionPhase::Running);

        run_out(&mut session);
        watcher.drain();
        session.dismiss();
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert_eq!(watcher.drain(), vec![Signal::SessionActive(false)]);
        assert_eq!(session.best_score(), 0);
    }
}
