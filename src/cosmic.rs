//! Cosmic event and fun-fact toasts
//!
//! Date-based events (meteor shower peaks, space anniversaries) are shown
//! shortly after load; otherwise a random fact. A low-odds periodic roll adds
//! more facts later. Scheduling is done by the driver; this module only
//! decides what to show and keeps the visible list.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::moon::CalendarDate;

/// Delay before the first toast
pub const INITIAL_DELAY_MS: f64 = 2000.0;
/// Gap between staggered initial events
pub const STAGGER_MS: f64 = 3000.0;
/// Delay before the fallback fact when there are no events today
pub const FALLBACK_FACT_DELAY_MS: f64 = 5000.0;
/// Periodic fact roll
pub const FACT_ROLL_PERIOD_MS: f64 = 120_000.0;
pub const FACT_ROLL_CHANCE: f64 = 0.3;
/// Periodic facts are skipped when this many toasts are already up
pub const MAX_STACKED: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeKind {
    MeteorShower,
    SpaceMilestone,
    FunFact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Importance {
    Low,
    Medium,
    High,
}

impl Importance {
    /// How long a toast stays up
    pub fn display_ms(&self) -> f64 {
        match self {
            Importance::Low => 8000.0,
            Importance::Medium | Importance::High => 12_000.0,
        }
    }
}

/// Toast content
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CosmicEvent {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
    pub emoji: &'static str,
    pub importance: Importance,
}

/// A toast on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub event: CosmicEvent,
}

/// Meteor shower peak nights as (name, [(month, day)])
const METEOR_SHOWERS: &[(&str, &[(u32, u32)])] = &[
    ("Quadrantids", &[(1, 3), (1, 4)]),
    ("Lyrids", &[(4, 22), (4, 23)]),
    ("Eta Aquariids", &[(5, 5), (5, 6)]),
    ("Perseids", &[(8, 11), (8, 12), (8, 13)]),
    ("Orionids", &[(10, 21), (10, 22)]),
    ("Leonids", &[(11, 17), (11, 18)]),
    ("Geminids", &[(12, 13), (12, 14), (12, 15)]),
    ("Ursids", &[(12, 21), (12, 22), (12, 23)]),
];

/// (month, day, title, message, emoji, importance)
const MILESTONES: &[(u32, u32, &str, &str, &str, Importance)] = &[
    (
        7,
        20,
        "Apollo 11 Anniversary",
        "On this day in 1969, humans first walked on the Moon!",
        "\u{1F468}\u{200D}\u{1F680}",
        Importance::High,
    ),
    (
        4,
        12,
        "Yuri's Night",
        "On this day in 1961, Yuri Gagarin became the first human in space!",
        "\u{1F680}",
        Importance::High,
    ),
    (
        10,
        4,
        "Sputnik Anniversary",
        "On this day in 1957, Sputnik 1 launched the Space Age!",
        "\u{1F6F0}\u{FE0F}",
        Importance::Medium,
    ),
    (
        2,
        18,
        "Pluto Discovery",
        "On this day in 1930, Clyde Tombaugh discovered Pluto!",
        "\u{1F52D}",
        Importance::Medium,
    ),
];

/// (title, message, emoji)
const FACTS: &[(&str, &str, &str)] = &[
    (
        "Neutron Star Density",
        "A teaspoon of neutron star material weighs about 6 billion tons!",
        "\u{2B50}",
    ),
    (
        "Space Smell",
        "Astronauts say space smells like seared steak and hot metal!",
        "\u{1F969}",
    ),
    ("Venus Day", "A day on Venus is longer than its year!", "\u{1FA90}"),
    ("Diamond Rain", "On Neptune and Uranus, it rains diamonds!", "\u{1F48E}"),
    (
        "Sun's Journey",
        "Light from the Sun takes 8 minutes 20 seconds to reach Earth.",
        "\u{2600}\u{FE0F}",
    ),
    (
        "Milky Way Center",
        "The center of our galaxy tastes like raspberries (ethyl formate)!",
        "\u{1F347}",
    ),
    (
        "Space Silence",
        "In space, no one can hear you scream. Sound needs a medium!",
        "\u{1F507}",
    ),
    (
        "Footprints on Moon",
        "Footprints on the Moon will last 100 million years. There is no wind!",
        "\u{1F463}",
    ),
    (
        "Asteroid Belt",
        "The asteroid belt's total mass is less than 4% of the Moon's!",
        "\u{1F311}",
    ),
    (
        "Red Sunset on Mars",
        "Sunsets on Mars appear blue due to its thin atmosphere!",
        "\u{1F535}",
    ),
];

/// Notable events for a date, showers first
pub fn cosmic_events(date: CalendarDate) -> Vec<CosmicEvent> {
    let today = (date.month, date.day);
    let showers = METEOR_SHOWERS
        .iter()
        .filter(|(_, peaks)| peaks.contains(&today))
        .map(|(name, _)| CosmicEvent {
            kind: NoticeKind::MeteorShower,
            title: format!("{} Meteor Shower", name),
            message: format!("Tonight is the peak of the {}! Look up for shooting stars", name),
            emoji: "\u{2604}\u{FE0F}",
            importance: Importance::High,
        });
    let milestones = MILESTONES
        .iter()
        .filter(|(m, d, ..)| (*m, *d) == today)
        .map(|(_, _, title, message, emoji, importance)| CosmicEvent {
            kind: NoticeKind::SpaceMilestone,
            title: title.to_string(),
            message: message.to_string(),
            emoji: *emoji,
            importance: *importance,
        });
    showers.chain(milestones).collect()
}

/// A random fun fact
pub fn random_fact<R: Rng + ?Sized>(rng: &mut R) -> CosmicEvent {
    let (title, message, emoji) = FACTS[rng.random_range(0..FACTS.len())];
    CosmicEvent {
        kind: NoticeKind::FunFact,
        title: title.to_string(),
        message: message.to_string(),
        emoji,
        importance: Importance::Low,
    }
}

/// A toast that should appear after a delay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledNotice {
    pub delay_ms: u64,
    pub event: Option<CosmicEvent>,
}

/// What to show right after load: staggered events, or a fact later if the
/// day has nothing special. `None` events mean "pick a fact when due".
pub fn initial_schedule(date: CalendarDate) -> Vec<ScheduledNotice> {
    let events = cosmic_events(date);
    if events.is_empty() {
        return vec![ScheduledNotice {
            delay_ms: FALLBACK_FACT_DELAY_MS as u64,
            event: None,
        }];
    }
    events
        .into_iter()
        .enumerate()
        .map(|(i, event)| ScheduledNotice {
            delay_ms: (i as f64 * STAGGER_MS + INITIAL_DELAY_MS) as u64,
            event: Some(event),
        })
        .collect()
}

/// Toasts currently on screen
#[derive(Debug, Clone, Default)]
pub struct NotificationFeed {
    notices: Vec<Notice>,
    next_id: u64,
}

impl NotificationFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    /// Show a toast. Returns its id and how long it should stay up.
    pub fn push(&mut self, event: CosmicEvent) -> (u64, f64) {
        self.next_id += 1;
        let id = self.next_id;
        let display_ms = event.importance.display_ms();
        log::debug!("Notice {}: {}", id, event.title);
        self.notices.push(Notice { id, event });
        (id, display_ms)
    }

    /// Periodic fact roll: only when the dice agree and the stack is short
    pub fn roll_fact<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<(u64, f64)> {
        if !rng.random_bool(FACT_ROLL_CHANCE) || self.notices.len() >= MAX_STACKED {
            return None;
        }
        Some(self.push(random_fact(rng)))
    }

    /// Remove a toast (manual close or timeout). Unknown ids are ignored.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.notices.len();
        self.notices.retain(|n| n.id != id);
        self.notices.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_perseids_peak() {
        let events = cosmic_events(CalendarDate::new(2025, 8, 12));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Perseids Meteor Shower");
        assert_eq!(events[0].importance, Importance::High);
    }

    #[test]
    fn test_milestone() {
        let events = cosmic_events(CalendarDate::new(2026, 7, 20));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, NoticeKind::SpaceMilestone);
        assert_eq!(events[0].title, "Apollo 11 Anniversary");
    }

    #[test]
    fn test_quiet_day_gets_fallback_fact() {
        let schedule = initial_schedule(CalendarDate::new(2026, 3, 3));
        assert_eq!(
            schedule,
            vec![ScheduledNotice {
                delay_ms: 5000,
                event: None
            }]
        );
    }

    #[test]
    fn test_initial_events_are_staggered() {
        let schedule = initial_schedule(CalendarDate::new(2026, 10, 21));
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule[0].delay_ms, 2000);
    }

    #[test]
    fn test_feed_dismiss_and_timeouts() {
        let mut rng = Pcg32::seed_from_u64(8);
        let mut feed = NotificationFeed::new();
        let (id, display) = feed.push(random_fact(&mut rng));
        assert_eq!(display, 8000.0);
        assert_eq!(feed.len(), 1);
        assert!(feed.dismiss(id));
        assert!(!feed.dismiss(id));
        assert!(feed.is_empty());
    }

    #[test]
    fn test_roll_respects_stack_limit() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut feed = NotificationFeed::new();
        for _ in 0..500 {
            feed.roll_fact(&mut rng);
        }
        assert_eq!(feed.len(), MAX_STACKED);
    }
}
