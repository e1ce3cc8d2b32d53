//! Virtual timers driven by frame timestamps
//!
//! `setTimeout`/`setInterval` equivalents that fire only when the owner calls
//! [`TimerQueue::advance`] with the current time. Interval deadlines are
//! absolute (`deadline += period`), so a late frame does not push later ticks
//! back. Pausing shifts every deadline by the paused duration.

/// Handle for a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone, Copy, PartialEq)]
enum Repeat {
    Once,
    Every(f64),
}

#[derive(Debug, Clone)]
struct Entry<T> {
    id: TimerId,
    deadline: f64,
    repeat: Repeat,
    tag: T,
}

/// Pending timers tagged with `T`
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    entries: Vec<Entry<T>>,
    next_id: u64,
    now: f64,
    paused_at: Option<f64>,
}

impl<T: Clone> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl<T: Clone> TimerQueue<T> {
    /// Queue whose clock starts at `now_ms`
    pub fn new(now_ms: f64) -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
            now: now_ms,
            paused_at: None,
        }
    }

    /// Current queue time (ms)
    pub fn now(&self) -> f64 {
        self.now
    }

    fn push(&mut self, deadline: f64, repeat: Repeat, tag: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            deadline,
            repeat,
            tag,
        });
        id
    }

    /// Fire once after `delay_ms`
    pub fn set_timeout(&mut self, delay_ms: f64, tag: T) -> TimerId {
        self.push(self.now + delay_ms.max(0.0), Repeat::Once, tag)
    }

    /// Fire every `period_ms`, first time one period from now
    pub fn set_interval(&mut self, period_ms: f64, tag: T) -> TimerId {
        let period = period_ms.max(1.0);
        self.push(self.now + period, Repeat::Every(period), tag)
    }

    /// Cancel a timer. Returns false if it already fired or was cleared.
    pub fn clear(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Cancel everything
    pub fn clear_all(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Stop the clock at `now_ms`
    pub fn pause(&mut self, now_ms: f64) {
        if self.paused_at.is_none() {
            self.paused_at = Some(now_ms);
        }
    }

    /// Restart the clock, sliding every deadline by the paused time
    pub fn resume(&mut self, now_ms: f64) {
        if let Some(paused_at) = self.paused_at.take() {
            let gap = (now_ms - paused_at).max(0.0);
            for entry in &mut self.entries {
                entry.deadline += gap;
            }
            self.now += gap;
        }
    }

    /// Move the clock to `now_ms` and return every timer that came due, in
    /// deadline order. An interval that missed several periods fires once per
    /// missed period.
    pub fn advance(&mut self, now_ms: f64) -> Vec<(TimerId, T)> {
        let mut fired = Vec::new();
        if self.paused_at.is_some() || now_ms < self.now {
            return fired;
        }
        self.now = now_ms;

        loop {
            let due = self
                .entries
                .iter()
                .enumerate()
                .filter(|(_, e)| e.deadline <= now_ms)
                .min_by(|(_, a), (_, b)| {
                    a.deadline
                        .partial_cmp(&b.deadline)
                        .unwrap_or(std::cmp::Ordering::Equal)
                        .then(a.id.cmp(&b.id))
                })
                .map(|(i, _)| i);

            let Some(index) = due else {
                break;
            };

            let entry = &mut self.entries[index];
            fired.push((entry.id, entry.tag.clone()));
            let repeat = entry.repeat;
            match repeat {
                Repeat::Every(period) => entry.deadline += period,
                Repeat::Once => {
                    self.entries.swap_remove(index);
                }
            }
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Tag {
        A,
        B,
    }

    #[test]
    fn test_timeout_fires_once() {
        let mut q = TimerQueue::new(0.0);
        let id = q.set_timeout(100.0, Tag::A);
        assert!(q.advance(99.0).is_empty());
        assert_eq!(q.advance(100.0), vec![(id, Tag::A)]);
        assert!(q.advance(1000.0).is_empty());
        assert!(q.is_empty());
    }

    #[test]
    fn test_interval_has_no_drift() {
        let mut q = TimerQueue::new(0.0);
        q.set_interval(1000.0, Tag::A);
        let mut fired = 0;
        // Frames every ~16.7 ms for 10.5 s
        let mut t = 0.0;
        while t < 10_500.0 {
            t += 1000.0 / 60.0;
            fired += q.advance(t).len();
        }
        assert_eq!(fired, 10);
    }

    #[test]
    fn test_interval_catches_up_after_long_frame() {
        let mut q = TimerQueue::new(0.0);
        q.set_interval(1000.0, Tag::A);
        assert_eq!(q.advance(3500.0).len(), 3);
        assert_eq!(q.advance(4000.0).len(), 1);
    }

    #[test]
    fn test_fires_in_deadline_order() {
        let mut q = TimerQueue::new(0.0);
        let b = q.set_timeout(300.0, Tag::B);
        let a = q.set_interval(200.0, Tag::A);
        let fired = q.advance(450.0);
        assert_eq!(fired, vec![(a, Tag::A), (b, Tag::B), (a, Tag::A)]);
    }

    #[test]
    fn test_clear() {
        let mut q = TimerQueue::new(0.0);
        let id = q.set_interval(10.0, Tag::A);
        assert!(q.clear(id));
        assert!(!q.clear(id));
        assert!(q.advance(100.0).is_empty());
    }

    #[test]
    fn test_pause_shifts_deadlines() {
        let mut q = TimerQueue::new(0.0);
        q.set_timeout(1000.0, Tag::A);
        q.advance(400.0);
        q.pause(400.0);
        assert!(q.advance(5000.0).is_empty());
        q.resume(5000.0);
        // 600 ms were still owed when paused
        assert!(q.advance(5599.0).is_empty());
        assert_eq!(q.advance(5600.0).len(), 1);
    }
}
