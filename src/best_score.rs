//! Best score tracking
//!
//! Persisted as a plain integer string, read once at startup and written
//! when a game ends with a new best.

use crate::persistence::{KeyValueStore, StorageError};

/// Best score record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BestScore {
    value: u32,
}

impl BestScore {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "asteroid-destroyer-best-score";

    pub fn new(value: u32) -> Self {
        Self { value }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    /// Fold a finished game into the record.
    /// Returns true when the stored value changed.
    pub fn record(&mut self, score: u32) -> bool {
        if score > self.value {
            self.value = score;
            true
        } else {
            false
        }
    }

    /// Load from storage. Missing, unreadable or non-numeric values give 0.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(raw)) => match raw.trim().parse::<u32>() {
                Ok(value) => {
                    log::info!("Loaded best score {}", value);
                    Self { value }
                }
                Err(_) => {
                    log::warn!("Ignoring corrupt best score {:?}", raw);
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("No best score found, starting fresh");
                Self::default()
            }
            Err(e) => {
                log::warn!("Best score unavailable: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
        store.set(Self::STORAGE_KEY, &self.value.to_string())?;
        log::info!("Best score saved ({})", self.value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, UnavailableStore};

    #[test]
    fn test_load_missing_is_zero() {
        assert_eq!(BestScore::load(&MemoryStore::new()).value(), 0);
    }

    #[test]
    fn test_load_corrupt_is_zero() {
        let store = MemoryStore::with(BestScore::STORAGE_KEY, "lots");
        assert_eq!(BestScore::load(&store).value(), 0);
        let store = MemoryStore::with(BestScore::STORAGE_KEY, "-4");
        assert_eq!(BestScore::load(&store).value(), 0);
    }

    #[test]
    fn test_load_unavailable_is_zero() {
        assert_eq!(BestScore::load(&UnavailableStore).value(), 0);
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        BestScore::new(12).save(&mut store).unwrap();
        assert_eq!(
            store.get(BestScore::STORAGE_KEY).unwrap().as_deref(),
            Some("12")
        );
        assert_eq!(BestScore::load(&store).value(), 12);
    }

    #[test]
    fn test_record_keeps_max() {
        let mut best = BestScore::default();
        assert!(best.record(5));
        assert!(!best.record(3));
        assert!(!best.record(5));
        assert_eq!(best.value(), 5);
        assert!(best.record(7));
        assert_eq!(best.value(), 7);
    }
}
