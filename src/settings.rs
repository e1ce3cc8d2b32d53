//! Backdrop settings and preferences
//!
//! Persisted as JSON next to the best score.

use serde::{Deserialize, Serialize};

use crate::consts::{STAR_BASE_OPACITY_DARK, STAR_BASE_OPACITY_LIGHT};
use crate::persistence::{KeyValueStore, StorageError};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Background star count
    pub fn star_count(&self) -> usize {
        match self {
            QualityPreset::Low => 120,
            QualityPreset::Medium => 350,
            QualityPreset::High => 700,
        }
    }

    /// Debris pieces per explosion
    pub fn explosion_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 6,
            QualityPreset::Medium => 14,
            QualityPreset::High => 24,
        }
    }

    /// Icosphere subdivision used for asteroid wireframes
    pub fn asteroid_detail(&self) -> u32 {
        match self {
            QualityPreset::Low => 0,
            QualityPreset::Medium | QualityPreset::High => 1,
        }
    }
}

/// Color theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn is_dark(&self) -> bool {
        *self == Theme::Dark
    }

    /// Resting star opacity
    pub fn star_opacity(&self) -> f32 {
        match self {
            Theme::Dark => STAR_BASE_OPACITY_DARK,
            Theme::Light => STAR_BASE_OPACITY_LIGHT,
        }
    }
}

/// Backdrop settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    pub theme: Theme,

    // === Decorations ===
    /// Periodic satellite flyby (dark theme only)
    pub satellite: bool,
    /// Cosmic fact / event toasts
    pub notifications: bool,

    // === Behaviour ===
    /// Freeze the countdown and animation while the tab is hidden
    pub pause_when_hidden: bool,

    // === Accessibility ===
    /// Reduced motion (no twinkle, no shooting stars)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            theme: Theme::Dark,
            satellite: true,
            notifications: true,
            pause_when_hidden: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "asteroid-hunter-settings";

    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Stars twinkle unless motion is reduced
    pub fn effective_twinkle(&self) -> bool {
        !self.reduced_motion
    }

    /// Shooting stars are motion-heavy
    pub fn effective_shooting_stars(&self) -> bool {
        !self.reduced_motion
    }

    /// The satellite only shows against a dark sky
    pub fn effective_satellite(&self) -> bool {
        self.satellite && self.theme.is_dark()
    }

    /// Load settings, falling back to defaults on any problem
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring unreadable settings: {}", e);
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Settings unavailable: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
        let json =
            serde_json::to_string(self).map_err(|e| StorageError::Serialize(e.to_string()))?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
