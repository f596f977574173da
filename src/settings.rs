//! Player settings and preferences
//!
//! Persisted in LocalStorage. Rounds themselves are never saved.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_ROUND_MINUTES, MIN_ROUND_MINUTES};
use crate::i18n::Language;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Display language
    pub language: Language,
    /// Round length prefilled in the minutes field
    pub default_minutes: u32,

    // === Audio ===
    /// Play sound cues at all
    pub sound_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: Language::De,
            default_minutes: 3,
            sound_enabled: true,
            master_volume: 0.8,
        }
    }
}

impl Settings {
    /// Clamp values that may have been hand-edited in storage
    pub fn sanitized(mut self) -> Self {
        self.default_minutes = self
            .default_minutes
            .clamp(MIN_ROUND_MINUTES, MAX_ROUND_MINUTES);
        self.master_volume = if self.master_volume.is_finite() {
            self.master_volume.clamp(0.0, 1.0)
        } else {
            Self::default().master_volume
        };
        self
    }

    /// Effective volume for sound cues
    pub fn effective_volume(&self) -> f32 {
        if self.sound_enabled {
            self.master_volume
        } else {
            0.0
        }
    }

    /// Parse stored JSON, falling back to defaults on anything unreadable
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Settings>(json) {
            Ok(settings) => settings.sanitized(),
            Err(err) => {
                log::warn!("Ignoring unreadable settings: {}", err);
                Self::default()
            }
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "tier_ding_name_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
