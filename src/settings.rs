//! Visitor preferences for the overlays
//!
//! Persisted in LocalStorage as JSON. Missing fields fall back to defaults so
//! older saved blobs keep loading.

use serde::{Deserialize, Serialize};

use crate::sim::Reseed;

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

    /// Hyperspace star count
    pub fn star_count(&self) -> usize {
        match self {
            QualityPreset::Low => 300,
            QualityPreset::Medium => crate::consts::STAR_COUNT,
            QualityPreset::High => 1200,
        }
    }

    /// Live firework spark cap
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 300,
            QualityPreset::Medium => 1000,
            QualityPreset::High => 3000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    /// Keep feeding the fire's bottom row every tick
    pub sustained_fire: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0), scales every clip's own volume
    pub master_volume: f32,
    pub muted: bool,

    // === Accessibility ===
    /// Suppress page shake and strobe flashes
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            sustained_fire: false,
            master_volume: 1.0,
            muted: false,
            reduced_motion: false,
        }
    }
}

impl Settings {
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    pub fn fire_reseed(&self) -> Reseed {
        if self.sustained_fire {
            Reseed::EveryTick
        } else {
            Reseed::Once
        }
    }

    /// Volume actually applied to a clip with its own base volume
    pub fn effective_volume(&self, base: f32) -> f32 {
        if self.muted {
            0.0
        } else {
            (base * self.master_volume).clamp(0.0, 1.0)
        }
    }

    pub fn effective_page_shake(&self) -> bool {
        !self.reduced_motion
    }

    pub fn effective_strobe(&self) -> bool {
        !self.reduced_motion
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "portfolio_fx_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage
            && let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY)
        {
            match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring unreadable settings: {e}"),
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

        if let Some(storage) = storage
            && let Ok(json) = serde_json::to_string(self)
        {
            let _ = storage.set_item(Self::STORAGE_KEY, &json);
            log::info!("Settings saved");
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_star_counts() {
        assert_eq!(QualityPreset::Low.star_count(), 300);
        assert_eq!(QualityPreset::Medium.star_count(), 800);
        assert_eq!(QualityPreset::High.star_count(), 1200);
        assert_eq!(QualityPreset::parse("MED"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::parse("ultra"), None);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let s: Settings = serde_json::from_str(r#"{"muted":true}"#).unwrap();
        assert!(s.muted);
        assert_eq!(s.quality, QualityPreset::Medium);
        assert_eq!(s.effective_volume(0.7), 0.0);
    }

    #[test]
    fn test_round_trip_json() {
        let mut s = Settings::from_preset(QualityPreset::High);
        s.sustained_fire = true;
        let json = serde_json::to_string(&s).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
        assert_eq!(back.fire_reseed(), Reseed::EveryTick);
    }

    #[test]
    fn test_volume_scaling() {
        let s = Settings {
            master_volume: 0.5,
            ..Settings::default()
        };
        assert!((s.effective_volume(0.6) - 0.3).abs() < 1e-6);
    }
}
