//! User settings for the lockstep demo
//!
//! Holds the options a user can change from the settings panel, with serde
//! support for JSON persistence. Scroll positions are deliberately not part
//! of the settings: every launch starts at the top.

use crate::sync::{Dispatch, Scheduler, SyncOptions, DEFAULT_MIN_DELTA, DEFAULT_THROTTLE_DELAY};
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use std::time::Duration;

// ─────────────────────────────────────────────────────────────────────────────
// Theme Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Available color themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    System,
}

impl Theme {
    pub fn label(&self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
            Theme::System => "System",
        }
    }

    pub fn all() -> &'static [Theme] {
        &[Theme::Light, Theme::Dark, Theme::System]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Page Selection
// ─────────────────────────────────────────────────────────────────────────────

/// Which page the main window shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    /// Three synchronized containers
    #[default]
    Demo,
    /// Static API reference
    Documentation,
}

impl Page {
    /// Switch to the other page.
    pub fn toggle(&self) -> Self {
        match self {
            Page::Demo => Page::Documentation,
            Page::Documentation => Page::Demo,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Page::Demo => "Demo",
            Page::Documentation => "API Documentation",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Window Size Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Window dimensions and position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSize {
    pub width: f32,
    pub height: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    #[serde(default)]
    pub maximized: bool,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            x: None,
            y: None,
            maximized: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sync Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// How the demo synchronizes its containers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Whether the containers are synchronized at all
    pub enabled: bool,
    /// Coalesce scroll bursts through a timer instead of syncing on every event
    pub throttle: bool,
    /// Throttle delay in milliseconds
    pub throttle_delay_ms: u64,
    /// Minimum offset change (pixels) that counts as motion
    pub min_delta: f32,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            throttle: true,
            throttle_delay_ms: DEFAULT_THROTTLE_DELAY.as_millis() as u64,
            min_delta: DEFAULT_MIN_DELTA,
        }
    }
}

impl SyncSettings {
    /// Minimum throttle delay in milliseconds.
    pub const MIN_THROTTLE_MS: u64 = 1;
    /// Maximum throttle delay in milliseconds.
    pub const MAX_THROTTLE_MS: u64 = 250;
    /// Minimum allowed motion threshold.
    pub const MIN_DELTA: f32 = 1.0;
    /// Maximum allowed motion threshold.
    pub const MAX_DELTA: f32 = 50.0;

    /// Build synchronizer options, using `scheduler` when throttling.
    pub fn to_options(&self, scheduler: Rc<dyn Scheduler>) -> SyncOptions {
        let dispatch = if self.throttle {
            Dispatch::Throttled {
                delay: Duration::from_millis(self.throttle_delay_ms),
                scheduler,
            }
        } else {
            Dispatch::Immediate
        };
        SyncOptions {
            min_delta: self.min_delta,
            dispatch,
        }
    }

    fn sanitize(&mut self) {
        self.throttle_delay_ms = self
            .throttle_delay_ms
            .clamp(Self::MIN_THROTTLE_MS, Self::MAX_THROTTLE_MS);
        if !self.min_delta.is_finite() {
            self.min_delta = DEFAULT_MIN_DELTA;
        }
        self.min_delta = self.min_delta.clamp(Self::MIN_DELTA, Self::MAX_DELTA);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// User preferences persisted to the config directory.
///
/// Every field has a default via `#[serde(default)]`, so partial or older
/// files load cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Color theme (light, dark, or system)
    pub theme: Theme,

    /// Page shown on startup
    pub page: Page,

    /// Window size and position
    pub window_size: WindowSize,

    /// Synchronization behavior
    pub sync: SyncSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            page: Page::default(),
            window_size: WindowSize::default(),
            sync: SyncSettings::default(),
        }
    }
}

impl Settings {
    /// Minimum window dimension.
    pub const MIN_WINDOW_SIZE: f32 = 200.0;
    /// Maximum window dimension.
    pub const MAX_WINDOW_SIZE: f32 = 10000.0;

    /// Clamp values to valid ranges after loading a hand-edited file.
    pub fn sanitize(&mut self) {
        self.window_size.width = self
            .window_size
            .width
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);
        self.window_size.height = self
            .window_size
            .height
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);

        self.sync.sanitize();
    }

    /// Deserialize and sanitize in one step.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::TimerQueue;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.page, Page::Demo);
        assert!(settings.sync.enabled);
        assert!(settings.sync.throttle);
        assert_eq!(settings.sync.throttle_delay_ms, 10);
        assert_eq!(settings.sync.min_delta, 1.0);
    }

    #[test]
    fn test_page_toggle() {
        assert_eq!(Page::Demo.toggle(), Page::Documentation);
        assert_eq!(Page::Documentation.toggle(), Page::Demo);
        assert_eq!(Page::Documentation.label(), "API Documentation");
    }

    #[test]
    fn test_enum_serialization() {
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
        assert_eq!(
            serde_json::to_string(&Page::Documentation).unwrap(),
            "\"documentation\""
        );
        assert_eq!(
            serde_json::from_str::<Theme>("\"system\"").unwrap(),
            Theme::System
        );
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"sync": {"throttle": false}}"#).unwrap();
        assert!(!settings.sync.throttle);
        assert!(settings.sync.enabled);
        assert_eq!(settings.sync.throttle_delay_ms, 10);
        assert_eq!(settings.window_size, WindowSize::default());
    }

    #[test]
    fn test_empty_json_is_default() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_sanitize_clamps_sync_values() {
        let json = r#"{"sync": {"throttle_delay_ms": 0, "min_delta": 0.1}, "window_size": {"width": 50.0, "height": 99999.0}}"#;
        let settings = Settings::from_json_sanitized(json).unwrap();
        assert_eq!(settings.sync.throttle_delay_ms, SyncSettings::MIN_THROTTLE_MS);
        assert_eq!(settings.sync.min_delta, SyncSettings::MIN_DELTA);
        assert_eq!(settings.window_size.width, Settings::MIN_WINDOW_SIZE);
        assert_eq!(settings.window_size.height, Settings::MAX_WINDOW_SIZE);

        let settings =
            Settings::from_json_sanitized(r#"{"sync": {"throttle_delay_ms": 5000}}"#).unwrap();
        assert_eq!(settings.sync.throttle_delay_ms, SyncSettings::MAX_THROTTLE_MS);
    }

    #[test]
    fn test_to_options() {
        let queue: Rc<dyn Scheduler> = Rc::new(TimerQueue::new());
        let mut sync = SyncSettings::default();

        let options = sync.to_options(queue.clone());
        assert!(matches!(
            options.dispatch,
            Dispatch::Throttled { delay, .. } if delay == Duration::from_millis(10)
        ));

        sync.throttle = false;
        sync.min_delta = 3.0;
        let options = sync.to_options(queue);
        assert!(matches!(options.dispatch, Dispatch::Immediate));
        assert_eq!(options.min_delta, 3.0);
    }

    #[test]
    fn test_wrong_types_rejected() {
        let result = serde_json::from_str::<Settings>(r#"{"sync": {"enabled": "yes"}}"#);
        assert!(result.is_err());
    }
}
