//! Theme handling for the demo window
//!
//! Resolves the [`Theme`] preference to egui visuals and only touches the
//! context when the effective theme changes.

use eframe::egui::{Context, Visuals};
use log::debug;
use lockstep::config::Theme;

/// Tracks the applied theme so visuals are set once per change.
#[derive(Debug, Clone)]
pub struct ThemeManager {
    current_theme: Theme,
    /// Effective dark flag last written to the context
    applied_dark: Option<bool>,
}

impl ThemeManager {
    pub fn new(theme: Theme) -> Self {
        Self {
            current_theme: theme,
            applied_dark: None,
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        if self.current_theme != theme {
            self.current_theme = theme;
            self.applied_dark = None;
        }
    }

    /// Whether the theme resolves to dark, given the OS preference if known.
    pub fn is_dark(&self, system_dark: Option<bool>) -> bool {
        match self.current_theme {
            Theme::Light => false,
            Theme::Dark => true,
            Theme::System => system_dark.unwrap_or(true),
        }
    }

    /// Apply visuals if the effective theme changed. Returns `true` if applied.
    pub fn apply_if_needed(&mut self, ctx: &Context, system_dark: Option<bool>) -> bool {
        let dark = self.is_dark(system_dark);
        if self.applied_dark == Some(dark) {
            return false;
        }
        ctx.set_visuals(if dark { Visuals::dark() } else { Visuals::light() });
        self.applied_dark = Some(dark);
        debug!("Applied theme {:?} (dark: {})", self.current_theme, dark);
        true
    }
}
