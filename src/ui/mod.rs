//! UI components for the lockstep demo

pub mod docs;

mod demo;
mod pane;
mod settings;
mod theme;

pub use demo::DemoPage;
pub use settings::SettingsPanel;
pub use theme::ThemeManager;
