//! Settings panel for the lockstep demo
//!
//! A modal window for changing how the containers are synchronized and which
//! theme is used. Edits apply live; the caller decides when to persist.

use eframe::egui::{self, Color32, RichText, Ui};
use lockstep::config::{Settings, SyncSettings, Theme};

/// Settings panel sections for navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingsSection {
    #[default]
    Sync,
    Appearance,
}

impl SettingsSection {
    pub fn label(&self) -> &'static str {
        match self {
            SettingsSection::Sync => "Sync",
            SettingsSection::Appearance => "Appearance",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            SettingsSection::Sync => "⇅",
            SettingsSection::Appearance => "🎨",
        }
    }
}

/// Result of showing the settings panel.
#[derive(Debug, Clone, Default)]
pub struct SettingsPanelOutput {
    /// Whether settings were modified.
    pub changed: bool,
    /// Whether the panel should be closed.
    pub close_requested: bool,
    /// Whether a reset to defaults was requested.
    pub reset_requested: bool,
}

/// Settings panel state and rendering.
#[derive(Debug, Clone, Default)]
pub struct SettingsPanel {
    active_section: SettingsSection,
}

impl SettingsPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the settings panel as a modal window over a dimmed overlay.
    pub fn show(
        &mut self,
        ctx: &egui::Context,
        settings: &mut Settings,
        is_dark: bool,
    ) -> SettingsPanelOutput {
        let mut output = SettingsPanelOutput::default();

        let screen_rect = ctx.screen_rect();
        let overlay_color = if is_dark {
            Color32::from_rgba_unmultiplied(0, 0, 0, 180)
        } else {
            Color32::from_rgba_unmultiplied(0, 0, 0, 120)
        };

        egui::Area::new(egui::Id::new("settings_overlay"))
            .order(egui::Order::Middle)
            .fixed_pos(screen_rect.min)
            .show(ctx, |ui| {
                let response = ui.allocate_response(screen_rect.size(), egui::Sense::click());
                ui.painter().rect_filled(screen_rect, 0.0, overlay_color);
                if response.clicked() {
                    output.close_requested = true;
                }
            });

        egui::Window::new("⚙ Settings")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .min_width(440.0)
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                    output.close_requested = true;
                }

                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.set_min_width(120.0);
                        for section in [SettingsSection::Sync, SettingsSection::Appearance] {
                            let selected = self.active_section == section;
                            let text = format!("{} {}", section.icon(), section.label());
                            if ui
                                .add_sized(
                                    [110.0, 32.0],
                                    egui::SelectableLabel::new(
                                        selected,
                                        RichText::new(text).size(14.0),
                                    ),
                                )
                                .clicked()
                            {
                                self.active_section = section;
                            }
                        }

                        ui.add_space(ui.available_height() - 40.0);
                        if ui
                            .add_sized([110.0, 28.0], egui::Button::new("↺ Reset All"))
                            .on_hover_text("Reset all settings to defaults")
                            .clicked()
                        {
                            output.reset_requested = true;
                        }
                    });

                    ui.separator();

                    ui.vertical(|ui| {
                        ui.set_min_width(280.0);
                        ui.set_min_height(240.0);
                        let changed = match self.active_section {
                            SettingsSection::Sync => show_sync_section(ui, &mut settings.sync),
                            SettingsSection::Appearance => {
                                show_appearance_section(ui, &mut settings.theme)
                            }
                        };
                        output.changed |= changed;
                    });
                });

                ui.separator();
                ui.horizontal(|ui| {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Close").clicked() {
                            output.close_requested = true;
                        }
                        ui.label(RichText::new("Settings are saved on exit").small().weak());
                    });
                });
            });

        output
    }
}

/// Returns true if any sync setting changed.
fn show_sync_section(ui: &mut Ui, sync: &mut SyncSettings) -> bool {
    let mut changed = false;

    ui.heading("Sync");
    ui.add_space(8.0);

    changed |= ui
        .checkbox(&mut sync.enabled, "Synchronize containers")
        .on_hover_text("Scrolling one container moves the others proportionally")
        .changed();
    ui.add_space(4.0);

    ui.add_enabled_ui(sync.enabled, |ui| {
        changed |= ui
            .checkbox(&mut sync.throttle, "Throttle updates")
            .on_hover_text("Coalesce bursts of scroll events into one update")
            .changed();
        ui.add_space(8.0);

        ui.add_enabled_ui(sync.throttle, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new("Throttle delay").strong());
                ui.label(format!("{} ms", sync.throttle_delay_ms));
            });
            changed |= ui
                .add(
                    egui::Slider::new(
                        &mut sync.throttle_delay_ms,
                        SyncSettings::MIN_THROTTLE_MS..=SyncSettings::MAX_THROTTLE_MS,
                    )
                    .show_value(false),
                )
                .changed();
        });

        ui.add_space(12.0);
        ui.horizontal(|ui| {
            ui.label(RichText::new("Minimum delta").strong());
            ui.label(format!("{:.0} px", sync.min_delta));
        });
        changed |= ui
            .add(
                egui::Slider::new(
                    &mut sync.min_delta,
                    SyncSettings::MIN_DELTA..=SyncSettings::MAX_DELTA,
                )
                .show_value(false)
                .step_by(1.0),
            )
            .on_hover_text("Offset changes smaller than this are ignored")
            .changed();
    });

    changed
}

/// Returns true if the theme changed.
fn show_appearance_section(ui: &mut Ui, theme: &mut Theme) -> bool {
    let mut changed = false;

    ui.heading("Appearance");
    ui.add_space(8.0);
    ui.label(RichText::new("Theme").strong());
    ui.add_space(4.0);

    ui.horizontal(|ui| {
        for option in Theme::all() {
            let label = match option {
                Theme::Light => "☀ Light",
                Theme::Dark => "🌙 Dark",
                Theme::System => "💻 System",
            };
            changed |= ui.selectable_value(theme, *option, label).changed();
        }
    });

    changed
}
