//! Main application module for the lockstep demo
//!
//! Owns the settings, the timer queue that drives throttled synchronization,
//! and the binding between the demo containers and the synchronizer.

use crate::ui::{docs, DemoPage, SettingsPanel, ThemeManager};
use eframe::egui;
use lockstep::config::{save_config_silent, Page, Settings, WindowSize};
use lockstep::{SyncBinding, TimerQueue};
use log::{debug, info};
use std::rc::Rc;
use std::time::{Duration, Instant};

/// The demo application.
pub struct LockstepApp {
    settings: Settings,
    theme_manager: ThemeManager,
    /// Virtual clock for throttled passes, advanced with wall time every frame
    timers: Rc<TimerQueue>,
    last_tick: Instant,
    demo: DemoPage,
    binding: SyncBinding,
    settings_panel: SettingsPanel,
    show_settings: bool,
}

impl LockstepApp {
    pub fn new(settings: Settings) -> Self {
        info!("Initializing lockstep");
        Self {
            theme_manager: ThemeManager::new(settings.theme),
            settings,
            timers: Rc::new(TimerQueue::new()),
            last_tick: Instant::now(),
            demo: DemoPage::new(),
            binding: SyncBinding::new(),
            settings_panel: SettingsPanel::new(),
            show_settings: false,
        }
    }

    /// Run timers that came due since the previous frame.
    fn tick(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_tick);
        self.last_tick = now;
        let fired = self.timers.advance(elapsed);
        if fired > 0 {
            debug!("{} sync timer(s) fired", fired);
        }
    }

    /// Attach or detach the synchronizer to match the current settings and page.
    fn update_binding(&mut self) {
        if self.settings.sync.enabled && self.settings.page == Page::Demo {
            let options = self.settings.sync.to_options(self.timers.clone());
            if self.binding.bind(&self.demo.elements(), options) {
                info!("Containers synchronized ({:?})", self.settings.sync);
            }
        } else if self.binding.is_bound() {
            self.binding.unbind();
            info!("Containers unsynchronized");
        }
    }

    fn update_window_state(&mut self, ctx: &egui::Context) {
        ctx.input(|i| {
            let viewport = i.viewport();
            if let Some(rect) = viewport.outer_rect {
                self.settings.window_size = WindowSize {
                    width: rect.width(),
                    height: rect.height(),
                    x: Some(rect.min.x),
                    y: Some(rect.min.y),
                    maximized: viewport.maximized.unwrap_or(false),
                };
            }
        });
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.strong("lockstep");
                ui.separator();
                ui.label(self.settings.page.label());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("⚙").on_hover_text("Settings").clicked() {
                        self.show_settings = !self.show_settings;
                    }
                    if ui
                        .button(format!("Show {}", self.settings.page.toggle().label()))
                        .clicked()
                    {
                        self.settings.page = self.settings.page.toggle();
                    }
                });
            });
        });
    }

    fn render_settings(&mut self, ctx: &egui::Context, is_dark: bool) {
        if !self.show_settings {
            return;
        }
        let output = self.settings_panel.show(ctx, &mut self.settings, is_dark);
        if output.reset_requested {
            let page = self.settings.page;
            let window_size = self.settings.window_size;
            self.settings = Settings {
                page,
                window_size,
                ..Settings::default()
            };
            info!("Settings reset to defaults");
        }
        if output.changed || output.reset_requested {
            self.theme_manager.set_theme(self.settings.theme);
        }
        if output.close_requested {
            self.show_settings = false;
        }
    }
}

impl eframe::App for LockstepApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        self.tick();

        let system_dark = frame
            .info()
            .system_theme
            .map(|theme| theme == eframe::Theme::Dark);
        self.theme_manager.apply_if_needed(ctx, system_dark);
        let is_dark = self.theme_manager.is_dark(system_dark);

        self.update_window_state(ctx);
        self.render_top_bar(ctx);
        self.render_settings(ctx, is_dark);

        // Bind before the panes show so their reports reach the current handle
        self.update_binding();

        egui::CentralPanel::default().show(ctx, |ui| match self.settings.page {
            Page::Demo => self
                .demo
                .show(ui, self.binding.is_bound(), self.binding.stats()),
            Page::Documentation => docs::show(ui),
        });

        if self.demo.needs_repaint() {
            ctx.request_repaint();
        } else if let Some(wait) = self.timers.next_deadline() {
            ctx.request_repaint_after(wait.max(Duration::from_millis(1)));
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Application exiting");
        self.binding.unbind();
        save_config_silent(&self.settings);
    }
}
