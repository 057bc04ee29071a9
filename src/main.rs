// Hide console window on Windows in release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! lockstep - Main Entry Point
//!
//! Desktop demo of proportional scroll synchronization across three
//! containers. Built with egui.

mod app;
mod ui;

use app::LockstepApp;
use lockstep::config::load_config;
use lockstep::error::{Error, Result};
use log::info;

/// Application name constant.
const APP_NAME: &str = "lockstep";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting {}", APP_NAME);

    let settings = load_config();
    let window_size = settings.window_size;

    info!(
        "Window configuration: {}x{}, maximized: {}",
        window_size.width, window_size.height, window_size.maximized
    );

    let viewport = eframe::egui::ViewportBuilder::default()
        .with_title(APP_NAME)
        .with_inner_size([window_size.width, window_size.height])
        .with_min_inner_size([480.0, 320.0])
        .with_maximized(window_size.maximized);

    let viewport = if let (Some(x), Some(y)) = (window_size.x, window_size.y) {
        viewport.with_position([x, y])
    } else {
        viewport
    };

    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        APP_NAME,
        native_options,
        Box::new(move |_cc| Ok(Box::new(LockstepApp::new(settings)))),
    )
    .map_err(|e| Error::Window(e.to_string()))
}
