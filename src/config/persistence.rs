//! Settings persistence for lockstep
//!
//! Loads and saves [`Settings`] as JSON under the platform config directory.
//! Loading never fails from the caller's point of view: a missing, empty or
//! corrupted file falls back to defaults with a warning.

use crate::config::Settings;
use crate::error::{Error, Result, ResultExt};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Directory name under the platform config dir
const APP_DIR_NAME: &str = "lockstep";

/// Settings file name
const CONFIG_FILE_NAME: &str = "config.json";

/// Temporary file written first, then renamed over the real one
const CONFIG_TEMP_NAME: &str = "config.json.tmp";

// ─────────────────────────────────────────────────────────────────────────────
// Directory Resolution
// ─────────────────────────────────────────────────────────────────────────────

/// Platform config directory for lockstep.
///
/// - **Windows**: `%APPDATA%\lockstep\`
/// - **macOS**: `~/Library/Application Support/lockstep/`
/// - **Linux**: `~/.config/lockstep/`
///
/// # Errors
///
/// Returns `Error::ConfigDirNotFound` if the platform directory is unknown.
pub fn get_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|base| base.join(APP_DIR_NAME))
        .ok_or(Error::ConfigDirNotFound)
}

/// Full path of the settings file.
pub fn get_config_file_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE_NAME))
}

// ─────────────────────────────────────────────────────────────────────────────
// Load
// ─────────────────────────────────────────────────────────────────────────────

/// Load settings from the default location, falling back to defaults.
pub fn load_config() -> Settings {
    get_config_file_path()
        .and_then(|path| load_config_from(&path))
        .unwrap_or_warn_default(Settings::default(), "Failed to load settings")
}

/// Load settings from `path`.
///
/// A missing or blank file yields defaults. Values are sanitized.
///
/// # Errors
///
/// `Error::ConfigLoad` if the file exists but cannot be read,
/// `Error::ConfigParse` if it is not valid settings JSON.
pub fn load_config_from(path: &Path) -> Result<Settings> {
    if !path.exists() {
        debug!("No settings at {}, using defaults", path.display());
        return Ok(Settings::default());
    }

    let contents = fs::read_to_string(path).map_err(|e| Error::ConfigLoad {
        path: path.to_path_buf(),
        source: e,
    })?;

    if contents.trim().is_empty() {
        debug!("Settings file is empty, using defaults");
        return Ok(Settings::default());
    }

    let settings = Settings::from_json_sanitized(&contents).map_err(|e| {
        warn!("Settings at {} are invalid: {}", path.display(), e);
        Error::from(e)
    })?;

    info!("Settings loaded from {}", path.display());
    Ok(settings)
}

// ─────────────────────────────────────────────────────────────────────────────
// Save
// ─────────────────────────────────────────────────────────────────────────────

/// Save settings to the default location.
pub fn save_config(settings: &Settings) -> Result<()> {
    save_config_in(&get_config_dir()?, settings).map(|_| ())
}

/// Save settings into `dir`, creating it if needed. Returns the file path.
///
/// Writes a temporary file and renames it over the target so a crash never
/// leaves a half-written settings file behind.
pub fn save_config_in(dir: &Path, settings: &Settings) -> Result<PathBuf> {
    if !dir.exists() {
        debug!("Creating config directory: {}", dir.display());
        fs::create_dir_all(dir).map_err(|e| Error::ConfigSave {
            path: dir.to_path_buf(),
            source: Box::new(e),
        })?;
    }

    let config_path = dir.join(CONFIG_FILE_NAME);
    let temp_path = dir.join(CONFIG_TEMP_NAME);

    let json = serde_json::to_string_pretty(settings).map_err(|e| Error::ConfigSave {
        path: config_path.clone(),
        source: Box::new(e),
    })?;

    fs::write(&temp_path, &json).map_err(|e| Error::ConfigSave {
        path: temp_path.clone(),
        source: Box::new(e),
    })?;

    fs::rename(&temp_path, &config_path).map_err(|e| Error::ConfigSave {
        path: config_path.clone(),
        source: Box::new(e),
    })?;

    info!("Settings saved to {}", config_path.display());
    Ok(config_path)
}

/// Save settings, logging instead of returning failures.
///
/// Used on exit, where there is nobody left to show an error to.
pub fn save_config_silent(settings: &Settings) -> bool {
    match save_config(settings) {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to save settings: {}", e);
            false
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Page, Theme};
    use tempfile::TempDir;

    #[test]
    fn test_config_dir_is_namespaced() {
        if let Ok(dir) = get_config_dir() {
            assert!(dir.ends_with(APP_DIR_NAME));
        }
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let settings = load_config_from(&temp.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_blank_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "  \n").unwrap();
        assert_eq!(load_config_from(&path).unwrap(), Settings::default());
    }

    #[test]
    fn test_corrupted_file_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            load_config_from(&path),
            Err(Error::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_loaded_values_are_sanitized() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, r#"{"sync": {"throttle_delay_ms": 100000}}"#).unwrap();
        let settings = load_config_from(&path).unwrap();
        assert_eq!(settings.sync.throttle_delay_ms, 250);
    }

    #[test]
    fn test_save_then_load() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("nested").join(APP_DIR_NAME);
        let mut settings = Settings::default();
        settings.theme = Theme::Dark;
        settings.page = Page::Documentation;
        settings.sync.throttle = false;

        let path = save_config_in(&dir, &settings).unwrap();
        assert!(path.ends_with(CONFIG_FILE_NAME));
        assert!(!dir.join(CONFIG_TEMP_NAME).exists());

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_unwritable_dir_is_save_error() {
        let temp = TempDir::new().unwrap();
        let not_a_dir = temp.path().join("occupied");
        fs::write(&not_a_dir, "").unwrap();

        let err = save_config_in(&not_a_dir, &Settings::default()).unwrap_err();
        assert!(matches!(err, Error::ConfigSave { .. }));
        assert!(err.to_string().contains("occupied"));
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, r#"{"theme": "dark", "scroll_positions": [1, 2, 3]}"#).unwrap();
        assert_eq!(load_config_from(&path).unwrap().theme, Theme::Dark);
    }
}
