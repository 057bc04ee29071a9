//! Error handling for lockstep
//!
//! The synchronization core never fails: anomalies degrade to skipped
//! elements. Errors only arise in the application shell, when reading or
//! writing the settings file and when the window cannot be created.

use log::warn;
use std::fmt;
use std::io;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Custom Result Type Alias
// ─────────────────────────────────────────────────────────────────────────────

/// A specialized `Result` type for the application shell.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised outside the synchronization core.
#[derive(Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Settings file exists but could not be read
    ConfigLoad { path: PathBuf, source: io::Error },

    /// Settings file (or its directory) could not be written
    ConfigSave {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Settings file is not valid JSON for [`crate::config::Settings`]
    ConfigParse {
        message: String,
        source: Option<serde_json::Error>,
    },

    /// No platform configuration directory (e.g. `HOME` unset)
    ConfigDirNotFound,

    // ─────────────────────────────────────────────────────────────────────────
    // Window Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// The native window or rendering backend failed to start
    Window(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ConfigParse {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ConfigLoad { path, source } => {
                write!(f, "Failed to read settings '{}': {}", path.display(), source)
            }
            Error::ConfigSave { path, source } => {
                write!(f, "Failed to save settings '{}': {}", path.display(), source)
            }
            Error::ConfigParse { message, .. } => {
                write!(f, "Invalid settings format: {}", message)
            }
            Error::ConfigDirNotFound => write!(f, "Configuration directory not found"),
            Error::Window(msg) => write!(f, "Window error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ConfigLoad { source, .. } => Some(source),
            Error::ConfigSave { source, .. } => Some(source.as_ref()),
            Error::ConfigParse { source, .. } => source
                .as_ref()
                .map(|s| s as &(dyn std::error::Error + 'static)),
            Error::ConfigDirNotFound | Error::Window(_) => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Graceful Degradation Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Extension trait for Result to support graceful degradation.
pub trait ResultExt<T> {
    /// Log the error at warning level and fall back to `default`.
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T;
}

impl<T> ResultExt<T> for Result<T> {
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                warn!("{}: {}. Using default.", context, err);
                default
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn test_parse_error_keeps_source() {
        let parse = serde_json::from_str::<u32>("not json").unwrap_err();
        let err = Error::from(parse);
        assert!(matches!(err, Error::ConfigParse { .. }));
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("Invalid settings format"));
    }

    #[test]
    fn test_load_error_mentions_path() {
        let err = Error::ConfigLoad {
            path: PathBuf::from("/etc/lockstep/config.json"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/etc/lockstep/config.json"));
        assert!(msg.contains("denied"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_simple_variants_have_no_source() {
        assert!(Error::ConfigDirNotFound.source().is_none());
        assert!(Error::Window("no display".to_string()).source().is_none());
        assert_eq!(
            Error::Window("no display".to_string()).to_string(),
            "Window error: no display"
        );
    }

    #[test]
    fn test_unwrap_or_warn_default() {
        let ok: Result<u8> = Ok(3);
        assert_eq!(ok.unwrap_or_warn_default(0, "ctx"), 3);

        let err: Result<u8> = Err(Error::ConfigDirNotFound);
        assert_eq!(err.unwrap_or_warn_default(7, "ctx"), 7);
    }
}
