//! Severity levels
//!
//! A level is a plain number; the ordering of numbers is the ordering of
//! severities. Names are resolved through a process-wide table so that custom
//! levels registered at runtime show up in every formatted record.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};

use crate::error::FacadeError;

/// Numeric severity with a total order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Level(u32);

/// Names registered at runtime, keyed by numeric value
static CUSTOM_LEVELS: RwLock<BTreeMap<u32, String>> = RwLock::new(BTreeMap::new());

impl Level {
    pub const DEBUG: Level = Level(10);
    pub const INFO: Level = Level(20);
    pub const WARNING: Level = Level(30);
    pub const ERROR: Level = Level(40);
    pub const CRITICAL: Level = Level(50);

    /// Wrap a raw numeric severity
    pub const fn from_value(value: u32) -> Self {
        Level(value)
    }

    /// Numeric severity
    pub const fn value(self) -> u32 {
        self.0
    }

    fn standard_name(self) -> Option<&'static str> {
        match self.0 {
            10 => Some("DEBUG"),
            20 => Some("INFO"),
            30 => Some("WARNING"),
            40 => Some("ERROR"),
            50 => Some("CRITICAL"),
            _ => None,
        }
    }

    /// Display name for this level
    ///
    /// Registered names take precedence over the standard ones, so
    /// re-registering a standard value renames it for the whole process.
    /// Unnamed values render as `Level <n>`.
    pub fn name(self) -> Cow<'static, str> {
        let table = CUSTOM_LEVELS.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(name) = table.get(&self.0) {
            return Cow::Owned(name.clone());
        }
        drop(table);

        match self.standard_name() {
            Some(name) => Cow::Borrowed(name),
            None => Cow::Owned(format!("Level {}", self.0)),
        }
    }

    /// Parse one of the standard level names (case-insensitive)
    ///
    /// Accepts the aliases `WARN` and `FATAL`. Custom levels are not
    /// considered here; use [`Level::lookup`] for those.
    pub fn parse_standard(name: &str) -> Option<Level> {
        match name.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Some(Level::DEBUG),
            "INFO" => Some(Level::INFO),
            "WARNING" | "WARN" => Some(Level::WARNING),
            "ERROR" => Some(Level::ERROR),
            "CRITICAL" | "FATAL" => Some(Level::CRITICAL),
            _ => None,
        }
    }

    /// Resolve a level by name, checking registered levels first
    pub fn lookup(name: &str) -> Option<Level> {
        let table = CUSTOM_LEVELS.read().unwrap_or_else(PoisonError::into_inner);
        let registered = table
            .iter()
            .find(|(_, registered)| registered.as_str() == name)
            .map(|(value, _)| Level(*value));
        drop(table);

        registered.or_else(|| Level::parse_standard(name))
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.name())
    }
}

/// Register a level name for a numeric value, process-wide
///
/// A later registration for the same value replaces the earlier name, and a
/// later registration of the same name under a different value moves it.
pub fn register_level(name: &str, value: u32) -> Result<Level, FacadeError> {
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(FacadeError::InvalidLevelName(name.to_string()));
    }

    let mut table = CUSTOM_LEVELS.write().unwrap_or_else(PoisonError::into_inner);
    table.retain(|_, existing| existing.as_str() != name);
    table.insert(value, name.to_string());

    Ok(Level(value))
}

/// Resolve the console threshold from a raw `CONSOLE_LOG_LEVEL` value
///
/// Unset or unrecognised values fall back to INFO.
pub fn console_threshold(raw: Option<&str>) -> Level {
    raw.and_then(Level::parse_standard).unwrap_or(Level::INFO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_ordering() {
        assert!(Level::DEBUG < Level::INFO);
        assert!(Level::INFO < Level::WARNING);
        assert!(Level::WARNING < Level::ERROR);
        assert!(Level::ERROR < Level::CRITICAL);
    }

    #[test]
    fn test_standard_names() {
        assert_eq!(Level::DEBUG.name(), "DEBUG");
        assert_eq!(Level::CRITICAL.name(), "CRITICAL");
        assert_eq!(Level::from_value(7).name(), "Level 7");
    }

    #[test]
    fn test_display_respects_padding() {
        assert_eq!(format!("{:<8}|", Level::INFO), "INFO    |");
    }

    #[test]
    fn test_parse_standard_is_case_insensitive() {
        assert_eq!(Level::parse_standard("warning"), Some(Level::WARNING));
        assert_eq!(Level::parse_standard("Warn"), Some(Level::WARNING));
        assert_eq!(Level::parse_standard("fatal"), Some(Level::CRITICAL));
        assert_eq!(Level::parse_standard("verbose"), None);
    }

    #[test]
    fn test_console_threshold_fallback() {
        assert_eq!(console_threshold(None), Level::INFO);
        assert_eq!(console_threshold(Some("nonsense")), Level::INFO);
        assert_eq!(console_threshold(Some("error")), Level::ERROR);
        assert_eq!(console_threshold(Some("DEBUG")), Level::DEBUG);
    }

    #[test]
    fn test_register_level() {
        let level = register_level("NOTICE_TEST", 25).unwrap();
        assert_eq!(level.value(), 25);
        assert_eq!(level.name(), "NOTICE_TEST");
        assert_eq!(Level::lookup("NOTICE_TEST"), Some(level));
        assert!(level > Level::INFO && level < Level::WARNING);
    }

    #[test]
    fn test_register_level_moves_name() {
        register_level("MOVED_TEST", 61).unwrap();
        register_level("MOVED_TEST", 62).unwrap();
        assert_eq!(Level::lookup("MOVED_TEST"), Some(Level::from_value(62)));
        assert_eq!(Level::from_value(61).name(), "Level 61");
    }

    #[test]
    fn test_register_level_rejects_bad_names() {
        assert!(matches!(
            register_level("", 5),
            Err(FacadeError::InvalidLevelName(_))
        ));
        assert!(matches!(
            register_level("TWO WORDS", 5),
            Err(FacadeError::InvalidLevelName(_))
        ));
    }

    #[test]
    fn test_lookup_unknown() {
        assert_eq!(Level::lookup("NEVER_REGISTERED"), None);
    }
}
