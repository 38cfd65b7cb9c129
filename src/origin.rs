//! Call-site identification
//!
//! Origins are captured where the log call is written, either through
//! `#[track_caller]` (file and line) or through the [`origin!`](crate::origin)
//! macro (file, line and enclosing function).

use std::panic::Location;
use std::path::Path;

/// Where a log call was made
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Origin {
    file: &'static str,
    line: u32,
    function: Option<&'static str>,
}

impl Origin {
    /// Build an origin from its parts
    ///
    /// `function` is a full path such as `my_crate::module::function`.
    pub const fn new(file: &'static str, line: u32, function: Option<&'static str>) -> Self {
        Self {
            file,
            line,
            function,
        }
    }

    /// Origin of the caller, resolved through `#[track_caller]`
    #[track_caller]
    pub fn caller() -> Self {
        let location = Location::caller();
        Self::new(location.file(), location.line(), None)
    }

    /// Source file as recorded by the compiler
    pub fn file(&self) -> &'static str {
        self.file
    }

    /// Line of the log call
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Full path of the enclosing function, when known
    pub fn function(&self) -> Option<&'static str> {
        self.function
    }

    /// Last segment of the enclosing function path
    pub fn function_name(&self) -> Option<&'static str> {
        self.function.map(|path| path.rsplit("::").next().unwrap_or(path))
    }

    /// File name without directories
    pub fn file_name(&self) -> &'static str {
        Path::new(self.file)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(self.file)
    }

    /// File name without its extension
    pub fn module(&self) -> &'static str {
        Path::new(self.file)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(self.file)
    }

    /// Short label: `<parent-dir>/<file>::<function>`
    ///
    /// Falls back to `<parent-dir>/<file>:<line>` when the function is unknown.
    pub fn label(&self) -> String {
        let path = Path::new(self.file);
        let parent = path
            .parent()
            .and_then(|dir| dir.file_name())
            .and_then(|dir| dir.to_str());

        let file = match parent {
            Some(dir) => format!("{}/{}", dir, self.file_name()),
            None => self.file_name().to_string(),
        };

        match self.function_name() {
            Some(function) => format!("{}::{}", file, function),
            None => format!("{}:{}", file, self.line),
        }
    }
}

/// Strip the helper item and closure markers from a `type_name` path
#[doc(hidden)]
pub fn __enclosing_function(raw: &'static str) -> &'static str {
    let mut path = raw.strip_suffix("::__origin_marker").unwrap_or(raw);
    while let Some(stripped) = path.strip_suffix("::{{closure}}") {
        path = stripped;
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_with_function() {
        let origin = Origin::new("src/sink/file.rs", 12, Some("dual_logger::sink::file::emit"));
        assert_eq!(origin.label(), "sink/file.rs::emit");
        assert_eq!(origin.function_name(), Some("emit"));
    }

    #[test]
    fn test_label_without_function() {
        let origin = Origin::new("src/facade.rs", 42, None);
        assert_eq!(origin.label(), "src/facade.rs:42");
    }

    #[test]
    fn test_label_without_directory() {
        let origin = Origin::new("main.rs", 3, Some("app::main"));
        assert_eq!(origin.label(), "main.rs::main");
    }

    #[test]
    fn test_file_parts() {
        let origin = Origin::new("src/bridge.rs", 1, None);
        assert_eq!(origin.file_name(), "bridge.rs");
        assert_eq!(origin.module(), "bridge");
    }

    #[test]
    fn test_caller_points_here() {
        let origin = Origin::caller();
        assert!(origin.file().ends_with("origin.rs"));
        assert_eq!(origin.line(), line!() - 2);
        assert_eq!(origin.function(), None);
    }

    #[test]
    fn test_origin_macro_captures_function() {
        let origin = crate::origin!();
        assert_eq!(
            origin.function_name(),
            Some("test_origin_macro_captures_function")
        );
        assert!(origin.label().ends_with("origin.rs::test_origin_macro_captures_function"));
    }

    #[test]
    fn test_origin_macro_inside_closure() {
        let capture = || crate::origin!();
        let origin = capture();
        assert_eq!(origin.function_name(), Some("test_origin_macro_inside_closure"));
    }

    #[test]
    fn test_enclosing_function_strips_markers() {
        assert_eq!(
            __enclosing_function("app::run::{{closure}}::__origin_marker"),
            "app::run"
        );
    }
}
