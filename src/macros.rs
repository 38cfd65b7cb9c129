//! Call-site capturing logging macros
//!
//! The facade methods only know the file and line of their caller. These
//! macros also record the enclosing function, which is what the origin label
//! of WARNING and above shows.

/// Capture the current call site, including the enclosing function
///
/// # Example
///
/// ```
/// let origin = dual_logger::origin!();
/// assert!(origin.file().ends_with(".rs"));
/// ```
#[macro_export]
macro_rules! origin {
    () => {{
        fn __origin_marker() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        $crate::Origin::new(
            ::std::file!(),
            ::std::line!(),
            ::std::option::Option::Some($crate::origin::__enclosing_function(
                __type_name_of(__origin_marker),
            )),
        )
    }};
}

/// Log at an arbitrary level, optionally attaching structured data
///
/// # Example
///
/// ```ignore
/// log_at!(facade, Level::WARNING, "disk low on {}", mount);
/// log_at!(facade, Level::WARNING, data = serde_json::json!({"free_mb": 12}), "disk low");
/// ```
#[macro_export]
macro_rules! log_at {
    ($facade:expr, $level:expr, data = $data:expr, $($arg:tt)+) => {
        $facade.log_with_origin(
            $level,
            $crate::origin!(),
            ::std::format!($($arg)+),
            $crate::Payload::render(&$data),
        )
    };
    ($facade:expr, $level:expr, $($arg:tt)+) => {
        $facade.log_with_origin(
            $level,
            $crate::origin!(),
            ::std::format!($($arg)+),
            ::std::option::Option::None,
        )
    };
}

/// Log at DEBUG with the call-site function recorded
#[macro_export]
macro_rules! log_debug {
    ($facade:expr, $($rest:tt)+) => {
        $crate::log_at!($facade, $crate::Level::DEBUG, $($rest)+)
    };
}

/// Log at INFO with the call-site function recorded
#[macro_export]
macro_rules! log_info {
    ($facade:expr, $($rest:tt)+) => {
        $crate::log_at!($facade, $crate::Level::INFO, $($rest)+)
    };
}

/// Log at WARNING with the call-site function recorded
#[macro_export]
macro_rules! log_warning {
    ($facade:expr, $($rest:tt)+) => {
        $crate::log_at!($facade, $crate::Level::WARNING, $($rest)+)
    };
}

/// Log at ERROR with the call-site function recorded
#[macro_export]
macro_rules! log_error {
    ($facade:expr, $($rest:tt)+) => {
        $crate::log_at!($facade, $crate::Level::ERROR, $($rest)+)
    };
}

/// Log at CRITICAL with the call-site function recorded
#[macro_export]
macro_rules! log_critical {
    ($facade:expr, $($rest:tt)+) => {
        $crate::log_at!($facade, $crate::Level::CRITICAL, $($rest)+)
    };
}
