//! Call-site logging macros.
//!
//! Each macro checks the build-time gate first, so a level compiled out with
//! a `min-level-*` feature costs nothing at the call site: no formatting, no
//! lock, no clock read.

/// Name of the enclosing function, without its module path.
#[macro_export]
macro_rules! function_name {
    () => {{
        fn __scribe_here() {}
        fn __scribe_type_name<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = __scribe_type_name(__scribe_here);
        let name = name.strip_suffix("::__scribe_here").unwrap_or(name);
        let name = name.trim_end_matches("::{{closure}}");
        match name.rfind("::") {
            Some(idx) => &name[idx + 2..],
            None => name,
        }
    }};
}

/// Writes a record at the given level through a [`LogWriter`](crate::LogWriter).
///
/// ```rust,ignore
/// scribe_log!(writer, Level::Info, "accepted {} connections", count);
/// ```
#[macro_export]
macro_rules! scribe_log {
    ($writer:expr, $level:expr, $($arg:tt)+) => {{
        let level: $crate::Level = $level;
        if level.is_enabled_static() {
            let writer: &$crate::LogWriter = &$writer;
            writer.log_fmt(
                level,
                ::std::line!(),
                $crate::function_name!(),
                $crate::record::short_source_name(::std::file!()),
                ::std::format_args!($($arg)+),
            );
        }
    }};
}

/// Writes a trace record.
#[macro_export]
macro_rules! trace {
    ($writer:expr, $($arg:tt)+) => {
        $crate::scribe_log!($writer, $crate::Level::Trace, $($arg)+)
    };
}

/// Writes a debug record.
#[macro_export]
macro_rules! debug {
    ($writer:expr, $($arg:tt)+) => {
        $crate::scribe_log!($writer, $crate::Level::Debug, $($arg)+)
    };
}

/// Writes an info record.
#[macro_export]
macro_rules! info {
    ($writer:expr, $($arg:tt)+) => {
        $crate::scribe_log!($writer, $crate::Level::Info, $($arg)+)
    };
}

/// Writes a warning record.
#[macro_export]
macro_rules! warn {
    ($writer:expr, $($arg:tt)+) => {
        $crate::scribe_log!($writer, $crate::Level::Warning, $($arg)+)
    };
}

/// Writes an error record.
#[macro_export]
macro_rules! error {
    ($writer:expr, $($arg:tt)+) => {
        $crate::scribe_log!($writer, $crate::Level::Error, $($arg)+)
    };
}

/// Writes a fatal record.
#[macro_export]
macro_rules! fatal {
    ($writer:expr, $($arg:tt)+) => {
        $crate::scribe_log!($writer, $crate::Level::Fatal, $($arg)+)
    };
}
