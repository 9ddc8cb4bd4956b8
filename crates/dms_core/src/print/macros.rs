// Each macro has a `no_log` arm that keeps the
// message in memory but out of the log file.

/// Print an informational message
#[macro_export]
macro_rules! info {
    (no_log, $($arg:tt)*) => {
        $crate::print::log($crate::print::LogType::Info, format_args!($($arg)*), false)
    };
    ($($arg:tt)*) => {
        $crate::print::log($crate::print::LogType::Info, format_args!($($arg)*), true)
    };
}

/// Print an error message, to stderr
#[macro_export]
macro_rules! err {
    (no_log, $($arg:tt)*) => {
        $crate::print::log($crate::print::LogType::Error, format_args!($($arg)*), false)
    };
    ($($arg:tt)*) => {
        $crate::print::log($crate::print::LogType::Error, format_args!($($arg)*), true)
    };
}

/// Print a point message, i.e. a small step in some process
#[macro_export]
macro_rules! pt {
    (no_log, $($arg:tt)*) => {
        $crate::print::log($crate::print::LogType::Point, format_args!($($arg)*), false)
    };
    ($($arg:tt)*) => {
        $crate::print::log($crate::print::LogType::Point, format_args!($($arg)*), true)
    };
}
