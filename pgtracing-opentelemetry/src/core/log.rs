// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::{
    fmt,
    str::FromStr,
    sync::atomic::{AtomicUsize, Ordering},
};

static MAX_LOG_LEVEL: AtomicUsize = AtomicUsize::new(LevelFilter::Info as usize);

pub(crate) fn set_max_level(filter: LevelFilter) {
    MAX_LOG_LEVEL.store(filter as usize, Ordering::Relaxed)
}

pub fn max_level() -> LevelFilter {
    LevelFilter::from_usize(MAX_LOG_LEVEL.load(Ordering::Relaxed))
}

/// Most verbose level printed by the `pgt_*` macros
#[repr(usize)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LevelFilter {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
}

impl LevelFilter {
    const ALL: [LevelFilter; 5] = [
        LevelFilter::Off,
        LevelFilter::Error,
        LevelFilter::Warn,
        LevelFilter::Info,
        LevelFilter::Debug,
    ];

    fn from_usize(filter: usize) -> Self {
        Self::ALL
            .get(filter)
            .copied()
            .unwrap_or(LevelFilter::Debug)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LevelFilter::Off => "OFF",
            LevelFilter::Error => "ERROR",
            LevelFilter::Warn => "WARN",
            LevelFilter::Info => "INFO",
            LevelFilter::Debug => "DEBUG",
        }
    }
}

impl FromStr for LevelFilter {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|filter| filter.as_str().eq_ignore_ascii_case(s))
            .ok_or("log level should be one of OFF, ERROR, WARN, INFO, DEBUG")
    }
}

impl fmt::Display for LevelFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Level of a single log line
#[repr(usize)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    // discriminants line up with LevelFilter
    Error = 1,
    Warn,
    Info,
    Debug,
}

impl Level {
    pub fn enabled(self) -> bool {
        self as usize <= max_level() as usize
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let filter = match self {
            Level::Error => LevelFilter::Error,
            Level::Warn => LevelFilter::Warn,
            Level::Info => LevelFilter::Info,
            Level::Debug => LevelFilter::Debug,
        };
        f.write_str(filter.as_str())
    }
}

/// Print one log line, errors go to stderr
pub fn print_log(lvl: Level, args: fmt::Arguments, file: &str, line: u32) {
    match lvl {
        Level::Error => eprintln!("\x1b[91m{lvl}\x1b[0m {file}:{line} - {args}"),
        _ => println!("\x1b[93m{lvl}\x1b[0m {file}:{line} - {args}"),
    }
}

#[cfg(feature = "test-utils")]
pub mod test_logger {
    //! Captures the lines logged by the current thread, whatever the max level
    //!
    //! ```no_run
    //! use pgtracing_opentelemetry::core::log::test_logger;
    //!
    //! let _guard = test_logger::activate_test_logger();
    //! pgtracing_opentelemetry::pgt_debug!("replayed {} spans", 3);
    //! let logs = test_logger::take_test_logs().unwrap();
    //! // logs == [(Level::Debug, "replayed 3 spans")]
    //! ```
    use std::{cell::RefCell, fmt};

    use super::Level;

    type CapturedLogs = Vec<(Level, String)>;

    thread_local! {
        static CAPTURED: RefCell<Option<CapturedLogs>> = const { RefCell::new(None) };
    }

    /// Restores the previous capture state of the thread when dropped
    pub struct LoggerGuard {
        prev: Option<CapturedLogs>,
    }

    impl Drop for LoggerGuard {
        fn drop(&mut self) {
            let _ = CAPTURED.try_with(|captured| captured.replace(self.prev.take()));
        }
    }

    pub fn activate_test_logger() -> LoggerGuard {
        LoggerGuard {
            prev: CAPTURED.with(|captured| captured.replace(Some(Vec::new()))),
        }
    }

    /// Logs captured since the last call, `None` if capture is not active
    pub fn take_test_logs() -> Option<CapturedLogs> {
        CAPTURED.with(|captured| captured.borrow_mut().as_mut().map(std::mem::take))
    }

    pub fn print_log(lvl: Level, args: fmt::Arguments, _file: &str, _line: u32) {
        let _ = CAPTURED.try_with(|captured| {
            if let Some(logs) = captured.borrow_mut().as_mut() {
                logs.push((lvl, args.to_string()));
            }
        });
    }
}

#[macro_export]
macro_rules! pgt_debug {
    ($($arg:tt)+) => {
        $crate::pgt_log!($crate::core::log::Level::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! pgt_info {
    ($($arg:tt)+) => {
        $crate::pgt_log!($crate::core::log::Level::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! pgt_warn {
    ($($arg:tt)+) => {
        $crate::pgt_log!($crate::core::log::Level::Warn, $($arg)+)
    };
}

#[macro_export]
macro_rules! pgt_error {
    ($($arg:tt)+) => {
        $crate::pgt_log!($crate::core::log::Level::Error, $($arg)+)
    };
}

#[macro_export]
macro_rules! pgt_log {
    ($lvl:expr, $($arg:tt)+) => {{
        let lvl: $crate::core::log::Level = $lvl;
        let loc = ::std::panic::Location::caller();
        if lvl.enabled() {
            $crate::core::log::print_log(lvl, format_args!($($arg)+), loc.file(), loc.line());
        }
        #[cfg(feature = "test-utils")]
        $crate::core::log::test_logger::print_log(lvl, format_args!($($arg)+), loc.file(), loc.line());
    }};
}
