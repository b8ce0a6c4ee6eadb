use std::cell::Cell;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum DebugLevel {
    Off = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl DebugLevel {
    pub fn from_u8(level: u8) -> Self {
        match level {
            0 => DebugLevel::Off,
            1 => DebugLevel::Error,
            2 => DebugLevel::Warn,
            3 => DebugLevel::Info,
            4 => DebugLevel::Debug,
            _ => DebugLevel::Trace,
        }
    }

    fn tag(self) -> (&'static str, &'static str) {
        match self {
            DebugLevel::Off => ("", color::RESET),
            DebugLevel::Error => ("ERROR", color::RED),
            DebugLevel::Warn => ("WARN", color::YELLOW),
            DebugLevel::Info => ("INFO", color::GREEN),
            DebugLevel::Debug => ("DEBUG", color::BLUE),
            DebugLevel::Trace => ("TRACE", color::GRAY),
        }
    }
}

impl FromStr for DebugLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(n) = s.parse::<u8>() {
            return Ok(DebugLevel::from_u8(n));
        }

        match s.to_ascii_lowercase().as_str() {
            "off" => Ok(DebugLevel::Off),
            "error" => Ok(DebugLevel::Error),
            "warn" => Ok(DebugLevel::Warn),
            "info" => Ok(DebugLevel::Info),
            "debug" => Ok(DebugLevel::Debug),
            "trace" => Ok(DebugLevel::Trace),
            other => Err(format!("unknown debug level '{}'", other)),
        }
    }
}

pub static DEBUG_LEVEL: AtomicU8 = AtomicU8::new(DebugLevel::Off as u8);

pub fn set_debug_level(level: DebugLevel) {
    DEBUG_LEVEL.store(level as u8, Ordering::Relaxed);
}

pub fn should_log(level: DebugLevel) -> bool {
    level != DebugLevel::Off && (level as u8) <= DEBUG_LEVEL.load(Ordering::Relaxed)
}

/// Writes one log line to stderr at the current scope depth. Callers check
/// `should_log` first so disabled levels never format their arguments.
pub fn emit(level: DebugLevel, component: &str, args: fmt::Arguments<'_>) {
    let (label, paint) = level.tag();
    eprintln!(
        "{}{}{:<5}{} [{}] {}",
        format_indent(),
        paint,
        label,
        color::RESET,
        component,
        args
    );
}

/// Component tags used in log lines.
pub struct Component;

impl Component {
    pub const BTREE: &'static str = "BTREE";
    pub const HASH: &'static str = "HASH";
    pub const WORKLOAD: &'static str = "WORKLOAD";
    pub const CLI: &'static str = "CLI";
}

thread_local! {
    static INDENT: Cell<usize> = const { Cell::new(0) };
}

pub fn indent() {
    INDENT.with(|i| i.set(i.get() + 1));
}

pub fn dedent() {
    INDENT.with(|i| i.set(i.get().saturating_sub(1)));
}

pub fn format_indent() -> String {
    INDENT.with(|i| "  ".repeat(i.get()))
}

pub mod color {
    pub const RED: &str = "\x1b[31m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const GREEN: &str = "\x1b[32m";
    pub const BLUE: &str = "\x1b[34m";
    pub const GRAY: &str = "\x1b[90m";
    pub const RESET: &str = "\x1b[0m";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_numbers() {
        assert_eq!("debug".parse::<DebugLevel>(), Ok(DebugLevel::Debug));
        assert_eq!("TRACE".parse::<DebugLevel>(), Ok(DebugLevel::Trace));
        assert_eq!("2".parse::<DebugLevel>(), Ok(DebugLevel::Warn));
        assert!("loud".parse::<DebugLevel>().is_err());
    }

    #[test]
    fn off_never_logs() {
        assert!(!should_log(DebugLevel::Off));
    }

    #[test]
    fn scope_depth_nests_and_saturates() {
        assert_eq!(format_indent(), "");
        indent();
        indent();
        assert_eq!(format_indent(), "    ");
        dedent();
        dedent();
        dedent();
        assert_eq!(format_indent(), "");
    }
}
