#[macro_export]
macro_rules! db_log {
    ($level:expr, $component:expr, $($arg:tt)*) => {{
        let level = $level;
        if $crate::debugger::debugger::should_log(level) {
            $crate::debugger::debugger::emit(level, $component, format_args!($($arg)*));
        }
    }};
}

#[macro_export]
macro_rules! db_error {
    ($component:expr, $($arg:tt)*) => {
        $crate::db_log!($crate::debugger::DebugLevel::Error, $component, $($arg)*)
    };
}

#[macro_export]
macro_rules! db_warn {
    ($component:expr, $($arg:tt)*) => {
        $crate::db_log!($crate::debugger::DebugLevel::Warn, $component, $($arg)*)
    };
}

#[macro_export]
macro_rules! db_info {
    ($component:expr, $($arg:tt)*) => {
        $crate::db_log!($crate::debugger::DebugLevel::Info, $component, $($arg)*)
    };
}

#[macro_export]
macro_rules! db_debug {
    ($component:expr, $($arg:tt)*) => {
        $crate::db_log!($crate::debugger::DebugLevel::Debug, $component, $($arg)*)
    };
}

#[macro_export]
macro_rules! db_trace {
    ($component:expr, $($arg:tt)*) => {
        $crate::db_log!($crate::debugger::DebugLevel::Trace, $component, $($arg)*)
    };
}

/// Logs entry and exit of `$body` and indents everything logged inside it.
#[macro_export]
macro_rules! db_scope {
    ($level:expr, $component:expr, $name:expr, $body:block) => {{
        let level = $level;
        let active = $crate::debugger::debugger::should_log(level);
        if active {
            $crate::db_log!(level, $component, "begin {}", $name);
            $crate::debugger::debugger::indent();
        }

        let result = $body;

        if active {
            $crate::debugger::debugger::dedent();
            $crate::db_log!(level, $component, "end {}", $name);
        }
        result
    }};
}
