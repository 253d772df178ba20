/// Conditional logging module for development builds
///
/// The `log!` macro provides informational logging that is compiled out in
/// production (release) builds by default. In the browser it goes to the
/// console, on native targets (tests, benches) it goes to stderr.
///
/// Logging is enabled when either:
/// - Building in debug mode (`cfg(debug_assertions)`)
/// - The `console_logging` feature is explicitly enabled
///
/// # Examples
///
/// ```rust
/// use signal_plan_checker::logging::log;
///
/// let junction_name = "Junction A";
/// log!("Realised cycle for {}", junction_name);
/// ```
/// Conditionally log in development builds
///
/// This macro expands to `web_sys::console::log_1()` on wasm32 and to
/// `eprintln!` elsewhere. In production release builds it compiles to
/// nothing (zero overhead).
#[macro_export]
macro_rules! log {
    ($($arg:expr),+ $(,)?) => {{
        #[cfg(all(target_arch = "wasm32", any(debug_assertions, feature = "console_logging")))]
        {
            web_sys::console::log_1(&format!($($arg),+).into());
        }
        #[cfg(all(not(target_arch = "wasm32"), any(debug_assertions, feature = "console_logging")))]
        {
            eprintln!("{}", format!($($arg),+));
        }
        #[cfg(not(any(debug_assertions, feature = "console_logging")))]
        {
            $(let _ = &$arg;)+
        }
    }};
}

pub use log;
