use chrono::Local;
use std::fmt;
use std::io;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;

/// Local wall-clock time, e.g. `10/17/26 - 02:41.07PM`.
struct LocalTime;

impl FormatTime for LocalTime {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{}", Local::now().format("%x - %I:%M.%S%p"))
    }
}

/// Level filter for a verbosity of 0 (silent), 1 or 2 and above.
pub fn level_for_verbosity(verbose: i32) -> &'static str {
    match verbose {
        i32::MIN..=0 => "error",
        1 => "info",
        _ => "debug",
    }
}

/// Installs a stderr subscriber. `RUST_LOG`, when set, wins over `verbose`.
pub fn init(verbose: i32) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(LocalTime)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(level_for_verbosity(-1), "error");
        assert_eq!(level_for_verbosity(0), "error");
        assert_eq!(level_for_verbosity(1), "info");
        assert_eq!(level_for_verbosity(2), "debug");
        assert_eq!(level_for_verbosity(5), "debug");
    }
}
