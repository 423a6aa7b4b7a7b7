// src/logging.rs

use crate::config::Settings;
use chrono::Utc;
use chrono_tz::Tz;
use tracing_subscriber::{
    fmt::{self, format::Writer, time::FormatTime},
    EnvFilter,
};

/// Renders event timestamps in a fixed zone instead of the host's.
#[derive(Clone, Copy, Debug)]
pub struct ZonedTimer(pub Tz);

impl FormatTime for ZonedTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = Utc::now().with_timezone(&self.0);
        write!(w, "{}", now.format("%Y-%m-%d %H:%M:%S%.3f %Z"))
    }
}

fn default_directive(settings: &Settings) -> &'static str {
    if settings.verbose {
        "debug"
    } else {
        "info"
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the `--verbose` level.
pub fn init(settings: &Settings) {
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(settings)));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_timer(ZonedTimer(settings.timezone))
        .init();
}

/// Test-only subscriber writing through the libtest capture.
#[cfg(test)]
pub(crate) fn init_test_logging() {
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,finscraper=debug")),
        )
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_selects_debug() {
        let mut s = Settings::default();
        assert_eq!(default_directive(&s), "info");
        s.verbose = true;
        assert_eq!(default_directive(&s), "debug");
    }

    #[test]
    fn test_timer_writes_zone_abbreviation() {
        let mut buf = String::new();
        ZonedTimer(chrono_tz::US::Pacific)
            .format_time(&mut Writer::new(&mut buf))
            .unwrap();
        assert!(buf.ends_with("PST") || buf.ends_with("PDT"), "{buf}");
    }
}
