use colored::{ColoredString, Colorize};
use env_logger::{Builder, Env};
use log::info;
use std::io::Write;
use std::time::Duration;

/// Durations above these thresholds are rendered yellow and red respectively.
///
/// A single Storyblok fetch usually sits well under 500ms, so anything above
/// a second deserves attention in the build output.
const MILLIS_YELLOW_THRESHOLD: u128 = 500;
const MILLIS_RED_THRESHOLD: u128 = 2000;

pub fn init_logging() {
    let logging_env = Env::default().filter_or("RUST_LOG", "info");
    Builder::from_env(logging_env)
        .format(|buf, record| {
            if std::env::args().any(|arg| arg == "--quiet") {
                return Ok(());
            }

            if record.target() == "SKIP_FORMAT" {
                return writeln!(buf, "{}", record.args());
            }

            writeln!(
                buf,
                "{} {} {}",
                chrono::Local::now().format("%H:%M:%S").to_string().dimmed(),
                record.target().to_ascii_lowercase().bold().bright_yellow(),
                record.args()
            )
        })
        .init();
}

/// Renders a duration for terminal output, coloring slow ones.
pub fn format_duration(elapsed: Duration) -> ColoredString {
    match elapsed.as_millis() {
        millis if millis > MILLIS_RED_THRESHOLD => format!("{:.1}s", elapsed.as_secs_f32()).red(),
        millis if millis > MILLIS_YELLOW_THRESHOLD => format!("{}ms", millis).yellow(),
        millis if millis > 0 => format!("{}ms", millis).normal(),
        _ => format!("{}μs", elapsed.as_micros()).normal(),
    }
}

pub fn print_title(title: &str) {
    info!(target: "SKIP_FORMAT", "{}", "");
    info!(target: "SKIP_FORMAT", "{}", format!(" {} ", title).on_green().bold());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_durations_by_threshold() {
        let fast = format_duration(Duration::from_millis(20));
        assert!(fast.to_string().contains("20ms"));

        let slow = format_duration(Duration::from_millis(800));
        assert!(slow.to_string().contains("800ms"));

        let very_slow = format_duration(Duration::from_millis(2500));
        assert!(very_slow.to_string().contains("2.5s"));
    }

    #[test]
    fn sub_millisecond_durations_use_micros() {
        let tiny = format_duration(Duration::from_micros(250));
        assert!(tiny.to_string().contains("250μs"));
    }
}
