//! Logging setup
//!
//! Console output always, plus daily rotating files under a log
//! directory when one is configured. Rotated files older than 14 days
//! are removed by [`cleanup_old_logs`].

use std::fs;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, prelude::*, EnvFilter};

const RETENTION_DAYS: i64 = 14;
const FILE_PREFIX: &str = "cotiza";

/// Remove rotated `cotiza.YYYY-MM-DD.log` files past the retention window
pub fn cleanup_old_logs(log_dir: &Path) -> anyhow::Result<()> {
    use chrono::{Local, TimeZone};

    let cutoff = Local::now() - chrono::Duration::days(RETENTION_DAYS);

    if !log_dir.exists() {
        return Ok(());
    }

    for entry in fs::read_dir(log_dir)? {
        let entry = entry?;
        let path = entry.path();
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(n) => n,
            None => continue,
        };

        let date_part = match name
            .strip_prefix(&format!("{FILE_PREFIX}."))
            .and_then(|d| d.strip_suffix(".log"))
        {
            Some(d) => d,
            None => continue,
        };
        let naive_date = match chrono::NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
            Ok(d) => d,
            Err(_) => continue,
        };
        let midnight = match naive_date.and_hms_opt(0, 0, 0) {
            Some(t) => t,
            None => continue,
        };

        if let Some(local_datetime) = Local.from_local_datetime(&midnight).single() {
            if local_datetime < cutoff {
                fs::remove_file(&path)?;
                tracing::info!(file = %name, "Deleted old log file");
            }
        }
    }

    Ok(())
}

/// Log directory to use: the explicit argument when given, else the
/// `COTIZA_LOG_DIR` environment variable, else no file output
fn resolve_log_dir(explicit: Option<&str>) -> Option<String> {
    match explicit {
        Some(dir) => Some(dir.to_string()),
        None => std::env::var("COTIZA_LOG_DIR").ok().filter(|d| !d.is_empty()),
    }
}

/// Initialize the logging system
///
/// # Arguments
/// * `level` - fallback log level when RUST_LOG is unset (e.g. "info")
/// * `log_dir` - optional directory for daily rotating file logs;
///   falls back to `COTIZA_LOG_DIR` when `None`
pub fn init_logger(level: &str, log_dir: Option<&str>) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if let Some(dir) = resolve_log_dir(log_dir) {
        let log_dir = Path::new(&dir);
        fs::create_dir_all(log_dir)?;

        let file_log = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix(FILE_PREFIX)
            .filename_suffix("log")
            .build(log_dir)?;
        let file_layer = fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(file_log));

        cleanup_old_logs(log_dir)?;
        subscriber.with(file_layer).init();
    } else {
        subscriber.init();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleanup_removes_only_old_prefixed_files() {
        let dir = tempfile::tempdir().unwrap();
        let old = dir.path().join("cotiza.2020-01-01.log");
        let recent = dir
            .path()
            .join(format!("cotiza.{}.log", chrono::Local::now().format("%Y-%m-%d")));
        let unrelated = dir.path().join("notes.txt");
        fs::write(&old, b"x").unwrap();
        fs::write(&recent, b"x").unwrap();
        fs::write(&unrelated, b"x").unwrap();

        cleanup_old_logs(dir.path()).unwrap();

        assert!(!old.exists());
        assert!(recent.exists());
        assert!(unrelated.exists());
    }

    #[test]
    fn test_cleanup_missing_dir_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(cleanup_old_logs(&missing).is_ok());
    }

    #[test]
    fn test_explicit_log_dir_wins_over_env() {
        std::env::set_var("COTIZA_LOG_DIR", "/var/log/cotiza");
        assert_eq!(
            resolve_log_dir(Some("/tmp/logs")),
            Some("/tmp/logs".to_string())
        );
        assert_eq!(resolve_log_dir(None), Some("/var/log/cotiza".to_string()));
        std::env::remove_var("COTIZA_LOG_DIR");
        assert_eq!(resolve_log_dir(None), None);
    }
}
