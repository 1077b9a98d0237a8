use anyhow::{Context, Result};
use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::infrastructure::config::AppConfig;

const LOG_SUFFIX: &str = ".log";
const LOG_DATE_FORMAT: &str = "%Y-%m-%d";
const LOG_DATE_LEN: usize = "YYYY-MM-DD".len();

/// Keeps the non-blocking writer alive; drop it last to flush pending lines.
pub struct LoggingRuntime {
    _guard: WorkerGuard,
    pub log_file: PathBuf,
}

/// Stdout plus `<log_dir>/<component>-<date>.log`, so the server and the
/// archive build step never share a file. `RUST_LOG` wins over the
/// configured level.
pub fn init_logging(config: &AppConfig, component: &str) -> Result<LoggingRuntime> {
    std::fs::create_dir_all(&config.log_dir)
        .with_context(|| format!("failed to create log dir: {}", config.log_dir.display()))?;
    let expired = cleanup_old_logs(&config.log_dir, config.log_retention_days)?;

    let (file_writer, guard, log_file) =
        dated_log_writer(&config.log_dir, component, Utc::now().date_naive());
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .try_init()
        .context("failed to initialize tracing subscriber")?;

    if expired > 0 {
        tracing::info!(
            removed = expired,
            log_dir = %config.log_dir.display(),
            "removed expired log files"
        );
    }

    Ok(LoggingRuntime {
        _guard: guard,
        log_file,
    })
}

pub fn cleanup_old_logs(log_dir: &Path, retention_days: u16) -> Result<usize> {
    cleanup_old_logs_at(log_dir, retention_days, Utc::now().date_naive())
}

/// Delete dated log files of every component older than the retention
/// window ending at `today`. Files without a date name are left alone.
pub fn cleanup_old_logs_at(log_dir: &Path, retention_days: u16, today: NaiveDate) -> Result<usize> {
    if !log_dir.is_dir() {
        return Ok(0);
    }

    let window = i64::from(retention_days.max(1));
    let oldest_kept = today - ChronoDuration::days(window - 1);
    let mut removed = 0usize;

    for entry in std::fs::read_dir(log_dir)
        .with_context(|| format!("failed to read log dir: {}", log_dir.display()))?
    {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        match log_file_date(&path) {
            Some(date) if date < oldest_kept => {
                std::fs::remove_file(&path).with_context(|| {
                    format!("failed to remove old log file: {}", path.display())
                })?;
                removed += 1;
            }
            _ => {}
        }
    }

    Ok(removed)
}

// Accepts `<date>.log` and `<component>-<date>.log`.
fn log_file_date(path: &Path) -> Option<NaiveDate> {
    let stem = path.file_name()?.to_str()?.strip_suffix(LOG_SUFFIX)?;
    let split = stem.len().checked_sub(LOG_DATE_LEN)?;
    if !stem.is_char_boundary(split) {
        return None;
    }
    let (prefix, date) = stem.split_at(split);
    if !prefix.is_empty() && !prefix.ends_with('-') {
        return None;
    }
    NaiveDate::parse_from_str(date, LOG_DATE_FORMAT).ok()
}

fn log_file_name(component: &str, date: NaiveDate) -> String {
    format!("{component}-{}{LOG_SUFFIX}", date.format(LOG_DATE_FORMAT))
}

fn dated_log_writer(
    log_dir: &Path,
    component: &str,
    date: NaiveDate,
) -> (NonBlocking, WorkerGuard, PathBuf) {
    let file_name = log_file_name(component, date);
    let log_file = log_dir.join(&file_name);
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(log_dir, file_name));
    (writer, guard, log_file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;
    use tracing_subscriber::fmt::MakeWriter;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("date")
    }

    #[test]
    fn cleanup_removes_files_outside_retention_window() {
        let temp = tempdir().expect("tempdir");
        let log_dir = temp.path();
        std::fs::write(log_dir.join("2026-09-30.log"), "old").expect("write old");
        std::fs::write(log_dir.join("server-2026-09-29.log"), "old").expect("write old server");
        std::fs::write(log_dir.join("archives-2026-10-12.log"), "keep").expect("write keep");
        std::fs::write(log_dir.join("catalog.log"), "ignore").expect("write misc");
        std::fs::write(log_dir.join("x2026-09-01.log"), "ignore").expect("write odd name");

        let removed = cleanup_old_logs_at(log_dir, 7, day(2026, 10, 16)).expect("cleanup");

        assert_eq!(removed, 2);
        assert!(!log_dir.join("2026-09-30.log").exists());
        assert!(!log_dir.join("server-2026-09-29.log").exists());
        assert!(log_dir.join("archives-2026-10-12.log").exists());
        assert!(log_dir.join("catalog.log").exists());
        assert!(log_dir.join("x2026-09-01.log").exists());
    }

    #[test]
    fn zero_retention_still_keeps_today() {
        let temp = tempdir().expect("tempdir");
        std::fs::write(temp.path().join("2026-10-15.log"), "yesterday").expect("write");
        std::fs::write(temp.path().join("2026-10-16.log"), "today").expect("write");

        let removed = cleanup_old_logs_at(temp.path(), 0, day(2026, 10, 16)).expect("cleanup");

        assert_eq!(removed, 1);
        assert!(temp.path().join("2026-10-16.log").exists());
    }

    #[test]
    fn component_log_names_parse_back_to_their_date() {
        let name = log_file_name("archives", day(2026, 10, 16));
        assert_eq!(name, "archives-2026-10-16.log");
        assert_eq!(log_file_date(Path::new(&name)), Some(day(2026, 10, 16)));
        assert_eq!(log_file_date(Path::new("short.log")), None);
        assert_eq!(log_file_date(Path::new("server-2026-10-16.txt")), None);
    }

    #[test]
    fn dated_writer_flushes_on_guard_drop() {
        let temp = tempdir().expect("tempdir");
        let (writer, guard, log_file) =
            dated_log_writer(temp.path(), "server", day(2026, 10, 16));
        assert!(log_file.ends_with("server-2026-10-16.log"));

        let mut handle = writer.make_writer();
        handle.write_all(b"catalog-log-line\n").expect("write log");
        handle.flush().expect("flush");
        drop(handle);
        drop(guard);

        let content = std::fs::read_to_string(log_file).expect("read log file");
        assert!(content.contains("catalog-log-line"));
    }
}
