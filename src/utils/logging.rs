use chrono::Local;
use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

use crate::config::config::LoggingConfig;

/// Maximum number of log entries to keep in memory
const MAX_LOG_ENTRIES: usize = 1000;

/// A log entry with timestamp and message
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: String,
    pub target: String,
    pub message: String,
}

impl LogEntry {
    pub fn new(level: Level, target: &str, message: String) -> Self {
        Self {
            timestamp: Local::now().format("%H:%M:%S.%3f").to_string(),
            level: level.to_string().to_uppercase(),
            target: target.to_string(),
            message,
        }
    }

    /// Format for the status line and the log file
    pub fn format_for_display(&self) -> String {
        format!(
            "[{}] {} [{}] {}",
            self.timestamp, self.level, self.target, self.message
        )
    }
}

/// Thread-safe ring buffer for log entries
#[derive(Clone, Default)]
pub struct LogRingBuffer {
    entries: Arc<Mutex<VecDeque<LogEntry>>>,
}

impl LogRingBuffer {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(MAX_LOG_ENTRIES))),
        }
    }

    fn entries(&self) -> MutexGuard<'_, VecDeque<LogEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push(&self, entry: LogEntry) {
        let mut entries = self.entries();
        if entries.len() >= MAX_LOG_ENTRIES {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    pub fn get_recent(&self, count: usize) -> Vec<LogEntry> {
        let entries = self.entries();
        entries.iter().rev().take(count).rev().cloned().collect()
    }

    pub fn latest(&self) -> Option<LogEntry> {
        self.entries().back().cloned()
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

/// Split a compact-format line, "LEVEL target: message", into its parts.
fn parse_compact(line: &str) -> (Level, &str, &str) {
    let levels = [
        ("TRACE ", Level::TRACE),
        ("DEBUG ", Level::DEBUG),
        ("INFO ", Level::INFO),
        ("WARN ", Level::WARN),
        ("ERROR ", Level::ERROR),
    ];
    let Some((level, rest)) = levels.iter().find_map(|(prefix, level)| {
        line.strip_prefix(prefix).map(|rest| (*level, rest.trim_start()))
    }) else {
        return (Level::INFO, "general", line);
    };

    match rest.split_once(':') {
        Some((target, message)) if !target.contains(' ') => (level, target, message.trim()),
        _ => (level, "general", rest),
    }
}

/// Writer that feeds both the ring buffer and, when enabled, the log file
#[derive(Clone)]
pub struct DualWriter {
    buffer: LogRingBuffer,
    file: Option<Arc<Mutex<File>>>,
}

impl DualWriter {
    pub fn new(buffer: LogRingBuffer, file: Option<File>) -> Self {
        Self {
            buffer,
            file: file.map(|f| Arc::new(Mutex::new(f))),
        }
    }
}

impl Write for DualWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if let Ok(message) = std::str::from_utf8(buf) {
            let message = message.trim();
            if !message.is_empty() {
                let (level, target, msg) = parse_compact(message);
                let entry = LogEntry::new(level, target, msg.to_string());

                if let Some(file) = &self.file {
                    let mut file = file.lock().unwrap_or_else(PoisonError::into_inner);
                    writeln!(file, "{}", entry.format_for_display())?;
                }
                self.buffer.push(entry);
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        if let Some(file) = &self.file {
            file.lock().unwrap_or_else(PoisonError::into_inner).flush()?;
        }
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for DualWriter {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Shared by every `init_tracing` call; only the first one installs it.
static LOG_BUFFER: OnceLock<LogRingBuffer> = OnceLock::new();

/// Directory for session log files
pub fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("tablr")
        .join("logs")
}

/// Create a timestamped log file in `dir` and point `latest.log` at it
pub fn open_log_file(dir: &Path) -> std::io::Result<(File, PathBuf)> {
    std::fs::create_dir_all(dir)?;
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("tablr_{}.log", timestamp));
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    #[cfg(unix)]
    {
        let latest = dir.join("latest.log");
        let _ = std::fs::remove_file(&latest);
        let _ = std::os::unix::fs::symlink(&path, &latest);
    }

    Ok((file, path))
}

/// Install the global subscriber. Returns the ring buffer the status line
/// reads from and the log file path, if one was opened.
pub fn init_tracing(config: &LoggingConfig) -> (LogRingBuffer, Option<PathBuf>) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let buffer = LOG_BUFFER.get_or_init(LogRingBuffer::new).clone();

    let (file, path) = if config.to_file {
        match open_log_file(&log_dir()) {
            Ok((file, path)) => (Some(file), Some(path)),
            Err(e) => {
                eprintln!("tablr: could not open log file: {}", e);
                (None, None)
            }
        }
    } else {
        (None, None)
    };

    let fmt_layer = fmt::layer()
        .with_writer(DualWriter::new(buffer.clone(), file))
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .without_time() // LogEntry adds its own timestamp
        .compact();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(target: "tablr", "logging initialised (level '{}')", config.level);
    }
    (buffer, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compact_line() {
        assert_eq!(
            parse_compact("DEBUG history: undo: add table 'Table0'"),
            (Level::DEBUG, "history", "undo: add table 'Table0'")
        );
        assert_eq!(
            parse_compact("WARN some words: here"),
            (Level::WARN, "general", "some words: here")
        );
        assert_eq!(parse_compact("plain"), (Level::INFO, "general", "plain"));
    }

    #[test]
    fn test_ring_buffer_is_bounded() {
        let buffer = LogRingBuffer::new();
        for i in 0..MAX_LOG_ENTRIES + 5 {
            buffer.push(LogEntry::new(Level::INFO, "test", i.to_string()));
        }
        assert_eq!(buffer.len(), MAX_LOG_ENTRIES);
        assert_eq!(buffer.get_recent(1)[0].message, (MAX_LOG_ENTRIES + 4).to_string());
        assert_eq!(buffer.get_recent(2)[0].message, (MAX_LOG_ENTRIES + 3).to_string());
    }

    #[test]
    fn test_dual_writer_fills_buffer_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let (file, path) = open_log_file(dir.path()).unwrap();
        let buffer = LogRingBuffer::new();
        let mut writer = DualWriter::new(buffer.clone(), Some(file));

        writer.write_all(b"INFO views: opened tables view v0\n").unwrap();
        writer.flush().unwrap();

        let latest = buffer.latest().unwrap();
        assert_eq!(latest.target, "views");
        assert_eq!(latest.message, "opened tables view v0");
        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.contains("INFO [views] opened tables view v0"));
    }
}
