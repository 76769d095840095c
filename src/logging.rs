use chrono::Local;
use lazy_static::lazy_static;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

lazy_static! {
    static ref LOG_FILE: Mutex<Option<File>> = Mutex::new(None);
}

/// Open `path` in append mode as the run log
pub fn init_logger(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;

    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    writeln!(file, "\n=== wikidex run started at {} ===\n", timestamp)?;

    if let Ok(mut log_file) = LOG_FILE.lock() {
        *log_file = Some(file);
    }
    Ok(())
}

/// Default log location when `--log-file` is given without a path
pub fn default_log_path() -> PathBuf {
    if let Some(data_dir) = dirs::data_dir() {
        data_dir.join("wikidex").join("wikidex.log")
    } else {
        PathBuf::from("wikidex.log")
    }
}

/// Log a message to file. No-op until [`init_logger`] succeeds.
pub fn log(level: &str, message: &str) {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    let formatted = format!("[{}] {}: {}", timestamp, level, message);

    if let Ok(mut log_file) = LOG_FILE.lock() {
        if let Some(ref mut f) = *log_file {
            let _ = writeln!(f, "{}", formatted);
            let _ = f.flush();
        }
    }
}

/// Macros for easier logging
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::logging::log("INFO", &format!($($arg)*));
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::logging::log("DEBUG", &format!($($arg)*));
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::logging::log("WARN", &format!($($arg)*));
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::logging::log("ERROR", &format!($($arg)*));
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_log_file_receives_messages() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("logs").join("wikidex.log");
        init_logger(&path).unwrap();
        log_info!("parsed {} documents", 3);

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("wikidex run started"));
        assert!(content.contains("INFO: parsed 3 documents"));
    }
}
