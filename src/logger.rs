use std::io::{stderr, Write};
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

static LOG_FILE: OnceLock<Mutex<std::fs::File>> = OnceLock::new();

#[macro_export]
macro_rules! app_log {
    ($($arg:tt)*) => {{
        $crate::logger::log_line(format!($($arg)*));
    }};
}

#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn resolve_log_path() -> Option<PathBuf> {
    let home = std::env::var_os("HOME")?;
    let mut path = PathBuf::from(home);
    path.push("Library");
    path.push("Logs");
    path.push("AxProbe");
    Some(path)
}

pub fn init_file_logger() {
    #[cfg(target_os = "macos")]
    {
        use std::fs::{create_dir_all, OpenOptions};

        let Some(log_dir) = resolve_log_path() else {
            return;
        };

        if create_dir_all(&log_dir).is_err() {
            return;
        }

        let log_path = log_dir.join("run.log");
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path);

        if let Ok(file) = file {
            let _ = LOG_FILE.set(Mutex::new(file));
            log_line("[logger] file logger ready: ~/Library/Logs/AxProbe/run.log".to_string());
        }
    }
}

pub fn log_line(message: String) {
    let _ = writeln!(stderr(), "{message}");
    write_file_line(&message);
}

/// Append a line to the log file only, skipping stderr.
pub fn log_file_only(message: String) {
    write_file_line(&message);
}

fn write_file_line(message: &str) {
    if let Some(lock) = LOG_FILE.get() {
        if let Ok(mut file) = lock.lock() {
            let stamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
            let _ = writeln!(file, "{stamp} {message}");
        }
    }
}
