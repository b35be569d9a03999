//! Log setup: everything from the `sdkui*` crates goes to `debug.log` in the
//! data directory (and to the terminal in debug builds).

#[cfg(debug_assertions)]
use simplelog::{ColorChoice, TermLogger, TerminalMode};
use simplelog::{CombinedLogger, Config, ConfigBuilder, LevelFilter, SharedLogger, WriteLogger};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use sdkui_platform::AppPaths;

/// Append-only log sink that reopens `debug.log` when someone deletes it
/// while the tray app is running.
struct ReopeningLog {
    path: PathBuf,
    file: Option<File>,
}

impl ReopeningLog {
    fn open(path: PathBuf) -> io::Result<Self> {
        let file = append_to(&path)?;
        Ok(Self {
            path,
            file: Some(file),
        })
    }

    fn current(&mut self) -> io::Result<&mut File> {
        if self.file.is_none() || !self.path.exists() {
            self.file = Some(append_to(&self.path)?);
        }
        self.file
            .as_mut()
            .ok_or_else(|| io::Error::other("log file not available"))
    }
}

impl Write for ReopeningLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.current()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

fn append_to(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Once the log outgrows `limit` bytes, keep roughly the newest `limit / 2`
/// bytes, starting at a line boundary. Returns whether the file was cut.
fn shrink_log(path: &Path, limit: u64) -> io::Result<bool> {
    let size = std::fs::metadata(path)?.len();
    if size <= limit {
        return Ok(false);
    }

    let contents = std::fs::read(path)?;
    let budget = usize::try_from(limit / 2).unwrap_or(usize::MAX);
    let start = contents.len().saturating_sub(budget);
    let kept = match contents[start..].iter().position(|&b| b == b'\n') {
        Some(newline) if start > 0 => &contents[start + newline + 1..],
        _ => &contents[start..],
    };
    std::fs::write(path, kept)?;
    Ok(true)
}

fn max_level(debug_enabled: bool) -> LevelFilter {
    if debug_enabled {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

fn log_config() -> Config {
    // Prefix filter: matches `sdkui` and every `sdkui_*` crate.
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .add_filter_allow_str("sdkui")
        .build()
}

pub fn init_logging(paths: &AppPaths, debug_enabled: bool, max_log_size: u64) {
    let _ = paths.ensure_dirs();
    let log_path = paths.log_file();

    let shrunk = shrink_log(&log_path, max_log_size).unwrap_or(false);

    let config = log_config();
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    match ReopeningLog::open(log_path.clone()) {
        Ok(sink) => loggers.push(WriteLogger::new(LevelFilter::Debug, config.clone(), sink)),
        Err(e) => eprintln!("sdkui: cannot open {}: {e}", log_path.display()),
    }
    #[cfg(debug_assertions)]
    loggers.push(TermLogger::new(
        LevelFilter::Debug,
        config,
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ));

    if !loggers.is_empty() {
        let _ = CombinedLogger::init(loggers);
    }
    log::set_max_level(max_level(debug_enabled));

    if shrunk {
        log::debug!("Shrunk {} below {max_log_size} bytes", log_path.display());
    }
    log::info!("Logging to {}", log_path.display());
}
