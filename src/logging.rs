//! File logger behind the `log` facade. Stdout belongs to the TUI, so records go to a file.

use anyhow::Result;
use chrono::Local;
use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

struct FileLogger {
    level: LevelFilter,
    file: Mutex<File>,
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Ok(mut f) = self.file.lock() {
            // A failed write has nowhere better to go.
            let _ = writeln!(
                f,
                "{} [{}] {}: {}",
                Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        if let Ok(mut f) = self.file.lock() {
            let _ = f.flush();
        }
    }
}

/// Open `path` for appending and install it as the global logger.
pub fn init(path: &Path, level: LevelFilter) -> Result<()> {
    let file = OpenOptions::new().append(true).create(true).open(path)?;
    log::set_boxed_logger(Box::new(FileLogger {
        level,
        file: Mutex::new(file),
    }))?;
    log::set_max_level(level);
    log::info!("logging to {} at {}", path.display(), level);
    Ok(())
}
