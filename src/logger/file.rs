/// Best-effort log file sink under the logs directory
use crate::paths;
use chrono::Local;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};

static LOG_FILE: OnceCell<Mutex<BufWriter<File>>> = OnceCell::new();

pub fn init_file_logging() {
    if !super::get_logger_config().file_logging {
        return;
    }

    let dir = paths::get_logs_directory();
    if std::fs::create_dir_all(&dir).is_err() {
        return;
    }

    let path = dir.join(format!("swaprelay_{}.log", Local::now().format("%Y-%m-%d")));
    if let Ok(file) = OpenOptions::new().create(true).append(true).open(path) {
        let _ = LOG_FILE.set(Mutex::new(BufWriter::new(file)));
    }
}

pub fn write_to_file(line: &str) {
    if let Some(writer) = LOG_FILE.get() {
        let _ = writeln!(writer.lock(), "{}", line);
    }
}

pub fn flush_file_logging() {
    if let Some(writer) = LOG_FILE.get() {
        let _ = writer.lock().flush();
    }
}
