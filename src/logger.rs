use std::fs::{File, OpenOptions, create_dir_all};
use std::io::Write;
use std::sync::{Mutex, OnceLock};

use crate::env;
use crate::ui::style;
use log::{Level, LevelFilter, Metadata, Record};

#[derive(Debug)]
struct Logger {
    term_level: Mutex<LevelFilter>,
    file_level: LevelFilter,
    log_file: Option<Mutex<File>>,
}

static LOGGER: OnceLock<Logger> = OnceLock::new();

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level()
    }

    fn log(&self, record: &Record) {
        if record.level() <= self.file_level
            && let Some(log_file) = &self.log_file
        {
            let mut log_file = log_file.lock().unwrap();
            let out = self.render(record, self.file_level);
            let _ = writeln!(log_file, "{}", console::strip_ansi_codes(&out));
        }
        let term_level = self.term_level();
        if record.level() <= term_level {
            let out = self.render(record, term_level);
            clx::progress::with_terminal_lock(|| eprintln!("{out}"));
        }
    }

    fn flush(&self) {}
}

impl Logger {
    fn new(term_level: LevelFilter) -> Self {
        let file_level = if env::TSTW_LOG_FILE.is_some() {
            *env::TSTW_LOG_FILE_LEVEL
        } else {
            LevelFilter::Off
        };
        let log_file = env::TSTW_LOG_FILE
            .as_ref()
            .filter(|_| file_level > LevelFilter::Off)
            .and_then(|path| init_log_file(path).ok())
            .map(Mutex::new);
        Self {
            term_level: Mutex::new(term_level),
            file_level,
            log_file,
        }
    }

    fn term_level(&self) -> LevelFilter {
        *self.term_level.lock().unwrap()
    }

    fn max_level(&self) -> LevelFilter {
        self.term_level().max(self.file_level)
    }

    fn render(&self, record: &Record, level: LevelFilter) -> String {
        let args = record.args();
        match level {
            LevelFilter::Off => "".to_string(),
            LevelFilter::Trace => {
                let meta = format!(
                    "{} {} {}",
                    chrono::Local::now().format("%H:%M:%S%.3f"),
                    record.module_path().unwrap_or_default(),
                    record
                        .line()
                        .map(|l| l.to_string())
                        .unwrap_or_default(),
                );
                format!(
                    "{} {} {args}",
                    self.styled_level(record.level()),
                    style::edim(meta)
                )
            }
            LevelFilter::Debug => format!("{} {args}", self.styled_level(record.level())),
            _ => {
                let tstw = style::edim("tstw");
                match record.level() {
                    Level::Info => format!("{tstw} {args}"),
                    _ => format!("{tstw} {} {args}", self.styled_level(record.level())),
                }
            }
        }
    }

    fn styled_level(&self, level: Level) -> String {
        let level = match level {
            Level::Error => style::ered("ERROR"),
            Level::Warn => style::eyellow("WARN"),
            Level::Info => style::ecyan("INFO"),
            Level::Debug => style::eblue("DEBUG"),
            Level::Trace => style::edim("TRACE"),
        };
        level.to_string()
    }
}

/// Installs the logger. `level` overrides `TSTW_LOG` when provided.
pub fn init(level: Option<LevelFilter>) {
    let term_level = level.unwrap_or(*env::TSTW_LOG);
    let logger = LOGGER.get_or_init(|| Logger::new(term_level));
    if let Err(err) = log::set_logger(logger) {
        eprintln!("tstw: failed to initialize logger: {err}");
        return;
    }
    log::set_max_level(logger.max_level());
}

/// Raises the terminal level after the config file has been read.
/// Never lowers a level chosen on the command line.
pub fn raise_level(level: LevelFilter) {
    if let Some(logger) = LOGGER.get() {
        let mut term_level = logger.term_level.lock().unwrap();
        if level > *term_level {
            *term_level = level;
        }
        drop(term_level);
        log::set_max_level(logger.max_level());
    }
}

fn init_log_file(path: &std::path::Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
