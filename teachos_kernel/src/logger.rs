//! Console logger for ports that have a serial or video console.
//!
//! The core itself only ever talks to the `log` facade; a port installs this
//! logger during early boot and hands it the console sink. Without a sink
//! (or without `init` having run, as in unit tests) log records vanish.

use core::fmt::{self, Write};

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use spin::Mutex;

/// Where formatted log records go. Implemented by the port's console driver.
pub trait ConsoleSink: Send + Sync {
    fn write_str(&self, s: &str);
}

struct SinkWriter<'a>(&'a dyn ConsoleSink);

impl<'a> fmt::Write for SinkWriter<'a> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.write_str(s);
        Ok(())
    }
}

pub struct KernelLog {
    sink: Mutex<Option<&'static dyn ConsoleSink>>,
}

static LOGGER: KernelLog = KernelLog {
    sink: Mutex::new(None),
};

impl Log for KernelLog {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        // The sink lock keeps concurrent CPUs from interleaving records.
        let sink = self.sink.lock();
        if let Some(sink) = *sink {
            let mut writer = SinkWriter(sink);
            let _ = writeln!(writer, "[{:<5}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

/// Install the console logger. Called once by the port during early boot,
/// before any secondary CPU is woken.
pub fn init(sink: &'static dyn ConsoleSink, level: LevelFilter) -> Result<(), SetLoggerError> {
    *LOGGER.sink.lock() = Some(sink);
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}
