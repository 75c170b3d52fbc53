use anyhow::{Context, Result};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use tracing::warn;
use tycoon_core::DisplaySink;
use tycoon_transport::HostBridge;

/// Renders the three display regions as prefixed lines.
pub(crate) struct ConsoleDisplay {
    out: Mutex<Box<dyn Write + Send>>,
    write_failed: AtomicBool,
}

impl ConsoleDisplay {
    pub(crate) fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    pub(crate) fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
            write_failed: AtomicBool::new(false),
        }
    }

    fn write(&self, region: &str, text: &str) {
        if let Err(err) = self.try_write(region, text) {
            if !self.write_failed.swap(true, Ordering::Relaxed) {
                warn!(region, "console display write failed: {err:#}");
            }
        }
    }

    fn try_write(&self, region: &str, text: &str) -> Result<()> {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        for line in text.lines() {
            writeln!(out, "[{region}] {line}").context("write display region")?;
        }
        out.flush().context("flush display region")
    }
}

impl DisplaySink for ConsoleDisplay {
    fn show_output(&self, text: &str) {
        self.write("output", text);
    }

    fn show_balance(&self, text: &str) {
        self.write("balance", text);
    }

    fn show_tokens(&self, text: &str) {
        self.write("tokens", text);
    }
}

/// Host channel for terminal sessions: each payload becomes one stdout line.
pub(crate) struct StdoutBridge;

impl HostBridge for StdoutBridge {
    fn send_data(&self, payload: &str) -> Result<()> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "sendData {payload}").context("write bridge payload")?;
        out.flush().context("flush bridge payload")
    }
}
