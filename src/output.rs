// src/output.rs
use crate::types::{Hit, OutputConfig, ScanError, ScanSummary};
use colored::Colorize;
use log::{debug, warn};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::runtime::{Handle, RuntimeFlavor};

/// Receives every name that resolved. Called concurrently from all workers.
pub trait ResultSink: Send + Sync {
    fn record(&self, hit: &Hit);
}

/// Prints a green `[+]` line per resolved address, or the bare line when silent.
#[derive(Debug, Default)]
pub struct ConsoleSink {
    silent: bool,
}

impl ConsoleSink {
    pub fn new(silent: bool) -> Self {
        Self { silent }
    }
}

impl ResultSink for ConsoleSink {
    fn record(&self, hit: &Hit) {
        // One println! per line; stdout's own lock keeps lines whole.
        for line in hit.lines() {
            if self.silent {
                println!("{}", line);
            } else {
                println!("{}", format!("[+] {}", line).green());
            }
        }
    }
}

/// Appends `<fqdn> ==> <address>` lines to a file, reopening it for every hit.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSink {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn append(&self, hit: &Hit) -> Result<(), ScanError> {
        let _guard = self.lock.lock().expect("output file lock poisoned");

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| ScanError::OutputError(format!("Failed to open {}: {}", self.path.display(), e)))?;

        for line in hit.lines() {
            file.write_all(format!("{}\n", line).as_bytes())
                .map_err(|e| ScanError::OutputError(format!("Failed to write {}: {}", self.path.display(), e)))?;
        }
        Ok(())
    }
}

impl ResultSink for FileSink {
    fn record(&self, hit: &Hit) {
        // Blocking file I/O: hand the worker thread's other tasks elsewhere when we can.
        let result = match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| self.append(hit))
            }
            _ => self.append(hit),
        };

        if let Err(e) = result {
            warn!("{}", e);
        }
    }
}

/// Forwards each hit to every inner sink in order.
pub struct TeeSink {
    sinks: Vec<Arc<dyn ResultSink>>,
}

impl TeeSink {
    pub fn new(sinks: Vec<Arc<dyn ResultSink>>) -> Self {
        Self { sinks }
    }
}

impl ResultSink for TeeSink {
    fn record(&self, hit: &Hit) {
        for sink in &self.sinks {
            sink.record(hit);
        }
    }
}

/// Console sink, plus the append-only file sink when an output path is set.
pub fn build_sink(config: &OutputConfig) -> Arc<dyn ResultSink> {
    let console: Arc<dyn ResultSink> = Arc::new(ConsoleSink::new(config.silent));

    match &config.file {
        Some(path) => {
            debug!("Appending results to {}", path.display());
            let file: Arc<dyn ResultSink> = Arc::new(FileSink::new(path.clone()));
            Arc::new(TeeSink::new(vec![console, file]))
        }
        None => console,
    }
}

pub fn print_interrupt_notice() {
    println!("\n{}", "[!] Stopping...".red());
}

pub fn print_summary(summary: &ScanSummary) {
    println!("\n{}", "[*] Scan Summary:".bold());
    println!("{}", format!("[*] Found: {}", summary.found).green());
    println!("{}", format!("[*] Tried: {}", summary.tried).yellow());
    println!("{}", format!("[*] Time: {:.2}s", summary.elapsed.as_secs_f64()).blue());
    println!("{}", format!("[*] Speed: {:.1} req/s", summary.throughput()).magenta());
}
