// src/types.rs
use serde::Deserialize;
use std::fmt;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_THREADS: usize = 50;
pub const DEFAULT_WORDLIST: &str = "subdomains.txt";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct Config {
    pub threads: usize,
    pub wordlist: PathBuf,
    pub output: OutputConfig,
    pub resolver: ResolverConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threads: DEFAULT_THREADS,
            wordlist: PathBuf::from(DEFAULT_WORDLIST),
            output: OutputConfig::default(),
            resolver: ResolverConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    pub file: Option<PathBuf>,
    pub silent: bool,
    pub color: bool,
}

#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub timeout: Duration,
    pub nameservers: Vec<String>,
    pub use_system_resolver: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            nameservers: Vec::new(),
            use_system_resolver: true,
        }
    }
}

/// On-disk shape of the TOML configuration file. Every field is optional so a
/// file only needs to mention what it overrides.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub threads: Option<usize>,
    pub wordlist: Option<PathBuf>,
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub resolver: FileResolverConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileResolverConfig {
    pub timeout_secs: Option<u64>,
    pub nameservers: Option<Vec<String>>,
    pub use_system_resolver: Option<bool>,
}

/// Why a lookup did not produce any address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureReason {
    Timeout,
    NxDomain,
    Other,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureReason::Timeout => "timeout",
            FailureReason::NxDomain => "nxdomain",
            FailureReason::Other => "other",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// Addresses in the order the resolver returned them. Never empty.
    Success { addresses: Vec<IpAddr> },
    Failure { reason: FailureReason },
}

impl ResolutionOutcome {
    pub fn failure(reason: FailureReason) -> Self {
        ResolutionOutcome::Failure { reason }
    }
}

/// A name that resolved, handed to the result sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub fqdn: String,
    pub addresses: Vec<IpAddr>,
}

impl Hit {
    /// One `"<fqdn> ==> <address>"` line per address.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.addresses
            .iter()
            .map(move |addr| format!("{} ==> {}", self.fqdn, addr))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ScanSummary {
    pub found: usize,
    pub tried: usize,
    pub elapsed: Duration,
    pub interrupted: bool,
}

impl ScanSummary {
    /// Requests per second. Elapsed time is floored at one second so that
    /// empty or near-instant runs do not divide by zero.
    pub fn throughput(&self) -> f64 {
        self.tried as f64 / self.elapsed.as_secs_f64().max(1.0)
    }
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Invalid domain: {0}")]
    InvalidDomain(String),

    #[error("Failed to read wordlist {}: {source}", .path.display())]
    Wordlist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Resolver error: {0}")]
    ResolverError(String),

    #[error("Output error: {0}")]
    OutputError(String),
}
