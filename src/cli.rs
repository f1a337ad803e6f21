use clap::Parser;
use std::path::PathBuf;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    ", built ",
    env!("BUILD_TIME"),
    ")"
);

#[derive(Parser, Debug, Clone)]
#[command(
    name = "subprobe",
    version,
    long_version = LONG_VERSION,
    about = "Multithreaded subdomain scanner",
    long_about = "subprobe brute-forces subdomains of a target domain by resolving every prefix\nfrom a wordlist and reporting the names that resolve."
)]
pub struct Args {
    /// Target domain
    #[arg(value_name = "DOMAIN")]
    pub domain: String,

    /// Path to wordlist [default: subdomains.txt]
    #[arg(short = 'w', long = "wordlist", value_name = "FILE")]
    pub wordlist: Option<PathBuf>,

    /// Number of concurrent workers [default: 50]
    #[arg(short = 't', long = "threads", value_name = "N")]
    pub threads: Option<usize>,

    /// Append found subdomains to this file
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// Nameservers to query instead of the system resolver (comma-separated ip:port)
    #[arg(short = 'r', long = "resolvers", value_delimiter = ',', value_name = "ADDR")]
    pub resolvers: Option<Vec<String>>,

    /// Per-lookup timeout in seconds [default: 2]
    #[arg(long = "timeout", value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Silent mode (only output found subdomains)
    #[arg(long = "silent")]
    pub silent: bool,

    /// Verbose mode
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,
}
