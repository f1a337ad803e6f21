use crate::cli::Args;
use crate::error::{ErrorContext, Result};
use crate::types::{Config, FileConfig, ScanError};
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const ENV_NAMESERVERS: &str = "SUBPROBE_NAMESERVERS";
pub const ENV_THREADS: &str = "SUBPROBE_THREADS";

/// Defaults, overlaid with the optional TOML file and then the environment.
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let mut config = Config::default();

    if let Some(path) = config_path {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let file_config = parse_config(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        apply_file_config(&mut config, file_config);
    }

    apply_env_overrides(&mut config, |key| env::var(key).ok())?;
    Ok(config)
}

pub fn parse_config(contents: &str) -> std::result::Result<FileConfig, toml::de::Error> {
    toml::from_str(contents)
}

fn apply_file_config(config: &mut Config, file: FileConfig) {
    if let Some(threads) = file.threads {
        config.threads = threads;
    }
    if let Some(wordlist) = file.wordlist {
        config.wordlist = wordlist;
    }
    if let Some(output) = file.output {
        config.output.file = Some(output);
    }
    if let Some(secs) = file.resolver.timeout_secs {
        config.resolver.timeout = Duration::from_secs(secs);
    }
    if let Some(nameservers) = file.resolver.nameservers {
        config.resolver.nameservers = nameservers;
    }
    if let Some(use_system) = file.resolver.use_system_resolver {
        config.resolver.use_system_resolver = use_system;
    }
}

fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(servers) = lookup(ENV_NAMESERVERS) {
        config.resolver.nameservers = split_list(&servers);
    }
    if let Some(threads) = lookup(ENV_THREADS) {
        config.threads = threads
            .trim()
            .parse::<usize>()
            .with_context(|| format!("Invalid {}", ENV_THREADS))?;
    }
    Ok(())
}

/// Command line flags win over everything else.
pub fn apply_args(config: &mut Config, args: &Args) {
    if let Some(threads) = args.threads {
        config.threads = threads;
    }
    if let Some(wordlist) = &args.wordlist {
        config.wordlist = wordlist.clone();
    }
    if let Some(output) = &args.output {
        config.output.file = Some(output.clone());
    }
    if let Some(resolvers) = &args.resolvers {
        config.resolver.nameservers = resolvers.iter().map(|s| s.trim().to_string()).collect();
    }
    if let Some(secs) = args.timeout {
        config.resolver.timeout = Duration::from_secs(secs);
    }
    config.output.silent = args.silent;
    config.output.color = !args.no_color;
}

pub fn validate_config(config: &Config) -> Result<()> {
    if config.threads == 0 {
        return Err(ScanError::ConfigError("Thread count must be at least 1".to_string()));
    }
    if config.resolver.timeout.is_zero() {
        return Err(ScanError::ConfigError("Timeout must be greater than 0".to_string()));
    }
    if !config.resolver.use_system_resolver && config.resolver.nameservers.is_empty() {
        return Err(ScanError::ConfigError(
            "System resolver disabled but no nameservers given".to_string(),
        ));
    }
    Ok(())
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
