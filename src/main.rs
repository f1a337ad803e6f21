use anyhow::Result;
use chrono::Local;
use clap::Parser;
use colored::Colorize;
use log::{error, info};
use std::process;
use std::sync::Arc;
use subprobe::config;
use subprobe::output;
use subprobe::signal;
use subprobe::utils;
use subprobe::{Args, Config, Resolver, WorkQueue, WorkerPool};
use tokio_util::sync::CancellationToken;

const BANNER: &str = r#"
           __                        __
  ___ __ _/ /  ___  _______  ___ ___/ /  ___
 (_-</ // / _ \/ _ \/ __/ _ \/ _ \/ _ \/ -_)
/___/\_,_/_.__/ .__/_/  \___/_.__/_.__/\__/
             /_/
        Multithreaded Subdomain Scanner
"#;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let args = Args::parse();
    init_logging(&args);

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => fail(&e.to_string()),
    };

    if !config.output.color || !atty::is(atty::Stream::Stdout) {
        colored::control::set_override(false);
    }

    if let Err(e) = utils::validate_domain(&args.domain) {
        error!("{}", e);
        fail("Invalid domain");
    }

    let queue = match WorkQueue::from_wordlist(&config.wordlist) {
        Ok(queue) => queue,
        Err(e) => {
            error!("{}", e);
            fail("Wordlist file not found");
        }
    };

    let resolver = match Resolver::new(&config.resolver) {
        Ok(resolver) => Arc::new(resolver),
        Err(e) => fail(&e.to_string()),
    };
    let sink = output::build_sink(&config.output);
    let pool = WorkerPool::new(&args.domain, config.threads, resolver, sink)?;

    let cancel = CancellationToken::new();
    let interrupt = signal::install_interrupt_handler(cancel.clone(), config.output.silent)?;

    if !config.output.silent {
        println!("{}", BANNER.bright_cyan());
        println!("{}", format!("{} v{}", subprobe::NAME, subprobe::VERSION).bright_blue());
        println!(
            "[*] Target: {}  Candidates: {}  Workers: {}  Started: {}",
            pool.domain().bright_green(),
            queue.len(),
            pool.threads(),
            Local::now().format("%Y-%m-%d %H:%M:%S")
        );
    }

    let summary = pool.scan(queue, cancel).await;
    interrupt.abort();

    info!(
        "Scan of {} {}: {} found out of {} tried in {:.2}s",
        pool.domain(),
        if summary.interrupted { "interrupted" } else { "completed" },
        summary.found,
        summary.tried,
        summary.elapsed.as_secs_f64()
    );

    if !config.output.silent {
        output::print_summary(&summary);
    }

    Ok(())
}

fn init_logging(args: &Args) {
    let level = if args.verbose {
        log::LevelFilter::Debug
    } else if args.silent {
        log::LevelFilter::Warn
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn build_config(args: &Args) -> subprobe::error::Result<Config> {
    let mut config = config::load_config(args.config_path.as_deref())?;
    config::apply_args(&mut config, args);
    config::validate_config(&config)?;
    Ok(config)
}

fn fail(message: &str) -> ! {
    println!("[-] {}", message);
    process::exit(1);
}
