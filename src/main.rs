mod cache;
mod config;
mod error;
mod executor;
mod format;
mod host;
mod model;
mod package_manager;
mod plugin;
mod sources;
#[cfg(test)]
mod testing;

use std::fs::OpenOptions;
use std::io::{self, Read, Write};
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Env, Target};
use log::{debug, error};
use crate::config::{Config, load_config};
use crate::executor::ShellRunner;
use crate::host::{JsonRpcHost, Request, write_results};
use crate::plugin::Plugin;

#[derive(Parser, Debug)]
#[command(author, version, about = "Chocolatey package search and management for Flow Launcher", long_about = None)]
struct Args {
    /// Alternate configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON-RPC request from the launcher; read from stdin when omitted
    request: Option<String>,
}

fn init_logging(config: &Config) {
    let env = Env::default().default_filter_or(config.log.level.as_str());
    let mut builder = env_logger::Builder::from_env(env);
    builder.format(|buf, record| {
        writeln!(buf, "{} - {} - {}", buf.timestamp_seconds(), record.level(), record.args())
    });

    // stdout belongs to the host protocol; fall back to stderr, never stdout.
    let log_path = config.log_path();
    match OpenOptions::new().create(true).append(true).open(&log_path) {
        Ok(file) => {
            builder.target(Target::Pipe(Box::new(file)));
        }
        Err(e) => eprintln!("cannot open log file {}: {}", log_path.display(), e),
    }
    let _ = builder.try_init();
}

fn print_critical() {
    let entries = [format::critical_error()];
    if write_results(io::stdout(), &entries).is_err() {
        eprintln!("failed to write critical error result");
    }
}

fn run(args: &Args, config: &Config) -> Result<()> {
    let raw = match &args.request {
        Some(raw) => raw.clone(),
        None => {
            let mut raw = String::new();
            io::stdin().read_to_string(&mut raw).context("reading request from stdin")?;
            raw
        }
    };
    let request = Request::parse(&raw).with_context(|| format!("parsing request {:?}", raw))?;
    debug!("Request: {} {:?}", request.method, request.parameters);

    let runner = ShellRunner::new(config.general.shell);
    let mut plugin = Plugin::new(config, runner, JsonRpcHost::new(io::stdout()));
    if let Some(entries) = plugin.dispatch(&request) {
        write_results(io::stdout(), &entries).context("writing results")?;
    }
    Ok(())
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if !e.use_stderr() {
                // --help / --version
                let _ = e.print();
                return;
            }
            init_logging(&Config::default());
            error!("Critical error in plugin: {}", e);
            print_critical();
            return;
        }
    };

    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            init_logging(&Config::default());
            error!("Critical error in plugin: {:#}", e);
            print_critical();
            return;
        }
    };
    init_logging(&config);

    match panic::catch_unwind(AssertUnwindSafe(|| run(&args, &config))) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            error!("Critical error in plugin: {:#}", e);
            print_critical();
        }
        Err(_) => {
            error!("Critical error in plugin: panic while handling request");
            print_critical();
        }
    }
}
