mod app;
mod config;
mod constants;
mod deferred;
mod input;
mod remote;
mod ui;

use anyhow::Result;
use std::env;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;
use crate::config::{Config, TOKEN_ENV};
use crate::constants::MAX_GRACE_PERIOD_SECS;
use crate::remote::HttpRemote;

fn setup_logging() {
    use std::fs::OpenOptions;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("debug,mailsweep=debug"));

    // Try to create a log file in the config directory
    let log_file = Config::config_dir()
        .ok()
        .map(|dir| dir.join("mailsweep.log"))
        .and_then(|path| {
            OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&path)
                .ok()
        });

    if let Some(file) = log_file {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::sync::Mutex::new(file))
                    .with_ansi(false),
            )
            .init();
    } else {
        // Fallback to stderr if file logging fails
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn print_usage() {
    eprintln!(
        r#"mailsweep - Terminal email triage with undoable bulk delete

Usage: mailsweep [command]

Commands:
    (none)      Start the inbox
    setup       Write the configuration file
    help        Show this help message

Configuration file: ~/.config/mailsweep/config.toml
Environment:
    MAILSWEEP_TOKEN     Bearer token for the service
    MAILSWEEP_API_URL   Overrides server.api_url
"#
    );
}

fn prompt(label: &str) -> Result<String> {
    use std::io::{self, Write};

    print!("{}", label);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn run_setup() -> Result<()> {
    println!("mailsweep setup");
    println!("===============\n");

    let config_path = Config::config_path()?;
    let mut config = if config_path.exists() {
        let answer = prompt("Configuration already exists. Overwrite? [y/N]: ")?;
        if !answer.eq_ignore_ascii_case("y") {
            println!("Setup cancelled.");
            return Ok(());
        }
        Config::load()?
    } else {
        Config::default()
    };

    let api_url = prompt(&format!("Service URL [{}]: ", config.server.api_url))?;
    if !api_url.is_empty() {
        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            anyhow::bail!("Service URL must start with http:// or https://");
        }
        config.server.api_url = api_url;
    }

    let token = prompt(&format!(
        "Bearer token (leave empty to use {}): ",
        TOKEN_ENV
    ))?;
    if !token.is_empty() {
        config.server.token = Some(token);
    }

    let grace = prompt(&format!(
        "Undo window in seconds [{}]: ",
        config.actions.grace_period_secs
    ))?;
    if !grace.is_empty() {
        config.actions.grace_period_secs = grace
            .parse()
            .map_err(|_| anyhow::anyhow!("Undo window must be a whole number of seconds"))?;
        if config.actions.grace_period_secs > MAX_GRACE_PERIOD_SECS {
            anyhow::bail!("Undo window must be at most {} seconds", MAX_GRACE_PERIOD_SECS);
        }
    }

    config.save()?;
    println!("\nConfiguration saved to {}", config_path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        Some("help") | Some("--help") | Some("-h") => {
            print_usage();
            Ok(())
        }
        Some("setup") => run_setup(),
        Some(cmd) => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            std::process::exit(1);
        }
        None => {
            let config = Config::load()?;
            config.ensure_dirs()?;
            setup_logging();

            let Some(token) = config.token() else {
                eprintln!("No service token configured.");
                eprintln!("\nRun 'mailsweep setup' or set the {} variable:", TOKEN_ENV);
                eprintln!("  export {}='your-token'", TOKEN_ENV);
                std::process::exit(1);
            };

            tracing::info!("Starting mailsweep against {}", config.server.api_url);
            let remote = Arc::new(HttpRemote::new(config.server.api_url.clone(), token));
            let mut app = App::new(config, remote);
            app.run().await
        }
    }
}
