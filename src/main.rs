//! # Community Assistant
//!
//! Command-line companion for a community social platform. It answers member
//! questions with an AI assistant grounded in live community data, and
//! exposes the feed, direct messages, and webhook notifications.
//!
//! ## Features
//! - Single question mode with `-p` or `--prompt`
//! - Interactive session (default) that keeps its model fallback state
//! - Community snapshot tooling: context preview, feed, inbox, send
//! - Webhook delivery and configuration management

mod cli;
mod core;
mod run;

use clap::{CommandFactory, Parser};
use dotenv::dotenv;

use cli::{Args, Commands, ConfigSubcommand};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv().ok();

    let args = Args::parse();
    run::init_logger(&args);

    // Commands that need no configuration
    match &args.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = Args::command();
            let name = cmd.get_name().to_string();
            cli::generate(*shell, &mut cmd, name, &mut std::io::stdout());
            return Ok(());
        }
        Some(Commands::Config {
            subcommand: Some(ConfigSubcommand::SetApiKey { key }),
        }) => {
            core::cli::run_config_set_api_key(key.clone());
            return Ok(());
        }
        _ => {}
    }

    // Print user-friendly message; exit uses Display not Debug
    let config = core::config::load().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let result = match &args.command {
        Some(Commands::Init { force }) => {
            core::cli::run_init(&config, *force);
            Ok(())
        }
        Some(Commands::Context) => {
            core::cli::run_context(&config);
            Ok(())
        }
        Some(Commands::Models { query }) => {
            core::cli::run_models(&config, query.as_deref()).await;
            Ok(())
        }
        Some(Commands::Feed {
            page,
            page_size,
            tag,
        }) => {
            core::cli::run_feed(&config, *page, *page_size, tag.as_deref());
            Ok(())
        }
        Some(Commands::Inbox { user, with }) => {
            core::cli::run_inbox(&config, user, with.as_deref());
            Ok(())
        }
        Some(Commands::Send { from, to, content }) => {
            core::cli::run_send(&config, from, to, content).await;
            Ok(())
        }
        Some(Commands::Webhook { event, data }) => {
            core::cli::run_webhook(&config, *event, data.as_deref()).await;
            Ok(())
        }
        Some(Commands::Config { .. }) => {
            core::cli::run_config(&config);
            Ok(())
        }
        Some(Commands::Completions { .. }) => Ok(()),
        None => match args.prompt.as_deref() {
            Some(prompt) => run::run_single_prompt(&args, &config, prompt).await,
            None => run::run_interactive(&args, &config).await,
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}
