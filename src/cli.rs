//! CLI definitions: argument parsing, subcommands, and help text.

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;

use crate::core::community::feed::DEFAULT_PAGE_SIZE;
use crate::core::webhooks::WebhookEvent;

pub use clap_complete::generate;

const AFTER_HELP: &str = "\
EXAMPLES:
  community-assistant                          Interactive chat with the community assistant
  community-assistant -p \"who posts most?\"     Single question, answer to stdout
  community-assistant -p -                     Read the question from stdin
  community-assistant init                     Create a sample community snapshot
  community-assistant context                  Show the system prompt built from the snapshot
  community-assistant models --query flash     List chat-capable models
  community-assistant feed --page 2            Browse the post feed
  community-assistant inbox admin              List admin conversations
  community-assistant send u1 admin \"Hi!\"       Send a direct message
  community-assistant webhook login --data '{\"userId\":\"u1\"}'
  community-assistant completions bash         Generate bash completions
";

/// Command-line arguments for the application.
#[derive(Parser)]
#[command(
    author,
    version,
    about = "AI assistant and tooling for a community social platform",
    after_help = AFTER_HELP
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Ask a single question then exit (without the interactive session)
    #[arg(
        short = 'p',
        long,
        help = "Ask one question and print the answer (use '-' to read from stdin)"
    )]
    pub prompt: Option<String>,

    /// Pin a model instead of discovering candidates
    #[arg(short = 'm', long, help = "Model ID (e.g. models/gemini-1.5-flash)")]
    pub model: Option<String>,

    /// Increase log verbosity (use multiple times for debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Reduce log output (errors only)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a sample community snapshot to the data path
    Init {
        /// Overwrite an existing snapshot
        #[arg(long)]
        force: bool,
    },
    /// Show the system prompt the assistant would receive
    Context,
    /// List chat-capable models in candidate order
    Models {
        /// Filter models by id or display name
        #[arg(long)]
        query: Option<String>,
    },
    /// Browse the post feed, newest first
    Feed {
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,
        /// Only posts with this tag
        #[arg(long)]
        tag: Option<String>,
    },
    /// List a member's direct-message conversations
    Inbox {
        /// Member id whose inbox to show
        user: String,
        /// Show the full thread with this member id
        #[arg(long)]
        with: Option<String>,
    },
    /// Send a direct message and notify the message webhooks
    Send {
        /// Sender member id
        from: String,
        /// Receiver member id
        to: String,
        /// Message text
        content: String,
    },
    /// Send a webhook notification for an event
    Webhook {
        /// registration, login, profile_update, message_sent, message_received
        event: WebhookEvent,
        /// JSON object placed under `data`
        #[arg(long)]
        data: Option<String>,
    },
    /// Show config paths and API key status
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Generate shell completion script
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        #[arg(value_parser = clap::value_parser!(Shell))]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Store the Gemini API key in the config directory (reads stdin if omitted)
    SetApiKey { key: Option<String> },
}

impl Args {
    /// Log level based on -v/-q flags: error, warn, info, or debug.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose >= 2 {
            "debug"
        } else if self.verbose >= 1 {
            "info"
        } else {
            "warn"
        }
    }

    /// True when no subcommand or prompt was given: the interactive session.
    pub fn is_interactive(&self) -> bool {
        self.command.is_none() && self.prompt.is_none()
    }
}
