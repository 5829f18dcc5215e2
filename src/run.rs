//! Application run modes: logger init, single question, interactive session.

use std::io::{self, Write};

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::Args;
use crate::core;
use crate::core::community::{CommunitySnapshot, CommunityStore, JsonFileStore, stats};
use crate::core::config::Config;
use crate::core::gemini::GeminiClient;
use crate::core::llm::{self, ChatContext, ChatError, ModelSession};

/// Initialize env_logger. In interactive mode, writes to file to keep the conversation readable.
pub fn init_logger(args: &Args) {
    let log_level = args.log_level();
    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level));

    if args.is_interactive() {
        let log_path = core::paths::cache_dir().map(|d| d.join(format!("{}.log", core::app::NAME)));
        if let Some(path) = log_path
            && std::fs::create_dir_all(path.parent().unwrap_or(&path)).is_ok()
            && let Ok(file) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
        {
            logger.target(env_logger::Target::Pipe(Box::new(file)));
        }
    }
    let _ = logger.try_init();
}

/// Read the community snapshot; a missing or broken one only costs context.
pub fn load_snapshot(config: &Config) -> Option<CommunitySnapshot> {
    match JsonFileStore::new(&config.snapshot_path).load() {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            log::warn!("Continuing without community data: {}", e);
            None
        }
    }
}

/// Context for the assistant, empty when there is no snapshot.
pub fn chat_context(snapshot: Option<&CommunitySnapshot>) -> ChatContext {
    snapshot.map(stats::build_chat_context).unwrap_or_default()
}

/// Provider client using the resolved credential.
pub fn build_client(
    config: &Config,
    snapshot: Option<&CommunitySnapshot>,
) -> Result<GeminiClient, ChatError> {
    let (key, source) = config.resolve_api_key(snapshot)?;
    log::debug!("Using Gemini API key {}", source);
    GeminiClient::new(&config.base_url, &key)
}

fn new_session(args: &Args) -> ModelSession {
    match args.model.as_deref() {
        Some(model) => ModelSession::with_candidates(vec![model.to_string()]),
        None => ModelSession::new(),
    }
}

/// Answer one question and print it to stdout.
pub async fn run_single_prompt(
    args: &Args,
    config: &Config,
    prompt_arg: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let prompt = if prompt_arg == "-" {
        std::io::read_to_string(std::io::stdin())?
    } else {
        prompt_arg.to_string()
    };
    let prompt = prompt.trim();
    if prompt.is_empty() {
        eprintln!("Error: empty prompt");
        std::process::exit(1);
    }

    let snapshot = load_snapshot(config);
    let client = build_client(config, snapshot.as_ref())?;
    let context = chat_context(snapshot.as_ref());
    let mut session = new_session(args);

    let answer = llm::get_chat_response(&mut session, &client, prompt, &context).await?;
    println!("{}", answer);
    Ok(())
}

/// Interactive session: one model session for the whole conversation.
/// The snapshot is re-read for every question so stats stay current.
pub async fn run_interactive(args: &Args, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let client = build_client(config, load_snapshot(config).as_ref())?;
    let mut session = new_session(args);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Community assistant. Type /models to see candidates, /exit to quit.");
    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let question = line.trim();
        match question {
            "" => continue,
            "/exit" | "/quit" => break,
            "/models" => {
                print_session(&session);
                continue;
            }
            _ => {}
        }

        let context = chat_context(load_snapshot(config).as_ref());
        match llm::get_chat_response(&mut session, &client, question, &context).await {
            Ok(answer) => println!("{}\n", answer),
            Err(e) => eprintln!("Error: {}\n", e),
        }
    }
    Ok(())
}

fn print_session(session: &ModelSession) {
    if session.candidates().is_empty() {
        println!("No models discovered yet (they are fetched with the first question).");
        return;
    }
    for (i, model) in session.candidates().iter().enumerate() {
        let marker = if i == session.cursor() {
            "→"
        } else if i < session.cursor() {
            "✗"
        } else {
            " "
        };
        println!("{} {}", marker, model);
    }
}
