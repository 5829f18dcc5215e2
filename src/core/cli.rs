//! Non-chat commands: config info, models list, feed, inbox, webhooks, init.
//!
//! These produce plain text output and exit with status 1 on failure.

use std::io::{self, Read};

use serde_json::Value;

use crate::core::api_key;
use crate::core::community::{self, CommunitySnapshot, CommunityStore, JsonFileStore, feed, messages};
use crate::core::config::Config;
use crate::core::gemini::GeminiClient;
use crate::core::llm::prompt;
use crate::core::models;
use crate::core::paths;
use crate::core::webhooks::{WebhookEvent, WebhookNotifier};

/// Bundled example community, validated by build.rs.
const SAMPLE_SNAPSHOT: &str = include_str!("../../data/sample-community.json");

/// Feed and inbox previews are cut to this many characters.
const PREVIEW_CHARS: usize = 60;

fn fail(e: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", e);
    std::process::exit(1);
}

fn load_or_exit(config: &Config) -> CommunitySnapshot {
    JsonFileStore::new(&config.snapshot_path)
        .load()
        .unwrap_or_else(|e| fail(e))
}

fn preview(s: &str) -> String {
    let one_line = s.trim().replace('\n', " ");
    let cut = crate::core::util::truncate_chars(&one_line, PREVIEW_CHARS);
    if cut.len() < one_line.len() {
        format!("{}…", cut)
    } else {
        one_line
    }
}

/// Run the `config` command: display paths, snapshot, and API key status.
pub fn run_config(config: &Config) {
    let config_dir = paths::config_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "—".to_string());
    let snapshot = JsonFileStore::new(&config.snapshot_path).load().ok();
    let key_status = match config.resolve_api_key(snapshot.as_ref()) {
        Ok((_, source)) => format!("set ✓ ({})", source),
        Err(_) => "not set".to_string(),
    };
    let snapshot_status = if snapshot.is_some() { "found" } else { "missing" };
    let hooks: Vec<&str> = WebhookEvent::ALL
        .iter()
        .filter(|e| config.webhooks.url_for(**e).is_some())
        .map(|e| e.as_str())
        .collect();

    println!("Config:     {}", config_dir);
    println!("Community:  {} ({})", config.snapshot_path.display(), snapshot_status);
    println!("Provider:   {}", config.base_url);
    println!("API key:    {}", key_status);
    println!(
        "Webhooks:   {}",
        if hooks.is_empty() { "none".to_string() } else { hooks.join(", ") }
    );
}

/// Run the `config set-api-key` command: store API key in config directory.
pub fn run_config_set_api_key(key: Option<String>) {
    let key = match key {
        Some(k) if !k.trim().is_empty() => k,
        _ => {
            let mut buf = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buf) {
                fail(format!("reading from stdin: {}", e));
            }
            buf
        }
    };

    match api_key::store_api_key(&key) {
        Ok(path) => println!("API key saved to {}", path.display()),
        Err(e) => fail(e),
    }
}

/// Run the `init` command: write the bundled sample snapshot.
pub fn run_init(config: &Config, force: bool) {
    let store = JsonFileStore::new(&config.snapshot_path);
    match store.write_raw(SAMPLE_SNAPSHOT, force) {
        Ok(()) => println!("Sample community written to {}", store.path().display()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            fail(format!("{} (use --force to overwrite)", e))
        }
        Err(e) => fail(e),
    }
}

/// Run the `context` command: print the composed system prompt.
pub fn run_context(config: &Config) {
    let snapshot = load_or_exit(config);
    let ctx = community::stats::build_chat_context(&snapshot);
    println!("{}", prompt::compose_system_prompt(&ctx));
}

/// Run the `models` command: list chat-capable models in candidate order.
pub async fn run_models(config: &Config, query: Option<&str>) {
    let snapshot = JsonFileStore::new(&config.snapshot_path).load().ok();
    let client = config
        .resolve_api_key(snapshot.as_ref())
        .and_then(|(key, _)| GeminiClient::new(&config.base_url, &key))
        .unwrap_or_else(|e| fail(e));

    let models = models::fetch_chat_models(&client)
        .await
        .unwrap_or_else(|e| fail(e));
    let filtered: Vec<_> = match query {
        Some(q) => models::filter_models(&models, q),
        None => models.iter().collect(),
    };

    if filtered.is_empty() {
        println!("No models found.");
        return;
    }

    let id_w = filtered.iter().map(|m| m.name.len()).max().unwrap_or(20).max(20);
    let name_w = filtered
        .iter()
        .map(|m| m.display_name.len())
        .max()
        .unwrap_or(24)
        .max(24);

    println!("{:<id_w$}  {:<name_w$}  {:>9}", "ID", "Name", "Input");
    println!("{}  {}  ---------", "-".repeat(id_w), "-".repeat(name_w));
    for m in &filtered {
        println!(
            "{:<id_w$}  {:<name_w$}  {:>9}",
            m.name, m.display_name, m.input_token_limit
        );
    }
    println!("\n{} model(s) listed", filtered.len());
}

/// Run the `feed` command: one page of posts, newest first.
pub fn run_feed(config: &Config, page: usize, page_size: usize, tag: Option<&str>) {
    let snapshot = load_or_exit(config);
    let posts: Vec<community::snapshot::Post> = match tag {
        Some(t) => feed::with_tag(&snapshot.posts, t).into_iter().cloned().collect(),
        None => snapshot.posts,
    };
    let page = feed::paginate(&posts, page, page_size);

    if page.items.is_empty() {
        println!("No posts on page {}.", page.number);
        return;
    }
    for post in &page.items {
        let kind = if post.has_image() { "image" } else { "text" };
        println!(
            "{}  {:<12} {:<5} ♥{:<3} 💬{:<3} {}",
            post.created_at.format("%Y-%m-%d %H:%M"),
            post.author,
            kind,
            post.likes.len(),
            post.comments.len(),
            preview(&post.content)
        );
    }
    println!(
        "\nPage {}{}",
        page.number,
        if page.has_more { " (more with --page N)" } else { "" }
    );
}

/// Run the `inbox` command: conversations for a member, or one thread.
pub fn run_inbox(config: &Config, user: &str, with: Option<&str>) {
    let snapshot = load_or_exit(config);

    if let Some(peer) = with {
        let thread = messages::thread(&snapshot.messages, user, peer);
        if thread.is_empty() {
            println!("No messages between {} and {}.", user, peer);
        }
        for m in thread {
            let who = if m.sender_id == user { "you" } else { peer };
            println!("{}  {:<8} {}", m.created_at.format("%Y-%m-%d %H:%M"), who, m.content);
        }
        return;
    }

    let conversations = messages::group_conversations(&snapshot.messages, &snapshot.members, user);
    if conversations.is_empty() {
        println!("No conversations for {}.", user);
        return;
    }
    for c in &conversations {
        let unread = if c.unread > 0 {
            format!(" ({} unread)", c.unread)
        } else {
            String::new()
        };
        println!(
            "{:<16} {:>3} msgs{}  {}",
            c.peer_name,
            c.message_count,
            unread,
            preview(&c.last_message.content)
        );
    }
}

/// Run the `webhook` command: deliver one event and report the outcome.
pub async fn run_webhook(config: &Config, event: WebhookEvent, data: Option<&str>) {
    let data: Value = match data {
        Some(raw) => serde_json::from_str(raw)
            .unwrap_or_else(|e| fail(format!("--data is not valid JSON: {}", e))),
        None => Value::Object(Default::default()),
    };

    let notifier = WebhookNotifier::new(config.webhooks.clone());
    match notifier.deliver(event, data).await {
        Ok(true) => println!("Webhook {} delivered", event),
        Ok(false) => fail(format!(
            "no URL configured for {} (set WEBHOOK_{}_URL)",
            event,
            event.as_str().to_uppercase()
        )),
        Err(e) => fail(e),
    }
}

/// Run the `send` command: store a direct message, then notify both sides.
///
/// The message is saved whether or not the notifications go through.
pub async fn run_send(config: &Config, from: &str, to: &str, content: &str) {
    let content = content.trim();
    if content.is_empty() {
        fail("message is empty");
    }
    let store = JsonFileStore::new(&config.snapshot_path);
    let mut snapshot = load_or_exit(config);
    let message = messages::new_message(from, to, content);
    snapshot.messages.push(message.clone());
    if let Err(e) = store.save(&snapshot) {
        fail(e);
    }
    println!("Message {} sent to {}", message.id, to);

    let notifier = WebhookNotifier::new(config.webhooks.clone());
    let data = serde_json::to_value(&message).unwrap_or(Value::Null);
    let pending = [
        notifier.notify(WebhookEvent::MessageSent, data.clone()),
        notifier.notify(WebhookEvent::MessageReceived, data),
    ];
    for handle in pending.into_iter().flatten() {
        let _ = handle.await;
    }
}
