pub mod api_key;
pub mod app;
pub mod cli;
pub mod community;
pub mod config;
pub mod gemini;
pub mod llm;
pub mod models;
pub mod paths;
pub mod util;
pub mod webhooks;
