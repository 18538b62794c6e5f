pub mod config;
pub mod error;
pub mod model;
pub mod prompt;

use log::info;

pub use config::{Cli, Config};
pub use error::{Error, ErrorKind, Result};
pub use model::types::{ChatRequest, ChatResponse, Choice, Message, Role};
pub use model::{parse_response, ChatClient};

/// Load the prompt, resolve configuration and perform one completion.
/// `api_key` is the raw value of OPENAI_API_KEY, if any.
pub async fn run(cli: Cli, api_key: Option<String>) -> Result<String> {
    let prompt_path = cli.prompt_path()?;
    let user_prompt = prompt::load_prompt(&prompt_path)?;
    info!("Loaded prompt from {}", prompt_path.display());

    let config = Config::resolve(cli, api_key)?;
    summarize(&config, &user_prompt).await
}

/// System prompt, request, response: the network half of a run.
pub async fn summarize(config: &Config, user_prompt: &str) -> Result<String> {
    let system_prompt = prompt::load_system_prompt(&config.template_dir)?;
    let request = ChatRequest::new(config.model.as_str(), system_prompt, user_prompt);

    let body = ChatClient::from_config(config).send(&request).await?;
    parse_response(&body)
}
