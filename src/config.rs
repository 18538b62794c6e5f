use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::ErrorKind as ClapErrorKind;
use clap::Parser;
use log::info;

use crate::error::{Error, Result};
use crate::model::types::DEFAULT_MODEL;
use crate::prompt;

pub const DEFAULT_ENDPOINT: &str = "https://api.deepseek.com/v1/chat/completions";
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const MISSING_PROMPT_PATH: &str = "Missing prompt file path";

/// Send a prompt file to a chat-completion API and print the reply.
///
/// The API key is read from OPENAI_API_KEY only. Options must come before the
/// prompt file; everything after it is ignored.
#[derive(Debug, Clone, Parser)]
#[command(name = "coztrail-summary", version)]
pub struct Cli {
    /// Chat-completions URL
    #[arg(long, env = "COZTRAIL_API_URL", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Model identifier sent with the request
    #[arg(long, env = "COZTRAIL_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Directory holding system_prompt.txt [default: <executable dir>/templates]
    #[arg(long, env = "COZTRAIL_TEMPLATE_DIR")]
    pub template_dir: Option<PathBuf>,

    /// File containing the user prompt, taken as-is even if it starts with '-'
    #[arg(allow_hyphen_values = true)]
    pub prompt_file: Option<PathBuf>,

    #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub extra: Vec<OsString>,
}

impl Cli {
    /// Parse arguments, mapping usage errors to [`Error::Argument`].
    /// `--help` and `--version` print and exit directly.
    pub fn try_from_args<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match Cli::try_parse_from(args) {
            Ok(cli) => Ok(cli),
            Err(e) if matches!(e.kind(), ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion) => {
                e.exit()
            }
            Err(e) => Err(Error::Argument(e.to_string().trim_end().to_string())),
        }
    }

    pub fn prompt_path(&self) -> Result<PathBuf> {
        self.prompt_file
            .clone()
            .ok_or_else(|| Error::Argument(MISSING_PROMPT_PATH.to_string()))
    }
}

/// Everything a run needs, resolved once at start-up.
#[derive(Debug, Clone)]
pub struct Config {
    pub prompt_path: PathBuf,
    pub api_key: String,
    pub template_dir: PathBuf,
    pub endpoint: String,
    pub model: String,
}

impl Config {
    /// The API key is checked before the template directory is resolved.
    pub fn resolve(cli: Cli, api_key: Option<String>) -> Result<Self> {
        let prompt_path = cli.prompt_path()?;

        let api_key = api_key
            .filter(|key| !key.is_empty())
            .ok_or(Error::Environment(API_KEY_VAR))?;

        let template_dir = match cli.template_dir {
            Some(dir) => dir,
            None => prompt::executable_template_dir()?,
        };

        info!("Using endpoint {} with model {}", cli.endpoint, cli.model);
        info!("Using templates from {}", template_dir.display());

        Ok(Self {
            prompt_path,
            api_key,
            template_dir,
            endpoint: cli.endpoint,
            model: cli.model,
        })
    }
}
