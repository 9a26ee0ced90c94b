mod classify;
pub mod services;

pub use classify::{classify_anyhow, classify_api_error, classify_sync_error, Classified};

use crate::config::{
    config_path, load_config_file, process_env, resolve_config, ConfigFile, ConfigOverrides,
    ResolvedConfig,
};
use crate::NotesCommands;
use anyhow::Result;
use hpl_client::{ApiClient, ApiError};
use hpl_protocol::{err, ok, warn, Envelope, ExitCode, IntentId};
use serde::Serialize;
use serde_json::Value;

/// Everything a command needs besides its own arguments.
pub struct CommandContext {
    pub json: bool,
    base_url: Option<String>,
    file: ConfigFile,
    env: fn(&str) -> Option<String>,
}

impl CommandContext {
    pub fn new(
        json: bool,
        base_url: Option<String>,
        file: ConfigFile,
        env: fn(&str) -> Option<String>,
    ) -> Self {
        Self {
            json,
            base_url,
            file,
            env,
        }
    }

    pub fn from_process(json: bool, base_url: Option<String>) -> Self {
        let file = config_path(&process_env)
            .map(|path| load_config_file(&path))
            .unwrap_or_default();
        Self::new(json, base_url, file, process_env)
    }

    pub fn env(&self, key: &str) -> Option<String> {
        (self.env)(key)
    }

    pub fn config(&self, token: Option<&str>) -> ResolvedConfig {
        let overrides = ConfigOverrides {
            base_url: self.base_url.clone(),
            token: token.map(str::to_string),
        };
        resolve_config(&overrides, &self.env, &self.file)
    }

    pub fn client(&self, config: &ResolvedConfig) -> std::result::Result<ApiClient, ApiError> {
        ApiClient::new(&config.base_url)
    }
}

/// A finished command: the envelope, the exit code, and the narrative lines
/// shown instead of the envelope when `--json` is off.
pub struct CommandOutput {
    pub envelope: Envelope<Value>,
    pub exit: ExitCode,
    pub text: Vec<String>,
}

impl CommandOutput {
    pub fn ok<T: Serialize>(
        command: &str,
        intent: IntentId,
        data: &T,
        text: Vec<String>,
    ) -> Result<Self> {
        Ok(Self {
            envelope: ok(command, intent.descriptor(), serde_json::to_value(data)?),
            exit: ExitCode::Ok,
            text,
        })
    }

    pub fn warn(
        command: &str,
        intent: IntentId,
        warnings: Vec<String>,
        data: Value,
        exit: ExitCode,
        text: Vec<String>,
    ) -> Self {
        Self {
            envelope: warn(command, intent.descriptor(), warnings, Some(data)),
            exit,
            text,
        }
    }

    pub fn error(command: &str, intent: IntentId, classified: Classified) -> Self {
        Self {
            envelope: err(command, intent.descriptor(), classified.payload),
            exit: classified.exit,
            text: Vec::new(),
        }
    }

    /// Turns a handler failure that escaped typed handling into an envelope.
    pub fn from_result(command: &str, intent: IntentId, result: Result<Self>) -> Self {
        result.unwrap_or_else(|err| {
            log::debug!("{command} failed: {err:#}");
            Self::error(command, intent, classify_anyhow(&err))
        })
    }
}

pub async fn run_notes(command: NotesCommands, ctx: &CommandContext) -> CommandOutput {
    use services::{notes, sync};

    match command {
        NotesCommands::List(args) => notes::list(args, ctx).await,
        NotesCommands::Get(args) => notes::get(args, ctx).await,
        NotesCommands::Create(args) => notes::create(args, ctx).await,
        NotesCommands::Update(args) => notes::update(args, ctx).await,
        NotesCommands::Sync(args) => sync::run(args, ctx).await,
    }
}
