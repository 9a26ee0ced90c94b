use crate::command::{classify_api_error, CommandContext, CommandOutput};
use hpl_protocol::IntentId;

const COMMAND: &str = "health";
const INTENT: IntentId = IntentId::CheckHealth;

pub async fn run(ctx: &CommandContext) -> CommandOutput {
    let config = ctx.config(None);
    let client = match ctx.client(&config) {
        Ok(client) => client,
        Err(err) => return CommandOutput::error(COMMAND, INTENT, classify_api_error(&err)),
    };

    match client.health().await {
        Ok(health) => {
            let db = health
                .db_path
                .as_deref()
                .map(|path| format!(" (db: {path})"))
                .unwrap_or_default();
            let text = vec![format!("{}{db}", health.status)];
            CommandOutput::from_result(
                COMMAND,
                INTENT,
                CommandOutput::ok(COMMAND, INTENT, &health, text),
            )
        }
        Err(err) => CommandOutput::error(COMMAND, INTENT, classify_api_error(&err)),
    }
}
