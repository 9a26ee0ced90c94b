use crate::command::{CommandContext, CommandOutput};
use hpl_protocol::{list_alpha_intents, Capabilities, IntentId, IntentTier};

const COMMAND: &str = "capabilities";

pub fn run(_ctx: &CommandContext) -> CommandOutput {
    let caps = Capabilities::alpha();

    let tier = match caps.intent_tier {
        IntentTier::Alpha => "alpha",
        IntentTier::Full => "full",
    };
    let mut text = vec![
        format!("intentTier: {tier}"),
        format!("schemaVersions: {}", caps.schema_versions.join(", ")),
        "supportedIntents:".to_string(),
    ];
    text.extend(list_alpha_intents().map(|intent| {
        if intent.is_read_only() {
            format!("  - {}", intent.intent)
        } else {
            format!("  - {} (writes: {})", intent.intent, intent.side_effects.join(", "))
        }
    }));

    CommandOutput::from_result(
        COMMAND,
        IntentId::ShowCapabilities,
        CommandOutput::ok(COMMAND, IntentId::ShowCapabilities, &caps, text),
    )
}
