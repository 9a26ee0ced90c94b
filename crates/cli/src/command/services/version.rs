use crate::command::{CommandContext, CommandOutput};
use hpl_protocol::IntentId;
use serde::Serialize;

const COMMAND: &str = "version";

#[derive(Debug, Serialize)]
struct VersionInfo {
    name: &'static str,
    version: &'static str,
}

pub fn run(_ctx: &CommandContext) -> CommandOutput {
    let info = VersionInfo {
        name: "hpl",
        version: env!("CARGO_PKG_VERSION"),
    };
    let text = vec![format!("{} {}", info.name, info.version)];
    CommandOutput::from_result(
        COMMAND,
        IntentId::ShowVersion,
        CommandOutput::ok(COMMAND, IntentId::ShowVersion, &info, text),
    )
}
