//! Application command invocation payload

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ActionBody;
use crate::Result;
use crate::identity::Snowflake;

/// Interaction type of a slash command invocation
pub const APPLICATION_COMMAND: u8 = 2;

/// Command type of a chat-input (slash) command
pub const CHAT_INPUT: u8 = 1;

/// Command metadata as returned by the command search endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationCommand {
    pub id: String,
    pub application_id: String,
    pub version: String,
    pub default_member_permissions: Option<String>,
    #[serde(rename = "type")]
    pub kind: u8,
    pub nsfw: bool,
    pub name: String,
    pub description: String,
    pub dm_permission: bool,
    pub contexts: Option<Value>,
}

impl ApplicationCommand {
    /// Chat-input command with the remaining metadata at its defaults
    pub fn new(
        id: impl Into<String>,
        application_id: impl Into<String>,
        version: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            application_id: application_id.into(),
            version: version.into(),
            default_member_permissions: None,
            kind: CHAT_INPUT,
            nsfw: false,
            name: name.into(),
            description: String::new(),
            dm_permission: true,
            contexts: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Value supplied for one declared command option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandOption {
    #[serde(rename = "type")]
    pub kind: u8,
    pub name: String,
    pub value: Value,
}

impl CommandOption {
    pub fn new(kind: u8, name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            kind,
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Options for invoking a command
#[derive(Debug, Clone)]
pub struct SendInteractionOptions {
    pub guild_id: Option<String>,
    pub channel_id: String,
    pub command: ApplicationCommand,
    pub options: Vec<CommandOption>,
}

impl SendInteractionOptions {
    pub fn new(channel_id: impl Into<String>, command: ApplicationCommand) -> Self {
        Self {
            guild_id: None,
            channel_id: channel_id.into(),
            command,
            options: Vec::new(),
        }
    }

    pub fn in_guild(mut self, guild_id: impl Into<String>) -> Self {
        self.guild_id = Some(guild_id.into());
        self
    }

    pub fn with_option(mut self, option: CommandOption) -> Self {
        self.options.push(option);
        self
    }
}

/// Nested `data` object naming the invoked command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionData {
    pub version: String,
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: u8,
    pub options: Vec<CommandOption>,
    pub application_command: ApplicationCommand,
    pub attachments: Vec<Value>,
}

/// Slash command invocation envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionPayload {
    #[serde(rename = "type")]
    pub kind: u8,
    pub application_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub guild_id: Option<String>,
    pub channel_id: String,
    pub session_id: String,
    pub data: InteractionData,
    /// Client-generated id the service uses to de-duplicate retries
    pub nonce: Snowflake,
}

impl InteractionPayload {
    /// Build the envelope for the gateway session `session_id`
    pub fn new(options: SendInteractionOptions, session_id: impl Into<String>) -> Self {
        let SendInteractionOptions {
            guild_id,
            channel_id,
            command,
            options,
        } = options;

        Self {
            kind: APPLICATION_COMMAND,
            application_id: command.application_id.clone(),
            guild_id,
            channel_id,
            session_id: session_id.into(),
            data: InteractionData {
                version: command.version.clone(),
                id: command.id.clone(),
                name: command.name.clone(),
                kind: command.kind,
                options,
                application_command: command,
                attachments: Vec::new(),
            },
            nonce: Snowflake::now(),
        }
    }

    /// Command id as carried in the nested data object
    pub fn command_id(&self) -> &str {
        &self.data.id
    }

    /// Command name as carried in the nested data object
    pub fn command_name(&self) -> &str {
        &self.data.name
    }

    pub fn into_body(self) -> Result<ActionBody> {
        ActionBody::json(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn info_command() -> ApplicationCommand {
        ApplicationCommand::new(
            "972289487818334209",
            "936929561302675456",
            "987795925764280356",
            "info",
        )
        .with_description("View information about your profile.")
    }

    #[test]
    fn test_envelope_shape() {
        let payload = InteractionPayload::new(
            SendInteractionOptions::new("1088993785691787467", info_command())
                .in_guild("1088993371290349592"),
            "d04fe8eb123222984df98f54c665e349",
        );
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["type"], 2);
        assert_eq!(value["application_id"], "936929561302675456");
        assert_eq!(value["guild_id"], "1088993371290349592");
        assert_eq!(value["session_id"], "d04fe8eb123222984df98f54c665e349");
        assert_eq!(value["data"]["type"], 1);
        assert_eq!(value["data"]["version"], "987795925764280356");
        assert_eq!(value["data"]["attachments"], serde_json::json!([]));
        assert_eq!(
            value["data"]["application_command"]["default_member_permissions"],
            Value::Null
        );
        assert!(value["nonce"].is_string());
    }

    #[test]
    fn test_command_roundtrip() {
        let payload = InteractionPayload::new(
            SendInteractionOptions::new("1", info_command())
                .with_option(CommandOption::new(3, "prompt", "a lighthouse")),
            "session",
        );

        let json = serde_json::to_string(&payload).unwrap();
        let decoded: InteractionPayload = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded.command_id(), "972289487818334209");
        assert_eq!(decoded.command_name(), "info");
        assert_eq!(decoded.data.options[0].value, "a lighthouse");
        assert_eq!(decoded, payload);
    }

    #[test]
    fn test_session_id_comes_from_caller() {
        let payload = InteractionPayload::new(SendInteractionOptions::new("1", info_command()), "abc");
        assert_eq!(payload.session_id, "abc");
        assert!(payload.guild_id.is_none());
    }

    #[test]
    fn test_nonce_is_recent() {
        let before = Snowflake::now();
        let payload = InteractionPayload::new(SendInteractionOptions::new("1", info_command()), "s");
        assert!(payload.nonce >= before);
    }
}
