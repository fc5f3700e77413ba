//! Defines the JSON protocol used between filemover and provider
//! executables over stdin/stdout.
//!
//! One request line goes in, one response document comes out.

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use super::event::CandidateEvent;

pub trait ProviderCommand: Serialize {
    type Response: DeserializeOwned;
    fn command() -> Command;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Authenticate,
    ListEvents,
}

/// Request sent to the provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct Request {
    pub command: Command,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Response sent back by the provider.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response<T> {
    Success { data: T },
    Error { error: String },
    /// Credentials are missing, expired or revoked.
    AuthRequired { error: String },
}

/// Run the provider's own sign-in flow.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Authenticate {}

impl ProviderCommand for Authenticate {
    type Response = String; // Account identifier (e.g., email)
    fn command() -> Command {
        Command::Authenticate
    }
}

/// List events starting within a time range, ordered by start time.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListEvents {
    pub calendar_id: String,
    pub from: String,
    pub to: String,
    pub max_results: usize,
}

impl ProviderCommand for ListEvents {
    type Response = Vec<CandidateEvent>;
    fn command() -> Command {
        Command::ListEvents
    }
}
