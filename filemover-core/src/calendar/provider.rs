//! Provider subprocess protocol.
//!
//! Calendar access is delegated to external provider executables (e.g.
//! `filemover-provider-google`) that speak JSON over stdin/stdout. Providers
//! own their credentials and tokens; filemover never sees them.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt;
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

use super::EventSource;
use super::date_range::DateRange;
use super::event::CandidateEvent;
use super::protocol::{Authenticate, Command, ListEvents, ProviderCommand, Request, Response};
use crate::constants::FETCH_TIMEOUT;
use crate::error::{FileMoverError, FileMoverResult};

/// Sign-in involves a browser round trip, so it gets longer.
const AUTH_TIMEOUT: Duration = Duration::from_secs(300);

const DEFAULT_CALENDAR_ID: &str = "primary";

#[derive(Clone, Debug)]
pub struct Provider {
    name: String,
    /// Explicit program and arguments; otherwise `filemover-provider-<name>` from PATH.
    command: Option<(PathBuf, Vec<String>)>,
    calendar_id: String,
    timeout: Duration,
}

impl Provider {
    pub fn from_name(name: &str) -> Self {
        Provider {
            name: name.to_string(),
            command: None,
            calendar_id: DEFAULT_CALENDAR_ID.to_string(),
            timeout: FETCH_TIMEOUT,
        }
    }

    /// Run `program args...` instead of looking the provider up in PATH.
    pub fn with_command(mut self, program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        self.command = Some((program.into(), args));
        self
    }

    pub fn with_calendar_id(mut self, calendar_id: impl Into<String>) -> Self {
        self.calendar_id = calendar_id.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn program(&self) -> FileMoverResult<(PathBuf, Vec<String>)> {
        if let Some(command) = &self.command {
            return Ok(command.clone());
        }
        let binary_name = format!("filemover-provider-{}", self.name);
        let binary_path = which::which(&binary_name).map_err(|_| {
            FileMoverError::ProviderNotInstalled(format!(
                "{}. Install `{}` and make sure it is in PATH",
                self.name, binary_name
            ))
        })?;
        Ok((binary_path, Vec::new()))
    }

    /// Run the provider's sign-in flow. Returns the account identifier.
    pub async fn authenticate(&self) -> FileMoverResult<String> {
        self.call_with_timeout(Authenticate::default(), AUTH_TIMEOUT).await
    }

    /// Call a typed provider command with the provider's timeout.
    pub async fn call<C: ProviderCommand>(&self, cmd: C) -> FileMoverResult<C::Response> {
        self.call_with_timeout(cmd, self.timeout).await
    }

    async fn call_with_timeout<C: ProviderCommand>(
        &self,
        cmd: C,
        limit: Duration,
    ) -> FileMoverResult<C::Response> {
        timeout(limit, self.call_raw(C::command(), cmd))
            .await
            .map_err(|_| FileMoverError::ProviderTimeout(limit.as_secs()))?
    }

    /// Low-level call that sends a command with params and deserializes the response.
    ///
    /// The child is killed if this future is dropped, so timeouts and
    /// cancellation do not leave providers running.
    async fn call_raw<P: Serialize, R: DeserializeOwned>(
        &self,
        command: Command,
        params: P,
    ) -> FileMoverResult<R> {
        let params = serde_json::to_value(params)
            .map_err(|e| FileMoverError::Serialization(e.to_string()))?;
        let request = Request { command, params };
        let request_json = serde_json::to_string(&request)
            .map_err(|e| FileMoverError::Serialization(e.to_string()))?;

        let (program, args) = self.program()?;
        tracing::debug!(provider = %self.name, program = %program.display(), ?command, "calling provider");

        let mut child = TokioCommand::new(&program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                FileMoverError::Provider(format!("Failed to spawn {}: {}", program.display(), e))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| FileMoverError::Provider("Provider stdin unavailable".into()))?;
        stdin
            .write_all(format!("{request_json}\n").as_bytes())
            .await
            .map_err(|e| FileMoverError::Provider(format!("Failed to send request: {e}")))?;
        drop(stdin);

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| FileMoverError::Provider(format!("Failed to read response: {e}")))?;

        if !output.status.success() {
            return Err(FileMoverError::Provider(format!(
                "Provider exited with status: {}",
                output.status.code().unwrap_or(-1)
            )));
        }

        let response_str = String::from_utf8_lossy(&output.stdout);
        if response_str.trim().is_empty() {
            return Err(FileMoverError::Provider("Provider returned no response".into()));
        }

        let response: Response<R> = serde_json::from_str(&response_str)
            .map_err(|e| FileMoverError::Provider(format!("Failed to parse response: {}", e)))?;

        match response {
            Response::Success { data } => Ok(data),
            Response::Error { error } => Err(FileMoverError::Provider(error)),
            Response::AuthRequired { error } => Err(FileMoverError::Credential(error)),
        }
    }
}

impl EventSource for Provider {
    async fn list_events(
        &self,
        range: &DateRange,
        max_results: usize,
    ) -> FileMoverResult<Vec<CandidateEvent>> {
        self.call(ListEvents {
            calendar_id: self.calendar_id.clone(),
            from: range.from_rfc3339(),
            to: range.to_rfc3339(),
            max_results,
        })
        .await
    }
}
