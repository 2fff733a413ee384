//! Tokens from locally installed developer CLIs.
//!
//! `CliCredential` shells out to the Azure CLI (`az`) or the Azure Developer
//! CLI (`azd`), both of which hold the user's login. Tokens are cached in
//! memory until they are within `refresh_buffer_seconds` of expiry, and a
//! mutex serializes refreshes so the tool runs at most once per expiry.

// Author: kelexine (https://github.com/kelexine)

use super::{AccessToken, AuthHeader, TokenCredential};
use crate::config::CredentialConfig;
use crate::error::{Result, VisionChatError};
use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tokio::process::Command;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliTool {
    AzureCli,
    AzureDeveloperCli,
}

impl CliTool {
    pub fn credential_name(&self) -> &'static str {
        match self {
            CliTool::AzureCli => "AzureCliCredential",
            CliTool::AzureDeveloperCli => "AzureDeveloperCliCredential",
        }
    }

    fn program(&self) -> &'static str {
        match self {
            #[cfg(windows)]
            CliTool::AzureCli => "az.cmd",
            #[cfg(not(windows))]
            CliTool::AzureCli => "az",
            CliTool::AzureDeveloperCli => "azd",
        }
    }

    fn args(&self, scope: &str) -> Vec<String> {
        match self {
            CliTool::AzureCli => vec![
                "account".into(),
                "get-access-token".into(),
                "--scope".into(),
                scope.into(),
                "--output".into(),
                "json".into(),
            ],
            CliTool::AzureDeveloperCli => vec![
                "auth".into(),
                "token".into(),
                "--scope".into(),
                scope.into(),
                "--output".into(),
                "json".into(),
            ],
        }
    }

    /// Parse the tool's JSON output into a token.
    pub fn parse_output(&self, stdout: &str) -> Result<AccessToken> {
        match self {
            CliTool::AzureCli => parse_az_output(stdout),
            CliTool::AzureDeveloperCli => parse_azd_output(stdout),
        }
    }
}

/// `az account get-access-token` output
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AzTokenResponse {
    access_token: String,
    /// Local wall-clock time, e.g. `2025-01-01 12:00:00.000000`
    expires_on: Option<String>,
    /// Unix seconds; present in newer releases
    #[serde(rename = "expires_on")]
    expires_on_unix: Option<i64>,
}

/// `azd auth token` output
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AzdTokenResponse {
    token: String,
    expires_on: String,
}

fn parse_az_output(stdout: &str) -> Result<AccessToken> {
    let response: AzTokenResponse = serde_json::from_str(stdout).map_err(|e| {
        VisionChatError::Credential(format!("unexpected az output: {}", e))
    })?;

    let expires_at = match (response.expires_on_unix, response.expires_on.as_deref()) {
        (Some(secs), _) => Utc
            .timestamp_opt(secs, 0)
            .single()
            .ok_or_else(|| VisionChatError::Credential(format!("invalid expires_on {}", secs)))?,
        (None, Some(local)) => parse_local_timestamp(local)?,
        (None, None) => {
            return Err(VisionChatError::Credential(
                "az output has no expiry".to_string(),
            ))
        }
    };

    Ok(AccessToken {
        token: response.access_token,
        expires_at,
    })
}

fn parse_azd_output(stdout: &str) -> Result<AccessToken> {
    let response: AzdTokenResponse = serde_json::from_str(stdout).map_err(|e| {
        VisionChatError::Credential(format!("unexpected azd output: {}", e))
    })?;

    let expires_at = DateTime::parse_from_rfc3339(&response.expires_on)
        .map_err(|e| VisionChatError::Credential(format!("invalid expiresOn: {}", e)))?
        .with_timezone(&Utc);

    Ok(AccessToken {
        token: response.token,
        expires_at,
    })
}

fn parse_local_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f")
        .map_err(|e| VisionChatError::Credential(format!("invalid expiresOn '{}': {}", value, e)))?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| VisionChatError::Credential(format!("ambiguous expiresOn '{}'", value)))
}

/// Credential backed by a developer CLI login.
#[derive(Clone)]
pub struct CliCredential {
    tool: CliTool,
    scope: String,
    refresh_buffer_seconds: i64,
    cached: Arc<RwLock<Option<AccessToken>>>,
    refresh_lock: Arc<Mutex<()>>,
}

impl CliCredential {
    pub fn new(tool: CliTool, config: &CredentialConfig) -> Self {
        Self {
            tool,
            scope: config.scope.clone(),
            refresh_buffer_seconds: config.refresh_buffer_seconds,
            cached: Arc::new(RwLock::new(None)),
            refresh_lock: Arc::new(Mutex::new(())),
        }
    }

    async fn cached_token(&self) -> Option<String> {
        let cached = self.cached.read().await;
        cached
            .as_ref()
            .filter(|t| !t.is_expired(self.refresh_buffer_seconds))
            .map(|t| t.token.clone())
    }

    async fn run_tool(&self) -> Result<AccessToken> {
        let program = self.tool.program();
        debug!("Requesting token from {}", program);

        let output = Command::new(program)
            .args(self.tool.args(&self.scope))
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    VisionChatError::Credential(format!("{} is not installed", program))
                }
                _ => VisionChatError::Credential(format!("failed to run {}: {}", program, e)),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let first_line = stderr.lines().next().unwrap_or("").trim().to_string();
            warn!("{} exited with {}", program, output.status);
            return Err(VisionChatError::Credential(format!(
                "{} failed: {}",
                program, first_line
            )));
        }

        self.tool.parse_output(&String::from_utf8_lossy(&output.stdout))
    }
}

#[async_trait]
impl TokenCredential for CliCredential {
    fn name(&self) -> &str {
        self.tool.credential_name()
    }

    async fn get_auth(&self) -> Result<AuthHeader> {
        // Fast path: cached token still valid.
        if let Some(token) = self.cached_token().await {
            return Ok(AuthHeader::bearer(token));
        }

        let _guard = self.refresh_lock.lock().await;

        // Re-verify after gaining the mutex.
        if let Some(token) = self.cached_token().await {
            return Ok(AuthHeader::bearer(token));
        }

        let fresh = self.run_tool().await?;
        let header = AuthHeader::bearer(fresh.token.as_str());
        debug!("{} token valid until {}", self.name(), fresh.expires_at);
        *self.cached.write().await = Some(fresh);
        Ok(header)
    }
}
