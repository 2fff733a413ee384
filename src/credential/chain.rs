// Credential chaining
// Author: kelexine (https://github.com/kelexine)

use super::cli::{CliCredential, CliTool};
use super::{AuthHeader, TokenCredential};
use crate::config::CredentialConfig;
use crate::error::{Result, VisionChatError};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};
use zeroize::Zeroizing;

/// A static API key from configuration.
pub struct ApiKeyCredential {
    key: Zeroizing<String>,
}

impl ApiKeyCredential {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: Zeroizing::new(key.into()),
        }
    }
}

#[async_trait]
impl TokenCredential for ApiKeyCredential {
    fn name(&self) -> &str {
        "ApiKeyCredential"
    }

    async fn get_auth(&self) -> Result<AuthHeader> {
        if self.key.trim().is_empty() {
            return Err(VisionChatError::Credential("API key is empty".to_string()));
        }
        Ok(AuthHeader::api_key(self.key.as_str()))
    }
}

/// Tries each source in order and returns the first credential obtained.
pub struct ChainedCredential {
    sources: Vec<Arc<dyn TokenCredential>>,
}

impl ChainedCredential {
    pub fn new(sources: Vec<Arc<dyn TokenCredential>>) -> Self {
        Self { sources }
    }

    /// Build the chain described by `config`:
    /// API key (if set), then Azure CLI, then Azure Developer CLI.
    pub fn from_config(config: &CredentialConfig) -> Self {
        let mut sources: Vec<Arc<dyn TokenCredential>> = Vec::new();

        if let Some(key) = config.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
            sources.push(Arc::new(ApiKeyCredential::new(key)));
        }
        if !config.exclude_azure_cli {
            sources.push(Arc::new(CliCredential::new(CliTool::AzureCli, config)));
        }
        if !config.exclude_azure_developer_cli {
            sources.push(Arc::new(CliCredential::new(
                CliTool::AzureDeveloperCli,
                config,
            )));
        }

        debug!(
            "Credential chain: [{}]",
            sources.iter().map(|s| s.name()).collect::<Vec<_>>().join(", ")
        );
        Self { sources }
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }
}

#[async_trait]
impl TokenCredential for ChainedCredential {
    fn name(&self) -> &str {
        "ChainedCredential"
    }

    async fn get_auth(&self) -> Result<AuthHeader> {
        if self.sources.is_empty() {
            return Err(VisionChatError::Credential(
                "credential chain is empty; set credential.api_key or enable a CLI login".to_string(),
            ));
        }

        let mut failures = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            match source.get_auth().await {
                Ok(auth) => {
                    info!("Authenticated with {}", source.name());
                    return Ok(auth);
                }
                Err(e) => {
                    debug!("{} unavailable: {}", source.name(), e);
                    failures.push(format!("{}: {}", source.name(), e));
                }
            }
        }

        Err(VisionChatError::Credential(failures.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::AuthKind;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Failing {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TokenCredential for Failing {
        fn name(&self) -> &str {
            "Failing"
        }

        async fn get_auth(&self) -> Result<AuthHeader> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(VisionChatError::Credential("not logged in".to_string()))
        }
    }

    #[tokio::test]
    async fn test_first_success_wins() {
        let failing = Arc::new(Failing { calls: AtomicUsize::new(0) });
        let chain = ChainedCredential::new(vec![
            failing.clone(),
            Arc::new(ApiKeyCredential::new("key-1")),
            Arc::new(ApiKeyCredential::new("key-2")),
        ]);

        let auth = chain.get_auth().await.unwrap();
        assert_eq!(auth.kind(), AuthKind::ApiKey);
        assert_eq!(auth.header_value(), "key-1");
        assert_eq!(failing.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_all_failures_are_reported() {
        let chain = ChainedCredential::new(vec![
            Arc::new(Failing { calls: AtomicUsize::new(0) }),
            Arc::new(ApiKeyCredential::new("  ")),
        ]);

        let err = chain.get_auth().await.unwrap_err().to_string();
        assert!(err.contains("Failing: "));
        assert!(err.contains("ApiKeyCredential: "));
    }

    #[tokio::test]
    async fn test_empty_chain_errors() {
        let chain = ChainedCredential::new(Vec::new());
        assert!(matches!(chain.get_auth().await, Err(VisionChatError::Credential(_))));
    }

    #[test]
    fn test_from_config_order() {
        let config = CredentialConfig {
            api_key: Some("k".to_string()),
            ..CredentialConfig::default()
        };
        let chain = ChainedCredential::from_config(&config);
        assert_eq!(
            chain.source_names(),
            vec!["ApiKeyCredential", "AzureCliCredential", "AzureDeveloperCliCredential"]
        );

        let config = CredentialConfig {
            exclude_azure_cli: true,
            ..CredentialConfig::default()
        };
        let chain = ChainedCredential::from_config(&config);
        assert_eq!(chain.source_names(), vec!["AzureDeveloperCliCredential"]);
    }
}
