// Azure OpenAI chat-completions client
// Author: kelexine (https://github.com/kelexine)

use super::models::{ChatCompletionRequest, ChatCompletionResponse, VisionPrompt};
use super::InferenceClient;
use crate::config::AppConfig;
use crate::credential::TokenCredential;
use crate::error::{Result, VisionChatError};
use crate::utils::logging::sanitize;
use async_trait::async_trait;
use reqwest::{Client, Url};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Client for the OpenAI-compatible inference API of an Azure AI project.
///
/// The project connection is only validated when a request is made, so a
/// misconfigured endpoint shows up as an error on that action rather than
/// preventing startup.
pub struct AzureOpenAiClient {
    http_client: Client,
    credential: Arc<dyn TokenCredential>,
    project_connection: String,
    deployment: String,
    api_version: String,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

impl AzureOpenAiClient {
    pub fn new(config: &AppConfig, credential: Arc<dyn TokenCredential>) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.inference.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .use_rustls_tls()
            .build()
            .map_err(|e| VisionChatError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            credential,
            project_connection: config.project_connection.trim().to_string(),
            deployment: config.model_deployment.trim().to_string(),
            api_version: config.inference.api_version.clone(),
            max_tokens: config.inference.max_tokens,
            temperature: config.inference.temperature,
        })
    }

    pub fn deployment(&self) -> &str {
        &self.deployment
    }

    /// `{scheme}://{host}/openai/deployments/{deployment}/chat/completions?api-version=…`
    ///
    /// Only the scheme and authority of the project connection are kept; the
    /// `/api/projects/<name>` path addresses the project, not the inference API.
    pub fn chat_completions_url(&self) -> Result<Url> {
        if self.project_connection.is_empty() {
            return Err(VisionChatError::Config(
                "PROJECT_CONNECTION is not set".to_string(),
            ));
        }
        if self.deployment.is_empty() {
            return Err(VisionChatError::Config(
                "MODEL_DEPLOYMENT is not set".to_string(),
            ));
        }

        let project = Url::parse(&self.project_connection).map_err(|e| {
            VisionChatError::Config(format!(
                "PROJECT_CONNECTION '{}' is not a valid URL: {}",
                self.project_connection, e
            ))
        })?;
        let host = project.host_str().ok_or_else(|| {
            VisionChatError::Config(format!(
                "PROJECT_CONNECTION '{}' has no host",
                self.project_connection
            ))
        })?;

        let authority = match project.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };

        let mut url = Url::parse(&format!("{}://{}", project.scheme(), authority))
            .map_err(|e| VisionChatError::Config(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| VisionChatError::Config("endpoint cannot be a base URL".to_string()))?
            .pop_if_empty()
            .extend(["openai", "deployments", self.deployment.as_str(), "chat", "completions"]);
        url.query_pairs_mut()
            .append_pair("api-version", &self.api_version);

        Ok(url)
    }

    /// Extract error message from API response JSON
    fn extract_error_message(response_text: &str) -> Option<String> {
        #[derive(serde::Deserialize)]
        struct ErrorResponse {
            error: Option<ErrorDetail>,
        }

        #[derive(serde::Deserialize)]
        struct ErrorDetail {
            message: Option<String>,
            code: Option<String>,
        }

        if let Ok(error_resp) = serde_json::from_str::<ErrorResponse>(response_text) {
            if let Some(error) = error_resp.error {
                return error.message.or(error.code);
            }
        }
        None
    }
}

#[async_trait]
impl InferenceClient for AzureOpenAiClient {
    async fn complete(&self, prompt: &VisionPrompt) -> Result<String> {
        let url = self.chat_completions_url()?;
        let auth = self.credential.get_auth().await?;

        let mut request = ChatCompletionRequest::from_prompt(&self.deployment, prompt);
        request.max_tokens = self.max_tokens;
        request.temperature = self.temperature;

        let request_id = uuid::Uuid::new_v4().to_string();
        debug!(
            "Calling chat completions for deployment {} (request id {})",
            self.deployment, request_id
        );

        let response = auth
            .apply(self.http_client.post(url))
            .header("x-ms-client-request-id", &request_id)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await.map_err(|e| {
            VisionChatError::MalformedResponse(format!("failed to read response body: {}", e))
        })?;

        if !status.is_success() {
            let message = Self::extract_error_message(&response_text)
                .unwrap_or_else(|| response_text.clone());
            error!(
                "Inference API error: HTTP {} - {}",
                status,
                sanitize(&response_text)
            );
            return Err(match status.as_u16() {
                401 | 403 => VisionChatError::Authentication(format!("HTTP {}: {}", status, message)),
                code => VisionChatError::Inference {
                    status: code,
                    message,
                },
            });
        }

        let completion: ChatCompletionResponse =
            serde_json::from_str(&response_text).map_err(|e| {
                error!("Failed to parse inference response: {}", e);
                VisionChatError::MalformedResponse(e.to_string())
            })?;

        let answer = completion
            .first_text()
            .ok_or_else(|| {
                VisionChatError::MalformedResponse("response contained no message content".to_string())
            })?
            .to_string();

        info!(
            "Received answer ({} chars) from {}",
            answer.len(),
            completion.model.as_deref().unwrap_or(&self.deployment)
        );
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::ApiKeyCredential;

    fn client(project_connection: &str, deployment: &str) -> AzureOpenAiClient {
        let config = AppConfig {
            project_connection: project_connection.to_string(),
            model_deployment: deployment.to_string(),
            ..AppConfig::default()
        };
        AzureOpenAiClient::new(&config, Arc::new(ApiKeyCredential::new("k"))).unwrap()
    }

    #[test]
    fn test_endpoint_derivation() {
        let c = client(
            "https://my-resource.services.ai.azure.com/api/projects/my-project",
            "gpt-4o",
        );
        assert_eq!(
            c.chat_completions_url().unwrap().as_str(),
            "https://my-resource.services.ai.azure.com/openai/deployments/gpt-4o/chat/completions?api-version=2024-10-21"
        );
    }

    #[test]
    fn test_endpoint_keeps_port() {
        let c = client("http://127.0.0.1:8443/api/projects/p", "d");
        assert_eq!(
            c.chat_completions_url().unwrap().as_str(),
            "http://127.0.0.1:8443/openai/deployments/d/chat/completions?api-version=2024-10-21"
        );
    }

    #[test]
    fn test_missing_settings_are_config_errors() {
        assert!(matches!(
            client("", "gpt-4o").chat_completions_url(),
            Err(VisionChatError::Config(_))
        ));
        assert!(matches!(
            client("https://x.services.ai.azure.com", "").chat_completions_url(),
            Err(VisionChatError::Config(_))
        ));
        assert!(matches!(
            client("not a url", "gpt-4o").chat_completions_url(),
            Err(VisionChatError::Config(_))
        ));
    }

    #[test]
    fn test_extract_error_message() {
        let body = r#"{"error":{"code":"DeploymentNotFound","message":"The API deployment for this resource does not exist."}}"#;
        assert_eq!(
            AzureOpenAiClient::extract_error_message(body).unwrap(),
            "The API deployment for this resource does not exist."
        );
        assert!(AzureOpenAiClient::extract_error_message("<html>").is_none());
    }
}
