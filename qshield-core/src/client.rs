// qshield-core/src/client.rs
//! Llama Stack client retrieval with redaction capabilities.
//!
//! [`RedactionEnabledClient`] wraps any client. It redacts a query and its
//! attachments before they are forwarded and dereferences to the wrapped
//! client for everything else.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, error, info};
use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::batch::{redact_attachments_with, BatchRedaction};
use crate::config::LlamaStackConfig;
use crate::engine::RedactionShield;
use crate::errors::ShieldError;
use crate::records::Attachment;
use crate::shared::get_redaction_shield;

/// Where a Llama Stack service listens when no URL is configured.
pub const DEFAULT_LLAMA_STACK_URL: &str = "http://localhost:8321";

/// A model registered with the stack.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Model {
    pub identifier: String,
    #[serde(default)]
    pub model_type: Option<String>,
    #[serde(default)]
    pub provider_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModelList {
    data: Vec<Model>,
}

/// Client for a Llama Stack distribution running in-process.
#[derive(Debug)]
pub struct LibraryClient {
    config_path: PathBuf,
    run_config: serde_yml::Value,
}

impl LibraryClient {
    /// Loads the distribution's run configuration from `config_path`.
    pub fn initialize<P: AsRef<Path>>(config_path: P) -> Result<Self, ShieldError> {
        let config_path = config_path.as_ref().to_path_buf();
        let init_error = |reason: String| ShieldError::LibraryClientInit {
            path: config_path.display().to_string(),
            reason,
        };
        let text = std::fs::read_to_string(&config_path).map_err(|e| init_error(e.to_string()))?;
        let run_config: serde_yml::Value =
            serde_yml::from_str(&text).map_err(|e| init_error(e.to_string()))?;
        debug!("Library client initialized from {}", config_path.display());
        Ok(Self { config_path, run_config })
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// The parsed run configuration.
    pub fn run_config(&self) -> &serde_yml::Value {
        &self.run_config
    }
}

/// Client for a Llama Stack running as a service.
#[derive(Debug)]
pub struct ServiceClient {
    base_url: String,
    api_key: Option<String>,
    http: reqwest::blocking::Client,
}

impl ServiceClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self, ShieldError> {
        let http = reqwest::blocking::Client::builder().build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Lists the models registered with the service.
    pub fn list_models(&self) -> Result<Vec<Model>, ShieldError> {
        let mut request = self.http.get(format!("{}/v1/models", self.base_url));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let models: ModelList = request.send()?.error_for_status()?.json()?;
        debug!("Service at {} reports {} models", self.base_url, models.data.len());
        Ok(models.data)
    }
}

/// A Llama Stack client in either mode.
#[derive(Debug)]
pub enum StackClient {
    Library(LibraryClient),
    Service(ServiceClient),
}

/// Wrapper client that adds redaction capabilities.
#[derive(Debug)]
pub struct RedactionEnabledClient<C> {
    base_client: C,
    shield: Arc<RedactionShield>,
}

impl<C> RedactionEnabledClient<C> {
    /// Wraps `base_client`, redacting with the shared shield.
    pub fn new(base_client: C) -> Self {
        Self::with_shield(base_client, get_redaction_shield(None))
    }

    pub fn with_shield(base_client: C, shield: Arc<RedactionShield>) -> Self {
        Self { base_client, shield }
    }

    pub fn shield(&self) -> &RedactionShield {
        &self.shield
    }

    /// Redacts a query and its attachments.
    pub fn apply_redaction(
        &self,
        query: Option<&str>,
        attachments: &[Attachment],
        conversation_id: &str,
    ) -> (Option<String>, BatchRedaction<Attachment>) {
        let redacted_query = self.shield.redact_text(query, conversation_id);
        let redacted_attachments = redact_attachments_with(&*self.shield, attachments, conversation_id);
        (redacted_query, redacted_attachments)
    }

    pub fn into_inner(self) -> C {
        self.base_client
    }
}

impl<C> Deref for RedactionEnabledClient<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.base_client
    }
}

impl<C> DerefMut for RedactionEnabledClient<C> {
    fn deref_mut(&mut self) -> &mut C {
        &mut self.base_client
    }
}

/// Builds the Llama Stack client described by `config`.
///
/// Library mode without a `library_client_config_path` is a configuration
/// error and is returned to the caller.
pub fn get_llama_stack_client(
    config: &LlamaStackConfig,
) -> Result<RedactionEnabledClient<StackClient>, ShieldError> {
    if config.use_as_library_client == Some(true) {
        let Some(path) = &config.library_client_config_path else {
            let err = ShieldError::MissingLibraryClientPath;
            error!("{}", err);
            return Err(err);
        };
        info!("Using Llama stack as library client");
        let client = LibraryClient::initialize(path)?;
        return Ok(RedactionEnabledClient::new(StackClient::Library(client)));
    }

    info!("Using Llama stack running as a service");
    let url = config.url.as_deref().unwrap_or(DEFAULT_LLAMA_STACK_URL);
    let client = ServiceClient::new(url, config.api_key.clone())?;
    Ok(RedactionEnabledClient::new(StackClient::Service(client)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PatternRule;

    struct EchoClient {
        calls: usize,
    }

    impl EchoClient {
        fn send(&mut self, query: &str) -> String {
            self.calls += 1;
            query.to_string()
        }
    }

    fn local_shield() -> Arc<RedactionShield> {
        Arc::new(RedactionShield::new(Some(vec![
            PatternRule::new(r"\bfoo\b", "deployment"),
            PatternRule::new(r"\bsecret\b", "[REDACTED]"),
        ])))
    }

    #[test]
    fn test_apply_redaction_covers_query_and_attachments() {
        let client = RedactionEnabledClient::with_shield(EchoClient { calls: 0 }, local_shield());
        let attachments = vec![Attachment::new("log", "text/plain", "the secret is here")];
        let (query, redacted) = client.apply_redaction(Some("scale foo"), &attachments, "conv");
        assert_eq!(query.as_deref(), Some("scale deployment"));
        assert_eq!(redacted.items()[0].content, "the [REDACTED] is here");
        assert_eq!(attachments[0].content, "the secret is here");
    }

    #[test]
    fn test_other_calls_reach_base_client() {
        let mut client = RedactionEnabledClient::with_shield(EchoClient { calls: 0 }, local_shield());
        assert_eq!(client.send("foo"), "foo");
        assert_eq!(client.calls, 1);
        assert_eq!(client.into_inner().calls, 1);
    }

    #[test]
    fn test_library_mode_without_path_is_fatal() {
        let config = LlamaStackConfig { use_as_library_client: Some(true), ..Default::default() };
        let err = get_llama_stack_client(&config).unwrap_err();
        assert!(matches!(err, ShieldError::MissingLibraryClientPath));
    }

    #[test]
    fn test_library_mode_with_unreadable_path() {
        let config = LlamaStackConfig {
            use_as_library_client: Some(true),
            library_client_config_path: Some(PathBuf::from("/no/such/run.yaml")),
            ..Default::default()
        };
        let err = get_llama_stack_client(&config).unwrap_err();
        assert!(matches!(err, ShieldError::LibraryClientInit { .. }));
    }

    #[test]
    fn test_service_mode_defaults_url() {
        let client = ServiceClient::new(DEFAULT_LLAMA_STACK_URL, None).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8321");
        let trimmed = ServiceClient::new("http://stack:8321/", Some("key".into())).unwrap();
        assert_eq!(trimmed.base_url(), "http://stack:8321");
        assert_eq!(trimmed.api_key(), Some("key"));
    }
}
