use std::time::Duration;

use arena_core::{ChatUpstream, Persona, Role, Turn, UpstreamError};
use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::{info, warn};

use crate::wire::{Content, GenerateContentRequest, GenerateContentResponse};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest slice of an upstream body copied into a log line.
const LOGGED_BODY_LIMIT: usize = 512;

/// Adapter for the Gemini `generateContent` endpoint.
///
/// Stateless between calls: every call sends the persona instruction followed
/// by the given history, makes exactly one attempt, and maps every failure to
/// an [`UpstreamError`].
#[derive(Clone)]
pub struct GeminiProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    timeout: Duration,
    persona: Persona,
}

impl GeminiProvider {
    /// A blank key is treated the same as a missing one.
    pub fn new(api_key: Option<String>, persona: Persona) -> Self {
        let api_key = api_key.filter(|key| !key.trim().is_empty());
        info!(
            "Creating GeminiProvider (persona={}, credential configured={})",
            persona.name,
            api_key.is_some()
        );
        Self {
            client: Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            persona,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn persona(&self) -> &Persona {
        &self.persona
    }

    /// Builds the request body: persona first, then `history` unchanged.
    #[must_use]
    pub fn build_request(&self, history: &[Turn]) -> GenerateContentRequest {
        let mut contents = Vec::with_capacity(history.len() + 1);
        contents.push(Content::text(Role::User, &self.persona.instruction));
        contents.extend(history.iter().map(Content::from));

        GenerateContentRequest {
            contents,
            generation_config: self.persona.generation.into(),
        }
    }

    fn endpoint(&self, api_key: &str) -> Result<Url, UpstreamError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        Url::parse_with_params(&url, &[("key", api_key)])
            .map_err(|e| UpstreamError::Transport(format!("invalid endpoint {url}: {e}")))
    }

    async fn try_send(
        &self,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<String, UpstreamError> {
        let response = self
            .client
            .post(self.endpoint(api_key)?)
            .timeout(self.timeout)
            .json(request)
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        info!("Gemini response status: {}", status.as_u16());

        let body = response.text().await.map_err(classify_transport)?;

        if !status.is_success() {
            warn!(
                "Gemini returned HTTP {}: {}",
                status.as_u16(),
                truncate_for_log(&body)
            );
            return Err(UpstreamError::HttpStatus(status.as_u16()));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            warn!("Unexpected Gemini payload ({e}): {}", truncate_for_log(&body));
            UpstreamError::MalformedResponse(e.to_string())
        })?;

        parsed.into_first_text().ok_or_else(|| {
            warn!("Gemini payload has no candidate text: {}", truncate_for_log(&body));
            UpstreamError::MalformedResponse("missing candidates[0].content.parts[0].text".into())
        })
    }
}

#[async_trait]
impl ChatUpstream for GeminiProvider {
    async fn call(&self, history: &[Turn]) -> Result<String, UpstreamError> {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("Gemini API key is not configured, skipping upstream call");
            return Err(UpstreamError::Configuration);
        };

        let request = self.build_request(history);
        info!(
            "Sending request to Gemini: model={}, history={} turns",
            self.model,
            history.len()
        );

        let reply = self.try_send(api_key, &request).await;
        match &reply {
            Ok(_) => info!("Received response from Gemini"),
            Err(e) => warn!(kind = e.kind(), "Gemini call failed: {e:?}"),
        }
        reply
    }
}

fn classify_transport(err: reqwest::Error) -> UpstreamError {
    if err.is_timeout() {
        UpstreamError::Timeout
    } else {
        // Strip the URL: it carries the credential in its query string.
        UpstreamError::Transport(err.without_url().to_string())
    }
}

fn truncate_for_log(body: &str) -> &str {
    match body.char_indices().nth(LOGGED_BODY_LIMIT) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
