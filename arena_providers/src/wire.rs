//! Request and response bodies of the `generateContent` endpoint.
//!
//! The response types only declare the fields the adapter needs. Any of them
//! missing fails deserialization, which the adapter reports as a malformed
//! response.

use arena_core::{GenerationConfig, Role, Turn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: WireGenerationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Content {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl Content {
    #[must_use]
    pub fn text(role: Role, text: &str) -> Self {
        Self {
            role,
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

impl From<&Turn> for Content {
    fn from(turn: &Turn) -> Self {
        Self::text(turn.role(), turn.text())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WireGenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
}

impl From<GenerationConfig> for WireGenerationConfig {
    fn from(config: GenerationConfig) -> Self {
        Self {
            temperature: config.temperature,
            top_p: config.top_p,
            top_k: config.top_k,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub content: CandidateContent,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CandidateContent {
    pub parts: Vec<ResponsePart>,
}

/// Non-text parts (e.g. function calls) deserialize with `text: None`.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate.
    #[must_use]
    pub fn into_first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content
            .parts
            .into_iter()
            .next()?
            .text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_camel_case_generation_config() {
        let request = GenerateContentRequest {
            contents: vec![Content::text(Role::User, "hi")],
            generation_config: GenerationConfig {
                temperature: 0.5,
                top_p: 0.75,
                top_k: 10,
            }
            .into(),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "contents": [{"role": "user", "parts": [{"text": "hi"}]}],
                "generationConfig": {"temperature": 0.5, "topP": 0.75, "topK": 10}
            })
        );
    }

    #[test]
    fn first_text_of_well_formed_response() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[
                {"content":{"role":"model","parts":[{"text":"first"},{"text":"second"}]}},
                {"content":{"parts":[{"text":"other"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(response.into_first_text().as_deref(), Some("first"));
    }

    #[test]
    fn empty_arrays_have_no_text() {
        let no_candidates: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(no_candidates.into_first_text().is_none());

        let no_parts: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{"parts":[]}}]}"#).unwrap();
        assert!(no_parts.into_first_text().is_none());
    }

    #[test]
    fn missing_content_fails_to_deserialize() {
        let result = serde_json::from_str::<GenerateContentResponse>(
            r#"{"candidates":[{"finishReason":"SAFETY"}]}"#,
        );
        assert!(result.is_err());
    }
}
