use serde::{Deserialize, Serialize};

use crate::config::BackendConfig;
use crate::error::LookupError;

#[derive(Serialize)]
struct ExplainRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct ExplainResponse {
    #[serde(default)]
    explanation: Option<String>,
}

/// Client for the backend's text explanation endpoint
#[derive(Debug, Clone)]
pub struct ExplanationClient {
    client: reqwest::blocking::Client,
    url: String,
}

impl ExplanationClient {
    pub fn new(backend: &BackendConfig) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            url: backend.explain_url(),
        }
    }

    /// Ask the backend to explain `text`. Blocks; call it off the UI thread.
    /// `Ok(None)` means the backend answered without an explanation.
    pub fn explain(&self, text: &str) -> Result<Option<String>, LookupError> {
        let response = self
            .client
            .post(&self.url)
            .json(&ExplainRequest { text })
            .send()?;

        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            return Err(LookupError::Status {
                status: status.as_u16(),
                body,
            });
        }

        parse_explanation(&body)
    }
}

/// Read the explanation out of a success body
pub fn parse_explanation(body: &str) -> Result<Option<String>, LookupError> {
    let response: ExplainResponse = serde_json::from_str(body)?;
    Ok(response.explanation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_explanation_present() {
        let parsed = parse_explanation(r#"{"explanation": "Backprop computes gradients."}"#);
        assert_eq!(
            parsed.unwrap().as_deref(),
            Some("Backprop computes gradients.")
        );
    }

    #[test]
    fn test_parse_explanation_missing_is_not_an_error() {
        assert_eq!(parse_explanation("{}").unwrap(), None);
        assert_eq!(parse_explanation(r#"{"explanation": null}"#).unwrap(), None);
    }

    #[test]
    fn test_parse_explanation_ignores_extra_fields() {
        let parsed = parse_explanation(r#"{"explanation": "x", "model": "summarizer"}"#);
        assert_eq!(parsed.unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn test_unparseable_body_is_malformed() {
        assert!(matches!(
            parse_explanation("<html>502</html>"),
            Err(LookupError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_explanation(r#"{"explanation": 42}"#),
            Err(LookupError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(ExplainRequest { text: "attention" }).unwrap();
        assert_eq!(body, serde_json::json!({ "text": "attention" }));
    }
}
