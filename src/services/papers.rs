use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::BackendConfig;
use crate::error::DocumentError;
use crate::text_map::strip_document_markers;

/// A document ready to be tokenized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paper {
    /// Body text with the upstream framing removed
    pub text: String,
    /// Link to the full PDF, if the source knows one
    pub pdf_link: Option<String>,
}

impl Paper {
    /// Build from raw upstream text that still carries its framing
    pub fn from_raw(raw: &str, pdf_link: Option<String>) -> Self {
        Self {
            text: strip_document_markers(raw),
            pdf_link,
        }
    }
}

#[derive(Serialize)]
struct PaperRequest<'a> {
    id: &'a str,
}

/// `{"paper_body": [body, link]}`, `{"error": ...}` or `null`
#[derive(Deserialize)]
struct PaperResponse {
    #[serde(default)]
    paper_body: Option<Vec<Option<String>>>,
    #[serde(default)]
    error: Option<String>,
}

/// Fetch a paper body from the backend. Blocks.
pub fn fetch_paper(backend: &BackendConfig, id: &str) -> Result<Paper, DocumentError> {
    let client = reqwest::blocking::Client::new();

    let response = client
        .post(backend.paper_url())
        .json(&PaperRequest { id })
        .send()?;

    if !response.status().is_success() {
        return Err(DocumentError::Status {
            status: response.status().as_u16(),
        });
    }

    let body = response.text()?;
    parse_paper(id, &body)
}

fn parse_paper(id: &str, body: &str) -> Result<Paper, DocumentError> {
    let response: Option<PaperResponse> = serde_json::from_str(body)?;
    let response = response.ok_or_else(|| DocumentError::NotFound(id.to_string()))?;

    if let Some(error) = response.error {
        log::warn!("Backend refused paper {id}: {error}");
        return Err(DocumentError::NotFound(id.to_string()));
    }

    let mut fields = response
        .paper_body
        .ok_or_else(|| DocumentError::NotFound(id.to_string()))?
        .into_iter();

    let raw = fields
        .next()
        .flatten()
        .ok_or_else(|| DocumentError::NotFound(id.to_string()))?;
    let pdf_link = fields.next().flatten().filter(|l| !l.is_empty());

    Ok(Paper::from_raw(&raw, pdf_link))
}

/// Read a paper stored locally in the upstream format
pub fn load_paper_file(path: &Path) -> Result<Paper, DocumentError> {
    let raw = std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Paper::from_raw(&raw, None))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_paper_with_link() {
        let paper = parse_paper(
            "42",
            r#"{"paper_body": ["<p>We study attention.</p>", "https://arxiv.org/pdf/1706.03762"]}"#,
        )
        .unwrap();
        assert_eq!(paper.text, "We study attention.");
        assert_eq!(
            paper.pdf_link.as_deref(),
            Some("https://arxiv.org/pdf/1706.03762")
        );
    }

    #[test]
    fn test_parse_paper_without_link() {
        let paper = parse_paper("42", r#"{"paper_body": ["<p>Body</p>", null]}"#).unwrap();
        assert_eq!(paper.text, "Body");
        assert_eq!(paper.pdf_link, None);

        let paper = parse_paper("42", r#"{"paper_body": ["<p>Body</p>"]}"#).unwrap();
        assert_eq!(paper.pdf_link, None);
    }

    #[test]
    fn test_parse_paper_missing() {
        assert!(matches!(
            parse_paper("7", "null"),
            Err(DocumentError::NotFound(id)) if id == "7"
        ));
        assert!(matches!(
            parse_paper("7", r#"{"error": "no id"}"#),
            Err(DocumentError::NotFound(_))
        ));
        assert!(matches!(
            parse_paper("7", r#"{"paper_body": []}"#),
            Err(DocumentError::NotFound(_))
        ));
    }

    #[test]
    fn test_parse_paper_malformed() {
        assert!(matches!(
            parse_paper("7", "not json"),
            Err(DocumentError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_paper_file(Path::new("/nonexistent/paper.txt"));
        assert!(matches!(result, Err(DocumentError::Io { .. })));
    }
}
