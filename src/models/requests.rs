//! Request DTOs for the corpus server API
//!
//! Defines the structure of incoming query strings and request bodies.

use serde::Deserialize;

use crate::corpus::CorpusId;
use crate::error::{CorpusError, Result};

/// Query string of `GET /search/:corpus`
#[derive(Debug, Clone, Deserialize)]
pub struct SearchParams {
    /// The search text
    #[serde(default)]
    pub q: String,
}

/// Request body of `POST /call`
///
/// # Fields
/// - `method`: Operation name, looked up in the operation registry
/// - `arguments`: Operation arguments; unused ones are ignored
#[derive(Debug, Clone, Deserialize)]
pub struct CallRequest {
    pub method: String,
    #[serde(default)]
    pub arguments: CallArguments,
}

/// Arguments accepted by dispatched operations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallArguments {
    #[serde(default)]
    pub corpus: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl CallArguments {
    /// Parsed `corpus` argument.
    pub fn corpus(&self) -> Result<CorpusId> {
        self.corpus
            .as_deref()
            .ok_or_else(|| missing("corpus"))?
            .parse()
    }

    pub fn query(&self) -> Result<&str> {
        self.query.as_deref().ok_or_else(|| missing("query"))
    }

    pub fn name(&self) -> Result<&str> {
        self.name.as_deref().ok_or_else(|| missing("name"))
    }
}

fn missing(argument: &str) -> CorpusError {
    CorpusError::InvalidRequest(format!("Missing argument '{}'", argument))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_request_deserialize() {
        let json = r#"{"method": "search", "arguments": {"corpus": "docs", "query": "alloc"}}"#;
        let req: CallRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.method, "search");
        assert_eq!(req.arguments.corpus().unwrap(), CorpusId::Docs);
        assert_eq!(req.arguments.query().unwrap(), "alloc");
        assert!(req.arguments.name.is_none());
    }

    #[test]
    fn test_call_request_without_arguments() {
        let req: CallRequest = serde_json::from_str(r#"{"method": "cache_stats"}"#).unwrap();
        assert!(matches!(
            req.arguments.corpus(),
            Err(CorpusError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_unknown_corpus_argument() {
        let args = CallArguments {
            corpus: Some("movies".into()),
            ..Default::default()
        };
        assert!(matches!(args.corpus(), Err(CorpusError::Validation(_))));
    }
}
