use crate::ir::DiagramKind;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    External(#[from] ExternalServiceError),
}

/// Missing or blank request fields. The only failure surfaced as HTTP 400.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestValidationError {
    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("User input and document templates are required")]
    MissingDocumentInput,

    #[error("No JSON data received")]
    EmptyBody,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("{kind} data must be a JSON object")]
    NotAnObject { kind: DiagramKind },

    #[error("{kind} requires `{key}`")]
    MissingKey {
        kind: DiagramKind,
        key: &'static str,
    },

    #[error("{kind}: `{key}` must be {expected}")]
    WrongShape {
        kind: DiagramKind,
        key: String,
        expected: &'static str,
    },

    #[error("{kind} needs at least {min} {key}, found {found}")]
    TooFew {
        kind: DiagramKind,
        key: &'static str,
        min: usize,
        found: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExternalServiceError {
    #[error("completion service is not configured")]
    Unavailable,

    #[error("completion request failed: {0}")]
    Transport(String),

    #[error("completion service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("completion response has no content")]
    EmptyResponse,

    #[error("completion response contains no JSON object")]
    NoJsonObject,

    #[error("completion response is not valid JSON: {0}")]
    InvalidJson(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("{kind} requires {requirement}")]
    InsufficientData {
        kind: DiagramKind,
        requirement: &'static str,
    },
}

impl RenderError {
    pub fn insufficient(kind: DiagramKind, requirement: &'static str) -> Self {
        RenderError::InsufficientData { kind, requirement }
    }
}

/// Shortens untrusted input for log lines.
pub fn snippet(text: &str) -> String {
    const LIMIT: usize = 120;
    let mut out: String = text.chars().take(LIMIT).collect();
    if text.chars().count() > LIMIT {
        out.push_str("...");
    }
    out.replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_truncates_long_input() {
        let long = "x".repeat(300);
        let short = snippet(&long);
        assert_eq!(short.chars().count(), 123);
        assert!(short.ends_with("..."));
        assert_eq!(snippet("a\nb"), "a b");
    }

    #[test]
    fn messages_name_the_kind() {
        let err = SchemaError::TooFew {
            kind: DiagramKind::Flowchart,
            key: "steps",
            min: 2,
            found: 1,
        };
        assert_eq!(err.to_string(), "flowchart needs at least 2 steps, found 1");
        let render = RenderError::insufficient(DiagramKind::Swot, "at least one item");
        assert_eq!(render.to_string(), "swot analysis requires at least one item");
    }
}
