use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("HTTP error: {0}")] Transport(String),
    #[error("status={status} body={body}")] Status { status: u16, body: String },
    #[error("{0}")] Blocked(String),
    #[error("parse error: {0}")] Decode(String),
    #[error("Other: {0}")] Other(String),
}

impl GeminiError {
    /// Transient backend busy/unavailable condition; the only error the gateway retries.
    pub fn is_overload(&self) -> bool {
        match self {
            GeminiError::Status { status, body } => *status == 503 || mentions_overload(body),
            GeminiError::Transport(msg) | GeminiError::Other(msg) => mentions_overload(msg),
            GeminiError::Blocked(_) | GeminiError::Decode(_) => false,
        }
    }
}

fn mentions_overload(text: &str) -> bool {
    text.contains("503") || text.contains("UNAVAILABLE") || text.to_ascii_lowercase().contains("overloaded")
}

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("content analysis failed: {0}")] Analysis(#[from] GeminiError),
    #[error("deck generation cancelled")] Cancelled,
}
