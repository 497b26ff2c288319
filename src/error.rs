use thiserror::Error;

/// The model reply contained no JSON object to extract.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("could not extract JSON from model response: {reason}")]
pub struct ParseError {
    pub reason: String,
}

/// A JSON span was found but could not be read as an analysis payload.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("model response JSON is malformed: {reason}")]
pub struct MalformedResponseError {
    pub reason: String,
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("generative model request failed: {0}")]
    Network(String),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    MalformedResponse(#[from] MalformedResponseError),
}

impl From<reqwest::Error> for AnalysisError {
    fn from(err: reqwest::Error) -> Self {
        AnalysisError::Network(err.to_string())
    }
}

/// Failure of the local store. Carries the full `anyhow` context chain.
#[derive(Debug, Error)]
#[error("storage operation failed: {0}")]
pub struct StorageError(String);

impl From<anyhow::Error> for StorageError {
    fn from(err: anyhow::Error) -> Self {
        StorageError(format!("{err:#}"))
    }
}

#[derive(Debug, Error)]
pub enum JournalError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("log entry {0} not found")]
    NotFound(String),
}

impl JournalError {
    /// Text shown to the user at the screen that started the action.
    pub fn user_message(&self) -> &'static str {
        match self {
            JournalError::Analysis(_) => "Analysis failed, please try again.",
            JournalError::Storage(_) => "Could not save or load your entries.",
            JournalError::NotFound(_) => "That entry no longer exists.",
        }
    }
}
