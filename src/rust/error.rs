use std::io;

/// Represents the different types of errors that can occur while curating,
/// training or serving the ticket classifier.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    /// Input data could not be read or does not have the expected shape
    #[error("Data error: {0}")]
    DataError(String),
    /// The optimizer could not fit a model to the training data
    #[error("Training error: {0}")]
    TrainingError(String),
    /// The model artifact is missing, unreadable or corrupt
    #[error("Artifact error: {0}")]
    ArtifactError(String),
    /// A classify request was malformed
    #[error("Request error: {0}")]
    RequestError(String),
    /// Feature transform or scoring failed unexpectedly
    #[error("Prediction error: {0}")]
    PredictionError(String),
    /// The API client could not reach the server
    #[error("Connection error: {0}")]
    ConnectionError(String),
}

impl ClassifierError {
    pub(crate) fn data(context: &str, err: impl std::fmt::Display) -> Self {
        Self::DataError(format!("{}: {}", context, err))
    }

    pub(crate) fn artifact(context: &str, err: impl std::fmt::Display) -> Self {
        Self::ArtifactError(format!("{}: {}", context, err))
    }

    /// True for errors the caller caused and can fix by changing its input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::RequestError(_))
    }
}

impl From<csv::Error> for ClassifierError {
    fn from(err: csv::Error) -> Self {
        ClassifierError::data("CSV error", err)
    }
}

pub(crate) fn missing_file(kind: &str, path: &std::path::Path, err: io::Error) -> String {
    if err.kind() == io::ErrorKind::NotFound {
        format!("{} file not found: {}", kind, path.display())
    } else {
        format!("Failed to read {} file {}: {}", kind, path.display(), err)
    }
}
