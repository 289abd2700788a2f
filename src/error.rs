use thiserror::Error;

/// A required input is missing; raised before any network traffic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    #[error("ingredient list is empty")]
    MissingIngredients,

    #[error("profile age is not set")]
    MissingAge,

    #[error("no image selected")]
    MissingImage,

    #[error("no meal plan has been generated")]
    MissingMealPlan,

    #[error("{media_type} is not an image")]
    NotAnImage { media_type: String },
}

/// The remote call did not produce a usable result.
#[derive(Debug, Error)]
pub enum RemoteFailure {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Service reported an error: {0}")]
    Service(String),

    #[error("Malformed payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Unexpected content: {0}")]
    UnexpectedContent(String),

    #[error("Download failed: {0}")]
    Download(String),
}

impl RemoteFailure {
    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteFailure::Status { status, .. } => Some(*status),
            RemoteFailure::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
