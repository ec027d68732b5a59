//! Error types for azdo-vcs

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the Azure DevOps adapter
#[derive(Error, Debug)]
pub enum Error {
    /// The request never produced a response (DNS, TLS, timeout, ...)
    #[error("{operation}: {source}")]
    Request {
        /// Operation being performed, e.g. "getting pull request"
        operation: &'static str,
        /// Underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-2xx status
    #[error("http response code {status} {operation}: {message}")]
    Api {
        /// Operation being performed
        operation: &'static str,
        /// HTTP status code observed
        status: u16,
        /// Response body, possibly empty
        message: String,
    },

    /// The response body did not match the expected shape
    #[error("{operation}: unexpected response body: {source}")]
    Decode {
        /// Operation being performed
        operation: &'static str,
        /// Deserialization error
        #[source]
        source: serde_json::Error,
    },

    /// A field the adapter depends on was absent from the response
    #[error("{operation}: response is missing {field}")]
    MissingField {
        /// Operation being performed
        operation: &'static str,
        /// Missing field, e.g. "repository.project.id"
        field: &'static str,
    },

    /// Merge attempted before the bot identity was learned from a comment
    #[error("user GUID set to auto but hasn't been cached yet, please try again")]
    IdentityNotCached,

    /// Merge attempted with an explicitly empty identity
    #[error("user GUID is empty, set --user-guid or AZURE_DEVOPS_USER_GUID")]
    IdentityNotConfigured,

    /// The PR advertises iterations but none matches the head commit
    #[error(
        "supportsIterations was true but no iteration matches head commit {head_commit}"
    )]
    NoMatchingIteration {
        /// Head commit the caller expected to find
        head_commit: String,
    },

    /// The merge call returned but the pull request was not merged
    #[error("could not merge pull request: {0}")]
    MergeFailed(String),

    /// The configured hostname cannot form a base URL
    #[error("invalid azure devops hostname trying to parse {0}")]
    InvalidHost(String),

    /// Authentication error
    #[error("authentication error: {0}")]
    Auth(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True for failures that retrying the same call cannot fix
    ///
    /// Transport and API failures return false; the caller decides whether a
    /// retry is worth it.
    pub const fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::IdentityNotCached
                | Self::IdentityNotConfigured
                | Self::NoMatchingIteration { .. }
                | Self::MergeFailed(_)
        )
    }

    /// HTTP status observed, if the failure came from an API response
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precondition_classification() {
        assert!(Error::IdentityNotCached.is_precondition());
        assert!(Error::IdentityNotConfigured.is_precondition());
        assert!(
            Error::NoMatchingIteration {
                head_commit: "abc".into()
            }
            .is_precondition()
        );
        assert!(!Error::Auth("nope".into()).is_precondition());

        let api = Error::Api {
            operation: "creating pull request status",
            status: 500,
            message: String::new(),
        };
        assert!(!api.is_precondition());
        assert_eq!(api.status(), Some(500));
    }

    #[test]
    fn test_api_error_mentions_status_and_operation() {
        let err = Error::Api {
            operation: "listing pull request iterations",
            status: 404,
            message: "not found".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("404"));
        assert!(msg.contains("listing pull request iterations"));
    }
}
