//! Darwin board fetch errors.

use std::fmt;

use super::convert::ConversionError;

/// Why a departure board could not be obtained from Darwin.
#[derive(Debug)]
pub enum DarwinError {
    /// No response at all: connection, TLS or timeout
    Http(reqwest::Error),

    /// The body is not a departure board
    MalformedBoard {
        reason: String,
        /// Start of the offending body, if there was one
        excerpt: Option<String>,
    },

    /// The board parsed but its contents could not be read
    Conversion(ConversionError),

    /// Any non-success status other than 401 and 429
    Status { code: u16, body: String },

    RateLimited,

    Unauthorized,

    /// The token cannot be sent in an HTTP header
    InvalidToken,

    /// The client's request limiter has been shut down
    Closed,

    /// Recorded board files missing or unreadable
    MockData(String),
}

impl DarwinError {
    /// True if retrying later could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            DarwinError::Http(e) => e.is_timeout() || e.is_connect(),
            DarwinError::RateLimited => true,
            DarwinError::Status { code, .. } => *code >= 500,
            _ => false,
        }
    }
}

impl fmt::Display for DarwinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DarwinError::Http(e) => write!(f, "request failed: {e}"),
            DarwinError::MalformedBoard { reason, excerpt } => {
                write!(f, "malformed departure board: {reason}")?;
                match excerpt {
                    Some(excerpt) => write!(f, " in {excerpt:?}"),
                    None => Ok(()),
                }
            }
            DarwinError::Conversion(e) => write!(f, "unreadable departure board: {e}"),
            DarwinError::Status { code, body } => write!(f, "Darwin returned HTTP {code}: {body}"),
            DarwinError::RateLimited => f.write_str("Darwin rate limit exceeded"),
            DarwinError::Unauthorized => f.write_str("Darwin rejected the API token"),
            DarwinError::InvalidToken => {
                f.write_str("API token contains characters not allowed in a header")
            }
            DarwinError::Closed => f.write_str("Darwin client closed"),
            DarwinError::MockData(msg) => write!(f, "recorded boards: {msg}"),
        }
    }
}

impl std::error::Error for DarwinError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DarwinError::Http(e) => Some(e),
            DarwinError::Conversion(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for DarwinError {
    fn from(err: reqwest::Error) -> Self {
        DarwinError::Http(err)
    }
}

impl From<ConversionError> for DarwinError {
    fn from(err: ConversionError) -> Self {
        DarwinError::Conversion(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            DarwinError::Unauthorized.to_string(),
            "Darwin rejected the API token"
        );

        let err = DarwinError::Status {
            code: 503,
            body: "Service Unavailable".into(),
        };
        assert_eq!(err.to_string(), "Darwin returned HTTP 503: Service Unavailable");

        let err = DarwinError::MalformedBoard {
            reason: "expected value at line 1 column 1".into(),
            excerpt: Some("<html>".into()),
        };
        assert_eq!(
            err.to_string(),
            "malformed departure board: expected value at line 1 column 1 in \"<html>\""
        );

        let err = DarwinError::from(ConversionError::MissingField("std"));
        assert_eq!(
            err.to_string(),
            "unreadable departure board: missing required field: std"
        );

        let err = DarwinError::MockData("no board for XYZ".into());
        assert_eq!(err.to_string(), "recorded boards: no board for XYZ");
    }

    #[test]
    fn transient_errors() {
        assert!(DarwinError::RateLimited.is_transient());
        assert!(
            DarwinError::Status {
                code: 502,
                body: String::new()
            }
            .is_transient()
        );
        assert!(
            !DarwinError::Status {
                code: 404,
                body: String::new()
            }
            .is_transient()
        );
        assert!(!DarwinError::Unauthorized.is_transient());
        assert!(!DarwinError::MockData(String::new()).is_transient());
    }

    #[test]
    fn conversion_is_the_source() {
        use std::error::Error;

        let err = DarwinError::from(ConversionError::MissingField("std"));
        assert!(err.source().is_some());
        assert!(DarwinError::RateLimited.source().is_none());
    }
}
