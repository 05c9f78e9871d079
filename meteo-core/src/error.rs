use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned by the weather gateway.
///
/// City suggestions never surface these; every other operation propagates them.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Forward geocoding returned no match for the query.
    #[error("City \"{query}\" not found. Please try a different city name.")]
    NotFound { query: String },

    /// An upstream endpoint answered with a non-success status.
    #[error("Failed to fetch {context}: {status_text}")]
    Upstream {
        context: &'static str,
        status: u16,
        status_text: String,
    },

    /// The upstream payload could not be normalized.
    #[error("Malformed upstream response: {0}")]
    MalformedResponse(String),

    /// Connection, timeout or body decoding failure.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl GatewayError {
    pub(crate) fn upstream(context: &'static str, status: StatusCode) -> Self {
        let status_text = status
            .canonical_reason()
            .map(str::to_owned)
            .unwrap_or_else(|| status.as_str().to_owned());

        GatewayError::Upstream {
            context,
            status: status.as_u16(),
            status_text,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, GatewayError::NotFound { .. })
    }
}

pub type Result<T, E = GatewayError> = std::result::Result<T, E>;
