use common_crypto::CryptoError;
use thiserror::Error;

pub type GatewayResult<T> = Result<T, GatewayError>;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("missing required fields: {}", .missing.join(", "))]
    Validation { missing: Vec<String> },
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("failed to send POST request to {url}: {} {detail}", status_label(.status))]
    Transport {
        url: String,
        status: Option<u16>,
        detail: String,
    },
    #[error("failed to generate secure hash: {0}")]
    HashComputation(String),
    #[error("{operation} request failed: {source}")]
    Operation {
        operation: &'static str,
        #[source]
        source: Box<GatewayError>,
    },
}

fn status_label(status: &Option<u16>) -> String {
    status
        .map(|code| code.to_string())
        .unwrap_or_else(|| "no-status".to_string())
}

impl GatewayError {
    pub(crate) fn within(self, operation: &'static str) -> Self {
        match self {
            already @ GatewayError::Operation { .. } => already,
            other => GatewayError::Operation {
                operation,
                source: Box::new(other),
            },
        }
    }

    /// The innermost error, skipping operation context wrappers.
    pub fn root(&self) -> &GatewayError {
        match self {
            GatewayError::Operation { source, .. } => source.root(),
            other => other,
        }
    }

    /// HTTP status reported by the gateway, if the failure came from a response.
    pub fn status(&self) -> Option<u16> {
        match self.root() {
            GatewayError::Transport { status, .. } => *status,
            _ => None,
        }
    }

    /// Short machine-readable label, used as the metrics outcome.
    pub fn code(&self) -> &'static str {
        match self.root() {
            GatewayError::InvalidArgument(_) => "invalid_argument",
            GatewayError::Validation { .. } => "validation_error",
            GatewayError::Configuration(_) => "configuration_error",
            GatewayError::Transport { .. } => "transport_error",
            GatewayError::HashComputation(_) => "hash_error",
            GatewayError::Operation { .. } => "operation_error",
        }
    }
}

impl From<CryptoError> for GatewayError {
    fn from(value: CryptoError) -> Self {
        Self::HashComputation(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_lists_every_field() {
        let err = GatewayError::Validation {
            missing: vec!["pp_TxnRefNo".into(), "pp_Amount".into()],
        };
        assert_eq!(
            err.to_string(),
            "missing required fields: pp_TxnRefNo, pp_Amount"
        );
    }

    #[test]
    fn operation_context_wraps_once() {
        let err = GatewayError::Transport {
            url: "https://sandbox.example/x".into(),
            status: Some(502),
            detail: "bad gateway".into(),
        }
        .within("CAPTURE")
        .within("REFUND");
        let text = err.to_string();
        assert!(text.starts_with("CAPTURE request failed"), "{text}");
        assert!(text.contains("502 bad gateway"), "{text}");
        assert_eq!(err.status(), Some(502));
        assert_eq!(err.code(), "transport_error");
    }

    #[test]
    fn transport_without_status_is_labelled() {
        let err = GatewayError::Transport {
            url: "http://127.0.0.1:1".into(),
            status: None,
            detail: "connection refused".into(),
        };
        assert!(err.to_string().contains("no-status connection refused"));
        assert_eq!(err.status(), None);
    }
}
