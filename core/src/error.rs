use thiserror::Error;

/// Failures talking to a node. Every variant is transient from the point of
/// view of a polling loop: log it, wait, try again.
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("could not connect to {url}: {reason}")]
    Connect { url: String, reason: String },

    #[error("{url} returned HTTP {status}: {message}")]
    Http {
        url: String,
        status: u16,
        message: String,
    },

    #[error("could not decode response from {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("node rejected transaction: {0}")]
    Rejected(String),

    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },
}

impl NodeError {
    pub fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        let url = url.to_string();
        if err.is_timeout() {
            NodeError::Timeout { url }
        } else if err.is_connect() {
            NodeError::Connect {
                url,
                reason: err.to_string(),
            }
        } else if err.is_decode() {
            NodeError::Decode {
                url,
                reason: err.to_string(),
            }
        } else {
            NodeError::Transport {
                url,
                reason: err.to_string(),
            }
        }
    }

    pub fn is_recoverable(&self) -> bool {
        true
    }

    /// Short category name for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            NodeError::Timeout { .. } => "timeout",
            NodeError::Connect { .. } => "connect",
            NodeError::Http { .. } => "http",
            NodeError::Decode { .. } => "decode",
            NodeError::Rejected(_) => "rejected",
            NodeError::Transport { .. } => "transport",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid node url '{0}' (expected http:// or https://)")]
    NodeUrl(String),

    #[error("invalid chain id '{0}' (expected a single ASCII character)")]
    ChainId(String),

    #[error("missing required setting: {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },

    #[error("could not build HTTP client: {0}")]
    HttpClient(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_errors_are_recoverable() {
        let errors = [
            NodeError::Timeout { url: "u".into() },
            NodeError::Http {
                url: "u".into(),
                status: 502,
                message: "bad gateway".into(),
            },
            NodeError::Decode {
                url: "u".into(),
                reason: "eof".into(),
            },
            NodeError::Rejected("fee too low".into()),
        ];
        for e in errors {
            assert!(e.is_recoverable(), "{e}");
        }
    }

    #[test]
    fn test_http_error_message() {
        let e = NodeError::Http {
            url: "http://127.0.0.1:6869/debug/state".into(),
            status: 403,
            message: "Provided API key is not correct".into(),
        };
        assert_eq!(
            e.to_string(),
            "http://127.0.0.1:6869/debug/state returned HTTP 403: Provided API key is not correct"
        );
        assert_eq!(e.kind(), "http");
    }
}
