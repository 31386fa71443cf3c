use std::error;
use std::fmt;

#[derive(Debug)]
pub enum DynDnsErrorKind {
    Config(String),
    AuthConfig(String),
    SendHttp { url: String, context: String },
    BadResponse { url: String, context: String },
    Deserialize { url: String, context: String },
    InvalidAddress(String),
    Update { status: u16, message: String },
}

#[derive(Debug)]
pub struct DynDnsError {
    kind: DynDnsErrorKind,
    source: Option<Box<dyn error::Error + Send + Sync>>,
}

impl DynDnsError {
    pub fn config(msg: impl Into<String>) -> DynDnsError {
        DynDnsError {
            kind: DynDnsErrorKind::Config(msg.into()),
            source: None,
        }
    }

    pub fn config_source(
        msg: impl Into<String>,
        source: impl error::Error + Send + Sync + 'static,
    ) -> DynDnsError {
        DynDnsError {
            kind: DynDnsErrorKind::Config(msg.into()),
            source: Some(Box::new(source)),
        }
    }

    pub fn auth_config(msg: impl Into<String>) -> DynDnsError {
        DynDnsError {
            kind: DynDnsErrorKind::AuthConfig(msg.into()),
            source: None,
        }
    }

    pub fn send_http(url: &str, context: &str, source: reqwest::Error) -> DynDnsError {
        DynDnsError {
            kind: DynDnsErrorKind::SendHttp {
                url: String::from(url),
                context: String::from(context),
            },
            source: Some(Box::new(source)),
        }
    }

    pub fn bad_response(url: &str, context: &str, source: reqwest::Error) -> DynDnsError {
        DynDnsError {
            kind: DynDnsErrorKind::BadResponse {
                url: String::from(url),
                context: String::from(context),
            },
            source: Some(Box::new(source)),
        }
    }

    pub fn deserialize(url: &str, context: &str, source: reqwest::Error) -> DynDnsError {
        DynDnsError {
            kind: DynDnsErrorKind::Deserialize {
                url: String::from(url),
                context: String::from(context),
            },
            source: Some(Box::new(source)),
        }
    }

    pub fn invalid_address(text: &str) -> DynDnsError {
        DynDnsError {
            kind: DynDnsErrorKind::InvalidAddress(String::from(text)),
            source: None,
        }
    }

    pub fn update(status: u16, message: impl Into<String>) -> DynDnsError {
        DynDnsError {
            kind: DynDnsErrorKind::Update {
                status,
                message: message.into(),
            },
            source: None,
        }
    }

    pub fn kind(&self) -> &DynDnsErrorKind {
        &self.kind
    }
}

impl error::Error for DynDnsError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        self.source.as_deref().map(|s| s as &(dyn error::Error))
    }
}

impl fmt::Display for DynDnsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

impl fmt::Display for DynDnsErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DynDnsErrorKind::Config(msg) => write!(f, "invalid configuration: {msg}"),
            DynDnsErrorKind::AuthConfig(msg) => {
                write!(f, "insufficient credential configuration: {msg}")
            }
            DynDnsErrorKind::SendHttp { url, context, .. } => write!(
                f,
                "unable to send http request for {context}: url attempted: {url}"
            ),
            DynDnsErrorKind::BadResponse { url, context, .. } => write!(
                f,
                "received bad http response for {context}: url attempted: {url}"
            ),
            DynDnsErrorKind::Deserialize { url, context, .. } => write!(
                f,
                "unable to deserialize response for {context}: url attempted: {url}"
            ),
            DynDnsErrorKind::InvalidAddress(text) => {
                write!(f, "unable to parse {text:?} as an IPv4 address")
            }
            DynDnsErrorKind::Update { status, message } => {
                write!(f, "dns record update failed with http {status}: {message}")
            }
        }
    }
}
