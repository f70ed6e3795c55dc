#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    FileRead(String, String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("[{server}] both UDP and TCP transports are disabled")]
    TransportsDisabled { server: String },

    #[error("[{server}] both IPv4 and IPv6 are disabled")]
    IpFamiliesDisabled { server: String },

    #[error("[{resolver}] TLS configuration carries a key pin but no pin verifier")]
    MissingPinVerifier { resolver: String },

    #[error("Unknown DNS provider: {0}")]
    UnknownProvider(String),

    #[error("Invalid server address: {0}")]
    InvalidServer(String),

    #[error("TLS configuration error: {0}")]
    Tls(String),
}
