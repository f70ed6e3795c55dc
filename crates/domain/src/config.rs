pub mod errors;
pub mod logging;
pub mod provider;
pub mod resolver;
pub mod root;

pub use errors::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use provider::{default_providers, Provider};
pub use resolver::ResolverConfig;
pub use root::{CliOverrides, Config, DiscoveryConfig};
