mod config;
mod logging;
mod resolver;

pub use config::load_config;
pub use logging::init_logging;
pub use resolver::build_resolver;
