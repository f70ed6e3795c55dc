//! Ferrous Resolv Application Layer
pub mod ports;
pub mod resolver;
pub mod services;
pub mod use_cases;

pub use resolver::Resolver;
