//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (read & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → main.rs builds the router and server from it
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; routes are sealed at startup anyway
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    ApiConfig, AppConfig, LimitsConfig, ListenerConfig, ObservabilityConfig, StaticFilesConfig,
    TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
