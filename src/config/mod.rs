//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → TransferConfig (validated, immutable)
//!
//! no config file:
//!     → TransferConfig::default() (the built-in testnet transfer)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, parse_config, ConfigError};
pub use schema::{ChainConfig, CoinConfig, KeyringConfig, TransferConfig, TransferParams};
