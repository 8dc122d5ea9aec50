//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields (address, sequence, tx_hash)
//!
//! Consumers:
//!     → logging.rs subscriber, writing to stderr
//! ```
//!
//! # Design Decisions
//! - stdout is reserved for the single result line
//! - RUST_LOG overrides the configured level
//! - Key material never appears in events

pub mod logging;

pub use logging::init_logging;
