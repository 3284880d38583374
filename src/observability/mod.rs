//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Lifecycle controller and HTTP source produce:
//!     → logging.rs (structured log events, refresh_id correlation)
//!     → metrics.rs (refresh counters, catalog gauges)
//! ```
//!
//! # Design Decisions
//! - Structured fields instead of formatted messages
//! - Each refresh carries a UUID so its log lines can be grouped

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
