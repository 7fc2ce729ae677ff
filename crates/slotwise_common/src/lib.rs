// --- File: crates/slotwise_common/src/lib.rs ---

// Declare modules within this crate
pub mod error; // Error handling
pub mod features; // Feature flag handling
pub mod logging; // Logging utilities
pub mod services; // Service abstractions

// Re-export error types and utilities for easier access
pub use error::HttpStatusCode;

// Re-export logging utilities for easier access
pub use logging::{init, init_with_level, log_error};

// Re-export feature flag handling utilities for easier access
pub use features::is_feature_enabled;

// Re-export the service abstractions used across crate boundaries
pub use services::{BoxedError, CalendarNotifier, ServiceFactory};

// Conditionally re-export feature-specific functions
#[cfg(feature = "gcal")]
pub use features::is_gcal_enabled;
