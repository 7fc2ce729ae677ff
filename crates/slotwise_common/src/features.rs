//! Feature flag handling for the Slotwise application.
//!
//! ## Available Features
//!
//! - `openapi`: Enables OpenAPI documentation generation
//! - `gcal`: Enables Google Calendar notifications
//!
//! Feature flags are used in two ways in the application:
//!
//! 1. Compile-time feature flags using `#[cfg(feature = "...")]`
//! 2. Runtime feature flags using configuration values
//!
//! This module provides helper functions for checking if features are enabled
//! at runtime based on configuration values.

use slotwise_config::AppConfig;
use std::sync::Arc;

/// Check if a feature is enabled at runtime based on configuration.
///
/// A feature counts as enabled when its `use_*` flag is set and its
/// configuration section is present.
pub fn is_feature_enabled<T>(
    _config: &Arc<AppConfig>,
    use_feature: bool,
    feature_config: Option<&T>,
) -> bool {
    use_feature && feature_config.is_some()
}

/// Check if the Google Calendar feature is enabled at runtime.
#[cfg(feature = "gcal")]
pub fn is_gcal_enabled(config: &Arc<AppConfig>) -> bool {
    is_feature_enabled(config, config.use_gcal, config.gcal.as_ref())
}
