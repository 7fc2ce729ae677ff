// --- File: crates/services/slotwise_api/src/service_factory.rs ---
//! Service factory implementation.
//!
//! Wires the calendar notifier according to compile-time features and the
//! runtime configuration, and hands it to the router as a trait object.
use slotwise_config::AppConfig;
use std::sync::Arc;

use slotwise_common::services::{BoxedError, CalendarNotifier, ServiceFactory};
#[allow(unused_imports)] // only used when the gcal feature is enabled
use tracing::{error, info};

#[cfg(feature = "gcal")]
use slotwise_common::features::is_gcal_enabled;
#[cfg(feature = "gcal")]
use slotwise_common::services::{BoxFuture, CreatedEvent, InterviewEvent};
#[cfg(feature = "gcal")]
use slotwise_gcal::{auth::create_calendar_hub, service::GoogleCalendarNotifier};

/// Service factory for the Slotwise API binary.
///
/// Initializes the Google Calendar notifier when the `gcal` feature is
/// compiled in and enabled at runtime. An initialization failure is logged
/// and leaves the notifier unset, so bookings degrade to fallback meeting
/// links instead of failing.
pub struct SlotwiseServiceFactory {
    #[allow(dead_code)]
    config: Arc<AppConfig>,
    #[cfg(feature = "gcal")]
    calendar_notifier: Option<Arc<dyn CalendarNotifier<Error = BoxedError>>>,
}

impl SlotwiseServiceFactory {
    /// Create a new service factory.
    pub async fn new(config: Arc<AppConfig>) -> Self {
        #[allow(unused_mut)]
        let mut factory = Self {
            config: config.clone(),
            #[cfg(feature = "gcal")]
            calendar_notifier: None,
        };

        #[cfg(feature = "gcal")]
        {
            if is_gcal_enabled(&config) {
                info!("ℹ️ Initializing Google Calendar notifier...");
                match create_calendar_hub(config.gcal.as_ref().unwrap()).await {
                    Ok(hub) => {
                        let notifier = GoogleCalendarNotifier::new(Arc::new(hub));

                        // Wrapper converting the concrete notifier error to BoxedError
                        struct BoxedCalendarNotifier {
                            inner: GoogleCalendarNotifier,
                        }

                        impl CalendarNotifier for BoxedCalendarNotifier {
                            type Error = BoxedError;

                            fn create_event(
                                &self,
                                calendar_id: &str,
                                event: InterviewEvent,
                            ) -> BoxFuture<'_, CreatedEvent, Self::Error> {
                                let calendar_id = calendar_id.to_string();
                                let inner = &self.inner;

                                Box::pin(async move {
                                    inner
                                        .create_event(&calendar_id, event)
                                        .await
                                        .map_err(|e| BoxedError(Box::new(e)))
                                })
                            }
                        }

                        factory.calendar_notifier =
                            Some(Arc::new(BoxedCalendarNotifier { inner: notifier }));
                        info!("✅ Google Calendar notifier initialized.");
                    }
                    Err(e) => {
                        error!("🚨 Failed to initialize Google Calendar notifier: {}. Bookings will carry fallback links.", e);
                    }
                }
            } else {
                info!("ℹ️ GCal feature compiled, but disabled via runtime config or missing gcal config section.");
            }
        }

        factory
    }
}

impl ServiceFactory for SlotwiseServiceFactory {
    fn calendar_notifier(&self) -> Option<Arc<dyn CalendarNotifier<Error = BoxedError>>> {
        #[cfg(feature = "gcal")]
        {
            if let Some(notifier) = self.calendar_notifier.clone() {
                return Some(notifier);
            }
        }

        None
    }
}
