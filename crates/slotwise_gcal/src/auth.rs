// --- File: crates/slotwise_gcal/src/auth.rs ---
//! Service-account authentication for the Google Calendar hub.

use google_calendar3::{
    hyper_rustls::{self, HttpsConnectorBuilder},
    hyper_util::client::legacy::connect::HttpConnector,
    hyper_util::client::legacy::Client,
    yup_oauth2::{read_service_account_key, ServiceAccountAuthenticator},
    CalendarHub,
};
use slotwise_config::GcalConfig;
use std::{error::Error, path::Path};

type Connector = hyper_rustls::HttpsConnector<HttpConnector>;

/// The calendar hub type shared by the notifier.
pub type HubType = CalendarHub<Connector>;

/// Build an authenticated calendar hub from the `gcal` config section.
///
/// Reads the service account key named by `key_path` and wires it into a
/// hyper client. Callers decide how to degrade when this fails; the booking
/// flow keeps working without calendar mirroring.
pub async fn create_calendar_hub(
    config: &GcalConfig,
) -> Result<HubType, Box<dyn Error + Send + Sync>> {
    let key_path = config.key_path.as_deref().ok_or("gcal.key_path is not set")?;

    let sa_key = read_service_account_key(Path::new(key_path)).await?;
    let auth = ServiceAccountAuthenticator::builder(sa_key).build().await?;

    let https = HttpsConnectorBuilder::new()
        .with_native_roots()?
        .https_or_http()
        .enable_http1()
        .build();
    let client = Client::builder(hyper_util::rt::TokioExecutor::new()).build(https);

    Ok(CalendarHub::new(client, auth))
}
