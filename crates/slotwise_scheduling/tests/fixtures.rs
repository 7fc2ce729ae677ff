//! Shared fixtures for the HTTP surface tests.
//!
//! Each test builds a router over its own in-memory database and seeds the
//! interviewer registry and student roster through the repositories, then
//! drives the API with `tower::ServiceExt::oneshot`.
#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, Request};
use axum::Router;
use chrono::{DateTime, Duration, TimeZone, Utc};
use chrono_tz::Tz;
use serde_json::Value;
use slotwise_config::{AppConfig, SchedulingConfig, ServerConfig};
use slotwise_db::{
    BookingRepository, DbClient, InterviewerRepository, NewInterviewer, NewRosterStudent,
    RosterRepository, SlotRepository, SqlBookingRepository, SqlInterviewerRepository,
    SqlRosterRepository, SqlSlotRepository,
};
use slotwise_scheduling::routes;
use std::sync::Arc;

/// The reference timezone the scheduler interprets wall-clock times in.
pub fn reference_zone() -> Tz {
    Tz::Asia__Kolkata
}

/// App configuration with department affinity off and the default knobs.
pub fn test_config() -> Arc<AppConfig> {
    Arc::new(AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
        },
        use_gcal: false,
        database: None,
        scheduling: SchedulingConfig::default(),
        gcal: None,
    })
}

/// App configuration with department affinity enabled.
pub fn affinity_config() -> Arc<AppConfig> {
    Arc::new(AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
        },
        use_gcal: false,
        database: None,
        scheduling: SchedulingConfig {
            department_affinity: true,
            ..SchedulingConfig::default()
        },
        gcal: None,
    })
}

/// Build the scheduling router over a fresh in-memory database.
///
/// The database client is returned alongside so tests can seed state
/// directly through the repositories.
pub async fn test_app(config: Arc<AppConfig>) -> (Router, DbClient) {
    let db = DbClient::from_url("sqlite::memory:")
        .await
        .expect("in-memory database");
    SqlSlotRepository::new(db.clone())
        .init_schema()
        .await
        .expect("slots schema");
    SqlBookingRepository::new(db.clone())
        .init_schema()
        .await
        .expect("bookings schema");
    SqlRosterRepository::new(db.clone())
        .init_schema()
        .await
        .expect("roster schema");
    SqlInterviewerRepository::new(db.clone())
        .init_schema()
        .await
        .expect("interviewers schema");
    let app = routes(config, db.clone(), None);
    (app, db)
}

pub async fn seed_interviewer(db: &DbClient, name: &str, email: &str, department: &str) {
    SqlInterviewerRepository::new(db.clone())
        .upsert(&NewInterviewer {
            name: name.to_string(),
            email: email.to_string(),
            department: department.to_string(),
            calendar_connected: false,
        })
        .await
        .expect("register interviewer");
}

pub async fn seed_student(db: &DbClient, name: &str, email: &str, phone: &str, department: &str) {
    SqlRosterRepository::new(db.clone())
        .upsert_students(&[NewRosterStudent {
            application_id: None,
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            department: department.to_string(),
        }])
        .await
        .expect("seed roster");
}

/// A calendar date `days_ahead` from now in the reference zone, `YYYY-MM-DD`.
pub fn upcoming_date(days_ahead: i64) -> String {
    (Utc::now().with_timezone(&reference_zone()) + Duration::days(days_ahead))
        .format("%Y-%m-%d")
        .to_string()
}

/// A wall-clock instant on an upcoming date in the reference zone.
pub fn upcoming_instant(days_ahead: i64, hour: u32, minute: u32) -> DateTime<Utc> {
    let date = (Utc::now().with_timezone(&reference_zone()) + Duration::days(days_ahead))
        .date_naive();
    reference_zone()
        .from_local_datetime(&date.and_hms_opt(hour, minute, 0).expect("valid clock"))
        .single()
        .expect("unambiguous local time")
        .with_timezone(&Utc)
}

/// RFC3339 with a `Z` suffix, safe to embed in a query string.
pub fn query_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub fn authed_json_request(method: &str, uri: &str, email: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-interviewer-email", email)
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub fn authed_request(method: &str, uri: &str, email: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("x-interviewer-email", email)
        .body(Body::empty())
        .expect("request")
}

pub fn bare_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

pub async fn response_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body");
    serde_json::from_slice(&bytes).expect("JSON body")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upcoming_instant_lands_on_the_requested_wall_clock() {
        let instant = upcoming_instant(1, 9, 0);
        let local = instant.with_timezone(&reference_zone());
        assert_eq!(local.format("%H:%M").to_string(), "09:00");
        assert_eq!(local.format("%Y-%m-%d").to_string(), upcoming_date(1));
        assert!(instant > Utc::now());
    }

    #[test]
    fn test_query_instant_has_no_offset_characters() {
        let rendered = query_instant(upcoming_instant(1, 9, 30));
        assert!(rendered.ends_with('Z'));
        assert!(!rendered.contains('+'));
    }
}
