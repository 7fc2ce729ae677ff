// --- File: crates/slotwise_common/src/error.rs ---

/// A trait for converting errors to HTTP status codes.
///
/// This trait is implemented by the error types of the individual crates so
/// handlers can map domain errors to responses in one place instead of
/// matching on every variant at every call site.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}
