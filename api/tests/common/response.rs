//! Test response wrapper with fluent assertions

use actix_web::{dev::ServiceResponse, http::StatusCode};
use serde::de::DeserializeOwned;
use taskboard_api::{ErrorResponse, PublicErrorType};

/// Wrapper around ServiceResponse providing fluent assertions
pub struct TestResponse {
    status: StatusCode,
    body: Vec<u8>,
}

impl TestResponse {
    pub(crate) async fn new(resp: ServiceResponse) -> Self {
        let status = resp.status();
        let body = actix_web::body::to_bytes(resp.into_body())
            .await
            .unwrap()
            .to_vec();
        Self { status, body }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body_string(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    // Status assertions

    /// Assert status equals expected, returns self for chaining
    pub fn assert_status(
        self,
        expected: StatusCode,
    ) -> Self {
        assert_eq!(
            self.status,
            expected,
            "Expected status {expected}, got {}. Body: {}",
            self.status,
            self.body_string()
        );
        self
    }

    pub fn assert_ok(self) -> Self {
        self.assert_status(StatusCode::OK)
    }

    pub fn assert_created(self) -> Self {
        self.assert_status(StatusCode::CREATED)
    }

    pub fn assert_no_content(self) -> Self {
        self.assert_status(StatusCode::NO_CONTENT)
    }

    pub fn assert_bad_request(self) -> Self {
        self.assert_status(StatusCode::BAD_REQUEST)
    }

    pub fn assert_not_found(self) -> Self {
        self.assert_status(StatusCode::NOT_FOUND)
    }

    pub fn assert_service_unavailable(self) -> Self {
        self.assert_status(StatusCode::SERVICE_UNAVAILABLE)
    }

    // Body parsing

    /// Parse body as JSON, panics if parsing fails
    pub fn json<T: DeserializeOwned>(self) -> T {
        serde_json::from_slice(&self.body).unwrap_or_else(|e| {
            panic!(
                "Failed to parse response body as JSON: {}. Body: {}",
                e,
                self.body_string()
            )
        })
    }

    fn parse_error(&self) -> ErrorResponse {
        serde_json::from_slice(&self.body).unwrap_or_else(|e| {
            panic!(
                "Failed to parse error response: {}. Body: {}",
                e,
                self.body_string()
            )
        })
    }

    // Error assertions

    /// Assert error type matches expected
    pub fn assert_error_type(
        self,
        expected: PublicErrorType,
    ) -> Self {
        let err = self.parse_error();
        assert_eq!(
            err.error, expected,
            "Expected error type {:?}, got {:?}",
            expected, err.error
        );
        self
    }

    /// Assert response contains a validation error for the specified field
    pub fn assert_validation_error(
        self,
        field: &str,
    ) -> Self {
        let err = self.parse_error();
        assert!(
            err.validation
                .as_ref()
                .map(|v| v.contains_key(field))
                .unwrap_or(false),
            "Expected validation error for field '{}', but validation map was: {:?}",
            field,
            err.validation
        );
        self
    }

    /// Assert error description contains expected substring
    pub fn assert_error_contains(
        self,
        substring: &str,
    ) -> Self {
        let desc = self
            .parse_error()
            .error_description
            .unwrap_or_default();
        assert!(
            desc.contains(substring),
            "Expected error description to contain '{}', but got: {}",
            substring,
            desc
        );
        self
    }

    pub fn assert_not_found_error(self) -> Self {
        self.assert_not_found()
            .assert_error_type(PublicErrorType::NotFound)
    }

    pub fn assert_unavailable_error(self) -> Self {
        self.assert_service_unavailable()
            .assert_error_type(PublicErrorType::ServiceUnavailable)
    }
}

impl std::fmt::Debug for TestResponse {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("TestResponse")
            .field("status", &self.status)
            .field("body", &self.body_string())
            .finish()
    }
}
