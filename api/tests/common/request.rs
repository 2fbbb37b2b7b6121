//! Fluent request builder for test HTTP requests

use actix_http::Request;
use actix_web::{dev::Service, http::Method, test::TestRequest};
use serde::Serialize;
use std::sync::Arc;
use taskboard_api::Dependencies;

use super::{TestResponse, service};

/// Fluent builder for constructing test HTTP requests
pub struct RequestBuilder<'a> {
    app: &'a Arc<Dependencies>,
    method: Method,
    path: String,
    headers: Vec<(String, String)>,
    body: Option<Vec<u8>>,
    query_params: Vec<(String, String)>,
}

impl<'a> RequestBuilder<'a> {
    /// Create a GET request builder
    pub fn get(
        app: &'a Arc<Dependencies>,
        path: &str,
    ) -> Self {
        Self::new(app, Method::GET, path)
    }

    /// Create a POST request builder
    pub fn post(
        app: &'a Arc<Dependencies>,
        path: &str,
    ) -> Self {
        Self::new(app, Method::POST, path)
    }

    /// Create a DELETE request builder
    pub fn delete(
        app: &'a Arc<Dependencies>,
        path: &str,
    ) -> Self {
        Self::new(app, Method::DELETE, path)
    }

    /// Create a PUT request builder
    pub fn put(
        app: &'a Arc<Dependencies>,
        path: &str,
    ) -> Self {
        Self::new(app, Method::PUT, path)
    }

    fn new(
        app: &'a Arc<Dependencies>,
        method: Method,
        path: &str,
    ) -> Self {
        Self {
            app,
            method,
            path: path.to_string(),
            headers: vec![],
            body: None,
            query_params: vec![],
        }
    }

    /// Set JSON body and Content-Type header
    pub fn json<T: Serialize>(
        mut self,
        body: &T,
    ) -> Self {
        self.body = Some(serde_json::to_vec(body).unwrap());
        self.headers
            .push(("Content-Type".to_string(), "application/json".to_string()));
        self
    }

    /// Set raw string body
    pub fn body(
        mut self,
        body: &str,
    ) -> Self {
        self.body = Some(body.as_bytes().to_vec());
        self
    }

    /// Set Content-Type header
    pub fn content_type(
        mut self,
        content_type: &str,
    ) -> Self {
        self.headers
            .push(("Content-Type".to_string(), content_type.to_string()));
        self
    }

    /// Add a query parameter
    pub fn query(
        mut self,
        key: &str,
        value: &str,
    ) -> Self {
        self.query_params
            .push((key.to_string(), value.to_string()));
        self
    }

    /// Send the request and return TestResponse
    pub async fn send(self) -> TestResponse {
        let app = service(self.app).await;

        let mut path = self.path.clone();
        if !self.query_params.is_empty() {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(&self.query_params)
                .finish();
            path = format!("{path}?{query}");
        }

        let mut req = TestRequest::default()
            .method(self.method)
            .uri(&path);

        for (key, value) in &self.headers {
            req = req.insert_header((key.as_str(), value.as_str()));
        }

        if let Some(body) = self.body {
            req = req.set_payload(body);
        }

        let req: Request = req.to_request();
        let resp = app.call(req).await.unwrap();

        TestResponse::new(resp).await
    }
}
