use crate::relay::RelayResponse;
use axum::body::Body;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

/// Body of `GET /`
pub const GREETING: &str = "Hello, proxy";

/// Content type declared for stored payloads
pub const PLIST_CONTENT_TYPE: &str = "text/xml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreResponse {
    pub key: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeyQuery {
    pub key: Option<String>,
}

impl IntoResponse for RelayResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}
