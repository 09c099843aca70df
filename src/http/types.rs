//! Request/response contract for the dispatch layer

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Inbound request as delivered by the platform envelope
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    pub path: String,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub body: Option<String>,
}

impl Request {
    /// A GET request with only a path, the common case for this service
    pub fn get(path: &str) -> Self {
        Self {
            path: path.to_string(),
            method: "GET".to_string(),
            headers: HashMap::new(),
            body: None,
        }
    }
}

/// Outbound response handed back to the platform envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

impl Response {
    pub fn not_found() -> Self {
        Self::status(404)
    }

    pub fn status(status_code: u16) -> Self {
        Self {
            status_code,
            headers: HashMap::new(),
            body: None,
        }
    }

    /// 200 response carrying a JSON body
    pub fn ok_json(body: String) -> Self {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        Self {
            status_code: 200,
            headers,
            body: Some(body),
        }
    }
}
