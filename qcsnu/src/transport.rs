// Copyright © 2024 SNU QuIQCL Team. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use this file except
// in compliance with the License. You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software distributed under the
// License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either
// express or implied. See the License for the specific language governing permissions and
// limitations under the License.

//! HTTP transport used by [crate::QuantumClient].
//!
//! [HttpTransport] is the only place network I/O happens. [ReqwestTransport] is the production
//! implementation; tests substitute scripted transports.

use std::fmt;

use serde_json::{json, Value};
use tracing::warn;

use crate::config::ClientConfig;
use crate::QcsnuError;

/// HTTP verbs used by the job service.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        };
        write!(f, "{}", name)
    }
}

/// A fully assembled request handed to a transport.
#[derive(PartialEq, Debug, Clone)]
pub struct HttpRequest {
    /// HTTP verb
    pub method: HttpMethod,
    /// Absolute URL
    pub url: String,
    /// Endpoint path relative to the base URL, kept for error mapping and logging
    pub path: String,
    /// Request headers
    pub headers: Vec<(String, String)>,
    /// Query string parameters
    pub query: Vec<(String, String)>,
    /// JSON body
    pub body: Option<Value>,
}

impl HttpRequest {
    /// Returns the value of the header `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Raw response of the service.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

impl HttpResponse {
    /// Creates a response with a JSON body.
    pub fn json(status: u16, body: &Value) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }

    /// Creates a response with a plain text body.
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Blocking HTTP transport.
///
/// Implementations only move bytes: any failure to obtain a response must be reported as
/// [QcsnuError::Transport]. Status codes are interpreted by the client.
pub trait HttpTransport: fmt::Debug {
    /// Sends `request` and returns the raw response.
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, QcsnuError>;
}

impl<T: HttpTransport + ?Sized> HttpTransport for Box<T> {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, QcsnuError> {
        (**self).send(request)
    }
}

/// [HttpTransport] backed by a blocking [reqwest] client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    /// Builds the underlying HTTP client from the timeout and TLS settings of `config`.
    ///
    /// # Returns
    ///
    /// * `Ok(ReqwestTransport)` - The transport.
    /// * `Err(QcsnuError::Transport)` - The HTTP client could not be created.
    pub fn new(config: &ClientConfig) -> Result<Self, QcsnuError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(!config.verify_ssl)
            .build()
            .map_err(|x| QcsnuError::Transport {
                msg: format!("Could not create http client {:?}", x),
            })?;
        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, QcsnuError> {
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
            HttpMethod::Put => self.client.put(&request.url),
            HttpMethod::Delete => self.client.delete(&request.url),
        };
        for (name, value) in request.headers.iter() {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = request.body.as_ref() {
            builder = builder.json(body);
        }

        let response = builder.send().map_err(|e| QcsnuError::Transport {
            msg: format!("Request failed: {} {}: {}", request.method, request.path, e),
        })?;
        let status = response.status().as_u16();
        let body = response.text().map_err(|e| QcsnuError::Transport {
            msg: format!("Could not read response body: {}", e),
        })?;
        Ok(HttpResponse { status, body })
    }
}

// Pulls the server-supplied message out of an error body, if there is one.
fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["error", "detail"]
        .iter()
        .find_map(|key| value.get(key))
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
}

/// Maps a raw response onto the error taxonomy or a JSON value.
///
/// 5xx become [QcsnuError::Service], 401 and 403 [QcsnuError::Authentication], other 4xx are
/// dispatched on the endpoint path: job, experiment, backend, in that order, else
/// [QcsnuError::Client]. A successful response whose body is not JSON is returned as
/// `{"message": <body>}`.
pub(crate) fn interpret_response(path: &str, response: HttpResponse) -> Result<Value, QcsnuError> {
    let status = response.status;
    if status >= 500 {
        return Err(QcsnuError::Service {
            status,
            msg: format!("Server error: {}", response.body),
        });
    }
    match status {
        401 => return Err(QcsnuError::authentication("authentication failed")),
        403 => return Err(QcsnuError::authentication("permission denied")),
        _ => (),
    }
    if status >= 400 {
        let message = server_message(&response.body);
        let err = if path.contains("job") {
            QcsnuError::Job {
                msg: message.unwrap_or_else(|| "Job operation failed".to_string()),
            }
        } else if path.contains("experiment") {
            QcsnuError::Experiment {
                msg: message.unwrap_or_else(|| "Experiment operation failed".to_string()),
            }
        } else if path.contains("backend") {
            QcsnuError::Backend {
                msg: message.unwrap_or_else(|| "Backend operation failed".to_string()),
            }
        } else {
            QcsnuError::Client {
                status,
                msg: message.unwrap_or_else(|| "Operation failed".to_string()),
            }
        };
        return Err(err);
    }

    match serde_json::from_str::<Value>(&response.body) {
        Ok(value) => Ok(value),
        Err(_) => {
            warn!(path, status, "response body is not JSON");
            Ok(json!({ "message": response.body }))
        }
    }
}
