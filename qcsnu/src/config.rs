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

use serde::{Deserialize, Serialize};
use std::env::var;
use std::time::Duration;

/// Base URL used when neither an explicit URL nor `QCSNU_BASE_URL` is given.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

const BASE_URL_ENV_VAR: &str = "QCSNU_BASE_URL";

/// Endpoint prefixes of the job service.
///
/// Every path starts and ends with `/`. Ids and backend names are appended to the prefixes
/// followed by a trailing `/`.
#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiPaths {
    /// Token endpoint used by `login`
    pub login: String,
    /// Backend listing
    pub backends: String,
    /// Prefix of the per-backend status endpoint
    pub backend_status: String,
    /// Prefix of the per-backend calibration endpoint
    pub backend_calibration: String,
    /// Job collection; creation, results and cancellation live below it
    pub jobs: String,
    /// Experiment collection
    pub experiments: String,
}

impl Default for ApiPaths {
    fn default() -> Self {
        Self {
            login: "/api/token/".to_string(),
            backends: "/api/hardware/backends/".to_string(),
            backend_status: "/api/hardware/status/".to_string(),
            backend_calibration: "/api/hardware/calibration/".to_string(),
            jobs: "/api/runner/jobs/".to_string(),
            experiments: "/api/experiments/".to_string(),
        }
    }
}

impl ApiPaths {
    pub(crate) fn job_create(&self) -> String {
        format!("{}create/", self.jobs)
    }

    pub(crate) fn job(&self, id: &str) -> String {
        format!("{}{}/", self.jobs, id)
    }

    pub(crate) fn job_results(&self, id: &str) -> String {
        format!("{}{}/results/", self.jobs, id)
    }

    pub(crate) fn job_cancel(&self, id: &str) -> String {
        format!("{}{}/cancel/", self.jobs, id)
    }

    pub(crate) fn experiment(&self, id: &str) -> String {
        format!("{}{}/", self.experiments, id)
    }

    pub(crate) fn backend_status_of(&self, name: &str) -> String {
        format!("{}{}/", self.backend_status, name)
    }

    pub(crate) fn backend_calibration_of(&self, name: &str) -> String {
        format!("{}{}/", self.backend_calibration, name)
    }
}

/// Settings of a [crate::QuantumClient].
#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the service, without trailing slash
    pub base_url: String,
    /// Timeout of a single HTTP request
    pub timeout: Duration,
    /// Whether TLS certificates are verified
    pub verify_ssl: bool,
    /// Scheme put in front of the token in the `Authorization` header
    pub auth_scheme: String,
    /// Value of the `User-Agent` header
    pub user_agent: String,
    /// Endpoint table
    pub paths: ApiPaths,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            verify_ssl: true,
            auth_scheme: "Token".to_string(),
            user_agent: concat!("qcsnu/", env!("CARGO_PKG_VERSION")).to_string(),
            paths: ApiPaths::default(),
        }
    }
}

impl ClientConfig {
    /// Creates a configuration for the given base URL.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the service. When `None`, the URL is read from the environment
    ///                variable `QCSNU_BASE_URL`, falling back to [DEFAULT_BASE_URL].
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            base_url: resolve_base_url(base_url, var(BASE_URL_ENV_VAR).ok()),
            ..Self::default()
        }
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enables or disables TLS certificate verification.
    pub fn with_verify_ssl(mut self, verify_ssl: bool) -> Self {
        self.verify_ssl = verify_ssl;
        self
    }

    /// Replaces the endpoint table.
    pub fn with_paths(mut self, paths: ApiPaths) -> Self {
        self.paths = paths;
        self
    }

    /// Replaces the authorization scheme, e.g. `"Bearer"`.
    pub fn with_auth_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.auth_scheme = scheme.into();
        self
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn resolve_base_url(explicit: Option<String>, from_env: Option<String>) -> String {
    let url = explicit
        .filter(|u| !u.is_empty())
        .or(from_env.filter(|u| !u.is_empty()))
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    url.trim_end_matches('/').to_string()
}
