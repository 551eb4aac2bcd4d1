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

//! qcsnu
//!
//! Client for the SNU quantum computing job service: authentication, job submission, polling
//! and typed results.

#![deny(missing_docs)]
#![warn(rustdoc::private_intra_doc_links)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::private_doc_tests)]
#![deny(missing_debug_implementations)]

use thiserror::Error;

/// Errors that can occur in qcsnu
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QcsnuError {
    /// Authentication is missing, was rejected, or the caller lacks permission
    #[error("{msg}")]
    Authentication {
        /// Message
        msg: String,
    },
    /// A job operation was rejected by the service
    #[error("{msg}")]
    Job {
        /// Message
        msg: String,
    },
    /// An experiment operation was rejected by the service
    #[error("{msg}")]
    Experiment {
        /// Message
        msg: String,
    },
    /// A backend operation was rejected by the service
    #[error("{msg}")]
    Backend {
        /// Message
        msg: String,
    },
    /// Input passed by the caller is malformed
    #[error("{msg}")]
    Validation {
        /// Message
        msg: String,
    },
    /// The request never produced an HTTP response (connection, DNS, timeout)
    #[error("{msg}")]
    Transport {
        /// Message
        msg: String,
    },
    /// The service answered with a 5xx status
    #[error("{msg}")]
    Service {
        /// HTTP status code
        status: u16,
        /// Message
        msg: String,
    },
    /// Any other 4xx response
    #[error("{msg}")]
    Client {
        /// HTTP status code
        status: u16,
        /// Message
        msg: String,
    },
    #[error("{msg}")]
    /// Received a response that cannot be decoded into the expected record
    InvalidResponse {
        /// Message
        msg: String,
    },
}

impl QcsnuError {
    /// Shorthand for a [QcsnuError::Validation] error.
    pub fn validation(msg: impl Into<String>) -> Self {
        QcsnuError::Validation { msg: msg.into() }
    }

    /// Shorthand for a [QcsnuError::Authentication] error.
    pub fn authentication(msg: impl Into<String>) -> Self {
        QcsnuError::Authentication { msg: msg.into() }
    }

    /// Shorthand for a [QcsnuError::InvalidResponse] error.
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        QcsnuError::InvalidResponse { msg: msg.into() }
    }
}

impl From<serde_json::Error> for QcsnuError {
    fn from(err: serde_json::Error) -> Self {
        QcsnuError::InvalidResponse {
            msg: format!("Error during deserialisation of response: {}", err),
        }
    }
}

mod config;
pub use config::{ApiPaths, ClientConfig, DEFAULT_BASE_URL};

pub mod transport;
pub use transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};

pub mod models;
pub use models::*;

mod interface;
pub use interface::{
    count_registers, ExperimentData, ExperimentHeader, ExperimentResult, Observable,
    StandardResult,
};

mod client;
pub use client::{JobOutcome, JobSubmission, QuantumClient, StatusHandler};

mod runner;
pub use runner::RunOptions;
