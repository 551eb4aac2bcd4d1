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
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use super::common::{RecordId, Timestamp};
use crate::QcsnuError;

/// Lifecycle state of a job: `created -> running -> {completed | error | cancelled}`.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Accepted by the service, not yet executing
    Created,
    /// Executing on the backend
    Running,
    /// Finished successfully, results are available
    Completed,
    /// Finished with an error
    Error,
    /// Cancelled before completion
    Cancelled,
}

impl JobStatus {
    /// Wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Created => "created",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Error => "error",
            JobStatus::Cancelled => "cancelled",
        }
    }

    /// Whether no further transition can happen.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Error | JobStatus::Cancelled
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = QcsnuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(JobStatus::Created),
            "running" => Ok(JobStatus::Running),
            "completed" => Ok(JobStatus::Completed),
            "error" => Ok(JobStatus::Error),
            "cancelled" => Ok(JobStatus::Cancelled),
            _ => Err(QcsnuError::validation(format!("Unknown job status: {}", s))),
        }
    }
}

/// Error mitigation technique and its parameters, e.g. zero-noise extrapolation.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct MitigationParams {
    /// Name of the technique, e.g. `"zne"`
    pub technique: String,
    /// Technique-specific parameters
    #[serde(default)]
    pub params: HashMap<String, Value>,
}

impl MitigationParams {
    /// Creates parameters for `technique` without technique-specific settings.
    pub fn new(technique: impl Into<String>) -> Self {
        Self {
            technique: technique.into(),
            params: HashMap::new(),
        }
    }

    /// Adds a technique-specific parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: Value) -> Self {
        self.params.insert(key.into(), value);
        self
    }
}

/// Snapshot of a submitted job as reported by the service.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Job id
    pub id: RecordId,
    /// Current status
    pub status: JobStatus,
    /// Name of the backend executing the job
    pub backend: String,
    /// Number of shots
    pub shots: u64,
    /// Job name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Circuit as stored by the service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circuit: Option<Value>,
    /// Error message, set when the status is [JobStatus::Error]
    #[serde(default)]
    pub error_message: Option<String>,
    /// Error mitigation applied to the job
    #[serde(default)]
    pub mitigation_params: Option<MitigationParams>,
    /// Free-form metadata
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
    /// Creation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    /// Time of the last status change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

impl Job {
    /// Decodes a job from the JSON tree returned by the service.
    pub fn from_value(value: Value) -> Result<Self, QcsnuError> {
        serde_json::from_value(value).map_err(|e| QcsnuError::InvalidResponse {
            msg: format!("Could not decode job: {}", e),
        })
    }

    /// Encodes the job into a JSON tree.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
