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

use super::common::{RecordId, Timestamp};
use crate::QcsnuError;

/// A pulse-schedule experiment run, tracked like a job.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Experiment {
    /// Experiment id
    pub id: RecordId,
    /// Status as reported by the service
    pub status: String,
    /// Pulse schedule
    pub pulse_schedule: Value,
    /// Run id assigned by the hardware
    pub external_run_id: i64,
    /// Error message of a failed run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
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

impl Experiment {
    /// Decodes an experiment from the JSON tree returned by the service.
    pub fn from_value(value: Value) -> Result<Self, QcsnuError> {
        serde_json::from_value(value).map_err(|e| QcsnuError::InvalidResponse {
            msg: format!("Could not decode experiment: {}", e),
        })
    }
}
