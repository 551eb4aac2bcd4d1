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

/// A compute resource (hardware or simulator) offered by the service.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Backend {
    /// Backend name used when submitting jobs
    pub name: String,
    /// Availability, e.g. `"online"`
    pub status: String,
    /// Number of qubits
    pub n_qubits: usize,
    /// Capabilities such as the maximum shot count or supported gates
    #[serde(default)]
    pub capabilities: HashMap<String, Value>,
    /// Free-form metadata
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

impl Backend {
    /// Whether the service reports the backend as online.
    pub fn is_online(&self) -> bool {
        self.status.eq_ignore_ascii_case("online")
    }

    /// Maximum number of shots per job, when advertised.
    pub fn max_shots(&self) -> Option<u64> {
        self.capabilities.get("max_shots").and_then(Value::as_u64)
    }
}
