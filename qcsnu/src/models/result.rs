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
use std::convert::TryFrom;

use super::common::RecordId;
use crate::QcsnuError;

/// Results of a completed job.
///
/// Holds measurement counts, a precomputed expectation value, or both. Decoding accepts counts
/// at the top level or nested under `processed_results`; top-level counts take precedence.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawJobResult")]
pub struct JobResult {
    /// Id of the job that produced the result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<RecordId>,
    /// Number of occurrences of each measured bitstring
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counts: Option<HashMap<String, u64>>,
    /// Expectation value computed by the service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expval: Option<f64>,
    /// Free-form metadata, e.g. execution time
    pub metadata: HashMap<String, Value>,
    /// Post-processed data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_data: Option<Value>,
    /// Error mitigation report
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_mitigation: Option<Value>,
}

#[derive(Deserialize)]
struct ProcessedResults {
    #[serde(default)]
    counts: Option<HashMap<String, u64>>,
    #[serde(default)]
    expval: Option<f64>,
}

#[derive(Deserialize)]
struct RawJobResult {
    #[serde(default)]
    job_id: Option<RecordId>,
    #[serde(default)]
    counts: Option<HashMap<String, u64>>,
    #[serde(default)]
    expval: Option<f64>,
    #[serde(default)]
    processed_results: Option<ProcessedResults>,
    #[serde(default)]
    metadata: Option<HashMap<String, Value>>,
    #[serde(default)]
    processed_data: Option<Value>,
    #[serde(default)]
    error_mitigation: Option<Value>,
}

impl TryFrom<RawJobResult> for JobResult {
    type Error = QcsnuError;

    fn try_from(raw: RawJobResult) -> Result<Self, Self::Error> {
        let (nested_counts, nested_expval) = match raw.processed_results {
            Some(p) => (p.counts, p.expval),
            None => (None, None),
        };
        let counts = raw.counts.or(nested_counts);
        let expval = raw.expval.or(nested_expval);
        if counts.is_none() && expval.is_none() {
            return Err(QcsnuError::invalid_response(
                "Result contains neither counts nor an expectation value",
            ));
        }
        Ok(JobResult {
            job_id: raw.job_id,
            counts,
            expval,
            metadata: raw.metadata.unwrap_or_default(),
            processed_data: raw.processed_data,
            error_mitigation: raw.error_mitigation,
        })
    }
}

impl JobResult {
    /// Creates a result from measurement counts.
    pub fn from_counts(counts: HashMap<String, u64>) -> Self {
        Self {
            job_id: None,
            counts: Some(counts),
            expval: None,
            metadata: HashMap::new(),
            processed_data: None,
            error_mitigation: None,
        }
    }

    /// Decodes a result from the JSON tree returned by the service.
    pub fn from_value(value: Value) -> Result<Self, QcsnuError> {
        serde_json::from_value(value).map_err(|e| QcsnuError::InvalidResponse {
            msg: format!("Could not decode job result: {}", e),
        })
    }

    /// Encodes the result into a JSON tree.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    fn require_counts(&self) -> Result<(&HashMap<String, u64>, u64), QcsnuError> {
        let counts = self.counts.as_ref().ok_or_else(|| {
            QcsnuError::invalid_response("Result does not contain measurement counts")
        })?;
        let total: u64 = counts.values().sum();
        if total == 0 {
            return Err(QcsnuError::invalid_response("Result contains zero shots"));
        }
        Ok((counts, total))
    }

    /// Total number of recorded shots, zero when the result holds no counts.
    pub fn total_shots(&self) -> u64 {
        self.counts
            .as_ref()
            .map(|c| c.values().sum())
            .unwrap_or_default()
    }

    /// Relative frequency of `bitstring` among all shots.
    ///
    /// # Returns
    ///
    /// * `Ok(f64)` - The probability, `0.0` for bitstrings that never occurred.
    /// * `Err(QcsnuError::InvalidResponse)` - The result holds no counts or zero shots.
    pub fn get_probability(&self, bitstring: &str) -> Result<f64, QcsnuError> {
        let (counts, total) = self.require_counts()?;
        let count = counts.get(bitstring).copied().unwrap_or_default();
        Ok(count as f64 / total as f64)
    }

    /// Expectation value of a diagonal observable given as bitstring -> eigenvalue.
    ///
    /// Bitstrings missing from `observable` contribute zero.
    ///
    /// # Returns
    ///
    /// * `Ok(f64)` - The expectation value.
    /// * `Err(QcsnuError::InvalidResponse)` - The result holds no counts or zero shots.
    pub fn get_expectation_value(
        &self,
        observable: &HashMap<String, f64>,
    ) -> Result<f64, QcsnuError> {
        let (counts, total) = self.require_counts()?;
        Ok(counts
            .iter()
            .filter_map(|(bits, count)| {
                observable
                    .get(bits)
                    .map(|coefficient| coefficient * (*count as f64 / total as f64))
            })
            .sum())
    }
}
